//! A browsing session: load one workbook, then list sheets, render grids, search, and navigate.
//!
//! Lifecycle is `Unloaded -> Loaded -> Indexed`. A failed load always leaves the session
//! unloaded; no partially loaded workbook is ever exposed.

use std::collections::HashSet;

use crate::config::SessionConfig;
use crate::decrypt::{prepare_bytes, Decryptor};
use crate::error::{Result, XlfindError};
use crate::grid::{SheetGrid, WorkbookGrid};
use crate::navigate;
use crate::parser;
use crate::search::{self, SearchResults};
use crate::types::{
    CellCoord, DisplayGrid, Highlight, LocatedHit, NavigationTarget, SearchHit, Workbook,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loaded,
    /// At least one query has run against the loaded workbook.
    Indexed,
}

#[derive(Debug)]
struct Loaded {
    workbook: Workbook,
    grid: WorkbookGrid,
    hidden: HashSet<String>,
    results: SearchResults,
    indexed: bool,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    loaded: Option<Loaded>,
}

impl Session {
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self {
            config,
            loaded: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.loaded {
            None => SessionState::Unloaded,
            Some(l) if l.indexed => SessionState::Indexed,
            Some(_) => SessionState::Loaded,
        }
    }

    /// Load a workbook from raw bytes, decrypting first when they are an encrypted container.
    pub fn load_bytes(&mut self, bytes: Vec<u8>, decryptor: Option<&dyn Decryptor>) -> Result<()> {
        self.loaded = None;

        let data = prepare_bytes(bytes, decryptor, self.config.password.as_deref())?;
        let workbook = parser::parse(&data)?;
        drop(data);

        let grid = WorkbookGrid::build(&workbook)?;
        let hidden = self.config.hidden_set(&workbook);
        let results = search::search(&grid, "", &hidden);

        log::info!(
            "loaded workbook: {} sheet(s), {} hidden",
            workbook.sheets.len(),
            hidden.len()
        );

        self.loaded = Some(Loaded {
            workbook,
            grid,
            hidden,
            results,
            indexed: false,
        });
        Ok(())
    }

    /// Load the workbook named by the configured `file_path`.
    pub fn load_file(&mut self, decryptor: Option<&dyn Decryptor>) -> Result<()> {
        self.loaded = None;
        let path = self
            .config
            .file_path
            .clone()
            .ok_or_else(|| XlfindError::Config("no file_path configured".to_string()))?;
        let bytes = std::fs::read(&path)?;
        self.load_bytes(bytes, decryptor)
    }

    pub fn unload(&mut self) {
        self.loaded = None;
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(XlfindError::NotLoaded)
    }

    pub fn workbook(&self) -> Result<&Workbook> {
        Ok(&self.loaded()?.workbook)
    }

    /// Effective hidden sheet names for this session.
    pub fn hidden_sheets(&self) -> Result<&HashSet<String>> {
        Ok(&self.loaded()?.hidden)
    }

    fn visible_sheet(&self, name: &str) -> Result<&SheetGrid> {
        let loaded = self.loaded()?;
        if loaded.hidden.contains(name) {
            return Err(XlfindError::UnknownSheet(name.to_string()));
        }
        loaded
            .grid
            .sheet(name)
            .ok_or_else(|| XlfindError::UnknownSheet(name.to_string()))
    }

    /// Visible sheet names in workbook order.
    pub fn sheet_names(&self) -> Result<Vec<&str>> {
        let loaded = self.loaded()?;
        Ok(loaded
            .workbook
            .sheet_names()
            .filter(|name| !loaded.hidden.contains(*name))
            .collect())
    }

    pub fn display_grid(&self, sheet_name: &str) -> Result<DisplayGrid> {
        Ok(self.visible_sheet(sheet_name)?.display_grid())
    }

    /// Run a query; the results replace those of the previous query.
    pub fn search(&mut self, text: &str) -> Result<&SearchResults> {
        let loaded = self.loaded.as_mut().ok_or(XlfindError::NotLoaded)?;
        loaded.results = search::search(&loaded.grid, text, &loaded.hidden);
        loaded.indexed = true;
        Ok(&loaded.results)
    }

    /// Results of the latest query (a blank query before any search has run).
    pub fn results(&self) -> Result<&SearchResults> {
        Ok(&self.loaded()?.results)
    }

    pub fn highlight(&self, sheet_name: &str, row: u32, col: u32) -> Result<Highlight> {
        let loaded = self.loaded()?;
        let Some(sheet) = loaded.grid.sheet(sheet_name) else {
            return Err(XlfindError::UnknownSheet(sheet_name.to_string()));
        };
        Ok(loaded.results.highlight(sheet, CellCoord::new(row, col)))
    }

    /// Resolve a hit by content: the first matching display cell on its sheet.
    pub fn navigate(&self, hit: &SearchHit) -> Result<NavigationTarget> {
        self.visible_sheet(&hit.sheet_name)?;
        navigate::navigate(&self.loaded()?.grid, hit)
    }

    /// Resolve a hit by its carried coordinate.
    pub fn navigate_located(&self, hit: &LocatedHit) -> Result<NavigationTarget> {
        self.visible_sheet(hit.sheet_name())?;
        navigate::navigate_located(&self.loaded()?.grid, hit)
    }
}
