//! Session configuration: which workbook to open, with which password, and which sheets to hide.
//!
//! Configuration is read once per session and passed explicitly. It can be built from a flat
//! key-value map, from `key = value` text, or from JSON:
//!
//! ```text
//! role = auditor
//! file_path = /data/report.xlsx
//! hidden_sheets = Payroll, Scratch
//! hidden_sheets.auditor = Drafts
//! hide_workbook_hidden = true
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::{Result, XlfindError};
use crate::types::{SheetState, Workbook};

const ROLE_HIDDEN_PREFIX: &str = "hidden_sheets.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub role: Option<String>,
    pub file_path: Option<PathBuf>,
    pub password: Option<String>,
    /// Hidden for every role.
    pub hidden_sheets: Vec<String>,
    /// Additional hidden sheets per role.
    pub role_hidden_sheets: HashMap<String, Vec<String>>,
    /// Also hide sheets the workbook itself marks hidden or very hidden.
    pub hide_workbook_hidden: bool,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(XlfindError::Config(format!(
            "'{key}' expects true or false, got '{other}'"
        ))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl SessionConfig {
    /// Build from flat key-value pairs. Unknown keys are logged and ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let value = value.as_ref();
            match key {
                "role" => config.role = non_empty(value),
                "file_path" => config.file_path = non_empty(value).map(PathBuf::from),
                "password" => config.password = Some(value.to_string()),
                "hidden_sheets" => config.hidden_sheets = split_list(value),
                "hide_workbook_hidden" => config.hide_workbook_hidden = parse_bool(key, value)?,
                _ => match key.strip_prefix(ROLE_HIDDEN_PREFIX) {
                    Some(role) if !role.is_empty() => {
                        config
                            .role_hidden_sheets
                            .insert(role.to_string(), split_list(value));
                    }
                    _ => log::warn!("ignoring unknown configuration key '{key}'"),
                },
            }
        }
        Ok(config)
    }

    /// Parse `key = value` lines; blank lines and `#` comments are skipped.
    pub fn from_kv_str(text: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(XlfindError::Config(format!(
                    "line {}: expected 'key = value'",
                    line_no + 1
                )));
            };
            pairs.push((key.trim().to_string(), value.trim().to_string()));
        }
        Self::from_pairs(pairs)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Sheet names hidden from display and search for this session's role.
    ///
    /// Names that match no sheet of `workbook` are logged and otherwise ignored.
    #[must_use]
    pub fn hidden_set(&self, workbook: &Workbook) -> HashSet<String> {
        let role_list = self
            .role
            .as_ref()
            .and_then(|role| self.role_hidden_sheets.get(role))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut hidden = HashSet::new();
        for name in self.hidden_sheets.iter().chain(role_list) {
            if workbook.sheet(name).is_some() {
                hidden.insert(name.clone());
            } else {
                log::warn!("hidden sheet '{name}' does not exist in the workbook");
            }
        }

        if self.hide_workbook_hidden {
            hidden.extend(
                workbook
                    .sheets
                    .iter()
                    .filter(|s| s.state != SheetState::Visible)
                    .map(|s| s.name.clone()),
            );
        }

        hidden
    }
}
