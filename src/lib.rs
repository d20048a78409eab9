//! xlfind - read-only spreadsheet browsing core
//!
//! Loads an XLSX workbook into an immutable in-memory model and answers the questions a
//! browsing front end asks of it:
//! - Which sheets are visible, and what does each one look like (merged spans included)
//! - Which cells across all visible sheets contain a piece of text
//! - Where a selected search result lives, so the view can jump to it
//!
//! # Usage
//!
//! ```no_run
//! use xlfind::{Session, SessionConfig};
//!
//! # fn main() -> xlfind::Result<()> {
//! let config = SessionConfig::from_kv_str("file_path = report.xlsx\nhidden_sheets = Payroll")?;
//! let mut session = Session::new(config);
//! session.load_file(None)?;
//! let hits = session.search("widget")?.search_hits();
//! if let Some(hit) = hits.first() {
//!     let target = session.navigate(hit)?;
//!     println!("{} {}", target.sheet_name, target.coord());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod config;
pub mod decrypt;
pub mod error;
pub mod grid;
pub mod merge;
pub mod navigate;
pub mod numfmt;
pub mod parser;
pub mod search;
pub mod session;
pub mod types;

pub use config::SessionConfig;
pub use decrypt::{is_encrypted_container, Decryptor};
pub use error::{Result, XlfindError};
pub use grid::{SheetGrid, WorkbookGrid};
pub use merge::MergeMap;
pub use parser::{parse, parse_with_metrics, ParseMetrics, SheetParseMetrics};
pub use search::SearchResults;
pub use session::{Session, SessionState};

pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
