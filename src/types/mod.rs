//! Data types for the workbook model, search results, and rendered grids.

mod cell;
mod display;
mod search;
mod workbook;

pub use cell::*;
pub use display::*;
pub use search::*;
pub use workbook::*;
