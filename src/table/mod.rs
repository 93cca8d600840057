//! Decision-table semantics on top of the positional sheet reader
//!
//! - `classify`: header label → role, the pinned heuristic
//! - `layout`: locate CONDITION/ACTION markers and the data start row
//! - `extract`: rows → typed rule records
//! - `write`: rule records → regenerated data region of a template

pub mod classify;
pub mod extract;
pub mod layout;
pub mod write;

pub use classify::{classify_header, HeaderRole};
pub use extract::extract_rules;
pub use layout::TableLayout;
pub use write::write_rules;
