//! Ruleforge - decision-table rules as typed records
//!
//! This library reads spreadsheet-encoded decision tables into typed rule
//! records, lets callers edit them through an in-process cache, regenerates
//! the spreadsheet's data region against the original template, and
//! validates the result through the external decision-table compiler before
//! publishing it back to a Git hosting provider.
//!
//! # Features
//!
//! - .xls / .xlsx reading with typed cells (dates as text, formulas as source)
//! - Header-label classification into name/description/condition/action roles
//! - CONDITION/ACTION marker location independent of template row offsets
//! - Template-preserving regeneration of the data region
//! - Compiler-backed format validation (errors block publish, warnings don't)
//! - Concurrent in-process rule cache with atomic replace-all
//!
//! # Example
//!
//! ```no_run
//! use ruleforge::sheet::{read_sheet, SheetFormat};
//! use ruleforge::table::{extract_rules, write_rules};
//!
//! let bytes = std::fs::read("tables/discount.xlsx")?;
//! let rows = read_sheet(&bytes, SheetFormat::Xlsx)?;
//! let rules = extract_rules(&rows);
//!
//! println!("Rules: {}", rules.len());
//!
//! let regenerated = write_rules(&bytes, SheetFormat::Xlsx, &rules)?;
//! std::fs::write("updated.xlsx", regenerated)?;
//! # Ok::<(), ruleforge::error::RuleError>(())
//! ```

pub mod api;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod git;
pub mod service;
pub mod sheet;
pub mod store;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{RuleError, RuleResult};
pub use store::RuleStore;
pub use types::{CellValue, RepoRef, Rule, RuleDraft, ValidationReport};
