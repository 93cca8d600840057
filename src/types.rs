use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//==============================================================================
// Cell Values
//==============================================================================

/// A single condition or action value carried by a rule.
///
/// Untagged serde keeps the JSON shape natural: strings, numbers and
/// booleans map straight onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Textual form of the value, as shown in headers and rule names.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

//==============================================================================
// Rules
//==============================================================================

/// The canonical unit of business logic: one data row of a decision table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keyed by the originating column label, exact string, no normalization.
    #[serde(default)]
    pub conditions: HashMap<String, CellValue>,
    #[serde(default)]
    pub actions: HashMap<String, CellValue>,
    /// Not derived from spreadsheet content; carried for future use.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Rule {
    pub fn from_draft(id: u64, draft: RuleDraft) -> Self {
        let name = if draft.name.trim().is_empty() {
            format!("Rule {}", id)
        } else {
            draft.name
        };
        Self {
            id,
            name,
            description: draft.description,
            conditions: draft.conditions,
            actions: draft.actions,
            active: draft.active,
        }
    }
}

/// A rule as submitted by a caller: everything but the id, which the cache
/// assigns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub conditions: HashMap<String, CellValue>,
    #[serde(default)]
    pub actions: HashMap<String, CellValue>,
    #[serde(default = "default_active")]
    pub active: bool,
}

//==============================================================================
// Repository Coordinates
//==============================================================================

/// Where a decision table lives inside a hosted Git repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRef {
    pub url: String,
    pub branch: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Payload for publishing the current rule set back to the repository and
/// opening a pull request for it.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishRequest {
    pub repo: RepoRef,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

//==============================================================================
// Validation
//==============================================================================

/// Outcome of running the regenerated spreadsheet through the decision-table
/// compiler. Errors block publishing; warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
