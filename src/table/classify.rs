//! Header label classification
//!
//! A pure, order-sensitive heuristic: case-insensitive substring match,
//! first match wins. Every label lands in exactly one role; anything
//! unrecognized falls into the condition bucket.

/// The role a spreadsheet column plays in a rule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRole {
    Name,
    Description,
    Condition,
    Action,
}

/// Classify a header label. Checked in priority order; labels matching
/// nothing default to `Condition`.
pub fn classify_header(label: &str) -> HeaderRole {
    let lower = label.to_lowercase();
    if lower.contains("name") || lower.contains("rule") {
        HeaderRole::Name
    } else if lower.contains("description") {
        HeaderRole::Description
    } else if lower.contains("condition") || lower.contains("when") || lower.contains("if") {
        HeaderRole::Condition
    } else if lower.contains("action") || lower.contains("then") || lower.contains("do") {
        HeaderRole::Action
    } else {
        HeaderRole::Condition
    }
}
