use thiserror::Error;

pub type RuleResult<T> = Result<T, RuleError>;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported spreadsheet format '{0}': only .xls and .xlsx are supported")]
    UnsupportedFormat(String),

    #[error("spreadsheet error: {0}")]
    Sheet(String),

    #[error("not a decision table: {0}")]
    TemplateFormat(String),

    #[error("rule {0} not found")]
    NotFound(u64),

    #[error("no repository configured; fetch rules from a repository first")]
    NoRepository,

    #[error("no rules loaded; nothing to validate or publish")]
    EmptyCache,

    #[error("git operation failed: {0}")]
    Git(String),

    #[error("request to hosting provider failed: {0}")]
    Http(String),

    #[error("decision table compiler failed: {0}")]
    Compiler(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}
