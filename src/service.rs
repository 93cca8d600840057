//! Service-level orchestration of the fetch → edit → publish flow
//!
//! Owns the rule cache and the two external collaborators (template
//! provider and decision-table compiler), both injected so the HTTP layer
//! and tests can swap them.

use crate::compiler::{validate_decision_table, DecisionTableCompiler};
use crate::error::{RuleError, RuleResult};
use crate::git::TemplateProvider;
use crate::sheet::{read_sheet, SheetFormat};
use crate::store::RuleStore;
use crate::table::{extract_rules, write_rules};
use crate::types::{PublishRequest, RepoRef, Rule, ValidationReport};
use std::sync::Arc;

/// What publishing produced: either the branch that was pushed, or the
/// validation report that blocked the push.
#[derive(Debug)]
pub enum PublishOutcome {
    Pushed {
        branch: String,
        warnings: Vec<String>,
    },
    Blocked(ValidationReport),
}

pub struct RuleService {
    pub store: RuleStore,
    provider: Arc<dyn TemplateProvider>,
    compiler: Arc<dyn DecisionTableCompiler>,
}

impl RuleService {
    pub fn new(
        provider: Arc<dyn TemplateProvider>,
        compiler: Arc<dyn DecisionTableCompiler>,
    ) -> Self {
        Self {
            store: RuleStore::new(),
            provider,
            compiler,
        }
    }

    /// Fetch the decision table from a repository, extract its rules and
    /// replace the whole cache with them.
    pub fn fetch_rules(&self, repo: RepoRef) -> RuleResult<Vec<Rule>> {
        let format = SheetFormat::from_path(&repo.file_path)?;
        let bytes = self.provider.fetch_file(&repo)?;
        let rows = read_sheet(&bytes, format)?;
        let rules = extract_rules(&rows);
        self.store.replace_all(rules.clone(), repo);
        Ok(rules)
    }

    /// Regenerate the spreadsheet for the current cache contents against a
    /// freshly fetched template.
    fn render_against(&self, repo: &RepoRef) -> RuleResult<(Vec<u8>, SheetFormat)> {
        let format = SheetFormat::from_path(&repo.file_path)?;
        let template = self.provider.fetch_file(repo)?;
        let mut rules = self.store.list();
        if rules.is_empty() {
            return Err(RuleError::EmptyCache);
        }
        rules.sort_by_key(|r| r.id);
        let bytes = write_rules(&template, format, &rules)?;
        Ok((bytes, format))
    }

    /// Validate the current rules against the last-used repository's
    /// template. Precondition failure when no repository has been used yet.
    pub fn validate_current(&self) -> RuleResult<ValidationReport> {
        let repo = self.store.last_repo().ok_or(RuleError::NoRepository)?;
        let (bytes, format) = self.render_against(&repo)?;
        Ok(validate_decision_table(self.compiler.as_ref(), &bytes, format))
    }

    /// Write the current rules to the repository on a new branch.
    /// Validation errors block the push; warnings ride along with it.
    pub fn publish(&self, request: &PublishRequest) -> RuleResult<PublishOutcome> {
        let (bytes, format) = self.render_against(&request.repo)?;

        let report = validate_decision_table(self.compiler.as_ref(), &bytes, format);
        if !report.valid {
            return Ok(PublishOutcome::Blocked(report));
        }

        let branch = match &request.branch_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("rules/{}-update", chrono::Utc::now().timestamp()),
        };
        let message = request
            .commit_message
            .clone()
            .unwrap_or_else(|| "Update decision table rules".to_string());

        let branch = self
            .provider
            .push_branch(&request.repo, &bytes, &branch, &message)?;

        Ok(PublishOutcome::Pushed {
            branch,
            warnings: report.warnings,
        })
    }

    /// Open a pull request for a previously pushed branch; returns its URL.
    pub fn open_pull_request(
        &self,
        request: &PublishRequest,
        branch: &str,
        title: &str,
    ) -> RuleResult<String> {
        let description = request.description.as_deref().unwrap_or("");
        self.provider
            .open_pull_request(&request.repo, branch, title, description)
    }
}
