//! Process-wide rule cache
//!
//! Holds exactly one generation of rules keyed by id, plus the repository
//! reference the generation was fetched from. Readers never observe a
//! partially replaced cache: `replace_all` swaps the whole map under the
//! write lock.

use crate::types::{RepoRef, Rule, RuleDraft};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

pub struct RuleStore {
    rules: RwLock<HashMap<u64, Rule>>,
    /// Counter for externally created rules. Independent of the 1..N batch
    /// ids assigned during extraction and never reset by `replace_all`, so
    /// a create after a fetch can collide with an extracted id (the insert
    /// then replaces that entry). Kept as-is; see DESIGN.md.
    next_id: AtomicU64,
    last_repo: RwLock<Option<RepoRef>>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            last_repo: RwLock::new(None),
        }
    }

    /// Atomically replace the whole cache with a freshly extracted batch,
    /// remembering where it came from.
    pub fn replace_all(&self, rules: Vec<Rule>, repo: RepoRef) {
        let map: HashMap<u64, Rule> = rules.into_iter().map(|r| (r.id, r)).collect();
        *self
            .rules
            .write()
            .unwrap_or_else(PoisonError::into_inner) = map;
        *self
            .last_repo
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(repo);
    }

    /// Snapshot of all rules; order is not guaranteed.
    pub fn list(&self) -> Vec<Rule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<Rule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Insert a new rule under the next id from the cache-wide counter.
    pub fn create(&self, draft: RuleDraft) -> Rule {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let rule = Rule::from_draft(id, draft);
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, rule.clone());
        rule
    }

    /// Replace the content at an existing id; `None` when the id is absent.
    pub fn update(&self, id: u64, draft: RuleDraft) -> Option<Rule> {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        if !rules.contains_key(&id) {
            return None;
        }
        let rule = Rule::from_draft(id, draft);
        rules.insert(id, rule.clone());
        Some(rule)
    }

    /// Remove the entry if present; reports whether anything was removed.
    pub fn delete(&self, id: u64) -> bool {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// The repository the current generation was fetched from, if any.
    /// Validate and publish re-derive their template through this.
    pub fn last_repo(&self) -> Option<RepoRef> {
        self.last_repo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
