//! Ruleforge API Server module
//!
//! Provides the HTTP REST surface over the rule cache: CRUD, fetch from a
//! repository, validate, publish, pull request.
//! Run with `ruleforge-server`.

pub mod handlers;
pub mod server;

pub use server::run_api_server;
