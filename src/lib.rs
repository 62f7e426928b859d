//! Reconciliation of product specifications extracted from independent
//! sources.
//!
//! The synchronous core lives in [`spec`], [`recovery`], [`text_block`] and
//! [`common_table`]; [`pipeline`] wires it to a model client and a page
//! source.

pub mod common_table;
pub mod environment;
pub mod error;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod reconcile;
pub mod recovery;
pub mod spec;
pub mod text_block;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";
pub const TARGET_PARSER: &str = "parser";

pub use error::EngineError;
pub use reconcile::{ReconciliationReport, Reconciler};
