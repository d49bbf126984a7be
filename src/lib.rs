//! API group rewriter for Kubernetes manifests
//!
//! Moves CustomResourceDefinitions, RBAC roles and custom resources from one
//! API group to another in a stream of YAML documents.

pub mod cli;
pub mod document;
pub mod error;
pub mod rewriter;

pub use error::{Error, Result};
pub use rewriter::{Outcome, RewriteConfig, Rewriter, Rule, RunSummary};
