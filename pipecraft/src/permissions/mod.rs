//! Permission accumulation for pipe execution roles.
//!
//! Each wiring decision (one source, one target, an optional enrichment)
//! implies a fixed set of actions on one resource. This module maps specs to
//! those grants and consolidates them into a deterministic policy.

mod accumulator;
mod action;
mod grant;

pub use accumulator::{
    consolidate, grant_for_enrichment, grant_for_source, grant_for_target, PermissionAccumulator,
};
pub use action::{actions_for, Action, ResourceRole};
pub use grant::{AccessGrant, Effect};
