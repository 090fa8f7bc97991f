//! The three-layer merge pipeline
//!
//! Turns per-document FieldInfo trees into a single unified Merger tree:
//!
//! 1. **Shape Planner** (`plan`) — pure decisions about array collapsing
//!    and object field preservation.
//! 2. **Object Strategy** (`object`) — field presence and nullability.
//! 3. **Plan Executor** (`executor`) — the mechanical walk that applies
//!    the plan to concrete data.

pub mod executor;
pub mod merger;
pub mod object;
pub mod plan;

pub use executor::execute_merge;
pub use merger::Merger;
pub use plan::{plan_shape, unify_plans, ArrayStrategy, MergePlan};
