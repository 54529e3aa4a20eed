//! Graph Engine
//!
//! The label DAG as an algorithm instead of a data structure: the parent
//! rule derives edges on demand, the label computer memoizes one
//! session's recursion, and the label store persists records for the
//! challenge phase.

pub mod parents;
pub mod labels;
pub mod store;

pub use parents::parents;
pub use labels::LabelComputer;
pub use store::{LabelStore, StoreError};
