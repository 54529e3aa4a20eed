//! Proof Engine
//!
//! Everything between a commitment and an opening proof:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PROOF ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commit.rs    - DAG construction pass and root digest (phi) │
//! │  opening.rs   - sibling paths and challenge opening proofs  │
//! │  challenge.rs - non-interactive challenge derivation        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commit;
pub mod opening;
pub mod challenge;

pub use commit::build_dag;
pub use opening::{sibling_path, open_challenge};
pub use challenge::{derive_challenge_points, build_nip_proof};

use crate::core::binary_id::EncodingError;
use crate::dag::store::StoreError;

/// Errors from proof construction and challenge opening.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// Malformed identifier bytes or out-of-range length/value pair.
    /// Local input-validation failure; never retried.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Label persistence failed. Session-fatal; the partial DAG on disk
    /// must be discarded.
    #[error("label store failure: {0}")]
    Storage(StoreError),

    /// An opening touched an index the construction pass never wrote:
    /// either the challenge arrived before construction finished, or it
    /// targets a store built for a different commitment. The flow should
    /// be retried from the commitment.
    #[error("opening requires the unwritten label at index {index}")]
    Incomplete {
        /// Missing record index.
        index: u64,
    },
}

impl From<StoreError> for ProofError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { index } => ProofError::Incomplete { index },
            other => ProofError::Storage(other),
        }
    }
}
