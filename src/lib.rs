//! # PoSW Prover Service
//!
//! Prover side of a proof-of-sequential-work protocol: bind a commitment
//! to a large hash-dependency DAG whose labels can only be computed
//! layer by layer, publish the short root digest, then answer challenges
//! by revealing small opening paths of labels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     POSW PROVER SERVICE                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── binary_id.rs  - Bit-string identifier arithmetic        │
//! │  ├── hash.rs       - Label hashing capability (SHA-256)      │
//! │  └── params.rs     - Validated protocol parameters           │
//! │                                                              │
//! │  dag/              - Graph engine (deterministic)            │
//! │  ├── parents.rs    - Algorithmic edge derivation             │
//! │  ├── labels.rs     - Memoized recursive label computation    │
//! │  └── store.rs      - Offset-addressed label persistence      │
//! │                                                              │
//! │  proof/            - Proof engine (deterministic)            │
//! │  ├── commit.rs     - DAG construction and root digest        │
//! │  ├── opening.rs    - Sibling paths and opening proofs        │
//! │  └── challenge.rs  - Non-interactive challenge derivation    │
//! │                                                              │
//! │  network/          - Transport boundary (non-deterministic)  │
//! │  ├── protocol.rs   - Wire messages                           │
//! │  ├── session.rs    - Prover protocol state machine           │
//! │  └── server.rs     - WebSocket server                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sequential-Work Guarantee
//!
//! The `dag/` and `proof/` modules are **100% deterministic**: the same
//! commitment and parameters always produce the same root digest and
//! opening proofs on any platform. Construction resolves the deepest
//! identifier layer first and climbs one level at a time; the scatter
//! edges injected at the boundary depth make that order mandatory, which
//! is exactly the property the protocol sells.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod dag;
pub mod proof;
pub mod network;

// Re-export commonly used types
pub use crate::core::binary_id::{BinaryId, EncodingError};
pub use crate::core::hash::{Label, LabelHasher, Sha256LabelHasher, LABEL_SIZE};
pub use crate::core::params::{ProtocolParams, ParamsError};
pub use crate::dag::store::{LabelStore, StoreError};
pub use crate::proof::ProofError;
pub use crate::network::session::{ProverSession, ProverState, SessionConfig, SessionError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
