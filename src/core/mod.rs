//! Core Primitives
//!
//! Deterministic building blocks: identifier arithmetic, the hashing
//! capability, and the validated protocol parameter set. Nothing in this
//! module touches the filesystem or the network.

pub mod binary_id;
pub mod hash;
pub mod params;

pub use binary_id::{BinaryId, EncodingError, MAX_LENGTH};
pub use hash::{Label, LabelHasher, Sha256LabelHasher, LABEL_SIZE};
pub use params::{ProtocolParams, ParamsError};
