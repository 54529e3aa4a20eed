//! Label Hashing
//!
//! The hashing capability consumed by the graph and proof engines:
//! `H(commitment, node, parent_labels) -> label`. The concrete algorithm
//! is a deployment choice behind [`LabelHasher`]; the default is SHA-256
//! with a domain separator. The protocol only assumes collision
//! resistance and avalanche behavior.

use sha2::{Sha256, Digest};

/// Label size in bytes (hash output size).
pub const LABEL_SIZE: usize = 32;

/// A node label: the hash digest assigned to one identifier under one
/// commitment.
pub type Label = [u8; LABEL_SIZE];

/// Domain separator for label derivation.
const LABEL_DOMAIN: &[u8] = b"POSW_LABEL_V1";

/// Hashing capability injected into label computation.
///
/// Implementations must be deterministic; the same `(commitment, node,
/// parent_labels)` triple always yields the same label. The same function
/// is reused to fold the root digest and to derive non-interactive
/// challenge seeds.
pub trait LabelHasher {
    /// Hash a commitment, a node encoding, and the concatenated parent
    /// labels into one label.
    fn hash(&self, commitment: &[u8], node: &[u8], parent_labels: &[u8]) -> Label;
}

/// SHA-256 label hasher with domain separation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256LabelHasher;

impl LabelHasher for Sha256LabelHasher {
    fn hash(&self, commitment: &[u8], node: &[u8], parent_labels: &[u8]) -> Label {
        let mut hasher = Sha256::new();
        hasher.update(LABEL_DOMAIN);
        hasher.update(commitment);
        hasher.update(node);
        hasher.update(parent_labels);
        hasher.finalize().into()
    }
}
