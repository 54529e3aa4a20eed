//! DAG Construction / Commit Proof
//!
//! One strictly-ordered pass over the identifier space: every boundary
//! level label is resolved and persisted first, then each shallower level
//! in turn, finishing at length 1. The ordering is the protocol's
//! sequential-work guarantee; shortcutting it would break the hardness
//! property, so the pass is a plain loop, not a scheduler.

use crate::core::binary_id::BinaryId;
use crate::core::hash::{Label, LabelHasher};
use crate::core::params::ProtocolParams;
use crate::dag::labels::LabelComputer;
use crate::dag::store::LabelStore;
use crate::proof::ProofError;

/// Build the full label DAG for `commitment`, persisting every label, and
/// fold the two length-1 labels into the root digest (the commit proof).
///
/// On failure the store holds a partial DAG; the caller must discard it
/// and start a fresh session rather than resume.
pub fn build_dag<H: LabelHasher>(
    commitment: &[u8],
    params: &ProtocolParams,
    hasher: &H,
    store: &mut LabelStore,
) -> Result<Label, ProofError> {
    let mut computer = LabelComputer::new(commitment, hasher, params.boundary_depth());

    // Deepest level first: the boundary layer only references identifiers
    // at or above itself, and every shallower level needs its two children
    // already resolved.
    for length in (1..=params.boundary_depth()).rev() {
        for value in 0..(1u64 << length) {
            let id = BinaryId::new(length, value)?;
            let label = computer.label(&id)?;
            store.write(id.store_index(), &label)?;
        }
    }

    // The two length-1 labels are the children of the implicit top; the
    // memo already holds them.
    let left = computer.label(&BinaryId::new(1, 0)?)?;
    let right = computer.label(&BinaryId::new(1, 1)?)?;
    Ok(hasher.hash(commitment, &left, &right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::Sha256LabelHasher;

    fn id(length: u8, value: u64) -> BinaryId {
        BinaryId::new(length, value).unwrap()
    }

    fn params(m: u8, n: u8) -> ProtocolParams {
        ProtocolParams::new(m, n, 4).unwrap()
    }

    #[test]
    fn test_minimal_dag_end_to_end() {
        // Tree height 1, boundary depth 1, commitment "abc": "0" and "1"
        // are the only nodes. "0" is parentless; "1" depends on "0"; phi
        // folds both labels.
        let hasher = Sha256LabelHasher;
        let dir = tempfile::tempdir().unwrap();
        let p = params(1, 1);
        let mut store = LabelStore::create(dir.path(), p.store_capacity()).unwrap();

        let phi = build_dag(b"abc", &p, &hasher, &mut store).unwrap();

        let l0 = hasher.hash(b"abc", &id(1, 0).encode(), &[]);
        let l1 = hasher.hash(b"abc", &id(1, 1).encode(), &l0);
        assert_eq!(phi, hasher.hash(b"abc", &l0, &l1));

        assert_eq!(store.read(id(1, 0).store_index()).unwrap(), l0);
        assert_eq!(store.read(id(1, 1).store_index()).unwrap(), l1);
    }

    #[test]
    fn test_every_level_is_persisted() {
        let hasher = Sha256LabelHasher;
        let dir = tempfile::tempdir().unwrap();
        let p = params(4, 4);
        let mut store = LabelStore::create(dir.path(), p.store_capacity()).unwrap();

        build_dag(b"statement", &p, &hasher, &mut store).unwrap();

        for length in 1..=4u8 {
            for value in 0..(1u64 << length) {
                assert!(
                    store.contains(id(length, value).store_index()),
                    "missing label for ({}, {})",
                    length,
                    value
                );
            }
        }
        // The implicit root is never persisted.
        assert!(!store.contains(0));
    }

    #[test]
    fn test_root_digest_is_deterministic() {
        let hasher = Sha256LabelHasher;
        let dir = tempfile::tempdir().unwrap();
        let p = params(5, 5);

        let mut store_a = LabelStore::create(dir.path(), p.store_capacity()).unwrap();
        let mut store_b = LabelStore::create(dir.path(), p.store_capacity()).unwrap();

        let phi_a = build_dag(b"statement", &p, &hasher, &mut store_a).unwrap();
        let phi_b = build_dag(b"statement", &p, &hasher, &mut store_b).unwrap();
        assert_eq!(phi_a, phi_b);
    }

    #[test]
    fn test_commitment_bytes_bind_the_root() {
        let hasher = Sha256LabelHasher;
        let dir = tempfile::tempdir().unwrap();
        let p = params(4, 4);

        let mut store_a = LabelStore::create(dir.path(), p.store_capacity()).unwrap();
        let mut store_b = LabelStore::create(dir.path(), p.store_capacity()).unwrap();

        let phi_a = build_dag(b"statement", &p, &hasher, &mut store_a).unwrap();
        // Single-byte change in the commitment.
        let phi_b = build_dag(b"statemenu", &p, &hasher, &mut store_b).unwrap();
        assert_ne!(phi_a, phi_b);
    }
}
