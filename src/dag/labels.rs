//! Label Computation
//!
//! Memoized recursion over the parent rule. The memo is owned by one
//! construction pass for one commitment; it guarantees every identifier
//! is hashed at most once despite the fan-out of shared sub-dependencies,
//! and it must never be shared across commitments.

use std::collections::HashMap;

use crate::core::binary_id::{BinaryId, EncodingError};
use crate::core::hash::{Label, LabelHasher, LABEL_SIZE};
use crate::dag::parents::parents;

/// Per-session label computer.
///
/// Recursion strictly descends into the parent set: boundary-layer
/// parents are always smaller in the identifier total order, and
/// below-boundary parents are resolved from already-memoized deeper
/// levels during an ordered construction pass, so the recursion always
/// terminates.
pub struct LabelComputer<'a, H: LabelHasher> {
    commitment: &'a [u8],
    hasher: &'a H,
    boundary_depth: u8,
    memo: HashMap<BinaryId, Label>,
}

impl<'a, H: LabelHasher> LabelComputer<'a, H> {
    /// Create a fresh computer (and memo) for one commitment.
    pub fn new(commitment: &'a [u8], hasher: &'a H, boundary_depth: u8) -> Self {
        Self {
            commitment,
            hasher,
            boundary_depth,
            memo: HashMap::new(),
        }
    }

    /// Label of `id` under this session's commitment.
    ///
    /// Pure and deterministic in `(commitment, id)`; repeated calls hit
    /// the memo.
    pub fn label(&mut self, id: &BinaryId) -> Result<Label, EncodingError> {
        if let Some(label) = self.memo.get(id) {
            return Ok(*label);
        }

        let parent_ids = parents(id, self.boundary_depth)?;
        let label = if parent_ids.is_empty() {
            self.hasher.hash(self.commitment, &id.encode(), &[])
        } else {
            let mut parent_labels = Vec::with_capacity(parent_ids.len() * LABEL_SIZE);
            for parent in &parent_ids {
                parent_labels.extend_from_slice(&self.label(parent)?);
            }
            self.hasher.hash(self.commitment, &id.encode(), &parent_labels)
        };

        self.memo.insert(*id, label);
        Ok(label)
    }

    /// Number of labels resolved so far.
    pub fn resolved(&self) -> usize {
        self.memo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use crate::core::hash::Sha256LabelHasher;

    fn id(length: u8, value: u64) -> BinaryId {
        BinaryId::new(length, value).unwrap()
    }

    /// Stand-in hasher that counts how often each node is hashed.
    struct CountingHasher {
        inner: Sha256LabelHasher,
        calls: RefCell<HashMap<Vec<u8>, usize>>,
    }

    impl CountingHasher {
        fn new() -> Self {
            Self {
                inner: Sha256LabelHasher,
                calls: RefCell::new(HashMap::new()),
            }
        }
    }

    impl LabelHasher for CountingHasher {
        fn hash(&self, commitment: &[u8], node: &[u8], parent_labels: &[u8]) -> Label {
            *self.calls.borrow_mut().entry(node.to_vec()).or_insert(0) += 1;
            self.inner.hash(commitment, node, parent_labels)
        }
    }

    #[test]
    fn test_label_is_deterministic() {
        let hasher = Sha256LabelHasher;
        let mut a = LabelComputer::new(b"commitment", &hasher, 4);
        let mut b = LabelComputer::new(b"commitment", &hasher, 4);

        for value in 0..(1u64 << 4) {
            let node = id(4, value);
            assert_eq!(a.label(&node).unwrap(), b.label(&node).unwrap());
        }
    }

    #[test]
    fn test_commitment_scopes_labels() {
        let hasher = Sha256LabelHasher;
        let mut a = LabelComputer::new(b"statement-a", &hasher, 3);
        let mut b = LabelComputer::new(b"statement-b", &hasher, 3);

        assert_ne!(a.label(&id(3, 5)).unwrap(), b.label(&id(3, 5)).unwrap());
    }

    #[test]
    fn test_parentless_node_hashes_empty_parent_segment() {
        let hasher = Sha256LabelHasher;
        let mut computer = LabelComputer::new(b"abc", &hasher, 3);

        let zero = id(3, 0);
        let expected = hasher.hash(b"abc", &zero.encode(), &[]);
        assert_eq!(computer.label(&zero).unwrap(), expected);
    }

    #[test]
    fn test_boundary_label_folds_sorted_parents() {
        let hasher = Sha256LabelHasher;
        let mut computer = LabelComputer::new(b"abc", &hasher, 1);

        // Boundary depth 1: "0" has no parents, "1" has the single parent "0".
        let l0 = computer.label(&id(1, 0)).unwrap();
        let l1 = computer.label(&id(1, 1)).unwrap();

        assert_eq!(l0, hasher.hash(b"abc", &id(1, 0).encode(), &[]));
        assert_eq!(l1, hasher.hash(b"abc", &id(1, 1).encode(), &l0));
    }

    #[test]
    fn test_memo_hashes_each_node_once() {
        let hasher = CountingHasher::new();
        let mut computer = LabelComputer::new(b"abc", &hasher, 6);

        // Resolve the whole boundary layer; shared sub-dependencies are
        // requested many times over.
        for value in 0..(1u64 << 6) {
            computer.label(&id(6, value)).unwrap();
        }

        for (node, count) in hasher.calls.borrow().iter() {
            assert_eq!(*count, 1, "node {:02x?} hashed {} times", node, count);
        }
    }

    #[test]
    fn test_interior_label_uses_children() {
        let hasher = Sha256LabelHasher;
        let mut computer = LabelComputer::new(b"abc", &hasher, 2);

        let left = computer.label(&id(2, 0b00)).unwrap();
        let right = computer.label(&id(2, 0b01)).unwrap();
        let mut concat = Vec::new();
        concat.extend_from_slice(&left);
        concat.extend_from_slice(&right);

        let expected = hasher.hash(b"abc", &id(1, 0).encode(), &concat);
        assert_eq!(computer.label(&id(1, 0)).unwrap(), expected);
    }
}
