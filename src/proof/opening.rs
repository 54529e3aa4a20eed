//! Challenge Openings
//!
//! A challenged identifier is opened by revealing its own label followed
//! by the label of each ancestor's sibling on the walk to the top. Every
//! lookup goes through the identifier's own `(length, value)` store
//! index; the path is a pure function of the challenge point.

use crate::core::binary_id::BinaryId;
use crate::core::hash::LABEL_SIZE;
use crate::dag::store::LabelStore;
use crate::proof::ProofError;

/// The opening path of `id`: the identifier itself, then the sibling met
/// at each step of the walk toward the top.
///
/// Always exactly `id.len() + 1` entries; the first is `id`.
pub fn sibling_path(id: &BinaryId) -> Vec<BinaryId> {
    let mut path = Vec::with_capacity(id.len() as usize + 1);
    path.push(*id);

    let mut cur = *id;
    while let (Some(sibling), Some(parent)) = (cur.sibling(), cur.truncate_last()) {
        path.push(sibling);
        cur = parent;
    }
    path
}

/// Open a challenge point given as a canonical identifier encoding.
///
/// The proof is the concatenation of the labels along [`sibling_path`],
/// self first, read back from the session's store.
pub fn open_challenge(gamma: &[u8], store: &LabelStore) -> Result<Vec<u8>, ProofError> {
    let id = BinaryId::from_bytes(gamma)?;
    open_point(&id, store)
}

/// Open an already-decoded challenge point.
pub(crate) fn open_point(id: &BinaryId, store: &LabelStore) -> Result<Vec<u8>, ProofError> {
    let path = sibling_path(id);
    let mut proof = Vec::with_capacity(path.len() * LABEL_SIZE);
    for node in &path {
        proof.extend_from_slice(&store.read(node.store_index())?);
    }
    Ok(proof)
}
