//! Parent Derivation
//!
//! The edge rule of the label DAG, computed algorithmically: the graph
//! is far too large to materialize, so "parents of X" is a pure function
//! of the identifier and the boundary depth.
//!
//! Below the boundary depth a node depends on its two one-bit extensions
//! (the "downward" edges). Exactly at the boundary depth the scatter rule
//! applies: one parent per 1-bit of the path, each the prefix up to that
//! bit with the bit cleared. The scattering across shorter, earlier
//! identifiers is what forces label computation to be sequential.

use crate::core::binary_id::{BinaryId, EncodingError};

/// Graph-parents of `id`, sorted by the identifier total order.
///
/// Precondition: `id.len() <= boundary_depth`. The construction never
/// derives parents past the boundary layer; requesting them is a usage
/// error.
pub fn parents(id: &BinaryId, boundary_depth: u8) -> Result<Vec<BinaryId>, EncodingError> {
    debug_assert!(
        id.len() <= boundary_depth,
        "parent derivation requested past the boundary depth"
    );

    if id.len() < boundary_depth {
        return Ok(vec![id.append_bit(0)?, id.append_bit(1)?]);
    }

    // Boundary layer: the 1-indexed bit positions holding a 1 each yield
    // a parent of that length, with the final bit cleared. The all-zero
    // identifier has no parents.
    let mut out = Vec::new();
    for (pos, bit) in id.bits().enumerate() {
        if bit == 1 {
            let prefix_len = pos as u8 + 1;
            let prefix = id.value() >> (id.len() - prefix_len);
            out.push(BinaryId::new(prefix_len, prefix & !1)?);
        }
    }

    // Deterministic hash input ordering, independent of discovery order.
    out.sort();
    Ok(out)
}
