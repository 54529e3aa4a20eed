//! Non-Interactive Challenges
//!
//! Replaces the verifier's random challenge with a pseudorandom set bound
//! to `(phi, commitment)`: each seed is `H(phi, commitment, i)`, reduced
//! to a boundary-depth identifier. The prover opens every derived point
//! itself, collapsing the protocol to a single round.

use crate::core::binary_id::{BinaryId, EncodingError};
use crate::core::hash::{Label, LabelHasher, LABEL_SIZE};
use crate::core::params::ProtocolParams;
use crate::dag::store::LabelStore;
use crate::proof::opening::open_point;
use crate::proof::ProofError;

/// Derive the challenge-point set for `(commitment, phi)`.
///
/// Deterministic: the verifier re-derives the same points from the same
/// inputs. Each point has length `boundary_depth`, value = the first
/// eight seed bytes (big-endian) reduced mod `2^boundary_depth`.
pub fn derive_challenge_points<H: LabelHasher>(
    commitment: &[u8],
    phi: &Label,
    params: &ProtocolParams,
    hasher: &H,
) -> Result<Vec<BinaryId>, EncodingError> {
    let depth = params.boundary_depth();
    let mask = u64::MAX >> (64 - u32::from(depth));

    let mut points = Vec::with_capacity(params.challenge_count() as usize);
    for i in 0..params.challenge_count() {
        let seed = hasher.hash(phi, commitment, &u64::from(i).to_be_bytes());
        let mut word = [0u8; 8];
        word.copy_from_slice(&seed[..8]);
        points.push(BinaryId::new(depth, u64::from_be_bytes(word) & mask)?);
    }
    Ok(points)
}

/// Assemble the non-interactive proof: the concatenated openings of every
/// derived challenge point, in derivation order.
pub fn build_nip_proof<H: LabelHasher>(
    commitment: &[u8],
    phi: &Label,
    params: &ProtocolParams,
    hasher: &H,
    store: &LabelStore,
) -> Result<Vec<u8>, ProofError> {
    let points = derive_challenge_points(commitment, phi, params, hasher)?;

    let opening_len = (params.boundary_depth() as usize + 1) * LABEL_SIZE;
    let mut proof = Vec::with_capacity(points.len() * opening_len);
    for point in &points {
        proof.extend_from_slice(&open_point(point, store)?);
    }
    Ok(proof)
}
