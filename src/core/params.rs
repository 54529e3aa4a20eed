//! Protocol Parameters
//!
//! The immutable parameter set that scopes one proving session. Every
//! engine takes these explicitly; there are no ambient constants.

use crate::core::binary_id::MAX_LENGTH;

/// Errors from parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// Tree height outside `1..=MAX_LENGTH`.
    #[error("tree height {0} is outside 1..={max}", max = MAX_LENGTH)]
    TreeHeight(u8),

    /// Boundary depth outside `1..=tree_height`.
    #[error("boundary depth {boundary_depth} is outside 1..=tree_height ({tree_height})")]
    BoundaryDepth {
        /// Rejected boundary depth.
        boundary_depth: u8,
        /// Configured tree height.
        tree_height: u8,
    },

    /// Challenge count of zero.
    #[error("challenge count must be at least 1")]
    ChallengeCount,
}

/// Validated parameters for one proving session.
///
/// `boundary_depth <= tree_height` is a documented precondition of the
/// underlying construction; the label DAG spans identifier lengths
/// `1..=boundary_depth`, while `tree_height` sizes the store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolParams {
    /// Tree height `m`: bounds the store index space at `2^(m+1) - 1`
    /// record slots.
    tree_height: u8,
    /// Boundary depth `n`: the identifier length where scatter parent
    /// edges replace the two-child rule.
    boundary_depth: u8,
    /// Challenge count `t`: number of non-interactive challenge points.
    challenge_count: u32,
}

impl ProtocolParams {
    /// Build a validated parameter set.
    pub fn new(tree_height: u8, boundary_depth: u8, challenge_count: u32) -> Result<Self, ParamsError> {
        if tree_height == 0 || tree_height > MAX_LENGTH {
            return Err(ParamsError::TreeHeight(tree_height));
        }
        if boundary_depth == 0 || boundary_depth > tree_height {
            return Err(ParamsError::BoundaryDepth {
                boundary_depth,
                tree_height,
            });
        }
        if challenge_count == 0 {
            return Err(ParamsError::ChallengeCount);
        }
        Ok(Self {
            tree_height,
            boundary_depth,
            challenge_count,
        })
    }

    /// Tree height `m`.
    pub fn tree_height(&self) -> u8 {
        self.tree_height
    }

    /// Boundary depth `n`.
    pub fn boundary_depth(&self) -> u8 {
        self.boundary_depth
    }

    /// Challenge count `t`.
    pub fn challenge_count(&self) -> u32 {
        self.challenge_count
    }

    /// Number of record slots the store is laid out for: `2^(m+1) - 1`.
    pub fn store_capacity(&self) -> u64 {
        // Written as a right shift so tree_height = 63 does not overflow.
        u64::MAX >> (63 - self.tree_height)
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            tree_height: 16,
            boundary_depth: 16,
            challenge_count: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        let params = ProtocolParams::new(8, 8, 16).unwrap();
        assert_eq!(params.tree_height(), 8);
        assert_eq!(params.boundary_depth(), 8);
        assert_eq!(params.challenge_count(), 16);
        assert_eq!(params.store_capacity(), (1 << 9) - 1);
    }

    #[test]
    fn test_boundary_must_not_exceed_height() {
        assert_eq!(
            ProtocolParams::new(4, 5, 1),
            Err(ParamsError::BoundaryDepth { boundary_depth: 5, tree_height: 4 })
        );
        assert!(ProtocolParams::new(5, 4, 1).is_ok());
    }

    #[test]
    fn test_rejects_degenerate_params() {
        assert_eq!(ProtocolParams::new(0, 0, 1), Err(ParamsError::TreeHeight(0)));
        assert_eq!(ProtocolParams::new(64, 4, 1), Err(ParamsError::TreeHeight(64)));
        assert!(matches!(
            ProtocolParams::new(4, 0, 1),
            Err(ParamsError::BoundaryDepth { .. })
        ));
        assert_eq!(ProtocolParams::new(4, 4, 0), Err(ParamsError::ChallengeCount));
    }

    #[test]
    fn test_default_is_valid() {
        let d = ProtocolParams::default();
        assert!(ProtocolParams::new(d.tree_height(), d.boundary_depth(), d.challenge_count()).is_ok());
    }
}
