//! Prover Session
//!
//! The protocol state machine that sequences one statement through
//! commit -> challenge -> opening. Each session owns at most one label
//! store and one memo; both are rebuilt from scratch for every new
//! commitment, so stale labels can never leak across statements.
//!
//! ```text
//! Start --submit_commitment--> Committed --read_commit_proof--> WaitingChallenge
//!   ^                                          |  (non-interactive sessions
//!   |                                          |   skip straight to ProofDone)
//!   +-- read_challenge_proof <-- ProofDone <-- submit_challenge
//! ```

use std::path::PathBuf;

use crate::core::hash::{Label, LabelHasher, Sha256LabelHasher};
use crate::core::params::ProtocolParams;
use crate::dag::store::{LabelStore, StoreError};
use crate::proof::{build_dag, build_nip_proof, open_challenge, ProofError};

/// Protocol state, as visible to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverState {
    /// Ready for a fresh commitment.
    Start,
    /// Commitment bound, root digest computed but not yet delivered.
    Committed,
    /// Root digest delivered; waiting for the verifier's challenge.
    WaitingChallenge,
    /// Opening proof computed but not yet delivered.
    ProofDone,
}

/// Configuration for a prover session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Protocol parameters for every statement this session proves.
    pub params: ProtocolParams,
    /// Directory for the session's label store files.
    pub data_dir: PathBuf,
    /// Derive the challenge set from `(phi, commitment)` instead of
    /// waiting for a verifier challenge.
    pub non_interactive: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            params: ProtocolParams::default(),
            data_dir: std::env::temp_dir(),
            non_interactive: false,
        }
    }
}

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Operation invoked out of protocol sequence. The session state is
    /// untouched.
    #[error("prover in state {state:?} cannot {op}")]
    WrongState {
        /// Rejected operation.
        op: &'static str,
        /// State the session was in.
        state: ProverState,
    },

    /// Proof engine failure (encoding, storage, or missing labels).
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Label store could not be created.
    #[error("label store failure: {0}")]
    Storage(#[from] StoreError),
}

/// Phase-private data: each state owns exactly what it needs, so a
/// completed or reset session cannot hold on to a stale store.
enum Phase {
    Start,
    Committed {
        commitment: Vec<u8>,
        phi: Label,
        store: LabelStore,
    },
    WaitingChallenge {
        store: LabelStore,
    },
    ProofDone {
        proof: Vec<u8>,
    },
}

impl Phase {
    fn state(&self) -> ProverState {
        match self {
            Phase::Start => ProverState::Start,
            Phase::Committed { .. } => ProverState::Committed,
            Phase::WaitingChallenge { .. } => ProverState::WaitingChallenge,
            Phase::ProofDone { .. } => ProverState::ProofDone,
        }
    }
}

/// One prover session: one statement at a time, one store per statement.
pub struct ProverSession<H: LabelHasher = Sha256LabelHasher> {
    config: SessionConfig,
    hasher: H,
    phase: Phase,
}

impl ProverSession<Sha256LabelHasher> {
    /// Create a session with the default SHA-256 hasher.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_hasher(config, Sha256LabelHasher)
    }
}

impl<H: LabelHasher> ProverSession<H> {
    /// Create a session with an injected hashing capability.
    pub fn with_hasher(config: SessionConfig, hasher: H) -> Self {
        Self {
            config,
            hasher,
            phase: Phase::Start,
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> ProverState {
        self.phase.state()
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Bind a commitment: build the label DAG in a fresh store and hold
    /// the root digest for delivery.
    ///
    /// Construction failures leave the session in `Start` with the
    /// partial store discarded.
    pub fn submit_commitment(&mut self, commitment: &[u8]) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Start) {
            return Err(SessionError::WrongState {
                op: "submit a commitment",
                state: self.phase.state(),
            });
        }

        let mut store = LabelStore::create(&self.config.data_dir, self.config.params.store_capacity())?;
        let phi = build_dag(commitment, &self.config.params, &self.hasher, &mut store)?;

        self.phase = Phase::Committed {
            commitment: commitment.to_vec(),
            phi,
            store,
        };
        Ok(())
    }

    /// Deliver the commit proof (root digest).
    ///
    /// Interactive sessions move on to `WaitingChallenge`; non-interactive
    /// sessions derive and open their own challenge set, moving straight
    /// to `ProofDone`.
    pub fn read_commit_proof(&mut self) -> Result<Label, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Start) {
            Phase::Committed { commitment, phi, store } => {
                if self.config.non_interactive {
                    // A failure here is session-fatal; the phase stays at
                    // Start and the store is dropped with this frame.
                    let proof = build_nip_proof(
                        &commitment,
                        &phi,
                        &self.config.params,
                        &self.hasher,
                        &store,
                    )?;
                    self.phase = Phase::ProofDone { proof };
                } else {
                    self.phase = Phase::WaitingChallenge { store };
                }
                Ok(phi)
            }
            other => {
                let state = other.state();
                self.phase = other;
                Err(SessionError::WrongState {
                    op: "read the commit proof",
                    state,
                })
            }
        }
    }

    /// Open the verifier's challenge point (canonical identifier bytes).
    ///
    /// Failures leave the session waiting, so a corrected challenge can
    /// still be submitted; storage failures mean the session should be
    /// discarded by the caller.
    pub fn submit_challenge(&mut self, gamma: &[u8]) -> Result<(), SessionError> {
        match &self.phase {
            Phase::WaitingChallenge { store } => {
                let proof = open_challenge(gamma, store)?;
                self.phase = Phase::ProofDone { proof };
                Ok(())
            }
            other => Err(SessionError::WrongState {
                op: "submit a challenge",
                state: other.state(),
            }),
        }
    }

    /// Deliver the opening proof and return to `Start`, ready for the
    /// next statement.
    pub fn read_challenge_proof(&mut self) -> Result<Vec<u8>, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Start) {
            Phase::ProofDone { proof } => Ok(proof),
            other => {
                let state = other.state();
                self.phase = other;
                Err(SessionError::WrongState {
                    op: "read the challenge proof",
                    state,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binary_id::BinaryId;
    use crate::core::hash::LABEL_SIZE;

    fn config(dir: &tempfile::TempDir, m: u8, n: u8, t: u32, nip: bool) -> SessionConfig {
        SessionConfig {
            params: ProtocolParams::new(m, n, t).unwrap(),
            data_dir: dir.path().to_path_buf(),
            non_interactive: nip,
        }
    }

    fn id(length: u8, value: u64) -> BinaryId {
        BinaryId::new(length, value).unwrap()
    }

    #[test]
    fn test_interactive_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 1, 1, 1, false));

        assert_eq!(session.state(), ProverState::Start);
        session.submit_commitment(b"abc").unwrap();
        assert_eq!(session.state(), ProverState::Committed);

        let phi = session.read_commit_proof().unwrap();
        assert_eq!(session.state(), ProverState::WaitingChallenge);

        session.submit_challenge(&id(1, 0).encode()).unwrap();
        assert_eq!(session.state(), ProverState::ProofDone);

        let proof = session.read_challenge_proof().unwrap();
        assert_eq!(session.state(), ProverState::Start);

        // The two-node DAG: proof is [label("0"), label("1")] and phi
        // folds exactly those labels.
        let hasher = Sha256LabelHasher;
        let l0 = hasher.hash(b"abc", &id(1, 0).encode(), &[]);
        let l1 = hasher.hash(b"abc", &id(1, 1).encode(), &l0);
        assert_eq!(phi, hasher.hash(b"abc", &l0, &l1));
        assert_eq!(proof[..LABEL_SIZE], l0);
        assert_eq!(proof[LABEL_SIZE..], l1);
    }

    #[test]
    fn test_non_interactive_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 4, 4, 5, true));

        session.submit_commitment(b"statement").unwrap();
        session.read_commit_proof().unwrap();
        assert_eq!(session.state(), ProverState::ProofDone);

        // A verifier challenge has no place in a non-interactive session.
        let err = session.submit_challenge(&id(4, 0).encode()).unwrap_err();
        assert!(matches!(err, SessionError::WrongState { .. }));

        let proof = session.read_challenge_proof().unwrap();
        // Five openings of five labels each.
        assert_eq!(proof.len(), 5 * 5 * LABEL_SIZE);
        assert_eq!(session.state(), ProverState::Start);
    }

    #[test]
    fn test_out_of_sequence_calls_have_no_effect() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 2, 2, 1, false));

        // Nothing is committed yet: every other operation is rejected and
        // the session stays usable.
        assert!(matches!(
            session.submit_challenge(&id(2, 1).encode()),
            Err(SessionError::WrongState { .. })
        ));
        assert!(matches!(
            session.read_commit_proof(),
            Err(SessionError::WrongState { .. })
        ));
        assert!(matches!(
            session.read_challenge_proof(),
            Err(SessionError::WrongState { .. })
        ));
        assert_eq!(session.state(), ProverState::Start);

        session.submit_commitment(b"abc").unwrap();
        assert!(matches!(
            session.submit_commitment(b"def"),
            Err(SessionError::WrongState { .. })
        ));
        assert_eq!(session.state(), ProverState::Committed);

        session.read_commit_proof().unwrap();
        assert!(matches!(
            session.read_commit_proof(),
            Err(SessionError::WrongState { .. })
        ));
        assert_eq!(session.state(), ProverState::WaitingChallenge);
    }

    #[test]
    fn test_fresh_store_per_commitment() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 3, 3, 1, false));

        session.submit_commitment(b"first").unwrap();
        let phi_first = session.read_commit_proof().unwrap();
        session.submit_challenge(&id(3, 4).encode()).unwrap();
        session.read_challenge_proof().unwrap();

        // Completing the flow released the first statement's store file.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        session.submit_commitment(b"second").unwrap();
        let phi_second = session.read_commit_proof().unwrap();
        assert_ne!(phi_first, phi_second);

        // Same statement again reproduces the original digest.
        session.submit_challenge(&id(3, 4).encode()).unwrap();
        session.read_challenge_proof().unwrap();
        session.submit_commitment(b"first").unwrap();
        assert_eq!(session.read_commit_proof().unwrap(), phi_first);
    }

    #[test]
    fn test_malformed_challenge_keeps_session_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 2, 2, 1, false));

        session.submit_commitment(b"abc").unwrap();
        session.read_commit_proof().unwrap();

        let err = session.submit_challenge(&[0xFF, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Proof(ProofError::Encoding(_))
        ));
        assert_eq!(session.state(), ProverState::WaitingChallenge);

        // A well-formed point still succeeds afterwards.
        session.submit_challenge(&id(2, 3).encode()).unwrap();
        assert_eq!(session.state(), ProverState::ProofDone);
    }

    #[test]
    fn test_challenge_for_unwritten_level_is_incomplete() {
        // Tree height 4 lays the store out past boundary depth 2; those
        // deeper slots exist but are never written.
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProverSession::new(config(&dir, 4, 2, 1, false));

        session.submit_commitment(b"abc").unwrap();
        session.read_commit_proof().unwrap();

        let err = session.submit_challenge(&id(4, 0).encode()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Proof(ProofError::Incomplete { .. })
        ));
    }
}
