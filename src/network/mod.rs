//! Network Layer
//!
//! The transport boundary of the prover: wire messages, the protocol
//! state machine, and the WebSocket server. All proof computation lives
//! in `dag/` and `proof/`; this layer only sequences and ships it.

pub mod protocol;
pub mod session;
pub mod server;

pub use protocol::{
    ClientMessage, ServerMessage, CommitRequest, ChallengeRequest,
    CommitProofInfo, ChallengeProofInfo, ServerError, ErrorCode,
};
pub use session::{ProverSession, ProverState, SessionConfig, SessionError};
pub use server::{ProverServer, ServerConfig, ProverServerError};
