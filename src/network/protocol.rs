//! Protocol Messages
//!
//! Wire format for the prover session boundary over WebSocket. Messages
//! are serialized as JSON for debugging ease, with optional binary
//! (bincode) for production. Byte fields travel hex-encoded in the JSON
//! form.

use serde::{Serialize, Deserialize};

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from a verifier-side client to the prover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Begin proving: submit the commitment to bind.
    Commit(CommitRequest),

    /// Submit a challenge point against the delivered root digest.
    Challenge(ChallengeRequest),

    /// Ping for latency measurement.
    Ping { timestamp: u64 },
}

/// Commitment submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Commitment bytes, hex encoded.
    pub commitment: String,
}

impl CommitRequest {
    /// Decode the commitment from its hex form.
    pub fn commitment_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.commitment).ok()
    }
}

/// Challenge submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeRequest {
    /// Challenge point: a canonical identifier encoding, hex encoded.
    pub point: String,
}

impl ChallengeRequest {
    /// Decode the challenge point from its hex form.
    pub fn point_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.point).ok()
    }
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from the prover to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The commit proof (root digest) for the submitted commitment.
    CommitProof(CommitProofInfo),

    /// An opening proof, interactive or non-interactive.
    ChallengeProof(ChallengeProofInfo),

    /// Pong response.
    Pong { timestamp: u64, server_time: u64 },

    /// Error message.
    Error(ServerError),

    /// Server is shutting down.
    Shutdown { reason: String },
}

/// Commit proof delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitProofInfo {
    /// Root digest (phi), hex encoded.
    pub root_hash: String,
}

/// Opening proof delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeProofInfo {
    /// Concatenated fixed-size labels, hex encoded.
    pub proof: String,
    /// Number of labels in the proof.
    pub label_count: u32,
}

/// Server error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed message or undecodable byte field.
    InvalidInput,
    /// Protocol operation out of sequence.
    WrongState,
    /// Opening touched a label the construction never wrote.
    ProofIncomplete,
    /// Label persistence failed; the session was discarded.
    StorageFailed,
    /// Server overloaded.
    ServerOverloaded,
    /// Internal error.
    InternalError,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
