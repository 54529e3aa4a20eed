//! WebSocket Prover Service
//!
//! Async WebSocket front end for the prover. Every connection owns its
//! own prover session (and therefore its own label store), so concurrent
//! statements never share state. DAG construction is CPU-bound and runs
//! on the blocking pool.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock, broadcast};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn, error, debug, instrument};

use crate::core::hash::LABEL_SIZE;
use crate::network::protocol::{
    ClientMessage, ServerMessage, CommitProofInfo, ChallengeProofInfo,
    ServerError, ErrorCode,
};
use crate::network::session::{ProverSession, SessionConfig, SessionError};
use crate::proof::ProofError;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Idle timeout before a connection is dropped.
    pub connection_timeout: Duration,
    /// Session configuration handed to every connection.
    pub session: SessionConfig,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().expect("static bind address"),
            max_connections: 256,
            connection_timeout: Duration::from_secs(300),
            session: SessionConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Prover server errors.
#[derive(Debug, thiserror::Error)]
pub enum ProverServerError {
    /// Failed to bind to address.
    #[error("failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// The prover server.
pub struct ProverServer {
    /// Server configuration.
    config: ServerConfig,
    /// Connected clients with their last activity time.
    clients: Arc<RwLock<BTreeMap<SocketAddr, Instant>>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl ProverServer {
    /// Create a new prover server.
    pub fn new(config: ServerConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        }
    }

    /// Run the server.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), ProverServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Prover server listening on {}", self.config.bind_addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let client_count = self.clients.read().await.len();
                            if client_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // Register client
            clients.write().await.insert(addr, Instant::now());

            // One session per connection; its label store dies with it.
            let mut session = Some(ProverSession::new(config.session.clone()));

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            // Handle incoming messages
            loop {
                let next = tokio::time::timeout(config.connection_timeout, ws_receiver.next());
                tokio::select! {
                    msg = next => {
                        let msg = match msg {
                            Ok(m) => m,
                            Err(_) => {
                                info!("Client {} idle, dropping connection", addr);
                                break;
                            }
                        };
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let client_msg = match ClientMessage::from_json(&text) {
                                    Ok(m) => m,
                                    Err(e) => {
                                        debug!("Invalid message from {}: {}", addr, e);
                                        let _ = msg_tx.send(ServerMessage::Error(ServerError {
                                            code: ErrorCode::InvalidInput,
                                            message: "Invalid message format".to_string(),
                                        })).await;
                                        continue;
                                    }
                                };

                                clients.write().await.insert(addr, Instant::now());
                                Self::handle_client_message(
                                    addr, client_msg, &mut session, &config, &msg_tx,
                                ).await;
                            }
                            Some(Ok(Message::Binary(data))) => {
                                if let Ok(client_msg) = ClientMessage::from_bytes(&data) {
                                    clients.write().await.insert(addr, Instant::now());
                                    Self::handle_client_message(
                                        addr, client_msg, &mut session, &config, &msg_tx,
                                    ).await;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            // Cleanup
            sender_task.abort();
            clients.write().await.remove(&addr);
            info!("Client {} cleaned up", addr);
        });
    }

    /// Handle a client message.
    async fn handle_client_message(
        addr: SocketAddr,
        msg: ClientMessage,
        session: &mut Option<ProverSession>,
        config: &ServerConfig,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        match msg {
            ClientMessage::Commit(req) => {
                let Some(commitment) = req.commitment_bytes() else {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::InvalidInput,
                        message: "Commitment is not valid hex".to_string(),
                    })).await;
                    return;
                };

                let Some(mut active) = session.take() else {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::InternalError,
                        message: "Session unavailable".to_string(),
                    })).await;
                    return;
                };

                debug!("Client {} committing {} bytes", addr, commitment.len());

                // DAG construction is the long sequential pass; keep it
                // off the async threads.
                let non_interactive = config.session.non_interactive;
                let outcome = tokio::task::spawn_blocking(move || {
                    let result = (|| {
                        active.submit_commitment(&commitment)?;
                        let phi = active.read_commit_proof()?;
                        let nip_proof = if non_interactive {
                            Some(active.read_challenge_proof()?)
                        } else {
                            None
                        };
                        Ok::<_, SessionError>((phi, nip_proof))
                    })();
                    (active, result)
                }).await;

                match outcome {
                    Ok((active, result)) => {
                        *session = Some(active);
                        match result {
                            Ok((phi, nip_proof)) => {
                                let _ = sender.send(ServerMessage::CommitProof(CommitProofInfo {
                                    root_hash: hex::encode(phi),
                                })).await;
                                if let Some(proof) = nip_proof {
                                    let _ = sender.send(Self::challenge_proof_message(proof)).await;
                                }
                            }
                            Err(e) => {
                                warn!("Commit failed for {}: {}", addr, e);
                                let _ = sender.send(ServerMessage::Error(Self::session_error(&e))).await;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Commit task failed for {}: {}", addr, e);
                        *session = Some(ProverSession::new(config.session.clone()));
                        let _ = sender.send(ServerMessage::Error(ServerError {
                            code: ErrorCode::InternalError,
                            message: "Proving task failed".to_string(),
                        })).await;
                    }
                }
            }

            ClientMessage::Challenge(req) => {
                let Some(point) = req.point_bytes() else {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::InvalidInput,
                        message: "Challenge point is not valid hex".to_string(),
                    })).await;
                    return;
                };

                let Some(active) = session.as_mut() else {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::InternalError,
                        message: "Session unavailable".to_string(),
                    })).await;
                    return;
                };

                let result = active
                    .submit_challenge(&point)
                    .and_then(|_| active.read_challenge_proof());
                match result {
                    Ok(proof) => {
                        let _ = sender.send(Self::challenge_proof_message(proof)).await;
                    }
                    Err(e) => {
                        debug!("Challenge rejected for {}: {}", addr, e);
                        let _ = sender.send(ServerMessage::Error(Self::session_error(&e))).await;
                    }
                }
            }

            ClientMessage::Ping { timestamp } => {
                let _ = sender.send(ServerMessage::Pong {
                    timestamp,
                    server_time: std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap_or_default()
                        .as_millis() as u64,
                }).await;
            }
        }
    }

    /// Wrap an opening proof for the wire.
    fn challenge_proof_message(proof: Vec<u8>) -> ServerMessage {
        let label_count = (proof.len() / LABEL_SIZE) as u32;
        ServerMessage::ChallengeProof(ChallengeProofInfo {
            proof: hex::encode(proof),
            label_count,
        })
    }

    /// Map a session error onto the wire taxonomy.
    fn session_error(err: &SessionError) -> ServerError {
        let code = match err {
            SessionError::WrongState { .. } => ErrorCode::WrongState,
            SessionError::Proof(ProofError::Encoding(_)) => ErrorCode::InvalidInput,
            SessionError::Proof(ProofError::Incomplete { .. }) => ErrorCode::ProofIncomplete,
            SessionError::Proof(ProofError::Storage(_)) | SessionError::Storage(_) => {
                ErrorCode::StorageFailed
            }
        };
        ServerError {
            code,
            message: err.to_string(),
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
