//! Running a node on its own task.
//!
//! [`spawn_node`] moves a [`LocationNode`] into a Tokio task that owns it for the
//! rest of its life. Triggers, request completions and shutdown all arrive at
//! that task and are handled one at a time, which is what lets the node mutate
//! its pending table without locks.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::NODE_COMMAND_QUEUE_SIZE;
use crate::error_handling::NodeError;

use super::node::LocationNode;
use super::types::{Packet, RequestId, Trigger};

struct Command {
    trigger: Trigger,
    reply: oneshot::Sender<Result<RequestId, NodeError>>,
}

/// Cloneable handle to a spawned node.
///
/// The node closes when [`shutdown`](Self::shutdown) is called or when the last
/// handle is dropped.
#[derive(Clone)]
pub struct NodeHandle {
    commands: mpsc::Sender<Command>,
    pending: watch::Receiver<usize>,
    shutdown: CancellationToken,
}

/// Spawns the event loop driving `node`.
///
/// Returns the handle used to feed it triggers and the task's join handle,
/// which completes once the node has been closed.
pub fn spawn_node(node: LocationNode) -> (NodeHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(NODE_COMMAND_QUEUE_SIZE);
    let (pending_tx, pending_rx) = watch::channel(node.pending_len());
    let shutdown = CancellationToken::new();

    let task = tokio::spawn(run_node(node, commands_rx, pending_tx, shutdown.clone()));

    let handle = NodeHandle {
        commands: commands_tx,
        pending: pending_rx,
        shutdown,
    };
    (handle, task)
}

async fn run_node(
    mut node: LocationNode,
    mut commands: mpsc::Receiver<Command>,
    pending: watch::Sender<usize>,
    shutdown: CancellationToken,
) {
    log::info!("Location node started for {}", node.endpoint());

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            command = commands.recv() => {
                let Some(Command { trigger, reply }) = command else {
                    break;
                };
                let result = node.process(&trigger);
                if let Err(e) = &result {
                    log::warn!("Trigger {:?} failed: {}", trigger, e);
                }
                // Publish before replying so a caller waiting for idle sees the new request
                pending.send_replace(node.pending_len());
                let _ = reply.send(result);
            }

            Some(completion) = node.next_completion() => {
                node.on_completion(completion);
                pending.send_replace(node.pending_len());
            }
        }
    }

    let cancelled = node.close();
    pending.send_replace(0);
    log::info!(
        "Location node stopped ({} pending requests cancelled)",
        cancelled
    );
}

impl NodeHandle {
    /// Delivers a trigger and waits for the node to accept or reject it.
    ///
    /// # Errors
    ///
    /// Returns the node's error for the trigger, or [`NodeError::NodeClosed`]
    /// if the node is no longer running.
    pub async fn process(&self, trigger: Trigger) -> Result<RequestId, NodeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command {
                trigger,
                reply: reply_tx,
            })
            .await
            .map_err(|_| NodeError::NodeClosed)?;
        reply_rx.await.map_err(|_| NodeError::NodeClosed)?
    }

    /// Resolves the caller's own IP.
    pub async fn resolve_self(&self) -> Result<RequestId, NodeError> {
        self.process(Trigger::ResolveSelf).await
    }

    /// Resolves the address carried by `packet`.
    pub async fn resolve(&self, packet: impl Into<Packet>) -> Result<RequestId, NodeError> {
        self.process(Trigger::ResolveAddress(packet.into())).await
    }

    /// Number of requests currently pending in the node.
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Waits until no request is pending, or until the node stops.
    pub async fn wait_idle(&self) {
        let mut pending = self.pending.clone();
        let _ = pending.wait_for(|count| *count == 0).await;
    }

    /// Asks the node to cancel its pending requests and stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
