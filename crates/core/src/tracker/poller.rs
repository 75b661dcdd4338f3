//! Request lifecycle tracker.
//!
//! Polls the dispatch backend for the status of one booking or report and
//! drives the session to a terminal outcome:
//! - Status poll: fixed-interval network reads, bounded retry on failure
//! - Phase rotation: fixed-interval cosmetic ticks, no I/O
//!
//! The two timers are independent; only the poll loop reaching a terminal
//! status (or its failure bound) stops the rotation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::auth::Credential;
use crate::dispatch::{DispatchClient, TrackedRequest};

use super::config::TrackerConfig;
use super::types::{Phase, TrackerError, TrackerEvent, TrackerState};

/// Tracks one request's lifecycle against the dispatch backend.
///
/// The credential is an explicit constructor argument with a lifetime tied
/// to the session; the tracker never mutates it and never reads ambient
/// auth state.
pub struct RequestTracker {
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    request: TrackedRequest,
    config: TrackerConfig,

    // Runtime state
    running: Arc<AtomicBool>,
    state: Arc<RwLock<TrackerState>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl RequestTracker {
    /// Create a new tracker. No timers exist until `start()` is called.
    pub fn new(
        client: Arc<dyn DispatchClient>,
        credential: Credential,
        request: TrackedRequest,
        config: TrackerConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            client,
            credential,
            request,
            config,
            running: Arc::new(AtomicBool::new(false)),
            state: Arc::new(RwLock::new(TrackerState::Idle)),
            shutdown_tx,
        }
    }

    /// Begin tracking.
    ///
    /// Validates preconditions before any timer or network activity, then
    /// spawns the poll loop and the phase rotation loop. Returns the event
    /// stream for the presenter. The first status poll happens one full
    /// interval after this call.
    pub async fn start(&self) -> Result<mpsc::UnboundedReceiver<TrackerEvent>, TrackerError> {
        if self.request.id.trim().is_empty() {
            return Err(TrackerError::MissingRequestId);
        }
        if self.credential.is_empty() {
            return Err(TrackerError::MissingCredential);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!(id = %self.request.id, "tracker already running");
            return Err(TrackerError::AlreadyTracking);
        }

        *self.state.write().await = TrackerState::Polling;

        info!(
            id = %self.request.id,
            kind = self.request.kind.as_str(),
            "tracking started"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        self.spawn_phase_loop(tx.clone());
        self.spawn_poll_loop(tx);

        Ok(rx)
    }

    /// Stop tracking. Idempotent; releases both timers. In-flight poll
    /// results are discarded once this returns.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let _ = self.shutdown_tx.send(());

        let mut state = self.state.write().await;
        if *state == TrackerState::Polling {
            *state = TrackerState::Idle;
        }

        info!(id = %self.request.id, "tracking stopped");
    }

    /// Whether the tracker is actively polling.
    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> TrackerState {
        *self.state.read().await
    }

    /// The request being tracked.
    pub fn request(&self) -> &TrackedRequest {
        &self.request
    }

    /// Spawn the cosmetic phase rotation loop.
    fn spawn_phase_loop(&self, tx: mpsc::UnboundedSender<TrackerEvent>) {
        let running = Arc::clone(&self.running);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let interval = self.config.phase_interval();
        let count = self.config.phase_count;
        let id = self.request.id.clone();

        tokio::spawn(async move {
            debug!(id = %id, "phase rotation started");
            let mut phase = Phase::first();
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        phase = phase.next(count);
                        let _ = tx.send(TrackerEvent::Phase(phase));
                    }
                }
            }
            debug!(id = %id, "phase rotation stopped");
        });
    }

    /// Spawn the status poll loop.
    fn spawn_poll_loop(&self, tx: mpsc::UnboundedSender<TrackerEvent>) {
        let client = Arc::clone(&self.client);
        let credential = self.credential.clone();
        let request = self.request.clone();
        let running = Arc::clone(&self.running);
        let state = Arc::clone(&self.state);
        let shutdown_tx = self.shutdown_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let interval = self.config.poll_interval_for(request.kind);
        let bound = self.config.failure_bound;

        tokio::spawn(async move {
            debug!(id = %request.id, "status poll loop started");
            // Owned by the loop so increments survive across ticks.
            let mut consecutive_failures: u32 = 0;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }

                        let result = client.status_of(&request, &credential).await;

                        // The tracker may have been stopped while the
                        // request was in flight; discard the result then.
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }

                        match result {
                            Ok(status) => {
                                consecutive_failures = 0;

                                if status.is_success_terminal(request.kind) {
                                    info!(
                                        id = %request.id,
                                        status = status.as_str(),
                                        "request assigned"
                                    );
                                    Self::finish(&running, &state, &shutdown_tx, TrackerState::Succeeded).await;
                                    let _ = tx.send(TrackerEvent::Succeeded { status });
                                    break;
                                }

                                if status.is_cancelled_terminal() {
                                    info!(id = %request.id, "request cancelled server-side");
                                    Self::finish(&running, &state, &shutdown_tx, TrackerState::Cancelled).await;
                                    let _ = tx.send(TrackerEvent::Cancelled);
                                    break;
                                }

                                let _ = tx.send(TrackerEvent::StatusObserved(status));
                            }
                            Err(e) => {
                                consecutive_failures += 1;
                                debug!(
                                    id = %request.id,
                                    failures = consecutive_failures,
                                    error = %e,
                                    "status poll failed"
                                );

                                if consecutive_failures >= bound {
                                    warn!(
                                        id = %request.id,
                                        bound,
                                        "failure bound reached, aborting tracking"
                                    );
                                    Self::finish(&running, &state, &shutdown_tx, TrackerState::Failed).await;
                                    let _ = tx.send(TrackerEvent::Failed {
                                        reason: e.to_string(),
                                    });
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            debug!(id = %request.id, "status poll loop stopped");
        });
    }

    /// Record a terminal outcome and stop both loops.
    async fn finish(
        running: &AtomicBool,
        state: &RwLock<TrackerState>,
        shutdown_tx: &broadcast::Sender<()>,
        outcome: TrackerState,
    ) {
        running.store(false, Ordering::SeqCst);
        *state.write().await = outcome;
        let _ = shutdown_tx.send(());
    }
}
