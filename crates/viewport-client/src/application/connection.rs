//! Connection lifecycle for the live frame channel.
//!
//! The manager owns the frame-acquisition strategy for one session.  While
//! the push channel is healthy, the backend delivers frames as they render;
//! when the channel closes or errors with the session still active, the
//! manager degrades to periodic pull requests and keeps retrying the push
//! connect with exponential backoff until it recovers.  A session therefore
//! always has *some* acquisition strategy active until it is explicitly
//! torn down — transport failures are absorbed here and only ever surface
//! as a state change, never as an error to the caller.
//!
//! ```text
//! Disconnected ──session + connect ok──▶ LivePush
//!      ▲                                   │ channel lost
//!      │ teardown (any state)              ▼
//!      └───────────────────────────── Degraded ──reconnect ok──▶ LivePush
//!                                     (polling)
//! ```

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use viewport_core::{SessionId, StreamEvent};

/// Current frame-delivery strategy for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session, or the session has been torn down.
    Disconnected,
    /// Push channel open; the backend delivers frames as they render.
    LivePush,
    /// Push delivery lost; frames are pulled on a fixed interval while
    /// reconnection is attempted in the background.
    Degraded,
}

/// Transport-level failures.  Always recoverable: they drive degradation,
/// never a fatal error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("push channel connect failed: {0}")]
    Connect(String),
    #[error("frame pull failed: {0}")]
    Pull(String),
}

/// A live stream of events pushed by the backend.
#[async_trait]
pub trait PushStream: Send {
    /// Waits for the next event.  `None` means the channel closed or
    /// errored; the caller decides whether that is a loss or a teardown.
    async fn next_event(&mut self) -> Option<StreamEvent>;
}

/// Opens push channels to the backend.
#[async_trait]
pub trait PushChannel: Send + Sync {
    async fn connect(&self, session: &SessionId) -> Result<Box<dyn PushStream>, TransportError>;
}

/// Pulls the most recent frame over the request/response surface.
#[async_trait]
pub trait FramePuller: Send + Sync {
    async fn fetch_latest(&self, session: &SessionId) -> Result<StreamEvent, TransportError>;
}

/// Timing knobs for the degraded strategy.
#[derive(Debug, Clone)]
pub struct ConnectionTuning {
    /// Gap between pull requests while degraded.
    pub poll_interval: Duration,
    /// First reconnect delay; doubles per failed attempt.
    pub backoff_floor: Duration,
    /// Upper bound on the reconnect delay.
    pub backoff_ceiling: Duration,
}

impl Default for ConnectionTuning {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_000),
            backoff_floor: Duration::from_millis(500),
            backoff_ceiling: Duration::from_secs(10),
        }
    }
}

/// Caller-side handle: observes the connection state and triggers teardown.
#[derive(Debug)]
pub struct ConnectionHandle {
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
}

impl ConnectionHandle {
    /// The state at this instant.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// A receiver for observing state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Requests teardown.  The manager cancels polling and any pending
    /// reconnect attempt, publishes `Disconnected`, and its `run` future
    /// completes.  Dropping the last handle has the same effect.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Outcome of pumping the push stream.
enum PushOutcome {
    /// The stream ended while the session is still wanted.
    Lost,
    /// Teardown was requested or the session ended; stop entirely.
    SessionOver,
}

/// Outcome of the degraded poll-and-retry loop.
enum Acquired {
    Stream(Box<dyn PushStream>),
    SessionOver,
}

/// Owns the frame-acquisition strategy for one session.
pub struct ConnectionManager<P, F> {
    session: SessionId,
    push: P,
    puller: F,
    tuning: ConnectionTuning,
    state_tx: watch::Sender<ConnectionState>,
    frames_tx: mpsc::Sender<StreamEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<P: PushChannel, F: FramePuller> ConnectionManager<P, F> {
    /// Creates a manager for `session` together with its handle and the
    /// frame event receiver the presentation side consumes.
    pub fn new(
        session: SessionId,
        push: P,
        puller: F,
        tuning: ConnectionTuning,
    ) -> (Self, ConnectionHandle, mpsc::Receiver<StreamEvent>) {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (frames_tx, frames_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let manager = Self {
            session,
            push,
            puller,
            tuning,
            state_tx,
            frames_tx,
            shutdown_rx,
        };
        let handle = ConnectionHandle {
            state_rx,
            shutdown_tx,
        };
        (manager, handle, frames_rx)
    }

    /// Runs the acquisition strategy until teardown or session end.
    ///
    /// Transport failures never escape this future; they are logged and
    /// drive the state machine.
    pub async fn run(self) {
        let Self {
            session,
            push,
            puller,
            tuning,
            state_tx,
            frames_tx,
            mut shutdown_rx,
        } = self;

        let mut degraded = false;
        'session: loop {
            if *shutdown_rx.borrow() {
                break;
            }

            // Acquire a push stream: one direct attempt when delivery was
            // healthy a moment ago, otherwise the degraded poll-and-retry
            // loop where every wait is interruptible.
            let mut stream = if degraded {
                match run_degraded(&push, &puller, &session, &tuning, &frames_tx, &mut shutdown_rx)
                    .await
                {
                    Acquired::Stream(stream) => stream,
                    Acquired::SessionOver => break 'session,
                }
            } else {
                let connect = tokio::select! {
                    _ = shutdown_rx.changed() => break 'session,
                    result = push.connect(&session) => result,
                };
                match connect {
                    Ok(stream) => stream,
                    Err(e) => {
                        warn!(session = %session, "push channel unavailable: {e}");
                        let _ = state_tx.send(ConnectionState::Degraded);
                        degraded = true;
                        match run_degraded(
                            &push,
                            &puller,
                            &session,
                            &tuning,
                            &frames_tx,
                            &mut shutdown_rx,
                        )
                        .await
                        {
                            Acquired::Stream(stream) => stream,
                            Acquired::SessionOver => break 'session,
                        }
                    }
                }
            };

            degraded = false;
            let _ = state_tx.send(ConnectionState::LivePush);
            info!(session = %session, "push delivery live");

            match pump_push(&mut *stream, &frames_tx, &mut shutdown_rx).await {
                PushOutcome::Lost => {
                    warn!(session = %session, "push channel lost; degrading to polling");
                    let _ = state_tx.send(ConnectionState::Degraded);
                    degraded = true;
                }
                PushOutcome::SessionOver => break 'session,
            }
        }

        let _ = state_tx.send(ConnectionState::Disconnected);
        debug!(session = %session, "connection manager stopped");
    }
}

/// Forwards pushed events until the stream ends, teardown is requested, or
/// the backend closes the session.
async fn pump_push(
    stream: &mut dyn PushStream,
    frames_tx: &mpsc::Sender<StreamEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> PushOutcome {
    loop {
        let event = tokio::select! {
            _ = shutdown_rx.changed() => return PushOutcome::SessionOver,
            event = stream.next_event() => event,
        };
        match event {
            Some(StreamEvent::SessionClosed { reason }) => {
                info!("backend closed the session: {reason}");
                let _ = frames_tx
                    .send(StreamEvent::SessionClosed { reason })
                    .await;
                return PushOutcome::SessionOver;
            }
            Some(event) => {
                if frames_tx.send(event).await.is_err() {
                    // Consumer went away; nobody is left to render for.
                    return PushOutcome::SessionOver;
                }
            }
            None => return PushOutcome::Lost,
        }
    }
}

/// The degraded strategy: periodic pulls plus reconnect attempts with
/// exponential backoff, both cancellable by teardown.
async fn run_degraded<P: PushChannel, F: FramePuller>(
    push: &P,
    puller: &F,
    session: &SessionId,
    tuning: &ConnectionTuning,
    frames_tx: &mpsc::Sender<StreamEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> Acquired {
    let mut poll = tokio::time::interval(tuning.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut backoff = tuning.backoff_floor;
    let retry = tokio::time::sleep(backoff);
    tokio::pin!(retry);

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => return Acquired::SessionOver,
            _ = poll.tick() => {
                match puller.fetch_latest(session).await {
                    Ok(StreamEvent::SessionClosed { reason }) => {
                        info!("backend reported the session closed: {reason}");
                        let _ = frames_tx.send(StreamEvent::SessionClosed { reason }).await;
                        return Acquired::SessionOver;
                    }
                    Ok(event) => {
                        if frames_tx.send(event).await.is_err() {
                            return Acquired::SessionOver;
                        }
                    }
                    // Pull failures are retried on the next tick.
                    Err(e) => debug!(session = %session, "frame pull failed: {e}"),
                }
            }
            _ = &mut retry => {
                match push.connect(session).await {
                    Ok(stream) => return Acquired::Stream(stream),
                    Err(e) => {
                        debug!(session = %session, "push reconnect failed: {e}");
                        backoff = (backoff * 2).min(tuning.backoff_ceiling);
                        retry.as_mut().reset(tokio::time::Instant::now() + backoff);
                    }
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
