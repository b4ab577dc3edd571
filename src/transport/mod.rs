//! # Transport Module
//!
//! Carries control values between the dashboard and the vehicle. Two link
//! variants exist, chosen per deployment:
//!
//! - **MQTT** ([`mqtt_link`]): publishes every stick value to the control
//!   topic and mirrors the vehicle's echo topic back into the gauges.
//! - **HTTP polling** ([`poll_link`]): periodically reads the vehicle's
//!   reported position (and the clock hands for the clock page) from a
//!   plain-text query endpoint.
//!
//! Both variants run inside a single supervised tokio task spawned by
//! [`LinkHandle::spawn`]. The UI never touches a socket; it talks to the
//! link exclusively through channels:
//!
//! ```text
//! UI ──mpsc ControlXY──►┐
//! UI ──mpsc LinkCommand─┤  link task  ──mpsc LinkEvent──► UI
//! UI ──watch DashConfig─┘
//! ```
//!
//! A configuration change tears the active link down and builds the new one
//! from scratch; cancellation ends the task. Link failures are absorbed:
//! they surface as a status line update and a rebuild after a short pause,
//! never as a crash; a dead broker or server degrades the page, it does
//! not take it down.

pub mod freshness;
pub mod mqtt_link;
pub mod poll_link;
pub mod wire;

pub use freshness::{FreshnessCounter, SignalQuality};

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::input::ControlXY;
use crate::persistence::{DashConfig, TransportMode};

/// Errors raised by the transport links.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Subscription error: {0}")]
    SubscriptionError(String),

    #[error("Publish error: {0}")]
    PublishError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

/// Connection lifecycle as shown on the status line.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
    Reconnecting,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
            ConnectionState::Reconnecting => "reconnecting",
        };
        write!(f, "{}", label)
    }
}

/// Link health snapshot for the UI status line.
#[derive(Clone, Debug, Default)]
pub struct LinkStatus {
    pub connection_state: ConnectionState,
    /// Last noteworthy event as a short human-readable string.
    pub detail: String,
    pub messages_received: usize,
    pub messages_sent: usize,
    pub last_activity: Option<DateTime<Local>>,
}

impl LinkStatus {
    pub fn note(&mut self, state: ConnectionState, detail: impl Into<String>) {
        self.connection_state = state;
        self.detail = detail.into();
        self.last_activity = Some(Local::now());
    }
}

/// Clock-hand rotations in degrees, as served by the time query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClockHands {
    pub hours_deg: f32,
    pub minutes_deg: f32,
    pub seconds_deg: f32,
}

/// Addressee of a system-exit command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTarget {
    Car,
    Controller,
}

impl ExitTarget {
    /// Literal wire payload understood by the remote side.
    pub fn payload(&self) -> &'static str {
        match self {
            ExitTarget::Car => "car",
            ExitTarget::Controller => "controller",
        }
    }
}

impl fmt::Display for ExitTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.payload())
    }
}

/// Commands from the UI to the active link.
#[derive(Debug, Clone)]
pub enum LinkCommand {
    SystemExit(ExitTarget),
}

/// Events from the active link to the UI.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// Remote-confirmed control value; drives the dials and the echo marker.
    Echo(ControlXY),
    /// Clock-hand rotations for the clock page.
    Clock(ClockHands),
    /// Decorative signal-quality change (poll link only).
    Quality(SignalQuality),
    /// Connection status change for the status line.
    Status(LinkStatus),
}

/// Which page the UI currently shows; the poll link skips the clock query
/// while the clock page is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePage {
    Dash,
    Clock,
}

/// Why a link variant returned control to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkExit {
    Cancelled,
    ConfigChanged,
}

/// Channel bundle handed to the active link variant.
pub(crate) struct LinkIo {
    pub control_rx: mpsc::Receiver<ControlXY>,
    pub command_rx: mpsc::Receiver<LinkCommand>,
    pub event_tx: mpsc::Sender<LinkEvent>,
    pub page_rx: watch::Receiver<ActivePage>,
}

/// Pushes an event toward the UI; a closed channel is logged and dropped,
/// never propagated; the link outlives any UI hiccup.
pub(crate) async fn emit(event_tx: &mpsc::Sender<LinkEvent>, event: LinkEvent) {
    if let Err(e) = event_tx.send(event).await {
        warn!("UI event channel closed: {}", e);
    }
}

/// Handle for the supervised transport task.
///
/// The handle itself is stateless; it spawns the supervisor loop that owns
/// the active link. The task runs until cancellation.
pub struct LinkHandle {}

impl LinkHandle {
    /// Spawns the transport supervisor.
    ///
    /// The supervisor reads the current configuration, runs the selected
    /// link variant until it exits, and then decides: rebuild (config
    /// change or failure) or stop (cancellation).
    pub fn spawn(
        mut config_rx: watch::Receiver<DashConfig>,
        page_rx: watch::Receiver<ActivePage>,
        control_rx: mpsc::Receiver<ControlXY>,
        command_rx: mpsc::Receiver<LinkCommand>,
        event_tx: mpsc::Sender<LinkEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut io = LinkIo {
                control_rx,
                command_rx,
                event_tx,
                page_rx,
            };

            loop {
                let config = config_rx.borrow_and_update().clone();
                info!("Starting transport link: {:?}", config.transport);

                let result = match config.transport {
                    TransportMode::Mqtt => {
                        mqtt_link::run(&config.mqtt, &mut io, &mut config_rx, &cancel).await
                    }
                    TransportMode::Poll => {
                        poll_link::run(&config.poll, &mut io, &mut config_rx, &cancel).await
                    }
                };

                match result {
                    Ok(LinkExit::Cancelled) => {
                        info!("Transport link stopped");
                        break;
                    }
                    Ok(LinkExit::ConfigChanged) => {
                        info!("Transport configuration changed, rebuilding link");
                    }
                    Err(e) => {
                        warn!("Transport link failed: {}", e);
                        let mut status = LinkStatus::default();
                        status.note(ConnectionState::Failed, e.to_string());
                        emit(&io.event_tx, LinkEvent::Status(status)).await;

                        // Pause before the rebuild so an unreachable peer
                        // does not spin the supervisor.
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = config_rx.changed() => {}
                            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
                        }
                    }
                }
            }
        })
    }
}
