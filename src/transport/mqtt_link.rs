//! MQTT link with statum state machine for the connection lifecycle.
//!
//! The dashboard publishes every mapped stick value on the control topic
//! and mirrors the vehicle's confirmed position from the echo topic back
//! into the gauges. A third topic carries the system-exit control message.
//!
//! # State Machine
//!
//! ```text
//! Connecting ──► Running ──► (exit: cancelled / config changed)
//! ```
//!
//! Broker loss never fails the link: rumqttc reconnects on the next poll
//! and the interruption only shows up on the status line.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use statum::{machine, state};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    emit, wire, ConnectionState, ExitTarget, LinkCommand, LinkEvent, LinkExit, LinkIo, LinkStatus,
    TransportError,
};
use crate::input::ControlXY;
use crate::persistence::{DashConfig, MqttSettings};

const DEFAULT_MQTT_PORT: u16 = 1883;

/// Topic names derived from the configured topic root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    /// Outbound control values from the dashboard.
    pub dash_xy: String,
    /// Inbound echo of the vehicle's current position.
    pub car_xy: String,
    /// System-exit control messages ("car" / "controller").
    pub system_exit: String,
}

impl TopicSet {
    pub fn new(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            dash_xy: format!("{}/dash/XY", root),
            car_xy: format!("{}/car/XY", root),
            system_exit: format!("{}/system/exit", root),
        }
    }
}

/// Splits "host:port" into its parts, falling back to the default MQTT
/// port when none is given or it does not parse.
fn split_server_url(url: &str) -> (String, u16) {
    match url.split_once(':') {
        Some((host, port)) => (
            host.to_string(),
            port.parse().unwrap_or(DEFAULT_MQTT_PORT),
        ),
        None => (url.to_string(), DEFAULT_MQTT_PORT),
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum MqttLinkState {
    Connecting,
    Running,
}

#[machine]
pub struct MqttLink<S: MqttLinkState> {
    client: AsyncClient,
    event_loop: EventLoop,
    topics: TopicSet,
    status: LinkStatus,
}

impl MqttLink<Connecting> {
    pub fn create(settings: &MqttSettings) -> Self {
        let (host, port) = split_server_url(&settings.server.url);
        info!("Creating MQTT link to {}:{}", host, port);

        let client_id = format!("opendash-{}", std::process::id());
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(Duration::from_secs(5));
        if !settings.server.user.is_empty() {
            options.set_credentials(settings.server.user.clone(), settings.server.pw.clone());
        }

        let (client, event_loop) = AsyncClient::new(options, 100);

        Self::new(
            client,
            event_loop,
            TopicSet::new(&settings.topic_root),
            LinkStatus::default(),
        )
    }

    /// Queues the echo-topic subscription and transitions to Running.
    pub async fn subscribe(mut self) -> Result<MqttLink<Running>, TransportError> {
        self.client
            .subscribe(self.topics.car_xy.clone(), QoS::AtMostOnce)
            .await
            .map_err(|e| {
                TransportError::SubscriptionError(format!("{}: {}", self.topics.car_xy, e))
            })?;

        self.status
            .note(ConnectionState::Connecting, "waiting for broker");
        Ok(self.transition())
    }
}

impl MqttLink<Running> {
    /// Main link loop: relays stick values out, echo values in, and exit
    /// commands on request, until cancellation or a config change.
    pub async fn run_until_exit(
        mut self,
        io: &mut LinkIo,
        config_rx: &mut watch::Receiver<DashConfig>,
        cancel: &CancellationToken,
    ) -> Result<LinkExit, TransportError> {
        let client = self.client.clone();
        let topics = self.topics.clone();
        let mut status = std::mem::take(&mut self.status);
        let event_tx = io.event_tx.clone();
        let event_loop = &mut self.event_loop;

        emit(&event_tx, LinkEvent::Status(status.clone())).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("MQTT link cancelled");
                    return Ok(LinkExit::Cancelled);
                }

                _ = config_rx.changed() => {
                    return Ok(LinkExit::ConfigChanged);
                }

                maybe_control = io.control_rx.recv() => {
                    let control = maybe_control.ok_or_else(|| {
                        TransportError::ChannelError("control channel closed".to_string())
                    })?;
                    publish_control(&client, &topics, &mut status, control).await?;
                }

                maybe_command = io.command_rx.recv() => {
                    let command = maybe_command.ok_or_else(|| {
                        TransportError::ChannelError("command channel closed".to_string())
                    })?;
                    let LinkCommand::SystemExit(target) = command;
                    publish_exit(&client, &topics, &mut status, target).await?;
                }

                event = event_loop.poll() => match event {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("MQTT broker connected");
                        // Re-issue the subscription: a fresh session starts
                        // without the previous one on reconnect.
                        if let Err(e) = client
                            .subscribe(topics.car_xy.clone(), QoS::AtMostOnce)
                            .await
                        {
                            warn!("Resubscribe after reconnect failed: {}", e);
                        }
                        status.note(ConnectionState::Connected, "broker connected");
                        emit(&event_tx, LinkEvent::Status(status.clone())).await;
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_publish(&topics, &mut status, &event_tx, &publish).await;
                    }
                    Ok(other) => {
                        debug!("MQTT event ignored: {:?}", other);
                    }
                    Err(e) => {
                        warn!("MQTT connection lost: {}", e);
                        status.note(ConnectionState::Reconnecting, e.to_string());
                        emit(&event_tx, LinkEvent::Status(status.clone())).await;
                        // Pace the reconnect attempts.
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }
    }
}

async fn publish_control(
    client: &AsyncClient,
    topics: &TopicSet,
    status: &mut LinkStatus,
    control: ControlXY,
) -> Result<(), TransportError> {
    client
        .publish(
            topics.dash_xy.clone(),
            QoS::AtMostOnce,
            false,
            wire::encode_xy(control),
        )
        .await
        .map_err(|e| TransportError::PublishError(format!("{}: {}", topics.dash_xy, e)))?;
    status.messages_sent += 1;
    Ok(())
}

async fn publish_exit(
    client: &AsyncClient,
    topics: &TopicSet,
    status: &mut LinkStatus,
    target: ExitTarget,
) -> Result<(), TransportError> {
    info!("Publishing system exit for {}", target);
    client
        .publish(
            topics.system_exit.clone(),
            QoS::AtLeastOnce,
            false,
            target.payload(),
        )
        .await
        .map_err(|e| TransportError::PublishError(format!("{}: {}", topics.system_exit, e)))?;
    status.messages_sent += 1;
    Ok(())
}

async fn handle_publish(
    topics: &TopicSet,
    status: &mut LinkStatus,
    event_tx: &mpsc::Sender<LinkEvent>,
    publish: &rumqttc::Publish,
) {
    if publish.topic != topics.car_xy {
        debug!("Message on unexpected topic ignored: {}", publish.topic);
        return;
    }

    let payload = String::from_utf8_lossy(&publish.payload);
    match wire::decode_xy(&payload) {
        Ok(control) => {
            status.messages_received += 1;
            status.last_activity = Some(chrono::Local::now());
            emit(event_tx, LinkEvent::Echo(control)).await;
        }
        Err(e) => {
            warn!("Undecodable echo payload {:?}: {}", payload, e);
        }
    }
}

/// Runs the MQTT variant until cancellation, config change or failure.
pub(crate) async fn run(
    settings: &MqttSettings,
    io: &mut LinkIo,
    config_rx: &mut watch::Receiver<DashConfig>,
    cancel: &CancellationToken,
) -> Result<LinkExit, TransportError> {
    let link = MqttLink::create(settings).subscribe().await?;
    link.run_until_exit(io, config_rx, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_derive_from_the_root() {
        let topics = TopicSet::new("/opendash");
        assert_eq!(topics.dash_xy, "/opendash/dash/XY");
        assert_eq!(topics.car_xy, "/opendash/car/XY");
        assert_eq!(topics.system_exit, "/opendash/system/exit");
    }

    #[test]
    fn topic_root_tolerates_a_trailing_slash() {
        assert_eq!(TopicSet::new("/opendash/"), TopicSet::new("/opendash"));
    }

    #[test]
    fn server_url_splits_host_and_port() {
        assert_eq!(split_server_url("broker.local:1884"), ("broker.local".to_string(), 1884));
        assert_eq!(split_server_url("broker.local"), ("broker.local".to_string(), 1883));
        assert_eq!(split_server_url("broker.local:oops"), ("broker.local".to_string(), 1883));
    }
}
