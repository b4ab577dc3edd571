//! HTTP polling link.
//!
//! Every tick the link asks the query endpoint for the vehicle's current
//! position and, while the clock page is showing, for the clock-hand
//! rotations. Responses are plain text, comma-separated decimals. A tick
//! without a response is simply skipped, with no retry and no backoff, and only
//! ages the freshness counter behind the decorative signal strip.
//!
//! This link is telemetry-only: the original polling pages never
//! transmitted the stick position, so locally mapped values are drained
//! and dropped. Stop commands map to the server's command route.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    emit, wire, ActivePage, ClockHands, ConnectionState, ExitTarget, FreshnessCounter,
    LinkCommand, LinkEvent, LinkExit, LinkIo, LinkStatus, TransportError,
};
use crate::input::ControlXY;
use crate::persistence::{DashConfig, PollSettings};

/// Query namespace and key for the vehicle position (two values).
const DASH_QUERY: (&str, &str) = ("dash", "xy");
/// Query namespace and key for the clock hands (three values, degrees).
const CLOCK_QUERY: (&str, &str) = ("clock", "time");

/// Runs the poll variant until cancellation, config change or failure.
pub(crate) async fn run(
    settings: &PollSettings,
    io: &mut LinkIo,
    config_rx: &mut watch::Receiver<DashConfig>,
    cancel: &CancellationToken,
) -> Result<LinkExit, TransportError> {
    let interval_ms = settings.interval_ms.max(10);
    let client = Client::builder()
        // A request that misses its tick window is worthless; cap it there.
        .timeout(Duration::from_millis(interval_ms))
        .build()
        .map_err(|e| TransportError::ConnectionError(e.to_string()))?;

    let base = settings.base_url.trim_end_matches('/').to_string();
    let event_tx = io.event_tx.clone();
    let page_rx = io.page_rx.clone();

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut freshness = FreshnessCounter::new();
    let mut shown_quality = freshness.quality();
    let mut status = LinkStatus::default();
    status.note(ConnectionState::Connecting, format!("polling {}", base));
    emit(&event_tx, LinkEvent::Status(status.clone())).await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Poll link cancelled");
                return Ok(LinkExit::Cancelled);
            }

            _ = config_rx.changed() => {
                return Ok(LinkExit::ConfigChanged);
            }

            maybe_control = io.control_rx.recv() => {
                // Receive-only transport; the local value stays local.
                maybe_control.ok_or_else(|| {
                    TransportError::ChannelError("control channel closed".to_string())
                })?;
            }

            maybe_command = io.command_rx.recv() => {
                let command = maybe_command.ok_or_else(|| {
                    TransportError::ChannelError("command channel closed".to_string())
                })?;
                let LinkCommand::SystemExit(target) = command;
                send_stop(&client, &base, target, &mut status).await;
            }

            _ = ticker.tick() => {
                freshness.tick();

                match fetch_query(&client, &base, DASH_QUERY).await {
                    Ok(body) => match wire::decode_csv(&body, 2) {
                        Ok(values) => {
                            freshness.mark_response();
                            if status.connection_state != ConnectionState::Connected {
                                status.note(ConnectionState::Connected, "server responding");
                                emit(&event_tx, LinkEvent::Status(status.clone())).await;
                            }
                            status.messages_received += 1;
                            status.last_activity = Some(chrono::Local::now());
                            let control = ControlXY::clamped(values[0], values[1]);
                            emit(&event_tx, LinkEvent::Echo(control)).await;
                        }
                        Err(e) => warn!("Undecodable position payload {:?}: {}", body, e),
                    },
                    // Missed ticks only age the freshness counter.
                    Err(e) => debug!("Position poll failed: {}", e),
                }

                if *page_rx.borrow() == ActivePage::Clock {
                    match fetch_query(&client, &base, CLOCK_QUERY).await {
                        Ok(body) => match wire::decode_csv(&body, 3) {
                            Ok(values) => {
                                freshness.mark_response();
                                status.messages_received += 1;
                                emit(&event_tx, LinkEvent::Clock(ClockHands {
                                    hours_deg: values[0],
                                    minutes_deg: values[1],
                                    seconds_deg: values[2],
                                })).await;
                            }
                            Err(e) => warn!("Undecodable clock payload {:?}: {}", body, e),
                        },
                        Err(e) => debug!("Clock poll failed: {}", e),
                    }
                }

                let quality = freshness.quality();
                if quality != shown_quality {
                    shown_quality = quality;
                    emit(&event_tx, LinkEvent::Quality(quality)).await;
                }
            }
        }
    }
}

/// One GET against the query route, returning the plain-text body.
async fn fetch_query(
    client: &Client,
    base: &str,
    (name, value): (&str, &str),
) -> Result<String, TransportError> {
    let url = format!("{}/query?name={}&value={}", base, name, value);
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| TransportError::RequestError(e.to_string()))?;
    response
        .text()
        .await
        .map_err(|e| TransportError::RequestError(e.to_string()))
}

/// Fires the stop command at the server's command route. Best-effort: a
/// failure is logged and forgotten like any other missed request.
async fn send_stop(client: &Client, base: &str, target: ExitTarget, status: &mut LinkStatus) {
    let url = format!("{}/command?name=stop&value={}", base, target.payload());
    info!("Sending stop command for {}", target);
    match client.get(&url).send().await {
        Ok(_) => status.messages_sent += 1,
        Err(e) => warn!("Stop command failed: {}", e),
    }
}
