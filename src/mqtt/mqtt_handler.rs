use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, Packet};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::config::BrokerConfig;
use super::message_manager::OutgoingMessage;

/// Pause between event loop polls after a connection error.
const ERROR_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct MqttStatus {
    pub connection_state: ConnectionState,
    pub last_error: Option<String>,
    pub messages_sent: usize,
    pub last_activity: Option<chrono::DateTime<chrono::Local>>,
}

impl MqttStatus {
    pub fn is_connected(&self) -> bool {
        self.connection_state == ConnectionState::Connected
    }
}

/// Owns the broker connection for the lifetime of the process.
///
/// Messages arrive on `outgoing` and are published as they come; the rumqttc
/// event loop is polled in the same task. Status changes are pushed to the
/// UI over a watch channel.
pub struct MqttHandler {
    client: AsyncClient,
    event_loop: EventLoop,
    outgoing: mpsc::Receiver<OutgoingMessage>,
    status_tx: watch::Sender<MqttStatus>,
    status: MqttStatus,
}

impl MqttHandler {
    pub fn new(
        config: &BrokerConfig,
        outgoing: mpsc::Receiver<OutgoingMessage>,
        status_tx: watch::Sender<MqttStatus>,
    ) -> Self {
        let (client, event_loop) = AsyncClient::new(config.mqtt_options(), config.channel_capacity);
        info!("MQTT client created for broker {}", config);

        MqttHandler {
            client,
            event_loop,
            outgoing,
            status_tx,
            status: MqttStatus {
                connection_state: ConnectionState::Connecting,
                ..MqttStatus::default()
            },
        }
    }

    /// Runs until the sending side of `outgoing` is dropped.
    ///
    /// After a connection error the event loop is left alone for
    /// `ERROR_BACKOFF`; queued messages are still forwarded meanwhile.
    pub async fn run(mut self) {
        self.publish_status();
        let mut paused_until: Option<Instant> = None;

        loop {
            tokio::select! {
                msg = self.outgoing.recv() => match msg {
                    Some(msg) => self.forward(msg),
                    None => {
                        info!("Outgoing channel closed, stopping MQTT handler");
                        break;
                    }
                },
                _ = tokio::time::sleep_until(paused_until.unwrap_or_else(Instant::now)),
                    if paused_until.is_some() =>
                {
                    debug!("Backoff elapsed, polling broker again");
                    paused_until = None;
                }
                event = self.event_loop.poll(), if paused_until.is_none() => match event {
                    Ok(event) => self.on_event(event),
                    Err(e) => {
                        self.on_connection_error(e);
                        paused_until = Some(Instant::now() + ERROR_BACKOFF);
                    }
                },
            }
        }

        if let Err(e) = self.client.try_disconnect() {
            debug!("Disconnect request not delivered: {}", e);
        }
        self.status.connection_state = ConnectionState::Disconnected;
        self.publish_status();
    }

    /// Hands the message to the rumqttc request queue without waiting, so the
    /// event loop keeps being polled while the broker is unreachable.
    fn forward(&mut self, msg: OutgoingMessage) {
        match self
            .client
            .try_publish(msg.topic.as_str(), msg.qos, false, msg.payload.into_bytes())
        {
            Ok(()) => {
                info!("Publishing to {}", msg.topic);
                self.status.messages_sent += 1;
                self.status.last_activity = Some(chrono::Local::now());
            }
            Err(e) => {
                error!("Failed to publish to {}: {}", msg.topic, e);
                self.status.last_error = Some(e.to_string());
            }
        }
        self.publish_status();
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) => {
                info!("Connected to broker: {:?}", ack.code);
                self.status.connection_state = ConnectionState::Connected;
                self.status.last_error = None;
                self.status.last_activity = Some(chrono::Local::now());
                self.publish_status();
            }
            Event::Incoming(Packet::Disconnect) => {
                warn!("Broker closed the session");
                self.status.connection_state = ConnectionState::Disconnected;
                self.publish_status();
            }
            other => debug!("MQTT event: {:?}", other),
        }
    }

    fn on_connection_error(&mut self, e: ConnectionError) {
        warn!("MQTT connection error: {}", e);
        self.status.connection_state = ConnectionState::Failed;
        self.status.last_error = Some(e.to_string());
        self.publish_status();
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(self.status.clone());
    }
}
