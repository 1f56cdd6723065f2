//! # Publish Adapter
//!
//! Turns the operator's draft text into one queued [`OutgoingMessage`]. The
//! draft must parse as JSON; it is re-serialized compactly before it leaves,
//! so whitespace from the editor never reaches the bus. Delivery is handled
//! by the broker worker on the other end of the channel; this side never
//! waits for it.

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use super::message_manager::OutgoingMessage;
use super::topics::Topic;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no topic selected")]
    NoTopicSelected,

    #[error("invalid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("could not hand message to broker worker: {0}")]
    Dispatch(String),
}

#[derive(Debug, Clone)]
pub struct Publisher {
    outgoing: mpsc::Sender<OutgoingMessage>,
}

impl Publisher {
    pub fn new(outgoing: mpsc::Sender<OutgoingMessage>) -> Self {
        Self { outgoing }
    }

    /// Validates `raw_text` and queues it for `topic`.
    ///
    /// The topic check comes first, so an unselected topic is reported no
    /// matter what the text contains.
    pub fn publish(
        &self,
        topic: Option<&Topic>,
        raw_text: &str,
    ) -> Result<OutgoingMessage, PublishError> {
        let topic = topic.ok_or(PublishError::NoTopicSelected)?;
        let payload: Value = serde_json::from_str(raw_text)?;
        let msg = OutgoingMessage::new(topic.resolved().to_string(), payload.to_string());

        match self.outgoing.try_send(msg.clone()) {
            Ok(()) => {
                debug!("Queued {} bytes for {}", msg.payload.len(), msg.topic);
                Ok(msg)
            }
            Err(TrySendError::Full(_)) => {
                warn!("Outgoing queue full, dropping message for {}", msg.topic);
                Err(PublishError::Dispatch("outgoing queue is full".to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Broker worker stopped, dropping message for {}", msg.topic);
                Err(PublishError::Dispatch("broker worker is not running".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::topics::{Catalog, Identifiers};
    use serde_json::json;

    fn setup() -> (Publisher, mpsc::Receiver<OutgoingMessage>, Topic) {
        let (tx, rx) = mpsc::channel(8);
        let topic = Topic::new("thing/product/device_sn/osd", &Identifiers::default());
        (Publisher::new(tx), rx, topic)
    }

    #[test]
    fn valid_json_is_queued_once_and_reserialized() {
        let (publisher, mut rx, topic) = setup();
        let draft = "{\n    \"tid\": \"abc\",\n    \"data\": { \"x\": 1 }\n}";

        let sent = publisher.publish(Some(&topic), draft).unwrap();

        let received = rx.try_recv().unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(received, sent);
        assert_eq!(received.topic, "thing/product/SN456/osd");
        assert_eq!(received.payload, r#"{"tid":"abc","data":{"x":1}}"#);
        let parsed: Value = serde_json::from_str(&received.payload).unwrap();
        assert_eq!(parsed, json!({"tid": "abc", "data": {"x": 1}}));
    }

    #[test]
    fn malformed_json_is_not_sent() {
        let (publisher, mut rx, topic) = setup();

        let result = publisher.publish(Some(&topic), "{not json");

        assert!(matches!(result, Err(PublishError::MalformedPayload(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn missing_topic_wins_over_text() {
        let (publisher, mut rx, _) = setup();

        for text in ["{}", "{not json", ""] {
            let result = publisher.publish(None, text);
            assert!(matches!(result, Err(PublishError::NoTopicSelected)));
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn every_catalog_topic_can_be_published() {
        let (tx, mut rx) = mpsc::channel(32);
        let publisher = Publisher::new(tx);
        let catalog = Catalog::default();

        for topic in catalog.list_topics() {
            publisher.publish(Some(topic), "{}").unwrap();
        }
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, catalog.list_topics().len());
    }

    #[test]
    fn closed_worker_is_reported() {
        let (publisher, rx, topic) = setup();
        drop(rx);

        let result = publisher.publish(Some(&topic), "{}");
        assert!(matches!(result, Err(PublishError::Dispatch(_))));
    }

    #[test]
    fn full_queue_is_reported() {
        let (tx, _rx) = mpsc::channel(1);
        let publisher = Publisher::new(tx);
        let topic = Topic::new("thing/product/gateway_sn/events", &Identifiers::default());

        publisher.publish(Some(&topic), "{}").unwrap();
        let result = publisher.publish(Some(&topic), "{}");
        assert!(matches!(result, Err(PublishError::Dispatch(_))));
    }
}
