use chrono::NaiveDateTime;
use rumqttc::QoS;
use std::collections::VecDeque;
use std::fmt;

const PREVIEW_LEN: usize = 48;

/// A payload queued for the broker worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub topic: String,
    pub payload: String,
    pub qos: QoS,
    pub queued_at: NaiveDateTime,
}

impl OutgoingMessage {
    /// Creates a QoS 0 message stamped with the local time.
    pub fn new(topic: String, payload: String) -> Self {
        OutgoingMessage {
            topic,
            payload,
            qos: QoS::AtMostOnce,
            queued_at: chrono::Local::now().naive_local(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}: {}\n{}",
            self.queued_at.format("%H:%M:%S"),
            self.topic,
            self.payload
        )
    }
}

impl fmt::Display for OutgoingMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let preview: String = self.payload.chars().take(PREVIEW_LEN).collect();
        let ellipsis = if self.payload.chars().count() > PREVIEW_LEN {
            "…"
        } else {
            ""
        };
        write!(
            f,
            "{} {} - {}{}",
            self.queued_at.format("%H:%M:%S"),
            self.topic,
            preview,
            ellipsis
        )
    }
}

/// In-memory list of the most recent sends, newest first. Dropped on exit.
#[derive(Debug, Clone)]
pub struct SentLog {
    capacity: usize,
    entries: VecDeque<OutgoingMessage>,
}

impl SentLog {
    pub fn new(capacity: usize) -> Self {
        SentLog {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, msg: OutgoingMessage) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(msg);
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutgoingMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SentLog {
    fn default() -> Self {
        Self::new(20)
    }
}
