//! # Session
//!
//! Operator state for the running window and the commands that change it.
//! The UI never mutates this directly: each frame it collects [`Command`]s
//! from widget interactions and feeds them to [`Session::dispatch`] in order.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::mqtt::message_manager::SentLog;
use crate::mqtt::payload::{Payload, PayloadGenerator};
use crate::mqtt::publisher::{PublishError, Publisher};
use crate::mqtt::topics::{Catalog, Topic};

const PRETTY_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select the catalog entry at this index
    SelectTopic(usize),
    GenerateRandom,
    EditDraft(String),
    Send,
}

/// What the content panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Notice {
    #[default]
    Idle,
    Selected(String),
    Generated { topic: String, body: String },
    Sent(String),
    Warning(String),
}

/// Long-lived collaborators the commands act on.
pub struct Tools {
    pub catalog: Catalog,
    pub generator: PayloadGenerator,
    pub publisher: Publisher,
}

#[derive(Debug, Default)]
pub struct Session {
    selected: Option<Topic>,
    draft: String,
    notice: Notice,
    sent: SentLog,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Topic> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn sent(&self) -> &SentLog {
        &self.sent
    }

    pub fn dispatch(&mut self, command: Command, tools: &Tools) {
        debug!("Dispatching {:?}", command);
        match command {
            Command::SelectTopic(index) => self.select(index, &tools.catalog),
            Command::GenerateRandom => self.generate(&tools.generator),
            Command::EditDraft(text) => self.draft = text,
            Command::Send => self.send(&tools.publisher),
        }
    }

    fn select(&mut self, index: usize, catalog: &Catalog) {
        match catalog.get(index) {
            Some(topic) => {
                info!("Selected topic {}", topic);
                self.notice = Notice::Selected(topic.resolved().to_string());
                self.selected = Some(topic.clone());
            }
            None => warn!("Ignoring selection of unknown catalog index {}", index),
        }
    }

    fn generate(&mut self, generator: &PayloadGenerator) {
        let Some(topic) = &self.selected else {
            debug!("Generate requested without a selected topic");
            return;
        };

        let body = pretty(&generator.generate(topic));
        self.notice = Notice::Generated {
            topic: topic.resolved().to_string(),
            body: body.clone(),
        };
        self.draft = body;
    }

    fn send(&mut self, publisher: &Publisher) {
        match publisher.publish(self.selected.as_ref(), &self.draft) {
            Ok(msg) => {
                self.notice = Notice::Sent(msg.topic.clone());
                self.sent.push(msg);
            }
            Err(PublishError::NoTopicSelected) => {
                self.notice = Notice::Warning("Please select a topic first".to_string());
            }
            Err(PublishError::MalformedPayload(e)) => {
                debug!("Draft rejected: {}", e);
                self.notice = Notice::Warning("Invalid JSON".to_string());
            }
            Err(e @ PublishError::Dispatch(_)) => {
                self.notice = Notice::Warning(e.to_string());
            }
        }
    }
}

/// Pretty-prints with a four space indent.
fn pretty(payload: &Payload) -> String {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(PRETTY_INDENT));
    match payload.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => {
            warn!("Pretty printing failed, using compact form: {}", e);
            serde_json::Value::Object(payload.clone()).to_string()
        }
    }
}
