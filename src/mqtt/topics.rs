//! # Topic Catalog
//!
//! The fixed set of topics the debugger can publish to, modelled on the
//! dock/drone cloud taxonomy:
//!
//! ```text
//! {namespace}/product/{entity}/{channel}[/{subchannel}]
//! thing/product/device_sn/osd
//! thing/product/gateway_sn/property/set_reply
//! ```
//!
//! Raw catalog entries contain the literal placeholders `gateway_sn` and
//! `device_sn`. [`Catalog::resolve`] swaps them for the configured test
//! identifiers in a single left-to-right pass.
//!
//! Each topic is tagged with a [`TopicCategory`] when the catalog is built.
//! The category comes from the channel segments of the topic, so
//! `services_reply` can never be mistaken for `services`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const GATEWAY_PLACEHOLDER: &str = "gateway_sn";
pub const DEVICE_PLACEHOLDER: &str = "device_sn";

/// Raw catalog entries in display order.
pub const RAW_TOPICS: [&str; 14] = [
    "thing/product/device_sn/osd",
    "thing/product/device_sn/state",
    "thing/product/gateway_sn/services",
    "thing/product/gateway_sn/services_reply",
    "thing/product/gateway_sn/events",
    "thing/product/gateway_sn/events_reply",
    "thing/product/gateway_sn/requests",
    "thing/product/gateway_sn/requests_reply",
    "sys/product/gateway_sn/status",
    "sys/product/gateway_sn/status_reply",
    "thing/product/gateway_sn/property/set",
    "thing/product/gateway_sn/property/set_reply",
    "thing/product/gateway_sn/drc/up",
    "thing/product/gateway_sn/drc/down",
];

/// Serial numbers substituted for the catalog placeholders.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Identifiers {
    pub gateway_sn: String,
    pub device_sn: String,
}

impl Default for Identifiers {
    fn default() -> Self {
        Self {
            gateway_sn: "SN123".to_string(),
            device_sn: "SN456".to_string(),
        }
    }
}

/// Message shape a topic carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicCategory {
    Osd,
    State,
    Services,
    ServicesReply,
    Events,
    EventsReply,
    Requests,
    RequestsReply,
    Status,
    StatusReply,
    PropertySet,
    PropertySetReply,
    DrcUp,
    DrcDown,
}

impl TopicCategory {
    /// Derives the category from the segments after `{namespace}/product/{entity}`.
    ///
    /// Returns `None` for anything outside the known shape, including extra
    /// trailing segments.
    pub fn from_topic(topic: &str) -> Option<Self> {
        let segments: Vec<&str> = topic.split('/').collect();
        let (namespace, rest) = match segments.as_slice() {
            [namespace, "product", entity, rest @ ..] if !entity.is_empty() => (*namespace, rest),
            _ => return None,
        };

        match (namespace, rest) {
            ("thing", ["osd"]) => Some(Self::Osd),
            ("thing", ["state"]) => Some(Self::State),
            ("thing", ["services"]) => Some(Self::Services),
            ("thing", ["services_reply"]) => Some(Self::ServicesReply),
            ("thing", ["events"]) => Some(Self::Events),
            ("thing", ["events_reply"]) => Some(Self::EventsReply),
            ("thing", ["requests"]) => Some(Self::Requests),
            ("thing", ["requests_reply"]) => Some(Self::RequestsReply),
            ("thing", ["property", "set"]) => Some(Self::PropertySet),
            ("thing", ["property", "set_reply"]) => Some(Self::PropertySetReply),
            ("thing", ["drc", "up"]) => Some(Self::DrcUp),
            ("thing", ["drc", "down"]) => Some(Self::DrcDown),
            ("sys", ["status"]) => Some(Self::Status),
            ("sys", ["status_reply"]) => Some(Self::StatusReply),
            _ => None,
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(
            self,
            Self::ServicesReply
                | Self::EventsReply
                | Self::RequestsReply
                | Self::StatusReply
                | Self::PropertySetReply
        )
    }
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Osd => "osd",
            Self::State => "state",
            Self::Services => "services",
            Self::ServicesReply => "services_reply",
            Self::Events => "events",
            Self::EventsReply => "events_reply",
            Self::Requests => "requests",
            Self::RequestsReply => "requests_reply",
            Self::Status => "status",
            Self::StatusReply => "status_reply",
            Self::PropertySet => "property/set",
            Self::PropertySetReply => "property/set_reply",
            Self::DrcUp => "drc/up",
            Self::DrcDown => "drc/down",
        };
        write!(f, "{}", name)
    }
}

/// A catalog entry after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    raw: String,
    resolved: String,
    category: Option<TopicCategory>,
}

impl Topic {
    /// Builds a topic from a raw string. The category is taken from the raw
    /// form, so identifiers that happen to look like channel names cannot
    /// change it.
    pub fn new(raw: &str, identifiers: &Identifiers) -> Self {
        Topic {
            raw: raw.to_string(),
            resolved: substitute(raw, identifiers),
            category: TopicCategory::from_topic(raw),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    pub fn category(&self) -> Option<TopicCategory> {
        self.category
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.resolved)
    }
}

/// Replaces both placeholders in one left-to-right pass; substituted text is
/// never scanned again.
fn substitute(raw: &str, identifiers: &Identifiers) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(GATEWAY_PLACEHOLDER) {
            out.push_str(&identifiers.gateway_sn);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(DEVICE_PLACEHOLDER) {
            out.push_str(&identifiers.device_sn);
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}

/// Ordered, immutable list of topics.
#[derive(Debug, Clone)]
pub struct Catalog {
    identifiers: Identifiers,
    topics: Vec<Topic>,
}

impl Catalog {
    pub fn new(identifiers: Identifiers) -> Self {
        let topics = RAW_TOPICS
            .iter()
            .map(|raw| Topic::new(raw, &identifiers))
            .collect();
        Catalog {
            identifiers,
            topics,
        }
    }

    pub fn list_topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn get(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    /// Replaces every placeholder occurrence in `topic`.
    pub fn resolve(&self, topic: &str) -> String {
        substitute(topic, &self.identifiers)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Identifiers::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keeps_order_and_size() {
        let catalog = Catalog::default();
        let raws: Vec<&str> = catalog.list_topics().iter().map(Topic::raw).collect();
        assert_eq!(raws, RAW_TOPICS.to_vec());
        assert_eq!(catalog.list_topics().len(), 14);
    }

    #[test]
    fn resolved_topics_have_no_placeholders() {
        let catalog = Catalog::default();
        for topic in catalog.list_topics() {
            assert!(!topic.resolved().is_empty());
            assert!(!topic.resolved().contains(GATEWAY_PLACEHOLDER), "{}", topic);
            assert!(!topic.resolved().contains(DEVICE_PLACEHOLDER), "{}", topic);
            assert_eq!(catalog.resolve(topic.raw()), topic.resolved());
        }
    }

    #[test]
    fn device_topic_resolves_to_device_identifier() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.resolve("thing/product/device_sn/osd"),
            "thing/product/SN456/osd"
        );
        assert_eq!(
            catalog.resolve("sys/product/gateway_sn/status"),
            "sys/product/SN123/status"
        );
    }

    #[test]
    fn resolve_without_placeholders_is_noop() {
        let catalog = Catalog::default();
        assert_eq!(catalog.resolve("plain/topic"), "plain/topic");
        assert_eq!(catalog.resolve(""), "");
    }

    #[test]
    fn custom_identifiers_are_used() {
        let catalog = Catalog::new(Identifiers {
            gateway_sn: "DOCK01".to_string(),
            device_sn: "M30T".to_string(),
        });
        assert_eq!(
            catalog.get(0).map(Topic::resolved),
            Some("thing/product/M30T/osd")
        );
        assert_eq!(
            catalog.get(13).map(Topic::resolved),
            Some("thing/product/DOCK01/drc/down")
        );
    }

    #[test]
    fn substituted_identifiers_are_not_rescanned() {
        let catalog = Catalog::new(Identifiers {
            gateway_sn: "device_sn".to_string(),
            device_sn: "gateway_sn".to_string(),
        });
        assert_eq!(
            catalog.resolve("a/gateway_sn/device_sn/gateway_snx"),
            "a/device_sn/gateway_sn/device_snx"
        );
        assert_eq!(catalog.resolve("gateway_device_sn"), "gateway_gateway_sn");
    }

    #[test]
    fn every_catalog_topic_has_its_own_category() {
        let catalog = Catalog::default();
        let categories: Vec<TopicCategory> = catalog
            .list_topics()
            .iter()
            .map(|t| t.category().expect("catalog topic without category"))
            .collect();
        let unique: std::collections::HashSet<_> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len());
    }

    #[test]
    fn reply_topics_are_not_confused_with_requests() {
        assert_eq!(
            TopicCategory::from_topic("thing/product/x/services_reply"),
            Some(TopicCategory::ServicesReply)
        );
        assert_eq!(
            TopicCategory::from_topic("thing/product/x/property/set_reply"),
            Some(TopicCategory::PropertySetReply)
        );
        assert_eq!(
            TopicCategory::from_topic("sys/product/x/status_reply"),
            Some(TopicCategory::StatusReply)
        );
        assert!(TopicCategory::ServicesReply.is_reply());
        assert!(!TopicCategory::Services.is_reply());
    }

    #[test]
    fn unknown_shapes_have_no_category() {
        assert_eq!(TopicCategory::from_topic(""), None);
        assert_eq!(TopicCategory::from_topic("thing/product/x/unknown"), None);
        assert_eq!(TopicCategory::from_topic("thing/product/x/osd/extra"), None);
        assert_eq!(TopicCategory::from_topic("sys/product/x/osd"), None);
        assert_eq!(TopicCategory::from_topic("thing/product//osd"), None);
        assert_eq!(TopicCategory::from_topic("osd"), None);
    }
}
