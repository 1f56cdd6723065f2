//! # Payload Generator
//!
//! Builds a synthetic message body for a catalog topic. Every builder returns
//! a fixed key layout; `tid`/`bid` are fresh v4 UUIDs and `timestamp` is the
//! current time in epoch milliseconds. A few telemetry values are drawn at
//! random so consecutive messages are distinguishable on the bus.
//!
//! Topics without a [`TopicCategory`] produce an empty object.

use rand::Rng;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::topics::{Identifiers, Topic, TopicCategory};

/// JSON object in builder insertion order.
pub type Payload = Map<String, Value>;

const PLACEHOLDER_METHOD: &str = "some_method";

#[derive(Debug, Clone, Default)]
pub struct PayloadGenerator {
    identifiers: Identifiers,
}

impl PayloadGenerator {
    pub fn new(identifiers: Identifiers) -> Self {
        Self { identifiers }
    }

    pub fn generate(&self, topic: &Topic) -> Payload {
        match topic.category() {
            Some(category) => self.generate_for(category),
            None => Payload::new(),
        }
    }

    pub fn generate_for(&self, category: TopicCategory) -> Payload {
        let gateway = self.identifiers.gateway_sn.as_str();
        let value = match category {
            TopicCategory::Osd => osd(gateway),
            TopicCategory::State => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "gateway": gateway,
                "data": {}
            }),
            TopicCategory::Services | TopicCategory::Requests => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "gateway": gateway,
                "method": PLACEHOLDER_METHOD,
                "data": {}
            }),
            TopicCategory::ServicesReply | TopicCategory::RequestsReply => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "gateway": gateway,
                "method": PLACEHOLDER_METHOD,
                "data": {
                    "result": 0,
                    "output": {}
                }
            }),
            TopicCategory::Events => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "need_reply": 0,
                "gateway": gateway,
                "method": PLACEHOLDER_METHOD,
                "data": {}
            }),
            TopicCategory::EventsReply => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "gateway": gateway,
                "method": PLACEHOLDER_METHOD,
                "data": {
                    "result": 0
                }
            }),
            TopicCategory::Status => self.status(),
            TopicCategory::StatusReply => json!({
                "tid": new_id(),
                "bid": new_id(),
                "method": "update_topo",
                "timestamp": now_millis(),
                "data": {
                    "result": 0
                }
            }),
            TopicCategory::PropertySet => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "data": {
                    "some_property": "some_value"
                }
            }),
            TopicCategory::PropertySetReply => json!({
                "tid": new_id(),
                "bid": new_id(),
                "timestamp": now_millis(),
                "data": {
                    "some_property": {
                        "result": 0
                    }
                }
            }),
            TopicCategory::DrcUp => json!({
                "method": "drone_control",
                "data": {
                    "result": 0,
                    "output": {
                        "seq": random_seq()
                    }
                }
            }),
            TopicCategory::DrcDown => drc_down(),
        };

        match value {
            Value::Object(map) => map,
            _ => Payload::new(),
        }
    }

    fn status(&self) -> Value {
        json!({
            "tid": new_id(),
            "bid": new_id(),
            "method": "update_topo",
            "timestamp": now_millis(),
            "data": {
                "type": 98,
                "sub_type": 0,
                "device_secret": "secret",
                "nonce": "nonce",
                "version": 1,
                "sub_devices": [
                    {
                        "sn": self.identifiers.device_sn,
                        "type": 99,
                        "sub_type": 0,
                        "index": "A",
                        "device_secret": "secret",
                        "nonce": "nonce",
                        "version": 1
                    }
                ]
            }
        })
    }
}

fn osd(gateway: &str) -> Value {
    let mut rng = rand::thread_rng();
    // Temperature in 0.1 °C steps
    let battery_temperature = f64::from(rng.gen_range(150_i32..=400)) / 10.0;

    json!({
        "tid": new_id(),
        "bid": new_id(),
        "timestamp": now_millis(),
        "data": {
            "job_number": rng.gen_range(1..=1000),
            "acc_time": 1859010,
            "activation_time": 0,
            "maintain_status": {
                "maintain_status_array": [
                    {
                        "state": 0,
                        "last_maintain_type": 17,
                        "last_maintain_time": 0,
                        "last_maintain_work_sorties": 0
                    }
                ]
            },
            "electric_supply_voltage": 231,
            "working_voltage": 25440,
            "working_current": rng.gen_range(800..=1500),
            "backup_battery": {
                "voltage": 26631,
                "temperature": battery_temperature,
                "switch": 1
            },
            "drone_battery_maintenance_info": {
                "maintenance_state": 0,
                "maintenance_time_left": 0
            }
        },
        "gateway": gateway
    })
}

fn drc_down() -> Value {
    let mut rng = rand::thread_rng();
    let mut stick = || f64::from(rng.gen_range(-500_i32..=500)) / 100.0;
    let (x, y, h, w) = (stick(), stick(), stick(), stick());

    json!({
        "method": "drone_control",
        "data": {
            "seq": random_seq(),
            "x": x,
            "y": y,
            "h": h,
            "w": w
        }
    })
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn random_seq() -> u32 {
    rand::thread_rng().gen_range(1..=1000)
}

/// Wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
