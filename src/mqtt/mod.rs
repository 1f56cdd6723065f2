//! # MQTT
//!
//! Everything between the operator's draft and the broker.
//!
//! ```text
//! mqtt/
//! ├── topics.rs           - Topic catalog, placeholder substitution, categories
//! ├── payload.rs          - Synthetic payload builders per category
//! ├── publisher.rs        - Draft validation and hand-off to the worker
//! ├── message_manager.rs  - Outgoing message type and the recently-sent log
//! ├── mqtt_handler.rs     - Broker connection task and status reporting
//! └── config.rs           - Broker connection settings
//! ```
//!
//! The UI thread only ever touches the catalog, the generator and the
//! publisher. The connection itself lives in [`mqtt_handler::MqttHandler`] on
//! a tokio task and is reached through a bounded channel.

pub mod config;
pub mod message_manager;
pub mod mqtt_handler;
pub mod payload;
pub mod publisher;
pub mod topics;
