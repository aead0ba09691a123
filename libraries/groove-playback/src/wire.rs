//! Server socket protocol
//!
//! Messages travel as `{"action": "<ACTION_TYPE>", "data": {...fields}}`.
//! Some server builds capitalise the keys (`Action`, `Data`); both spellings
//! are accepted on input, the lowercase form is always written.
//!
//! Outgoing messages go through an [`Outbox`] that buffers while the socket
//! is down and flushes in order once it opens.

use crate::actions::Action;
use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tracing::{debug, warn};

const ACTION_TYPE: &str = "actionType";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(alias = "Action")]
    pub action: String,

    #[serde(default, alias = "Data", skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl WireMessage {
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Merge `data` with the action type into an [`Action`]
    ///
    /// Unknown action types become [`Action::Unknown`]; known types with
    /// missing or mistyped fields are an error.
    pub fn into_action(self) -> Result<Action> {
        let mut fields = match self.data {
            Value::Null => Map::new(),
            Value::Object(fields) => fields,
            other => {
                return Err(PlaybackError::InvalidMessage(format!(
                    "{}: data must be an object, got {other}",
                    self.action
                )))
            }
        };
        fields.insert(ACTION_TYPE.to_string(), Value::String(self.action));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Split an [`Action`] into the action type and its fields
    pub fn from_action(action: &Action) -> Result<Self> {
        let Value::Object(mut fields) = serde_json::to_value(action)? else {
            return Err(PlaybackError::InvalidMessage(
                "action did not serialize to an object".to_string(),
            ));
        };

        let action = match fields.remove(ACTION_TYPE) {
            Some(Value::String(action)) => action,
            _ => {
                return Err(PlaybackError::InvalidMessage(
                    "action without actionType".to_string(),
                ))
            }
        };

        let data = if fields.is_empty() {
            Value::Null
        } else {
            Value::Object(fields)
        };
        Ok(Self { action, data })
    }
}

/// Socket write half
pub trait MessageSink {
    fn send(&mut self, text: &str) -> Result<()>;
}

/// Sink that discards everything, for players without a server connection
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn send(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Outgoing message buffer
pub struct Outbox {
    open: bool,
    pending: VecDeque<String>,
    sink: Box<dyn MessageSink>,
}

impl Outbox {
    /// Create a closed outbox
    pub fn new(sink: Box<dyn MessageSink>) -> Self {
        Self {
            open: false,
            pending: VecDeque::new(),
            sink,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Messages waiting for the socket to open
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Send `message` now, or buffer it while closed
    pub fn send(&mut self, message: &WireMessage) -> Result<()> {
        let text = message.encode()?;
        self.pending.push_back(text);
        if self.open {
            self.flush();
        } else {
            debug!(action = %message.action, pending = self.pending.len(), "Socket closed, buffering message");
        }
        Ok(())
    }

    /// Socket opened: deliver buffered messages in order
    pub fn open(&mut self) {
        self.open = true;
        self.flush();
    }

    /// Socket closed: buffer from now on
    pub fn close(&mut self) {
        self.open = false;
    }

    fn flush(&mut self) {
        while let Some(text) = self.pending.front() {
            if let Err(e) = self.sink.send(text) {
                warn!(error = %e, pending = self.pending.len(), "Send failed, socket marked closed");
                self.open = false;
                return;
            }
            self.pending.pop_front();
        }
    }
}
