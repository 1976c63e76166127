//! JSON wire messages for hosts that talk to the bridge over a byte channel.
//!
//! Request: `{"command": "showAlert", "arguments": {"message": "Hi"}}`
//! (`arguments` may be omitted, an object, or a bare value).
//!
//! Response: `{"ok": true, "value": ...}` or
//! `{"ok": false, "kind": "PermissionDenied", "message": "..."}`.

use crate::arguments::Arguments;
use crate::dispatcher::Invocation;
use crate::outcome::{Failure, FailureKind, Outcome, Value};
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Incoming request as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationMessage {
    pub command: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl InvocationMessage {
    pub fn into_invocation(self) -> Invocation {
        Invocation::new(self.command, Arguments::from_json(self.arguments))
    }
}

/// Outgoing reply as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMessage {
    Ok { value: Value },
    Err { kind: FailureKind, message: String },
}

impl ResponseMessage {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseMessage::Ok { .. })
    }
}

impl From<Outcome> for ResponseMessage {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(value) => ResponseMessage::Ok { value },
            Outcome::Failure(Failure { kind, message }) => ResponseMessage::Err { kind, message },
        }
    }
}

impl From<ResponseMessage> for Outcome {
    fn from(message: ResponseMessage) -> Self {
        match message {
            ResponseMessage::Ok { value } => Outcome::Success(value),
            ResponseMessage::Err { kind, message } => Outcome::failure(kind, message),
        }
    }
}

impl Serialize for ResponseMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResponseMessage::Ok { value } => {
                let mut state = serializer.serialize_struct("ResponseMessage", 2)?;
                state.serialize_field("ok", &true)?;
                // Written even when null, so `value` is always present on success.
                state.serialize_field("value", value)?;
                state.end()
            }
            ResponseMessage::Err { kind, message } => {
                let mut state = serializer.serialize_struct("ResponseMessage", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("kind", kind)?;
                state.serialize_field("message", message)?;
                state.end()
            }
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    ok: bool,
    #[serde(default)]
    value: Option<Value>,
    kind: Option<FailureKind>,
    message: Option<String>,
}

impl<'de> Deserialize<'de> for ResponseMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawResponse::deserialize(deserializer)?;
        if raw.ok {
            return Ok(ResponseMessage::Ok {
                value: raw.value.unwrap_or(Value::Null),
            });
        }

        let kind = raw.kind.ok_or_else(|| D::Error::missing_field("kind"))?;
        Ok(ResponseMessage::Err {
            kind,
            message: raw.message.unwrap_or_default(),
        })
    }
}
