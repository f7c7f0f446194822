//! Discord wire types for the small slice of the API this bot touches:
//! application commands and interaction webhooks. Discord discriminates by
//! numeric `type` fields, hence the constants instead of tagged enums.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Application command definitions
// ---------------------------------------------------------------------------

pub const OPTION_TYPE_INTEGER: u8 = 4;
pub const OPTION_TYPE_BOOLEAN: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

// ---------------------------------------------------------------------------
// Incoming interactions
// ---------------------------------------------------------------------------

pub const INTERACTION_TYPE_PING: u8 = 1;
pub const INTERACTION_TYPE_APPLICATION_COMMAND: u8 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl InteractionData {
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_i64())
    }

    pub fn boolean_option(&self, name: &str) -> Option<bool> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_bool())
    }
}

// ---------------------------------------------------------------------------
// Interaction responses
// ---------------------------------------------------------------------------

pub const RESPONSE_TYPE_PONG: u8 = 1;
pub const RESPONSE_TYPE_CHANNEL_MESSAGE: u8 = 4;

#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionResponseData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponseData {
    pub content: String,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_TYPE_PONG,
            data: None,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_TYPE_CHANNEL_MESSAGE,
            data: Some(InteractionResponseData {
                content: content.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_options_parse_by_name() {
        let data: Interaction = serde_json::from_str(
            r#"{"type":2,"data":{"name":"verify-members","options":[
                {"name":"batchsize","type":4,"value":7},
                {"name":"dryrun","type":5,"value":false}
            ]}}"#,
        )
        .unwrap();
        let data = data.data.unwrap();
        assert_eq!(data.integer_option("batchsize"), Some(7));
        assert_eq!(data.boolean_option("dryrun"), Some(false));
        assert_eq!(data.integer_option("missing"), None);
    }

    #[test]
    fn ping_has_no_data() {
        let ping: Interaction = serde_json::from_str(r#"{"type":1}"#).unwrap();
        assert_eq!(ping.kind, INTERACTION_TYPE_PING);
        assert!(ping.data.is_none());
    }

    #[test]
    fn responses_serialize_with_numeric_type() {
        let pong = serde_json::to_value(InteractionResponse::pong()).unwrap();
        assert_eq!(pong, serde_json::json!({"type": 1}));

        let msg = serde_json::to_value(InteractionResponse::message("Command received.")).unwrap();
        assert_eq!(
            msg,
            serde_json::json!({"type": 4, "data": {"content": "Command received."}})
        );
    }
}
