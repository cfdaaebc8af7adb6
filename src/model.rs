// Wire types shared by the handlers and the state client.
use serde::{Deserialize, Serialize};

/// Key under which the saved number is written to the state store.
pub const SAVED_NUMBER_KEY: &str = "savedNumber";

/// Key read back by `GET /savedNumber`. Not the same as `SAVED_NUMBER_KEY`;
/// existing clients depend on both paths as-is.
pub const SAVED_NUMBERS_KEY: &str = "savedNumbers";

/// Topics the broker should deliver to this service, in order.
pub const TOPICS: [&str; 2] = ["A", "B"];

/// Body of `POST /saveNumber`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct NumberPayload {
    #[serde(default)]
    pub number: i64,
}

/// One key/value pair in the shape the state store's bulk save expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub key: String,
    pub value: i64,
}

impl StateEntry {
    pub fn saved_number(value: i64) -> Self {
        StateEntry { key: SAVED_NUMBER_KEY.to_string(), value }
    }
}

/// Message pushed by the broker to a topic endpoint. No schema is enforced.
pub type InboundEvent = serde_json::Map<String, serde_json::Value>;
