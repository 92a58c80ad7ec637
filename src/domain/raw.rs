//! The leaderboard document as served upstream.
//!
//! Only the envelope is typed. Members and their completion maps stay as
//! [`serde_json::Value`] so one malformed member cannot fail the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLeaderboard {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Value>,
    #[serde(default)]
    pub members: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMember {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub completion_day_level: Map<String, Value>,
}

impl RawMember {
    /// Stable identifier: the member's `id`, else the key it was listed under.
    pub fn identifier(&self, key: &str) -> String {
        match &self.id {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => key.to_string(),
        }
    }

    pub fn display_name(&self, key: &str) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("(anonymous user #{})", self.identifier(key)),
        }
    }
}

impl RawLeaderboard {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
