//! Phone number resource implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rest::Resource;

/// A phone number provisioned on an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneNumber {
    pub id: String,
    /// The number in E.164 format, e.g. `+14155550123`.
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Supported channels, e.g. `voice`, `sms`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    /// The user calls to this number ring, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl PhoneNumber {
    /// Returns `true` if the number supports `capability`.
    #[must_use]
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(capability))
    }
}

impl Resource for PhoneNumber {
    const NAME: &'static str = "PhoneNumber";
    const COLLECTION_PATH: &'static str = "/v1/phone_numbers";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phone_number_capabilities() {
        let number: PhoneNumber = serde_json::from_value(json!({
            "id": "pn_1",
            "number": "+14155550123",
            "capabilities": ["voice", "SMS"]
        }))
        .unwrap();

        assert!(number.supports("voice"));
        assert!(number.supports("sms"));
        assert!(!number.supports("fax"));
        assert!(number.user_id.is_none());
    }

    #[test]
    fn test_phone_number_requires_number() {
        let result = serde_json::from_value::<PhoneNumber>(json!({"id": "pn_1"}));
        assert!(result.is_err());
    }
}
