//! Schedule resource implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rest::Resource;

/// One recurring open window within a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleRule {
    /// Lowercase weekday names, e.g. `["monday", "tuesday"]`.
    pub days: Vec<String>,
    /// Local start time, `HH:MM`.
    pub start: String,
    /// Local end time, `HH:MM`.
    pub end: String,
}

/// Business hours used for call routing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// IANA time zone name the rules are evaluated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ScheduleRule>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Resource for Schedule {
    const NAME: &'static str = "Schedule";
    const COLLECTION_PATH: &'static str = "/v1/schedules";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_deserialization() {
        let schedule: Schedule = serde_json::from_value(json!({
            "id": "sch_1",
            "name": "Office hours",
            "timezone": "America/Los_Angeles",
            "rules": [
                {"days": ["monday", "friday"], "start": "09:00", "end": "17:00"}
            ],
            "holidays": []
        }))
        .unwrap();

        assert_eq!(schedule.rules.len(), 1);
        assert_eq!(schedule.rules[0].start, "09:00");
        assert!(schedule.extra.contains_key("holidays"));
    }
}
