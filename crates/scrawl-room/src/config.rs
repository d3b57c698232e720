//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Prompt used whenever the topic source fails, times out, or returns
/// nothing usable.
pub const DEFAULT_FALLBACK_TOPIC: &str = "Ultraman eating hot pot";

/// Configuration for the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Number of characters in a room code. Values below 1 are treated as 1.
    pub room_code_len: usize,

    /// How long to wait for the topic source before using the fallback.
    pub topic_timeout: Duration,

    /// Prompt used when the topic source can't deliver.
    pub fallback_topic: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_code_len: 4,
            topic_timeout: Duration::from_secs(5),
            fallback_topic: DEFAULT_FALLBACK_TOPIC.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.room_code_len, 4);
        assert_eq!(config.topic_timeout, Duration::from_secs(5));
        assert_eq!(config.fallback_topic, DEFAULT_FALLBACK_TOPIC);
    }

    #[test]
    fn test_room_config_from_json() {
        let raw = r#"{
            "room_code_len": 6,
            "topic_timeout": { "secs": 2, "nanos": 0 },
            "fallback_topic": "A cat doing taxes"
        }"#;
        let config: RoomConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.room_code_len, 6);
        assert_eq!(config.topic_timeout, Duration::from_secs(2));
        assert_eq!(config.fallback_topic, "A cat doing taxes");
    }
}
