use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: String,
    pub poll_interval_seconds: u64,
    pub advance_interval_millis: u64,
    pub stale_room_hours: u64,
    pub default_time_limit: u32,
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_path: env::var("DATA_PATH").unwrap_or_else(|_| "./neon-quiz-data.json".to_string()),
            poll_interval_seconds: env::var("POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("Invalid POLL_INTERVAL_SECONDS"),
            advance_interval_millis: env::var("ADVANCE_INTERVAL_MILLIS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("Invalid ADVANCE_INTERVAL_MILLIS"),
            stale_room_hours: env::var("STALE_ROOM_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("Invalid STALE_ROOM_HOURS"),
            default_time_limit: env::var("DEFAULT_TIME_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("Invalid DEFAULT_TIME_LIMIT"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
