use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration settings for the broadcast hub.
///
/// `outbound_buffer` bounds each connection's delivery queue; a subscriber
/// whose queue is full when a message is published gets dropped.
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub default_topic: String,
    pub outbound_buffer: usize,
    pub write_timeout_ms: u64,
    pub max_message_len: usize,
}

impl HubSettings {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// `topic` if one was given and is not blank, else `default_topic`.
    pub fn topic_or_default(&self, topic: Option<String>) -> String {
        topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.default_topic.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub hub: Option<PartialHubSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub default_topic: Option<String>,
    pub outbound_buffer: Option<usize>,
    pub write_timeout_ms: Option<u64>,
    pub max_message_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            hub: HubSettings {
                default_topic: "chat".to_string(),
                outbound_buffer: 64,
                write_timeout_ms: 5000,
                max_message_len: 4096,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Overlays the values present in `self` onto `defaults`.
    pub fn merge(self, defaults: Settings) -> Settings {
        let server = self.server;
        let hub = self.hub;
        let log = self.log;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(defaults.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(defaults.server.port),
            },
            hub: HubSettings {
                default_topic: hub
                    .as_ref()
                    .and_then(|h| h.default_topic.clone())
                    .unwrap_or(defaults.hub.default_topic),
                // a zero-capacity mpsc channel panics on creation
                outbound_buffer: hub
                    .as_ref()
                    .and_then(|h| h.outbound_buffer)
                    .filter(|n| *n > 0)
                    .unwrap_or(defaults.hub.outbound_buffer),
                write_timeout_ms: hub
                    .as_ref()
                    .and_then(|h| h.write_timeout_ms)
                    .unwrap_or(defaults.hub.write_timeout_ms),
                max_message_len: hub
                    .as_ref()
                    .and_then(|h| h.max_message_len)
                    .unwrap_or(defaults.hub.max_message_len),
            },
            log: LogSettings {
                level: log
                    .and_then(|l| l.level)
                    .unwrap_or(defaults.log.level),
            },
        }
    }
}
