use crate::error::{ChatError, Result};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP/WebSocket server configuration
    pub server: ServerConfig,
    /// Relay loop configuration
    pub relay: RelayConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to serve HTTP and WebSocket traffic on (default: 8000)
    pub port: u16,
    /// Host to bind to (default: 0.0.0.0)
    pub host: String,
    /// Directory of static UI assets served at "/"
    pub public_dir: String,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Whether a client receives its own messages back (default: true)
    pub self_echo: bool,
    /// Upper bound in seconds on one broadcast write before the recipient
    /// is treated as dead and dropped
    pub write_timeout_secs: u64,
    /// Capacity of the inbound message queue
    pub queue_capacity: usize,
}

impl RelayConfig {
    /// The broadcast write timeout as a [`Duration`]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let queue_capacity: usize = get_env_or("CHAT_QUEUE_CAPACITY", "1024")
            .parse()
            .map_err(|_| {
                ChatError::InvalidConfig("CHAT_QUEUE_CAPACITY must be a valid number".into())
            })?;
        if queue_capacity == 0 {
            return Err(ChatError::InvalidConfig(
                "CHAT_QUEUE_CAPACITY must be at least 1".into(),
            ));
        }

        Ok(Config {
            server: ServerConfig {
                port: get_env_or("CHAT_PORT", "8000").parse().map_err(|_| {
                    ChatError::InvalidConfig("CHAT_PORT must be a valid port number".into())
                })?,
                host: get_env_or("CHAT_HOST", "0.0.0.0"),
                public_dir: get_env_or("CHAT_PUBLIC_DIR", "./public"),
            },
            relay: RelayConfig {
                self_echo: get_env_or("CHAT_SELF_ECHO", "true").parse().unwrap_or(true),
                write_timeout_secs: get_env_or("CHAT_WRITE_TIMEOUT_SECS", "10")
                    .parse()
                    .unwrap_or(10),
                queue_capacity,
            },
        })
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONFIG_ENV_KEYS: &[&str] = &[
        "CHAT_PORT",
        "CHAT_HOST",
        "CHAT_PUBLIC_DIR",
        "CHAT_SELF_ECHO",
        "CHAT_WRITE_TIMEOUT_SECS",
        "CHAT_QUEUE_CAPACITY",
    ];

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&str]) -> Self {
            let saved = keys
                .iter()
                .map(|&key| {
                    let old = env::var(key).ok();
                    env::remove_var(key);
                    (key.to_string(), old)
                })
                .collect();

            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        let config = Config::from_env().unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.public_dir, "./public");

        assert!(config.relay.self_echo);
        assert_eq!(config.relay.write_timeout_secs, 10);
        assert_eq!(config.relay.queue_capacity, 1024);
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("CHAT_PORT", "9000");
        env::set_var("CHAT_HOST", "127.0.0.1");
        env::set_var("CHAT_PUBLIC_DIR", "/srv/chat/public");
        env::set_var("CHAT_SELF_ECHO", "false");
        env::set_var("CHAT_WRITE_TIMEOUT_SECS", "3");
        env::set_var("CHAT_QUEUE_CAPACITY", "64");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.public_dir, "/srv/chat/public");
        assert!(!config.relay.self_echo);
        assert_eq!(config.relay.write_timeout_secs, 3);
        assert_eq!(config.relay.write_timeout(), Duration::from_secs(3));
        assert_eq!(config.relay.queue_capacity, 64);
    }

    #[test]
    fn test_config_from_env_invalid_port() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("CHAT_PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_from_env_zero_queue_capacity() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("CHAT_QUEUE_CAPACITY", "0");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfig(_)));
    }

    #[test]
    fn test_server_addr_formatter() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::new(CONFIG_ENV_KEYS);

        env::set_var("CHAT_HOST", "0.0.0.0");
        env::set_var("CHAT_PORT", "8000");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
    }
}
