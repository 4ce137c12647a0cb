use std::env;
use std::time::Duration;

use reqwest::Client;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self { user_agent: DEFAULT_USER_AGENT.into(), timeout: DEFAULT_TIMEOUT }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("USER_AGENT").ok(), env::var("REQUEST_TIMEOUT").ok())
    }

    fn from_vars(user_agent: Option<String>, timeout: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(user_agent) = user_agent.filter(|user_agent| !user_agent.trim().is_empty()) {
            config.user_agent = user_agent;
        }

        if let Some(timeout) = timeout {
            match timeout.trim().parse::<u64>() {
                Ok(seconds) if seconds > 0 => config.timeout = Duration::from_secs(seconds),
                _ => log::warn!(
                    "invalid REQUEST_TIMEOUT {timeout:?}, using {}s",
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }

        config
    }

    pub fn http_client(&self) -> reqwest::Result<Client> {
        Client::builder().user_agent(&self.user_agent).timeout(self.timeout).build()
    }
}
