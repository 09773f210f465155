use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::chat::POLL_INTERVAL;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_path: PathBuf,
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Read `COLOMBIA_API_URL`, `COLOMBIA_SESSION_PATH` and
    /// `COLOMBIA_POLL_SECS`, falling back to local defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url =
            std::env::var("COLOMBIA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".into());
        let session_path: PathBuf = std::env::var("COLOMBIA_SESSION_PATH")
            .unwrap_or_else(|_| ".colombia-session.json".into())
            .into();
        let poll_interval = match std::env::var("COLOMBIA_POLL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("COLOMBIA_POLL_SECS is not a number: {raw}"))?;
                anyhow::ensure!(secs > 0, "COLOMBIA_POLL_SECS must be at least 1");
                Duration::from_secs(secs)
            }
            Err(_) => POLL_INTERVAL,
        };

        Ok(Self {
            api_url,
            session_path,
            poll_interval,
        })
    }
}
