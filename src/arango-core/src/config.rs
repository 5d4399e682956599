use serde::{Deserialize, Serialize};

/// Name of the database every server has and the root handle talks to.
pub const DEFAULT_DATABASE: &str = "_system";

/// Connection settings for one ArangoDB server.
///
/// The HTTP transport is supplied programmatically when the connection is
/// built and is therefore not part of this serialisable struct.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Internet transfer protocol, "http" or "https"
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8529
}

fn default_username() -> String {
    "root".to_string()
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ConnectionConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// URL prefix of the HTTP API scoped to `database`,
    /// e.g. `http://localhost:8529/_db/_system/_api`.
    pub fn url_prefix(&self, database: &str) -> String {
        format!(
            "{}://{}:{}/_db/{}/_api",
            self.protocol, self.host, self.port, database
        )
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: String::new(),
        }
    }
}
