use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_connections")]
    pub connections: u32,

    #[serde(default)]
    pub tls: bool,
}

fn default_driver() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            host: default_host(),
            username: String::new(),
            password: String::new(),
            name: String::new(),
            connections: default_connections(),
            tls: false,
        }
    }
}
