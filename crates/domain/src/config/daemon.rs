use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Origins allowed for CORS, exact match or "*".
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// URLs of the other servers in the cluster.
    #[serde(default)]
    pub cluster_peers: Vec<String>,

    /// Expect a PROXY protocol v1 header on HTTP and HTTPS connections.
    #[serde(default)]
    pub haproxy_header: bool,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// 0 disables the HTTPS listener.
    #[serde(default)]
    pub https_port: u16,

    /// PEM certificate chain, inline or a file path.
    #[serde(default)]
    pub https_certificate: String,

    /// PEM private key, inline or a file path.
    #[serde(default)]
    pub https_key: String,

    /// 0 disables the Prometheus listener.
    #[serde(default)]
    pub prometheus_port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_file: String,
}

fn default_http_port() -> u16 {
    9080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            cluster_peers: Vec::new(),
            haproxy_header: false,
            http_port: default_http_port(),
            https_port: 0,
            https_certificate: String::new(),
            https_key: String::new(),
            prometheus_port: 0,
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}
