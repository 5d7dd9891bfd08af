use anyhow::{anyhow, bail};
use futures::stream::{SplitSink, SplitStream};
use futures::StreamExt;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type EventStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
pub type EventSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Thin REST client for the askgod API.
pub struct Client {
    server: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(server: String) -> anyhow::Result<Self> {
        if !server.starts_with("http://") && !server.starts_with("https://") {
            bail!("Unsupported server URL: {}", server);
        }

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> anyhow::Result<reqwest::Response> {
        let url = format!("{}/1.0{}", self.server, path);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();

            if message.trim().is_empty() {
                bail!("{}: {}", url, status);
            }

            bail!("{}", message.trim());
        }

        Ok(response)
    }

    /// Issue a request and decode the JSON response.
    pub async fn query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> anyhow::Result<T> {
        let response = self.send(method, path, body).await?;

        Ok(response.json().await?)
    }

    /// Issue a request and discard the (empty) response body.
    pub async fn query_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> anyhow::Result<()> {
        self.send(method, path, body).await?;

        Ok(())
    }

    /// Open the event websocket for the given subscription types.
    pub async fn events(&self, types: &str) -> anyhow::Result<(EventSink, EventStream)> {
        let url = if let Some(host) = self.server.strip_prefix("https://") {
            format!("wss://{}/1.0/events?type={}", host, types)
        } else {
            let host = self
                .server
                .strip_prefix("http://")
                .ok_or_else(|| anyhow!("Unsupported server URL: {}", self.server))?;
            format!("ws://{}/1.0/events?type={}", host, types)
        };

        let (ws, _) = connect_async(url.as_str()).await?;

        Ok(ws.split())
    }
}
