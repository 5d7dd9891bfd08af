//! TCP listener setup: plaintext HTTP, TLS 1.3 HTTPS and the Prometheus
//! socket, each optionally front-ended by HAProxy with the PROXY protocol.
//!
//! Connections are accepted and served by hand (rather than `axum::serve`)
//! because the client address axum sees must be the PROXY-reported one and
//! the TLS handshake happens below the HTTP layer.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::connect_info::ConnectInfo;
use axum::Router;
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tower::ServiceExt;
use tracing::{debug, info};

/// How long a HAProxy front-end gets to deliver the PROXY header.
const PROXY_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest possible PROXY protocol v1 line, terminator included.
const PROXY_V1_MAX: usize = 107;

/// Serve `router` on `port`, optionally stripping PROXY headers. Returns
/// only on accept failure.
pub async fn serve_http(router: Router, port: u16, haproxy: bool) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("::", port)).await?;
    info!(port, "Binding HTTP");

    loop {
        let (stream, remote) = listener.accept().await?;
        let router = router.clone();

        tokio::spawn(async move {
            let (stream, client) = match client_address(stream, remote, haproxy).await {
                Ok(accepted) => accepted,
                Err(err) => {
                    debug!(client = %remote, error = %err, "Dropping connection");
                    return;
                }
            };

            serve_connection(stream, router, client).await;
        });
    }
}

/// Like [`serve_http`] with a strict TLS 1.3 handshake after the optional
/// PROXY header.
pub async fn serve_https(
    router: Router,
    port: u16,
    haproxy: bool,
    tls: Arc<rustls::ServerConfig>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("::", port)).await?;
    info!(port, "Binding HTTPS");

    let acceptor = TlsAcceptor::from(tls);

    loop {
        let (stream, remote) = listener.accept().await?;
        let router = router.clone();
        let acceptor = acceptor.clone();

        tokio::spawn(async move {
            let (stream, client) = match client_address(stream, remote, haproxy).await {
                Ok(accepted) => accepted,
                Err(err) => {
                    debug!(client = %remote, error = %err, "Dropping connection");
                    return;
                }
            };

            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(err) => {
                    debug!(client = %client, error = %err, "TLS handshake failed");
                    return;
                }
            };

            serve_connection(stream, router, client).await;
        });
    }
}

/// The Prometheus socket has no PROXY or TLS wrapping.
pub async fn serve_prometheus(router: Router, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("::", port)).await?;
    info!(port, "Binding Prometheus");

    axum::serve(listener, router).await?;
    Ok(())
}

/// Determine the real client address, consuming the PROXY v1 header when
/// HAProxy front-ending is configured.
async fn client_address(
    mut stream: TcpStream,
    remote: SocketAddr,
    haproxy: bool,
) -> anyhow::Result<(TcpStream, SocketAddr)> {
    if !haproxy {
        return Ok((stream, remote));
    }

    let header = tokio::time::timeout(PROXY_READ_TIMEOUT, read_proxy_line(&mut stream)).await??;

    let client = parse_proxy_source(&header).unwrap_or(remote);
    Ok((stream, client))
}

/// Read the PROXY v1 line (terminated by CRLF) off the front of the stream.
async fn read_proxy_line(stream: &mut TcpStream) -> anyhow::Result<String> {
    let mut line = Vec::with_capacity(PROXY_V1_MAX);
    let mut byte = [0u8; 1];

    loop {
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            anyhow::bail!("connection closed before PROXY header");
        }

        line.push(byte[0]);

        if byte[0] == b'\n' {
            break;
        }

        if line.len() > PROXY_V1_MAX {
            anyhow::bail!("oversized PROXY header");
        }
    }

    Ok(String::from_utf8(line)?)
}

/// Extract the source address from a PROXY v1 header line. `UNKNOWN`
/// connections keep the TCP-level peer address.
fn parse_proxy_source(line: &str) -> Option<SocketAddr> {
    let header = ppp::v1::Header::try_from(line).ok()?;

    match header.addresses {
        ppp::v1::Addresses::Tcp4(tcp) => {
            Some(SocketAddr::new(tcp.source_address.into(), tcp.source_port))
        }
        ppp::v1::Addresses::Tcp6(tcp) => {
            Some(SocketAddr::new(tcp.source_address.into(), tcp.source_port))
        }
        ppp::v1::Addresses::Unknown => None,
    }
}

/// Serve one connection, exposing `client` through axum's `ConnectInfo`.
async fn serve_connection<I>(stream: I, router: Router, client: SocketAddr)
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
        let router = router.clone();

        let mut request = request.map(axum::body::Body::new);
        request.extensions_mut().insert(ConnectInfo(client));

        router.oneshot(request)
    });

    if let Err(err) = Builder::new(TokioExecutor::new())
        .serve_connection_with_upgrades(TokioIo::new(stream), hyper_service)
        .await
    {
        debug!(error = %err, "Connection error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxy_v1_tcp4() {
        let client =
            parse_proxy_source("PROXY TCP4 192.168.0.1 192.168.0.11 56324 443\r\n").unwrap();

        assert_eq!(client.ip().to_string(), "192.168.0.1");
        assert_eq!(client.port(), 56324);
    }

    #[test]
    fn test_parse_proxy_v1_tcp6() {
        let client =
            parse_proxy_source("PROXY TCP6 2001:db8::1 2001:db8::2 56324 443\r\n").unwrap();

        assert_eq!(client.ip().to_string(), "2001:db8::1");
    }

    #[test]
    fn test_parse_proxy_v1_unknown_keeps_peer() {
        assert!(parse_proxy_source("PROXY UNKNOWN\r\n").is_none());
    }

    #[test]
    fn test_parse_proxy_v1_garbage() {
        assert!(parse_proxy_source("GET / HTTP/1.1\r\n").is_none());
    }
}
