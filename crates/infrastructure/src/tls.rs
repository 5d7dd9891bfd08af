//! TLS setup: the strict server config for the HTTPS listener and the
//! pinned-certificate client config used when dialing cluster peers.

use std::path::Path;
use std::sync::Arc;

use askgod_domain::StoreError;
use rustls::pki_types::CertificateDer;

/// PEM material may be configured inline or as a file path.
fn load_pem(value: &str) -> Result<Vec<u8>, StoreError> {
    if value.contains('\n') {
        return Ok(value.as_bytes().to_vec());
    }

    if Path::new(value).exists() {
        return std::fs::read(value)
            .map_err(|e| StoreError::InvalidInput(format!("Failed to read {}: {}", value, e)));
    }

    Err(StoreError::InvalidInput(format!(
        "Not a PEM blob or file path: {}",
        value
    )))
}

fn parse_certs(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, StoreError> {
    let certs: Result<Vec<_>, _> = rustls_pemfile::certs(&mut &pem[..]).collect();
    let certs =
        certs.map_err(|e| StoreError::InvalidInput(format!("Failed to parse certificate: {}", e)))?;

    if certs.is_empty() {
        return Err(StoreError::InvalidInput(
            "No certificate found in PEM data".to_string(),
        ));
    }

    Ok(certs)
}

/// TLS 1.3 only server configuration for the HTTPS listener.
pub fn server_config(cert: &str, key: &str) -> Result<Arc<rustls::ServerConfig>, StoreError> {
    let certs = parse_certs(&load_pem(cert)?)?;

    let key_pem = load_pem(key)?;
    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|e| StoreError::InvalidInput(format!("Failed to parse key: {}", e)))?
        .ok_or_else(|| StoreError::InvalidInput("No private key found in PEM data".to_string()))?;

    let config = rustls::ServerConfig::builder_with_protocol_versions(&[&rustls::version::TLS13])
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| StoreError::InvalidInput(format!("Bad certificate/key pair: {}", e)))?;

    Ok(Arc::new(config))
}

/// Client configuration for dialing peers: the configured cluster
/// certificate is the only trust root, so connections only succeed against
/// servers presenting exactly that chain.
pub fn cluster_client_config(cert: &str) -> Result<Arc<rustls::ClientConfig>, StoreError> {
    let mut roots = rustls::RootCertStore::empty();

    for cert in parse_certs(&load_pem(cert)?)? {
        roots
            .add(cert)
            .map_err(|e| StoreError::InvalidInput(format!("Bad cluster certificate: {}", e)))?;
    }

    let config = rustls::ClientConfig::builder_with_protocol_versions(&[&rustls::version::TLS13])
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}
