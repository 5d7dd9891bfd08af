use std::net::IpAddr;

use arc_swap::ArcSwap;
use ipnetwork::IpNetwork;
use tracing::{error, warn};

use super::SharedConfig;

/// Access levels, lowest to highest. Qualifying for a level implies every
/// level below it; cluster peers bypass the ladder entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Guest,
    Team,
    Admin,
    Peer,
}

/// Classifies requests by client address.
///
/// Identity is purely network-locational: the configured subnet lists map an
/// address to a role, and the pre-resolved peer list grants cluster access by
/// exact IP match.
pub struct AccessResolver {
    config: SharedConfig,
    peers: ArcSwap<Vec<IpAddr>>,
}

impl AccessResolver {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            peers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Resolve the configured `cluster_peers` URLs into a flat IP allowlist.
    ///
    /// Literal IPs are kept as-is, hostnames go through DNS once. A peer that
    /// fails to resolve is logged and skipped; it can still dial us if its
    /// address resolves later from its side.
    pub async fn resolve_peers(&self) {
        let config = self.config.load();
        let mut addrs = Vec::new();

        for peer in &config.daemon.cluster_peers {
            match resolve_peer_host(peer).await {
                Ok(mut resolved) => addrs.append(&mut resolved),
                Err(err) => {
                    error!(peer = %peer, error = %err, "Failed to resolve cluster peer");
                }
            }
        }

        self.peers.store(std::sync::Arc::new(addrs));
    }

    pub fn is_peer(&self, ip: IpAddr) -> bool {
        self.peers.load().contains(&ip)
    }

    /// Check whether `ip` is allowed to act at `role`.
    pub fn allowed(&self, ip: IpAddr, role: Role) -> bool {
        let config = self.config.load();

        // Peers get in regardless of the requested role.
        if !config.daemon.cluster_peers.is_empty() && self.is_peer(ip) {
            return true;
        }

        if role == Role::Peer {
            return false;
        }

        if subnets_contain(&config.editable.subnets.admins, ip) {
            return true;
        }

        if role == Role::Admin {
            return false;
        }

        if subnets_contain(&config.editable.subnets.teams, ip) {
            return true;
        }

        if role == Role::Team {
            return false;
        }

        if subnets_contain(&config.editable.subnets.guests, ip) {
            return true;
        }

        warn!(client = %ip, "Unauthorized access");
        false
    }
}

fn subnets_contain(subnets: &[String], ip: IpAddr) -> bool {
    for entry in subnets {
        let network: IpNetwork = match entry.trim().parse() {
            Ok(network) => network,
            Err(err) => {
                error!(subnet = %entry, error = %err, "Unable to parse configured subnet");
                continue;
            }
        };

        if network.contains(ip) {
            return true;
        }
    }

    false
}

async fn resolve_peer_host(peer: &str) -> Result<Vec<IpAddr>, String> {
    let parsed = url::Url::parse(peer).map_err(|e| e.to_string())?;
    let host = parsed.host_str().ok_or_else(|| "missing host".to_string())?;

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let addrs = tokio::net::lookup_host((host, parsed.port().unwrap_or(443)))
        .await
        .map_err(|e| e.to_string())?
        .map(|addr| addr.ip())
        .collect();

    Ok(addrs)
}
