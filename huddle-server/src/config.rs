use huddle_core::IceServerConfig;
use std::net::SocketAddr;

/// Runtime settings for the signaling relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: SocketAddr,
    /// Handed to every client right after it joins.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ice_servers: Vec::new(),
        }
    }
}

impl RelayConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Self::default()
        }
    }

    pub fn with_stun(mut self, urls: Vec<String>) -> Self {
        if !urls.is_empty() {
            self.ice_servers.push(IceServerConfig {
                urls,
                username: None,
                credential: None,
            });
        }
        self
    }

    pub fn with_turn(
        mut self,
        url: String,
        username: Option<String>,
        credential: Option<String>,
    ) -> Self {
        self.ice_servers.push(IceServerConfig {
            urls: vec![url],
            username,
            credential,
        });
        self
    }
}
