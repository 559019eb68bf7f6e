//! Server configuration from environment variables

use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the HTTP/WebSocket listener binds to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(value = raw, "Invalid PORT, using default 5000");
                    5000
                }
            },
            Err(_) => 5000,
        };

        tracing::info!(port, "Server config loaded");

        Self { port }
    }

    /// Socket address to bind the listener to
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
