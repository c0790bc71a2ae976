//! 待機対象エンドポイント

use crate::error::EndpointError;
use std::fmt;

/// A named TCP endpoint that must accept connections before the gate opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    address: String,
    port: u16,
}

impl Endpoint {
    /// Create a validated endpoint.
    ///
    /// Port `0` is rejected since nothing can listen on it.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
    ) -> Result<Self, EndpointError> {
        let name = name.into();
        let address = address.into();
        if name.is_empty() {
            return Err(EndpointError::EmptyName);
        }
        if address.is_empty() {
            return Err(EndpointError::EmptyAddress);
        }
        if port == 0 {
            return Err(EndpointError::InvalidPort {
                value: port.to_string(),
            });
        }
        Ok(Self {
            name,
            address,
            port,
        })
    }

    /// Create an endpoint from a raw port string, as found in the environment.
    pub fn parse(
        name: impl Into<String>,
        address: impl Into<String>,
        port: &str,
    ) -> Result<Self, EndpointError> {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| EndpointError::InvalidPort {
                value: port.to_string(),
            })?;
        Self::new(name, address, port)
    }

    /// Service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// TCP port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `address:port` string used for connecting
    pub fn address_and_port(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.address, self.port)
    }
}
