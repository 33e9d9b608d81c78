//! Configuration types and validation for the gateway.

use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use alloy_primitives::Address;
use thiserror::Error;
use url::Url;

use crate::{
    LogConfig,
    constants::{
        DEFAULT_HTTP_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RPC_TIMEOUT, DEFAULT_SCAN_WINDOW,
    },
};

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid URL format.
    #[error("invalid {field} URL: {reason}")]
    InvalidUrl {
        /// The field name that contains the invalid URL.
        field: &'static str,
        /// The reason the URL is invalid.
        reason: String,
    },
    /// A field value is out of the allowed range.
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        /// The field name that is out of range.
        field: &'static str,
        /// The constraint description.
        constraint: &'static str,
        /// The actual value.
        value: String,
    },
    /// Neither or both ways of locating the state commitment chain were given.
    #[error("invalid contract config: {0}")]
    Contracts(String),
    /// Invalid metrics configuration.
    #[error("invalid metrics config: {0}")]
    Metrics(String),
}

/// Where the state commitment chain address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentChainSource {
    /// The address was given directly.
    Direct(Address),
    /// The address is looked up by name in this address manager at startup.
    AddressManager(Address),
}

impl CommitmentChainSource {
    /// Picks the source from the two mutually exclusive flags.
    pub fn from_flags(
        state_commitment_chain: Option<Address>,
        address_manager: Option<Address>,
    ) -> Result<Self, ConfigError> {
        match (state_commitment_chain, address_manager) {
            (Some(chain), None) => Ok(Self::Direct(chain)),
            (None, Some(manager)) => Ok(Self::AddressManager(manager)),
            (None, None) => Err(ConfigError::Contracts(
                "one of --state-commitment-chain-addr or --address-manager-addr must be provided"
                    .to_string(),
            )),
            (Some(_), Some(_)) => Err(ConfigError::Contracts(
                "--state-commitment-chain-addr is mutually exclusive with --address-manager-addr"
                    .to_string(),
            )),
        }
    }
}

/// Validated HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    /// Bind address.
    pub addr: IpAddr,
    /// Listening port.
    pub port: u16,
    /// Deadline for answering one `/query` request.
    pub request_timeout: Duration,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_HTTP_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Validated metrics server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is started.
    pub enabled: bool,
    /// Exporter bind address.
    pub addr: IpAddr,
    /// Exporter port.
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 7300 }
    }
}

/// Validated gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// URL of the L1 Ethereum RPC endpoint.
    pub l1_eth_rpc: Url,
    /// URL of the L2 Ethereum RPC endpoint.
    pub l2_eth_rpc: Url,
    /// How to find the state commitment chain on L1.
    pub commitment_chain: CommitmentChainSource,
    /// L1 blocks per `eth_getLogs` window.
    pub scan_window: u64,
    /// Timeout of each upstream RPC call.
    pub rpc_timeout: Duration,
    /// Skip TLS certificate verification.
    pub skip_tls_verify: bool,
    /// Logging configuration.
    pub log: LogConfig,
    /// Metrics server configuration.
    pub metrics: MetricsConfig,
    /// HTTP server configuration.
    pub http: HttpServerConfig,
}

impl GatewayConfig {
    /// Creates a config with defaults for everything but the endpoints and chain source.
    pub fn new(l1_eth_rpc: Url, l2_eth_rpc: Url, commitment_chain: CommitmentChainSource) -> Self {
        Self {
            l1_eth_rpc,
            l2_eth_rpc,
            commitment_chain,
            scan_window: DEFAULT_SCAN_WINDOW,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            skip_tls_verify: false,
            log: LogConfig::default(),
            metrics: MetricsConfig::default(),
            http: HttpServerConfig::default(),
        }
    }

    /// Checks every field that cannot be enforced by its type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.l1_eth_rpc, "l1-eth-rpc")?;
        validate_url(&self.l2_eth_rpc, "l2-eth-rpc")?;

        if self.scan_window == 0 {
            return Err(ConfigError::OutOfRange {
                field: "scan-window",
                constraint: "greater than 0",
                value: self.scan_window.to_string(),
            });
        }

        for (field, value) in
            [("rpc-timeout", self.rpc_timeout), ("request-timeout", self.http.request_timeout)]
        {
            if value.is_zero() {
                return Err(ConfigError::OutOfRange {
                    field,
                    constraint: "greater than 0",
                    value: format!("{value:?}"),
                });
            }
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::Metrics("port must be non-zero".to_string()));
        }

        Ok(())
    }
}

/// Validate that a URL has a scheme and host.
pub fn validate_url(url: &Url, field: &'static str) -> Result<(), ConfigError> {
    if url.scheme().is_empty() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing scheme".to_string() });
    }

    if url.host().is_none() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing host".to_string() });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig::new(
            Url::parse("http://localhost:8545").unwrap(),
            Url::parse("http://localhost:9545").unwrap(),
            CommitmentChainSource::Direct(Address::repeat_byte(1)),
        )
    }

    #[test]
    fn test_url_without_host() {
        let url = Url::parse("file:///some/path").unwrap();
        let result = validate_url(&url, "l1-eth-rpc");
        assert!(matches!(result, Err(ConfigError::InvalidUrl { field: "l1-eth-rpc", .. })));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan_window, 100);
        assert_eq!(config.http.port, 8081);
        assert_eq!(config.http.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_zero_scan_window_rejected() {
        let mut config = config();
        config.scan_window = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "scan-window", .. })
        ));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut config = config();
        config.http.request_timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "request-timeout", .. })
        ));
    }

    #[test]
    fn test_metrics_port_zero_rejected() {
        let mut config = config();
        config.metrics = MetricsConfig { enabled: true, port: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Metrics(_))));
    }

    #[test]
    fn test_commitment_chain_source() {
        let chain = Address::repeat_byte(1);
        let manager = Address::repeat_byte(2);

        assert_eq!(
            CommitmentChainSource::from_flags(Some(chain), None).unwrap(),
            CommitmentChainSource::Direct(chain)
        );
        assert_eq!(
            CommitmentChainSource::from_flags(None, Some(manager)).unwrap(),
            CommitmentChainSource::AddressManager(manager)
        );
        assert!(matches!(
            CommitmentChainSource::from_flags(None, None),
            Err(ConfigError::Contracts(_))
        ));
        assert!(matches!(
            CommitmentChainSource::from_flags(Some(chain), Some(manager)),
            Err(ConfigError::Contracts(_))
        ));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::OutOfRange {
            field: "scan-window",
            constraint: "greater than 0",
            value: "0".to_string(),
        };
        assert_eq!(error.to_string(), "scan-window must be greater than 0, got 0");
    }
}
