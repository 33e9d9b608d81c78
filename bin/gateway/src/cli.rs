//! CLI definition for the gateway binary.

use std::{net::IpAddr, time::Duration};

use alloy_primitives::Address;
use base_gateway::{
    CommitmentChainSource, ConfigError, DEFAULT_HTTP_PORT, GatewayConfig, HttpServerConfig,
    LogConfig, LogFormat, MetricsConfig,
};
use clap::{ArgAction, Parser};
use url::Url;

/// Gateway - serves L2 state proofs to L1 resolver stubs.
#[derive(Debug, Clone, Parser)]
#[command(name = "gateway")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Gateway configuration arguments.
    #[command(flatten)]
    pub gateway: GatewayArgs,

    /// Logging configuration arguments.
    #[command(flatten)]
    pub logging: LogArgs,

    /// Metrics configuration arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,

    /// HTTP server configuration arguments.
    #[command(flatten)]
    pub http: HttpArgs,
}

/// Core gateway configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Gateway")]
pub(crate) struct GatewayArgs {
    /// URL of the L1 Ethereum RPC endpoint.
    #[arg(long = "l1-eth-rpc", env = "BASE_GATEWAY_L1_ETH_RPC", value_parser = parse_url)]
    pub l1_eth_rpc: Url,

    /// URL of the L2 Ethereum RPC endpoint.
    #[arg(long = "l2-eth-rpc", env = "BASE_GATEWAY_L2_ETH_RPC", value_parser = parse_url)]
    pub l2_eth_rpc: Url,

    /// Address of the `StateCommitmentChain` contract on L1.
    /// Mutually exclusive with --address-manager-addr.
    #[arg(
        long = "state-commitment-chain-addr",
        env = "BASE_GATEWAY_STATE_COMMITMENT_CHAIN_ADDR",
        value_parser = parse_address
    )]
    pub state_commitment_chain_addr: Option<Address>,

    /// Address of the `Lib_AddressManager` contract on L1, used to look up
    /// the state commitment chain at startup.
    #[arg(
        long = "address-manager-addr",
        env = "BASE_GATEWAY_ADDRESS_MANAGER_ADDR",
        value_parser = parse_address
    )]
    pub address_manager_addr: Option<Address>,

    /// Number of L1 blocks per `eth_getLogs` window when scanning for batches.
    #[arg(long = "scan-window", env = "BASE_GATEWAY_SCAN_WINDOW", default_value = "100")]
    pub scan_window: u64,

    /// Timeout of each upstream RPC call (e.g., "30s", "1m").
    #[arg(
        long = "rpc-timeout",
        env = "BASE_GATEWAY_RPC_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration
    )]
    pub rpc_timeout: Duration,

    /// Skip TLS certificate verification.
    #[arg(long = "skip-tls-verify", env = "BASE_GATEWAY_SKIP_TLS_VERIFY", default_value = "false")]
    pub skip_tls_verify: bool,
}

/// Logging configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Increase logging verbosity (1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5=TRACE).
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        default_value = "3",
        env = "BASE_GATEWAY_LOG_LEVEL",
        global = true
    )]
    pub level: u8,

    /// Suppress stdout logging.
    #[arg(long = "quiet", short = 'q', env = "BASE_GATEWAY_LOG_QUIET", global = true)]
    pub stdout_quiet: bool,

    /// Stdout log format.
    #[arg(
        long = "log-format",
        default_value = "full",
        env = "BASE_GATEWAY_LOG_FORMAT",
        global = true
    )]
    pub stdout_format: LogFormat,
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        Self::new(args.level, args.stdout_quiet, args.stdout_format)
    }
}

/// Metrics server configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Metrics")]
pub(crate) struct MetricsArgs {
    /// Enable metrics server.
    #[arg(
        id = "metrics_enabled",
        long = "metrics.enabled",
        env = "BASE_GATEWAY_METRICS_ENABLED",
        default_value = "false"
    )]
    pub enabled: bool,

    /// Metrics server bind address.
    #[arg(
        id = "metrics_addr",
        long = "metrics.addr",
        env = "BASE_GATEWAY_METRICS_ADDR",
        default_value = "0.0.0.0"
    )]
    pub addr: IpAddr,

    /// Metrics server port.
    #[arg(
        id = "metrics_port",
        long = "metrics.port",
        env = "BASE_GATEWAY_METRICS_PORT",
        default_value = "7300"
    )]
    pub port: u16,
}

impl From<MetricsArgs> for MetricsConfig {
    fn from(args: MetricsArgs) -> Self {
        Self { enabled: args.enabled, addr: args.addr, port: args.port }
    }
}

/// HTTP server configuration arguments.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "HTTP Server")]
pub(crate) struct HttpArgs {
    /// HTTP server bind address.
    #[arg(
        id = "http_addr",
        long = "http.addr",
        env = "BASE_GATEWAY_HTTP_ADDR",
        default_value = "0.0.0.0"
    )]
    pub addr: IpAddr,

    /// HTTP server port.
    #[arg(
        id = "http_port",
        long = "http.port",
        env = "BASE_GATEWAY_HTTP_PORT",
        default_value_t = DEFAULT_HTTP_PORT
    )]
    pub port: u16,

    /// Deadline for answering one `/query` request (e.g., "60s", "2m").
    #[arg(
        long = "request-timeout",
        env = "BASE_GATEWAY_REQUEST_TIMEOUT",
        default_value = "60s",
        value_parser = parse_duration
    )]
    pub request_timeout: Duration,
}

impl TryFrom<Cli> for GatewayConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let commitment_chain = CommitmentChainSource::from_flags(
            cli.gateway.state_commitment_chain_addr,
            cli.gateway.address_manager_addr,
        )?;

        let config = Self {
            l1_eth_rpc: cli.gateway.l1_eth_rpc,
            l2_eth_rpc: cli.gateway.l2_eth_rpc,
            commitment_chain,
            scan_window: cli.gateway.scan_window,
            rpc_timeout: cli.gateway.rpc_timeout,
            skip_tls_verify: cli.gateway.skip_tls_verify,
            log: cli.logging.into(),
            metrics: cli.metrics.into(),
            http: HttpServerConfig {
                addr: cli.http.addr,
                port: cli.http.port,
                request_timeout: cli.http.request_timeout,
            },
        };
        config.validate()?;

        Ok(config)
    }
}

/// Parse a duration string like "12s", "5m", "1h".
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// Parse a URL string.
fn parse_url(s: &str) -> Result<Url, url::ParseError> {
    Url::parse(s)
}

/// Parse an Ethereum address from hex string.
fn parse_address(s: &str) -> Result<Address, alloy_primitives::hex::FromHexError> {
    s.parse()
}
