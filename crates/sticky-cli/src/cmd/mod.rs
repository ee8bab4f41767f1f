use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use sticky_core::{DecoderConfig, HeaderMatch, OverflowPolicy};
use sticky_serial::SerialConfig;

use crate::config::AppConfig;
use crate::output::OutputFormat;

pub mod decode;
pub mod listen;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode frames from a capture file or stdin.
    Decode(DecodeArgs),
    /// Decode frames from a serial port, reopening it when the link drops.
    Listen(ListenArgs),
}

pub async fn run(command: Command, config: AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Command::Decode(args) => decode::run(args, &config, format).await,
        Command::Listen(args) => listen::run(args, &config, format).await,
    }
}

/// Decoder overrides shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct DecoderArgs {
    /// Use the legacy matcher that accepts non-adjacent header bytes.
    #[arg(long)]
    pub compat_header: bool,
    /// Maximum unresolved bytes kept between reads.
    #[arg(long, value_name = "BYTES")]
    pub max_residual: Option<usize>,
    /// What to do when the residual limit is hit.
    #[arg(long, value_name = "POLICY")]
    pub overflow_policy: Option<PolicyArg>,
}

impl DecoderArgs {
    pub fn apply(&self, mut config: DecoderConfig) -> DecoderConfig {
        if self.compat_header {
            config.header_match = HeaderMatch::Compat;
        }
        if let Some(max) = self.max_residual {
            config.max_residual_size = max;
        }
        if let Some(policy) = self.overflow_policy {
            config.overflow_policy = policy.into();
        }
        config
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    DropOldest,
    Reset,
}

impl From<PolicyArg> for OverflowPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::DropOldest => OverflowPolicy::DropOldest,
            PolicyArg::Reset => OverflowPolicy::Reset,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Bytes per read; small values simulate split packets.
    #[arg(long, default_value = "1024")]
    pub chunk_size: usize,
    #[command(flatten)]
    pub decoder: DecoderArgs,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path.
    #[arg(long, short = 'p', env = "STICKY_PORT")]
    pub port: Option<String>,
    /// Line speed in baud.
    #[arg(long, short = 'b')]
    pub baud: Option<u32>,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<u64>,
    /// Exit when the link drops instead of reopening the port.
    #[arg(long)]
    pub no_reconnect: bool,
    #[command(flatten)]
    pub decoder: DecoderArgs,
}

impl ListenArgs {
    pub fn apply(&self, mut config: SerialConfig) -> SerialConfig {
        if let Some(port) = &self.port {
            config.path = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        config
    }
}
