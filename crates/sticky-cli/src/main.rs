//! `sticky`: decode `AA BB <len> <payload> FF` frames from serial links and
//! captures.

mod cmd;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::cmd::Command;
use crate::config::AppConfig;
use crate::logging::{LogFormat, LogLevel, init_logging};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "sticky", version, about = "Sticky/split serial frame decoder")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, short = 'c', value_name = "PATH", global = true, env = "STICKY_CONFIG")]
    config: Option<PathBuf>,

    /// Frame output format (stdout).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). `RUST_LOG` overrides it.
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);
    tracing::debug!(version = sticky_core::VERSION, "Starting sticky");

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    cmd::run(cli.command, config, cli.format).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from([
            "sticky",
            "decode",
            "capture.bin",
            "--chunk-size",
            "3",
            "--compat-header",
        ])
        .expect("decode args should parse");

        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.chunk_size, 3);
                assert!(args.decoder.compat_header);
                assert_eq!(args.file, Some(PathBuf::from("capture.bin")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "sticky",
            "listen",
            "--port",
            "/dev/ttyS1",
            "--baud",
            "115200",
            "--overflow-policy",
            "reset",
            "--format",
            "json",
        ])
        .expect("listen args should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.port.as_deref(), Some("/dev/ttyS1"));
                assert_eq!(args.baud, Some(115200));
                assert_eq!(args.decoder.overflow_policy, Some(cmd::PolicyArg::Reset));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_overflow_policy() {
        let err = Cli::try_parse_from(["sticky", "decode", "--overflow-policy", "grow"])
            .expect_err("unknown policy should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
