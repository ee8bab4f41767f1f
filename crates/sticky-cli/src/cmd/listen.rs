use anyhow::{Context, Result};
use std::io;
use std::time::Duration;
use sticky_protocol::DecoderStats;
use sticky_serial::{FramePump, open_port};
use tracing::{debug, info, warn};

use crate::cmd::ListenArgs;
use crate::config::AppConfig;
use crate::output::{OutputFormat, write_frame, write_stats};

/// Wait between attempts to reopen a lost port.
const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(args: ListenArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let serial = args.apply(config.serial.clone());
    let decoder = args.decoder.apply(config.decoder.clone());
    decoder.validate().context("invalid decoder configuration")?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let stdout = io::stdout();
    let mut total = DecoderStats::default();
    let mut received = 0u64;

    'session: loop {
        let port = match open_port(&serial) {
            Ok(port) => port,
            Err(e) if e.is_disconnect() && !args.no_reconnect => {
                warn!(error = %e, "Port unavailable, retrying");
                tokio::select! {
                    _ = tokio::time::sleep(RECONNECT_INTERVAL) => continue 'session,
                    _ = &mut ctrl_c => break 'session,
                }
            }
            Err(e) => return Err(e).context("failed to open serial port"),
        };

        // A fresh assembler per session: bytes from a dropped link never
        // complete a frame on the new one.
        let mut pump = FramePump::with_config(port, decoder.clone(), serial.read_chunk_size)?;
        let mut stop = false;

        loop {
            let frame = tokio::select! {
                frame = pump.recv() => frame,
                _ = &mut ctrl_c => {
                    info!("Interrupted");
                    stop = true;
                    None
                }
            };
            let Some(frame) = frame else { break };

            debug!(frame = %frame, "Parsed frame");
            write_frame(&mut stdout.lock(), &frame, format)?;
            received += 1;

            if args.count.is_some_and(|count| received >= count) {
                stop = true;
                break;
            }
        }

        let session = if stop {
            pump.shutdown().await
        } else {
            pump.finish().await
        };

        match session {
            Ok(stats) => total += stats,
            Err(e) if e.is_disconnect() && !args.no_reconnect && !stop => {
                warn!(error = %e, "Serial link lost, reconnecting");
            }
            Err(e) => return Err(e).context("serial read failed"),
        }

        if stop || args.no_reconnect {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(RECONNECT_INTERVAL) => {}
            _ = &mut ctrl_c => break 'session,
        }
    }

    info!(received, "Listener stopped");
    write_stats(&mut io::stderr().lock(), &total, format)?;
    Ok(())
}
