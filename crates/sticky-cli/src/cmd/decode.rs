use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use sticky_serial::FramePump;
use tracing::{debug, info};

use crate::cmd::DecodeArgs;
use crate::config::AppConfig;
use crate::output::{OutputFormat, write_frame, write_stats};

pub async fn run(args: DecodeArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let decoder = args.decoder.apply(config.decoder.clone());
    let source: Box<dyn Read + Send> = match &args.file {
        Some(path) => {
            info!(path = %path.display(), "Decoding capture file");
            Box::new(File::open(path).with_context(|| format!("failed to open {}", path.display()))?)
        }
        None => {
            info!("Decoding stdin");
            Box::new(io::stdin())
        }
    };

    let mut pump = FramePump::with_config(source, decoder, args.chunk_size)
        .context("invalid decoder configuration")?;
    let stdout = io::stdout();

    while let Some(frame) = pump.recv().await {
        debug!(frame = %frame, "Parsed frame");
        write_frame(&mut stdout.lock(), &frame, format)?;
    }

    let stats = pump.finish().await.context("decode failed")?;
    write_stats(&mut io::stderr().lock(), &stats, format)?;
    Ok(())
}
