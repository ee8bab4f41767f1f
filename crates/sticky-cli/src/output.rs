use clap::ValueEnum;
use serde_json::json;
use std::io::{self, Write};
use sticky_protocol::{DecoderStats, Frame};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One hex frame per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

pub fn write_frame(out: &mut impl Write, frame: &Frame, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{frame}"),
        OutputFormat::Json => {
            let line = json!({
                "length": frame.length(),
                "payload": sticky_protocol::frame::to_hex(frame.payload()),
                "frame": frame.to_hex(),
            });
            writeln!(out, "{line}")
        }
    }
}

pub fn write_stats(out: &mut impl Write, stats: &DecoderStats, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "frames={} corrupt={} malformed={} discarded={} overflows={}",
            stats.frames_emitted,
            stats.corrupt_frames,
            stats.malformed_lengths,
            stats.bytes_discarded,
            stats.overflows
        ),
        OutputFormat::Json => writeln!(out, "{}", json!({ "stats": stats })),
    }
}
