use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::path::PathBuf;
use watchface_complications::config::PreviewConfig;
use watchface_complications::preview::{render_preview, PreviewOptions};

/// complication-preview - Render watch-face complications to a PNG
#[derive(Parser, Debug, Clone)]
#[command(name = "complication-preview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preview config file (defaults to the user config, then built-in defaults)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "preview.png")]
    output: PathBuf,

    /// Draw in ambient mode
    #[arg(long)]
    ambient: bool,

    /// Pretend the display has low-bit ambient (overrides the config)
    #[arg(long = "low-bit")]
    low_bit: bool,

    /// Pretend the display needs burn-in protection (overrides the config)
    #[arg(long = "burn-in")]
    burn_in: bool,

    /// Instant to render at, RFC 3339 (e.g. 2024-05-01T12:00:00Z). Defaults to now
    #[arg(short = 't', long = "time", value_name = "RFC3339", value_parser = parse_time)]
    time: Option<DateTime<Utc>>,

    /// Load images before drawing instead of in the background
    #[arg(long = "sync-images")]
    sync_images: bool,

    /// Write the effective config next to the output and exit
    #[arg(long = "dump-config")]
    dump_config: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

/// Parse an RFC 3339 timestamp into UTC
fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| format!("Invalid RFC 3339 time '{}': {}", s, e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info, 2: debug, 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting complication-preview v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => PreviewConfig::load_from_path(path)?,
        None => PreviewConfig::load()?,
    };
    config.watch.low_bit_ambient |= cli.low_bit;
    config.watch.burn_in_protection |= cli.burn_in;

    if cli.dump_config {
        let path = cli.output.with_extension("json");
        config.save_to_path(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    for id in config.slots_outside_canvas() {
        warn!(
            "Slot '{}' extends past the {}x{} canvas",
            id, config.canvas.width, config.canvas.height
        );
    }

    let options = PreviewOptions {
        now: cli.time.unwrap_or_else(Utc::now),
        ambient: cli.ambient,
        sync_images: cli.sync_images,
    };
    let frame = render_preview(&config, &options)?;
    for (id, state) in &frame.states {
        info!("{}: {:?}", id, state);
    }

    let mut file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    frame
        .surface
        .write_to_png(&mut file)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_normalizes_to_utc() {
        let time = parse_time("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(time.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert!(parse_time("tomorrow").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "complication-preview",
            "face.json",
            "-o",
            "out.png",
            "--ambient",
            "--burn-in",
            "-d",
            "2",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("face.json")));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert!(cli.ambient && cli.burn_in && !cli.low_bit);
        assert_eq!(cli.debug, 2);
    }
}
