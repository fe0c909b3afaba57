use std::io;
use std::time::Duration;

use clap::Parser;
use retrolang::driver::{Driver, DriverConfig};
use retrolang::renderer::{Swatch, UnmappedPolicy};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retrolang", about = "Toy 8-bit processor with a color-grid display")]
struct Cli {
    /// Random seed for the noise pattern (defaults to a time-based seed).
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to draw (runs until interrupted if omitted).
    #[arg(long)]
    frames: Option<usize>,

    /// Pause between frames, in milliseconds.
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Cells per display row.
    #[arg(long, default_value_t = retrolang::renderer::DEFAULT_WIDTH)]
    width: usize,

    /// How to draw bytes with no color: "reject" or a swatch name
    /// (black, red, green, yellow, purple, cyan, white).
    #[arg(long, default_value = "reject", value_parser = parse_unmapped)]
    unmapped: UnmappedPolicy,

    /// Log the video region's high-order entropy after each frame.
    #[arg(long)]
    stats: bool,

    /// Do not clear the terminal between frames.
    #[arg(long)]
    no_clear: bool,

    /// Print registers and the full memory after the last frame.
    #[arg(long)]
    dump: bool,
}

/// Parse an `--unmapped` policy string.
fn parse_unmapped(s: &str) -> Result<UnmappedPolicy, String> {
    let swatch = match s.to_ascii_lowercase().as_str() {
        "reject" => return Ok(UnmappedPolicy::Reject),
        "black" => Swatch::Black,
        "red" => Swatch::Red,
        "green" => Swatch::Green,
        "yellow" => Swatch::Yellow,
        "purple" => Swatch::Purple,
        "cyan" => Swatch::Cyan,
        "white" => Swatch::White,
        other => return Err(format!("Unknown unmapped policy '{other}'")),
    };
    Ok(UnmappedPolicy::Substitute(swatch))
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retrolang=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let config = DriverConfig {
        frames: cli.frames,
        interval: Duration::from_millis(cli.interval_ms),
        width: cli.width,
        unmapped: cli.unmapped,
        stats: cli.stats,
        clear: !cli.no_clear,
    };

    let mut driver = match Driver::new(config, seed) {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!(seed, "starting display loop");

    let stdout = io::stdout();
    match driver.run(&mut stdout.lock()) {
        Ok(drawn) => info!(drawn, "done"),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }

    if cli.dump {
        println!("{}", driver.engine.registers());
        println!("{}", driver.engine.memory().dump());
    }
}
