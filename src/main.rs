//! Labsim - Breadboard and Microcontroller Lab Simulator
//!
//! Runs a board description for a number of ticks and prints the resolved
//! pin values as CSV.
//!
//! # Usage
//!
//! ```bash
//! labsim blink.json --ticks 40 --probe U1:13 --probe LED1:IN > blink.csv
//! RUST_LOG=labsim_core=debug labsim blink.json
//! ```

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use labsim_core::{
    board::Board,
    circuit::PinRef,
    error::Result,
    probe::{parse_probe, WaveformWriter},
    Simulator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Breadboard and microcontroller lab simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board description file (.json)
    #[arg(value_name = "BOARD_FILE")]
    board_file: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 20)]
    ticks: u64,

    /// Simulated milliseconds per tick (overrides the board's config)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Pin to record, as COMPONENT:PIN (repeatable; default: every resolved pin)
    #[arg(short, long = "probe", value_name = "COMP:PIN")]
    probes: Vec<String>,

    /// Sleep one tick period between ticks
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    // Load the board
    let mut board = Board::from_file(&args.board_file)?;
    if let Some(tick_ms) = args.tick_ms {
        board.config.tick_ms = tick_ms;
    }
    board.config.validate()?;

    let probes = args
        .probes
        .iter()
        .map(|p| parse_probe(p))
        .collect::<Result<Vec<PinRef>>>()?;

    let mut simulator = Simulator::with_config(board.config.clone());
    let period = Duration::from_millis(board.config.tick_ms);
    let stdout = io::stdout();
    let mut writer: Option<WaveformWriter<_>> = None;

    for tick in 0..args.ticks {
        if args.realtime && tick > 0 {
            thread::sleep(period);
        }

        let time_ms = simulator.time_ms();
        let values = simulator.step_board(&mut board);

        // Without explicit probes, the columns are every pin resolved on the first tick
        let writer = writer.get_or_insert_with(|| {
            let columns = if probes.is_empty() {
                values.sorted().into_iter().map(|(pin, _)| pin).collect()
            } else {
                probes.clone()
            };
            WaveformWriter::new(BufWriter::new(stdout.lock()), columns)
        });
        writer.write_row(time_ms, values)?;
        if args.realtime {
            writer.flush()?;
        }
    }

    if let Some(mut writer) = writer {
        writer.flush()?;
    }

    Ok(())
}
