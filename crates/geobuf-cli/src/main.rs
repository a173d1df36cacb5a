use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geobuf::limits::{DEFAULT_DIMENSIONS, DEFAULT_PRECISION, MAX_DIMENSIONS};
use geobuf::{decode_json, encode_json, EncodeOptions};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "geobuf",
    version = geobuf::VERSION,
    about = "Convert between GeoJSON and Geobuf over stdin/stdout"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read GeoJSON from stdin and write Geobuf to stdout.
    Encode {
        /// Decimal digits kept per coordinate.
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: u32,
        /// Keep the third (z) ordinate of every position.
        #[arg(long, overrides_with = "without_z")]
        with_z: bool,
        /// Drop z ordinates (the default).
        #[arg(long, overrides_with = "with_z")]
        without_z: bool,
    },
    /// Read Geobuf from stdin and write GeoJSON to stdout.
    Decode,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; usage errors fail.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(command: Command) -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("read stdin")?;

    let output = match command {
        Command::Encode {
            precision,
            with_z,
            without_z: _,
        } => {
            let dimensions = if with_z {
                MAX_DIMENSIONS
            } else {
                DEFAULT_DIMENSIONS
            };
            let options = EncodeOptions::new()
                .with_precision(precision)
                .with_dimensions(dimensions);
            let value: serde_json::Value =
                serde_json::from_slice(&input).context("parse GeoJSON input")?;
            let bytes = encode_json(&value, options).context("encode Geobuf")?;
            debug!(
                input_bytes = input.len(),
                output_bytes = bytes.len(),
                "encoded"
            );
            bytes
        }
        Command::Decode => {
            let value = decode_json(&input).context("decode Geobuf")?;
            let mut text = serde_json::to_vec(&value).context("serialize GeoJSON")?;
            text.push(b'\n');
            debug!(
                input_bytes = input.len(),
                output_bytes = text.len(),
                "decoded"
            );
            text
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&output).context("write stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
