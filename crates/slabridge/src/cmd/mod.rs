use clap::{Args, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use slabridge_gcode::DEFAULT_PRINT_OFFSET;
use slabridge_transport::DEFAULT_BAUD_RATE;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod ports;
pub mod stream;
pub mod translate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate G-code to frames and print them (no hardware).
    Translate(TranslateArgs),
    /// Stream G-code to a controller over a serial port.
    Stream(StreamArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Translate(args) => translate::run(args, format),
        Command::Stream(args) => stream::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// G-code file to read. Default: stdin.
    pub file: Option<PathBuf>,
    /// Offset byte sent with M600.
    #[arg(long, default_value_t = DEFAULT_PRINT_OFFSET, env = "SLABRIDGE_PRINT_OFFSET")]
    pub print_offset: u8,
    /// Stop at the first line that cannot be translated.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Serial port, e.g. /dev/ttyUSB0 or COM3.
    #[arg(env = "SLABRIDGE_PORT")]
    pub port: String,
    /// G-code file to stream. Default: stdin.
    pub file: Option<PathBuf>,
    /// Baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE, env = "SLABRIDGE_BAUD")]
    pub baud: u32,
    /// Status poll interval (e.g. 250ms, 1s).
    #[arg(long, default_value = "250ms")]
    pub poll_interval: String,
    /// Offset byte sent with M600.
    #[arg(long, default_value_t = DEFAULT_PRINT_OFFSET, env = "SLABRIDGE_PRINT_OFFSET")]
    pub print_offset: u8,
    /// Keep polling this long after the input ends (e.g. 5s).
    #[arg(long)]
    pub linger: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open `file`, or stdin when no file is given.
pub(crate) fn open_input(file: Option<&Path>) -> CliResult<Box<dyn BufRead>> {
    match file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
