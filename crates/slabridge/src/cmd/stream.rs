use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use slabridge_driver::{Driver, DriverConfig};
use slabridge_gcode::TranslatorConfig;
use slabridge_transport::{SerialConfig, SerialTransport};
use tracing::info;

use crate::cmd::{open_input, parse_duration, StreamArgs};
use crate::exit::{io_error, CliError, CliResult, INTERNAL, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_received, OutputFormat};

const LINGER_SLICE: Duration = Duration::from_millis(50);

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    let poll_interval = parse_duration(&args.poll_interval)?;
    let linger = args.linger.as_deref().map(parse_duration).transpose()?;
    let input = open_input(args.file.as_deref())?;

    let transport = SerialTransport::new(SerialConfig {
        baud_rate: args.baud,
        ..SerialConfig::new(&args.port)
    });
    let driver = Driver::with_config(
        transport,
        DriverConfig {
            poll_interval,
            translator: TranslatorConfig {
                print_offset: args.print_offset,
            },
            ..DriverConfig::default()
        },
    );
    driver.on_data_received(move |bytes| print_received(bytes, format));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    if !driver.connect() {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            format!("failed to connect to {}", args.port),
        ));
    }

    let result = stream_lines(&driver, input, &running);

    if result.is_ok() {
        if let Some(linger) = linger {
            linger_while_running(linger, &running);
        }
    }

    // Disconnect even when input failed midway; the poller must not outlive the stream.
    let disconnected = driver.disconnect();
    let (lines, bytes) = result?;
    info!(lines, bytes, "stream finished");

    if !disconnected {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            format!("failed to disconnect from {}", args.port),
        ));
    }
    Ok(SUCCESS)
}

fn stream_lines<T, R>(
    driver: &Driver<T>,
    input: R,
    running: &AtomicBool,
) -> CliResult<(usize, usize)>
where
    T: slabridge_transport::Transport + 'static,
    R: BufRead,
{
    let mut lines = 0usize;
    let mut bytes = 0usize;
    for line in input.lines() {
        if !running.load(Ordering::SeqCst) {
            info!(lines, "interrupted, stopping stream");
            break;
        }
        let line = line.map_err(|err| io_error("failed reading input", err))?;
        bytes += driver.write(&line);
        lines += 1;
    }
    Ok((lines, bytes))
}

fn linger_while_running(linger: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + linger;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(LINGER_SLICE.min(deadline - now));
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
