//! `play` - stream the live tone and take parameter changes from stdin

use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, warn};

use isotone::dsp::amplify::gain_to_db;
use isotone::engine::meter::{MeterReceiver, MeterTap};
use isotone::engine::stream::{AudioProcessor, SharedParams};
use isotone::{LiveParams, StreamProcessor, MAX_BLOCK_SIZE};

const METER_CAPACITY: usize = 256;
const METER_LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Args)]
pub struct PlayArgs {
    /// Pulse rate in Hz (0.5 - 60)
    #[arg(long, default_value = "10")]
    pulse: f32,

    /// Carrier frequency in Hz (40 - 1000)
    #[arg(long, default_value = "440")]
    carrier: f32,

    /// Pulse softness (0 - 1)
    #[arg(long, default_value = "0.5")]
    softness: f32,

    /// Output gain in dB (-60 - 0)
    #[arg(long, default_value = "-6", allow_negative_numbers = true)]
    gain: f32,

    /// Stop after this many seconds (runs until `quit` when omitted)
    #[arg(long)]
    seconds: Option<f64>,

    /// Apply parameter changes at block boundaries instead of ramping
    #[arg(long)]
    no_smoothing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ControlCommand {
    Pulse(f32),
    Carrier(f32),
    Softness(f32),
    Gain(f32),
    Quit,
}

fn parse_command(line: &str) -> Result<ControlCommand, String> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or_else(|| "empty command".to_string())?;
    if name == "quit" {
        return Ok(ControlCommand::Quit);
    }

    let value: f32 = words
        .next()
        .ok_or_else(|| format!("'{}' needs a value", name))?
        .parse()
        .map_err(|_| format!("'{}' needs a numeric value", name))?;

    match name {
        "pulse" => Ok(ControlCommand::Pulse(value)),
        "carrier" => Ok(ControlCommand::Carrier(value)),
        "softness" => Ok(ControlCommand::Softness(value)),
        "gain" => Ok(ControlCommand::Gain(value)),
        other => Err(format!("unknown command '{}'", other)),
    }
}

pub fn play(args: PlayArgs) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;

    let shared = Arc::new(SharedParams::new(LiveParams {
        pulse_hz: args.pulse,
        carrier_hz: args.carrier,
        softness: args.softness,
        gain_db: args.gain,
    }));

    let (tap, mut meter_rx) = MeterTap::new(METER_CAPACITY);
    let mut processor = StreamProcessor::new(Arc::clone(&shared))
        .with_smoothing(!args.no_smoothing)
        .with_meter(tap);
    processor.prepare(sample_rate, MAX_BLOCK_SIZE)?;

    info!(sample_rate, channels, params = ?shared.snapshot(), "starting live stream");

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| processor.process_interleaved(data, channels),
        |err| error!(%err, "audio stream error"),
        None,
    )?;
    stream.play()?;

    println!("Commands: pulse <hz> | carrier <hz> | softness <0-1> | gain <db> | quit");

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(parse_command(&line)).is_err() {
                break;
            }
        }
    });

    let started = Instant::now();
    let mut last_meter_log = Instant::now();
    let mut peak = 0.0f32;

    loop {
        if let Some(limit) = args.seconds {
            if started.elapsed().as_secs_f64() >= limit {
                break;
            }
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(Ok(command)) => {
                match command {
                    ControlCommand::Quit => break,
                    ControlCommand::Pulse(hz) => shared.set_pulse_hz(hz),
                    ControlCommand::Carrier(hz) => shared.set_carrier_hz(hz),
                    ControlCommand::Softness(s) => shared.set_softness(s),
                    ControlCommand::Gain(db) => shared.set_gain_db(db),
                }
                info!(params = ?shared.snapshot(), "parameters updated");
            }
            Ok(Err(msg)) => warn!("{}", msg),
            Err(RecvTimeoutError::Timeout) => {}
            // stdin closed: keep playing until the time limit, if any
            Err(RecvTimeoutError::Disconnected) => {
                if args.seconds.is_none() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(100));
            }
        }

        while let Some(meter) = MeterReceiver::pop(&mut meter_rx) {
            peak = peak.max(meter.peak);
        }
        if last_meter_log.elapsed() >= METER_LOG_INTERVAL {
            info!(peak, peak_db = gain_to_db(peak), "output level");
            peak = 0.0;
            last_meter_log = Instant::now();
        }
    }

    drop(stream);
    info!(elapsed = started.elapsed().as_secs_f64(), "live stream stopped");
    Ok(())
}
