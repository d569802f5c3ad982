//! isotone - render or stream entrainment tones
//!
//! Run with: cargo run -- render out.wav 60 10 200 0.5 0

mod live;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::info;

use isotone::{
    io::WavSink, EntrainmentType, FrequencySpec, NoiseType, Parameters, RenderConfig, Renderer,
};

#[derive(Parser)]
#[command(name = "isotone")]
#[command(about = "Isochronic and binaural entrainment tone generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a session to a stereo 24-bit WAV file
    Render(RenderArgs),
    /// Stream the live tone to the default output device
    Play(live::PlayArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Output WAV file path
    output: PathBuf,

    /// Duration in seconds
    duration: f64,

    /// Pulse frequency in Hz, or five comma-separated values for a journey
    pulse: String,

    /// Carrier frequency in Hz, or five comma-separated values for a journey
    carrier: String,

    /// Pulse softness, 0.0 (sharp) to 1.0 (smooth)
    softness: f32,

    /// Entrainment type: 0 isochronic (AM), 1 binaural
    #[arg(value_name = "TYPE")]
    entrainment: i32,

    /// Tone gain in dB
    #[arg(default_value = "-10", allow_negative_numbers = true)]
    gain_db: f32,

    /// Background noise: -1 none, 0 brown, 1 pink, 2 white
    #[arg(default_value = "-1", allow_negative_numbers = true)]
    noise_type: i32,

    /// Background noise level, 0.0 to 1.0
    #[arg(default_value = "0.3")]
    noise_level: f32,

    /// Seed for the noise generators (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output sample rate in Hz (8000 - 384000)
    #[arg(
        long,
        default_value = "44100",
        value_parser = clap::value_parser!(u32).range(8_000..=384_000)
    )]
    sample_rate: u32,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    // stdout carries the progress line; logs go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Play(args) => live::play(args),
    }
}

fn render(args: RenderArgs) -> EyreResult<()> {
    let pulse: FrequencySpec = args.pulse.parse().wrap_err("invalid pulse frequency")?;
    let carrier: FrequencySpec = args.carrier.parse().wrap_err("invalid carrier frequency")?;

    let params = Parameters {
        softness: args.softness,
        gain_db: args.gain_db,
        entrainment: EntrainmentType::from_index(args.entrainment)?,
        noise: NoiseType::from_index(args.noise_type)?,
        noise_level: args.noise_level,
        ..Parameters::default()
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = RenderConfig::from_specs(&pulse, &carrier, params, args.duration)?
        .sample_rate(args.sample_rate as f64)
        .seed(seed);

    // Validate everything before the output file exists
    let mut renderer = Renderer::new(&config)
        .wrap_err("invalid render configuration")?
        .on_progress(|fraction| {
            print!("\rProgress: {:.1}%", fraction * 100.0);
            let _ = std::io::stdout().flush();
        });

    let mut sink = WavSink::create(&args.output, args.sample_rate)
        .wrap_err_with(|| format!("failed to create {}", args.output.display()))?;

    let summary = renderer
        .render(&mut sink)
        .wrap_err("render failed")?;

    println!("\nGeneration successful.");
    info!(
        path = %args.output.display(),
        frames = summary.frames,
        seconds = summary.seconds,
        seed,
        "wrote session"
    );
    Ok(())
}
