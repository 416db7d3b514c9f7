//! Tension CLI
//!
//! Inspect spring parameterizations, sample animations frame by frame, and
//! convert animation parameters to and from their wire encoding.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod hex;

#[derive(Parser)]
#[command(name = "tension")]
#[command(author, version, about = "Inspect, sample and encode spring animations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug events from the animation engine
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every parameterization of a spring
    Inspect {
        #[command(subcommand)]
        spring: SpringSource,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sample an animation frame by frame
    Sample(SampleArgs),
    /// Encode animation parameters as hex wire bytes
    Encode {
        #[command(subcommand)]
        message: Message,
    },
    /// Decode hex wire bytes into animation parameters
    Decode {
        /// Which message the bytes hold
        #[arg(value_enum)]
        kind: MessageKind,
        /// Hex-encoded bytes, whitespace allowed
        hex: String,
    },
}

/// Ways of describing a spring
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SpringSource {
    /// Perceptual duration and bounce
    Duration {
        #[arg(long, default_value_t = 0.5)]
        duration: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        bounce: f64,
    },
    /// Mass, stiffness and damping
    Physics {
        #[arg(long, default_value_t = 1.0)]
        mass: f64,
        #[arg(long, default_value_t = 100.0)]
        stiffness: f64,
        #[arg(long, default_value_t = 20.0)]
        damping: f64,
        /// Keep damping above critical instead of clamping it
        #[arg(long)]
        allow_over_damping: bool,
    },
    /// Response and damping ratio
    Response {
        #[arg(long, default_value_t = 0.5)]
        response: f64,
        #[arg(long, default_value_t = 0.825)]
        damping_ratio: f64,
    },
    /// Settling duration and damping ratio
    Settling {
        #[arg(long, default_value_t = 1.0)]
        settling_duration: f64,
        #[arg(long, default_value_t = 1.0)]
        damping_ratio: f64,
        #[arg(long, default_value_t = 0.001)]
        epsilon: f64,
    },
}

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    /// Animation file to read named animations from
    #[arg(short, long, requires = "name")]
    config: Option<PathBuf>,

    /// Name of the animation in the config file
    #[arg(short, long)]
    name: Option<String>,

    /// Built-in animation used when no config file is given
    #[arg(short, long, value_enum, default_value_t = Preset::Spring)]
    preset: Preset,

    /// Value animated towards, starting from zero
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    target: f64,

    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Stop sampling after this many seconds even if still moving
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Spring,
    Smooth,
    Snappy,
    Bouncy,
    Interactive,
    Interpolating,
    EaseInOut,
}

/// Messages with a wire encoding
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Message {
    /// Fluid spring parameters
    Fluid {
        #[arg(long, default_value_t = 0.5)]
        response: f64,
        #[arg(long, default_value_t = 0.825)]
        damping_fraction: f64,
        #[arg(long, default_value_t = 0.0)]
        blend_duration: f64,
    },
    /// Analytic spring parameters
    Interpolating {
        #[arg(long, default_value_t = 1.0)]
        mass: f64,
        #[arg(long, default_value_t = 100.0)]
        stiffness: f64,
        #[arg(long, default_value_t = 20.0)]
        damping: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        initial_velocity: f64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Fluid,
    Interpolating,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Inspect { spring, json } => commands::inspect(spring, json),
        Commands::Sample(args) => commands::sample(&args),
        Commands::Encode { message } => commands::encode(message),
        Commands::Decode { kind, hex } => commands::decode(kind, &hex),
    }
}
