//! Subcommand implementations

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tension_animation::{
    Animation, AnimationConfig, AnimationScheduler, FluidSpringAnimation, Spring, SpringAnimation,
};
use tension_core::WireMessage;
use tracing::{debug, info};

use crate::hex;
use crate::{Message, MessageKind, Preset, SampleArgs, SpringSource};

/// Every view of one spring
#[derive(Debug, Serialize)]
struct SpringReport {
    regime: String,
    angular_frequency: f64,
    decay_constant: f64,
    mass: f64,
    duration: f64,
    bounce: f64,
    response: f64,
    damping_ratio: f64,
    stiffness: f64,
    damping: f64,
    settling_duration: f64,
    oscillation_period: Option<f64>,
}

impl SpringReport {
    fn new(spring: &Spring) -> Self {
        Self {
            regime: format!("{:?}", spring.regime()),
            angular_frequency: spring.angular_frequency(),
            decay_constant: spring.decay_constant(),
            mass: spring.mass(),
            duration: spring.duration(),
            bounce: spring.bounce(),
            response: spring.response(),
            damping_ratio: spring.damping_ratio(),
            stiffness: spring.stiffness(),
            damping: spring.damping(),
            settling_duration: spring.settling_duration(),
            oscillation_period: spring.oscillation_period(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Sample {
    time: f64,
    value: f64,
    velocity: f64,
}

fn build_spring(source: SpringSource) -> Spring {
    match source {
        SpringSource::Duration { duration, bounce } => Spring::new(duration, bounce),
        SpringSource::Physics {
            mass,
            stiffness,
            damping,
            allow_over_damping,
        } => Spring::with_physics(mass, stiffness, damping, allow_over_damping),
        SpringSource::Response {
            response,
            damping_ratio,
        } => Spring::with_response(response, damping_ratio),
        SpringSource::Settling {
            settling_duration,
            damping_ratio,
            epsilon,
        } => Spring::with_settling_duration(settling_duration, damping_ratio, epsilon),
    }
}

pub fn inspect(source: SpringSource, json: bool) -> Result<()> {
    let spring = build_spring(source);
    debug!(?source, ?spring, "built spring");
    let report = SpringReport::new(&spring);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("regime             {}", report.regime);
    println!("angular frequency  {:.6}", report.angular_frequency);
    println!("decay constant     {:.6}", report.decay_constant);
    println!("mass               {:.6}", report.mass);
    println!();
    println!("duration           {:.6}", report.duration);
    println!("bounce             {:.6}", report.bounce);
    println!("response           {:.6}", report.response);
    println!("damping ratio      {:.6}", report.damping_ratio);
    println!("stiffness          {:.6}", report.stiffness);
    println!("damping            {:.6}", report.damping);
    println!();
    println!("settling duration  {:.6}", report.settling_duration);
    match report.oscillation_period {
        Some(period) => println!("oscillation period {period:.6}"),
        None => println!("oscillation period -"),
    }
    Ok(())
}

fn preset_animation(preset: Preset) -> Animation {
    match preset {
        Preset::Spring => Animation::spring(),
        Preset::Smooth => Animation::smooth(),
        Preset::Snappy => Animation::snappy(),
        Preset::Bouncy => Animation::bouncy(),
        Preset::Interactive => Animation::interactive_spring(),
        Preset::Interpolating => Animation::interpolating(),
        Preset::EaseInOut => Animation::default_timing(),
    }
}

fn resolve_animation(args: &SampleArgs) -> Result<Animation> {
    match (&args.config, &args.name) {
        (Some(path), Some(name)) => {
            info!(path = %path.display(), name = %name, "loading animation");
            let config = AnimationConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            config
                .animation(name)
                .with_context(|| format!("Failed to build animation '{name}'"))
        }
        (None, Some(name)) => bail!("--name {name} needs a --config file to look it up in"),
        _ => Ok(preset_animation(args.preset)),
    }
}

/// Seconds between frames, rejecting rates and spans the sampler can't step through
fn frame_interval(fps: f64, seconds: f64) -> Result<f64> {
    anyhow::ensure!(
        fps.is_finite() && fps > 0.0,
        "fps must be a positive number, got {fps}"
    );
    anyhow::ensure!(seconds.is_finite(), "seconds must be finite, got {seconds}");
    Ok(1.0 / fps)
}

pub fn sample(args: &SampleArgs) -> Result<()> {
    let frame = frame_interval(args.fps, args.seconds)?;
    let animation = resolve_animation(args)?;
    debug!(?animation, "sampling");

    let mut scheduler = AnimationScheduler::new();
    let id = scheduler.add_property(0.0f64);
    scheduler.animate_to(id, args.target, animation);

    let mut samples = Vec::new();
    let mut index = 0u32;
    loop {
        let time = index as f64 * frame;
        let active = scheduler.tick(time);
        samples.push(Sample {
            time,
            value: scheduler.value(id).unwrap_or_default(),
            velocity: scheduler.velocity(id).unwrap_or_default(),
        });
        if !active || time >= args.seconds {
            break;
        }
        index += 1;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    println!("{:>10} {:>14} {:>14}", "time", "value", "velocity");
    for sample in &samples {
        println!(
            "{:>10.4} {:>14.6} {:>14.6}",
            sample.time, sample.value, sample.velocity
        );
    }
    if scheduler.is_animating(id) {
        println!("still animating after {:.3}s", args.seconds);
    }
    Ok(())
}

pub fn encode(message: Message) -> Result<()> {
    let bytes = match message {
        Message::Fluid {
            response,
            damping_fraction,
            blend_duration,
        } => FluidSpringAnimation::new(response, damping_fraction, blend_duration).to_bytes(),
        Message::Interpolating {
            mass,
            stiffness,
            damping,
            initial_velocity,
        } => SpringAnimation::new(mass, stiffness, damping, initial_velocity).to_bytes(),
    };
    println!("{}", hex::encode(&bytes));
    Ok(())
}

pub fn decode(kind: MessageKind, text: &str) -> Result<()> {
    let bytes = hex::decode(text).context("Failed to parse hex input")?;
    let json = match kind {
        MessageKind::Fluid => {
            let message = FluidSpringAnimation::from_bytes(&bytes)
                .context("Failed to decode fluid spring")?;
            serde_json::to_string_pretty(&message)?
        }
        MessageKind::Interpolating => {
            let message =
                SpringAnimation::from_bytes(&bytes).context("Failed to decode spring")?;
            serde_json::to_string_pretty(&message)?
        }
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_spring_from_each_source() {
        let spring = build_spring(SpringSource::Duration {
            duration: 0.5,
            bounce: 0.2,
        });
        assert!((spring.bounce() - 0.2).abs() < 1e-9);

        let spring = build_spring(SpringSource::Physics {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            allow_over_damping: false,
        });
        assert!((spring.stiffness() - 100.0).abs() < 1e-9);

        let spring = build_spring(SpringSource::Response {
            response: 0.4,
            damping_ratio: 0.7,
        });
        assert!((spring.response() - 0.4).abs() < 1e-9);

        let spring = build_spring(SpringSource::Settling {
            settling_duration: 1.0,
            damping_ratio: 1.0,
            epsilon: 0.001,
        });
        assert!(spring.decay_constant() > 0.0);
    }

    #[test]
    fn test_report_of_critical_spring() {
        let report = SpringReport::new(&Spring::new(0.5, 0.0));
        assert_eq!(report.regime, "CriticallyDamped");
        assert_eq!(report.oscillation_period, None);
        assert!((report.damping_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_interval_rejects_non_finite_input() {
        assert_eq!(frame_interval(50.0, 2.0).unwrap(), 0.02);
        assert_eq!(frame_interval(60.0, -1.0).unwrap(), 1.0 / 60.0);

        for fps in [0.0, -30.0, f64::INFINITY, f64::NAN] {
            let err = frame_interval(fps, 1.0).unwrap_err();
            assert!(err.to_string().contains("fps"), "{err}");
        }
        for seconds in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = frame_interval(60.0, seconds).unwrap_err();
            assert!(err.to_string().contains("seconds"), "{err}");
        }
    }

    #[test]
    fn test_encoded_hex_decodes() {
        let bytes = FluidSpringAnimation::new(0.3, 0.8, 0.0).to_bytes();
        let parsed = hex::decode(&hex::encode(&bytes)).unwrap();
        assert_eq!(
            FluidSpringAnimation::from_bytes(&parsed).unwrap(),
            FluidSpringAnimation::new(0.3, 0.8, 0.0)
        );
    }
}
