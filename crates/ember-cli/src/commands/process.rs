//! File-based saturation processing command.

use anyhow::Context;
use clap::Args;
use ember_config::Preset;
use ember_core::linear_to_db;
use ember_effects::{AutoGainOutcome, LEARNING_SECONDS, Saturator, SaturatorParams};
use ember_io::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML) or factory preset name
    #[arg(short, long, value_name = "FILE|NAME")]
    preset: Option<String>,

    /// Saturation algorithm id (see `ember algorithms`)
    #[arg(short, long, value_name = "ID")]
    algorithm: Option<String>,

    /// Drive in dB (0 to 24)
    #[arg(short, long, value_name = "DB")]
    drive: Option<f64>,

    /// Character amount (0 to 1)
    #[arg(short, long, value_name = "C")]
    character: Option<f64>,

    /// Wet mix in percent (0 to 100)
    #[arg(short, long, value_name = "%")]
    mix: Option<f64>,

    /// Oversampling factor (1, 2, 4, 8 or 16)
    #[arg(short, long, value_name = "N")]
    quality: Option<u32>,

    /// Pre-saturation low cut in Hz
    #[arg(long, value_name = "HZ")]
    pre_low: Option<f64>,

    /// Pre-saturation high cut in Hz
    #[arg(long, value_name = "HZ")]
    pre_high: Option<f64>,

    /// Post-saturation low cut in Hz
    #[arg(long, value_name = "HZ")]
    post_low: Option<f64>,

    /// Post-saturation high cut in Hz
    #[arg(long, value_name = "HZ")]
    post_high: Option<f64>,

    /// Post filter slope in dB/oct (6, 12, 24 or 48)
    #[arg(long, value_name = "DB")]
    slope: Option<u32>,

    /// Input gain in dB (-18 to 18)
    #[arg(long, value_name = "DB", allow_negative_numbers = true)]
    input_gain: Option<f64>,

    /// Output gain in dB (-18 to 18)
    #[arg(long, value_name = "DB", allow_negative_numbers = true)]
    output_gain: Option<f64>,

    /// Disable the ±1 output clamp
    #[arg(long)]
    no_safety_clip: bool,

    /// Learn input and output gain from the file before processing
    #[arg(long)]
    auto_gain: bool,

    /// Keep the oversampler latency at the start of the output
    #[arg(long)]
    keep_latency: bool,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("--bit-depth must be 16, 24 or 32 (got {})", args.bit_depth);
    }

    let (name, mut params) = build_params(&args)?;

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    if input.is_empty() {
        anyhow::bail!("{} contains no audio", args.input.display());
    }
    let sample_rate = f64::from(spec.sample_rate);
    println!(
        "  {} frames, {} ch, {} Hz, {:.2}s",
        input.len(),
        spec.channels,
        spec.sample_rate,
        input.duration_secs(spec.sample_rate)
    );

    if args.auto_gain {
        println!("Learning gains...");
        let (learned, outcome) = learn_gains(&input, sample_rate, params, args.block_size)?;
        report_outcome(&outcome, &learned);
        params = learned;
    }

    let mut sat = Saturator::new(sample_rate);
    sat.set_params(params);
    sat.reset();
    let latency = if args.keep_latency { 0 } else { sat.latency_samples() };

    println!(
        "Processing with '{}': {} at {:.1} dB drive, {}x oversampling...",
        name,
        params.algorithm.name(),
        params.drive_db,
        params.quality.factor()
    );
    tracing::info!(
        algorithm = params.algorithm.id(),
        quality = params.quality.factor(),
        latency,
        block_size = args.block_size,
        "processing"
    );

    let pb = ProgressBar::new((input.len() + latency) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let output = process_file(&mut sat, &input, latency, args.block_size, &pb);
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(f64::from(input.rms())),
        linear_to_db(f64::from(input.peak()))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(f64::from(output.rms())),
        linear_to_db(f64::from(output.peak()))
    );

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Start from the preset (or defaults) and apply command-line overrides.
fn build_params(args: &ProcessArgs) -> anyhow::Result<(String, SaturatorParams)> {
    let mut preset = match &args.preset {
        Some(name_or_path) => Preset::resolve(name_or_path)?,
        None => Preset::new("Command line"),
    };

    if let Some(algorithm) = &args.algorithm {
        preset.algorithm.clone_from(algorithm);
    }
    if let Some(quality) = args.quality {
        preset.quality = quality;
    }
    if let Some(slope) = args.slope {
        preset.post_slope = slope;
    }
    let overrides = [
        (args.drive, &mut preset.drive_db),
        (args.character, &mut preset.character),
        (args.mix, &mut preset.mix_percent),
        (args.pre_low, &mut preset.pre_low_cut_hz),
        (args.pre_high, &mut preset.pre_high_cut_hz),
        (args.post_low, &mut preset.post_low_cut_hz),
        (args.post_high, &mut preset.post_high_cut_hz),
        (args.input_gain, &mut preset.input_gain_db),
        (args.output_gain, &mut preset.output_gain_db),
    ];
    for (value, field) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }
    if args.no_safety_clip {
        preset.safety_clip = false;
    }

    let params = preset
        .to_params()
        .with_context(|| format!("invalid settings for '{}'", preset.name))?;
    // Learning is driven by --auto-gain, never by the preset flag
    Ok((
        preset.name,
        SaturatorParams {
            auto_gain: false,
            ..params
        },
    ))
}

/// Run `input` through `sat` in blocks, trimming `latency` frames from the start.
fn process_file(
    sat: &mut Saturator,
    input: &StereoSamples,
    latency: usize,
    block_size: usize,
    progress: &ProgressBar,
) -> StereoSamples {
    let frames = input.len() + latency;
    let mut left = input.left.clone();
    let mut right = input.right.clone();
    left.resize(frames, 0.0);
    right.resize(frames, 0.0);

    for (l, r) in left.chunks_mut(block_size).zip(right.chunks_mut(block_size)) {
        sat.process_block(l, r);
        progress.inc(l.len() as u64);
    }

    left.drain(..latency);
    right.drain(..latency);
    StereoSamples::new(left, right)
}

/// Loop the input through a learning window and return the adjusted parameters.
fn learn_gains(
    input: &StereoSamples,
    sample_rate: f64,
    params: SaturatorParams,
    block_size: usize,
) -> anyhow::Result<(SaturatorParams, AutoGainOutcome)> {
    let mut sat = Saturator::new(sample_rate);
    sat.set_params(SaturatorParams {
        auto_gain: true,
        ..params
    });
    sat.reset();

    let window = (sample_rate * LEARNING_SECONDS) as usize;
    let passes = window / input.len() + 2;
    if passes > 2 {
        tracing::info!(passes, "input shorter than the learning window, looping");
    }

    for _ in 0..passes {
        let mut left = input.left.clone();
        let mut right = input.right.clone();
        for (l, r) in left.chunks_mut(block_size).zip(right.chunks_mut(block_size)) {
            if let Some(outcome) = sat.process_block(l, r) {
                return Ok((*sat.params(), outcome));
            }
        }
    }
    anyhow::bail!("auto-gain learning did not complete")
}

fn report_outcome(outcome: &AutoGainOutcome, params: &SaturatorParams) {
    println!(
        "  Input peak {:.1} dB, RMS in {:.1} dB, RMS out {:.1} dB",
        linear_to_db(outcome.input_peak),
        linear_to_db(outcome.rms_in),
        linear_to_db(outcome.rms_out)
    );
    match outcome.input_trim_db {
        Some(trim) => println!(
            "  Input gain trimmed by {:.2} dB to {:.2} dB",
            trim, params.input_gain_db
        ),
        None => println!("  Input gain unchanged ({:.2} dB)", params.input_gain_db),
    }
    match outcome.output_gain_db {
        Some(gain) => println!("  Output gain set to {gain:.2} dB"),
        None => println!("  Output gain unchanged (signal too quiet to measure)"),
    }
    tracing::info!(
        input_gain_db = params.input_gain_db,
        output_gain_db = params.output_gain_db,
        "auto-gain complete"
    );
}
