//! File-based filter processing command.

use crate::wav::{WavSpec, read_wav, write_wav};
use clap::{ArgGroup, Args};
use filtra_config::{Preset, parse_chain, validate_filter, validate_preset};
use filtra_core::{FilterSpec, Pipeline};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
#[command(group(ArgGroup::new("graph").required(true).args(["chain", "preset"])))]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Filter chain (e.g., "highpass:frequency=80|peaking:frequency=2.5kHz,gain=3dB")
    #[arg(short, long)]
    chain: Option<String>,

    /// Preset file (TOML or JSON)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Processing block size in frames
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.block_size > 0, "block size must be at least 1 frame");
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "unsupported bit depth {} (expected 16, 24 or 32)",
        args.bit_depth
    );

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav(&args.input)?;
    let channels = usize::from(spec.channels);
    let frames = samples.len() / channels.max(1);

    println!(
        "  {} frames x {} channel(s), {} Hz, {:.2}s",
        frames,
        channels,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    let spec_graph = if let Some(preset_path) = &args.preset {
        let preset = Preset::load(preset_path)?;
        println!("Loading preset: {}", preset.name);
        if preset.sample_rate != spec.sample_rate {
            tracing::warn!(
                preset_rate = preset.sample_rate,
                file_rate = spec.sample_rate,
                "preset designed for a different sample rate; validating against the file"
            );
        }
        validate_preset(&preset.clone().with_sample_rate(spec.sample_rate))?;
        preset.to_spec()
    } else if let Some(chain) = &args.chain {
        let filters = parse_chain(chain)?;
        for filter in &filters {
            validate_filter(filter, spec.sample_rate)?;
        }
        FilterSpec::List(filters.iter().map(|f| f.to_params().into()).collect())
    } else {
        anyhow::bail!("No filters specified. Use --chain or --preset");
    };

    let mut pipeline = Pipeline::new(spec_graph)?;
    let out_channels = pipeline.check_subchannels(channels)?;
    anyhow::ensure!(
        out_channels == channels,
        "graph maps {channels} channel(s) to {out_channels}; in-place processing needs equal counts"
    );
    pipeline.prepare(spec.sample_rate);

    let input_stats = Stats::measure(&samples);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    for block in samples.chunks_mut(args.block_size * channels) {
        pipeline.process(block, channels);
        pb.inc((block.len() / channels) as u64);
    }
    pb.finish_with_message("done");

    let pool = pipeline.pool().stats();
    tracing::debug!(
        fresh = pool.fresh_allocations,
        reallocations = pool.reallocations,
        reuses = pool.reuses,
        "buffer pool"
    );

    let output_stats = Stats::measure(&samples);
    println!("\nStats:");
    println!("  Input:  {input_stats}");
    println!("  Output: {output_stats}");

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &samples, out_spec)?;
    println!("Done!");

    Ok(())
}

/// RMS and peak level of a signal.
struct Stats {
    rms: f32,
    peak: f32,
}

impl Stats {
    fn measure(samples: &[f32]) -> Self {
        let rms = if samples.is_empty() {
            0.0
        } else {
            let sum: f32 = samples.iter().map(|s| s * s).sum();
            (sum / samples.len() as f32).sqrt()
        };
        let peak = samples.iter().map(|s| s.abs()).fold(0.0, f32::max);
        Self { rms, peak }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RMS {:.1} dB, Peak {:.1} dB",
            linear_to_db(self.rms),
            linear_to_db(self.peak)
        )
    }
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_full_scale_square() {
        let stats = Stats::measure(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(stats.rms, 1.0);
        assert_eq!(stats.peak, 1.0);
        assert_eq!(stats.to_string(), "RMS 0.0 dB, Peak 0.0 dB");
    }

    #[test]
    fn silence_floors_at_minus_120() {
        let stats = Stats::measure(&[]);
        assert_eq!(linear_to_db(stats.rms), -120.0);
    }
}
