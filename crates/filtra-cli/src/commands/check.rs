//! Preset validation command.

use clap::Args;
use filtra_config::{Preset, check_graph, validate_preset};
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Preset file (TOML or JSON)
    #[arg(value_name = "PRESET")]
    preset: PathBuf,

    /// Number of input channels to negotiate through the graph
    #[arg(long, default_value = "2")]
    channels: usize,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let preset = Preset::load(&args.preset)?;

    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    if let Some(description) = &preset.description {
        println!("{description}");
    }
    println!();
    println!("  Sample rate: {} Hz", preset.sample_rate);
    println!(
        "  Filters:     {} ({} top-level)",
        preset.biquad_count(),
        preset.len()
    );

    validate_preset(&preset)?;

    let out = check_graph(preset.to_spec(), args.channels)?;
    println!("  Channels:    {} in, {} out", args.channels, out);
    println!();
    println!("OK");

    Ok(())
}
