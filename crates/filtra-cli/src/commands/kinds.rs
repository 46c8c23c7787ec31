//! Biquad kind listing command.

use clap::Args;
use filtra_core::BiquadKind;

#[derive(Args)]
pub struct KindsArgs {
    /// Show example commands
    #[arg(long)]
    examples: bool,
}

fn describe(kind: BiquadKind) -> &'static str {
    match kind {
        BiquadKind::Lowpass => "Passes content below the cutoff",
        BiquadKind::Highpass => "Passes content above the cutoff",
        BiquadKind::Bandpass => "Passes a band around the center, 0 dB peak",
        BiquadKind::Lowshelf => "Boosts or cuts below the corner",
        BiquadKind::Highshelf => "Boosts or cuts above the corner",
        BiquadKind::Peaking => "Boosts or cuts a band around the center",
        BiquadKind::Notch => "Removes a narrow band around the center",
        BiquadKind::Allpass => "Flat magnitude, rotates phase around the center",
    }
}

pub fn run(args: KindsArgs) -> anyhow::Result<()> {
    println!("Available Filter Kinds");
    println!("======================");
    println!();

    for kind in BiquadKind::ALL {
        let params = if kind.uses_gain() {
            "frequency, q, gain"
        } else {
            "frequency, q"
        };
        println!("  {:10} - {:48} [{}]", kind.name(), describe(kind), params);
    }

    println!();
    println!("Frequencies accept Hz/kHz suffixes, gains accept dB. Q defaults to 0.707.");

    if args.examples {
        println!();
        println!("Example Commands");
        println!("----------------");
        println!();
        println!("  # Telephone band");
        let chain = "highpass:frequency=300|lowpass:frequency=3.4kHz";
        println!("  filtra process input.wav output.wav --chain \"{chain}\"");
        println!();
        println!("  # Preset file");
        println!("  filtra process input.wav output.wav --preset telephone.toml --bit-depth 24");
        println!("  filtra check telephone.toml --channels 2");
    }

    Ok(())
}
