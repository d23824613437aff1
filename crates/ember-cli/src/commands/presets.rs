//! Factory preset listing and export.

use clap::Args;
use ember_config::{Preset, factory_presets, get_factory_preset};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    /// Factory preset to export (identifier or display name)
    #[arg(long, value_name = "NAME")]
    save: Option<String>,

    /// Destination file for --save (defaults to <identifier>.toml)
    #[arg(long, value_name = "FILE", requires = "save")]
    out: Option<PathBuf>,

    /// Print the TOML of every preset
    #[arg(long, conflicts_with = "save")]
    full: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.save {
        let preset = get_factory_preset(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown factory preset: {}", name))?;
        let path = args
            .out
            .unwrap_or_else(|| PathBuf::from(format!("{}.toml", file_stem(&preset))));
        preset.save(&path)?;
        tracing::info!(preset = %preset.name, path = %path.display(), "exported preset");
        println!("Saved '{}' to {}", preset.name, path.display());
        return Ok(());
    }

    println!("Factory presets:");
    println!();
    for preset in factory_presets() {
        let params = preset.to_params()?;
        println!(
            "  {:14}  {:12}  drive {:>5.1} dB  {:>2}x  {}",
            preset.name,
            params.algorithm.id(),
            params.drive_db,
            params.quality.factor(),
            preset.description.as_deref().unwrap_or("")
        );
        if args.full {
            println!();
            for line in preset.to_toml()?.lines() {
                println!("      {line}");
            }
            println!();
        }
    }
    println!();
    println!("Export one with `ember presets --save <NAME> --out <FILE>`.");
    Ok(())
}

/// Lowercase, underscore-separated file name for a preset.
fn file_stem(preset: &Preset) -> String {
    preset
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(&Preset::new("Lo-Fi Crush")), "lo_fi_crush");
        assert_eq!(file_stem(&Preset::new("Warm Tape")), "warm_tape");
    }
}
