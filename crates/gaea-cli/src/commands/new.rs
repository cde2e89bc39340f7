use std::path::Path;

use colored::Colorize;
use gaea_core::SaveFile;
use gaea_core::calendar::CalendarTime;
use gaea_simulation::{WorldGenConfig, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Parameters of `gaea new`.
pub struct NewOptions {
    pub width: u32,
    pub height: u32,
    pub creatures: usize,
    pub plants: usize,
    pub seed: u64,
    pub force: bool,
}

pub fn run(output: &Path, content: Option<&Path>, options: &NewOptions) -> Result<(), String> {
    if output.exists() && !options.force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            output.display()
        ));
    }

    let content = super::load_content(content)?;
    let config = WorldGenConfig::default()
        .with_size(options.width, options.height)
        .with_creatures(options.creatures)
        .with_plants(options.plants);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let world = generate(&content, &config, &mut rng)
        .map_err(|e| format!("world generation failed: {e}"))?;

    let save = SaveFile::capture(&world, Some(CalendarTime::default()));
    save.write_to(output)
        .map_err(|e| format!("cannot write {}: {e}", output.display()))?;

    println!(
        "Created world in {} {}",
        output.display(),
        format!("({}x{} tiles, seed={})", options.width, options.height, options.seed).dimmed()
    );
    println!(
        "  {} tiles, {} creatures, {} plants",
        world.tile_count(),
        world.creature_count(),
        world.plant_count()
    );
    println!();
    println!("Next:");
    println!("  gaea inspect {}", output.display());
    println!("  gaea simulate {} --ticks 600", output.display());

    Ok(())
}
