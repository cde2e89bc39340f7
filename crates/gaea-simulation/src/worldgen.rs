//! Random starting worlds.

use gaea_core::content::ContentRegistry;
use gaea_core::geometry::{Point, TILE_SIZE};
use gaea_core::tile::{GROUND_LAYER, VEGETATION_LAYER};
use gaea_core::world::World;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::SimResult;

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldGenConfig {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Object template used for every ground cell.
    pub ground_object: u32,
    /// Object kind vegetation is drawn from.
    pub vegetation_kind: String,
    /// Chance per cell of a vegetation tile.
    pub vegetation_chance: f64,
    /// Creatures to place, species picked at random.
    pub creatures: usize,
    /// Plants to place, picked at random.
    pub plants: usize,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            ground_object: 1,
            vegetation_kind: "plant".to_string(),
            vegetation_chance: 1.0 / 3.0,
            creatures: 4,
            plants: 6,
        }
    }
}

impl WorldGenConfig {
    /// Set the grid size in tiles.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the number of creatures to place.
    pub fn with_creatures(mut self, count: usize) -> Self {
        self.creatures = count;
        self
    }

    /// Set the number of plants to place.
    pub fn with_plants(mut self, count: usize) -> Self {
        self.plants = count;
        self
    }

    /// Set the per-cell vegetation chance, clamped to `0..=1`.
    pub fn with_vegetation_chance(mut self, chance: f64) -> Self {
        self.vegetation_chance = chance.clamp(0.0, 1.0);
        self
    }
}

/// Top-left corner of grid cell `(column, row)`.
pub fn cell_position(column: u32, row: u32) -> Point {
    Point::new(column as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
}

/// Build a world: a ground grid, scattered vegetation, then creatures and plants.
///
/// Fails if the registry lacks the ground object, or if vegetation,
/// creatures or plants are requested but the registry has none to offer.
pub fn generate<R: Rng + ?Sized>(
    content: &ContentRegistry,
    config: &WorldGenConfig,
    rng: &mut R,
) -> SimResult<World> {
    let mut world = World::new();

    for column in 0..config.width {
        for row in 0..config.height {
            let position = cell_position(column, row);
            world.spawn_tile(content, config.ground_object, position, GROUND_LAYER)?;

            if rng.random_bool(config.vegetation_chance.clamp(0.0, 1.0)) {
                let object = content.random_object_of_type(&config.vegetation_kind, rng)?;
                world.spawn_tile(content, object.id, position, VEGETATION_LAYER)?;
            }
        }
    }

    if config.width > 0 && config.height > 0 {
        let species: Vec<u32> = content.creatures().map(|c| c.id).collect();
        for _ in 0..config.creatures {
            let Some(&id) = species.choose(rng) else {
                break;
            };
            let position = random_cell(config, rng);
            world.spawn_creature(content, id, position)?;
        }

        let plants: Vec<u32> = content.plants().map(|p| p.id).collect();
        for _ in 0..config.plants {
            let Some(&id) = plants.choose(rng) else {
                break;
            };
            let position = random_cell(config, rng);
            world.spawn_plant(content, id, position)?;
        }
    }

    tracing::info!(
        width = config.width,
        height = config.height,
        tiles = world.tile_count(),
        creatures = world.creature_count(),
        plants = world.plant_count(),
        "world generated"
    );
    Ok(world)
}

fn random_cell<R: Rng + ?Sized>(config: &WorldGenConfig, rng: &mut R) -> Point {
    cell_position(
        rng.random_range(0..config.width),
        rng.random_range(0..config.height),
    )
}
