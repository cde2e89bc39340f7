//! Persisted representation of a world.
//!
//! A save lists plain tiles, creatures, and plants. Creatures and plants carry
//! their own tile, so capture skips any tile already written as a creature or
//! plant host. Loading rebinds every tile against the [`ContentRegistry`] and
//! rebuilds the arena; spatial re-indexing is left to the simulation.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarTime;
use crate::content::ContentRegistry;
use crate::creature::{Activity, Creature};
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::geometry::Point;
use crate::plant::Plant;
use crate::tile::{AccessibleResource, Tile};
use crate::world::World;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// A tile as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTile {
    /// Arena id, used to keep creature targets pointing at the right tile.
    /// Hand-written saves may omit it; a fresh id is allocated on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    /// Object template id.
    pub object_id: u32,
    /// Harvestable resource.
    pub accessible_resource: Option<AccessibleResource>,
    /// Top-left corner.
    pub position: Point,
    /// Stacking order.
    pub layer: f32,
}

impl SavedTile {
    fn capture(id: EntityId, tile: &Tile) -> Self {
        Self {
            entity_id: Some(id),
            object_id: tile.object_id,
            accessible_resource: tile.accessible_resource,
            position: tile.position,
            layer: tile.layer,
        }
    }

    fn restore(&self, content: &ContentRegistry) -> CoreResult<Tile> {
        let object = content.object(self.object_id)?;
        if let Some(resource) = &self.accessible_resource {
            content.resource(resource.resource_id)?;
            if resource.amount < 0.0 {
                return Err(CoreError::Validation(format!(
                    "tile with object {} has a negative resource amount",
                    self.object_id
                )));
            }
        }
        Ok(Tile {
            object_id: object.id,
            position: self.position,
            layer: self.layer,
            accessible_resource: self.accessible_resource,
            resource_id: object.resource_id,
        })
    }
}

/// A creature and its tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCreature {
    /// The creature's tile.
    pub tile: SavedTile,
    /// Species and live state.
    #[serde(flatten)]
    pub creature: Creature,
}

/// A plant and its tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlant {
    /// The plant's tile.
    pub tile: SavedTile,
    /// Growth state.
    #[serde(flatten)]
    pub plant: Plant,
}

/// Everything needed to rebuild a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version.
    #[serde(default)]
    pub version: u32,
    /// When the save was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// In-game time at the moment of saving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<CalendarTime>,
    /// Tiles that host neither a creature nor a plant.
    #[serde(default)]
    pub tiles: Vec<SavedTile>,
    /// Creatures with their tiles.
    #[serde(default)]
    pub creatures: Vec<SavedCreature>,
    /// Plants with their tiles.
    #[serde(default)]
    pub plants: Vec<SavedPlant>,
}

enum Component {
    None,
    Creature(Creature),
    Plant(Plant),
}

impl SaveFile {
    /// Snapshot a world. Every object is written exactly once.
    pub fn capture(world: &World, time: Option<CalendarTime>) -> Self {
        let mut seen = HashSet::new();
        let mut save = Self {
            version: SAVE_VERSION,
            saved_at: Some(Utc::now()),
            time,
            tiles: Vec::new(),
            creatures: Vec::new(),
            plants: Vec::new(),
        };

        for (id, creature) in world.creatures() {
            if let Some(tile) = world.tile(id)
                && seen.insert(id)
            {
                save.creatures.push(SavedCreature {
                    tile: SavedTile::capture(id, tile),
                    creature: creature.clone(),
                });
            }
        }
        for (id, plant) in world.plants() {
            if let Some(tile) = world.tile(id)
                && seen.insert(id)
            {
                save.plants.push(SavedPlant {
                    tile: SavedTile::capture(id, tile),
                    plant: plant.clone(),
                });
            }
        }
        for (id, tile) in world.tiles() {
            if seen.insert(id) {
                save.tiles.push(SavedTile::capture(id, tile));
            }
        }

        tracing::debug!(
            tiles = save.tiles.len(),
            creatures = save.creatures.len(),
            plants = save.plants.len(),
            "world captured"
        );
        save
    }

    /// Rebuild a world, resolving every template id against `content`.
    ///
    /// Unknown ids and duplicate entity ids are errors. Targets pointing at
    /// objects that are not part of the save are dropped with a warning.
    /// Spatial queries are not persisted, so a creature that was waiting for
    /// one goes back to idle and asks again.
    pub fn restore(&self, content: &ContentRegistry) -> CoreResult<World> {
        let mut entries = Vec::with_capacity(self.entity_count());
        for saved in &self.tiles {
            entries.push((saved.entity_id, saved.restore(content)?, Component::None));
        }
        for saved in &self.creatures {
            content.creature(saved.creature.stats.species_id)?;
            entries.push((
                saved.tile.entity_id,
                saved.tile.restore(content)?,
                Component::Creature(saved.creature.clone()),
            ));
        }
        for saved in &self.plants {
            content.plant(saved.plant.plant_id)?;
            if let Some(grown_id) = saved.plant.grown_id {
                content.plant(grown_id)?;
            }
            entries.push((
                saved.tile.entity_id,
                saved.tile.restore(content)?,
                Component::Plant(saved.plant.clone()),
            ));
        }

        // Explicit ids first so allocated ids cannot collide with them.
        entries.sort_by_key(|(id, _, _)| id.is_none());
        let mut world = World::new();
        for (id, tile, component) in entries {
            let id = match id {
                Some(id) => {
                    world.insert_tile(id, tile)?;
                    id
                }
                None => world.add_tile(tile),
            };
            match component {
                Component::None => {}
                Component::Creature(creature) => world.attach_creature(id, creature)?,
                Component::Plant(plant) => world.attach_plant(id, plant)?,
            }
        }

        reconcile_creatures(&mut world);
        tracing::info!(
            tiles = world.tile_count(),
            creatures = world.creature_count(),
            plants = world.plant_count(),
            "world restored"
        );
        Ok(world)
    }

    /// Total number of positioned objects in the save.
    pub fn entity_count(&self) -> usize {
        self.tiles.len() + self.creatures.len() + self.plants.len()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to a file.
    pub fn write_to(&self, path: &Path) -> CoreResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    /// Read from a file.
    pub fn read_from(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loading save");
        Self::from_json(&json)
    }
}

fn reconcile_creatures(world: &mut World) {
    for id in world.creature_ids() {
        let movement_ok = world
            .creature(id)
            .and_then(|c| c.movement_target)
            .is_none_or(|t| world.contains(t));
        let target_ok = world
            .creature(id)
            .and_then(|c| c.target)
            .is_none_or(|t| world.contains(t));
        let Some(creature) = world.creature_mut(id) else {
            continue;
        };
        if !movement_ok {
            tracing::warn!(%id, missing = ?creature.movement_target, "dropping dangling movement target");
            creature.movement_target = None;
        }
        if !target_ok {
            tracing::warn!(%id, missing = ?creature.target, "dropping dangling target");
            creature.target = None;
        }
        let waiting = matches!(creature.activity, Activity::LookingAround | Activity::Wandering)
            && creature.movement_target.is_none();
        let eating_nothing = creature.activity == Activity::Eating && creature.target.is_none();
        if waiting || eating_nothing {
            creature.become_idle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{GROUND_LAYER, VEGETATION_LAYER};

    fn content() -> ContentRegistry {
        ContentRegistry::bundled().unwrap()
    }

    fn sample_world(content: &ContentRegistry) -> World {
        let mut world = World::new();
        for x in 0..3 {
            world
                .spawn_tile(content, 1, Point::new(x as f32 * 32.0, 0.0), GROUND_LAYER)
                .unwrap();
        }
        world
            .spawn_tile(content, 3, Point::new(32.0, 0.0), VEGETATION_LAYER)
            .unwrap();
        world.spawn_creature(content, 1, Point::new(0.0, 0.0)).unwrap();
        world.spawn_plant(content, 1, Point::new(64.0, 0.0)).unwrap();
        world
    }

    fn tuples(world: &World) -> Vec<(u32, (i64, i64), i64, Option<(u32, i64)>)> {
        let mut out: Vec<_> = world
            .tiles()
            .map(|(_, t)| {
                (
                    t.object_id,
                    (t.position.x as i64, t.position.y as i64),
                    t.layer as i64,
                    t.accessible_resource
                        .map(|r| (r.resource_id, (r.amount * 1000.0) as i64)),
                )
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn capture_writes_each_object_once() {
        let content = content();
        let world = sample_world(&content);
        let save = SaveFile::capture(&world, None);
        assert_eq!(save.tiles.len(), 4);
        assert_eq!(save.creatures.len(), 1);
        assert_eq!(save.plants.len(), 1);
        assert_eq!(save.entity_count(), world.tile_count());

        let mut ids: Vec<_> = save
            .tiles
            .iter()
            .chain(save.creatures.iter().map(|c| &c.tile))
            .chain(save.plants.iter().map(|p| &p.tile))
            .filter_map(|t| t.entity_id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), save.entity_count());
    }

    #[test]
    fn json_round_trip_preserves_tiles() {
        let content = content();
        let world = sample_world(&content);
        let save = SaveFile::capture(&world, Some(CalendarTime::from_seconds(90)));
        let json = save.to_json().unwrap();
        let loaded = SaveFile::from_json(&json).unwrap();
        assert_eq!(loaded, save);

        let restored = loaded.restore(&content).unwrap();
        assert_eq!(restored.tile_count(), world.tile_count());
        assert_eq!(restored.creature_count(), 1);
        assert_eq!(restored.plant_count(), 1);
        assert_eq!(tuples(&restored), tuples(&world));
    }

    #[test]
    fn restore_rebinds_resource_back_reference() {
        let content = content();
        let json = r#"{
            "tiles": [
                { "object_id": 3, "accessible_resource": { "resource_id": 1, "amount": 4.0 },
                  "position": { "x": 0.0, "y": 0.0 }, "layer": 1.0 }
            ]
        }"#;
        let world = SaveFile::from_json(json).unwrap().restore(&content).unwrap();
        let (_, tile) = world.tiles().next().unwrap();
        assert_eq!(tile.resource_id, Some(1));
        assert_eq!(tile.amount(), 4.0);
    }

    #[test]
    fn restore_fails_on_unknown_object() {
        let json = r#"{ "tiles": [ { "object_id": 999, "accessible_resource": null,
            "position": { "x": 0.0, "y": 0.0 }, "layer": 0.0 } ] }"#;
        let save = SaveFile::from_json(json).unwrap();
        assert!(matches!(
            save.restore(&content()),
            Err(CoreError::UnknownObject(999))
        ));
    }

    #[test]
    fn restore_rejects_duplicate_ids() {
        let content = content();
        let world = sample_world(&content);
        let mut save = SaveFile::capture(&world, None);
        let duplicate = save.tiles[0].clone();
        save.tiles.push(duplicate);
        assert!(matches!(
            save.restore(&content),
            Err(CoreError::DuplicateEntity(_))
        ));
    }

    #[test]
    fn restore_drops_dangling_targets() {
        let content = content();
        let world = sample_world(&content);
        let mut save = SaveFile::capture(&world, None);
        save.creatures[0].creature.activity = Activity::Eating;
        save.creatures[0].creature.target = Some(EntityId(9_999));
        let restored = save.restore(&content).unwrap();
        let (_, creature) = restored.creatures().next().unwrap();
        assert_eq!(creature.target, None);
        assert_eq!(creature.activity, Activity::Idle);
    }

    #[test]
    fn file_round_trip() {
        let content = content();
        let world = sample_world(&content);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        SaveFile::capture(&world, None).write_to(&path).unwrap();
        let restored = SaveFile::read_from(&path).unwrap().restore(&content).unwrap();
        assert_eq!(restored.tile_count(), world.tile_count());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SaveFile::read_from(&dir.path().join("nope.json")),
            Err(CoreError::Io(_))
        ));
    }
}
