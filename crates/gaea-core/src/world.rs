use std::collections::BTreeMap;

use crate::content::ContentRegistry;
use crate::creature::Creature;
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::geometry::Point;
use crate::plant::Plant;
use crate::tile::{CREATURE_LAYER, PLANT_LAYER, Tile};

/// Arena of world objects.
///
/// Every object has a [`Tile`]; creatures and plants additionally have a
/// behavioural component stored under the same [`EntityId`]. Ids are handed
/// out in increasing order and never reused.
#[derive(Debug, Clone, Default)]
pub struct World {
    next_id: u64,
    tiles: BTreeMap<EntityId, Tile>,
    creatures: BTreeMap<EntityId, Creature>,
    plants: BTreeMap<EntityId, Plant>,
}

impl World {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    /// Add a tile under a freshly allocated id.
    pub fn add_tile(&mut self, tile: Tile) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.tiles.insert(id, tile);
        id
    }

    /// Add a tile under a known id, e.g. when restoring a save.
    pub fn insert_tile(&mut self, id: EntityId, tile: Tile) -> CoreResult<()> {
        if self.tiles.contains_key(&id) {
            return Err(CoreError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.0 + 1);
        self.tiles.insert(id, tile);
        Ok(())
    }

    /// Attach a creature component to an existing tile.
    pub fn attach_creature(&mut self, id: EntityId, creature: Creature) -> CoreResult<()> {
        if !self.tiles.contains_key(&id) {
            return Err(CoreError::EntityNotFound(id));
        }
        if self.creatures.contains_key(&id) || self.plants.contains_key(&id) {
            return Err(CoreError::DuplicateEntity(id));
        }
        self.creatures.insert(id, creature);
        Ok(())
    }

    /// Attach a plant component to an existing tile.
    pub fn attach_plant(&mut self, id: EntityId, plant: Plant) -> CoreResult<()> {
        if !self.tiles.contains_key(&id) {
            return Err(CoreError::EntityNotFound(id));
        }
        if self.creatures.contains_key(&id) || self.plants.contains_key(&id) {
            return Err(CoreError::DuplicateEntity(id));
        }
        self.plants.insert(id, plant);
        Ok(())
    }

    /// Place a plain tile of the given object template.
    pub fn spawn_tile(
        &mut self,
        content: &ContentRegistry,
        object_id: u32,
        position: Point,
        layer: f32,
    ) -> CoreResult<EntityId> {
        let object = content.object(object_id)?;
        Ok(self.add_tile(Tile::from_object(object, position, layer)))
    }

    /// Place a new creature of the given species.
    pub fn spawn_creature(
        &mut self,
        content: &ContentRegistry,
        species_id: u32,
        position: Point,
    ) -> CoreResult<EntityId> {
        let template = content.creature(species_id)?;
        let object = content.object(template.object_id)?;
        let id = self.add_tile(Tile::from_object(object, position, CREATURE_LAYER));
        self.creatures.insert(id, Creature::from_template(template));
        tracing::debug!(%id, species = %template.species, "creature spawned");
        Ok(id)
    }

    /// Place a new plant at the given growth stage.
    pub fn spawn_plant(
        &mut self,
        content: &ContentRegistry,
        plant_id: u32,
        position: Point,
    ) -> CoreResult<EntityId> {
        let template = content.plant(plant_id)?;
        let object = content.object(template.object_id)?;
        let id = self.add_tile(Tile::from_object(object, position, PLANT_LAYER));
        self.plants.insert(id, Plant::from_template(template));
        tracing::debug!(%id, plant = %template.name, "plant spawned");
        Ok(id)
    }

    /// Remove an object and all of its components.
    ///
    /// Returns the removed tile, or `None` if the id was already gone, so
    /// repeated removal is harmless.
    pub fn remove(&mut self, id: EntityId) -> Option<Tile> {
        self.creatures.remove(&id);
        self.plants.remove(&id);
        self.tiles.remove(&id)
    }

    /// Detach a creature component so it can be updated while the rest of
    /// the world stays borrowable. Pair with [`World::put_creature`].
    pub fn take_creature(&mut self, id: EntityId) -> Option<Creature> {
        self.creatures.remove(&id)
    }

    /// Reattach a detached creature. Dropped if its tile is gone.
    pub fn put_creature(&mut self, id: EntityId, creature: Creature) -> bool {
        if !self.tiles.contains_key(&id) {
            return false;
        }
        self.creatures.insert(id, creature);
        true
    }

    /// Detach a plant component. Pair with [`World::put_plant`].
    pub fn take_plant(&mut self, id: EntityId) -> Option<Plant> {
        self.plants.remove(&id)
    }

    /// Reattach a detached plant. Dropped if its tile is gone.
    pub fn put_plant(&mut self, id: EntityId, plant: Plant) -> bool {
        if !self.tiles.contains_key(&id) {
            return false;
        }
        self.plants.insert(id, plant);
        true
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// Whether the object still exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.tiles.contains_key(&id)
    }

    /// Tile component of an object.
    pub fn tile(&self, id: EntityId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Mutable tile component of an object.
    pub fn tile_mut(&mut self, id: EntityId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Creature component of an object.
    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    /// Mutable creature component of an object.
    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    /// Plant component of an object.
    pub fn plant(&self, id: EntityId) -> Option<&Plant> {
        self.plants.get(&id)
    }

    /// All tiles in id order, including those hosting creatures and plants.
    pub fn tiles(&self) -> impl Iterator<Item = (EntityId, &Tile)> {
        self.tiles.iter().map(|(id, t)| (*id, t))
    }

    /// All creatures in id order.
    pub fn creatures(&self) -> impl Iterator<Item = (EntityId, &Creature)> {
        self.creatures.iter().map(|(id, c)| (*id, c))
    }

    /// All plants in id order.
    pub fn plants(&self) -> impl Iterator<Item = (EntityId, &Plant)> {
        self.plants.iter().map(|(id, p)| (*id, p))
    }

    /// Snapshot of creature ids, safe to iterate while mutating the world.
    pub fn creature_ids(&self) -> Vec<EntityId> {
        self.creatures.keys().copied().collect()
    }

    /// Snapshot of plant ids, safe to iterate while mutating the world.
    pub fn plant_ids(&self) -> Vec<EntityId> {
        self.plants.keys().copied().collect()
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Number of tiles, including creature and plant hosts.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of creatures.
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Number of plants.
    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }
}
