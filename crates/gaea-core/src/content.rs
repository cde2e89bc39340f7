//! Static game content: resource kinds, object templates, creature species,
//! and plant templates.
//!
//! A [`ContentRegistry`] is built once, validated, and then only read. It is
//! passed by reference to everything that needs to resolve ids.

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const BUNDLED_CONTENT: &str = include_str!("../assets/content.json");

/// A kind of consumable resource, e.g. grass or berries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceKind {
    /// Unique resource id.
    pub id: u32,
    /// Resource kind name.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Immutable description of something that can occupy a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    /// Unique object id.
    pub id: u32,
    /// Object kind, used to pick random objects of a category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sprite index inside the spritesheet.
    #[serde(default)]
    pub sprite_id: u32,
    /// Spritesheet holding the sprite.
    #[serde(default)]
    pub spritesheet_id: u32,
    /// Display name.
    pub name: String,
    /// Resource this object provides, if any.
    #[serde(default)]
    pub resource_id: Option<u32>,
    /// Initial resource amount on a freshly placed tile.
    #[serde(default)]
    pub amount: f32,
}

/// A creature species, including the initial values of its live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    /// Unique species id.
    pub id: u32,
    /// Object template used for the creature's tile.
    pub object_id: u32,
    /// Species name.
    pub species: String,
    /// Default individual name.
    #[serde(default)]
    pub name: String,
    /// Food drained per second while not eating, and eaten per second while eating.
    pub eating_speed: f32,
    /// Resource ids this species can eat.
    pub eats: Vec<u32>,
    /// Below this the creature is hungry.
    pub min_food: f32,
    /// At or above this the creature is satiated.
    pub max_food: f32,
    /// Below this the creature is tired.
    pub min_sleep: f32,
    /// At or above this the creature is fully rested.
    pub max_sleep: f32,
    /// World units travelled per second.
    pub movement_speed: f32,
    /// Initial food.
    #[serde(default)]
    pub food: f32,
    /// Initial sleep.
    #[serde(default)]
    pub sleep: f32,
}

/// A plant growth stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantTemplate {
    /// Unique plant id.
    pub id: u32,
    /// Object template used for the plant's tile.
    pub object_id: u32,
    /// Species name.
    pub species: String,
    /// Display name of this stage.
    pub name: String,
    /// Stage this plant matures into once fully grown.
    #[serde(default)]
    pub grown_id: Option<u32>,
    /// Harvestable resource added to the tile per second of growth.
    pub growth_rate: f32,
    /// Growth added per second.
    pub growth_speed: f32,
    /// Growth at which the plant is fully grown.
    pub max_growth: f32,
    /// Initial growth.
    #[serde(default)]
    pub growth: f32,
}

#[derive(Debug, Default, Deserialize)]
struct ContentFile {
    #[serde(default)]
    resources: Vec<ResourceKind>,
    #[serde(default)]
    objects: Vec<ObjectTemplate>,
    #[serde(default)]
    creatures: Vec<CreatureTemplate>,
    #[serde(default)]
    plants: Vec<PlantTemplate>,
}

/// Immutable lookup tables for all static content.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    resources: BTreeMap<u32, ResourceKind>,
    objects: BTreeMap<u32, ObjectTemplate>,
    creatures: BTreeMap<u32, CreatureTemplate>,
    plants: BTreeMap<u32, PlantTemplate>,
}

impl ContentRegistry {
    /// Build a registry from its parts, rejecting duplicate ids and dangling references.
    pub fn from_parts(
        resources: Vec<ResourceKind>,
        objects: Vec<ObjectTemplate>,
        creatures: Vec<CreatureTemplate>,
        plants: Vec<PlantTemplate>,
    ) -> CoreResult<Self> {
        let registry = Self {
            resources: index_by_id("resource", resources, |r| r.id)?,
            objects: index_by_id("object", objects, |o| o.id)?,
            creatures: index_by_id("creature", creatures, |c| c.id)?,
            plants: index_by_id("plant", plants, |p| p.id)?,
        };
        registry.validate()?;
        tracing::debug!(
            resources = registry.resources.len(),
            objects = registry.objects.len(),
            creatures = registry.creatures.len(),
            plants = registry.plants.len(),
            "content registry built"
        );
        Ok(registry)
    }

    /// Parse a registry from a JSON document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let file: ContentFile = serde_json::from_str(json)?;
        Self::from_parts(file.resources, file.objects, file.creatures, file.plants)
    }

    /// Load a registry from a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loading content");
        Self::from_json(&json)
    }

    /// The default content shipped with the crate.
    pub fn bundled() -> CoreResult<Self> {
        Self::from_json(BUNDLED_CONTENT)
    }

    /// Look up a resource kind.
    pub fn resource(&self, id: u32) -> CoreResult<&ResourceKind> {
        self.resources.get(&id).ok_or(CoreError::UnknownResource(id))
    }

    /// Look up an object template.
    pub fn object(&self, id: u32) -> CoreResult<&ObjectTemplate> {
        self.objects.get(&id).ok_or(CoreError::UnknownObject(id))
    }

    /// Look up a creature species.
    pub fn creature(&self, id: u32) -> CoreResult<&CreatureTemplate> {
        self.creatures.get(&id).ok_or(CoreError::UnknownCreature(id))
    }

    /// Look up a plant template.
    pub fn plant(&self, id: u32) -> CoreResult<&PlantTemplate> {
        self.plants.get(&id).ok_or(CoreError::UnknownPlant(id))
    }

    /// Pick a uniformly random object of the given kind.
    pub fn random_object_of_type<R: Rng + ?Sized>(
        &self,
        kind: &str,
        rng: &mut R,
    ) -> CoreResult<&ObjectTemplate> {
        let candidates: Vec<&ObjectTemplate> =
            self.objects.values().filter(|o| o.kind == kind).collect();
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| CoreError::NoObjectOfKind(kind.to_string()))
    }

    /// All resource kinds, ordered by id.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceKind> {
        self.resources.values()
    }

    /// All object templates, ordered by id.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectTemplate> {
        self.objects.values()
    }

    /// All creature species, ordered by id.
    pub fn creatures(&self) -> impl Iterator<Item = &CreatureTemplate> {
        self.creatures.values()
    }

    /// All plant templates, ordered by id.
    pub fn plants(&self) -> impl Iterator<Item = &PlantTemplate> {
        self.plants.values()
    }

    fn validate(&self) -> CoreResult<()> {
        for object in self.objects.values() {
            if let Some(resource_id) = object.resource_id {
                self.resource(resource_id)?;
            }
            if object.amount < 0.0 {
                return Err(CoreError::Validation(format!(
                    "object {} has a negative amount",
                    object.id
                )));
            }
        }
        for creature in self.creatures.values() {
            self.object(creature.object_id)?;
            for resource_id in &creature.eats {
                self.resource(*resource_id)?;
            }
        }
        for plant in self.plants.values() {
            self.object(plant.object_id)?;
            if let Some(grown_id) = plant.grown_id {
                self.plant(grown_id)?;
            }
        }
        Ok(())
    }
}

fn index_by_id<T>(
    what: &str,
    items: Vec<T>,
    id_of: impl Fn(&T) -> u32,
) -> CoreResult<BTreeMap<u32, T>> {
    let mut map = BTreeMap::new();
    for item in items {
        let id = id_of(&item);
        if map.insert(id, item).is_some() {
            return Err(CoreError::Validation(format!("duplicate {what} id {id}")));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn bundled_content_loads() {
        let content = ContentRegistry::bundled().unwrap();
        assert!(content.creatures().count() >= 1);
        assert!(content.plants().count() >= 1);
        assert_eq!(content.resource(1).unwrap().kind, "grass");
    }

    #[test]
    fn unknown_ids_fail() {
        let content = ContentRegistry::bundled().unwrap();
        assert!(matches!(content.object(999), Err(CoreError::UnknownObject(999))));
        assert!(matches!(content.resource(999), Err(CoreError::UnknownResource(999))));
        assert!(matches!(content.creature(999), Err(CoreError::UnknownCreature(999))));
        assert!(matches!(content.plant(999), Err(CoreError::UnknownPlant(999))));
    }

    #[test]
    fn random_object_respects_kind() {
        let content = ContentRegistry::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let object = content.random_object_of_type("plant", &mut rng).unwrap();
            assert_eq!(object.kind, "plant");
        }
        assert!(matches!(
            content.random_object_of_type("volcano", &mut rng),
            Err(CoreError::NoObjectOfKind(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{ "resources": [ {"id": 1, "type": "a"}, {"id": 1, "type": "b"} ] }"#;
        assert!(matches!(
            ContentRegistry::from_json(json),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn dangling_references_are_rejected() {
        let json = r#"{
            "objects": [ {"id": 1, "type": "plant", "name": "x", "resource_id": 4} ]
        }"#;
        assert!(matches!(
            ContentRegistry::from_json(json),
            Err(CoreError::UnknownResource(4))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ContentRegistry::from_json("{ not json"),
            Err(CoreError::Json(_))
        ));
    }
}
