use serde::{Deserialize, Serialize};

use crate::content::ObjectTemplate;
use crate::geometry::{Aabb, Point};

/// Layer of ground tiles.
pub const GROUND_LAYER: f32 = 0.0;
/// Layer of static vegetation tiles.
pub const VEGETATION_LAYER: f32 = 1.0;
/// Layer of growing plants.
pub const PLANT_LAYER: f32 = 2.0;
/// Layer of creatures.
pub const CREATURE_LAYER: f32 = 4.0;

/// The depletable quantity of a resource available on one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibleResource {
    /// Resource kind id.
    pub resource_id: u32,
    /// Remaining amount, never negative.
    pub amount: f32,
}

/// Positional and visual state of a world object.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Object template this tile renders as.
    pub object_id: u32,
    /// Top-left corner in world units.
    pub position: Point,
    /// Stacking order; higher layers draw on top.
    pub layer: f32,
    /// Harvestable resource on this tile.
    pub accessible_resource: Option<AccessibleResource>,
    /// Resource kind provided by the bound object, resolved from the registry.
    pub resource_id: Option<u32>,
}

impl Tile {
    /// Create a tile bound to `object`, seeded with the object's resource amount.
    pub fn from_object(object: &ObjectTemplate, position: Point, layer: f32) -> Self {
        Self {
            object_id: object.id,
            position,
            layer,
            accessible_resource: object.resource_id.map(|resource_id| AccessibleResource {
                resource_id,
                amount: object.amount,
            }),
            resource_id: object.resource_id,
        }
    }

    /// Rebind the tile to another object template, keeping the harvestable amount.
    pub fn rebind(&mut self, object: &ObjectTemplate) {
        self.object_id = object.id;
        self.resource_id = object.resource_id;
        match (object.resource_id, self.accessible_resource.as_mut()) {
            (Some(resource_id), Some(resource)) => resource.resource_id = resource_id,
            (Some(resource_id), None) => {
                self.accessible_resource = Some(AccessibleResource {
                    resource_id,
                    amount: object.amount,
                })
            }
            (None, _) => {}
        }
    }

    /// Bounding box covered by the tile sprite.
    pub fn aabb(&self) -> Aabb {
        Aabb::tile(self.position)
    }

    /// The tile box grown by `radius` on every side.
    pub fn surrounding_area(&self, radius: f32) -> Aabb {
        Aabb::around_tile(self.position, radius)
    }

    /// Remaining resource amount, zero when the tile carries none.
    pub fn amount(&self) -> f32 {
        self.accessible_resource.map_or(0.0, |r| r.amount)
    }

    /// Whether the tile offers a positive amount of one of `resource_ids`.
    pub fn offers_any(&self, resource_ids: &[u32]) -> bool {
        match self.resource_id {
            Some(id) => resource_ids.contains(&id) && self.amount() > 0.0,
            None => false,
        }
    }

    /// Human-readable position.
    pub fn position_text(&self) -> String {
        format!("At ({}, {})", self.position.x as i32, self.position.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass() -> ObjectTemplate {
        ObjectTemplate {
            id: 3,
            kind: "plant".into(),
            sprite_id: 0,
            spritesheet_id: 0,
            name: "Grass".into(),
            resource_id: Some(1),
            amount: 20.0,
        }
    }

    #[test]
    fn from_object_copies_resource() {
        let tile = Tile::from_object(&grass(), Point::new(32.0, 64.0), VEGETATION_LAYER);
        assert_eq!(tile.resource_id, Some(1));
        assert_eq!(
            tile.accessible_resource,
            Some(AccessibleResource {
                resource_id: 1,
                amount: 20.0
            })
        );
        assert_eq!(tile.position_text(), "At (32, 64)");
    }

    #[test]
    fn offers_any_requires_positive_amount() {
        let mut tile = Tile::from_object(&grass(), Point::default(), VEGETATION_LAYER);
        assert!(tile.offers_any(&[1, 2]));
        assert!(!tile.offers_any(&[2]));
        if let Some(resource) = tile.accessible_resource.as_mut() {
            resource.amount = 0.0;
        }
        assert!(!tile.offers_any(&[1]));
    }

    #[test]
    fn rebind_keeps_amount() {
        let mut tile = Tile::from_object(&grass(), Point::default(), PLANT_LAYER);
        if let Some(resource) = tile.accessible_resource.as_mut() {
            resource.amount = 7.5;
        }
        let mut tall = grass();
        tall.id = 6;
        tall.amount = 100.0;
        tile.rebind(&tall);
        assert_eq!(tile.object_id, 6);
        assert_eq!(tile.amount(), 7.5);
    }
}
