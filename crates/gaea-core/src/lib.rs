//! Core types for Gaea: world objects, static content, and the save format.
//!
//! World objects live in a [`World`] arena keyed by [`EntityId`]. Every object
//! has a [`tile::Tile`]; creatures and plants add a behavioural component under
//! the same id. Template ids are resolved through an explicitly passed
//! [`ContentRegistry`].

/// In-game calendar with named months.
pub mod calendar;
/// Static content: resources, objects, creature species, plant stages.
pub mod content;
/// Creature component, needs, and activities.
pub mod creature;
/// Entity identifiers.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Points and axis-aligned bounding boxes.
pub mod geometry;
/// Plant component and growth stages.
pub mod plant;
/// Save file shape and world reconstruction.
pub mod save;
/// Tile component and resource accounting.
pub mod tile;
/// The arena that owns every world object.
pub mod world;

/// Re-exports of calendar types.
pub use calendar::{CalendarTime, Month};
/// Re-export of [`content::ContentRegistry`].
pub use content::ContentRegistry;
/// Re-exports of creature types.
pub use creature::{Activity, Creature, Want};
/// Re-export of [`entity::EntityId`].
pub use entity::EntityId;
/// Re-exports of error types.
pub use error::{CoreError, CoreResult};
/// Re-exports of geometry types.
pub use geometry::{Aabb, Point};
/// Re-exports of plant types.
pub use plant::{Plant, PlantActivity};
/// Re-export of [`save::SaveFile`].
pub use save::SaveFile;
/// Re-export of [`tile::Tile`].
pub use tile::Tile;
/// Re-export of [`world::World`].
pub use world::World;
