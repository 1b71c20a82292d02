#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the colony engine.
//!
//! This crate defines the small vocabulary every other crate speaks: handles
//! that identify pool slots, the closed set of entity kinds and capability
//! tags, and the axis-aligned rectangle used for both collision tests and
//! draw destinations. Nothing here owns simulation state; the authoritative
//! entity pool lives in the world crate and systems receive these values by
//! copy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the colony.";

/// Side length of a single map tile measured in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Stable reference to a pool slot, stamped with the slot's generation.
///
/// The index never changes while the entity is alive. The generation is bumped
/// every time the slot is acquired, so a handle captured before a slot was
/// released and reused no longer resolves.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    /// Creates a handle for the provided slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Zero-based slot index inside the entity pool.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Slot index converted for direct indexing.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.index as usize
    }
}

/// Behavior family of an entity. Selects the update and render routines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Unclassified slot; skipped by behavior dispatch.
    #[default]
    None,
    /// Pick-up that bobs in place and is passed through by actors.
    Collectable,
    /// Static level geometry.
    Collider,
    /// Horizontally patrolling platform that actors can ride.
    Platform,
    /// Doorway between areas.
    Door,
    /// Food source harvested by workers.
    Flower,
    /// Colony hub that dispatches workers.
    Hub,
    /// Ant that collects food for the hub.
    Worker,
    /// Hostile creature that hunts workers.
    Predator,
    /// Shot fired by a defense building.
    Projectile,
    /// Turret that protects the colony from predators.
    DefenseBuilding,
    /// Player-controlled platformer actor.
    Player,
}

/// Sprite identity used when an entity kind has several appearances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteTag {
    /// No dedicated sprite; render as a filled quad.
    #[default]
    None,
    /// Bird sprite.
    Bird,
}

/// Capability tag consulted by systems to select participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Takes part in mover collision tests.
    Collidable,
    /// Moves on its own every frame.
    Movable,
    /// Can be damaged by projectiles and predators.
    Attackable,
}

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its left/top edge and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle anchored at `position` with the provided `size`.
    #[must_use]
    pub const fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Creates a zero-origin rectangle with the provided extents.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extents as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Geometric centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap,
    /// and a rectangle with no area overlaps nothing.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Reports whether the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Reports whether `point` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns the rectangle moved by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Returns `self` placed immediately to the right of `anchor`, sharing its top edge.
    #[must_use]
    pub fn right_of(self, anchor: &Rect) -> Self {
        Self::new(anchor.right(), anchor.y, self.width, self.height)
    }

    /// Returns `self` placed directly below `anchor`, sharing its left edge.
    #[must_use]
    pub fn below(self, anchor: &Rect) -> Self {
        Self::new(anchor.x, anchor.bottom(), self.width, self.height)
    }

    /// Returns `self` vertically centred within `anchor`.
    #[must_use]
    pub fn centered_vertically_in(self, anchor: &Rect) -> Self {
        Self::new(
            self.x,
            anchor.y + (anchor.height - self.height) * 0.5,
            self.width,
            self.height,
        )
    }

    /// Returns `self` horizontally centred within `anchor`.
    #[must_use]
    pub fn centered_horizontally_in(self, anchor: &Rect) -> Self {
        Self::new(
            anchor.x + (anchor.width - self.width) * 0.5,
            self.y,
            self.width,
            self.height,
        )
    }
}

/// Moves `current` toward `target` by at most `increase`, never overshooting.
#[must_use]
pub fn approach(current: f32, target: f32, increase: f32) -> f32 {
    if current < target {
        (current + increase).min(target)
    } else {
        (current - increase).max(target)
    }
}

/// Moves `current` toward `target` by at most `max_distance`, never overshooting.
#[must_use]
pub fn move_towards(current: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_distance || distance <= f32::EPSILON {
        target
    } else {
        current + delta / distance * max_distance
    }
}
