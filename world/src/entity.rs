use colony_core::{EntityHandle, EntityKind, Property, Rect, SpriteTag};
use glam::Vec2;

/// Simulation participant stored in a pool slot.
///
/// `Entity::default()` is the zero value every released slot is reset to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    /// Handle stamped by the pool when the slot was acquired.
    pub handle: EntityHandle,
    /// Whether the slot is currently occupied.
    pub valid: bool,
    /// Top-left corner in world pixels.
    pub position: Vec2,
    /// Velocity in pixels per frame at a delta time of one.
    pub velocity: Vec2,
    /// Bounding box extents.
    pub size: Vec2,
    /// Fractional pixel carry-over per axis.
    pub remainder: Vec2,
    /// Behavior family.
    pub kind: EntityKind,
    /// Sprite selection within the kind.
    pub sprite: SpriteTag,
    properties: Vec<Property>,
    /// Set when a downward vertical move was blocked.
    pub grounded: bool,
    /// Horizontal facing, `-1.0`, `0.0` or `1.0`.
    pub facing: f32,
    /// Candidate the last blocked or passed-through step collided with.
    pub last_collided: Option<EntityHandle>,
    /// Pass-through collider: reported to observers but never blocks.
    pub trigger: bool,
    /// Platform the entity is currently standing on.
    pub riding: Option<EntityHandle>,
    /// Remaining hit points.
    pub health: i32,
    /// Claimed by another entity this frame or earlier.
    pub was_selected: bool,
    /// Took damage during the current frame.
    pub attacked: bool,
    /// Behavior-specific state.
    pub payload: Payload,
}

impl Entity {
    /// Detached, valid entity that does not live in any pool.
    ///
    /// Its handle is the default one, which never equals a handle issued by
    /// an [`crate::EntityPool`].
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        let mut entity = Self::default();
        entity.setup(position, size);
        entity
    }

    /// Resets kinematics and properties for a freshly acquired slot.
    pub(crate) fn setup(&mut self, position: Vec2, size: Vec2) {
        self.position = position;
        self.remainder = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.size = size;
        self.valid = true;
        self.properties.clear();
    }

    /// Appends every tag in `properties`. Duplicates are kept.
    pub fn add_properties(&mut self, properties: &[Property]) {
        self.properties.extend_from_slice(properties);
    }

    /// Reports whether any stored tag equals `property`.
    #[must_use]
    pub fn has_property(&self, property: Property) -> bool {
        self.properties.iter().any(|stored| *stored == property)
    }

    /// Stored capability tags in insertion order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Bounding box at the current position.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    /// Bounding box if the entity stood at `position`.
    #[must_use]
    pub fn bounds_at(&self, position: Vec2) -> Rect {
        Rect::from_position_size(position, self.size)
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// Behavior-specific extension block owned by the entity's slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// No extension state.
    #[default]
    None,
    /// Player controller state.
    Player(PlayerState),
    /// Moving platform patrol state.
    Platform(PlatformState),
    /// Worker task state.
    Worker(WorkerState),
    /// Colony hub economy state.
    Hub(HubState),
    /// Predator hunting state.
    Predator(PredatorState),
    /// Defense building cooldown state.
    Defense(DefenseState),
    /// Projectile flight state.
    Projectile(ProjectileState),
}

/// Errand a hub assigns to its workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Task {
    /// Idle.
    #[default]
    None,
    /// Harvest flowers for food.
    Collect,
    /// Visit flowers without consuming them.
    Pollinate,
}

/// Wall-jump bookkeeping for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Touching a wall while airborne.
    pub wall_jump: bool,
    /// Wall jump already spent during this airtime.
    pub wall_jumped: bool,
}

/// Horizontal patrol bounds of a moving platform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlatformState {
    /// Leftmost x the platform reaches.
    pub min_x: f32,
    /// Rightmost x the platform reaches.
    pub max_x: f32,
    /// Patrol speed in pixels per second.
    pub speed: f32,
}

/// Task state of a worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerState {
    /// Errand assigned by the hub.
    pub task: Task,
    /// Flower the worker claimed.
    pub flower: Option<EntityHandle>,
    /// Hub that dispatched the worker.
    pub hub: Option<EntityHandle>,
}

/// Economy state of the colony hub.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HubState {
    /// Errand handed to newly dispatched workers.
    pub current_task: Task,
    /// Seconds until the next worker leaves.
    pub perform_task_time: f32,
    /// Seconds until the next predator appears.
    pub predator_time: f32,
    /// Stored food.
    pub food: u32,
    /// Workers still available for dispatch.
    pub workers: u32,
}

/// Hunting state of a predator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PredatorState {
    /// Worker being hunted.
    pub target: Option<EntityHandle>,
    /// Seconds until the next bite lands.
    pub bite_cooldown: f32,
}

/// Cooldown of a defense building.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DefenseState {
    /// Seconds until the next shot.
    pub cooldown: f32,
}

/// Flight state of a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileState {
    /// Seconds left before the projectile fizzles out.
    pub lifetime: f32,
    /// Damage dealt on impact.
    pub damage: i32,
    /// Set once the projectile hit something.
    pub spent: bool,
}
