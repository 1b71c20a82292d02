#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the colony.
//!
//! The [`World`] is the single simulation context handed to every system: it
//! owns the fixed-capacity [`EntityPool`], the per-frame [`FrameScratch`]
//! buffers and the simulation clock. Systems mutate entities in the pool
//! directly during the update phase and read through the [`query`] module.

mod entity;
mod pool;
pub mod spawn;

pub use entity::{
    DefenseState, Entity, HubState, Payload, PlatformState, PlayerState, PredatorState,
    ProjectileState, Task, WorkerState,
};
pub use pool::{EntityPool, PoolError, MAX_ENTITIES};

use colony_core::{EntityHandle, WELCOME_BANNER};

/// Buffers owned by a single frame.
///
/// Everything stored here is cleared by [`World::begin_frame`]; nothing taken
/// from these buffers may be kept past the end of the frame.
#[derive(Clone, Debug, Default)]
pub struct FrameScratch {
    /// Collision candidates for the mover call currently in progress.
    pub candidates: Vec<Entity>,
    /// Flowers that no worker has claimed yet, gathered at frame start.
    pub unclaimed_flowers: Vec<Entity>,
    /// General-purpose snapshot buffer for target searches.
    pub targets: Vec<Entity>,
}

impl FrameScratch {
    /// Empties every buffer while keeping the allocations.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.unclaimed_flowers.clear();
        self.targets.clear();
    }
}

/// Simulation clock advanced once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Scaled seconds elapsed during the current frame.
    pub dt: f32,
    /// Scaled seconds elapsed since the world was created.
    pub elapsed: f32,
    /// Number of frames started so far.
    pub frame: u64,
}

/// Represents the authoritative colony world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    pool: EntityPool,
    scratch: FrameScratch,
    clock: Clock,
}

impl World {
    /// Creates an empty world with [`MAX_ENTITIES`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Creates an empty world with `capacity` entity slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            banner: WELCOME_BANNER,
            pool: EntityPool::with_capacity(capacity),
            scratch: FrameScratch::default(),
            clock: Clock::default(),
        }
    }

    /// Starts a new frame: clears the scratch buffers and advances the clock.
    pub fn begin_frame(&mut self, dt: f32) {
        self.scratch.clear();
        self.clock.dt = dt.max(0.0);
        self.clock.elapsed += self.clock.dt;
        self.clock.frame = self.clock.frame.saturating_add(1);
    }

    /// Releases every entity and rewinds the clock.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.scratch.clear();
        self.clock = Clock::default();
    }

    /// Read access to the entity pool.
    #[must_use]
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Write access to the entity pool.
    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    /// Borrows the pool and the scratch buffers at the same time.
    pub fn split_mut(&mut self) -> (&mut EntityPool, &mut FrameScratch) {
        (&mut self.pool, &mut self.scratch)
    }

    /// Releases `handle`, returning `false` when it was already stale.
    pub fn release(&mut self, handle: EntityHandle) -> bool {
        self.pool.release(handle)
    }

    /// Current simulation clock.
    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use colony_core::{EntityHandle, EntityKind, Property};

    use super::{Entity, FrameScratch, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Resolves `handle`, returning `None` when it is stale.
    #[must_use]
    pub fn entity(world: &World, handle: EntityHandle) -> Option<&Entity> {
        world.pool.get(handle)
    }

    /// Snapshot of every valid entity carrying `property`.
    #[must_use]
    pub fn with_property(world: &World, property: Property) -> Vec<Entity> {
        let mut out = Vec::new();
        world.pool.with_property_into(property, &mut out);
        out
    }

    /// Snapshot of every valid entity of `kind`.
    #[must_use]
    pub fn of_kind(world: &World, kind: EntityKind) -> Vec<Entity> {
        let mut out = Vec::new();
        world.pool.of_kind_into(kind, &mut out);
        out
    }

    /// Number of valid entities of `kind`.
    #[must_use]
    pub fn count_of_kind(world: &World, kind: EntityKind) -> usize {
        world
            .pool
            .iter()
            .filter(|entity| entity.kind == kind)
            .count()
    }

    /// Frame scratch buffers as filled so far this frame.
    #[must_use]
    pub fn scratch(world: &World) -> &FrameScratch {
        &world.scratch
    }
}
