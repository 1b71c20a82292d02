//! Constructors that claim a slot and fill it in for one entity kind.
//!
//! Every constructor goes through [`EntityPool::spawn`], so pool exhaustion
//! panics here as well.

use colony_core::{EntityHandle, EntityKind, Property, SpriteTag, TILE_SIZE};
use glam::Vec2;

use crate::{
    DefenseState, EntityPool, HubState, Payload, PlatformState, PlayerState, PredatorState,
    ProjectileState, Task, WorkerState,
};

/// Side length of a worker.
pub const WORKER_SIZE: f32 = 10.0;
/// Side length of a predator.
pub const PREDATOR_SIZE: f32 = 12.0;
/// Side length of a projectile.
pub const PROJECTILE_SIZE: f32 = 4.0;
/// Footprint of a defense building.
pub const DEFENSE_SIZE: Vec2 = Vec2::new(16.0, 24.0);

/// Static or trigger collision volume.
pub fn collider(pool: &mut EntityPool, position: Vec2, size: Vec2, trigger: bool) -> EntityHandle {
    let handle = pool.spawn(position, size);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Collider;
        entity.trigger = trigger;
        entity.add_properties(&[Property::Collidable]);
    }
    handle
}

/// Tile-sized trigger that bobs in place.
pub fn collectable(pool: &mut EntityPool, position: Vec2, sprite: SpriteTag) -> EntityHandle {
    let handle = pool.spawn(position, Vec2::splat(TILE_SIZE));
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Collectable;
        entity.sprite = sprite;
        entity.trigger = true;
        entity.add_properties(&[Property::Collidable]);
    }
    handle
}

/// Solid platform patrolling between `patrol.min_x` and `patrol.max_x`.
pub fn platform(
    pool: &mut EntityPool,
    position: Vec2,
    size: Vec2,
    patrol: PlatformState,
) -> EntityHandle {
    let handle = pool.spawn(position, size);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Platform;
        entity.facing = 1.0;
        entity.velocity.x = patrol.speed;
        entity.payload = Payload::Platform(patrol);
        entity.add_properties(&[Property::Collidable]);
    }
    handle
}

/// Player-controlled actor.
pub fn player(pool: &mut EntityPool, position: Vec2) -> EntityHandle {
    let handle = pool.spawn(position, Vec2::splat(TILE_SIZE));
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Player;
        entity.facing = 1.0;
        entity.payload = Payload::Player(PlayerState::default());
        entity.add_properties(&[Property::Movable]);
    }
    handle
}

/// Tile-sized flower waiting to be harvested.
pub fn flower(pool: &mut EntityPool, position: Vec2) -> EntityHandle {
    let handle = pool.spawn(position, Vec2::splat(TILE_SIZE));
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Flower;
    }
    handle
}

/// Colony hub.
pub fn hub(pool: &mut EntityPool, position: Vec2, size: Vec2, state: HubState) -> EntityHandle {
    let handle = pool.spawn(position, size);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Hub;
        entity.payload = Payload::Hub(state);
    }
    handle
}

/// Worker centred on `center`, dispatched by `hub`.
pub fn worker(
    pool: &mut EntityPool,
    center: Vec2,
    task: Task,
    hub: EntityHandle,
    health: i32,
) -> EntityHandle {
    let size = Vec2::splat(WORKER_SIZE);
    let handle = pool.spawn(center - size * 0.5, size);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Worker;
        entity.health = health;
        entity.payload = Payload::Worker(WorkerState {
            task,
            flower: None,
            hub: Some(hub),
        });
        entity.add_properties(&[Property::Movable]);
    }
    handle
}

/// Predator that hunts workers.
pub fn predator(pool: &mut EntityPool, position: Vec2, health: i32) -> EntityHandle {
    let handle = pool.spawn(position, Vec2::splat(PREDATOR_SIZE));
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Predator;
        entity.health = health;
        entity.payload = Payload::Predator(PredatorState::default());
        entity.add_properties(&[Property::Movable, Property::Attackable]);
    }
    handle
}

/// Tower that shoots at predators.
pub fn defense_building(pool: &mut EntityPool, position: Vec2) -> EntityHandle {
    let handle = pool.spawn(position, DEFENSE_SIZE);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::DefenseBuilding;
        entity.payload = Payload::Defense(DefenseState::default());
    }
    handle
}

/// Projectile centred on `center` flying with `velocity` pixels per second.
pub fn projectile(
    pool: &mut EntityPool,
    center: Vec2,
    velocity: Vec2,
    state: ProjectileState,
) -> EntityHandle {
    let size = Vec2::splat(PROJECTILE_SIZE);
    let handle = pool.spawn(center - size * 0.5, size);
    if let Some(entity) = pool.get_mut(handle) {
        entity.kind = EntityKind::Projectile;
        entity.velocity = velocity;
        entity.payload = Payload::Projectile(state);
        entity.add_properties(&[Property::Movable]);
    }
    handle
}
