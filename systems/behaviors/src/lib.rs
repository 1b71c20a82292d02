#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-kind update and render routines for every colony entity.
//!
//! [`Behaviors::update`] runs one simulation frame: it starts the frame on the
//! world, gathers the flowers nobody has claimed yet and then updates every
//! valid entity in slot order. [`Behaviors::render`] and
//! [`Behaviors::render_hud`] only read the world and fill render queues.

mod collectable;
mod collider;
mod defense;
mod flower;
mod hub;
mod hud;
mod platform;
mod player;
mod predator;
mod projectile;
pub mod sprites;
mod worker;

use colony_core::{EntityKind, Rect};
use colony_rendering::{FrameInput, RenderQueue};
use colony_system_bootstrap::Landmarks;
use colony_world::World;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Tunables for every behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Seed for every random choice made while simulating.
    pub seed: u64,
    /// Region predators enter from.
    pub play_area: Rect,
    /// Size of the virtual screen the HUD is laid out on.
    pub render_size: Vec2,
    /// Seconds between two workers leaving the hub.
    pub worker_interval: f32,
    /// Worker speed in pixels per second.
    pub worker_speed: f32,
    /// Hit points of a fresh worker.
    pub worker_health: i32,
    /// Food credited to the hub per harvested flower.
    pub food_per_flower: u32,
    /// Seconds between two predators appearing. Zero disables predators.
    pub predator_interval: f32,
    /// Predator speed in pixels per second.
    pub predator_speed: f32,
    /// Hit points of a fresh predator.
    pub predator_health: i32,
    /// Upper bound on predators alive at once.
    pub max_predators: usize,
    /// Seconds between two bites while a predator touches its prey.
    pub bite_interval: f32,
    /// Damage dealt per bite.
    pub bite_damage: i32,
    /// Distance within which a defense building fires.
    pub defense_range: f32,
    /// Seconds between two shots of a defense building.
    pub defense_cooldown: f32,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
    /// Seconds a projectile flies before fizzling out.
    pub projectile_lifetime: f32,
    /// Damage dealt by a projectile hit.
    pub projectile_damage: i32,
    /// Largest simulation speed multiplier.
    pub max_time_scale: f32,
    /// Outline every collidable entity in the debug layer.
    pub show_colliders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0x1d56,
            play_area: Rect::new(-320.0, -180.0, 640.0, 360.0),
            render_size: Vec2::new(640.0, 360.0),
            worker_interval: 1.2,
            worker_speed: 100.0,
            worker_health: 3,
            food_per_flower: 1,
            predator_interval: 15.0,
            predator_speed: 40.0,
            predator_health: 2,
            max_predators: 6,
            bite_interval: 0.5,
            bite_damage: 1,
            defense_range: 160.0,
            defense_cooldown: 1.0,
            projectile_speed: 240.0,
            projectile_lifetime: 1.5,
            projectile_damage: 1,
            max_time_scale: 8.0,
            show_colliders: false,
        }
    }
}

/// Per-frame context handed to every update routine.
pub(crate) struct Frame<'a> {
    pub(crate) config: &'a Config,
    pub(crate) input: &'a FrameInput,
    pub(crate) rng: &'a mut ChaCha8Rng,
    /// Scaled seconds since the previous frame.
    pub(crate) dt: f32,
    /// Scaled seconds since the world started.
    pub(crate) elapsed: f32,
}

/// Drives every entity behavior.
#[derive(Debug)]
pub struct Behaviors {
    config: Config,
    rng: ChaCha8Rng,
    time_scale: f32,
}

impl Behaviors {
    /// Creates the behaviors using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            time_scale: 1.0,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current simulation speed multiplier.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Advances the simulation by one frame.
    pub fn update(&mut self, world: &mut World, input: &FrameInput) {
        if input.speed_up {
            self.time_scale = (self.time_scale + 1.0).min(self.config.max_time_scale);
            log::info!("simulation speed x{}", self.time_scale);
        } else if input.slow_down {
            self.time_scale = (self.time_scale - 1.0).max(0.0);
            log::info!("simulation speed x{}", self.time_scale);
        }

        world.begin_frame(input.dt * self.time_scale);
        let clock = world.clock();

        {
            let (pool, scratch) = world.split_mut();
            pool.query_into(
                |entity| entity.kind == EntityKind::Flower && !entity.was_selected,
                &mut scratch.unclaimed_flowers,
            );
            for entity in pool.iter_mut() {
                entity.attacked = false;
            }
        }

        let mut frame = Frame {
            config: &self.config,
            input,
            rng: &mut self.rng,
            dt: clock.dt,
            elapsed: clock.elapsed,
        };

        for index in 0..world.pool().capacity() {
            let Some(handle) = world.pool().handle_at(index) else {
                continue;
            };
            let Some(kind) = world.pool().get(handle).map(|entity| entity.kind) else {
                continue;
            };

            match kind {
                EntityKind::Player => player::update(world, handle, &mut frame),
                EntityKind::Collectable => collectable::update(world, handle, &frame),
                EntityKind::Platform => platform::update(world, handle, &frame),
                EntityKind::Hub => hub::update(world, handle, &mut frame),
                EntityKind::Worker => worker::update(world, handle, &mut frame),
                EntityKind::Predator => predator::update(world, handle, &mut frame),
                EntityKind::DefenseBuilding => defense::update(world, handle, &mut frame),
                EntityKind::Projectile => projectile::update(world, handle, &frame),
                EntityKind::Flower
                | EntityKind::Collider
                | EntityKind::Door
                | EntityKind::None => {}
            }
        }
    }

    /// Emits world-space draw commands for every valid entity.
    pub fn render(&self, world: &World, queue: &mut RenderQueue) {
        for entity in world.pool().iter() {
            match entity.kind {
                EntityKind::Player => player::render(entity, queue),
                EntityKind::Collectable => collectable::render(entity, queue),
                EntityKind::Collider | EntityKind::Door => collider::render(entity, queue),
                EntityKind::Platform => platform::render(entity, queue),
                EntityKind::Flower => flower::render(entity, queue),
                EntityKind::Hub => hub::render(entity, queue),
                EntityKind::Worker => worker::render(entity, queue),
                EntityKind::Predator => predator::render(entity, queue),
                EntityKind::DefenseBuilding => defense::render(entity, queue),
                EntityKind::Projectile => projectile::render(entity, queue),
                EntityKind::None => {}
            }
        }

        if self.config.show_colliders {
            collider::render_outlines(world, queue);
        }
    }

    /// Emits screen-space HUD commands into [`colony_rendering::Layer::Hud`].
    pub fn render_hud(&self, world: &World, landmarks: &Landmarks, queue: &mut RenderQueue) {
        hud::render(world, landmarks, self, queue);
    }
}
