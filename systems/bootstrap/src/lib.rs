#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that seeds a freshly created world with a scenario.

use colony_core::{EntityHandle, EntityKind, Rect, SpriteTag};
use colony_world::{query, spawn, HubState, PlatformState, Task, World};
use glam::Vec2;
use rand::Rng;

/// Starting layout to seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Hub surrounded by flowers, guarded by a defense building.
    #[default]
    Colony,
    /// Walled room with a moving platform and collectables.
    Platformer,
}

impl Scenario {
    /// Every scenario, in declaration order.
    pub const ALL: [Scenario; 2] = [Scenario::Colony, Scenario::Platformer];

    /// Lower-case name used in settings files and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Colony => "colony",
            Self::Platformer => "platformer",
        }
    }

    /// Parses a name produced by [`Scenario::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(name))
    }
}

/// Tunables used while seeding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Region flowers may be placed in, centred on the origin.
    pub play_area: Rect,
    /// Number of random flower placements tried.
    pub flower_attempts: u32,
    /// Footprint of the colony hub.
    pub hub_size: Vec2,
    /// Food stored in the hub at the start.
    pub starting_food: u32,
    /// Workers the hub can dispatch.
    pub workers: u32,
    /// Seconds before the first worker leaves once collection starts.
    pub first_worker_delay: f32,
    /// Seconds before the first predator appears.
    pub first_predator_delay: f32,
    /// Gap between the hub and the defense building.
    pub defense_gap: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            play_area: Rect::new(-320.0, -180.0, 640.0, 360.0),
            flower_attempts: 256,
            hub_size: Vec2::new(48.0, 64.0),
            starting_food: 100,
            workers: 20,
            first_worker_delay: 1.2,
            first_predator_delay: 20.0,
            defense_gap: 16.0,
        }
    }
}

/// Handles of the entities adapters care about after seeding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Landmarks {
    /// Seeded scenario.
    pub scenario: Scenario,
    /// Colony hub, if the scenario has one.
    pub hub: Option<EntityHandle>,
    /// Player, if the scenario has one.
    pub player: Option<EntityHandle>,
    /// Defense building, if the scenario has one.
    pub defense: Option<EntityHandle>,
    /// Number of flowers placed.
    pub flowers: usize,
}

impl Landmarks {
    /// World position the camera should centre on this frame.
    ///
    /// Follows the player while it is alive and stays on the origin otherwise.
    #[must_use]
    pub fn camera_target(&self, world: &World) -> Vec2 {
        self.player
            .and_then(|player| query::entity(world, player))
            .map_or(Vec2::ZERO, |player| player.center())
    }
}

/// Produces data required to start a session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Seeds `world` with `scenario`.
    ///
    /// The world is expected to be empty. Random placement draws from `rng`,
    /// so a seeded generator reproduces the same layout.
    pub fn populate<R>(
        &self,
        world: &mut World,
        scenario: Scenario,
        config: &Config,
        rng: &mut R,
    ) -> Landmarks
    where
        R: Rng + ?Sized,
    {
        let landmarks = match scenario {
            Scenario::Colony => populate_colony(world, config, rng),
            Scenario::Platformer => populate_platformer(world, config),
        };
        log::debug!(
            "seeded {} scenario: {} entities, {} flowers",
            scenario.name(),
            world.pool().len(),
            landmarks.flowers
        );
        landmarks
    }
}

fn populate_colony<R>(world: &mut World, config: &Config, rng: &mut R) -> Landmarks
where
    R: Rng + ?Sized,
{
    let pool = world.pool_mut();

    let hub_box = Rect::from_position_size(-config.hub_size * 0.5, config.hub_size);
    let hub = spawn::hub(
        pool,
        hub_box.position(),
        hub_box.size(),
        HubState {
            current_task: Task::None,
            perform_task_time: config.first_worker_delay,
            predator_time: config.first_predator_delay,
            food: config.starting_food,
            workers: config.workers,
        },
    );

    let defense_box = Rect::from_position_size(Vec2::ZERO, spawn::DEFENSE_SIZE)
        .right_of(&hub_box)
        .centered_vertically_in(&hub_box)
        .translated(Vec2::new(config.defense_gap, 0.0));
    let defense = spawn::defense_building(pool, defense_box.position());

    let area = config.play_area;
    let mut flowers = 0;
    for _ in 0..config.flower_attempts {
        let candidate = Vec2::new(
            rng.gen_range(area.x as i32..=area.right() as i32) as f32,
            rng.gen_range(area.y as i32..=area.bottom() as i32) as f32,
        );

        let in_building = hub_box.contains_point(candidate) || defense_box.contains_point(candidate);
        let out_of_bounds = candidate.x < area.x
            || candidate.x + colony_core::TILE_SIZE > area.right()
            || candidate.y < area.y
            || candidate.y + colony_core::TILE_SIZE > area.bottom();
        if in_building || out_of_bounds {
            continue;
        }

        if pool.len() == pool.capacity() {
            log::warn!("entity pool full after {flowers} flowers; skipping the rest");
            break;
        }
        let _ = spawn::flower(pool, candidate);
        flowers += 1;
    }

    Landmarks {
        scenario: Scenario::Colony,
        hub: Some(hub),
        player: None,
        defense: Some(defense),
        flowers,
    }
}

fn populate_platformer(world: &mut World, config: &Config) -> Landmarks {
    let pool = world.pool_mut();
    let area = config.play_area;
    let wall = 16.0;
    let floor_y = area.bottom() - 2.0 * wall;

    let _ = spawn::collider(
        pool,
        Vec2::new(area.x, floor_y),
        Vec2::new(area.width, 2.0 * wall),
        false,
    );
    let _ = spawn::collider(
        pool,
        Vec2::new(area.x, area.y),
        Vec2::new(wall, floor_y - area.y),
        false,
    );
    let _ = spawn::collider(
        pool,
        Vec2::new(area.right() - wall, area.y),
        Vec2::new(wall, floor_y - area.y),
        false,
    );
    let _ = spawn::collider(
        pool,
        Vec2::new(area.right() - 6.0 * wall, floor_y - 2.0 * wall),
        Vec2::new(wall, 2.0 * wall),
        true,
    );
    let _ = spawn::platform(
        pool,
        Vec2::new(-64.0, floor_y - 5.0 * wall),
        Vec2::new(48.0, 8.0),
        PlatformState {
            min_x: -160.0,
            max_x: 64.0,
            speed: 40.0,
        },
    );
    for offset in [-96.0, 0.0, 96.0] {
        let _ = spawn::collectable(
            pool,
            Vec2::new(offset, floor_y - 8.0 * wall),
            SpriteTag::Bird,
        );
    }
    let player = spawn::player(pool, Vec2::new(area.x + 4.0 * wall, floor_y - 4.0 * wall));

    Landmarks {
        scenario: Scenario::Platformer,
        hub: None,
        player: Some(player),
        defense: None,
        flowers: 0,
    }
}

/// Number of flowers still standing in `world`.
#[must_use]
pub fn flowers_remaining(world: &World) -> usize {
    query::count_of_kind(world, EntityKind::Flower)
}
