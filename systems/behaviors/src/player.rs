use colony_core::{approach, EntityHandle, EntityKind, Property};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_system_mover::{move_x, move_y};
use colony_world::{Entity, Payload, World};

use crate::{sprites, Frame};

// Velocities are in pixels per frame; rates are per second.
const RUN_SPEED: f32 = 2.0;
const RUN_ACCELERATION: f32 = 22.0;
const GROUND_FRICTION: f32 = 10.0;
const AIR_FRICTION: f32 = 12.0;
const JUMP_VELOCITY: f32 = -5.0;
const MAX_FALL_SPEED: f32 = 3.6;
const GRAVITY: f32 = 13.0;

pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &mut Frame<'_>) {
    let dt = frame.dt;
    let input = frame.input;
    let (pool, scratch) = world.split_mut();

    let riding = pool.get(handle).and_then(|player| player.riding);
    let carried = riding.map(|platform| {
        pool.get(platform)
            .map(|platform| platform.velocity.x * platform.facing * dt)
    });
    pool.with_property_into(Property::Collidable, &mut scratch.candidates);

    let Some(player) = pool.get_mut(handle) else {
        return;
    };
    let Payload::Player(mut state) = player.payload else {
        return;
    };

    match carried {
        Some(Some(velocity)) => player.velocity.x = velocity,
        Some(None) => {
            log::warn!("player rode a platform that no longer exists");
            player.riding = None;
        }
        None => {}
    }

    if input.move_left {
        player.facing = -1.0;
        player.velocity.x = approach(player.velocity.x, -RUN_SPEED, RUN_ACCELERATION * dt);
    } else if input.move_right {
        player.facing = 1.0;
        player.velocity.x = approach(player.velocity.x, RUN_SPEED, RUN_ACCELERATION * dt);
    }

    if input.jump && player.grounded {
        player.grounded = false;
        player.velocity.y = JUMP_VELOCITY;
        player.riding = None;
    }

    if player.grounded {
        state.wall_jump = false;
        state.wall_jumped = false;
    }

    if input.jump && state.wall_jump && !state.wall_jumped {
        player.velocity.y = JUMP_VELOCITY;
        state.wall_jumped = true;
    }

    if !input.move_left && !input.move_right {
        let friction = if player.grounded {
            GROUND_FRICTION
        } else {
            AIR_FRICTION
        };
        player.velocity.x = approach(player.velocity.x, 0.0, friction * dt);
    }

    player.payload = Payload::Player(state);

    let dx = player.velocity.x;
    let _ = move_x(player, dx, &scratch.candidates, &mut on_collision);
    player.velocity.y = approach(player.velocity.y, MAX_FALL_SPEED, GRAVITY * dt);
    let dy = player.velocity.y;
    let _ = move_y(player, dy, &scratch.candidates, &mut on_collision);

    if player.velocity.y == 0.0 {
        player.grounded = true;
    }
}

fn on_collision(player: &mut Entity, other: &Entity) {
    let against_wall = other.position.x == player.bounds().right()
        || other.bounds().right() == player.position.x;
    if against_wall && !player.grounded {
        if let Payload::Player(state) = &mut player.payload {
            state.wall_jump = true;
        }
    }

    if player.riding.is_none()
        && other.kind == EntityKind::Platform
        && player.position.y < other.position.y
    {
        player.riding = Some(other.handle);
    }

    if other.trigger {
        log::debug!("player touched trigger in slot {}", other.handle.index());
    }
}

pub(crate) fn render(player: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Actors, |queue| {
        queue.sprite(sprites::PLAYER, player.position, Color::WHITE);
    });
}
