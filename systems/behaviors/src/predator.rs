use colony_core::{move_towards, EntityHandle, EntityKind};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{Entity, Payload, World};
use rand::Rng;

use crate::Frame;

const PREDATOR: Color = Color::from_rgb_u8(120, 40, 160);

/// Hunts a random worker and bites it while touching.
pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &mut Frame<'_>) {
    let config = frame.config;
    let dt = frame.dt;
    let (pool, scratch) = world.split_mut();

    let Some(Payload::Predator(mut state)) =
        pool.get(handle).map(|predator| predator.payload.clone())
    else {
        return;
    };

    let prey_alive = state.target.map_or(false, |target| {
        pool.get(target)
            .map_or(false, |prey| prey.kind == EntityKind::Worker)
    });
    if !prey_alive {
        state.target = None;
        pool.of_kind_into(EntityKind::Worker, &mut scratch.targets);
        if !scratch.targets.is_empty() {
            let pick = frame.rng.gen_range(0..scratch.targets.len());
            state.target = Some(scratch.targets[pick].handle);
        }
    }

    let prey = state.target.and_then(|target| pool.get(target)).map(Entity::bounds);

    let Some(predator) = pool.get_mut(handle) else {
        return;
    };
    let Some(prey) = prey else {
        predator.payload = Payload::Predator(state);
        return;
    };

    let goal = prey.center() - predator.size * 0.5;
    predator.position = move_towards(predator.position, goal, config.predator_speed * dt);

    let mut bite = false;
    if predator.bounds().overlaps(&prey) {
        state.bite_cooldown -= dt;
        if state.bite_cooldown <= 0.0 {
            state.bite_cooldown = config.bite_interval;
            bite = true;
        }
    }
    predator.payload = Payload::Predator(state);

    if !bite {
        return;
    }
    if let Some(target) = state.target {
        if damage(world, target, config.bite_damage) {
            log::debug!("predator in slot {} killed a worker", handle.index());
        }
    }
}

/// Applies `amount` damage to `target`, releasing it at zero health.
///
/// Returns whether the target died. A dying worker gives its flower back.
pub(crate) fn damage(world: &mut World, target: EntityHandle, amount: i32) -> bool {
    let Some(victim) = world.pool_mut().get_mut(target) else {
        return false;
    };
    victim.health -= amount;
    victim.attacked = true;
    if victim.health > 0 {
        return false;
    }

    let claimed = match victim.payload {
        Payload::Worker(state) => state.flower,
        _ => None,
    };
    if let Some(flower) = claimed.and_then(|flower| world.pool_mut().get_mut(flower)) {
        flower.was_selected = false;
    }
    world.release(target)
}

pub(crate) fn render(predator: &Entity, queue: &mut RenderQueue) {
    let tint = if predator.attacked {
        PREDATOR.lighten(0.5)
    } else {
        PREDATOR
    };
    queue.with_layer(Layer::Actors, |queue| queue.quad(predator.bounds(), tint));
}
