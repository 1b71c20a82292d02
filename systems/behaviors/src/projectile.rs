use colony_core::{EntityHandle, Property};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_system_mover::step;
use colony_world::{Entity, Payload, World};

use crate::{predator, Frame};

/// Flies until it hits something attackable or its lifetime runs out.
pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &Frame<'_>) {
    let (pool, scratch) = world.split_mut();
    pool.with_property_into(Property::Attackable, &mut scratch.candidates);

    let Some(projectile) = pool.get_mut(handle) else {
        return;
    };
    let Payload::Projectile(mut state) = projectile.payload else {
        return;
    };
    state.lifetime -= frame.dt;
    projectile.payload = Payload::Projectile(state);

    let mut hit = None;
    if state.lifetime > 0.0 && !state.spent {
        let _ = step(
            projectile,
            frame.dt,
            &scratch.candidates,
            &mut |projectile: &mut Entity, other: &Entity| {
                if let Payload::Projectile(state) = &mut projectile.payload {
                    if !state.spent {
                        state.spent = true;
                        hit = Some(other.handle);
                    }
                }
            },
        );
    }

    if let Some(target) = hit {
        if predator::damage(world, target, state.damage) {
            log::debug!("projectile killed the entity in slot {}", target.index());
        }
    }

    let finished = match world.pool().get(handle).map(|projectile| &projectile.payload) {
        Some(Payload::Projectile(state)) => state.spent || state.lifetime <= 0.0,
        _ => false,
    };
    if finished {
        let released = world.release(handle);
        debug_assert!(released, "updating projectile must be alive");
    }
}

pub(crate) fn render(projectile: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Actors, |queue| {
        queue.quad(projectile.bounds(), Color::WHITE);
    });
}
