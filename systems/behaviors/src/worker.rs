use colony_core::{move_towards, EntityHandle};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{Entity, Payload, Task, World};
use rand::Rng;

use crate::Frame;

/// Claims a flower and walks to it. Collectors harvest it for the hub,
/// pollinators leave it standing and only return their labour.
pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &mut Frame<'_>) {
    let step = frame.config.worker_speed * frame.dt;
    let (pool, scratch) = world.split_mut();

    let Some(Payload::Worker(mut state)) = pool.get(handle).map(|worker| worker.payload.clone())
    else {
        return;
    };

    if let Some(flower) = state.flower {
        if !pool.is_alive(flower) {
            log::warn!("worker in slot {} lost its flower", handle.index());
            state.flower = None;
        }
    }

    if state.flower.is_none() && !scratch.unclaimed_flowers.is_empty() {
        let pick = frame.rng.gen_range(0..scratch.unclaimed_flowers.len());
        let candidate = scratch.unclaimed_flowers.swap_remove(pick);
        if let Some(flower) = pool.get_mut(candidate.handle) {
            assert!(
                !flower.was_selected,
                "flower in slot {} was claimed twice",
                candidate.handle.index()
            );
            flower.was_selected = true;
            state.flower = Some(candidate.handle);
        }
    }

    let target = state
        .flower
        .and_then(|flower| pool.get(flower))
        .map(|flower| flower.position);

    let Some(worker) = pool.get_mut(handle) else {
        return;
    };
    worker.payload = Payload::Worker(state);
    let Some(target) = target else {
        return;
    };
    worker.position = move_towards(worker.position, target, step);
    if worker.position != target {
        return;
    }

    let harvest = state.task == Task::Collect;
    if let Some(flower) = state.flower {
        if harvest {
            let released = world.release(flower);
            debug_assert!(released, "claimed flower was checked alive this frame");
        } else if let Some(flower) = world.pool_mut().get_mut(flower) {
            flower.was_selected = false;
        }
    }
    let released = world.release(handle);
    debug_assert!(released, "updating worker must be alive");

    let food = if harvest {
        frame.config.food_per_flower
    } else {
        0
    };
    deliver(world, state.hub, food);
}

fn deliver(world: &mut World, hub: Option<EntityHandle>, food: u32) {
    let Some(hub) = hub else {
        return;
    };
    match world.pool_mut().get_mut(hub).map(|hub| &mut hub.payload) {
        Some(Payload::Hub(state)) => {
            state.food += food;
            state.workers += 1;
            log::debug!("worker returned with {food} food, hub now holds {}", state.food);
        }
        _ => log::warn!("worker returned to a hub that no longer exists"),
    }
}

pub(crate) fn render(worker: &Entity, queue: &mut RenderQueue) {
    let tint = if worker.attacked {
        Color::RED
    } else {
        Color::GOLD
    };
    queue.with_layer(Layer::Actors, |queue| queue.quad(worker.bounds(), tint));
}
