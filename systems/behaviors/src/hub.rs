use colony_core::{EntityHandle, EntityKind};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{query, spawn, Entity, Payload, Task, World};
use glam::Vec2;
use rand::Rng;

use crate::{sprites, Frame};

pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &mut Frame<'_>) {
    let config = frame.config;
    let dt = frame.dt;
    let flowers_waiting = !query::scratch(world).unclaimed_flowers.is_empty();
    let predators = query::count_of_kind(world, EntityKind::Predator);

    let Some(hub) = world.pool_mut().get_mut(handle) else {
        return;
    };
    let Payload::Hub(mut state) = hub.payload else {
        return;
    };
    let center = hub.center();

    let clicked = frame.input.select
        && frame
            .input
            .cursor_world
            .map_or(false, |cursor| hub.bounds().contains_point(cursor));
    if clicked {
        state.current_task = match state.current_task {
            Task::None => Task::Collect,
            Task::Collect => Task::Pollinate,
            Task::Pollinate => Task::None,
        };
        log::info!("hub task set to {:?}", state.current_task);
    }

    let mut dispatch = false;
    if state.current_task != Task::None {
        state.perform_task_time -= dt;
        if state.perform_task_time < 0.0 && flowers_waiting && state.workers > 0 {
            state.workers -= 1;
            state.perform_task_time = config.worker_interval;
            dispatch = true;
        }
    }

    let mut predator_at = None;
    if config.predator_interval > 0.0 {
        state.predator_time -= dt;
        if state.predator_time <= 0.0 {
            state.predator_time = config.predator_interval;
            if predators < config.max_predators {
                predator_at = Some(edge_position(config.play_area, &mut *frame.rng));
            }
        }
    }

    let task = state.current_task;
    hub.payload = Payload::Hub(state);

    let pool = world.pool_mut();
    if dispatch {
        let worker = spawn::worker(pool, center, task, handle, config.worker_health);
        log::debug!("hub dispatched worker in slot {}", worker.index());
    }
    if let Some(position) = predator_at {
        let predator = spawn::predator(pool, position, config.predator_health);
        log::debug!("predator appeared in slot {}", predator.index());
    }
}

/// Random spot on the inner edge of `area`. An empty area yields its corner.
fn edge_position<R>(area: colony_core::Rect, rng: &mut R) -> Vec2
where
    R: Rng + ?Sized,
{
    if area.is_empty() {
        return area.position();
    }
    let along_x = rng.gen_range(area.x..area.right());
    let along_y = rng.gen_range(area.y..area.bottom());
    match rng.gen_range(0..4) {
        0 => Vec2::new(along_x, area.y),
        1 => Vec2::new(along_x, area.bottom() - spawn::PREDATOR_SIZE),
        2 => Vec2::new(area.x, along_y),
        _ => Vec2::new(area.right() - spawn::PREDATOR_SIZE, along_y),
    }
}

pub(crate) fn render(hub: &Entity, queue: &mut RenderQueue) {
    let spot = Vec2::new(
        hub.position.x + (hub.size.x - sprites::HUB_SPOT.width) * 0.5,
        hub.position.y + hub.size.y * 0.5,
    );
    queue.with_layer(Layer::Background, |queue| {
        queue.sprite(sprites::HUB_SPOT, spot, Color::WHITE);
    });

    let tint = match hub.payload {
        Payload::Hub(state) if state.current_task != Task::None => Color::WHITE,
        _ => Color::WHITE.with_alpha(0.8),
    };
    queue.with_layer(Layer::Structures, |queue| {
        queue.sprite(sprites::HUB, hub.position, tint);
    });
}
