use colony_core::{EntityHandle, EntityKind};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{spawn, Entity, Payload, ProjectileState, World};

use crate::Frame;

const TOWER: Color = Color::from_rgb_u8(96, 72, 48);

/// Fires at the nearest predator in range whenever the cooldown allows.
pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &mut Frame<'_>) {
    let config = frame.config;
    let (pool, scratch) = world.split_mut();

    let Some(tower) = pool.get_mut(handle) else {
        return;
    };
    let Payload::Defense(mut state) = tower.payload else {
        return;
    };
    let origin = tower.center();

    state.cooldown = (state.cooldown - frame.dt).max(0.0);
    tower.payload = Payload::Defense(state);
    if state.cooldown > 0.0 {
        return;
    }

    pool.of_kind_into(EntityKind::Predator, &mut scratch.targets);
    let nearest = scratch
        .targets
        .iter()
        .map(|predator| (predator.center(), predator.center().distance(origin)))
        .filter(|(_, distance)| *distance <= config.defense_range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(center, _)| center);

    let Some(aim) = nearest else {
        return;
    };

    if let Some(tower) = pool.get_mut(handle) {
        state.cooldown = config.defense_cooldown;
        tower.payload = Payload::Defense(state);
    }

    let direction = (aim - origin).normalize_or_zero();
    let _ = spawn::projectile(
        pool,
        origin,
        direction * config.projectile_speed,
        ProjectileState {
            lifetime: config.projectile_lifetime,
            damage: config.projectile_damage,
            spent: false,
        },
    );
    log::trace!("defense in slot {} fired", handle.index());
}

pub(crate) fn render(tower: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Structures, |queue| {
        queue.quad(tower.bounds(), TOWER);
        queue.quad_outline(tower.bounds(), 1.0, Color::BLACK);
    });
}
