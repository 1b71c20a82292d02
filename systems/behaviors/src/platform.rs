use colony_core::EntityHandle;
use colony_rendering::{Color, Layer, RenderQueue};
use colony_system_mover::{move_x, NoObserver};
use colony_world::{Entity, Payload, World};

use crate::Frame;

const PLATFORM: Color = Color::from_rgb_u8(130, 130, 130);

/// Patrols between the bounds, turning around at either end.
pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &Frame<'_>) {
    let Some(platform) = world.pool_mut().get_mut(handle) else {
        return;
    };
    let Payload::Platform(patrol) = platform.payload else {
        return;
    };

    let dx = platform.velocity.x * platform.facing * frame.dt;
    let _ = move_x(platform, dx, &[], &mut NoObserver);

    if platform.position.x >= patrol.max_x {
        platform.facing = -1.0;
    } else if platform.position.x <= patrol.min_x {
        platform.facing = 1.0;
    }
}

pub(crate) fn render(platform: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Base, |queue| queue.quad(platform.bounds(), PLATFORM));
}
