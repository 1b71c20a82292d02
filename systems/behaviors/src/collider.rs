use colony_core::Property;
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{Entity, World};

const WALL: Color = Color::from_rgb_u8(74, 84, 98);

/// Solid colliders are drawn as walls; triggers stay invisible.
pub(crate) fn render(collider: &Entity, queue: &mut RenderQueue) {
    if collider.trigger {
        return;
    }
    queue.with_layer(Layer::Base, |queue| queue.quad(collider.bounds(), WALL));
}

pub(crate) fn render_outlines(world: &World, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Debug, |queue| {
        for entity in world.pool().iter() {
            if !entity.has_property(Property::Collidable) {
                continue;
            }
            let tint = if entity.trigger { Color::GOLD } else { Color::RED };
            queue.quad_outline(entity.bounds(), 1.0, tint);
        }
    });
}
