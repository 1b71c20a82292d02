use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::Entity;
use glam::Vec2;

use crate::sprites;

pub(crate) fn render(flower: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Flora, |queue| {
        queue.sprite(sprites::FLOWER, flower.position, Color::WHITE);
    });
    queue.with_layer(Layer::Background, |queue| {
        let spot = flower.position + Vec2::new(0.0, flower.size.y * 0.5);
        queue.sprite(sprites::FLOWER_SPOT, spot, Color::WHITE);
    });
}
