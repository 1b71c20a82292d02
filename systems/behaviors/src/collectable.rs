use colony_core::{EntityHandle, SpriteTag};
use colony_rendering::{Color, Layer, RenderQueue};
use colony_world::{Entity, World};

use crate::{sprites, Frame};

pub(crate) fn update(world: &mut World, handle: EntityHandle, frame: &Frame<'_>) {
    if let Some(collectable) = world.pool_mut().get_mut(handle) {
        collectable.position.y += (frame.elapsed * 10.0).sin() * 0.5;
    }
}

pub(crate) fn render(collectable: &Entity, queue: &mut RenderQueue) {
    queue.with_layer(Layer::Actors, |queue| match collectable.sprite {
        SpriteTag::Bird => queue.sprite(sprites::BIRD, collectable.position, Color::WHITE),
        SpriteTag::None => queue.quad(collectable.bounds(), Color::WHITE),
    });
}
