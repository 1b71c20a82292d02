use colony_core::Rect;
use colony_rendering::{Color, Layer, RenderQueue};
use colony_system_bootstrap::Landmarks;
use colony_world::{query, Payload, Task, World};
use glam::Vec2;

use crate::{sprites, Behaviors};

const TEXT_SIZE: f32 = 20.0;
const MARGIN: f32 = 10.0;

// No font metrics are available here; glyphs are assumed half as wide as tall.
fn text_box(text: &str, size: f32) -> Rect {
    Rect::sized(text.chars().count() as f32 * size * 0.5, size)
}

pub(crate) fn render(
    world: &World,
    landmarks: &Landmarks,
    behaviors: &Behaviors,
    queue: &mut RenderQueue,
) {
    queue.with_layer(Layer::Hud, |queue| {
        let hub = landmarks
            .hub
            .and_then(|hub| query::entity(world, hub))
            .and_then(|hub| match hub.payload {
                Payload::Hub(state) => Some(state),
                _ => None,
            });

        match hub {
            Some(state) => {
                let food_icon = Rect::new(MARGIN, MARGIN, 32.0, 32.0);
                let food = state.food.to_string();
                let food_text = text_box(&food, TEXT_SIZE)
                    .right_of(&food_icon)
                    .centered_vertically_in(&food_icon)
                    .translated(Vec2::new(MARGIN, 0.0));

                let worker_icon = Rect::sized(32.0, 32.0).below(&food_icon);
                let workers = state.workers.to_string();
                let worker_text = text_box(&workers, TEXT_SIZE)
                    .right_of(&worker_icon)
                    .centered_vertically_in(&worker_icon)
                    .translated(Vec2::new(MARGIN, 0.0));

                queue.sprite_stretched(sprites::FOOD_ICON, food_icon, Color::WHITE);
                queue.text(food, food_text.position(), TEXT_SIZE, Color::WHITE);
                queue.quad(worker_icon, Color::GOLD);
                queue.text(workers, worker_text.position(), TEXT_SIZE, Color::WHITE);

                let task = match state.current_task {
                    Task::None => None,
                    Task::Collect => Some("collecting"),
                    Task::Pollinate => Some("pollinating"),
                };
                if let Some(task) = task {
                    let placed = text_box(task, TEXT_SIZE)
                        .below(&worker_icon)
                        .translated(Vec2::new(0.0, MARGIN));
                    queue.text(task, placed.position(), TEXT_SIZE, Color::WHITE);
                }
            }
            None => {
                let banner = query::welcome_banner(world);
                let screen = Rect::from_position_size(Vec2::ZERO, behaviors.config().render_size);
                let placed = text_box(banner, TEXT_SIZE)
                    .translated(Vec2::new(0.0, MARGIN))
                    .centered_horizontally_in(&screen);
                queue.text(banner, placed.position(), TEXT_SIZE, Color::WHITE);
            }
        }

        let scale = behaviors.time_scale();
        if scale != 1.0 {
            let label = if scale == 0.0 {
                String::from("paused")
            } else {
                format!("x{scale}")
            };
            let screen_right = behaviors.config().render_size.x;
            let placed = text_box(&label, TEXT_SIZE);
            let position = Vec2::new(screen_right - placed.width - MARGIN, MARGIN);
            queue.text(label, position, TEXT_SIZE, Color::WHITE);
        }
    });
}
