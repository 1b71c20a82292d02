//! Source rectangles inside the shared sprite atlas.

use colony_core::Rect;

/// Player character.
pub const PLAYER: Rect = Rect::new(1008.0, 1008.0, 16.0, 16.0);
/// Bird collectable.
pub const BIRD: Rect = Rect::new(112.0, 144.0, 16.0, 16.0);
/// Flower bloom.
pub const FLOWER: Rect = Rect::new(208.0, 0.0, 16.0, 16.0);
/// Shadow drawn under a flower.
pub const FLOWER_SPOT: Rect = Rect::new(208.0, 16.0, 16.0, 16.0);
/// Colony hub.
pub const HUB: Rect = Rect::new(208.0, 48.0, 48.0, 64.0);
/// Ground patch drawn under the hub.
pub const HUB_SPOT: Rect = Rect::new(192.0, 112.0, 80.0, 48.0);
/// HUD food counter icon.
pub const FOOD_ICON: Rect = Rect::new(144.0, 160.0, 32.0, 32.0);
