#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for colony adapters.
//!
//! Game code never talks to a renderer directly. It emits [`DrawCommand`]s
//! into a [`RenderQueue`], grouped by [`Layer`], and the adapter replays the
//! queue once per frame against a [`DrawBackend`].

use anyhow::Result as AnyResult;
use colony_core::Rect;
use glam::Vec2;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the neutral sprite tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Gold used for highlights.
    pub const GOLD: Self = Self::from_rgb_u8(255, 203, 0);
    /// Red used for debug overlays and damage flashes.
    pub const RED: Self = Self::from_rgb_u8(230, 41, 55);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Draw layers, flushed in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Layer active when nothing was pushed.
    #[default]
    Base,
    /// Ground decals such as flower spots and the hub footprint.
    Background,
    /// Flower blooms.
    Flora,
    /// Moving actors.
    Actors,
    /// Buildings drawn over actors.
    Structures,
    /// Collision outlines.
    Debug,
    /// Screen-space overlay.
    Hud,
}

impl Layer {
    /// Number of layers.
    pub const COUNT: usize = 7;

    /// Every layer in flush order.
    pub const ALL: [Layer; Self::COUNT] = [
        Layer::Base,
        Layer::Background,
        Layer::Flora,
        Layer::Actors,
        Layer::Structures,
        Layer::Debug,
        Layer::Hud,
    ];

    /// Position of the layer in flush order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Single deferred draw request.
///
/// Sprites are sampled from the shared atlas without flipping or rotation and
/// are anchored at their top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle.
    Quad {
        /// Destination rectangle.
        dest: Rect,
        /// Fill color.
        tint: Color,
    },
    /// Rectangle outline.
    QuadOutline {
        /// Destination rectangle.
        dest: Rect,
        /// Line thickness in pixels.
        thickness: f32,
        /// Line color.
        tint: Color,
    },
    /// Atlas region drawn at its natural size.
    Sprite {
        /// Region of the atlas to sample.
        source: Rect,
        /// Top-left destination corner.
        position: Vec2,
        /// Multiplicative tint.
        tint: Color,
    },
    /// Atlas region scaled into a destination rectangle.
    SpriteStretched {
        /// Region of the atlas to sample.
        source: Rect,
        /// Destination rectangle.
        dest: Rect,
        /// Multiplicative tint.
        tint: Color,
    },
    /// Text run.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner of the text box.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        tint: Color,
    },
}

/// Immediate-mode drawing surface the queue is replayed against.
pub trait DrawBackend {
    /// Fills `dest` with `tint`.
    fn fill_rect(&mut self, dest: Rect, tint: Color);

    /// Outlines `dest`.
    fn outline_rect(&mut self, dest: Rect, thickness: f32, tint: Color);

    /// Draws the atlas region `source` at `position` without scaling.
    fn blit(&mut self, source: Rect, position: Vec2, tint: Color);

    /// Draws the atlas region `source` scaled into `dest`.
    fn blit_stretched(&mut self, source: Rect, dest: Rect, tint: Color);

    /// Draws `text` with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, tint: Color);
}

/// Backend that records every replayed command instead of drawing it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingBackend {
    /// Commands in the order the backend received them.
    pub calls: Vec<DrawCommand>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every recorded call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawBackend for RecordingBackend {
    fn fill_rect(&mut self, dest: Rect, tint: Color) {
        self.calls.push(DrawCommand::Quad { dest, tint });
    }

    fn outline_rect(&mut self, dest: Rect, thickness: f32, tint: Color) {
        self.calls.push(DrawCommand::QuadOutline {
            dest,
            thickness,
            tint,
        });
    }

    fn blit(&mut self, source: Rect, position: Vec2, tint: Color) {
        self.calls.push(DrawCommand::Sprite {
            source,
            position,
            tint,
        });
    }

    fn blit_stretched(&mut self, source: Rect, dest: Rect, tint: Color) {
        self.calls
            .push(DrawCommand::SpriteStretched { source, dest, tint });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, tint: Color) {
        self.calls.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            size,
            tint,
        });
    }
}

/// Deferred, layered command queue.
///
/// Commands land in the current layer. [`RenderQueue::push_layer`] saves the
/// current layer on a stack and [`RenderQueue::pop_layer`] restores it, so
/// nested render code can draw into other layers without knowing where its
/// caller was drawing.
#[derive(Clone, Debug, Default)]
pub struct RenderQueue {
    layers: [Vec<DrawCommand>; Layer::COUNT],
    stack: Vec<Layer>,
    current: Layer,
}

impl RenderQueue {
    /// Creates an empty queue drawing into [`Layer::Base`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer that receives emitted commands.
    #[must_use]
    pub fn current_layer(&self) -> Layer {
        self.current
    }

    /// Makes `layer` current, remembering the previous one.
    pub fn push_layer(&mut self, layer: Layer) {
        self.stack.push(self.current);
        self.current = layer;
    }

    /// Restores the layer that was current before the matching push.
    ///
    /// # Panics
    ///
    /// Panics when there is no matching push.
    pub fn pop_layer(&mut self) {
        match self.stack.pop() {
            Some(previous) => self.current = previous,
            None => panic!("layer stack underflow: pop_layer without a matching push_layer"),
        }
    }

    /// Runs `draw` with `layer` pushed and pops it afterwards.
    pub fn with_layer<R>(&mut self, layer: Layer, draw: impl FnOnce(&mut Self) -> R) -> R {
        self.push_layer(layer);
        let result = draw(self);
        self.pop_layer();
        result
    }

    /// Appends `command` to the current layer.
    pub fn emit(&mut self, command: DrawCommand) {
        self.layers[self.current.index()].push(command);
    }

    /// Emits a filled rectangle.
    pub fn quad(&mut self, dest: Rect, tint: Color) {
        self.emit(DrawCommand::Quad { dest, tint });
    }

    /// Emits a rectangle outline.
    pub fn quad_outline(&mut self, dest: Rect, thickness: f32, tint: Color) {
        self.emit(DrawCommand::QuadOutline {
            dest,
            thickness,
            tint,
        });
    }

    /// Emits an unscaled atlas sprite.
    pub fn sprite(&mut self, source: Rect, position: Vec2, tint: Color) {
        self.emit(DrawCommand::Sprite {
            source,
            position,
            tint,
        });
    }

    /// Emits an atlas sprite scaled into `dest`.
    pub fn sprite_stretched(&mut self, source: Rect, dest: Rect, tint: Color) {
        self.emit(DrawCommand::SpriteStretched { source, dest, tint });
    }

    /// Emits a text run.
    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, tint: Color) {
        self.emit(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            tint,
        });
    }

    /// Commands queued on `layer`, in emission order.
    #[must_use]
    pub fn commands(&self, layer: Layer) -> &[DrawCommand] {
        &self.layers[layer.index()]
    }

    /// Total number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Reports whether no command is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Replays every layer in order against `backend` and empties the queue.
    ///
    /// # Panics
    ///
    /// Panics when a pushed layer was never popped.
    pub fn flush<B>(&mut self, backend: &mut B)
    where
        B: DrawBackend + ?Sized,
    {
        for layer in &mut self.layers {
            for command in layer.drain(..) {
                replay(backend, command);
            }
        }

        assert!(
            self.stack.is_empty(),
            "unclosed render layers at flush: {:?} still pushed",
            self.stack
        );
    }
}

fn replay<B>(backend: &mut B, command: DrawCommand)
where
    B: DrawBackend + ?Sized,
{
    match command {
        DrawCommand::Quad { dest, tint } => backend.fill_rect(dest, tint),
        DrawCommand::QuadOutline {
            dest,
            thickness,
            tint,
        } => backend.outline_rect(dest, thickness, tint),
        DrawCommand::Sprite {
            source,
            position,
            tint,
        } => backend.blit(source, position, tint),
        DrawCommand::SpriteStretched { source, dest, tint } => {
            backend.blit_stretched(source, dest, tint)
        }
        DrawCommand::Text {
            text,
            position,
            size,
            tint,
        } => backend.draw_text(&text, position, size, tint),
    }
}

/// Input snapshot gathered by adapters before updating the simulation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Unscaled seconds since the previous frame.
    pub dt: f32,
    /// Held: move left.
    pub move_left: bool,
    /// Held: move right.
    pub move_right: bool,
    /// Pressed this frame: jump.
    pub jump: bool,
    /// Cursor position in world pixels, if the cursor is inside the window.
    pub cursor_world: Option<Vec2>,
    /// Pressed this frame: primary click.
    pub select: bool,
    /// Pressed this frame: raise the simulation speed multiplier by one.
    pub speed_up: bool,
    /// Pressed this frame: lower the simulation speed multiplier by one. Zero pauses.
    pub slow_down: bool,
    /// The player asked to close the game.
    pub quit: bool,
}

/// Queues filled by the game for a single frame.
#[derive(Clone, Debug, Default)]
pub struct FrameQueues {
    /// Commands in world pixels, drawn through the camera.
    pub world: RenderQueue,
    /// Commands in render-target pixels, drawn without the camera.
    pub screen: RenderQueue,
    /// World position the camera centres on.
    pub camera_target: Vec2,
}

impl FrameQueues {
    /// Creates empty queues with the camera at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Window size in physical pixels.
    pub window_size: (u32, u32),
    /// Size of the virtual render target the world is drawn into.
    pub render_size: Vec2,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        window_size: (u32, u32),
        render_size: Vec2,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if window_size.0 == 0 || window_size.1 == 0 {
            return Err(RenderingError::EmptyWindow {
                width: window_size.0,
                height: window_size.1,
            });
        }
        if !(render_size.x > 0.0 && render_size.y > 0.0) {
            return Err(RenderingError::EmptyRenderTarget {
                width: render_size.x,
                height: render_size.y,
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            window_size,
            render_size,
        })
    }

    /// Uniform scale from render-target pixels to window pixels.
    #[must_use]
    pub fn pixel_scale(&self) -> f32 {
        let horizontal = self.window_size.0 as f32 / self.render_size.x;
        let vertical = self.window_size.1 as f32 / self.render_size.y;
        horizontal.min(vertical)
    }
}

/// Rendering backend capable of driving the colony frame loop.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// `update_frame` receives the input captured by the adapter and fills the
    /// frame queues, which the backend then flushes. The loop ends when the
    /// window closes or the input requests `quit`.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(&FrameInput, &mut FrameQueues) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The window must have a positive size.
    #[error("window size must be positive (received {width}x{height})")]
    EmptyWindow {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The render target must have a positive size.
    #[error("render target size must be positive (received {width}x{height})")]
    EmptyRenderTarget {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32) -> DrawCommand {
        DrawCommand::Quad {
            dest: Rect::new(x, 0.0, 1.0, 1.0),
            tint: Color::WHITE,
        }
    }

    #[test]
    fn nested_layers_restore_the_previous_layer() {
        let mut queue = RenderQueue::new();
        queue.push_layer(Layer::Actors);
        queue.emit(quad_at(1.0));
        queue.push_layer(Layer::Hud);
        queue.emit(quad_at(2.0));
        queue.pop_layer();
        queue.emit(quad_at(3.0));
        queue.pop_layer();

        assert_eq!(queue.current_layer(), Layer::Base);
        assert_eq!(queue.commands(Layer::Actors), &[quad_at(1.0), quad_at(3.0)]);
        assert_eq!(queue.commands(Layer::Hud), &[quad_at(2.0)]);
        assert!(queue.commands(Layer::Base).is_empty());
    }

    #[test]
    fn flush_replays_layers_in_order_then_insertion_order() {
        let mut queue = RenderQueue::new();
        queue.with_layer(Layer::Hud, |queue| queue.emit(quad_at(5.0)));
        queue.with_layer(Layer::Background, |queue| {
            queue.emit(quad_at(1.0));
            queue.emit(quad_at(2.0));
        });
        queue.emit(quad_at(0.0));
        queue.with_layer(Layer::Flora, |queue| queue.emit(quad_at(3.0)));

        let mut backend = RecordingBackend::new();
        queue.flush(&mut backend);

        let order: Vec<f32> = backend
            .calls
            .iter()
            .map(|call| match call {
                DrawCommand::Quad { dest, .. } => dest.x,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(order, vec![0.0, 1.0, 2.0, 3.0, 5.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn second_flush_without_emissions_draws_nothing() {
        let mut queue = RenderQueue::new();
        queue.text("food 100", Vec2::new(4.0, 4.0), 16.0, Color::WHITE);
        queue.sprite(Rect::new(208.0, 0.0, 16.0, 16.0), Vec2::ZERO, Color::WHITE);

        let mut backend = RecordingBackend::new();
        queue.flush(&mut backend);
        assert_eq!(backend.calls.len(), 2);

        backend.clear();
        queue.flush(&mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn with_layer_returns_the_closure_result() {
        let mut queue = RenderQueue::new();
        let emitted = queue.with_layer(Layer::Debug, |queue| {
            queue.quad_outline(Rect::sized(16.0, 16.0), 1.0, Color::RED);
            queue.len()
        });

        assert_eq!(emitted, 1);
        assert_eq!(queue.current_layer(), Layer::Base);
        assert_eq!(queue.commands(Layer::Debug).len(), 1);
    }

    #[test]
    #[should_panic(expected = "layer stack underflow")]
    fn popping_an_empty_stack_panics() {
        let mut queue = RenderQueue::new();
        queue.pop_layer();
    }

    #[test]
    #[should_panic(expected = "unclosed render layers")]
    fn flushing_with_pushed_layers_panics() {
        let mut queue = RenderQueue::new();
        queue.push_layer(Layer::Actors);
        queue.flush(&mut RecordingBackend::new());
    }

    #[test]
    fn presentation_rejects_empty_targets() {
        let error = Presentation::new("colony", Color::BLACK, (0, 720), Vec2::new(640.0, 360.0))
            .expect_err("zero width window");
        assert_eq!(error, RenderingError::EmptyWindow { width: 0, height: 720 });

        let error = Presentation::new("colony", Color::BLACK, (1280, 720), Vec2::new(640.0, 0.0))
            .expect_err("zero height render target");
        assert!(matches!(error, RenderingError::EmptyRenderTarget { .. }));
    }

    #[test]
    fn pixel_scale_fits_the_render_target_into_the_window() {
        let presentation =
            Presentation::new("colony", Color::BLACK, (1280, 800), Vec2::new(640.0, 360.0))
                .expect("valid presentation");

        assert_eq!(presentation.pixel_scale(), 2.0);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);

        assert_eq!(color, Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(Color::GOLD.lighten(0.0), Color::GOLD);
    }
}
