#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the colony.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The world is drawn through a camera centred on the frame's camera target
//! and scaled uniformly so the virtual render size fits the window. Anything
//! outside that letterboxed region is painted over with black bars.

mod sprites;

use anyhow::{Context, Result};
use colony_core::Rect;
use colony_rendering::{
    Color, DrawBackend, FrameInput, FrameQueues, Presentation, RenderingBackend,
};
use glam::Vec2;
use macroquad::{
    camera::{set_camera, set_default_camera, Camera2D},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
    math::Rect as MacroquadRect,
    shapes::{draw_rectangle, draw_rectangle_lines},
};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use self::sprites::SpriteAtlas;

/// Share of the font size between the top of a line and its baseline.
const TEXT_BASELINE: f32 = 0.75;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: SpriteAtlas::default_manifest_path(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load the sprite atlas.
    ///
    /// Without an atlas every sprite is drawn as a tinted quad.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the location of the sprite manifest.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

/// Uniform scale and letterbox offset that fit the render size into the window.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Window pixels per render-target pixel.
    pub scale: f32,
    /// Window position of the render target's top-left corner.
    pub offset: Vec2,
    /// Window size in pixels.
    pub screen: Vec2,
    /// Virtual render size.
    pub render_size: Vec2,
}

impl Viewport {
    /// Fits `render_size` into `screen`, centring it on both axes.
    #[must_use]
    pub fn fit(screen: Vec2, render_size: Vec2) -> Self {
        let scale = (screen.x / render_size.x).min(screen.y / render_size.y);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let offset = ((screen - render_size * scale) * 0.5).max(Vec2::ZERO);

        Self {
            scale,
            offset,
            screen,
            render_size,
        }
    }

    /// Maps a window position to render-target pixels.
    #[must_use]
    pub fn to_render(&self, point: Vec2) -> Vec2 {
        (point - self.offset) / self.scale
    }

    /// Maps a window position into the world seen by a camera centred on `camera_target`.
    #[must_use]
    pub fn to_world(&self, point: Vec2, camera_target: Vec2) -> Vec2 {
        self.to_render(point) - self.render_size * 0.5 + camera_target
    }

    /// Reports whether a window position lies inside the letterboxed render area.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let render = self.to_render(point);
        render.cmpge(Vec2::ZERO).all() && render.cmplt(self.render_size).all()
    }

    /// World region covering the whole window.
    fn visible_world(&self, camera_target: Vec2) -> Rect {
        Rect::from_position_size(
            self.to_world(Vec2::ZERO, camera_target),
            self.screen / self.scale,
        )
    }

    /// Render-target region covering the whole window.
    fn visible_render(&self) -> Rect {
        Rect::from_position_size(self.to_render(Vec2::ZERO), self.screen / self.scale)
    }

    /// Window regions outside the render area.
    fn bars(&self) -> [Rect; 4] {
        let inner = self.render_size * self.scale;
        [
            Rect::new(0.0, 0.0, self.screen.x, self.offset.y),
            Rect::new(
                0.0,
                self.offset.y + inner.y,
                self.screen.x,
                self.screen.y - self.offset.y - inner.y,
            ),
            Rect::new(0.0, 0.0, self.offset.x, self.screen.y),
            Rect::new(
                self.offset.x + inner.x,
                0.0,
                self.screen.x - self.offset.x - inner.x,
                self.screen.y,
            ),
        ]
    }
}

/// Draw backend issuing macroquad immediate-mode calls.
struct MacroquadCanvas<'a> {
    atlas: Option<&'a SpriteAtlas>,
}

impl DrawBackend for MacroquadCanvas<'_> {
    fn fill_rect(&mut self, dest: Rect, tint: Color) {
        draw_rectangle(
            dest.x,
            dest.y,
            dest.width,
            dest.height,
            to_macroquad_color(tint),
        );
    }

    fn outline_rect(&mut self, dest: Rect, thickness: f32, tint: Color) {
        draw_rectangle_lines(
            dest.x,
            dest.y,
            dest.width,
            dest.height,
            thickness,
            to_macroquad_color(tint),
        );
    }

    fn blit(&mut self, source: Rect, position: Vec2, tint: Color) {
        let dest = Rect::from_position_size(position, Vec2::new(source.width, source.height));
        self.blit_stretched(source, dest, tint);
    }

    fn blit_stretched(&mut self, source: Rect, dest: Rect, tint: Color) {
        match self.atlas {
            Some(atlas) => atlas.draw(source, dest, tint),
            None => self.fill_rect(dest, tint),
        }
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, tint: Color) {
        let _ = macroquad::text::draw_text(
            text,
            position.x,
            position.y + size * TEXT_BASELINE,
            size,
            to_macroquad_color(tint),
        );
    }
}

fn display_camera(region: Rect) -> Camera2D {
    Camera2D::from_display_rect(MacroquadRect::new(
        region.x,
        region.y,
        region.width,
        region.height,
    ))
}

fn poll_input(viewport: &Viewport, camera_target: Vec2) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let cursor = Vec2::new(cursor_x, cursor_y);
    let cursor_world = viewport
        .contains(cursor)
        .then(|| viewport.to_world(cursor, camera_target));

    FrameInput {
        dt: macroquad::time::get_frame_time().max(0.0),
        move_left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        move_right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        jump: is_key_pressed(KeyCode::Space),
        cursor_world,
        select: is_mouse_button_pressed(MouseButton::Left),
        speed_up: is_key_pressed(KeyCode::K),
        slow_down: is_key_pressed(KeyCode::J),
        quit: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
    }
}

/// Frame timings gathered for the `show_fps` log line.
#[derive(Debug, Default)]
struct FrameStats {
    wall: Duration,
    frames: u32,
    simulation: Duration,
    render: Duration,
}

/// Averages over the last reporting period.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    simulation: Duration,
    render: Duration,
}

impl FrameStats {
    const PERIOD: Duration = Duration::from_secs(1);

    /// Adds one frame. Once a period of wall time has passed the averages
    /// are returned and the counters start over.
    fn record(
        &mut self,
        dt: Duration,
        simulation: Duration,
        render: Duration,
    ) -> Option<FrameReport> {
        self.wall += dt;
        self.frames += 1;
        self.simulation += simulation;
        self.render += render;
        if self.wall < Self::PERIOD {
            return None;
        }

        let report = FrameReport {
            fps: self.frames as f32 / self.wall.as_secs_f32(),
            simulation: self.simulation / self.frames,
            render: self.render / self.frames,
        };
        *self = Self::default();
        Some(report)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(&FrameInput, &mut FrameQueues) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        log::info!(
            "opening {}x{} window at {:.2} pixels per render pixel",
            presentation.window_size.0,
            presentation.window_size.1,
            presentation.pixel_scale()
        );

        let Presentation {
            window_title,
            clear_color,
            window_size,
            render_size,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_size.0).context("window width out of range")?,
            window_height: i32::try_from(window_size.1).context("window height out of range")?,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = if load_sprites {
                SpriteAtlas::load_or_placeholders(&manifest_path)
            } else {
                None
            };

            let background = to_macroquad_color(clear_color);
            let letterbox = macroquad::color::BLACK;
            let mut queues = FrameQueues::new();
            let mut stats = FrameStats::default();

            loop {
                let viewport = Viewport::fit(
                    Vec2::new(
                        macroquad::window::screen_width(),
                        macroquad::window::screen_height(),
                    ),
                    render_size,
                );
                let input = poll_input(&viewport, queues.camera_target);
                if input.quit {
                    log::info!("quit requested");
                    break;
                }

                let simulation_start = Instant::now();
                update_frame(&input, &mut queues);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                let mut canvas = MacroquadCanvas {
                    atlas: sprite_atlas.as_ref(),
                };

                macroquad::window::clear_background(background);
                set_camera(&display_camera(
                    viewport.visible_world(queues.camera_target),
                ));
                queues.world.flush(&mut canvas);

                set_camera(&display_camera(viewport.visible_render()));
                queues.screen.flush(&mut canvas);

                set_default_camera();
                for bar in viewport.bars() {
                    if !bar.is_empty() {
                        draw_rectangle(bar.x, bar.y, bar.width, bar.height, letterbox);
                    }
                }
                let render = render_start.elapsed();

                if show_fps {
                    let dt = Duration::from_secs_f32(input.dt);
                    if let Some(report) = stats.record(dt, simulation, render) {
                        log::info!(
                            "{:.1} fps | simulation {:.2}ms | render {:.2}ms",
                            report.fps,
                            report.simulation.as_secs_f64() * 1_000.0,
                            report.render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
