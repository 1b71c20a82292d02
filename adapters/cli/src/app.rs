use std::fmt;

use anyhow::Result;
use colony_core::EntityKind;
use colony_rendering::{FrameInput, FrameQueues, RecordingBackend, RenderingBackend};
use colony_rendering_macroquad::MacroquadBackend;
use colony_system_behaviors::Behaviors;
use colony_system_bootstrap::{flowers_remaining, Bootstrap, Landmarks};
use colony_world::{query, Payload, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::settings::Settings;

/// Fixed timestep used when no window paces the loop.
pub(crate) const HEADLESS_DT: f32 = 1.0 / 60.0;

/// Seeded world plus the behaviors driving it.
pub(crate) struct Game {
    world: World,
    behaviors: Behaviors,
    landmarks: Landmarks,
}

impl Game {
    pub(crate) fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let scenario = settings.scenario()?;
        let behaviors = Behaviors::new(settings.behaviors_config());
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(settings.simulation.seed);
        let landmarks = Bootstrap.populate(
            &mut world,
            scenario,
            &settings.bootstrap_config(),
            &mut rng,
        );
        log::info!(
            "seeded the {} scenario with {} flowers",
            scenario.name(),
            landmarks.flowers
        );

        Ok(Self {
            world,
            behaviors,
            landmarks,
        })
    }

    /// Simulates one frame and fills the queues with what it looks like afterwards.
    pub(crate) fn frame(&mut self, input: &FrameInput, queues: &mut FrameQueues) {
        self.behaviors.update(&mut self.world, input);
        self.behaviors.render(&self.world, &mut queues.world);
        self.behaviors
            .render_hud(&self.world, &self.landmarks, &mut queues.screen);
        queues.camera_target = self.landmarks.camera_target(&self.world);
    }

    pub(crate) fn summary(&self, draw_calls: usize) -> Summary {
        let hub = self
            .landmarks
            .hub
            .and_then(|hub| query::entity(&self.world, hub))
            .and_then(|hub| match hub.payload {
                Payload::Hub(state) => Some(state),
                _ => None,
            });

        let clock = self.world.clock();
        Summary {
            frames: clock.frame,
            elapsed: clock.elapsed,
            food: hub.map(|state| state.food),
            workers_out: query::count_of_kind(&self.world, EntityKind::Worker),
            predators: query::count_of_kind(&self.world, EntityKind::Predator),
            flowers: flowers_remaining(&self.world),
            draw_calls,
        }
    }

    /// Input that clicks the hub, so a headless colony starts collecting.
    fn select_hub(&self) -> Option<FrameInput> {
        let hub = query::entity(&self.world, self.landmarks.hub?)?;
        Some(FrameInput {
            dt: HEADLESS_DT,
            cursor_world: Some(hub.bounds().center()),
            select: true,
            ..FrameInput::default()
        })
    }
}

/// State of the world after a headless run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) elapsed: f32,
    pub(crate) food: Option<u32>,
    pub(crate) workers_out: usize,
    pub(crate) predators: usize,
    pub(crate) flowers: usize,
    pub(crate) draw_calls: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames ({:.1}s): {} flowers left, {} workers out, {} predators",
            self.frames, self.elapsed, self.flowers, self.workers_out, self.predators
        )?;
        if let Some(food) = self.food {
            write!(f, ", {food} food")?;
        }
        write!(f, ", {} draw calls", self.draw_calls)
    }
}

/// Runs `frames` fixed steps, replaying every frame into a recorder.
pub(crate) fn run_headless(settings: &Settings, frames: u32) -> Result<Summary> {
    let mut game = Game::new(settings)?;
    let mut queues = FrameQueues::new();
    let mut backend = RecordingBackend::new();
    let mut draw_calls = 0;

    let idle = FrameInput {
        dt: HEADLESS_DT,
        ..FrameInput::default()
    };
    let first = game.select_hub().unwrap_or_else(|| idle.clone());

    for frame in 0..frames {
        let input = if frame == 0 { &first } else { &idle };
        game.frame(input, &mut queues);
        queues.world.flush(&mut backend);
        queues.screen.flush(&mut backend);
        draw_calls += backend.calls.len();
        backend.clear();
    }

    Ok(game.summary(draw_calls))
}

/// Opens a window and runs until it closes.
pub(crate) fn run_windowed(settings: &Settings) -> Result<()> {
    let presentation = settings.presentation()?;
    let mut game = Game::new(settings)?;

    let backend = MacroquadBackend::new()
        .with_vsync(settings.window.vsync)
        .with_show_fps(settings.window.show_fps)
        .with_sprite_loading(settings.assets.sprites)
        .with_manifest_path(settings.assets.manifest.clone());

    backend.run(presentation, move |input, queues| game.frame(input, queues))?;
    log::info!("window closed");
    Ok(())
}
