use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use colony_core::Rect;
use colony_rendering::{Color, Presentation};
use colony_system_bootstrap::Scenario;
use glam::Vec2;
use serde::Deserialize;

/// Everything the binary reads from `colony.toml`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) window: WindowSettings,
    pub(crate) simulation: SimulationSettings,
    pub(crate) assets: AssetSettings,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowSettings {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) render_width: f32,
    pub(crate) render_height: f32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    /// Clear color as 8-bit RGB channels.
    pub(crate) clear_color: [u8; 3],
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: String::from("Colony"),
            width: 1280,
            height: 720,
            render_width: 640.0,
            render_height: 360.0,
            vsync: true,
            show_fps: false,
            clear_color: [64, 112, 52],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationSettings {
    pub(crate) seed: u64,
    pub(crate) scenario: String,
    pub(crate) flower_attempts: u32,
    pub(crate) workers: u32,
    pub(crate) starting_food: u32,
    pub(crate) worker_interval: f32,
    pub(crate) worker_speed: f32,
    pub(crate) predator_interval: f32,
    pub(crate) predator_speed: f32,
    pub(crate) defense_range: f32,
    pub(crate) max_time_scale: f32,
    pub(crate) show_colliders: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let behaviors = colony_system_behaviors::Config::default();
        let bootstrap = colony_system_bootstrap::Config::default();
        Self {
            seed: behaviors.seed,
            scenario: Scenario::default().name().to_owned(),
            flower_attempts: bootstrap.flower_attempts,
            workers: bootstrap.workers,
            starting_food: bootstrap.starting_food,
            worker_interval: behaviors.worker_interval,
            worker_speed: behaviors.worker_speed,
            predator_interval: behaviors.predator_interval,
            predator_speed: behaviors.predator_speed,
            defense_range: behaviors.defense_range,
            max_time_scale: behaviors.max_time_scale,
            show_colliders: behaviors.show_colliders,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AssetSettings {
    pub(crate) manifest: PathBuf,
    pub(crate) sprites: bool,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("assets/manifest.toml"),
            sprites: true,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the simulation cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        let size = self.render_size();
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            bail!(
                "render size must be positive, got {}x{}",
                self.window.render_width,
                self.window.render_height
            );
        }
        Ok(())
    }

    pub(crate) fn scenario(&self) -> Result<Scenario> {
        let name = &self.simulation.scenario;
        match Scenario::from_name(name) {
            Some(scenario) => Ok(scenario),
            None => {
                let known = Scenario::ALL
                    .iter()
                    .map(|scenario| scenario.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                bail!("unknown scenario `{name}`; expected one of {known}")
            }
        }
    }

    fn render_size(&self) -> Vec2 {
        Vec2::new(self.window.render_width, self.window.render_height)
    }

    /// World area centred on the origin with the render target's extent.
    fn play_area(&self) -> Rect {
        let render_size = self.render_size();
        Rect::from_position_size(render_size * -0.5, render_size)
    }

    pub(crate) fn presentation(&self) -> Result<Presentation> {
        let [red, green, blue] = self.window.clear_color;
        Presentation::new(
            self.window.title.clone(),
            Color::from_rgb_u8(red, green, blue),
            (self.window.width, self.window.height),
            self.render_size(),
        )
        .context("invalid window settings")
    }

    pub(crate) fn bootstrap_config(&self) -> colony_system_bootstrap::Config {
        colony_system_bootstrap::Config {
            play_area: self.play_area(),
            flower_attempts: self.simulation.flower_attempts,
            workers: self.simulation.workers,
            starting_food: self.simulation.starting_food,
            first_worker_delay: self.simulation.worker_interval,
            ..colony_system_bootstrap::Config::default()
        }
    }

    pub(crate) fn behaviors_config(&self) -> colony_system_behaviors::Config {
        colony_system_behaviors::Config {
            seed: self.simulation.seed,
            play_area: self.play_area(),
            render_size: self.render_size(),
            worker_interval: self.simulation.worker_interval,
            worker_speed: self.simulation.worker_speed,
            predator_interval: self.simulation.predator_interval,
            predator_speed: self.simulation.predator_speed,
            defense_range: self.simulation.defense_range,
            max_time_scale: self.simulation.max_time_scale,
            show_colliders: self.simulation.show_colliders,
            ..colony_system_behaviors::Config::default()
        }
    }
}
