#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the colony.

mod app;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colony_system_bootstrap::Bootstrap;
use colony_world::World;

use self::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "colony", version, about = "Flower-harvesting colony and platformer sandbox")]
struct Args {
    /// Settings file; a missing file means defaults.
    #[arg(long, default_value = "colony.toml")]
    config: PathBuf,

    /// Starting layout: `colony` or `platformer`.
    #[arg(long)]
    scenario: Option<String>,

    /// Run without a window, replaying frames into a recorder.
    #[arg(long)]
    headless: bool,

    /// Number of fixed steps simulated by a headless run.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seed for scenario layout and simulation.
    #[arg(long)]
    seed: Option<u64>,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Render as fast as possible instead of syncing to the display.
    #[arg(long)]
    no_vsync: bool,

    /// Draw placeholder quads instead of loading the sprite atlas.
    #[arg(long)]
    no_sprites: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(scenario) = &self.scenario {
            settings.simulation.scenario = scenario.clone();
        }
        if let Some(seed) = self.seed {
            settings.simulation.seed = seed;
        }
        if self.show_fps {
            settings.window.show_fps = true;
        }
        if self.no_vsync {
            settings.window.vsync = false;
        }
        if self.no_sprites {
            settings.assets.sprites = false;
        }
    }
}

/// Entry point for the colony command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load(&args.config)?;
    args.apply(&mut settings);

    log::info!("{}", Bootstrap.welcome_banner(&World::new()));

    if args.headless {
        let summary = app::run_headless(&settings, args.frames)?;
        log::info!("{summary}");
        Ok(())
    } else {
        app::run_windowed(&settings)
    }
}
