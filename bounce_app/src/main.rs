//! Bounce demo application
//!
//! Wires a thruster subsystem, the physics subsystem and the render subsystem
//! together and runs the main loop. Without the `windowed` feature the loop
//! runs against a headless window for a fixed number of frames with Space held
//! for the first second; with it, a GLFW window supplies real input. Drawing
//! always goes through the recording graphics backend.

mod scene;
mod thruster;

use std::process::ExitCode;

use kestrel_engine::config::WindowConfig;
use kestrel_engine::foundation::logging;
use kestrel_engine::prelude::*;
use thiserror::Error;

use crate::scene::Scene;
use crate::thruster::Thruster;

const CONFIG_PATH: &str = "bounce.toml";

#[cfg(not(feature = "windowed"))]
const HEADLESS_FRAMES: u64 = 300;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] kestrel_engine::config::ConfigError),

    #[cfg(feature = "windowed")]
    #[error(transparent)]
    Window(#[from] kestrel_engine::render::WindowError),
}

#[cfg(feature = "windowed")]
fn open_window(config: &WindowConfig) -> Result<Box<dyn WindowBackend>, AppError> {
    let window = kestrel_engine::render::GlfwWindow::new(&config.title, config.width, config.height)?;
    Ok(Box::new(window))
}

#[cfg(not(feature = "windowed"))]
fn open_window(config: &WindowConfig) -> Result<Box<dyn WindowBackend>, AppError> {
    use kestrel_engine::input::KeyboardState;

    let thrust = std::iter::repeat_with(|| KeyboardState::with_pressed([KeyCode::Space])).take(60);
    let coast = std::iter::once(KeyboardState::default());
    let window = HeadlessWindow::new(config.width, config.height)
        .with_frame_budget(HEADLESS_FRAMES)
        .with_keyboard_script(thrust.chain(coast));
    Ok(Box::new(window))
}

fn report(game: &Game, scene: &Scene) {
    let registry = game.registry();
    let entities = std::iter::once(("floor", scene.floor))
        .chain(scene.balls.iter().map(|ball| ("ball", *ball)))
        .chain(std::iter::once(("ship", scene.ship)));

    for (label, entity) in entities {
        match PhysicsSubsystem::body_of(registry, entity) {
            Ok(body) => log::info!("{} {:?} at {:?}", label, entity, body.position()),
            Err(err) => log::warn!("{} {:?} has no body: {}", label, entity, err),
        }
    }

    if let Some(thruster) = registry
        .get_component(scene.ship, thruster::THRUSTERS)
        .and_then(|id| game.component::<Thruster>(id))
    {
        log::info!("Ship burned its thruster for {:.2}s", thruster.burn_time());
    }
}

fn run() -> Result<(), AppError> {
    let config = EngineConfig::load_or_default(CONFIG_PATH)?;
    let window = open_window(&config.window)?;
    let mut game = Game::new(config, window, Box::new(RecordingBackend::new()))?;

    let scene = scene::build(&mut game)?;
    game.run()?;
    report(&game, &scene);

    game.shutdown()?;
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    log::info!("Starting bounce demo");

    match run() {
        Ok(()) => {
            log::info!("Bounce demo finished successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Bounce demo failed: {}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
