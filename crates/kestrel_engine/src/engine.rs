//! Core engine implementation
//!
//! [`Game`] is the explicit engine context: it owns the window, the graphics
//! backend, the registry of entities, components and subsystems, and the
//! cached input. Any number of games may exist; only the GLFW window backend
//! limits a process to one open window.

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, EngineConfig};
use crate::ecs::registry::FrameContext;
use crate::ecs::{
    Component, ComponentBehavior, ComponentId, EcsError, EntityId, Registry, Subsystem, SubsystemId,
};
use crate::foundation::collections::ArrayError;
use crate::foundation::math::utils;
use crate::foundation::time::Timer;
use crate::input::InputState;
use crate::physics::PhysicsError;
use crate::render::{GraphicsBackend, GraphicsError, MeshError, WindowBackend, WindowError};

/// Lifecycle of a [`Game`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Accepting frames
    Running,
    /// Main loop has ended or a close was requested
    Closing,
    /// Torn down
    Stopped,
}

/// Main engine struct
///
/// Subsystems update in registration order every frame, so a physics
/// subsystem registered before the render subsystem is drawn without lag.
pub struct Game {
    config: EngineConfig,
    window: Box<dyn WindowBackend>,
    graphics: Box<dyn GraphicsBackend>,
    registry: Registry,
    input: InputState,
    timer: Timer,
    state: GameState,
    frame_count: u64,
}

impl Game {
    /// Create a game over an open window and a graphics backend
    pub fn new(
        config: EngineConfig,
        window: Box<dyn WindowBackend>,
        graphics: Box<dyn GraphicsBackend>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (width, height) = window.size();
        log::info!("Initializing game '{}' ({}x{})", config.window.title, width, height);

        Ok(Self {
            config,
            window,
            graphics,
            registry: Registry::new(),
            input: InputState::new(),
            timer: Timer::new(),
            state: GameState::Running,
            frame_count: 0,
        })
    }

    /// Append a subsystem to the update order
    pub fn add_subsystem(&mut self, subsystem: Subsystem) -> Result<SubsystemId, EngineError> {
        Ok(self.registry.add_subsystem(subsystem)?)
    }

    /// Create an empty, unregistered entity
    pub fn create_entity(&mut self) -> EntityId {
        self.registry.create_entity()
    }

    /// Hand a detached component to the game
    pub fn create_component(&mut self, component: Component) -> ComponentId {
        self.registry.create_component(component)
    }

    /// Attach `component` to `entity`
    ///
    /// A component may be attached once, and an entity holds at most one
    /// component per subsystem kind. If the entity is already registered the
    /// component is claimed by its subsystem immediately.
    pub fn attach_component(&mut self, component: ComponentId, entity: EntityId) -> Result<(), EngineError> {
        self.context().attach_component(component, entity)
    }

    /// Create `component` and attach it to `entity` in one go
    ///
    /// On failure the component is dropped again.
    pub fn spawn_component(&mut self, entity: EntityId, component: Component) -> Result<ComponentId, EngineError> {
        let id = self.create_component(component);
        if let Err(err) = self.attach_component(id, entity) {
            self.registry.remove_component(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Register `entity`, handing each attached component to its subsystem
    ///
    /// Fails without changing anything if a component's subsystem is missing
    /// or a subsystem rejects a component; claims already made are released.
    pub fn add_entity(&mut self, entity: EntityId) -> Result<(), EngineError> {
        self.context().register_entity(entity)
    }

    /// Destroy `entity` and every component attached to it
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<(), EngineError> {
        self.context().destroy_entity(entity)
    }

    /// Destroy one component, detaching it from its entity and subsystem
    pub fn destroy_component(&mut self, component: ComponentId) -> Result<(), EngineError> {
        self.context().destroy_component(component)
    }

    /// Run one frame: poll input, then every subsystem in registration order
    pub fn frame(&mut self, dt: f32) -> Result<(), EngineError> {
        let keyboard = self.window.poll_keyboard();
        let mouse = self.window.poll_mouse();
        self.input.update(keyboard, mouse);

        let mut ctx = FrameContext::new(&mut self.registry, self.graphics.as_mut(), &self.input);
        for index in 0..ctx.registry.subsystem_count() {
            ctx.run_subsystem(SubsystemId(index), dt)?;
        }

        self.frame_count += 1;
        Ok(())
    }

    /// Drive frames until the window closes
    ///
    /// The frame delta is clamped to the configured maximum. While the window
    /// is unfocused no frame runs; the loop sleeps and presents until focus
    /// returns.
    pub fn run(&mut self) -> Result<(), EngineError> {
        log::info!("Starting main loop...");
        self.timer.reset();

        while self.state == GameState::Running && self.window.is_open() {
            let dt = utils::clamp(self.timer.tick(), 0.0, self.config.frame.max_frame_delta);
            self.frame(dt)?;
            self.window.present_frame();

            if !self.window.is_focused() {
                self.wait_for_focus();
            }
        }

        self.state = GameState::Closing;
        log::info!("Main loop finished after {} frames", self.frame_count);
        Ok(())
    }

    /// Ask the main loop to stop after the current frame
    pub fn close(&mut self) {
        log::info!("Game close requested");
        self.state = GameState::Closing;
        self.window.close();
    }

    /// Destroy every entity, drop the subsystems and close the window
    ///
    /// Every entity is torn down even if a cleanup fails; the first failure is
    /// returned.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        log::info!("Shutting down game...");
        let entities: Vec<EntityId> = self.registry.entity_ids().collect();

        let mut outcome = Ok(());
        for entity in entities {
            let destroyed = self.destroy_entity(entity);
            if outcome.is_ok() {
                outcome = destroyed;
            }
        }

        self.registry.clear_subsystems();
        self.window.close();
        self.state = GameState::Stopped;
        log::info!("Game shutdown complete");
        outcome
    }

    /// Current lifecycle state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Configuration the game was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Input sampled at the start of the latest frame
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Entities, components and subsystems
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Graphics backend
    pub fn graphics(&self) -> &dyn GraphicsBackend {
        self.graphics.as_ref()
    }

    /// Graphics backend, mutably
    pub fn graphics_mut(&mut self) -> &mut dyn GraphicsBackend {
        self.graphics.as_mut()
    }

    /// Window backend
    pub fn window(&self) -> &dyn WindowBackend {
        self.window.as_ref()
    }

    /// Behavior of `component` downcast to `T`
    pub fn component<T: ComponentBehavior>(&self, component: ComponentId) -> Option<&T> {
        self.registry.behavior::<T>(component)
    }

    fn context(&mut self) -> FrameContext<'_> {
        FrameContext::new(&mut self.registry, self.graphics.as_mut(), &self.input)
    }

    fn wait_for_focus(&mut self) {
        log::info!("Window lost focus, pausing");
        let nap = Duration::from_millis(self.config.frame.unfocused_sleep_ms);

        while self.window.is_open() && !self.window.is_focused() {
            self.window.sleep(nap);
            self.window.present_frame();
        }

        self.timer.reset();
        log::info!("Window focused again, resuming");
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Composition or lookup failure
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Physics failure
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Graphics backend failure
    #[error("Graphics error: {0}")]
    Graphics(#[from] GraphicsError),

    /// Window failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid mesh data
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] ArrayError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessWindow, RecordingBackend};

    fn headless_game(window: HeadlessWindow) -> Game {
        Game::new(
            EngineConfig::default(),
            Box::new(window),
            Box::new(RecordingBackend::new()),
        )
        .unwrap()
    }

    fn headless(game: &Game) -> &HeadlessWindow {
        game.window().as_any().downcast_ref::<HeadlessWindow>().unwrap()
    }

    #[test]
    fn test_run_stops_when_window_closes() {
        let mut game = headless_game(HeadlessWindow::new(320, 240).with_frame_budget(3));
        game.run().unwrap();

        assert_eq!(game.frame_count(), 3);
        assert_eq!(game.state(), GameState::Closing);
        assert_eq!(headless(&game).presents(), 3);
    }

    #[test]
    fn test_unfocused_window_pauses_frames() {
        let mut game = headless_game(
            HeadlessWindow::new(320, 240)
                .with_frame_budget(3)
                .with_focus_loss(1, 2),
        );
        game.run().unwrap();

        let window = headless(&game);
        assert_eq!(game.frame_count(), 3);
        assert_eq!(window.presents(), 5);
        assert_eq!(window.slept(), Duration::from_millis(20));
    }

    #[test]
    fn test_close_stops_run_before_first_frame() {
        let mut game = headless_game(HeadlessWindow::new(320, 240));
        game.close();
        game.run().unwrap();

        assert_eq!(game.frame_count(), 0);
        assert!(!game.window().is_open());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.physics.time_step = 0.0;
        let result = Game::new(
            config,
            Box::new(HeadlessWindow::new(1, 1)),
            Box::new(RecordingBackend::new()),
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_shutdown_destroys_entities() {
        let mut game = headless_game(HeadlessWindow::new(1, 1));
        let entity = game.create_entity();
        game.add_entity(entity).unwrap();
        assert_eq!(game.registry().entity_count(), 1);

        game.shutdown().unwrap();
    }
}
