//! Scenario tests for the ECS runtime driven through [`crate::engine::Game`]

mod lifecycle;
mod ordering;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::ecs::registry::FrameContext;
use crate::ecs::{ComponentBehavior, ComponentId, SubsystemHooks};
use crate::engine::{EngineError, Game};
use crate::render::{HeadlessWindow, RecordingBackend};

/// Shared event log
pub(super) type Trace = Rc<RefCell<Vec<String>>>;

pub(super) fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

pub(super) fn game() -> Game {
    Game::new(
        EngineConfig::default(),
        Box::new(HeadlessWindow::new(320, 240)),
        Box::new(RecordingBackend::new()),
    )
    .unwrap()
}

pub(super) fn recorder(game: &Game) -> &RecordingBackend {
    game.graphics().as_any().downcast_ref::<RecordingBackend>().unwrap()
}

/// Subsystem hooks that log every call
pub(super) struct TraceHooks {
    pub label: &'static str,
    pub trace: Trace,
}

impl SubsystemHooks for TraceHooks {
    fn before_frame(&mut self, _ctx: &mut FrameContext<'_>, _dt: f32) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:before", self.label));
        Ok(())
    }

    fn after_frame(&mut self, _ctx: &mut FrameContext<'_>, _dt: f32) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:after", self.label));
        Ok(())
    }

    fn on_component_added(&mut self, _ctx: &mut FrameContext<'_>, _component: ComponentId) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:added", self.label));
        Ok(())
    }

    fn on_component_removed(&mut self, _ctx: &mut FrameContext<'_>, _component: ComponentId) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:removed", self.label));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Component behavior that logs updates and cleanup
pub(super) struct TraceBehavior {
    pub label: String,
    pub trace: Trace,
}

impl TraceBehavior {
    pub fn new(label: impl Into<String>, trace: &Trace) -> Self {
        Self {
            label: label.into(),
            trace: Rc::clone(trace),
        }
    }
}

impl ComponentBehavior for TraceBehavior {
    fn update(&mut self, _ctx: &mut FrameContext<'_>, _id: ComponentId, _dt: f32) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:update", self.label));
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut FrameContext<'_>, _id: ComponentId) -> Result<(), EngineError> {
        self.trace.borrow_mut().push(format!("{}:cleanup", self.label));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
