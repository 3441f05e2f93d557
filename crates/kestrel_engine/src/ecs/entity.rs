//! Entity record

use super::ComponentId;

/// A bag of components, at most one per subsystem kind
#[derive(Debug, Clone, Default)]
pub struct Entity {
    components: Vec<ComponentId>,
    registered: bool,
}

impl Entity {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attached components in attachment order
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// True once added to the game
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub(crate) fn push(&mut self, component: ComponentId) {
        self.components.push(component);
    }

    pub(crate) fn forget(&mut self, component: ComponentId) {
        self.components.retain(|attached| *attached != component);
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }
}
