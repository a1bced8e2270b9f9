use tracing::debug;

use crate::engine::AudioEngine;

/// Owns at most one live engine instance.
///
/// An engine is only acquired into an empty slot, and whatever the slot holds is stopped and
/// unloaded exactly once, either by [`EngineSlot::release`] or when the slot is dropped.
pub struct EngineSlot {
    engine: Option<Box<dyn AudioEngine>>,
}

impl EngineSlot {
    pub fn new() -> Self {
        EngineSlot { engine: None }
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    pub fn get(&self) -> Option<&dyn AudioEngine> {
        self.engine.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn AudioEngine + 'static)> {
        self.engine.as_deref_mut()
    }

    /// Puts a new engine into an empty slot. Callers release the previous engine first.
    pub fn acquire(&mut self, engine: Box<dyn AudioEngine>) {
        debug_assert!(
            self.engine.is_none(),
            "engine acquired while another is still live"
        );
        debug!(engine = %engine.id(), locator = engine.locator(), "acquired engine");
        self.engine = Some(engine);
    }

    /// Stops and unloads the current engine. Returns `false` if the slot was already empty.
    pub fn release(&mut self) -> bool {
        match self.engine.take() {
            Some(mut engine) => {
                engine.stop();
                engine.unload();
                debug!(engine = %engine.id(), "released engine");
                true
            }
            None => false,
        }
    }
}

impl Drop for EngineSlot {
    fn drop(&mut self) {
        self.release();
    }
}
