pub mod gst_engine;
#[cfg(test)]
pub mod mock;
pub mod slot;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build audio pipeline: {0}")]
    Pipeline(String),
    #[error("invalid track locator `{locator}`: {reason}")]
    InvalidLocator { locator: String, reason: String },
}

/// Settings a fresh engine instance starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub looping: bool,
    pub volume: f64,
    pub rate: f64,
}

/// Asynchronous notifications coming back from an engine instance.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Load { duration: f64 },
    LoadError { message: String },
    Play,
    Pause,
    Stop,
    End,
    PlayError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEventKind {
    Load,
    LoadError,
    Play,
    Pause,
    Stop,
    End,
    PlayError,
}

impl EngineEvent {
    pub fn kind(&self) -> EngineEventKind {
        match self {
            EngineEvent::Load { .. } => EngineEventKind::Load,
            EngineEvent::LoadError { .. } => EngineEventKind::LoadError,
            EngineEvent::Play => EngineEventKind::Play,
            EngineEvent::Pause => EngineEventKind::Pause,
            EngineEvent::Stop => EngineEventKind::Stop,
            EngineEvent::End => EngineEventKind::End,
            EngineEvent::PlayError { .. } => EngineEventKind::PlayError,
        }
    }
}

/// One loaded, playable audio resource.
///
/// Transport calls are requests. The engine reports what actually happened through
/// [`AudioEngine::poll_events`], which the controller drains on every tick.
pub trait AudioEngine {
    fn id(&self) -> Uuid;
    fn locator(&self) -> &str;

    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Releases the underlying resource. Calling it more than once is a no-op.
    fn unload(&mut self);

    fn set_volume(&mut self, volume: f64);
    fn set_rate(&mut self, rate: f64);
    fn set_loop(&mut self, looping: bool);
    fn seek(&mut self, seconds: f64);

    /// Current playhead in seconds.
    fn position(&self) -> f64;
    fn is_playing(&self) -> bool;

    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

pub trait EngineFactory {
    fn create(
        &mut self,
        locator: &str,
        options: EngineOptions,
    ) -> Result<Box<dyn AudioEngine>, EngineError>;
}
