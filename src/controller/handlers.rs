use crate::engine::{EngineEvent, EngineEventKind};
use crate::types::playback_state::PlaybackState;

/// What the poll timer should do after an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Cancel,
    Keep,
}

/// New state snapshot produced by an event handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PlaybackState,
    pub timer: TimerCommand,
}

impl Transition {
    fn new(state: PlaybackState, timer: TimerCommand) -> Self {
        Transition { state, timer }
    }
}

pub type Handler = fn(&PlaybackState, &EngineEvent) -> Transition;

/// The handler table, keyed by engine event kind.
pub fn handler_for(kind: EngineEventKind) -> Handler {
    match kind {
        EngineEventKind::Load => on_load,
        EngineEventKind::LoadError => on_load_error,
        EngineEventKind::Play => on_play,
        EngineEventKind::Pause => on_pause,
        EngineEventKind::Stop => on_stop,
        EngineEventKind::End => on_end,
        EngineEventKind::PlayError => on_play_error,
    }
}

/// Looks up the handler for `event` and runs it against `state`.
pub fn apply(state: &PlaybackState, event: &EngineEvent) -> Transition {
    handler_for(event.kind())(state, event)
}

fn on_load(state: &PlaybackState, event: &EngineEvent) -> Transition {
    let mut next = state.clone();
    if let EngineEvent::Load { duration } = event {
        next.duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        next.current_time = next.clamp_time(next.current_time);
    }
    Transition::new(next, TimerCommand::Keep)
}

fn on_load_error(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    Transition::new(
        PlaybackState {
            is_playing: false,
            duration: 0.0,
            current_time: 0.0,
            ..state.clone()
        },
        TimerCommand::Cancel,
    )
}

fn on_play(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    Transition::new(
        PlaybackState {
            is_playing: true,
            ..state.clone()
        },
        TimerCommand::Start,
    )
}

fn on_pause(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    Transition::new(
        PlaybackState {
            is_playing: false,
            ..state.clone()
        },
        TimerCommand::Cancel,
    )
}

fn on_stop(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    Transition::new(
        PlaybackState {
            is_playing: false,
            current_time: 0.0,
            ..state.clone()
        },
        TimerCommand::Cancel,
    )
}

fn on_end(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    if state.looping {
        return Transition::new(state.clone(), TimerCommand::Keep);
    }
    Transition::new(
        PlaybackState {
            is_playing: false,
            current_time: 0.0,
            ..state.clone()
        },
        TimerCommand::Cancel,
    )
}

// The engine may still think it is playing here; is_playing is left alone on purpose.
fn on_play_error(state: &PlaybackState, _event: &EngineEvent) -> Transition {
    Transition::new(state.clone(), TimerCommand::Keep)
}
