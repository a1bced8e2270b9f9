use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::controller::handlers::{self, TimerCommand};
use crate::controller::poll_timer::PollTimer;
use crate::engine::slot::EngineSlot;
use crate::engine::{EngineEvent, EngineFactory, EngineOptions};
use crate::types::playback_state::PlaybackState;
use crate::types::track::Playlist;

/// Transport controls over one active track out of a fixed playlist.
///
/// Everything runs on the UI thread. Commands are forwarded to the engine right away; engine
/// confirmations and playhead sampling happen in [`AudioController::tick`].
pub struct AudioController<F: EngineFactory> {
    playlist: Playlist,
    factory: F,
    state: PlaybackState,
    slot: EngineSlot,
    timer: PollTimer,
    torn_down: bool,
}

impl<F: EngineFactory> AudioController<F> {
    /// Creates the controller with default state and loads the first track.
    pub fn mount(playlist: Playlist, factory: F, poll_interval: Duration) -> Self {
        let mut controller = AudioController {
            playlist,
            factory,
            state: PlaybackState::new(),
            slot: EngineSlot::new(),
            timer: PollTimer::new(poll_interval),
            torn_down: false,
        };
        info!(tracks = controller.playlist.len(), "mounting audio controller");
        let first = controller.state.current_track;
        controller.load_track(first);
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn has_engine(&self) -> bool {
        self.slot.is_live()
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_active()
    }

    /// Swaps the engine for one playing `playlist[index]`.
    ///
    /// The previous engine is stopped and unloaded before the new one is built. Track
    /// selection is not touched here; see [`AudioController::change_track`].
    pub fn load_track(&mut self, index: usize) {
        if self.slot.release() {
            // Releasing stops the old engine; its own Stop event is dropped with it.
            self.apply_event(&EngineEvent::Stop, None);
        }

        let Some(locator) = self.playlist.get(index).map(str::to_string) else {
            warn!(track = index, "no track at index, nothing loaded");
            return;
        };

        info!(track = index, %locator, "loading track");
        let options = EngineOptions {
            looping: self.state.looping,
            volume: self.state.volume,
            rate: self.state.rate,
        };
        match self.factory.create(&locator, options) {
            Ok(engine) => {
                self.slot.acquire(engine);
            }
            Err(err) => {
                let message = err.to_string();
                self.apply_event(&EngineEvent::LoadError { message }, None);
            }
        }
    }

    /// Requests play or pause. `is_playing` only changes once the engine confirms.
    pub fn toggle_play(&mut self) {
        let playing = self.state.is_playing;
        let Some(engine) = self.slot.get_mut() else {
            debug!("toggle_play without an engine");
            return;
        };
        if playing {
            engine.pause();
        } else {
            engine.play();
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.state.volume = volume;
        if let Some(engine) = self.slot.get_mut() {
            engine.set_volume(volume);
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.state.rate = rate;
        if let Some(engine) = self.slot.get_mut() {
            engine.set_rate(rate);
        }
    }

    /// Pseudo-pitch: the engine runs at `rate * pitch`, there is no real pitch shift.
    pub fn set_pitch(&mut self, pitch: f64) {
        self.state.pitch = pitch;
        let effective = self.state.rate * pitch;
        if let Some(engine) = self.slot.get_mut() {
            engine.set_rate(effective);
        }
    }

    pub fn toggle_loop(&mut self) {
        self.state.looping = !self.state.looping;
        let looping = self.state.looping;
        if let Some(engine) = self.slot.get_mut() {
            engine.set_loop(looping);
        }
    }

    pub fn change_track(&mut self, index: usize) {
        if index == self.state.current_track || !self.playlist.contains_index(index) {
            return;
        }
        self.state.current_track = index;
        self.load_track(index);
    }

    /// Seeks to `percent` of the track. Ignored while the duration is unknown.
    pub fn seek_to(&mut self, percent: f64) {
        if self.state.duration <= 0.0 {
            return;
        }
        let target = self.state.clamp_time(percent / 100.0 * self.state.duration);
        let Some(engine) = self.slot.get_mut() else {
            return;
        };
        engine.seek(target);
        self.state.current_time = target;
    }

    /// Drains engine events, then samples the playhead if the poll timer is due.
    pub fn tick(&mut self, now: Instant) {
        let events = match self.slot.get_mut() {
            Some(engine) => engine.poll_events(),
            None => Vec::new(),
        };
        for event in &events {
            self.apply_event(event, Some(now));
        }

        if !self.timer.fire(now) {
            return;
        }
        let sample = match self.slot.get() {
            Some(engine) if engine.is_playing() => Some(engine.position()),
            _ => None,
        };
        match sample {
            Some(position) => self.state.current_time = self.state.clamp_time(position),
            None => {
                debug!("engine not playing, stopping playhead polling");
                self.timer.cancel();
            }
        }
    }

    /// Time until the controller next needs a tick, if polling.
    pub fn next_poll_in(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Cancels polling and releases the engine. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timer.cancel();
        self.slot.release();
        info!("audio controller torn down");
    }

    fn apply_event(&mut self, event: &EngineEvent, now: Option<Instant>) {
        match event {
            EngineEvent::LoadError { message } => {
                error!(track = self.state.current_track, "error loading audio: {}", message);
            }
            EngineEvent::PlayError { message } => {
                error!(track = self.state.current_track, "error playing audio: {}", message);
            }
            other => debug!(event = ?other.kind(), "engine event"),
        }

        let transition = handlers::apply(&self.state, event);
        self.state = transition.state;
        match (transition.timer, now) {
            (TimerCommand::Start, Some(now)) => self.timer.start(now),
            (TimerCommand::Start, None) => self.timer.start(Instant::now()),
            (TimerCommand::Cancel, _) => self.timer.cancel(),
            (TimerCommand::Keep, _) => {}
        }
    }
}

impl<F: EngineFactory> Drop for AudioController<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
