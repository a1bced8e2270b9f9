use crate::ops::time_format::format_time;

pub const DEFAULT_VOLUME: f64 = 0.7;
pub const DEFAULT_RATE: f64 = 1.0;
pub const DEFAULT_PITCH: f64 = 1.0;

/// Local mirror of what the audio engine is doing.
///
/// Commands mutate the tunables (`volume`, `rate`, `pitch`, `looping`) directly. `is_playing`
/// only changes when the engine confirms a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub volume: f64,
    pub rate: f64,
    pub pitch: f64,
    pub looping: bool,
    pub current_track: usize,
    pub duration: f64,
    pub current_time: f64,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            is_playing: false,
            volume: DEFAULT_VOLUME,
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            looping: true,
            current_track: 0,
            duration: 0.0,
            current_time: 0.0,
        }
    }

    /// Playhead position as a percentage of the track, 0 when the duration is unknown.
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration) * 100.0
        } else {
            0.0
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_playing { "PLAYING" } else { "PAUSED" }
    }

    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round().max(0.0) as u32
    }

    /// `current / total`, both as `m:ss`.
    pub fn time_display(&self) -> (String, String) {
        (format_time(self.current_time), format_time(self.duration))
    }

    /// Clamp a playhead sample so it never runs past a known duration.
    pub fn clamp_time(&self, time: f64) -> f64 {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            time.min(self.duration)
        } else {
            time
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
