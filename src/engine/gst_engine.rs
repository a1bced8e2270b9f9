use gst::prelude::*;
use gstreamer as gst;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::{AudioEngine, EngineError, EngineEvent, EngineFactory, EngineOptions};

/// Turns a track locator into something `playbin` accepts.
///
/// Anything with a scheme passes through untouched. Everything else is treated as a local path
/// and has to exist.
pub fn locator_to_uri(locator: &str) -> Result<String, EngineError> {
    if locator.contains("://") {
        return Ok(locator.to_string());
    }
    let path = std::fs::canonicalize(locator).map_err(|err| EngineError::InvalidLocator {
        locator: locator.to_string(),
        reason: err.to_string(),
    })?;
    gst::glib::filename_to_uri(&path, None)
        .map(|uri| uri.to_string())
        .map_err(|err| EngineError::InvalidLocator {
            locator: locator.to_string(),
            reason: err.to_string(),
        })
}

fn clock_to_secs(time: gst::ClockTime) -> f64 {
    time.nseconds() as f64 / 1_000_000_000.0
}

fn secs_to_clock(seconds: f64) -> gst::ClockTime {
    gst::ClockTime::from_nseconds((seconds.max(0.0) * 1_000_000_000.0) as u64)
}

/// Pipeline bookkeeping the bus translation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct BusFlags {
    loaded: bool,
    looping: bool,
    // Set when we pause the pipeline ourselves (stop, end of stream) so no Pause is reported.
    quiet_pause: bool,
}

/// The parts of a bus message the engine cares about.
#[derive(Debug, Clone, PartialEq)]
enum BusMessage {
    AsyncDone { duration: f64 },
    Error { message: String },
    Eos,
    PlaybinState { old: gst::State, current: gst::State },
    Other,
}

/// Pipeline work to do after a message has been translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Followup {
    Nothing,
    ApplyRate,
    Shutdown,
    Rewind,
    PauseAndRewind,
}

#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    event: Option<EngineEvent>,
    flags: BusFlags,
    followup: Followup,
}

fn classify(flags: BusFlags, message: &BusMessage) -> Outcome {
    let mut next = flags;
    let (event, followup) = match message {
        BusMessage::AsyncDone { duration } if !flags.loaded => {
            next.loaded = true;
            let event = EngineEvent::Load {
                duration: *duration,
            };
            (Some(event), Followup::ApplyRate)
        }
        BusMessage::AsyncDone { .. } => (None, Followup::Nothing),
        BusMessage::Error { message } if flags.loaded => {
            let event = EngineEvent::PlayError {
                message: message.clone(),
            };
            (Some(event), Followup::Nothing)
        }
        BusMessage::Error { message } => {
            let event = EngineEvent::LoadError {
                message: message.clone(),
            };
            (Some(event), Followup::Shutdown)
        }
        BusMessage::Eos if flags.looping => (Some(EngineEvent::End), Followup::Rewind),
        BusMessage::Eos => {
            next.quiet_pause = true;
            (Some(EngineEvent::End), Followup::PauseAndRewind)
        }
        BusMessage::PlaybinState { old, current } => match (*old, *current) {
            (old, gst::State::Playing) if old != gst::State::Playing => {
                (Some(EngineEvent::Play), Followup::Nothing)
            }
            (gst::State::Playing, gst::State::Paused) if flags.quiet_pause => {
                next.quiet_pause = false;
                (None, Followup::Nothing)
            }
            (gst::State::Playing, gst::State::Paused) => {
                (Some(EngineEvent::Pause), Followup::Nothing)
            }
            _ => (None, Followup::Nothing),
        },
        BusMessage::Other => (None, Followup::Nothing),
    };
    Outcome {
        event,
        flags: next,
        followup,
    }
}

/// Flags after `stop()`: a stop out of `Playing` must not be reported as a pause.
fn stop_flags(flags: BusFlags, current: gst::State) -> BusFlags {
    BusFlags {
        quiet_pause: flags.quiet_pause || current == gst::State::Playing,
        ..flags
    }
}

/// One `playbin` pipeline playing a single track.
///
/// The pipeline prerolls in `Paused` as soon as it is built; bus messages are turned into
/// [`EngineEvent`]s when the controller polls.
pub struct GstEngine {
    id: Uuid,
    locator: String,
    playbin: gst::Element,
    bus: gst::Bus,
    pending: Vec<EngineEvent>,
    flags: BusFlags,
    rate: f64,
    unloaded: bool,
}

impl GstEngine {
    pub fn new(locator: &str, options: EngineOptions) -> Result<Self, EngineError> {
        let id = Uuid::new_v4();
        let playbin = gst::ElementFactory::make("playbin")
            .name(format!("track-{}", id))
            .build()
            .map_err(|err| EngineError::Pipeline(err.to_string()))?;
        let bus = playbin
            .bus()
            .ok_or_else(|| EngineError::Pipeline("playbin has no bus".to_string()))?;
        playbin.set_property("volume", options.volume.clamp(0.0, 1.0));

        let mut engine = GstEngine {
            id,
            locator: locator.to_string(),
            playbin,
            bus,
            pending: Vec::new(),
            flags: BusFlags {
                looping: options.looping,
                ..BusFlags::default()
            },
            rate: options.rate,
            unloaded: false,
        };

        match locator_to_uri(locator) {
            Ok(uri) => {
                info!(engine = %id, %uri, "loading track");
                engine.playbin.set_property("uri", uri.as_str());
                if let Err(err) = engine.playbin.set_state(gst::State::Paused) {
                    engine.fail_load(err.to_string());
                }
            }
            Err(err) => engine.fail_load(err.to_string()),
        }

        Ok(engine)
    }

    fn fail_load(&mut self, message: String) {
        warn!(engine = %self.id, locator = %self.locator, "track failed to load: {}", message);
        self.playbin.set_state(gst::State::Null).ok();
        self.pending.push(EngineEvent::LoadError { message });
    }

    fn query_duration(&self) -> f64 {
        self.playbin
            .query_duration::<gst::ClockTime>()
            .map(clock_to_secs)
            .unwrap_or(0.0)
    }

    /// Flushing seek that also carries the current rate, since a plain seek resets it to 1.
    fn seek_at_rate(&self, position: gst::ClockTime) {
        if self.rate <= 0.0 || !self.rate.is_finite() {
            warn!(engine = %self.id, rate = self.rate, "ignoring unusable playback rate");
            return;
        }
        let result = self.playbin.seek(
            self.rate,
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            position,
            gst::SeekType::End,
            gst::ClockTime::ZERO,
        );
        if let Err(err) = result {
            warn!(engine = %self.id, "seek failed: {}", err);
        }
    }

    fn current_position(&self) -> gst::ClockTime {
        self.playbin
            .query_position::<gst::ClockTime>()
            .unwrap_or(gst::ClockTime::ZERO)
    }

    fn read_message(&self, msg: &gst::Message) -> BusMessage {
        use gst::MessageView;

        match msg.view() {
            MessageView::AsyncDone(_) if !self.flags.loaded => BusMessage::AsyncDone {
                duration: self.query_duration(),
            },
            MessageView::AsyncDone(_) => BusMessage::AsyncDone { duration: 0.0 },
            MessageView::Error(err) => {
                let message = match err.debug() {
                    Some(debug) => format!("{} ({})", err.error(), debug),
                    None => err.error().to_string(),
                };
                BusMessage::Error { message }
            }
            MessageView::Eos(_) => BusMessage::Eos,
            MessageView::StateChanged(change) => {
                let from_playbin = msg
                    .src()
                    .map(|src| src == self.playbin.upcast_ref::<gst::Object>())
                    .unwrap_or(false);
                if from_playbin {
                    BusMessage::PlaybinState {
                        old: change.old(),
                        current: change.current(),
                    }
                } else {
                    BusMessage::Other
                }
            }
            _ => BusMessage::Other,
        }
    }

    fn handle_message(&mut self, msg: &gst::Message) {
        let message = self.read_message(msg);
        let outcome = classify(self.flags, &message);
        self.flags = outcome.flags;

        match &outcome.event {
            Some(EngineEvent::Load { duration }) => {
                info!(engine = %self.id, duration, "track loaded");
            }
            Some(EngineEvent::LoadError { message }) => {
                warn!(
                    engine = %self.id,
                    locator = %self.locator,
                    "track failed to load: {}",
                    message
                );
            }
            Some(EngineEvent::PlayError { message }) => {
                warn!(engine = %self.id, "playback error: {}", message);
            }
            Some(EngineEvent::End) => {
                debug!(engine = %self.id, looping = self.flags.looping, "end of stream");
            }
            _ => {}
        }

        match outcome.followup {
            Followup::Nothing => {}
            Followup::ApplyRate => {
                if (self.rate - 1.0).abs() > f64::EPSILON {
                    self.seek_at_rate(gst::ClockTime::ZERO);
                }
            }
            Followup::Shutdown => {
                self.playbin.set_state(gst::State::Null).ok();
            }
            Followup::Rewind => self.seek_at_rate(gst::ClockTime::ZERO),
            Followup::PauseAndRewind => {
                self.playbin.set_state(gst::State::Paused).ok();
                self.seek_at_rate(gst::ClockTime::ZERO);
            }
        }

        if let Some(event) = outcome.event {
            self.pending.push(event);
        }
    }
}

impl AudioEngine for GstEngine {
    fn id(&self) -> Uuid {
        self.id
    }

    fn locator(&self) -> &str {
        &self.locator
    }

    fn play(&mut self) {
        if self.unloaded {
            return;
        }
        if let Err(err) = self.playbin.set_state(gst::State::Playing) {
            warn!(engine = %self.id, "failed to start playback: {}", err);
            self.pending.push(EngineEvent::PlayError {
                message: err.to_string(),
            });
        }
    }

    fn pause(&mut self) {
        if self.unloaded {
            return;
        }
        if let Err(err) = self.playbin.set_state(gst::State::Paused) {
            warn!(engine = %self.id, "failed to pause playback: {}", err);
        }
    }

    fn stop(&mut self) {
        if self.unloaded {
            return;
        }
        self.flags = stop_flags(self.flags, self.playbin.current_state());
        self.playbin.set_state(gst::State::Paused).ok();
        if self.flags.loaded {
            self.seek_at_rate(gst::ClockTime::ZERO);
        }
        self.pending.push(EngineEvent::Stop);
    }

    fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.unloaded = true;
        self.pending.clear();
        self.playbin.set_state(gst::State::Null).ok();
        debug!(engine = %self.id, "pipeline shut down");
    }

    fn set_volume(&mut self, volume: f64) {
        self.playbin.set_property("volume", volume.clamp(0.0, 1.0));
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
        if self.flags.loaded && !self.unloaded {
            self.seek_at_rate(self.current_position());
        }
    }

    fn set_loop(&mut self, looping: bool) {
        self.flags.looping = looping;
    }

    fn seek(&mut self, seconds: f64) {
        if !self.flags.loaded || self.unloaded {
            return;
        }
        self.seek_at_rate(secs_to_clock(seconds));
    }

    fn position(&self) -> f64 {
        if self.unloaded {
            return 0.0;
        }
        clock_to_secs(self.current_position())
    }

    fn is_playing(&self) -> bool {
        !self.unloaded && self.playbin.current_state() == gst::State::Playing
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        if !self.unloaded {
            while let Some(msg) = self.bus.pop() {
                self.handle_message(&msg);
            }
        }
        std::mem::take(&mut self.pending)
    }
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Builds a fresh `playbin` per track.
#[derive(Debug, Default, Clone, Copy)]
pub struct GstEngineFactory;

impl EngineFactory for GstEngineFactory {
    fn create(
        &mut self,
        locator: &str,
        options: EngineOptions,
    ) -> Result<Box<dyn AudioEngine>, EngineError> {
        let engine = GstEngine::new(locator, options)?;
        Ok(Box::new(engine))
    }
}
