//! In-memory engine used by the controller tests.
//!
//! Transport requests are only recorded. Tests decide when the "engine" confirms them through a
//! [`MockHandle`], which is how asynchronous callbacks are simulated on a single thread.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use uuid::Uuid;

use crate::engine::{AudioEngine, EngineError, EngineEvent, EngineFactory, EngineOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Play,
    Pause,
    Stop,
    Unload,
    Volume(f64),
    Rate(f64),
    Loop(bool),
    Seek(f64),
}

#[derive(Debug)]
struct MockRecord {
    id: Uuid,
    locator: String,
    options: EngineOptions,
    calls: Vec<MockCall>,
    pending: VecDeque<EngineEvent>,
    position: f64,
    playing: bool,
    unloads: usize,
    position_reads: usize,
}

#[derive(Debug, Default)]
struct Registry {
    engines: Vec<MockRecord>,
    failing: HashSet<String>,
}

impl Registry {
    fn record(&mut self, id: Uuid) -> &mut MockRecord {
        self.engines
            .iter_mut()
            .find(|record| record.id == id)
            .expect("engine was created by this registry")
    }

    fn latest(&mut self) -> &mut MockRecord {
        self.engines.last_mut().expect("no engine created yet")
    }
}

pub struct MockEngine {
    id: Uuid,
    locator: String,
    registry: Rc<RefCell<Registry>>,
}

impl MockEngine {
    fn push(&self, call: MockCall) {
        self.registry.borrow_mut().record(self.id).calls.push(call);
    }
}

impl AudioEngine for MockEngine {
    fn id(&self) -> Uuid {
        self.id
    }

    fn locator(&self) -> &str {
        &self.locator
    }

    fn play(&mut self) {
        self.push(MockCall::Play);
    }

    fn pause(&mut self) {
        self.push(MockCall::Pause);
    }

    fn stop(&mut self) {
        self.push(MockCall::Stop);
        let mut registry = self.registry.borrow_mut();
        let record = registry.record(self.id);
        record.playing = false;
        record.position = 0.0;
        record.pending.push_back(EngineEvent::Stop);
    }

    fn unload(&mut self) {
        self.push(MockCall::Unload);
        let mut registry = self.registry.borrow_mut();
        let record = registry.record(self.id);
        record.unloads += 1;
        record.playing = false;
    }

    fn set_volume(&mut self, volume: f64) {
        self.push(MockCall::Volume(volume));
    }

    fn set_rate(&mut self, rate: f64) {
        self.push(MockCall::Rate(rate));
    }

    fn set_loop(&mut self, looping: bool) {
        self.push(MockCall::Loop(looping));
    }

    fn seek(&mut self, seconds: f64) {
        self.push(MockCall::Seek(seconds));
        self.registry.borrow_mut().record(self.id).position = seconds;
    }

    fn position(&self) -> f64 {
        let mut registry = self.registry.borrow_mut();
        let record = registry.record(self.id);
        record.position_reads += 1;
        record.position
    }

    fn is_playing(&self) -> bool {
        self.registry.borrow_mut().record(self.id).playing
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.registry
            .borrow_mut()
            .record(self.id)
            .pending
            .drain(..)
            .collect()
    }
}

#[derive(Default)]
pub struct MockFactory {
    registry: Rc<RefCell<Registry>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            registry: self.registry.clone(),
        }
    }
}

impl EngineFactory for MockFactory {
    fn create(
        &mut self,
        locator: &str,
        options: EngineOptions,
    ) -> Result<Box<dyn AudioEngine>, EngineError> {
        let mut registry = self.registry.borrow_mut();
        if registry.failing.contains(locator) {
            return Err(EngineError::Pipeline(format!("refusing to build {}", locator)));
        }
        let id = Uuid::new_v4();
        registry.engines.push(MockRecord {
            id,
            locator: locator.to_string(),
            options,
            calls: Vec::new(),
            pending: VecDeque::new(),
            position: 0.0,
            playing: false,
            unloads: 0,
            position_reads: 0,
        });
        Ok(Box::new(MockEngine {
            id,
            locator: locator.to_string(),
            registry: self.registry.clone(),
        }))
    }
}

/// Test-side handle onto every engine a [`MockFactory`] has built.
#[derive(Clone)]
pub struct MockHandle {
    registry: Rc<RefCell<Registry>>,
}

impl MockHandle {
    pub fn fail_locator(&self, locator: &str) {
        self.registry
            .borrow_mut()
            .failing
            .insert(locator.to_string());
    }

    pub fn engine_count(&self) -> usize {
        self.registry.borrow().engines.len()
    }

    pub fn live_count(&self) -> usize {
        self.registry
            .borrow()
            .engines
            .iter()
            .filter(|record| record.unloads == 0)
            .count()
    }

    pub fn latest_id(&self) -> Uuid {
        self.registry.borrow_mut().latest().id
    }

    pub fn latest_locator(&self) -> String {
        self.registry.borrow_mut().latest().locator.clone()
    }

    pub fn latest_options(&self) -> EngineOptions {
        self.registry.borrow_mut().latest().options
    }

    pub fn unload_count(&self, id: Uuid) -> usize {
        self.registry.borrow_mut().record(id).unloads
    }

    pub fn calls(&self, id: Uuid) -> Vec<MockCall> {
        self.registry.borrow_mut().record(id).calls.clone()
    }

    pub fn latest_calls(&self) -> Vec<MockCall> {
        self.registry.borrow_mut().latest().calls.clone()
    }

    pub fn position_reads(&self, id: Uuid) -> usize {
        self.registry.borrow_mut().record(id).position_reads
    }

    /// Queue an event on the most recently built engine.
    pub fn emit(&self, event: EngineEvent) {
        self.registry.borrow_mut().latest().pending.push_back(event);
    }

    /// Finish loading the latest engine with the given duration.
    pub fn confirm_load(&self, duration: f64) {
        self.registry
            .borrow_mut()
            .latest()
            .pending
            .push_back(EngineEvent::Load { duration });
    }

    pub fn confirm_play(&self) {
        let mut registry = self.registry.borrow_mut();
        let record = registry.latest();
        record.playing = true;
        record.pending.push_back(EngineEvent::Play);
    }

    pub fn confirm_pause(&self) {
        let mut registry = self.registry.borrow_mut();
        let record = registry.latest();
        record.playing = false;
        record.pending.push_back(EngineEvent::Pause);
    }

    /// Flip the latest engine's playing flag without telling the controller.
    pub fn set_playing(&self, playing: bool) {
        self.registry.borrow_mut().latest().playing = playing;
    }

    pub fn set_position(&self, seconds: f64) {
        self.registry.borrow_mut().latest().position = seconds;
    }
}
