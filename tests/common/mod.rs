//! In-memory host adapter used by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use drainvisor::{
    Config, DiscoveryError, Event, EventKind, ItemError, ItemId, ItemRef, LiveStream, MediaItem,
    MutationSink, MutationSource, Notify, ObserveError, Scope, ScopeRef, Signal, Source,
    TransientUrl,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Config with the log subscriber off and slow discovery timers.
pub fn quiet_config() -> Config {
    Config {
        quiet: true,
        poll_interval: std::time::Duration::from_secs(60),
        heal_interval: std::time::Duration::from_secs(3),
        ..Config::default()
    }
}

/// Drains everything currently buffered in `rx`.
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

/// Counts items currently between their first mute and their `Ended` signal.
#[derive(Default)]
pub struct Gauge {
    now: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let n = self.now.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(n, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.now.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Scriptable media item.
pub struct FakeItem {
    id: ItemId,
    ready: u8,
    duration: f64,
    position: Mutex<f64>,
    seeks: Mutex<Vec<f64>>,
    signals: Mutex<Vec<Signal>>,
    source: Mutex<Source>,
    started: AtomicBool,
    reloads: AtomicUsize,
    fail_seeks: bool,
    fail_clear: bool,
    panic_on_mute: bool,
    pause_failures: AtomicUsize,
    gauge: Option<Arc<Gauge>>,
}

impl FakeItem {
    pub fn new(id: u64, ready: u8, duration: f64) -> Self {
        Self {
            id: ItemId(id),
            ready,
            duration,
            position: Mutex::new(0.0),
            seeks: Mutex::new(Vec::new()),
            signals: Mutex::new(Vec::new()),
            source: Mutex::new(Source::None),
            started: AtomicBool::new(false),
            reloads: AtomicUsize::new(0),
            fail_seeks: false,
            fail_clear: false,
            panic_on_mute: false,
            pause_failures: AtomicUsize::new(0),
            gauge: None,
        }
    }

    /// Ready item with a 10s duration (instant strategy).
    pub fn ready(id: u64) -> Arc<Self> {
        Arc::new(Self::new(id, 4, 10.0))
    }

    pub fn failing_seeks(mut self) -> Self {
        self.fail_seeks = true;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    /// Refuses the first `pause` call only.
    pub fn failing_pause_once(self) -> Self {
        self.pause_failures.store(1, Ordering::SeqCst);
        self
    }

    /// Refuses every `pause` call.
    pub fn failing_pause(self) -> Self {
        self.pause_failures.store(usize::MAX, Ordering::SeqCst);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_mute = true;
        self
    }

    pub fn with_source(self, source: Source) -> Self {
        *self.source.lock() = source;
        self
    }

    pub fn with_gauge(mut self, gauge: Arc<Gauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().clone()
    }

    pub fn seek_count(&self) -> usize {
        self.seeks.lock().len()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn current_source(&self) -> Source {
        self.source.lock().clone()
    }
}

impl MediaItem for FakeItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn ready_state(&self) -> u8 {
        self.ready
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn position(&self) -> f64 {
        *self.position.lock()
    }

    fn set_position(&self, secs: f64) -> Result<(), ItemError> {
        if self.fail_seeks {
            return Err(ItemError::op("set_position", "not seekable"));
        }
        *self.position.lock() = secs;
        self.seeks.lock().push(secs);
        Ok(())
    }

    fn set_muted(&self, _muted: bool) -> Result<(), ItemError> {
        if self.panic_on_mute {
            panic!("adapter exploded");
        }
        if !self.started.swap(true, Ordering::SeqCst) {
            if let Some(g) = &self.gauge {
                g.enter();
            }
        }
        Ok(())
    }

    fn pause(&self) -> Result<(), ItemError> {
        let refused = self
            .pause_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if refused {
            return Err(ItemError::op("pause", "element busy"));
        }
        Ok(())
    }

    fn reload(&self) -> Result<(), ItemError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn dispatch(&self, signal: Signal) -> Result<(), ItemError> {
        self.signals.lock().push(signal);
        if signal == Signal::Ended {
            if let Some(g) = &self.gauge {
                g.leave();
            }
        }
        Ok(())
    }

    fn source(&self) -> Source {
        self.source.lock().clone()
    }

    fn clear_source(&self) -> Result<(), ItemError> {
        if self.fail_clear {
            return Err(ItemError::Detached);
        }
        *self.source.lock() = Source::None;
        Ok(())
    }
}

/// Object URL double.
#[derive(Default)]
pub struct FakeUrl {
    revoked: AtomicBool,
}

impl FakeUrl {
    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }
}

impl TransientUrl for FakeUrl {
    fn url(&self) -> &str {
        "blob:fake/1"
    }

    fn revoke(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }
}

/// Live stream double.
#[derive(Default)]
pub struct FakeStream {
    stopped: AtomicBool,
}

impl FakeStream {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl LiveStream for FakeStream {
    fn stop_tracks(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Scope whose item list can grow while the scheduler runs.
pub struct FakeScope {
    label: &'static str,
    items: Mutex<Vec<ItemRef>>,
    children: Vec<ScopeRef>,
    broken: bool,
}

impl FakeScope {
    pub fn new(label: &'static str, items: Vec<ItemRef>, children: Vec<ScopeRef>) -> Arc<Self> {
        Arc::new(Self {
            label,
            items: Mutex::new(items),
            children,
            broken: false,
        })
    }

    /// Scope that refuses enumeration (cross-origin frame).
    pub fn broken(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            items: Mutex::new(Vec::new()),
            children: Vec::new(),
            broken: true,
        })
    }

    pub fn push(&self, item: ItemRef) {
        self.items.lock().push(item);
    }
}

impl Scope for FakeScope {
    fn label(&self) -> &str {
        self.label
    }

    fn items(&self) -> Result<Vec<ItemRef>, DiscoveryError> {
        if self.broken {
            return Err(DiscoveryError::scope(self.label, "cross-origin"));
        }
        Ok(self.items.lock().clone())
    }

    fn children(&self) -> Result<Vec<ScopeRef>, DiscoveryError> {
        Ok(self.children.clone())
    }
}

/// Mutation source that can lose its observer on demand.
#[derive(Default)]
pub struct FakeMutations {
    sink: Mutex<Option<MutationSink>>,
    observing: AtomicBool,
    observe_calls: AtomicUsize,
    refuse: AtomicBool,
}

impl FakeMutations {
    pub fn refusing() -> Arc<Self> {
        let m = Self::default();
        m.refuse.store(true, Ordering::SeqCst);
        Arc::new(m)
    }

    /// Reports "nodes added" to the installed sink, if any.
    pub fn fire(&self) {
        if self.observing.load(Ordering::SeqCst) {
            if let Some(sink) = &*self.sink.lock() {
                sink.signal();
            }
        }
    }

    /// Simulates the host tearing the observer down.
    pub fn lose(&self) {
        self.observing.store(false, Ordering::SeqCst);
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls.load(Ordering::SeqCst)
    }
}

impl MutationSource for FakeMutations {
    fn observe(&self, sink: MutationSink) -> Result<(), ObserveError> {
        self.observe_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ObserveError::Unavailable {
                reason: "no observer facility".into(),
            });
        }
        *self.sink.lock() = Some(sink);
        self.observing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.observing.store(false, Ordering::SeqCst);
        *self.sink.lock() = None;
    }

    fn is_observing(&self) -> bool {
        self.observing.load(Ordering::SeqCst)
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notify for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
