//! In-memory item used by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::ItemError;
use crate::host::{ItemId, ItemRef, MediaItem, Signal, Source};

pub(crate) struct StubItem {
    id: ItemId,
    ready: u8,
    duration: f64,
    position: Mutex<f64>,
    signals: Mutex<Vec<Signal>>,
    muted: AtomicBool,
    paused: AtomicBool,
    fail_seeks: bool,
}

impl StubItem {
    pub fn new(id: u64, ready: u8, duration: f64) -> Self {
        Self {
            id: ItemId(id),
            ready,
            duration,
            position: Mutex::new(0.0),
            signals: Mutex::new(Vec::new()),
            muted: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            fail_seeks: false,
        }
    }

    pub fn arc(id: u64) -> ItemRef {
        Arc::new(Self::new(id, 4, 10.0))
    }

    pub fn failing_seeks(mut self) -> Self {
        self.fail_seeks = true;
        self
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl MediaItem for StubItem {
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
        Ok(())
    }

    fn set_muted(&self, muted: bool) -> Result<(), ItemError> {
        self.muted.store(muted, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) -> Result<(), ItemError> {
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn reload(&self) -> Result<(), ItemError> {
        Ok(())
    }

    fn dispatch(&self, signal: Signal) -> Result<(), ItemError> {
        self.signals.lock().push(signal);
        Ok(())
    }

    fn source(&self) -> Source {
        Source::None
    }

    fn clear_source(&self) -> Result<(), ItemError> {
        Ok(())
    }
}
