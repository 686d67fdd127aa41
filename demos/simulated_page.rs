//! # Example: Simulated page
//!
//! Drives a fake document through the scheduler:
//! - a top-level document with a shadow root and a same-origin frame;
//! - a cross-origin frame that refuses enumeration;
//! - late items arriving through the mutation observer.
//!
//! Run with `RUST_LOG=drainvisor=debug cargo run --example simulated_page`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use drainvisor::{
    Config, DiscoveryError, ItemError, ItemId, ItemRef, MediaItem, MutationSink, MutationSource,
    Notify, ObserveError, Scheduler, Scope, ScopeRef, Signal, Source,
};

/// Video element stand-in.
struct Video {
    id: ItemId,
    ready: u8,
    duration: f64,
    position: Mutex<f64>,
}

impl Video {
    fn arc(id: u64, ready: u8, duration: f64) -> ItemRef {
        Arc::new(Self {
            id: ItemId(id),
            ready,
            duration,
            position: Mutex::new(0.0),
        })
    }
}

impl MediaItem for Video {
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
        // Every fifth element refuses big jumps, like a stream without range support.
        if self.id.0 % 5 == 0 && secs - self.position() > 60.0 {
            return Err(ItemError::op("set_position", "range requests unsupported"));
        }
        *self.position.lock() = secs;
        Ok(())
    }

    fn set_muted(&self, _muted: bool) -> Result<(), ItemError> {
        Ok(())
    }

    fn pause(&self) -> Result<(), ItemError> {
        Ok(())
    }

    fn reload(&self) -> Result<(), ItemError> {
        Ok(())
    }

    fn dispatch(&self, signal: Signal) -> Result<(), ItemError> {
        tracing::trace!(item = %self.id, signal = signal.as_str(), "dispatch");
        Ok(())
    }

    fn source(&self) -> Source {
        Source::Remote(format!("https://cdn.example/{}.mp4", self.id.0))
    }

    fn clear_source(&self) -> Result<(), ItemError> {
        Ok(())
    }
}

/// Document region.
struct Region {
    label: &'static str,
    items: Mutex<Vec<ItemRef>>,
    children: Vec<ScopeRef>,
    cross_origin: bool,
}

impl Region {
    fn new(label: &'static str, items: Vec<ItemRef>, children: Vec<ScopeRef>) -> Arc<Self> {
        Arc::new(Self {
            label,
            items: Mutex::new(items),
            children,
            cross_origin: false,
        })
    }

    fn foreign(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            items: Mutex::new(Vec::new()),
            children: Vec::new(),
            cross_origin: true,
        })
    }
}

impl Scope for Region {
    fn label(&self) -> &str {
        self.label
    }

    fn items(&self) -> Result<Vec<ItemRef>, DiscoveryError> {
        if self.cross_origin {
            return Err(DiscoveryError::scope(self.label, "blocked by same-origin policy"));
        }
        Ok(self.items.lock().clone())
    }

    fn children(&self) -> Result<Vec<ScopeRef>, DiscoveryError> {
        Ok(self.children.clone())
    }
}

/// Mutation observer stand-in.
#[derive(Default)]
struct Observer {
    sink: Mutex<Option<MutationSink>>,
    alive: AtomicBool,
}

impl Observer {
    fn nodes_added(&self) {
        if let Some(sink) = &*self.sink.lock() {
            sink.signal();
        }
    }
}

impl MutationSource for Observer {
    fn observe(&self, sink: MutationSink) -> Result<(), ObserveError> {
        *self.sink.lock() = Some(sink);
        self.alive.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.alive.store(false, Ordering::SeqCst);
        *self.sink.lock() = None;
    }

    fn is_observing(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// Toast stand-in.
struct Toast;

impl Notify for Toast {
    fn notify(&self, message: &str) {
        println!("[toast] {message}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drainvisor=info")),
        )
        .init();

    let children: Vec<ScopeRef> = vec![
        Region::new("shadow#player", vec![Video::arc(7, 1, 240.0)], vec![]) as ScopeRef,
        Region::foreign("iframe#ads") as ScopeRef,
        Region::new("iframe#embed", vec![Video::arc(8, 3, f64::INFINITY)], vec![]) as ScopeRef,
    ];
    let body = Region::new(
        "document",
        (1..=6).map(|i| Video::arc(i, 4, 600.0)).collect(),
        children,
    );
    let observer = Arc::new(Observer::default());

    let cfg = Config {
        poll_interval: Duration::from_millis(500),
        incremental_max_steps: 50,
        ..Config::default()
    };
    let sched = Scheduler::builder(cfg)
        .with_root(body.clone())
        .with_mutation_source(observer.clone())
        .with_notifier(Arc::new(Toast))
        .build()?;

    sched.start();
    sched.wait_idle().await;
    println!("after initial scan: {:?}", sched.status());

    for id in 9..=14 {
        body.items.lock().push(Video::arc(id, (id % 4) as u8, 90.0));
    }
    observer.nodes_added();
    tokio::time::sleep(Duration::from_millis(50)).await;
    sched.wait_idle().await;
    println!("after late items: {:?}", sched.status());

    sched.shutdown().await;
    Ok(())
}
