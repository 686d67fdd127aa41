use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::{
    config::Config,
    error::ConfigError,
    events::Bus,
    host::{MutationSource, Notify, Release, ScopeRef, SourceRelease},
    subscribers::{Subscribe, SubscriberSet},
};
use super::scheduler::{Host, Scheduler};

/// Builder for constructing a [`Scheduler`] with its host collaborators.
pub struct SchedulerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    root: Option<ScopeRef>,
    mutations: Option<Arc<dyn MutationSource>>,
    release: Option<Arc<dyn Release>>,
    notifier: Option<Arc<dyn Notify>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            root: None,
            mutations: None,
            release: None,
            notifier: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded
    /// queues. The built-in `LogWriter` is always added on top; `Config::quiet`
    /// mutes it, also when changed through `update_config`.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the root scope that discovery walks.
    ///
    /// Without a root the scheduler only processes manually enqueued items.
    pub fn with_root(mut self, root: ScopeRef) -> Self {
        self.root = Some(root);
        self
    }

    /// Sets the mutation source feeding the discovery listener and heal cycle.
    pub fn with_mutation_source(mut self, source: Arc<dyn MutationSource>) -> Self {
        self.mutations = Some(source);
        self
    }

    /// Replaces the stock [`SourceRelease`].
    pub fn with_release(mut self, release: Arc<dyn Release>) -> Self {
        self.release = Some(release);
        self
    }

    /// Sets the notifier used when `Config::notify_on_done` is on.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validates the configuration and builds the scheduler.
    ///
    /// Must be called inside a tokio runtime: subscriber workers and the event
    /// listener are spawned here. The scheduler is not running until
    /// [`Scheduler::start`].
    pub fn build(self) -> Result<Arc<Scheduler>, ConfigError> {
        self.cfg.validate()?;

        let log_muted = Arc::new(AtomicBool::new(self.cfg.quiet));
        #[allow(unused_mut)]
        let mut subscribers = self.subscribers;
        #[cfg(feature = "logging")]
        subscribers.push(Arc::new(crate::subscribers::LogWriter::muted_by(
            Arc::clone(&log_muted),
        )));

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(subscribers, bus.clone());
        let host = Host {
            root: self.root,
            mutations: self.mutations,
            release: self.release.unwrap_or_else(|| Arc::new(SourceRelease)),
            notifier: self.notifier,
        };

        let sched = Arc::new(Scheduler::new_internal(self.cfg, bus, host, log_muted));
        sched.subscriber_listener(subs);
        Ok(sched)
    }
}
