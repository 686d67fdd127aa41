//! # Media item capability interface.
//!
//! [`MediaItem`] is what the scheduler needs from a media-element-like object:
//! readiness, duration, position read/write, mute/pause/reload, source handle
//! and synthetic lifecycle signal dispatch. Adapters wrap whatever concrete
//! element the host exposes.
//!
//! Identity is the adapter-reported [`ItemId`]; two handles with the same id are
//! the same item for deduplication purposes.

use std::fmt;
use std::sync::Arc;

use crate::error::ItemError;

/// Stable identity of an item within one scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to an item.
pub type ItemRef = Arc<dyn MediaItem>;

/// Synthetic lifecycle signals dispatched for external observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Position changed.
    TimeUpdate,
    /// A seek completed.
    Seeked,
    /// Playback paused.
    Pause,
    /// Playback reached the end.
    Ended,
}

impl Signal {
    /// Terminal signal sequence, in dispatch order.
    pub const TERMINAL: [Signal; 4] = [
        Signal::TimeUpdate,
        Signal::Seeked,
        Signal::Pause,
        Signal::Ended,
    ];

    /// Host event name of this signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::TimeUpdate => "timeupdate",
            Signal::Seeked => "seeked",
            Signal::Pause => "pause",
            Signal::Ended => "ended",
        }
    }
}

/// Handle to a transient resource URL (e.g. an object URL).
pub trait TransientUrl: Send + Sync {
    /// The URL string.
    fn url(&self) -> &str;
    /// Revokes the URL; further loads through it fail.
    fn revoke(&self);
}

/// Handle to a live capture stream.
pub trait LiveStream: Send + Sync {
    /// Stops every track of the stream.
    fn stop_tracks(&self);
}

/// Current source of an item.
#[derive(Clone, Default)]
pub enum Source {
    /// No source attached.
    #[default]
    None,
    /// Plain network URL.
    Remote(String),
    /// Transient URL owned by the page.
    Transient(Arc<dyn TransientUrl>),
    /// Live stream with stoppable tracks.
    Stream(Arc<dyn LiveStream>),
}

impl Source {
    /// True for sources whose lifetime is owned by the page (transient URLs, streams).
    pub fn is_transient(&self) -> bool {
        matches!(self, Source::Transient(_) | Source::Stream(_))
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::None => f.write_str("None"),
            Source::Remote(url) => f.debug_tuple("Remote").field(url).finish(),
            Source::Transient(h) => f.debug_tuple("Transient").field(&h.url()).finish(),
            Source::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// # Media-element-like unit of work.
///
/// All methods are synchronous: on the host they map to plain property reads and
/// writes. Fallible operations return [`ItemError`]; the scheduler isolates those
/// errors to the item.
///
/// # Example
/// ```
/// use drainvisor::{ItemError, ItemId, MediaItem, Signal, Source};
///
/// struct Silent;
///
/// impl MediaItem for Silent {
///     fn id(&self) -> ItemId { ItemId(1) }
///     fn ready_state(&self) -> u8 { 4 }
///     fn duration(&self) -> f64 { 12.0 }
///     fn position(&self) -> f64 { 0.0 }
///     fn set_position(&self, _secs: f64) -> Result<(), ItemError> { Ok(()) }
///     fn set_muted(&self, _muted: bool) -> Result<(), ItemError> { Ok(()) }
///     fn pause(&self) -> Result<(), ItemError> { Ok(()) }
///     fn reload(&self) -> Result<(), ItemError> { Ok(()) }
///     fn dispatch(&self, _signal: Signal) -> Result<(), ItemError> { Ok(()) }
///     fn source(&self) -> Source { Source::None }
///     fn clear_source(&self) -> Result<(), ItemError> { Ok(()) }
/// }
/// ```
pub trait MediaItem: Send + Sync + 'static {
    /// Stable identity.
    fn id(&self) -> ItemId;

    /// Readiness ordinal (`HAVE_NOTHING = 0` .. `HAVE_ENOUGH_DATA = 4`).
    fn ready_state(&self) -> u8;

    /// Duration in seconds; non-finite or non-positive means unknown.
    fn duration(&self) -> f64;

    /// Current position in seconds.
    fn position(&self) -> f64;

    /// Seeks to `secs`.
    fn set_position(&self, secs: f64) -> Result<(), ItemError>;

    /// Mutes or unmutes.
    fn set_muted(&self, muted: bool) -> Result<(), ItemError>;

    /// Pauses playback.
    fn pause(&self) -> Result<(), ItemError>;

    /// Re-runs the host load algorithm (drops buffered data).
    fn reload(&self) -> Result<(), ItemError>;

    /// Dispatches a synthetic lifecycle signal.
    fn dispatch(&self, signal: Signal) -> Result<(), ItemError>;

    /// Current source.
    fn source(&self) -> Source;

    /// Detaches the current source.
    fn clear_source(&self) -> Result<(), ItemError>;
}

/// Returns the duration if it is finite and positive.
#[inline]
pub(crate) fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}
