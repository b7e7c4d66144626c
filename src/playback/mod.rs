//! Word-by-word playback.
//!
//! [`PlaybackController`] is the synchronous state machine: it owns the
//! cursor and decides what each operation does to it. [`PlaybackSession`]
//! drives a controller on a tokio timer with exactly one pending tick.
//! [`PositionCoalescer`] throttles position notifications for persistence.

mod coalesce;
mod controller;
mod session;

pub use coalesce::{AUTOSAVE_INTERVAL, PositionCoalescer};
pub use controller::{PlaybackController, PlaybackState, SKIP_WORDS};
pub use session::PlaybackSession;
