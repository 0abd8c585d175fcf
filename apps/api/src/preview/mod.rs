// Preview sessions: the explicit, per-session "record being rendered" state.
// A session caches its record so template switches re-render without a store
// round-trip, and resets whenever a different record is loaded.

pub mod handlers;
pub mod session;

pub use session::PreviewSessions;
