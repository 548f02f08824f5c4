//! In-process state keyed by farmer id.
//!
//! - `ProfileStore`: latest profile and scenario pair per farmer
//! - `SessionStore`: bounded rolling transcript per farmer
//!
//! Both are plain key-partitioned maps with no persistence; a restart loses
//! everything. Stores are constructed explicitly and shared via `Arc`.

mod profile_store;
mod session_store;

pub use profile_store::ProfileStore;
pub use session_store::{SessionRole, SessionStore, SessionTurn, DEFAULT_MAX_TURNS};
