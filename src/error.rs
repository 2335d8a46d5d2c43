//! Simulation error taxonomy.
//!
//! Malformed API use fails synchronously with one of these variants.
//! Per-frame systems never surface them: a stale id or a despawned
//! occluder is treated as absent from all queries instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid construction input, e.g. a zero-length projectile
    /// direction or a spawn kind missing a required section.
    #[error("construction error: {0}")]
    Construction(String),

    /// Unknown entity id or spawn kind key.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Misuse of an otherwise valid API, e.g. removing a modifier or
    /// inventory item that is not present, or equipping an item the
    /// character does not own.
    #[error("usage error: {0}")]
    Usage(String),
}
