//! Message types exchanged between systems and surfaced to collaborators.

pub mod combat;
