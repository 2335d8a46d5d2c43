//! ECS resources shared across systems.
//!
//! Submodules overview:
//! - [`simconfig`] – immutable tuning values loaded once from INI
//! - [`worldtime`] – per-frame delta and tick counter

pub mod simconfig;
pub mod worldtime;
