//! ECS components for simulation entities.
//!
//! Submodules overview:
//! - [`brain`] – NPC attitude, pluggable decision strategy, attack cadence
//! - [`flags`] – active/solid/collectable entity flags
//! - [`inventory`] – player inventory and equipment slots
//! - [`item`] – collectable item data
//! - [`mapposition`] – world-space position and facing angle
//! - [`perception`] – per-NPC visibility results
//! - [`projectile`] – sub-stepped projectile state
//! - [`shape`] – rectangle/circle collision footprints
//! - [`stats`] – stat block with source-attributed modifiers
//! - [`velocity`] – movement intent vector
//! - [`weapon`] – ammo, reload timer, and fire-mode state machine

pub mod brain;
pub mod flags;
pub mod inventory;
pub mod item;
pub mod mapposition;
pub mod perception;
pub mod projectile;
pub mod shape;
pub mod stats;
pub mod velocity;
pub mod weapon;
