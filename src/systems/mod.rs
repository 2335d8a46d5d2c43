//! Simulation systems.
//!
//! Submodules overview:
//! - [`brain`] – NPC decision making and melee attack cadence
//! - [`combat`] – reach tests and queued damage resolution
//! - [`equipment`] – collect/equip/unequip boundary operations
//! - [`movement`] – velocity integration with axis-sliding collision
//! - [`perception`] – line-of-sight scans within vision range
//! - [`projectile`] – sub-stepped projectile flight and impacts
//! - [`time`] – advance the simulation clock
//! - [`weapon`] – reload ticking and the fire operation

pub mod brain;
pub mod combat;
pub mod equipment;
pub mod movement;
pub mod perception;
pub mod projectile;
pub mod time;
pub mod weapon;
