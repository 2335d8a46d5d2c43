//! Combat messages.
//!
//! Melee attacks and projectile hits both funnel damage through
//! [`DamageEvent`] so one system owns the take-damage bookkeeping.
//! [`WeaponFired`] is fire feedback for the excluded presentation and
//! audio layers; the simulation itself only emits it.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

use crate::registry::EntityId;

/// Raw damage headed for a target; the target's defense is applied when
/// the damage system resolves it.
#[derive(Message, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: f32,
    /// Weak handle to the attacking entity or firing weapon, for logs
    /// and feedback only.
    pub source: Option<EntityId>,
}

/// Emitted once per successful fire call.
#[derive(Message, Debug, Clone, Copy)]
pub struct WeaponFired {
    pub weapon: EntityId,
    pub projectile: EntityId,
}
