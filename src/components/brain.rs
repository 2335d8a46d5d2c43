//! NPC decision-making: attitude, pluggable strategy, attack cadence.
//!
//! A strategy is a pure function of the current perception plus two
//! memory slots (last known quarry position, current wander target).
//! There are no transition events; the whole decision is recomputed from
//! those slots on every call.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::registry::EntityId;
use crate::resources::simconfig::WanderParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attitude {
    Hostile,
    Friendly,
    Neutral,
}

/// Inputs to a decision step.
pub struct DecisionContext {
    /// Perceiver's current position.
    pub position: Vec2,
    /// The designated quarry's live position, when visible this frame.
    pub quarry_position: Option<Vec2>,
    /// Distance below which a remembered position counts as reached.
    pub arrival_threshold: f32,
    pub wander: WanderParams,
}

/// Pluggable AI strategy producing a movement target.
pub trait DecisionStrategy: Send + Sync {
    fn decide(&mut self, ctx: &DecisionContext) -> Option<Vec2>;
}

/// Reference hostile strategy: chase a visible quarry, walk to its last
/// seen position, otherwise wander.
pub struct HostileStrategy {
    last_known: Option<Vec2>,
    wander_target: Option<Vec2>,
    rng: fastrand::Rng,
}

impl HostileStrategy {
    pub fn new() -> Self {
        Self {
            last_known: None,
            wander_target: None,
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeded variant for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            last_known: None,
            wander_target: None,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    fn pick_wander_target(&mut self, ctx: &DecisionContext) -> Vec2 {
        let angle = self.rng.f32() * std::f32::consts::TAU;
        let radius = ctx.wander.min_radius
            + self.rng.f32() * (ctx.wander.max_radius - ctx.wander.min_radius);
        ctx.position + Vec2::from_angle(angle) * radius
    }
}

impl Default for HostileStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionStrategy for HostileStrategy {
    fn decide(&mut self, ctx: &DecisionContext) -> Option<Vec2> {
        // 1. Chase: a visible quarry refreshes the remembered position.
        if let Some(live) = ctx.quarry_position {
            self.last_known = Some(live);
            return Some(live);
        }

        // 2. Continue to the last seen position until we arrive.
        if let Some(remembered) = self.last_known {
            if ctx.position.distance(remembered) > ctx.arrival_threshold {
                return Some(remembered);
            }
            self.last_known = None;
        }

        // 3. Wander. A new target is picked when none exists, when we
        // stand exactly on the current one, or on a small random roll.
        let needs_new = match self.wander_target {
            None => true,
            Some(target) => ctx.position == target || self.rng.f32() < ctx.wander.retarget_chance,
        };
        if needs_new {
            self.wander_target = Some(self.pick_wander_target(ctx));
        }
        self.wander_target
    }
}

/// AI state attached to an NPC entity.
#[derive(Component)]
pub struct NpcBrain {
    pub name: String,
    pub attitude: Attitude,
    pub strategy: Box<dyn DecisionStrategy>,
    /// One-slot route: the current movement target.
    pub move_target: Option<Vec2>,
    /// Weak handle to the designated quarry (usually the player).
    pub quarry: Option<EntityId>,
    /// Minimum seconds between melee attacks.
    pub attack_rate: f32,
    pub attack_timer: f32,
    pub able_to_attack: bool,
}

impl NpcBrain {
    pub fn new(
        name: impl Into<String>,
        attitude: Attitude,
        strategy: Box<dyn DecisionStrategy>,
        attack_rate: f32,
    ) -> Self {
        Self {
            name: name.into(),
            attitude,
            strategy,
            move_target: None,
            quarry: None,
            attack_rate,
            attack_timer: 0.0,
            able_to_attack: true,
        }
    }

    pub fn with_quarry(mut self, quarry: EntityId) -> Self {
        self.quarry = Some(quarry);
        self
    }

    /// Close the attack latch after a successful attack.
    pub fn latch_attack(&mut self) {
        self.able_to_attack = false;
        self.attack_timer = 0.0;
    }

    /// Accumulate cooldown time; re-opens the latch once `attack_rate`
    /// seconds have passed.
    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.able_to_attack {
            return;
        }
        self.attack_timer += dt;
        if self.attack_timer >= self.attack_rate {
            self.attack_timer = 0.0;
            self.able_to_attack = true;
        }
    }
}
