//! Character stat block with source-attributed modifiers.
//!
//! Every derived stat is recomputed on access as `base + sum(modifiers)`,
//! never cached, so equip/unequip and buff expiry take effect on the next
//! read. Modifiers hold a weak [`EntityId`] handle to their source entity
//! for identity-based removal; they never own the source.

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use crate::error::SimError;
use crate::registry::EntityId;

/// Additive, source-attributed adjustment to a derived stat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifier {
    pub value: f32,
    pub source: EntityId,
}

impl Modifier {
    pub fn new(value: f32, source: EntityId) -> Self {
        Self { value, source }
    }
}

type ModList = SmallVec<[Modifier; 2]>;

/// Which derived stat a modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    MaxHealth,
    Speed,
    Attack,
    Defense,
    Vision,
    Hearing,
}

/// Health, combat and perception stats for a living entity.
///
/// Presence of this component is the damage capability: anything with a
/// `StatBlock` can be hit, anything without one cannot.
#[derive(Component, Clone, Debug)]
pub struct StatBlock {
    health: f32,
    base_max_health: f32,
    base_speed: f32,
    base_attack: f32,
    base_defense: f32,
    base_vision: f32,
    base_hearing: f32,
    attack_range: f32,
    alive: bool,
    max_health_mods: ModList,
    speed_mods: ModList,
    attack_mods: ModList,
    defense_mods: ModList,
    vision_mods: ModList,
    hearing_mods: ModList,
}

impl StatBlock {
    pub fn new(
        max_health: f32,
        speed: f32,
        attack: f32,
        defense: f32,
        vision_range: f32,
        hearing_range: f32,
    ) -> Self {
        Self {
            health: max_health,
            base_max_health: max_health,
            base_speed: speed,
            base_attack: attack,
            base_defense: defense,
            base_vision: vision_range,
            base_hearing: hearing_range,
            attack_range: 5.0,
            alive: true,
            max_health_mods: SmallVec::new(),
            speed_mods: SmallVec::new(),
            attack_mods: SmallVec::new(),
            defense_mods: SmallVec::new(),
            vision_mods: SmallVec::new(),
            hearing_mods: SmallVec::new(),
        }
    }

    pub fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range;
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Dead characters stay dead: this flips to false exactly when
    /// health reaches zero and never flips back.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn attack_range(&self) -> f32 {
        self.attack_range
    }

    pub fn max_health(&self) -> f32 {
        self.base_max_health + Self::mod_sum(&self.max_health_mods)
    }

    pub fn speed(&self) -> f32 {
        self.base_speed + Self::mod_sum(&self.speed_mods)
    }

    pub fn attack(&self) -> f32 {
        self.base_attack + Self::mod_sum(&self.attack_mods)
    }

    pub fn defense(&self) -> f32 {
        self.base_defense + Self::mod_sum(&self.defense_mods)
    }

    pub fn vision_range(&self) -> f32 {
        self.base_vision + Self::mod_sum(&self.vision_mods)
    }

    pub fn hearing_range(&self) -> f32 {
        self.base_hearing + Self::mod_sum(&self.hearing_mods)
    }

    fn mod_sum(list: &ModList) -> f32 {
        list.iter().map(|m| m.value).sum()
    }

    /// Append a modifier to the given stat's list. Changing max health
    /// immediately clamps current health down to the new max; it never
    /// raises health.
    pub fn add_modifier(&mut self, stat: Stat, modifier: Modifier) {
        self.list_mut(stat).push(modifier);
        if stat == Stat::MaxHealth {
            self.clamp_health();
        }
    }

    /// Remove one modifier matching `modifier` (value and source) from
    /// the given stat's list. Removing an absent modifier is a usage
    /// error.
    pub fn remove_modifier(&mut self, stat: Stat, modifier: Modifier) -> Result<(), SimError> {
        let list = self.list_mut(stat);
        match list.iter().position(|m| *m == modifier) {
            Some(index) => {
                list.remove(index);
                if stat == Stat::MaxHealth {
                    self.clamp_health();
                }
                Ok(())
            }
            None => Err(SimError::Usage(format!(
                "modifier {modifier:?} not present on {stat:?}"
            ))),
        }
    }

    /// Remove every modifier attributed to `source` across all stats.
    /// Used when unequipping gear or clearing a buff; tolerates a source
    /// with no modifiers.
    pub fn remove_modifiers_from(&mut self, source: EntityId) {
        self.max_health_mods.retain(|m| m.source != source);
        self.speed_mods.retain(|m| m.source != source);
        self.attack_mods.retain(|m| m.source != source);
        self.defense_mods.retain(|m| m.source != source);
        self.vision_mods.retain(|m| m.source != source);
        self.hearing_mods.retain(|m| m.source != source);
        self.clamp_health();
    }

    fn list_mut(&mut self, stat: Stat) -> &mut ModList {
        match stat {
            Stat::MaxHealth => &mut self.max_health_mods,
            Stat::Speed => &mut self.speed_mods,
            Stat::Attack => &mut self.attack_mods,
            Stat::Defense => &mut self.defense_mods,
            Stat::Vision => &mut self.vision_mods,
            Stat::Hearing => &mut self.hearing_mods,
        }
    }

    fn clamp_health(&mut self) {
        self.health = self.health.min(self.max_health());
    }

    /// Apply incoming damage through defense. Effective damage is
    /// `max(0, amount - defense)`; health floors at zero and death is
    /// irreversible.
    pub fn take_damage(&mut self, amount: f32) {
        let effective = (amount - self.defense()).max(0.0);
        self.health = (self.health - effective).max(0.0);
        if self.health == 0.0 {
            self.alive = false;
        }
    }

    /// Restore health up to the derived max. Healing never revives a
    /// dead character.
    pub fn heal(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.health = (self.health + amount).min(self.max_health());
    }
}
