//! Weapon state machine: ammo, reload timer, fire-mode cycling.
//!
//! The component only enforces ammo and reload gating; actually spawning
//! a bullet goes through [`crate::systems::weapon::fire`] so the new
//! projectile is registered with the entity index. AUTO-mode cadence is
//! the external controller's job: it must issue repeated fire calls at
//! `1 / firing_rate` intervals while the trigger is held.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use crate::components::stats::Modifier;
use crate::error::SimError;
use crate::registry::EntityId;

/// Firing-cadence policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireMode {
    Single,
    Auto,
    Burst,
}

/// Reload state machine. Initial state is `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadState {
    Ready,
    Reloading,
}

/// Tunable weapon stats that accept modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponStat {
    FiringRange,
    BulletSpeed,
    AttackPower,
    ReloadTime,
}

type ModList = SmallVec<[Modifier; 2]>;

#[derive(Component, Debug, Clone)]
pub struct Weapon {
    base_firing_range: f32,
    base_bullet_speed: f32,
    base_attack_power: f32,
    base_reload_time: f32,
    firing_rate: f32,
    magazine_capacity: u32,
    current_ammo: u32,
    fire_modes: ArrayVec<FireMode, 3>,
    mode_index: usize,
    state: ReloadState,
    reload_timer: f32,
    firing_range_mods: ModList,
    bullet_speed_mods: ModList,
    attack_power_mods: ModList,
    reload_time_mods: ModList,
    /// Weak handle to the character carrying this weapon; used to
    /// exclude the shooter from its own bullets' collision scans.
    pub owner: Option<EntityId>,
}

impl Weapon {
    pub fn new(
        firing_range: f32,
        bullet_speed: f32,
        attack_power: f32,
        reload_time: f32,
        firing_rate: f32,
        magazine_capacity: u32,
        fire_modes: &[FireMode],
    ) -> Self {
        let mut modes: ArrayVec<FireMode, 3> = ArrayVec::new();
        for mode in fire_modes.iter().take(3) {
            if !modes.contains(mode) {
                modes.push(*mode);
            }
        }
        if modes.is_empty() {
            modes.push(FireMode::Single);
        }
        Self {
            base_firing_range: firing_range,
            base_bullet_speed: bullet_speed,
            base_attack_power: attack_power,
            base_reload_time: reload_time,
            firing_rate,
            magazine_capacity,
            current_ammo: magazine_capacity,
            fire_modes: modes,
            mode_index: 0,
            state: ReloadState::Ready,
            reload_timer: 0.0,
            firing_range_mods: SmallVec::new(),
            bullet_speed_mods: SmallVec::new(),
            attack_power_mods: SmallVec::new(),
            reload_time_mods: SmallVec::new(),
            owner: None,
        }
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn magazine_capacity(&self) -> u32 {
        self.magazine_capacity
    }

    pub fn firing_rate(&self) -> f32 {
        self.firing_rate
    }

    pub fn firing_range(&self) -> f32 {
        self.base_firing_range + Self::mod_sum(&self.firing_range_mods)
    }

    pub fn bullet_speed(&self) -> f32 {
        self.base_bullet_speed + Self::mod_sum(&self.bullet_speed_mods)
    }

    pub fn attack_power(&self) -> f32 {
        self.base_attack_power + Self::mod_sum(&self.attack_power_mods)
    }

    pub fn reload_time(&self) -> f32 {
        self.base_reload_time + Self::mod_sum(&self.reload_time_mods)
    }

    fn mod_sum(list: &ModList) -> f32 {
        list.iter().map(|m| m.value).sum()
    }

    pub fn add_modifier(&mut self, stat: WeaponStat, modifier: Modifier) {
        self.list_mut(stat).push(modifier);
    }

    /// Remove one matching modifier; removing an absent one is a usage
    /// error, same as on [`StatBlock`](super::stats::StatBlock).
    pub fn remove_modifier(&mut self, stat: WeaponStat, modifier: Modifier) -> Result<(), SimError> {
        let list = self.list_mut(stat);
        match list.iter().position(|m| *m == modifier) {
            Some(index) => {
                list.remove(index);
                Ok(())
            }
            None => Err(SimError::Usage(format!(
                "modifier {modifier:?} not present on {stat:?}"
            ))),
        }
    }

    fn list_mut(&mut self, stat: WeaponStat) -> &mut ModList {
        match stat {
            WeaponStat::FiringRange => &mut self.firing_range_mods,
            WeaponStat::BulletSpeed => &mut self.bullet_speed_mods,
            WeaponStat::AttackPower => &mut self.attack_power_mods,
            WeaponStat::ReloadTime => &mut self.reload_time_mods,
        }
    }

    pub fn current_fire_mode(&self) -> FireMode {
        self.fire_modes[self.mode_index]
    }

    pub fn available_fire_modes(&self) -> &[FireMode] {
        &self.fire_modes
    }

    /// Advance to the next supported fire mode, wrapping around.
    pub fn cycle_fire_mode(&mut self) {
        self.mode_index = (self.mode_index + 1) % self.fire_modes.len();
    }

    /// Select a specific fire mode. Unsupported modes are a defined
    /// no-op, not an error.
    pub fn set_fire_mode(&mut self, mode: FireMode) {
        if let Some(index) = self.fire_modes.iter().position(|m| *m == mode) {
            self.mode_index = index;
        }
    }

    /// Whether a fire call would currently be allowed through the gate.
    pub fn can_fire(&self) -> bool {
        self.state == ReloadState::Ready && self.current_ammo > 0
    }

    /// Begin reloading. No-op when already reloading.
    pub fn start_reload(&mut self) {
        if self.state == ReloadState::Reloading {
            return;
        }
        self.reload_timer = 0.0;
        self.state = ReloadState::Reloading;
    }

    /// Spend one round. Caller must have checked [`Self::can_fire`].
    /// Hitting zero ammo transitions straight into reloading.
    pub(crate) fn consume_round(&mut self) {
        debug_assert!(self.current_ammo > 0);
        self.current_ammo -= 1;
        if self.current_ammo == 0 {
            self.start_reload();
        }
    }

    /// Advance the reload timer. Once it reaches the derived reload
    /// time, the magazine is restocked to capacity and the weapon
    /// returns to `Ready`. Returns true on the tick the reload finishes.
    pub fn tick_reload(&mut self, dt: f32) -> bool {
        if self.state != ReloadState::Reloading {
            return false;
        }
        self.reload_timer += dt;
        if self.reload_timer >= self.reload_time() {
            self.current_ammo = self.magazine_capacity;
            self.reload_timer = 0.0;
            self.state = ReloadState::Ready;
            return true;
        }
        false
    }
}
