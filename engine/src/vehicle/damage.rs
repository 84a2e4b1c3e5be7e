//! Vehicle destruction lifecycle
//!
//! Damage drives a one-way stage machine:
//!
//! ```text
//! intact -> critical -> burning -> exploded -> wreck -> (intact)
//! ```
//!
//! Critical vehicles detonate after a randomized delay, burn for a
//! randomized duration, then explode exactly once and settle into a
//! wreck, which may respawn intact after the archetype's respawn delay.
//! The randomized delays stagger simultaneous destructions so chained
//! explosions resolve over several frames instead of all at once.
//!
//! Each stage variant carries only the timestamps it needs, so invalid
//! combinations (a wreck with a burn timer) cannot be represented. Delay
//! draws go through an injected RNG; a seeded fleet replays the same
//! destruction timeline every run.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::numeric::finite_or;

use super::explosion::{ExplosionEvent, ExplosionQueue};
use super::Vehicle;

/// Health ratio at or below which a vehicle turns critical.
pub const CRITICAL_HEALTH_RATIO: f32 = 0.25;

/// Health ratio restored when a wreck respawns intact.
pub const RESPAWN_HEALTH_RATIO: f32 = 0.72;

/// Normal critical-to-burning delay range (seconds).
const CRITICAL_DELAY_MIN: f64 = 0.7;
const CRITICAL_DELAY_MAX: f64 = 1.8;

/// Shortened delay when the blow was fatal outright or chained from
/// another explosion.
const IMMEDIATE_DELAY_MIN: f64 = 0.12;
const IMMEDIATE_DELAY_MAX: f64 = 0.24;

/// Burn duration range (seconds).
const BURN_DURATION_MIN: f64 = 1.4;
const BURN_DURATION_MAX: f64 = 2.6;

/// Shorter burn for chain-triggered destructions.
const CHAIN_BURN_MIN: f64 = 0.9;
const CHAIN_BURN_MAX: f64 = 1.6;

/// Fixed pause between the explosion and the settled wreck (seconds).
const WRECK_DELAY: f64 = 0.35;

const_assert!(CRITICAL_HEALTH_RATIO > 0.0 && CRITICAL_HEALTH_RATIO < 1.0);
const_assert!(RESPAWN_HEALTH_RATIO > CRITICAL_HEALTH_RATIO && RESPAWN_HEALTH_RATIO <= 1.0);

/// One stage of the destruction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageStage {
    Intact,
    /// Doomed; detonates at the deadline. `chain_triggered` remembers
    /// whether another explosion caused this, which shortens the burn.
    Critical {
        detonate_at: f64,
        chain_triggered: bool,
    },
    /// On fire and coasting to a stop.
    Burning { burn_until: f64 },
    /// Blast emitted; settling into a wreck.
    Exploded { wreck_at: f64 },
    /// Inert hull. Respawns intact at `respawn_at`, or never if `None`.
    Wreck { respawn_at: Option<f64> },
}

impl DamageStage {
    /// Whether the destruction sequence is past the point of no return.
    /// Damage and repair are both no-ops from here on.
    pub fn is_destroyed(&self) -> bool {
        matches!(
            self,
            DamageStage::Burning { .. } | DamageStage::Exploded { .. } | DamageStage::Wreck { .. }
        )
    }

    /// Whether the driver still has control.
    pub fn accepts_input(&self) -> bool {
        matches!(self, DamageStage::Intact | DamageStage::Critical { .. })
    }

    /// Position of this stage in the lifecycle, for ordering checks.
    pub fn order(&self) -> u8 {
        match self {
            DamageStage::Intact => 0,
            DamageStage::Critical { .. } => 1,
            DamageStage::Burning { .. } => 2,
            DamageStage::Exploded { .. } => 3,
            DamageStage::Wreck { .. } => 4,
        }
    }
}

/// What caused a damage application. Explosion damage chains: it
/// shortens the victim's own detonation timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Collision,
    Fall,
    Explosion,
    Direct,
}

/// Result of a damage application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Health actually subtracted (zero on the no-op path).
    pub applied: f32,
    /// True when the vehicle is already in the destruction sequence or
    /// this blow emptied its health. Weapon code uses this as its single
    /// kill signal.
    pub destroyed: bool,
    pub health: f32,
    pub max_health: f32,
}

/// Why a repair was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairRejection {
    /// Burning, exploded, or wrecked vehicles cannot be repaired.
    Destroyed,
    AlreadyFull,
}

impl Vehicle {
    /// Apply damage at time `now`.
    ///
    /// No-op once the vehicle is burning or beyond: returns
    /// `applied = 0, destroyed = true` and leaves health untouched.
    /// Otherwise health drops (floored at zero) and the vehicle turns
    /// critical when health empties or the ratio falls to the critical
    /// threshold. Fatal and explosion-chained blows draw a much shorter
    /// detonation delay.
    pub fn apply_damage(
        &mut self,
        amount: f32,
        now: f64,
        kind: DamageKind,
        rng: &mut impl Rng,
    ) -> DamageOutcome {
        if self.stage.is_destroyed() {
            return DamageOutcome {
                applied: 0.0,
                destroyed: true,
                health: self.health,
                max_health: self.config.max_health,
            };
        }

        let amount = finite_or(amount, 0.0).max(0.0);
        let applied = amount.min(self.health);
        self.health -= applied;

        let fatal = self.health <= 0.0;
        let chained = kind == DamageKind::Explosion;
        let quick_fuse = fatal || chained;

        match self.stage {
            DamageStage::Intact if fatal || self.health_ratio() <= CRITICAL_HEALTH_RATIO => {
                let (min, max) = if quick_fuse {
                    (IMMEDIATE_DELAY_MIN, IMMEDIATE_DELAY_MAX)
                } else {
                    (CRITICAL_DELAY_MIN, CRITICAL_DELAY_MAX)
                };
                self.stage = DamageStage::Critical {
                    detonate_at: now + rng.gen_range(min..max),
                    chain_triggered: chained,
                };
                debug!(
                    "vehicle {:?} critical at t={:.2} (fatal={}, chained={})",
                    self.id, now, fatal, chained
                );
            }
            DamageStage::Critical {
                detonate_at,
                chain_triggered,
            } if quick_fuse => {
                // A fatal or chained hit on an already-critical vehicle
                // can only bring the detonation forward, never delay it.
                let quick = now + rng.gen_range(IMMEDIATE_DELAY_MIN..IMMEDIATE_DELAY_MAX);
                if quick < detonate_at {
                    self.stage = DamageStage::Critical {
                        detonate_at: quick,
                        chain_triggered: chain_triggered || chained,
                    };
                }
            }
            _ => {}
        }

        DamageOutcome {
            applied,
            destroyed: fatal,
            health: self.health,
            max_health: self.config.max_health,
        }
    }

    /// Advance the destruction lifecycle to time `now`.
    ///
    /// At most one stage transition per call; the per-stage delays are
    /// all longer than a tick, so nothing is ever skipped.
    pub fn advance_damage(&mut self, now: f64, events: &mut ExplosionQueue, rng: &mut impl Rng) {
        match self.stage {
            DamageStage::Critical {
                detonate_at,
                chain_triggered,
            } if now >= detonate_at => {
                self.health = 0.0;
                let (min, max) = if chain_triggered {
                    (CHAIN_BURN_MIN, CHAIN_BURN_MAX)
                } else {
                    (BURN_DURATION_MIN, BURN_DURATION_MAX)
                };
                self.stage = DamageStage::Burning {
                    burn_until: now + rng.gen_range(min..max),
                };
            }
            DamageStage::Burning { burn_until } if now >= burn_until => {
                self.speed = 0.0;
                self.velocity = glam::Vec3::ZERO;
                self.headlights_on = false;
                self.stage = DamageStage::Exploded {
                    wreck_at: now + WRECK_DELAY,
                };
                events.push(ExplosionEvent {
                    vehicle: self.id,
                    origin: self.position,
                    radius: self.config.explosion.radius,
                    max_damage: self.config.explosion.max_damage,
                    vehicle_falloff: self.config.explosion.vehicle_falloff,
                    player_falloff: self.config.explosion.player_falloff,
                    impulse: self.config.explosion.impulse,
                });
                info!(
                    "vehicle {:?} exploded at ({:.1}, {:.1}, {:.1})",
                    self.id, self.position.x, self.position.y, self.position.z
                );
            }
            DamageStage::Exploded { wreck_at } if now >= wreck_at => {
                let respawn_at = if self.config.respawn_delay > 0.0 {
                    Some(now + self.config.respawn_delay)
                } else {
                    None
                };
                self.stage = DamageStage::Wreck { respawn_at };
            }
            DamageStage::Wreck {
                respawn_at: Some(respawn_at),
            } if now >= respawn_at => {
                self.health = self.config.max_health * RESPAWN_HEALTH_RATIO;
                self.stage = DamageStage::Intact;
                self.headlights_on = true;
                debug!("vehicle {:?} respawned at t={:.2}", self.id, now);
            }
            _ => {}
        }
    }

    /// Restore health.
    ///
    /// Rejected once the destruction sequence has started burning and
    /// when already at full health. A critical vehicle can be saved: if
    /// the repaired ratio climbs back above the critical threshold the
    /// stage resets to intact and the detonation timer is discarded.
    pub fn repair(&mut self, amount: f32) -> Result<f32, RepairRejection> {
        if self.stage.is_destroyed() {
            return Err(RepairRejection::Destroyed);
        }
        if self.health >= self.config.max_health {
            return Err(RepairRejection::AlreadyFull);
        }

        let amount = finite_or(amount, 0.0).max(0.0);
        let applied = amount.min(self.config.max_health - self.health);
        self.health += applied;

        if self.health_ratio() > CRITICAL_HEALTH_RATIO {
            self.stage = DamageStage::Intact;
        }

        Ok(applied)
    }
}
