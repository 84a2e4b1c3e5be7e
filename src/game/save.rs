//! Save-File Persistence
//!
//! Serializes the vehicle state the rest of the save system does not
//! own: pose, motion, durability, and the full damage stage with its
//! deadlines, so a reloaded game resumes mid-destruction correctly.
//!
//! Loading never rejects a corrupt value. Non-finite numbers fall back,
//! out-of-range health clamps, and bad deadlines reset, so the worst a
//! damaged save produces is an approximate-but-valid vehicle.

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numeric::{finite_or, finite_or_f64};
use crate::vehicle::{DamageStage, Vehicle};

/// Bumped when the snapshot shape changes.
pub const SAVE_VERSION: u32 = 1;

/// Failure reading or parsing a save file. Value-level corruption is not
/// an error; it is sanitized away on apply.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save io: {0}")]
    Io(#[from] std::io::Error),
    #[error("save parse: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted per-vehicle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub position: Vec3,
    pub yaw: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Respawn timestamp for wrecked vehicles, mirrored out of the stage
    /// for save systems that only want the one number.
    pub destroyed_until: Option<f64>,
    pub stage: DamageStage,
}

impl VehicleSnapshot {
    /// Capture a vehicle's persisted fields.
    pub fn capture(vehicle: &Vehicle) -> Self {
        let destroyed_until = match vehicle.stage {
            DamageStage::Wreck { respawn_at } => respawn_at,
            _ => None,
        };
        Self {
            position: vehicle.position,
            yaw: vehicle.yaw,
            speed: vehicle.speed,
            health: vehicle.health,
            max_health: vehicle.config.max_health,
            destroyed_until,
            stage: vehicle.stage,
        }
    }

    /// Restore this snapshot onto a vehicle, sanitizing every value.
    ///
    /// `now` is the simulation clock of the loading session; stale or
    /// corrupt stage deadlines are rebuilt relative to it.
    pub fn apply(&self, vehicle: &mut Vehicle, now: f64) {
        let fallback = vehicle.position;
        vehicle.position = Vec3::new(
            finite_or(self.position.x, fallback.x),
            finite_or(self.position.y, fallback.y),
            finite_or(self.position.z, fallback.z),
        );
        vehicle.yaw = finite_or(self.yaw, 0.0);

        let max_health = finite_or(self.max_health, vehicle.config.max_health);
        if max_health > 0.0 {
            vehicle.config.max_health = max_health;
        }
        vehicle.health = finite_or(self.health, 0.0).clamp(0.0, vehicle.config.max_health);

        vehicle.stage = sanitize_stage(self.stage, now);
        vehicle.headlights_on = !matches!(
            vehicle.stage,
            DamageStage::Exploded { .. } | DamageStage::Wreck { .. }
        );

        // A destroyed vehicle never resumes moving.
        if vehicle.stage.is_destroyed() {
            vehicle.speed = 0.0;
            vehicle.velocity = Vec3::ZERO;
        } else {
            vehicle.speed = finite_or(self.speed, 0.0)
                .clamp(-vehicle.config.max_reverse_speed, vehicle.config.max_forward_speed);
            vehicle.velocity = vehicle.forward() * vehicle.speed;
        }
    }
}

/// Rebuild a persisted stage with valid, future-relative deadlines.
fn sanitize_stage(stage: DamageStage, now: f64) -> DamageStage {
    match stage {
        DamageStage::Intact => DamageStage::Intact,
        DamageStage::Critical {
            detonate_at,
            chain_triggered,
        } => {
            let detonate_at = finite_or_f64(detonate_at, now);
            DamageStage::Critical {
                // A deadline from before this session's clock began
                // detonates promptly rather than retroactively.
                detonate_at: detonate_at.max(now),
                chain_triggered,
            }
        }
        DamageStage::Burning { burn_until } => DamageStage::Burning {
            burn_until: finite_or_f64(burn_until, now).max(now),
        },
        DamageStage::Exploded { wreck_at } => DamageStage::Exploded {
            wreck_at: finite_or_f64(wreck_at, now).max(now),
        },
        DamageStage::Wreck { respawn_at } => DamageStage::Wreck {
            respawn_at: respawn_at.map(|t| finite_or_f64(t, now).max(now)),
        },
    }
}

/// Top-level save payload for the vehicle roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub vehicles: Vec<VehicleSnapshot>,
}

impl SaveFile {
    /// Snapshot every vehicle in spawn order.
    pub fn capture<'a>(vehicles: impl Iterator<Item = &'a Vehicle>) -> Self {
        Self {
            version: SAVE_VERSION,
            vehicles: vehicles.map(VehicleSnapshot::capture).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let file: Self = serde_json::from_str(json)?;
        if file.version != SAVE_VERSION {
            warn!(
                "save version {} differs from current {}; loading anyway",
                file.version, SAVE_VERSION
            );
        }
        Ok(file)
    }

    pub fn write_file(&self, path: &std::path::Path) -> Result<(), SaveError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_file(path: &std::path::Path) -> Result<Self, SaveError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{VehicleConfig, VehicleId};

    fn test_vehicle() -> Vehicle {
        Vehicle::new(
            VehicleId(0),
            VehicleConfig::runabout(),
            Vec3::new(3.0, 0.4, -7.0),
            1.25,
        )
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let mut vehicle = test_vehicle();
        vehicle.health = 55.0;
        vehicle.speed = 8.0;
        vehicle.stage = DamageStage::Critical {
            detonate_at: 12.5,
            chain_triggered: false,
        };

        let json = SaveFile::capture(std::iter::once(&vehicle))
            .to_json()
            .expect("serialize");
        let loaded = SaveFile::from_json(&json).expect("parse");

        let mut restored = test_vehicle();
        loaded.vehicles[0].apply(&mut restored, 10.0);

        assert_eq!(restored.position, vehicle.position);
        assert_eq!(restored.yaw, vehicle.yaw);
        assert_eq!(restored.health, 55.0);
        assert_eq!(
            restored.stage,
            DamageStage::Critical {
                detonate_at: 12.5,
                chain_triggered: false,
            }
        );
    }

    #[test]
    fn test_non_finite_values_sanitized() {
        let snapshot = VehicleSnapshot {
            position: Vec3::new(f32::NAN, 2.0, f32::INFINITY),
            yaw: f32::NAN,
            speed: f32::NEG_INFINITY,
            health: f32::NAN,
            max_health: f32::NAN,
            destroyed_until: None,
            stage: DamageStage::Intact,
        };

        let mut vehicle = test_vehicle();
        let original_position = vehicle.position;
        snapshot.apply(&mut vehicle, 0.0);

        assert_eq!(vehicle.position.x, original_position.x);
        assert_eq!(vehicle.position.y, 2.0);
        assert_eq!(vehicle.position.z, original_position.z);
        assert_eq!(vehicle.yaw, 0.0);
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.health, 0.0);
        assert_eq!(vehicle.config.max_health, VehicleConfig::runabout().max_health);
    }

    #[test]
    fn test_health_clamped_into_bounds() {
        let snapshot = VehicleSnapshot {
            position: Vec3::ZERO,
            yaw: 0.0,
            speed: 0.0,
            health: 9_999.0,
            max_health: 140.0,
            destroyed_until: None,
            stage: DamageStage::Intact,
        };

        let mut vehicle = test_vehicle();
        snapshot.apply(&mut vehicle, 0.0);
        assert_eq!(vehicle.health, 140.0);
    }

    #[test]
    fn test_stale_deadline_pulled_to_now() {
        let snapshot = VehicleSnapshot {
            position: Vec3::ZERO,
            yaw: 0.0,
            speed: 0.0,
            health: 0.0,
            max_health: 140.0,
            destroyed_until: None,
            stage: DamageStage::Critical {
                detonate_at: -50.0,
                chain_triggered: false,
            },
        };

        let mut vehicle = test_vehicle();
        snapshot.apply(&mut vehicle, 4.0);
        match vehicle.stage {
            DamageStage::Critical { detonate_at, .. } => assert_eq!(detonate_at, 4.0),
            other => panic!("expected critical, got {:?}", other),
        }
    }

    #[test]
    fn test_wrecked_snapshot_restores_immobile() {
        let snapshot = VehicleSnapshot {
            position: Vec3::new(1.0, 0.4, 1.0),
            yaw: 0.5,
            speed: 12.0,
            health: 0.0,
            max_health: 140.0,
            destroyed_until: Some(90.0),
            stage: DamageStage::Wreck {
                respawn_at: Some(90.0),
            },
        };

        let mut vehicle = test_vehicle();
        snapshot.apply(&mut vehicle, 10.0);

        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.velocity, Vec3::ZERO);
        assert!(!vehicle.headlights_on);
        assert_eq!(
            vehicle.stage,
            DamageStage::Wreck {
                respawn_at: Some(90.0),
            }
        );
    }

    #[test]
    fn test_garbage_json_is_an_error() {
        assert!(SaveFile::from_json("{not json").is_err());
    }
}
