//! Vehicle archetype tuning
//!
//! All the numbers that make one vehicle feel different from another live
//! here, plus the tick constants shared by every archetype. Defaults
//! match the runabout; the other archetype constructors adjust from it.

/// Hard ceiling on one integration step (seconds). Frame hitches are
/// clamped to this so integration error stays bounded.
pub const MAX_TICK_DT: f32 = 0.05;

/// How fast a vehicle may visually rise to a higher support surface
/// (meters per second).
pub const VERTICAL_RISE_RATE: f32 = 12.0;

/// How fast a vehicle may drop toward a lower support surface (meters
/// per second). Faster than the rise rate so falls read as falls.
pub const VERTICAL_DROP_RATE: f32 = 18.0;

/// Uncapped drop distance beyond which fall damage applies (meters).
pub const FALL_DAMAGE_THRESHOLD: f32 = 1.8;

/// Minimum speed for wall scrapes to deal collision damage.
pub const COLLISION_DAMAGE_MIN_SPEED: f32 = 2.5;

/// Corrections below this are positional noise, not impacts.
pub const COLLISION_DAMAGE_MIN_PUSH: f32 = 0.01;

/// Speed above which a brake-turn triggers the handbrake yaw impulse.
pub const HANDBRAKE_MIN_SPEED: f32 = 4.8;

/// Steer magnitude above which a brake-turn triggers the handbrake yaw
/// impulse.
pub const HANDBRAKE_MIN_STEER: f32 = 0.15;

/// Low-speed steering authority floor and the speed at which full
/// authority is reached.
pub const STEER_AUTHORITY_FLOOR: f32 = 0.28;
pub const STEER_AUTHORITY_FULL_SPEED: f32 = 2.4;

/// Explosion parameters carried by each archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionConfig {
    /// Blast radius (meters).
    pub radius: f32,
    /// Damage at the blast origin.
    pub max_damage: f32,
    /// Multiplier applied to chained vehicle damage.
    pub vehicle_falloff: f32,
    /// Multiplier applied to player damage.
    pub player_falloff: f32,
    /// Knockback impulse magnitude at the origin.
    pub impulse: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            radius: 9.0,
            max_damage: 95.0,
            vehicle_falloff: 0.85,
            player_falloff: 0.6,
            impulse: 14.0,
        }
    }
}

/// Per-archetype tuning for the vehicle integrator and damage lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleConfig {
    /// Forward acceleration at full throttle (m/s^2).
    pub forward_accel: f32,
    /// Reverse acceleration at full negative throttle (m/s^2).
    pub reverse_accel: f32,
    /// Flat deceleration while braking (m/s^2).
    pub brake_decel: f32,
    /// Flat speed decay while coasting (m/s^2).
    pub rolling_friction: f32,
    /// Proportional speed decay while coasting (per second).
    pub drag: f32,
    /// Top forward speed (m/s).
    pub max_forward_speed: f32,
    /// Top reverse speed (m/s, positive number).
    pub max_reverse_speed: f32,
    /// Acceleration multiplier while boosting.
    pub boost_accel_factor: f32,
    /// Top-speed multiplier while boosting.
    pub boost_speed_factor: f32,
    /// Top-speed multiplier while the damage stage is critical.
    pub critical_speed_factor: f32,
    /// Yaw authority (radians per second at full steer).
    pub steer_rate: f32,
    /// Maximum visual wheel angle (radians).
    pub max_steer_angle: f32,
    /// Easing rate of the visual wheel angle (per second).
    pub steer_ease_rate: f32,
    /// Fraction of yaw authority remaining at top speed.
    pub high_speed_steer_reduction: f32,
    /// Instant yaw kick on a handbrake turn (radians).
    pub handbrake_impulse: f32,
    /// Velocity-follows-heading rate in normal driving.
    pub base_grip: f32,
    /// Grip while braking.
    pub brake_grip: f32,
    /// Grip while actively drifting.
    pub drift_grip: f32,
    /// Horizontal collision radius (meters).
    pub collision_radius: f32,
    /// Vertical collision extent above the wheels (meters).
    pub collision_height: f32,
    /// Durability ceiling.
    pub max_health: f32,
    /// Blast parameters on destruction.
    pub explosion: ExplosionConfig,
    /// Seconds a wreck waits before respawning intact. Zero means the
    /// wreck never respawns.
    pub respawn_delay: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self::runabout()
    }
}

impl VehicleConfig {
    /// Light city car: quick steering, modest top speed.
    pub fn runabout() -> Self {
        Self {
            forward_accel: 9.5,
            reverse_accel: 6.0,
            brake_decel: 16.0,
            rolling_friction: 2.2,
            drag: 0.35,
            max_forward_speed: 17.0,
            max_reverse_speed: 6.5,
            boost_accel_factor: 1.95,
            boost_speed_factor: 1.75,
            critical_speed_factor: 0.62,
            steer_rate: 1.9,
            max_steer_angle: 0.55, // ~31 degrees
            steer_ease_rate: 9.0,
            high_speed_steer_reduction: 0.45,
            handbrake_impulse: 0.5,
            base_grip: 0.9,
            brake_grip: 0.55,
            drift_grip: 0.3,
            collision_radius: 0.85,
            collision_height: 1.6,
            max_health: 140.0,
            explosion: ExplosionConfig::default(),
            respawn_delay: 25.0,
        }
    }

    /// Muscle car: more power, heavier steering, slides earlier.
    pub fn muscle() -> Self {
        Self {
            forward_accel: 12.5,
            brake_decel: 14.0,
            max_forward_speed: 24.0,
            steer_rate: 1.6,
            high_speed_steer_reduction: 0.35,
            base_grip: 0.8,
            drift_grip: 0.24,
            handbrake_impulse: 0.65,
            max_health: 160.0,
            explosion: ExplosionConfig {
                radius: 10.5,
                max_damage: 110.0,
                impulse: 17.0,
                ..ExplosionConfig::default()
            },
            ..Self::runabout()
        }
    }

    /// Cargo hauler: slow, tough, wide turning circle, big blast.
    pub fn hauler() -> Self {
        Self {
            forward_accel: 5.5,
            reverse_accel: 4.0,
            brake_decel: 11.0,
            max_forward_speed: 12.5,
            max_reverse_speed: 5.0,
            steer_rate: 1.1,
            max_steer_angle: 0.42,
            handbrake_impulse: 0.3,
            base_grip: 0.95,
            collision_radius: 1.3,
            collision_height: 2.4,
            max_health: 260.0,
            explosion: ExplosionConfig {
                radius: 13.0,
                max_damage: 150.0,
                vehicle_falloff: 0.95,
                impulse: 22.0,
                ..ExplosionConfig::default()
            },
            respawn_delay: 40.0,
            ..Self::runabout()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runabout_defaults() {
        let config = VehicleConfig::runabout();
        assert_eq!(config.collision_radius, 0.85);
        assert_eq!(config.boost_speed_factor, 1.75);
        assert_eq!(config.critical_speed_factor, 0.62);
        assert!(config.max_health > 0.0);
    }

    #[test]
    fn test_archetypes_differ() {
        let runabout = VehicleConfig::runabout();
        let muscle = VehicleConfig::muscle();
        let hauler = VehicleConfig::hauler();

        assert!(muscle.max_forward_speed > runabout.max_forward_speed);
        assert!(hauler.max_health > muscle.max_health);
        assert!(hauler.steer_rate < runabout.steer_rate);
    }

    #[test]
    fn test_tick_constants_sane() {
        assert!(MAX_TICK_DT > 0.0 && MAX_TICK_DT <= 0.1);
        assert!(VERTICAL_DROP_RATE > VERTICAL_RISE_RATE);
        assert!(FALL_DAMAGE_THRESHOLD > 0.0);
    }
}
