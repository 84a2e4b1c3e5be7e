//! Arcade vehicle integrator
//!
//! Longitudinal speed and yaw integrate from the driver's inputs, then a
//! grip blend drags the world-space velocity toward the commanded
//! heading. Low grip (braking, drifting, loose ground) makes the
//! velocity lag the heading, which is what a slide is. Position is then
//! corrected against the blocking volumes and placed vertically on the
//! navigation surface, and any impact or fall damage is routed through
//! the damage state machine, never applied to health directly.

use rand::Rng;

use crate::collision::{resolve_horizontal, BlockingVolumeSet};
use crate::nav::SurfaceIndex;
use crate::numeric::finite_or;

use super::config::{
    COLLISION_DAMAGE_MIN_PUSH, COLLISION_DAMAGE_MIN_SPEED, FALL_DAMAGE_THRESHOLD,
    HANDBRAKE_MIN_SPEED, HANDBRAKE_MIN_STEER, MAX_TICK_DT, STEER_AUTHORITY_FLOOR,
    STEER_AUTHORITY_FULL_SPEED, VERTICAL_DROP_RATE, VERTICAL_RISE_RATE,
};
use super::damage::{DamageKind, DamageStage};
use super::explosion::ExplosionQueue;
use super::{DriveControls, Vehicle};

/// Proportional speed decay while burning (per second). A burning
/// vehicle coasts to a stop in well under its burn duration.
const BURNING_SPEED_DECAY: f32 = 4.0;

/// Velocity-follows-heading rate multiplier; grip 1.0 closes the gap in
/// roughly an eighth of a second.
const GRIP_BLEND_RATE: f32 = 8.0;

/// Steer magnitude and speed above which braking counts as a deliberate
/// drift rather than a straight-line stop.
const DRIFT_MIN_STEER: f32 = 0.5;
const DRIFT_MIN_SPEED: f32 = 5.5;

impl Vehicle {
    /// Integrate one tick.
    ///
    /// `now` is the fleet clock after this tick's dt was added; damage
    /// deadlines drawn here are relative to it. Damage events raised by
    /// this update (collision scrapes, falls, stage transitions) are
    /// visible to the caller immediately after it returns, and any
    /// explosion lands in `events` before the caller's drain.
    pub fn update(
        &mut self,
        dt: f32,
        controls: &DriveControls,
        surfaces: &SurfaceIndex,
        volumes: &BlockingVolumeSet,
        now: f64,
        events: &mut ExplosionQueue,
        rng: &mut impl Rng,
    ) {
        let dt = finite_or(dt, 0.0).clamp(0.0, MAX_TICK_DT);
        let controls = if self.stage.accepts_input() {
            controls.sanitized()
        } else {
            DriveControls::neutral()
        };
        let entry_speed = self.speed;

        self.integrate_speed(&controls, dt);
        self.integrate_steering(&controls, dt);
        let drifting = self.blend_velocity(&controls, dt);
        self.update_drift_metric(drifting, controls.steer);

        // Horizontal step, then positional correction. The summed
        // correction doubles as the impact signal.
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;
        let bottom_y = self.position.y;
        let top_y = bottom_y + self.config.collision_height;
        let correction = resolve_horizontal(
            &mut self.position,
            self.config.collision_radius,
            bottom_y,
            top_y,
            volumes,
        );
        if entry_speed.abs() > COLLISION_DAMAGE_MIN_SPEED && correction > COLLISION_DAMAGE_MIN_PUSH
        {
            let amount = correction * (6.0 + entry_speed.abs() * 1.7);
            self.apply_damage(amount, now, DamageKind::Collision, rng);
        }

        self.place_vertically(surfaces, entry_speed, now, dt, rng);

        self.advance_damage(now, events, rng);
    }

    /// Longitudinal speed: throttle, brake, or coast, then the caps.
    fn integrate_speed(&mut self, controls: &DriveControls, dt: f32) {
        let config = &self.config;

        if matches!(self.stage, DamageStage::Burning { .. }) {
            self.speed *= 1.0 - (BURNING_SPEED_DECAY * dt).min(1.0);
        } else if controls.brake {
            // Flat deceleration toward zero from either sign.
            let step = config.brake_decel * dt;
            if self.speed.abs() <= step {
                self.speed = 0.0;
            } else {
                self.speed -= self.speed.signum() * step;
            }
        } else if controls.throttle > 0.0 {
            let accel_factor = if controls.boost {
                config.boost_accel_factor
            } else {
                1.0
            };
            self.speed += config.forward_accel * controls.throttle * accel_factor * dt;
        } else if controls.throttle < 0.0 {
            self.speed += config.reverse_accel * controls.throttle * dt;
        } else {
            // Coasting: rolling friction plus proportional drag.
            let step = config.rolling_friction * dt;
            if self.speed.abs() <= step {
                self.speed = 0.0;
            } else {
                self.speed -= self.speed.signum() * step;
            }
            self.speed *= 1.0 - (config.drag * dt).min(1.0);
        }

        let mut forward_cap = config.max_forward_speed;
        if controls.boost {
            forward_cap *= config.boost_speed_factor;
        }
        if matches!(self.stage, DamageStage::Critical { .. }) {
            forward_cap *= config.critical_speed_factor;
        }
        self.speed = self.speed.clamp(-config.max_reverse_speed, forward_cap);
    }

    /// Visual wheel angle plus actual yaw. Steering authority is
    /// dampened near standstill and again near top speed, and reversing
    /// inverts the turn direction.
    fn integrate_steering(&mut self, controls: &DriveControls, dt: f32) {
        let authority = (self.speed.abs() / STEER_AUTHORITY_FULL_SPEED)
            .min(1.0)
            .max(STEER_AUTHORITY_FLOOR);

        let target_angle = controls.steer * self.config.max_steer_angle * authority;
        let ease = (self.config.steer_ease_rate * dt).min(1.0);
        self.steering_angle += (target_angle - self.steering_angle) * ease;

        let speed_norm = (self.speed.abs() / self.config.max_forward_speed).clamp(0.0, 1.0);
        let high_speed_scale = 1.0 - speed_norm * (1.0 - self.config.high_speed_steer_reduction);
        let direction = if self.speed >= 0.0 { 1.0 } else { -1.0 };

        self.yaw +=
            controls.steer * self.config.steer_rate * authority * high_speed_scale * direction * dt;

        // Handbrake turn: one yaw kick per brake press, only when the
        // press lands mid-corner at speed.
        let brake_edge = self.take_brake_edge(controls.brake);
        if brake_edge
            && self.speed.abs() > HANDBRAKE_MIN_SPEED
            && controls.steer.abs() > HANDBRAKE_MIN_STEER
        {
            self.yaw += self.config.handbrake_impulse * controls.steer.signum() * direction;
        }
    }

    /// Drag the world-space velocity toward the commanded heading.
    /// Returns whether the vehicle is actively drifting this tick.
    fn blend_velocity(&mut self, controls: &DriveControls, dt: f32) -> bool {
        let drifting = controls.brake
            && controls.steer.abs() > DRIFT_MIN_STEER
            && self.speed.abs() > DRIFT_MIN_SPEED;

        let mut grip = if drifting {
            self.config.drift_grip
        } else if controls.brake {
            self.config.brake_grip
        } else {
            self.config.base_grip
        };
        grip *= self.surface_grip;

        let target = self.forward() * self.speed;
        let blend = (grip * GRIP_BLEND_RATE * dt).min(1.0);
        self.velocity.x += (target.x - self.velocity.x) * blend;
        self.velocity.z += (target.z - self.velocity.z) * blend;
        self.velocity.y = 0.0;

        drifting
    }

    /// Feedback metric for audio/particles/camera: a clamped blend of
    /// the drift flag, how sideways the velocity is, the traction
    /// deficit of the ground, and the steering magnitude.
    fn update_drift_metric(&mut self, drifting: bool, steer: f32) {
        let forward = self.forward();
        let longitudinal = self.velocity.dot(forward);
        let lateral = (self.velocity - forward * longitudinal).length();
        let slide_ratio = (lateral / longitudinal.abs().max(1.0)).min(1.0);
        let grip_deficit = 1.0 - self.surface_grip;
        let drift_flag = if drifting { 1.0 } else { 0.0 };

        self.drift_intensity = (0.45 * drift_flag
            + 0.3 * slide_ratio
            + 0.15 * grip_deficit
            + 0.1 * steer.abs())
        .clamp(0.0, 1.0);
    }

    /// Move toward the resolved support height with asymmetric rate
    /// caps. The uncapped gap is the fall detector: one latch per fall
    /// so a long descent smoothed over many ticks is charged once.
    fn place_vertically(
        &mut self,
        surfaces: &SurfaceIndex,
        entry_speed: f32,
        now: f64,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        let support = surfaces.resolve_support(self.position.x, self.position.z, self.position.y);
        self.surface_grip = support.grip;

        let gap = support.y - self.position.y;
        if gap >= 0.0 {
            self.position.y += gap.min(VERTICAL_RISE_RATE * dt);
            self.falling = false;
        } else {
            let drop = -gap;
            if drop > FALL_DAMAGE_THRESHOLD {
                if !self.falling {
                    self.falling = true;
                    let amount =
                        (drop - FALL_DAMAGE_THRESHOLD) * (7.0 + entry_speed.abs() * 0.55);
                    self.apply_damage(amount, now, DamageKind::Fall, rng);
                }
            } else {
                self.falling = false;
            }
            self.position.y -= drop.min(VERTICAL_DROP_RATE * dt);
        }
    }
}
