//! Free Roam - headless simulation session
//!
//! Drives the district for a scripted half minute with no renderer
//! attached: spawns the fixed roster, opens the depot gate mid-run,
//! wrecks one vehicle to show the destruction chain, and drains the
//! explosion queue into area damage every tick, in the same order the
//! full client uses.
//!
//! Run with `RUST_LOG=debug` to see the stage transitions.

use glam::Vec3;

use sunset_city_engine::game::save::SaveFile;
use sunset_city_engine::game::world::{World, WorldConfig};
use sunset_city_engine::vehicle::{
    DamageKind, DriveControls, DamageStage, VehicleConfig, VehicleFleet,
};

const TICK: f32 = 1.0 / 60.0;
const SESSION_SECONDS: f32 = 30.0;

fn main() {
    env_logger::init();

    let world = World::build(&WorldConfig::default());
    let mut fleet = VehicleFleet::new(0xC175_EED5);

    let _runabout = fleet.spawn(VehicleConfig::runabout(), Vec3::new(0.0, 0.4, 20.0), 0.0);
    let muscle = fleet.spawn(VehicleConfig::muscle(), Vec3::new(4.0, 0.4, 24.0), 0.0);
    let _hauler = fleet.spawn(VehicleConfig::hauler(), Vec3::new(-6.0, 0.4, 24.0), 0.0);

    println!("free roam session: {} vehicles, 60 Hz, {}s", fleet.len(), SESSION_SECONDS);

    let ticks = (SESSION_SECONDS / TICK) as u32;
    for tick in 0..ticks {
        let t = tick as f32 * TICK;

        // Phase 1: gate and door state. The depot gate starts opening at
        // the five second mark and takes four seconds to slide clear.
        world.depot_gate().set_open(((t - 5.0) / 4.0).clamp(0.0, 1.0));

        // Phase 2: driver inputs. The runabout laps the plaza, the
        // muscle car drag-races the road and brake-turns at the far end,
        // the hauler idles.
        let controls = [
            DriveControls {
                throttle: 1.0,
                steer: 0.35,
                ..DriveControls::neutral()
            },
            DriveControls {
                throttle: 1.0,
                steer: if t > 12.0 { 0.8 } else { 0.0 },
                brake: t > 12.0 && t < 13.0,
                boost: t < 10.0,
            },
            DriveControls::neutral(),
        ];

        // A roadside charge wrecks the muscle car mid-session.
        if tick == (18.0 / TICK) as u32 {
            if let Some(outcome) = fleet.apply_damage(muscle, 500.0, DamageKind::Direct) {
                println!(
                    "t={:5.2}  charge detonated under vehicle {:?}: applied {:.0}, destroyed {}",
                    t, muscle, outcome.applied, outcome.destroyed
                );
            }
        }

        // Phase 3: movement resolution for every vehicle.
        fleet.update(TICK, &controls, world.surfaces(), world.volumes());

        // Phase 4: drain this tick's explosions into area damage so
        // chained destructions resolve on the same frame they happen.
        for explosion in fleet.consume_explosion_events() {
            println!(
                "t={:5.2}  vehicle {:?} exploded (radius {:.1}, max damage {:.0})",
                fleet.now(),
                explosion.vehicle,
                explosion.radius,
                explosion.max_damage
            );
            let victims: Vec<_> = fleet
                .iter()
                .filter(|v| v.id != explosion.vehicle)
                .map(|v| (v.id, v.position))
                .collect();
            for (id, position) in victims {
                let distance = (position - explosion.origin).length();
                if distance < explosion.radius {
                    let falloff = 1.0 - distance / explosion.radius;
                    let amount = explosion.max_damage * falloff * explosion.vehicle_falloff;
                    fleet.apply_damage(id, amount, DamageKind::Explosion);
                }
            }
        }

        if tick % (5.0 / TICK) as u32 == 0 {
            for vehicle in fleet.iter() {
                println!(
                    "t={:5.2}  {:?} pos ({:6.1}, {:4.1}, {:6.1}) speed {:5.1} health {:5.1} stage {}",
                    t,
                    vehicle.id,
                    vehicle.position.x,
                    vehicle.position.y,
                    vehicle.position.z,
                    vehicle.speed,
                    vehicle.health,
                    stage_name(&vehicle.stage),
                );
            }
        }
    }

    println!("\nfinal state after {:.0}s:", SESSION_SECONDS);
    for vehicle in fleet.iter() {
        println!(
            "  {:?}: health {:5.1}/{:5.1}, stage {}, drift {:.2}, grip {:.2}",
            vehicle.id,
            vehicle.health,
            vehicle.config.max_health,
            stage_name(&vehicle.stage),
            vehicle.drift_intensity,
            vehicle.surface_grip(),
        );
    }

    // Persist the roster the way the save system does each autosave.
    let save = SaveFile::capture(fleet.iter());
    match save.to_json() {
        Ok(json) => println!("\nsave snapshot: {} bytes of JSON", json.len()),
        Err(err) => eprintln!("save failed: {}", err),
    }
}

fn stage_name(stage: &DamageStage) -> &'static str {
    match stage {
        DamageStage::Intact => "intact",
        DamageStage::Critical { .. } => "critical",
        DamageStage::Burning { .. } => "burning",
        DamageStage::Exploded { .. } => "exploded",
        DamageStage::Wreck { .. } => "wreck",
    }
}
