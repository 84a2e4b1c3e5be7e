//! Analytic ground heightfield
//!
//! Hash-based value noise summed over a few octaves gives the open world
//! its rolling ground without storing any terrain data. Sampling is pure:
//! the same (x, z) always yields the same elevation, and the result is
//! finite for every input.

use crate::numeric::finite_or;

/// Hash a lattice point to a pseudo-random value in [0, 1).
fn lattice_hash(x: f32, z: f32) -> f32 {
    let n = (x * 127.1 + z * 311.7).sin() * 43758.5453;
    n.fract().abs()
}

/// Hermite fade curve for noise interpolation.
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise in [0, 1), smooth between lattice points.
fn value_noise(x: f32, z: f32) -> f32 {
    let ix = x.floor();
    let iz = z.floor();
    let fx = x - ix;
    let fz = z - iz;

    let v00 = lattice_hash(ix, iz);
    let v10 = lattice_hash(ix + 1.0, iz);
    let v01 = lattice_hash(ix, iz + 1.0);
    let v11 = lattice_hash(ix + 1.0, iz + 1.0);

    let sx = fade(fx);
    let sz = fade(fz);

    let v0 = v00 + sx * (v10 - v00);
    let v1 = v01 + sx * (v11 - v01);

    v0 + sz * (v1 - v0)
}

/// Fractal sum of value noise, normalized to [0, 1).
fn rolling_fbm(x: f32, z: f32, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        value += amplitude * value_noise(x * frequency, z * frequency);
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value / max_value
}

/// Pure analytic ground elevation for the open world.
///
/// Two noise bands: broad rolling hills plus a fine detail layer. All
/// elevated structures (roads, floors, ramps) sit above this in the
/// surface index; the heightfield is the fallback every elevation query
/// bottoms out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heightfield {
    /// Base elevation of the world (meters).
    pub base_y: f32,
    /// Peak-to-trough contribution of the hill band (meters).
    pub hill_amplitude: f32,
    /// Spatial frequency of the hill band (cycles per meter).
    pub hill_frequency: f32,
    /// Contribution of the fine detail band (meters).
    pub detail_amplitude: f32,
    /// Spatial frequency of the detail band (cycles per meter).
    pub detail_frequency: f32,
}

impl Default for Heightfield {
    fn default() -> Self {
        Self {
            base_y: 0.0,
            hill_amplitude: 2.4,      // gentle rolling hills
            hill_frequency: 0.015,    // ~65m hill wavelength
            detail_amplitude: 0.35,   // small surface undulation
            detail_frequency: 0.11,
        }
    }
}

impl Heightfield {
    /// A perfectly flat world at the given elevation. Used by tests and
    /// interior scenes where the ground is authored, not generated.
    pub fn flat(y: f32) -> Self {
        Self {
            base_y: y,
            hill_amplitude: 0.0,
            hill_frequency: 0.0,
            detail_amplitude: 0.0,
            detail_frequency: 0.0,
        }
    }

    /// Sample the ground elevation at a horizontal position.
    ///
    /// Non-finite coordinates are coerced to the origin rather than
    /// propagated, so the result is always finite.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let x = finite_or(x, 0.0);
        let z = finite_or(z, 0.0);

        let mut height = self.base_y;
        if self.hill_amplitude > 0.0 {
            let n = rolling_fbm(x * self.hill_frequency, z * self.hill_frequency, 3);
            height += (n - 0.5) * 2.0 * self.hill_amplitude;
        }
        if self.detail_amplitude > 0.0 {
            let n = rolling_fbm(
                x * self.detail_frequency + 200.0,
                z * self.detail_frequency + 200.0,
                2,
            );
            height += (n - 0.5) * 2.0 * self.detail_amplitude;
        }
        height
    }
}
