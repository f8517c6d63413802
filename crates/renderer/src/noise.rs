//! CPU mirror of the cloud fragment shader.
//!
//! Every function here follows the GLSL in [`crate::shaders::FRAGMENT_SHADER_GLSL`]
//! operation for operation in `f32`, so the shader's behaviour can be checked
//! without a GPU. Keep the two in sync when either changes.

/// Frequency applied to texture coordinates before the first octave.
pub const BASE_FREQUENCY: f32 = 5.0;
/// Horizontal drift of the base octave per unit of `cloud_shift`.
pub const BASE_DRIFT: f32 = 0.15;
/// Offset of the second octave per unit of `cloud_shift`.
pub const SECOND_OCTAVE_DRIFT: f32 = 0.05;
/// Offset of the third octave per unit of `cloud_shift`.
pub const THIRD_OCTAVE_DRIFT: f32 = 0.1;
/// Summed noise below this value is clear sky.
pub const COVERAGE_LOW: f32 = 0.3;
/// Summed noise above this value is solid cover.
pub const COVERAGE_HIGH: f32 = 1.0;

pub const CLOUD_COLOR: [f32; 3] = [0.97, 0.97, 0.97];
pub const SKY_COLOR: [f32; 3] = [0.602, 0.808, 0.980];

const HASH_Y_WEIGHT: f32 = 57.0;
const HASH_SCALE: f32 = 43758.5453;

/// GLSL `fract`: `x - floor(x)`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mix`, written as `a * (1 - t) + b * t` so both endpoints are exact.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// GLSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in `[0, 1)` assigned to the lattice point `(x, y)`.
#[inline]
pub fn lattice_hash(x: f32, y: f32) -> f32 {
    let h = x * 1.0 + y * HASH_Y_WEIGHT + 1.0;
    fract(h.sin() * HASH_SCALE)
}

/// Smoothly interpolated value noise at `(x, y)`.
pub fn value_noise(x: f32, y: f32) -> f32 {
    let ix = x.floor();
    let iy = y.floor();
    let fx = smoothstep(0.0, 1.0, fract(x));
    let fy = smoothstep(0.0, 1.0, fract(y));

    let a = lattice_hash(ix, iy);
    let b = lattice_hash(ix + 1.0, iy);
    let c = lattice_hash(ix, iy + 1.0);
    let d = lattice_hash(ix + 1.0, iy + 1.0);

    mix(mix(a, b, fx), mix(c, d, fx), fy)
}

/// Sum of the three octaves for a texture coordinate at a given shift.
///
/// Each octave derives its own offset from `cloud_shift`; the layers drift at
/// different rates on purpose.
pub fn cloud_density(uv: [f32; 2], cloud_shift: f32) -> f32 {
    let sx = uv[0] * BASE_FREQUENCY + cloud_shift * BASE_DRIFT;
    let sy = uv[1] * BASE_FREQUENCY;

    let second = cloud_shift * SECOND_OCTAVE_DRIFT;
    let third = cloud_shift * THIRD_OCTAVE_DRIFT;

    let n = value_noise(sx, sy);
    let n1 = value_noise(sx * 2.0 - second, sy * 2.0 - second) * 0.5;
    let n2 = value_noise(sx * 4.0 - third, sy * 4.0 - third) * 0.25;
    n + (n1 + n2)
}

/// Maps summed noise to the `[0, 1]` blend weight towards the sky color.
#[inline]
pub fn cloud_coverage(density: f32) -> f32 {
    smoothstep(COVERAGE_LOW, COVERAGE_HIGH, density)
}

/// Blends cloud and sky colors; `0` is all cloud, `1` is all sky.
pub fn composite(coverage: f32) -> [f32; 3] {
    [
        mix(CLOUD_COLOR[0], SKY_COLOR[0], coverage),
        mix(CLOUD_COLOR[1], SKY_COLOR[1], coverage),
        mix(CLOUD_COLOR[2], SKY_COLOR[2], coverage),
    ]
}

/// Final RGBA written by the fragment shader for `uv` at `cloud_shift`.
pub fn cloud_color(uv: [f32; 2], cloud_shift: f32) -> [f32; 4] {
    let [r, g, b] = composite(cloud_coverage(cloud_density(uv, cloud_shift)));
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_coordinates_return_corner_hash() {
        for y in -4..4 {
            for x in -4..4 {
                let (fx, fy) = (x as f32, y as f32);
                assert_eq!(value_noise(fx, fy), lattice_hash(fx, fy), "corner ({x}, {y})");
            }
        }
    }

    #[test]
    fn noise_is_deterministic_and_in_range() {
        for step in 0..200 {
            let x = step as f32 * 0.137 - 7.0;
            let y = step as f32 * 0.291 - 11.0;
            let value = value_noise(x, y);
            assert_eq!(value, value_noise(x, y));
            assert!((0.0..=1.0).contains(&value), "value {value} at ({x}, {y})");
        }
    }

    #[test]
    fn noise_is_continuous_inside_and_across_cells() {
        let eps = 1.0e-3_f32;
        // Smoothstep's slope peaks at 1.5 and corner values span at most 1.
        let bound = 2.0 * 1.5 * eps + 1.0e-5;
        for step in 0..400 {
            let x = step as f32 * 0.025;
            let y = 3.3 - step as f32 * 0.0125;
            let here = value_noise(x, y);
            let right = value_noise(x + eps, y);
            let up = value_noise(x, y + eps);
            assert!((here - right).abs() <= bound, "x jump at ({x}, {y})");
            assert!((here - up).abs() <= bound, "y jump at ({x}, {y})");
        }

        let before = value_noise(2.0 - 1.0e-4, 0.5);
        let after = value_noise(2.0, 0.5);
        assert!((before - after).abs() <= 1.0e-3);
    }

    #[test]
    fn coverage_clamps_outside_thresholds() {
        assert_eq!(cloud_coverage(-1.0), 0.0);
        assert_eq!(cloud_coverage(0.0), 0.0);
        assert_eq!(cloud_coverage(COVERAGE_LOW), 0.0);
        assert_eq!(cloud_coverage(COVERAGE_HIGH), 1.0);
        assert_eq!(cloud_coverage(1.75), 1.0);
    }

    #[test]
    fn coverage_is_monotonic_between_thresholds() {
        let mut last = cloud_coverage(COVERAGE_LOW);
        for step in 1..=700 {
            let density = COVERAGE_LOW + step as f32 * 0.001;
            let coverage = cloud_coverage(density);
            assert!(coverage >= last, "coverage fell at {density}");
            assert!((0.0..=1.0).contains(&coverage));
            last = coverage;
        }
    }

    #[test]
    fn composite_hits_both_colors_and_midpoint() {
        assert_eq!(composite(0.0), CLOUD_COLOR);
        assert_eq!(composite(1.0), SKY_COLOR);

        let mid = composite(0.5);
        for channel in 0..3 {
            let expected = (CLOUD_COLOR[channel] + SKY_COLOR[channel]) / 2.0;
            assert!((mid[channel] - expected).abs() < 1.0e-6);
        }
    }

    #[test]
    fn cloud_color_is_opaque_and_between_palette_colors() {
        for step in 0..64 {
            let uv = [step as f32 / 63.0, 1.0 - step as f32 / 63.0];
            let color = cloud_color(uv, step as f32 * 0.02);
            assert_eq!(color[3], 1.0);
            for channel in 0..3 {
                let lo = CLOUD_COLOR[channel].min(SKY_COLOR[channel]) - 1.0e-6;
                let hi = CLOUD_COLOR[channel].max(SKY_COLOR[channel]) + 1.0e-6;
                assert!((lo..=hi).contains(&color[channel]));
            }
        }
    }

    #[test]
    fn shifting_moves_the_field() {
        let uv = [0.31, 0.62];
        let still = cloud_density(uv, 0.0);
        let moved = cloud_density(uv, 10.0);
        assert_ne!(still, moved);
        assert_eq!(cloud_density(uv, 10.0), moved);
    }
}
