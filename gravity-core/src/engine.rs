//! One fixed-size step of the N-body toy.
//!
//! A step runs four phases in order:
//! 1. [`force_phase`] - all-pairs gravity, accumulated per body into a
//!    [`ForceBuffer`] from the pre-step positions.
//! 2. [`integration_phase`] - semi-implicit Euler: velocity first, then
//!    position from the new velocity.
//! 3. [`boundary_phase`] - clamp positions into the padded canvas and
//!    report whether anything touched a wall.
//! 4. [`trail_phase`] - append the final position to each trail.
//!
//! Because every force is computed before any body moves, the outcome
//! does not depend on the order of the body slice.

use glam::Vec2;

use crate::{
    body::Body, config::Config, force_buffer::ForceBuffer, params::SimParams, types::Canvas,
};

/// Result of [`step`].
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub bodies: Vec<Body>,
    /// `true` if any body was clamped at a wall during this step.
    pub collided: bool,
}

/// Scalar attraction between two masses at squared distance
/// `distance_squared`, after applying the configured floor.
pub fn pair_force(cfg: &Config, m_i: f32, m_j: f32, distance_squared: f32) -> f32 {
    let d2 = distance_squared.max(cfg.min_distance_squared);
    cfg.gravity * (m_i * m_j) / d2
}

/// Accumulates the net gravitational force on every body.
///
/// For each ordered pair `(i, j)` with `i != j` the force on `i` points
/// from `i` towards `j`. The squared distance is floored at
/// [`Config::min_distance_squared`], so coincident bodies contribute a
/// zero vector rather than a NaN.
///
/// The buffer is resized and cleared to `bodies.len()` first.
///
/// ### Parameters
/// - `bodies` - Current positions and masses; read only.
/// - `cfg` - Provides the gravitational constant and distance floor.
/// - `acc` - Scratch buffer receiving one force per body.
pub fn force_phase(bodies: &[Body], cfg: &Config, acc: &mut ForceBuffer) {
    acc.ensure_len(bodies.len());

    for (i, bi) in bodies.iter().enumerate() {
        for (j, bj) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = bj.pos - bi.pos;
            let d2 = d.length_squared().max(cfg.min_distance_squared);
            let distance = d2.sqrt();
            let magnitude = pair_force(cfg, bi.mass, bj.mass, d2);
            acc.add(i, magnitude * (d / distance));
        }
    }
}

/// Applies accumulated forces: `v += a * dt`, then `p += v * dt`.
///
/// ### Panics
/// Panics if `acc` is shorter than `bodies`.
pub fn integration_phase(bodies: &mut [Body], acc: &ForceBuffer, dt: f32) {
    for (i, b) in bodies.iter_mut().enumerate() {
        let a = acc.acceleration(i, b.mass);
        b.vel += a * dt;
        b.pos += b.vel * dt;
    }
}

/// Clamps every body into the canvas shrunk by [`Config::wall_margin`].
///
/// Only positions are touched; a clamped body keeps its velocity and can be
/// pushed into the wall again on the next step.
///
/// ### Returns
/// `true` if at least one coordinate of one body was clamped.
pub fn boundary_phase(bodies: &mut [Body], cfg: &Config, canvas: Canvas) -> bool {
    let (min, max) = canvas.inset(cfg.wall_margin());
    let mut collided = false;

    for b in bodies.iter_mut() {
        let (x, hit_x) = clamp_axis(b.pos.x, min.x, max.x);
        let (y, hit_y) = clamp_axis(b.pos.y, min.y, max.y);
        b.pos = Vec2::new(x, y);
        collided |= hit_x || hit_y;
    }
    collided
}

// Low side is checked first, so on a canvas too small for the margin the
// body ends up on the low bound.
fn clamp_axis(v: f32, min: f32, max: f32) -> (f32, bool) {
    if v < min {
        (min, true)
    } else if v > max {
        (max, true)
    } else {
        (v, false)
    }
}

/// Records each body's position at the end of its trail.
pub fn trail_phase(bodies: &mut [Body], trail_length: usize) {
    for b in bodies.iter_mut() {
        b.record_position(trail_length);
    }
}

/// Runs all phases on `bodies` in place, reusing `acc` as scratch.
///
/// Does nothing (and reports no collision) for an empty slice.
pub fn advance(
    bodies: &mut [Body],
    acc: &mut ForceBuffer,
    cfg: &Config,
    params: &SimParams,
) -> bool {
    if bodies.is_empty() {
        return false;
    }
    let dt = params.effective_dt(cfg);

    force_phase(bodies, cfg, acc);
    integration_phase(bodies, acc, dt);
    let collided = boundary_phase(bodies, cfg, params.canvas);
    trail_phase(bodies, params.trail_length);
    collided
}

/// Computes the next body set without touching the input.
pub fn step(bodies: &[Body], cfg: &Config, params: &SimParams) -> StepOutcome {
    let mut next = bodies.to_vec();
    let mut acc = ForceBuffer::with_len(next.len());
    let collided = advance(&mut next, &mut acc, cfg, params);
    StepOutcome {
        bodies: next,
        collided,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyId, Rgb};

    fn body(id: u32, x: f32, y: f32, mass: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), mass, Rgb::WHITE)
    }

    fn params_at_speed(cfg: &Config, speed: f32) -> SimParams {
        let mut params = SimParams::from_config(cfg);
        params.speed = speed;
        params
    }

    #[test]
    fn force_decreases_with_separation_above_floor() {
        let cfg = Config::default();
        let mut last = f32::INFINITY;
        for d in [16.0_f32, 20.0, 40.0, 100.0, 400.0, 1000.0] {
            let f = pair_force(&cfg, 80.0, 120.0, d * d);
            assert!(f < last, "force at {d} should be below {last}, got {f}");
            last = f;
        }
    }

    #[test]
    fn force_is_capped_below_the_floor() {
        let cfg = Config::default();
        let at_floor = pair_force(&cfg, 100.0, 100.0, cfg.min_distance_squared);
        assert_eq!(pair_force(&cfg, 100.0, 100.0, 1.0), at_floor);
        assert_eq!(pair_force(&cfg, 100.0, 100.0, 0.0), at_floor);
    }

    #[test]
    fn force_depends_only_on_mass_product() {
        let cfg = Config::default();
        let d2 = 2500.0;
        assert_eq!(pair_force(&cfg, 30.0, 70.0, d2), pair_force(&cfg, 70.0, 30.0, d2));
        assert_eq!(pair_force(&cfg, 2.0, 50.0, d2), pair_force(&cfg, 10.0, 10.0, d2));
    }

    #[test]
    fn force_phase_pulls_bodies_towards_each_other() {
        let cfg = Config::default();
        let bodies = vec![body(0, 100.0, 300.0, 100.0), body(1, 700.0, 300.0, 100.0)];
        let mut acc = ForceBuffer::default();

        force_phase(&bodies, &cfg, &mut acc);

        assert_eq!(acc.len(), 2);
        assert!(acc.total(0).x > 0.0);
        assert!(acc.total(1).x < 0.0);
        assert_eq!(acc.total(0).y, 0.0);
        assert_eq!(acc.total(0), -acc.total(1));
    }

    #[test]
    fn coincident_bodies_produce_finite_state() {
        let cfg = Config::default();
        let bodies = vec![body(0, 400.0, 300.0, 100.0), body(1, 400.0, 300.0, 100.0)];
        let out = step(&bodies, &cfg, &params_at_speed(&cfg, 1.0));

        for b in &out.bodies {
            assert!(b.pos.is_finite());
            assert!(b.vel.is_finite());
        }
    }

    #[test]
    fn symmetric_pair_gets_equal_and_opposite_velocity() {
        let cfg = Config::default();
        let params = params_at_speed(&cfg, 1.0);
        let bodies = vec![body(0, 100.0, 300.0, 100.0), body(1, 700.0, 300.0, 100.0)];

        let out = step(&bodies, &cfg, &params);

        let (a, b) = (&out.bodies[0], &out.bodies[1]);
        assert!(a.vel.x > 0.0, "left body should move right");
        assert!(b.vel.x < 0.0, "right body should move left");
        assert_eq!(a.vel.x, -b.vel.x);
        assert_eq!(a.vel.y, 0.0);
        assert!(!out.collided);

        // Input is left untouched.
        assert_eq!(bodies[0].vel, Vec2::ZERO);
    }

    #[test]
    fn integration_updates_velocity_before_position() {
        let mut bodies = vec![body(0, 0.0, 0.0, 2.0)];
        let mut acc = ForceBuffer::with_len(1);
        acc.add(0, Vec2::new(4.0, 0.0)); // a = 2

        integration_phase(&mut bodies, &acc, 0.5);

        // v = 0 + 2 * 0.5 = 1; p = 0 + 1 * 0.5 = 0.5
        assert_eq!(bodies[0].vel, Vec2::new(1.0, 0.0));
        assert_eq!(bodies[0].pos, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn wall_clamp_sets_exact_bound_and_keeps_velocity() {
        let cfg = Config::default();
        let params = params_at_speed(&cfg, 1.0); // dt = 0.05
        let bodies = vec![body(0, 780.0, 300.0, 100.0).with_velocity(Vec2::new(400.0, 0.0))];

        let out = step(&bodies, &cfg, &params);

        let b = &out.bodies[0];
        assert!(out.collided);
        assert_eq!(b.pos.x, 800.0 - cfg.wall_margin());
        assert_eq!(b.vel, Vec2::new(400.0, 0.0));
        assert_eq!(*b.path.back().unwrap(), b.pos);
    }

    #[test]
    fn wall_clamp_on_low_side_and_both_axes() {
        let cfg = Config::default();
        let mut bodies = vec![body(0, -5.0, 700.0, 1.0)];

        let collided = boundary_phase(&mut bodies, &cfg, Canvas::new(800.0, 600.0));

        assert!(collided);
        assert_eq!(bodies[0].pos, Vec2::new(13.0, 587.0));
    }

    #[test]
    fn clamp_uses_the_canvas_passed_in() {
        let cfg = Config::default();
        let mut bodies = vec![body(0, 500.0, 300.0, 1.0)];

        assert!(!boundary_phase(&mut bodies, &cfg, Canvas::new(800.0, 600.0)));
        assert!(boundary_phase(&mut bodies, &cfg, Canvas::new(400.0, 600.0)));
        assert_eq!(bodies[0].pos.x, 387.0);
    }

    #[test]
    fn trails_stay_bounded_and_end_at_position() {
        let cfg = Config::default();
        let mut params = params_at_speed(&cfg, 1.0);
        params.trail_length = 5;
        let mut bodies = vec![
            body(0, 300.0, 300.0, 100.0),
            body(1, 500.0, 300.0, 100.0),
            body(2, 400.0, 200.0, 60.0),
        ];

        for _ in 0..20 {
            bodies = step(&bodies, &cfg, &params).bodies;
            for b in &bodies {
                assert!(b.path.len() <= 5);
                assert_eq!(*b.path.back().unwrap(), b.pos);
            }
        }
        assert!(bodies.iter().all(|b| b.path.len() == 5));
    }

    #[test]
    fn result_does_not_depend_on_body_order() {
        let cfg = Config::default();
        let params = params_at_speed(&cfg, 3.0);
        let forward = vec![
            body(0, 200.0, 200.0, 90.0),
            body(1, 450.0, 260.0, 140.0),
            body(2, 320.0, 420.0, 55.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = step(&forward, &cfg, &params).bodies;
        let b = step(&reversed, &cfg, &params).bodies;

        for ba in &a {
            let bb = b.iter().find(|x| x.id == ba.id).unwrap();
            assert!((ba.pos - bb.pos).length() < 1e-4);
            assert!((ba.vel - bb.vel).length() < 1e-4);
        }
    }

    #[test]
    fn empty_set_is_a_no_op() {
        let cfg = Config::default();
        let out = step(&[], &cfg, &SimParams::from_config(&cfg));
        assert!(out.bodies.is_empty());
        assert!(!out.collided);
    }
}
