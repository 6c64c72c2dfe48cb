use std::collections::VecDeque;

use glam::Vec2;

use crate::types::{BodyId, Rgb};

/// A point mass on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub color: Rgb,
    /// Past positions, oldest first. Never empty.
    pub path: VecDeque<Vec2>,
}

impl Body {
    /// Creates a body at rest whose trail holds only its starting position.
    pub fn new(id: BodyId, pos: Vec2, mass: f32, color: Rgb) -> Self {
        let mut path = VecDeque::with_capacity(16);
        path.push_back(pos);
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            mass,
            color,
            path,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Appends the current position to the trail, evicting the oldest
    /// entries beyond `limit`.
    pub fn record_position(&mut self, limit: usize) {
        self.path.push_back(self.pos);
        self.truncate_path(limit);
    }

    /// Keeps only the `limit` most recent trail points.
    pub fn truncate_path(&mut self, limit: usize) {
        while self.path.len() > limit.max(1) {
            self.path.pop_front();
        }
    }

    /// Replaces the trail with the single current position.
    pub fn reset_path(&mut self) {
        self.path.clear();
        self.path.push_back(self.pos);
    }

    pub fn contains_point(&self, p: Vec2, radius: f32) -> bool {
        self.pos.distance_squared(p) <= radius * radius
    }
}

/// Returns the first body (in placement order) whose disc of `radius`
/// contains `p`.
pub fn hit_test(bodies: &[Body], p: Vec2, radius: f32) -> Option<BodyId> {
    bodies
        .iter()
        .find(|b| b.contains_point(p, radius))
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(id: u32, x: f32, y: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), 100.0, Rgb::WHITE)
    }

    #[test]
    fn new_body_is_at_rest_with_single_point_trail() {
        let b = body_at(0, 3.0, 4.0);
        assert_eq!(b.vel, Vec2::ZERO);
        assert_eq!(b.path.len(), 1);
        assert_eq!(b.path[0], Vec2::new(3.0, 4.0));
    }

    #[test]
    fn record_position_evicts_oldest() {
        let mut b = body_at(0, 0.0, 0.0);
        for i in 1..=5 {
            b.pos = Vec2::new(i as f32, 0.0);
            b.record_position(3);
        }
        let xs: Vec<f32> = b.path.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
        assert_eq!(*b.path.back().unwrap(), b.pos);
    }

    #[test]
    fn truncate_never_empties_the_trail() {
        let mut b = body_at(0, 1.0, 1.0);
        b.truncate_path(0);
        assert_eq!(b.path.len(), 1);
    }

    #[test]
    fn reset_path_keeps_only_current_position() {
        let mut b = body_at(0, 0.0, 0.0);
        b.pos = Vec2::new(10.0, 0.0);
        b.record_position(100);
        b.pos = Vec2::new(20.0, 0.0);
        b.record_position(100);

        b.reset_path();

        assert_eq!(b.path.len(), 1);
        assert_eq!(b.path[0], Vec2::new(20.0, 0.0));
    }

    #[test]
    fn hit_test_picks_first_body_in_radius() {
        let bodies = vec![body_at(0, 100.0, 100.0), body_at(1, 104.0, 100.0)];

        // Inside both discs: placement order wins.
        assert_eq!(hit_test(&bodies, Vec2::new(102.0, 100.0), 8.0), Some(BodyId(0)));
        // On the edge of the second only.
        assert_eq!(hit_test(&bodies, Vec2::new(112.0, 100.0), 8.0), Some(BodyId(1)));
        // Empty space.
        assert_eq!(hit_test(&bodies, Vec2::new(300.0, 300.0), 8.0), None);
    }
}
