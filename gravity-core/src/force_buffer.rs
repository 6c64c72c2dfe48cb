use glam::Vec2;

/// Scratch buffer that accumulates net force per body during one step.
///
/// Index `i` corresponds to the body at index `i` of the slice the force
/// phase was run over; the buffer knows nothing about [`crate::types::BodyId`].
///
/// Keeping all forces here until the integration phase is what makes every
/// body in a pass see the same pre-step positions.
#[derive(Debug, Default)]
pub struct ForceBuffer {
    force: Vec<Vec2>,
}

impl ForceBuffer {
    /// Creates a zeroed buffer for `len` bodies.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
        }
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Resizes to exactly `len` entries and zeroes all of them, even when
    /// the length was already right.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for f in &mut self.force {
            *f = Vec2::ZERO;
        }
    }

    /// Adds `force` onto body `i`.
    ///
    /// ### Panics
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn add(&mut self, i: usize, force: Vec2) {
        self.force[i] += force;
    }

    #[inline]
    pub fn total(&self, i: usize) -> Vec2 {
        self.force[i]
    }

    /// Net force on body `i` divided by its mass.
    #[inline]
    pub fn acceleration(&self, i: usize, mass: f32) -> Vec2 {
        self.force[i] / mass
    }
}
