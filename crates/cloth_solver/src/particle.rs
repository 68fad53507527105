use crate::vector::{unit_or_zero, Vector3};

/// A point mass advanced with Verlet integration.
///
/// Velocity is never stored: it is implied by `position - prev_position`.
/// `Particle::default()` has zero mass and is an inert placeholder; it must
/// not receive forces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    position: Vector3,
    prev_position: Vector3,
    acceleration: Vector3,
    mass: f32,
    movable: bool,
    // accumulated, not unit length
    normal: Vector3,
}

impl Particle {
    pub fn from_position(position: Vector3) -> Self {
        Self::with_mass(position, 1.0)
    }

    pub fn with_mass(position: Vector3, mass: f32) -> Self {
        Self {
            position,
            prev_position: position,
            acceleration: Vector3::ZERO,
            mass,
            movable: true,
            normal: Vector3::ZERO,
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn prev_position(&self) -> Vector3 {
        self.prev_position
    }

    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn add_force(&mut self, force: Vector3) {
        debug_assert!(self.mass > 0.0, "force applied to an inert particle");
        self.acceleration += force / self.mass;
    }

    /// Advance one time step.
    ///
    /// `step_size_squared` is the squared time step. The accumulated
    /// acceleration is consumed either way.
    pub fn integrate(&mut self, damping: f32, step_size_squared: f32) {
        if self.movable {
            let current = self.position;
            self.position += (self.position - self.prev_position) * (1.0 - damping)
                + self.acceleration * step_size_squared;
            self.prev_position = current;
        }
        self.acceleration = Vector3::ZERO;
    }

    /// Move the particle by `offset` unless it is pinned.
    pub fn offset_position(&mut self, offset: Vector3) {
        if self.movable {
            self.position += offset;
        }
    }

    /// Fix the particle in place. There is no way back.
    pub fn pin(&mut self) {
        self.movable = false;
    }

    pub fn add_to_normal(&mut self, normal: Vector3) {
        self.normal += unit_or_zero(normal);
    }

    pub fn reset_normal(&mut self) {
        self.normal = Vector3::ZERO;
    }

    /// The accumulated shading normal. Consumers normalize it.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_keeps_implicit_velocity() {
        let mut p = Particle::from_position(Vector3::ZERO);
        p.add_force(Vector3::new(0.0, -1.0, 0.0));
        p.integrate(0.0, 0.25);
        assert_eq!(p.position(), Vector3::new(0.0, -0.25, 0.0));
        assert_eq!(p.prev_position(), Vector3::ZERO);
        assert_eq!(p.acceleration(), Vector3::ZERO);

        // no new force, the particle keeps drifting
        p.integrate(0.0, 0.25);
        assert_eq!(p.position(), Vector3::new(0.0, -0.5, 0.0));
        assert_eq!(p.prev_position(), Vector3::new(0.0, -0.25, 0.0));
    }

    #[test]
    fn damping_scales_the_drift() {
        let mut p = Particle::from_position(Vector3::ZERO);
        p.offset_position(Vector3::X);
        p.integrate(0.5, 0.25);
        assert!((p.position().x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn force_is_divided_by_mass() {
        let mut p = Particle::with_mass(Vector3::ZERO, 4.0);
        p.add_force(Vector3::new(8.0, 0.0, 0.0));
        assert_eq!(p.acceleration(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn pinned_particle_ignores_motion() {
        let start = Vector3::new(1.0, 2.0, 3.0);
        let mut p = Particle::from_position(start);
        p.pin();
        p.add_force(Vector3::splat(10.0));
        p.offset_position(Vector3::X);
        p.integrate(0.01, 0.25);
        assert!(!p.is_movable());
        assert_eq!(p.position(), start);
    }

    #[test]
    fn normal_accumulates_unit_contributions() {
        let mut p = Particle::from_position(Vector3::ZERO);
        p.add_to_normal(Vector3::new(0.0, 0.0, 5.0));
        p.add_to_normal(Vector3::new(0.0, 3.0, 0.0));
        p.add_to_normal(Vector3::ZERO);
        assert_eq!(p.normal(), Vector3::new(0.0, 1.0, 1.0));
        assert!(!p.normal().is_nan());

        p.reset_normal();
        assert_eq!(p.normal(), Vector3::ZERO);
    }

    #[test]
    fn default_particle_is_inert() {
        let p = Particle::default();
        assert_eq!(p.mass(), 0.0);
    }
}
