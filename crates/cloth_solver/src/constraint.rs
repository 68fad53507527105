use crate::particle::Particle;
use crate::topology::ConstraintKind;
use crate::vector::EPSILON;

/// Keeps two particles at the distance they had when the constraint was made.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    pub kind: ConstraintKind,
    rest_distance: f32,
}

impl Constraint {
    /// Snapshot the current distance between `a` and `b` as the rest distance.
    pub fn from_particles(particles: &[Particle], a: usize, b: usize, kind: ConstraintKind) -> Self {
        let rest_distance = (particles[a].position() - particles[b].position()).length();
        Self {
            a,
            b,
            kind,
            rest_distance,
        }
    }

    pub fn rest_distance(&self) -> f32 {
        self.rest_distance
    }

    pub fn current_distance(&self, particles: &[Particle]) -> f32 {
        (particles[self.b].position() - particles[self.a].position()).length()
    }

    /// Relative stretch, positive when longer than at rest.
    pub fn strain(&self, particles: &[Particle]) -> f32 {
        if self.rest_distance <= EPSILON {
            return 0.0;
        }
        (self.current_distance(particles) - self.rest_distance) / self.rest_distance
    }

    /// One relaxation step towards the rest distance.
    ///
    /// The correction is split evenly between two movable particles; a
    /// pinned end takes no share. Coincident particles are left alone.
    pub fn satisfy(&self, particles: &mut [Particle]) {
        let pa = particles[self.a];
        let pb = particles[self.b];
        let wa: f32 = if pa.is_movable() { 1.0 } else { 0.0 };
        let wb: f32 = if pb.is_movable() { 1.0 } else { 0.0 };
        let w = wa + wb;
        if w == 0.0 {
            return;
        }

        let delta = pb.position() - pa.position();
        let distance = delta.length();
        if distance <= EPSILON {
            return;
        }
        let correction = delta * (1.0 - self.rest_distance / distance);
        particles[self.a].offset_position(correction * (wa / w));
        particles[self.b].offset_position(-correction * (wb / w));
    }
}
