use crate::{
    config::ClothConfig,
    constraint::Constraint,
    particle::Particle,
    topology::{self, ConstraintKind, GridSize, Triangle},
    vector::{triangle_normal, unit_or_zero, Vector3, EPSILON},
    ClothError,
};

/// A rectangular mass-spring sheet.
///
/// Owns a row-major grid of particles and the constraints between them.
/// The topology is fixed at construction.
#[derive(Clone, Debug)]
pub struct Cloth {
    grid: GridSize,
    config: ClothConfig,
    particles: Vec<Particle>,
    constraints: Vec<Constraint>,
}

impl Cloth {
    pub fn new(
        width: f32,
        height: f32,
        width_count: usize,
        height_count: usize,
    ) -> Result<Self, ClothError> {
        Self::with_config(width, height, width_count, height_count, ClothConfig::default())
    }

    /// Lay out `width_count x height_count` particles in the z = 0 plane,
    /// from the origin towards `+x` and `-y`, connect them and pin the anchors.
    pub fn with_config(
        width: f32,
        height: f32,
        width_count: usize,
        height_count: usize,
        config: ClothConfig,
    ) -> Result<Self, ClothError> {
        if width_count == 0 || height_count == 0 {
            return Err(ClothError::InvalidGrid {
                width_count,
                height_count,
            });
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ClothError::InvalidExtent { width, height });
        }
        config.validate()?;

        let grid = GridSize::new(width_count, height_count);
        let mut particles = Vec::with_capacity(grid.len());
        for y in 0..height_count {
            for x in 0..width_count {
                particles.push(Particle::from_position(Vector3::new(
                    width * (x as f32 / width_count as f32),
                    -height * (y as f32 / height_count as f32),
                    0.0,
                )));
            }
        }

        let constraints = [ConstraintKind::Structural, ConstraintKind::Bend]
            .into_iter()
            .flat_map(|kind| {
                topology::constraint_pairs(grid, kind)
                    .into_iter()
                    .map(move |(a, b)| (a, b, kind))
            })
            .map(|(a, b, kind)| Constraint::from_particles(&particles, a, b, kind))
            .collect::<Vec<_>>();

        let mut cloth = Self {
            grid,
            config,
            particles,
            constraints,
        };
        cloth.pin_anchors();

        log::debug!(
            "built {}x{} cloth: {} particles, {} constraints",
            width_count,
            height_count,
            cloth.particles.len(),
            cloth.constraints.len()
        );
        Ok(cloth)
    }

    fn pin_anchors(&mut self) {
        let count = self.config.anchor_count.min(self.grid.width_count);
        let offset = Vector3::new(self.config.anchor_offset, 0.0, 0.0);
        for i in 0..count {
            let left = self.grid.index(i, 0);
            self.particles[left].offset_position(offset);
            self.particles[left].pin();

            let right = self.grid.index(self.grid.width_count - 1 - i, 0);
            self.particles[right].offset_position(-offset);
            self.particles[right].pin();
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn particle(&self, x: usize, y: usize) -> Option<&Particle> {
        if self.grid.contains(x, y) {
            self.particles.get(self.grid.index(x, y))
        } else {
            None
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.particles.iter().map(Particle::position)
    }

    /// Accumulated shading normals from the last [`Cloth::compute_shading_normals`].
    pub fn normals(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.particles.iter().map(Particle::normal)
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> {
        topology::triangles(self.grid)
    }

    /// Apply the same force to every particle, e.g. gravity.
    pub fn add_force(&mut self, force: Vector3) {
        for particle in self.particles.iter_mut() {
            particle.add_force(force);
        }
    }

    /// Wind pressure: each triangle pushes its three corners with a force
    /// proportional to its area as seen from `direction`.
    pub fn apply_aerodynamic_force(&mut self, direction: Vector3) {
        for Triangle { indices, .. } in topology::triangles(self.grid) {
            let [a, b, c] = indices.map(|i| self.particles[i].position());
            let normal = triangle_normal(a, b, c);
            let force = normal * unit_or_zero(normal).dot(direction);
            for i in indices {
                self.particles[i].add_force(force);
            }
        }
    }

    /// Relax every constraint `constraint_iterations` times, in construction
    /// order. Later constraints see the corrections of earlier ones.
    pub fn relax(&mut self) {
        for _ in 0..self.config.constraint_iterations {
            for constraint in &self.constraints {
                constraint.satisfy(&mut self.particles);
            }
        }
    }

    /// Advance one frame: relax, then integrate every particle once.
    pub fn step(&mut self) {
        self.relax();

        let damping = self.config.damping;
        let step_size_squared = self.config.step_size_squared();
        for particle in self.particles.iter_mut() {
            particle.integrate(damping, step_size_squared);
        }
    }

    /// Project every particle inside the sphere onto its surface.
    ///
    /// Positional only: a particle that crosses the whole sphere within one
    /// step is not caught.
    pub fn resolve_collision(&mut self, center: Vector3, radius: f32) {
        for particle in self.particles.iter_mut() {
            let offset = particle.position() - center;
            let distance = offset.length();
            if distance < radius {
                let direction = if distance > EPSILON {
                    offset / distance
                } else {
                    Vector3::Y
                };
                particle.offset_position(direction * (radius - distance));
            }
        }
    }

    /// Sum the face normals of the triangles around each particle.
    pub fn compute_shading_normals(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.reset_normal();
        }
        for Triangle { indices, .. } in topology::triangles(self.grid) {
            let [a, b, c] = indices.map(|i| self.particles[i].position());
            let normal = triangle_normal(a, b, c);
            for i in indices {
                self.particles[i].add_to_normal(normal);
            }
        }
    }

    /// Largest deviation of any constraint from its rest distance.
    pub fn constraint_error(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| (c.current_distance(&self.particles) - c.rest_distance()).abs())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::topology::{bend_count, structural_count};

    fn unanchored() -> ClothConfig {
        ClothConfig {
            anchor_count: 0,
            ..Default::default()
        }
    }

    fn random_vector(rng: &mut StdRng, scale: f32) -> Vector3 {
        Vector3::new(
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
        )
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(matches!(
            Cloth::new(1.0, 1.0, 0, 4),
            Err(ClothError::InvalidGrid { .. })
        ));
        assert!(matches!(
            Cloth::new(-1.0, 1.0, 4, 4),
            Err(ClothError::InvalidExtent { .. })
        ));
        assert!(matches!(
            Cloth::new(f32::NAN, 1.0, 4, 4),
            Err(ClothError::InvalidExtent { .. })
        ));
        let config = ClothConfig {
            constraint_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            Cloth::with_config(1.0, 1.0, 4, 4, config),
            Err(ClothError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn particles_are_laid_out_row_major() {
        let cloth = Cloth::with_config(4.0, 2.0, 4, 2, unanchored()).unwrap();
        assert_eq!(cloth.particles().len(), 8);
        assert_eq!(
            cloth.particle(3, 1).unwrap().position(),
            Vector3::new(3.0, -1.0, 0.0)
        );
        assert_eq!(cloth.particles()[5].position(), Vector3::new(1.0, -1.0, 0.0));
        assert!(cloth.particle(4, 0).is_none());
    }

    #[test]
    fn builds_structural_then_bend_constraints() {
        let cloth = Cloth::new(10.0, 10.0, 7, 5).unwrap();
        let grid = cloth.grid();
        let structural = cloth
            .constraints()
            .iter()
            .take_while(|c| c.kind == ConstraintKind::Structural)
            .count();
        assert_eq!(structural, structural_count(grid));
        assert_eq!(
            cloth.constraints().len(),
            structural_count(grid) + bend_count(grid)
        );
        assert_eq!(structural_count(grid), 6 * 5 + 7 * 4 + 2 * 6 * 4);
    }

    #[test]
    fn anchors_are_pinned_and_shifted_inwards() {
        let cloth = Cloth::new(10.0, 10.0, 10, 10).unwrap();
        let pinned: Vec<_> = cloth
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_movable())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(pinned, vec![0, 1, 2, 7, 8, 9]);
        assert!((cloth.particle(0, 0).unwrap().position().x - 0.5).abs() < 1e-5);
        assert!((cloth.particle(9, 0).unwrap().position().x - 8.5).abs() < 1e-5);
        // rest distances were taken before the shift
        let first = cloth.constraints()[0];
        assert!((first.rest_distance() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn narrow_cloth_clamps_the_anchor_count() {
        let cloth = Cloth::new(1.0, 1.0, 2, 3).unwrap();
        assert!(!cloth.particle(0, 0).unwrap().is_movable());
        assert!(!cloth.particle(1, 0).unwrap().is_movable());
        assert!(cloth.particle(0, 1).unwrap().is_movable());
    }

    #[test]
    fn hanging_square_falls_and_keeps_its_width() {
        let config = ClothConfig {
            anchor_offset: 0.0,
            ..Default::default()
        };
        let mut cloth = Cloth::with_config(1.0, 1.0, 2, 2, config).unwrap();
        let before: Vec<_> = cloth.positions().collect();

        cloth.add_force(Vector3::new(0.0, -1.0, 0.0));
        cloth.step();

        let after: Vec<_> = cloth.positions().collect();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1]);
        assert!(after[2].y < before[2].y);
        assert!(after[3].y < before[3].y);
        let width = (after[3] - after[2]).length();
        assert!((width - 0.5).abs() < 1e-3, "bottom row width {width}");
    }

    #[test]
    fn relaxation_reduces_stretch() {
        let mut cloth = Cloth::with_config(4.0, 4.0, 9, 9, unanchored()).unwrap();
        // dent the middle of the sheet
        cloth.resolve_collision(Vector3::new(2.0, -2.0, -0.8), 1.0);
        let dented = cloth.constraint_error();
        assert!(dented > 0.01);

        cloth.relax();
        assert!(cloth.constraint_error() < dented);
    }

    #[test]
    fn pinned_particles_never_move() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cloth = Cloth::new(6.0, 6.0, 12, 10).unwrap();
        let pinned: Vec<_> = cloth
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_movable())
            .map(|(i, p)| (i, p.position()))
            .collect();
        assert_eq!(pinned.len(), 6);

        for _ in 0..50 {
            cloth.add_force(random_vector(&mut rng, 1.0));
            cloth.apply_aerodynamic_force(random_vector(&mut rng, 1.0));
            cloth.step();
            let center = Vector3::new(rng.gen_range(0.0..6.0), rng.gen_range(-6.0..0.0), 0.0);
            cloth.resolve_collision(center, rng.gen_range(0.1..3.0));
            for (i, position) in &pinned {
                assert_eq!(cloth.particles()[*i].position(), *position);
            }
        }
    }

    #[test]
    fn collision_pushes_every_particle_out_of_the_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut cloth = Cloth::with_config(4.0, 4.0, 16, 16, unanchored()).unwrap();
        for _ in 0..20 {
            cloth.add_force(random_vector(&mut rng, 0.5));
            cloth.step();
            let center = Vector3::new(rng.gen_range(0.0..4.0), rng.gen_range(-4.0..0.0), 0.0)
                + random_vector(&mut rng, 0.5);
            let radius = rng.gen_range(0.2..2.0);
            cloth.resolve_collision(center, radius);
            for position in cloth.positions() {
                assert!((position - center).length() >= radius - 1e-4);
            }
        }
    }

    #[test]
    fn particle_at_sphere_center_is_pushed_up() {
        let mut cloth = Cloth::with_config(1.0, 1.0, 2, 2, unanchored()).unwrap();
        cloth.resolve_collision(Vector3::ZERO, 0.25);
        let p = cloth.particle(0, 0).unwrap().position();
        assert!((p - Vector3::new(0.0, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn wind_scales_with_facing_area() {
        let mut cloth = Cloth::with_config(1.0, 1.0, 2, 2, unanchored()).unwrap();
        cloth.apply_aerodynamic_force(Vector3::new(0.0, 0.0, 1.0));
        // corner (x+1, y+1) only belongs to the second triangle
        let acc = cloth.particle(1, 1).unwrap().acceleration();
        assert!((acc - Vector3::new(0.0, 0.0, 0.25)).length() < 1e-6);
        // the shared corners get both triangles
        let shared = cloth.particle(1, 0).unwrap().acceleration();
        assert!((shared.z - 0.5).abs() < 1e-6);

        // wind along the sheet pushes nothing
        let mut cloth = Cloth::with_config(1.0, 1.0, 2, 2, unanchored()).unwrap();
        cloth.apply_aerodynamic_force(Vector3::X);
        assert!(cloth.particles().iter().all(|p| p.acceleration() == Vector3::ZERO));
    }

    #[test]
    fn flat_cloth_has_normals_along_z() {
        let mut cloth = Cloth::with_config(3.0, 3.0, 4, 4, unanchored()).unwrap();
        cloth.compute_shading_normals();
        for normal in cloth.normals() {
            assert!(normal.length() > 0.0);
            assert!(normal.x.abs() < 1e-6 && normal.y.abs() < 1e-6);
        }
        // interior particles touch six triangles
        assert!((cloth.particle(1, 1).unwrap().normal().length() - 6.0).abs() < 1e-5);

        // recomputing does not accumulate
        cloth.compute_shading_normals();
        assert!((cloth.particle(1, 1).unwrap().normal().length() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn identical_inputs_give_identical_cloths() {
        let run = || {
            let mut cloth = Cloth::new(5.0, 4.0, 11, 9).unwrap();
            for frame in 0..30 {
                cloth.add_force(Vector3::new(0.0, -0.05, 0.0));
                cloth.apply_aerodynamic_force(Vector3::new(0.125, 0.0, 0.05));
                cloth.step();
                cloth.resolve_collision(Vector3::new(2.5, -2.0, (frame as f32 / 5.0).cos()), 1.0);
            }
            cloth.positions().collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn single_particle_cloth_is_valid() {
        let mut cloth = Cloth::with_config(1.0, 1.0, 1, 1, unanchored()).unwrap();
        assert!(cloth.constraints().is_empty());
        assert_eq!(cloth.triangles().count(), 0);
        cloth.add_force(Vector3::NEG_Y);
        cloth.apply_aerodynamic_force(Vector3::X);
        cloth.step();
        assert!(cloth.particles()[0].position().y < 0.0);
    }
}
