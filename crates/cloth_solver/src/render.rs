use bevy::{prelude::*, render::render_resource::PrimitiveTopology};

use crate::{Cloth, ClothSim, SceneConfig};

/// The ball is drawn a bit smaller than it collides, so the cloth does not
/// visibly cut into it.
const BALL_DRAW_INSET: f32 = 0.1;

#[derive(Component)]
pub struct ClothMesh;

#[derive(Component)]
pub struct Ball;

/// Per-vertex buffers for a non-indexed triangle list. Vertices are not
/// shared so every triangle can carry its column colour.
#[derive(Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
}

impl MeshBuffers {
    /// Reads positions and the accumulated normals, so call
    /// [`Cloth::compute_shading_normals`] first.
    pub fn from_cloth(cloth: &Cloth) -> Self {
        let mut buffers = Self::default();
        let particles = cloth.particles();
        for triangle in cloth.triangles() {
            let [r, g, b] = triangle.shade.rgb();
            for i in triangle.indices {
                buffers.positions.push(particles[i].position().to_array());
                buffers
                    .normals
                    .push(particles[i].normal().normalize_or_zero().to_array());
                buffers.colors.push([r, g, b, 1.0]);
            }
        }
        buffers
    }

    fn write_to(self, mesh: &mut Mesh) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors);
    }
}

pub struct ClothRenderPlugin;

impl Plugin for ClothRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_cloth_scene).add_systems(
            Update,
            (sync_cloth_mesh, sync_ball).after(crate::advance_cloth),
        );
    }
}

fn spawn_cloth_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut sim: ResMut<ClothSim>,
    scene: Res<SceneConfig>,
) {
    sim.cloth.compute_shading_normals();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    MeshBuffers::from_cloth(&sim.cloth).write_to(&mut mesh);

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(mesh),
            material: materials.add(StandardMaterial {
                base_color: Color::WHITE,
                perceptual_roughness: 0.9,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
            ..default()
        },
        ClothMesh,
    ));

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Mesh::from(shape::UVSphere {
                radius: (scene.ball_radius - BALL_DRAW_INSET).max(0.01),
                sectors: 50,
                stacks: 50,
            })),
            material: materials.add(Color::rgb(0.4, 0.8, 0.5).into()),
            transform: Transform::from_translation(sim.ball_center),
            ..default()
        },
        Ball,
    ));
    info!(
        "cloth scene ready: {} particles, {} constraints",
        sim.cloth.particles().len(),
        sim.cloth.constraints().len()
    );
}

fn sync_cloth_mesh(
    mut sim: ResMut<ClothSim>,
    mut meshes: ResMut<Assets<Mesh>>,
    cloth_meshes: Query<&Handle<Mesh>, With<ClothMesh>>,
) {
    sim.cloth.compute_shading_normals();
    for handle in &cloth_meshes {
        if let Some(mesh) = meshes.get_mut(handle) {
            MeshBuffers::from_cloth(&sim.cloth).write_to(mesh);
        }
    }
}

fn sync_ball(sim: Res<ClothSim>, mut balls: Query<&mut Transform, With<Ball>>) {
    for mut transform in &mut balls {
        transform.translation = sim.ball_center;
    }
}
