use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use cloth_solver::{ClothDebugPlugin, ClothError, ClothPlugin, ClothRenderPlugin, ClothSim, SceneConfig};

fn main() -> Result<(), ClothError> {
    let scene = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    let sim = ClothSim::from_scene(&scene)?;

    App::new()
        .insert_resource(ClearColor(Color::rgb(0.2, 0.2, 0.4)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 0.3,
        })
        .insert_resource(scene)
        .insert_resource(sim)
        .add_plugins(DefaultPlugins)
        .add_plugins((ClothPlugin, ClothRenderPlugin, ClothDebugPlugin))
        .add_plugins(PanOrbitCameraPlugin)
        .add_systems(Startup, setup)
        .run();
    Ok(())
}

fn setup(mut commands: Commands, scene: Res<SceneConfig>) {
    let focus = Vec3::new(scene.width * 0.5, -scene.height * 0.5, 0.0);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(focus + Vec3::new(-8.0, 4.0, 16.0))
                .looking_at(focus, Vec3::Y),
            ..default()
        },
        PanOrbitCamera {
            focus,
            ..default()
        },
    ));

    // two directional lights, like a key and a warm fill
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        transform: Transform::from_xyz(-1.0, 1.0, 0.5).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            color: Color::rgb(1.0, 1.0, 0.6),
            illuminance: 4000.0,
            ..default()
        },
        transform: Transform::from_xyz(1.0, 0.0, -0.2).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}
