use bevy::prelude::*;

use crate::{Cloth, ClothError, SceneConfig, Vector3};

/// The simulated cloth plus the driver state that used to live in globals.
#[derive(Resource, Debug)]
pub struct ClothSim {
    pub cloth: Cloth,
    pub ball_center: Vector3,
    pub frame: u64,
    pub paused: bool,
}

impl ClothSim {
    pub fn from_scene(scene: &SceneConfig) -> Result<Self, ClothError> {
        let cloth = Cloth::with_config(
            scene.width,
            scene.height,
            scene.width_count,
            scene.height_count,
            scene.cloth,
        )?;
        Ok(Self {
            cloth,
            ball_center: scene.ball_center(),
            frame: 0,
            paused: false,
        })
    }

    /// One frame: move the ball, then gravity, wind, step and collision.
    pub fn advance(&mut self, scene: &SceneConfig) {
        if let Some(sweep) = scene.ball_sweep {
            self.ball_center.z = scene.ball_center[2] + sweep.offset(self.frame);
        }

        self.cloth.add_force(scene.gravity_force());
        self.cloth.apply_aerodynamic_force(scene.wind_force());
        self.cloth.step();
        self.cloth.resolve_collision(self.ball_center, scene.ball_radius);
        self.frame += 1;
    }
}

/// Runs the simulation loop. Needs no rendering.
///
/// Uses the `SceneConfig` and `ClothSim` resources if they were inserted
/// before the plugin, defaults otherwise.
pub struct ClothPlugin;

impl Plugin for ClothPlugin {
    fn build(&self, app: &mut App) {
        if !app.world.contains_resource::<SceneConfig>() {
            app.init_resource::<SceneConfig>();
        }
        if !app.world.contains_resource::<ClothSim>() {
            match ClothSim::from_scene(app.world.resource::<SceneConfig>()) {
                Ok(sim) => {
                    app.insert_resource(sim);
                }
                Err(err) => {
                    error!("cloth simulation disabled: {err}");
                    return;
                }
            }
        }
        app.add_systems(Update, advance_cloth);
    }
}

pub fn advance_cloth(mut sim: ResMut<ClothSim>, scene: Res<SceneConfig>) {
    if sim.paused {
        return;
    }
    sim.advance(&scene);
}
