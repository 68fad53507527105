use bevy::prelude::*;

use crate::{ClothSim, ConstraintKind};

/// Strain at which the overlay colour saturates.
const STRAIN_SCALE: f32 = 0.25;

#[derive(Resource, Default)]
pub struct DebugOverlay {
    pub constraints: bool,
    pub bend_constraints: bool,
}

/// Keyboard controls and the constraint overlay.
///
/// `C` toggles structural constraints, `B` bend constraints, `Space` pauses.
pub struct ClothDebugPlugin;

impl Plugin for ClothDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugOverlay>().add_systems(
            Update,
            (handle_keys, draw_anchors, draw_constraints).chain(),
        );
    }
}

pub fn strain_color(strain: f32) -> Color {
    let t = (strain.abs() / STRAIN_SCALE).clamp(0.0, 1.0);
    let color = colorgrad::viridis().at(t as f64);
    Color::rgba(
        color.r as f32,
        color.g as f32,
        color.b as f32,
        color.a as f32,
    )
}

fn handle_keys(
    keyboard: Res<Input<KeyCode>>,
    mut overlay: ResMut<DebugOverlay>,
    mut sim: ResMut<ClothSim>,
) {
    if keyboard.just_pressed(KeyCode::C) {
        overlay.constraints ^= true;
    }
    if keyboard.just_pressed(KeyCode::B) {
        overlay.bend_constraints ^= true;
    }
    if keyboard.just_pressed(KeyCode::Space) {
        sim.paused ^= true;
        info!("simulation {}", if sim.paused { "paused" } else { "resumed" });
    }
}

fn draw_anchors(mut gizmos: Gizmos, overlay: Res<DebugOverlay>, sim: Res<ClothSim>) {
    if !overlay.constraints {
        return;
    }
    for particle in sim.cloth.particles().iter().filter(|p| !p.is_movable()) {
        gizmos.sphere(particle.position(), Quat::IDENTITY, 0.1, Color::ORANGE_RED);
    }
}

fn draw_constraints(mut gizmos: Gizmos, overlay: Res<DebugOverlay>, sim: Res<ClothSim>) {
    let particles = sim.cloth.particles();
    for constraint in sim.cloth.constraints() {
        let visible = match constraint.kind {
            ConstraintKind::Structural => overlay.constraints,
            ConstraintKind::Bend => overlay.bend_constraints,
        };
        if !visible {
            continue;
        }
        gizmos.line(
            particles[constraint.a].position(),
            particles[constraint.b].position(),
            strain_color(constraint.strain(particles)),
        );
    }
}
