use std::{fs, path::Path};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::{vector::Vector3, ClothError};

/// Solver constants for a single cloth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Fraction of the implicit velocity lost per step.
    pub damping: f32,
    pub time_step: f32,
    /// Relaxation passes per step. More is stiffer and slower.
    pub constraint_iterations: usize,
    /// Anchors pinned at each end of the top row.
    pub anchor_count: usize,
    /// Inward shift of the anchors before they are pinned.
    pub anchor_offset: f32,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            damping: 0.01,
            time_step: 0.5,
            constraint_iterations: 15,
            anchor_count: 3,
            anchor_offset: 0.5,
        }
    }
}

impl ClothConfig {
    pub fn step_size_squared(&self) -> f32 {
        self.time_step * self.time_step
    }

    pub fn validate(&self) -> Result<(), ClothError> {
        let reason = if !(0.0..=1.0).contains(&self.damping) {
            "damping must be within [0, 1]"
        } else if !(self.time_step.is_finite() && self.time_step > 0.0) {
            "time_step must be positive"
        } else if self.constraint_iterations == 0 {
            "constraint_iterations must be at least 1"
        } else if !self.anchor_offset.is_finite() {
            "anchor_offset must be finite"
        } else {
            return Ok(());
        };
        log::warn!("rejecting cloth config {:?}: {}", self, reason);
        Err(ClothError::InvalidConfiguration { reason })
    }
}

/// Periodic sweep of the ball along z, one value per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallSweep {
    /// Frames per radian.
    pub period: f32,
    pub amplitude: f32,
}

impl Default for BallSweep {
    fn default() -> Self {
        Self {
            period: 50.0,
            amplitude: 7.0,
        }
    }
}

impl BallSweep {
    pub fn offset(&self, frame: u64) -> f32 {
        (frame as f32 / self.period).cos() * self.amplitude
    }
}

/// Everything the driver loop feeds the cloth with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
    pub width_count: usize,
    pub height_count: usize,
    /// Applied every frame, scaled by the squared time step.
    pub gravity: [f32; 3],
    /// Applied every frame, scaled by the squared time step.
    pub wind: [f32; 3],
    pub ball_center: [f32; 3],
    pub ball_radius: f32,
    pub ball_sweep: Option<BallSweep>,
    pub cloth: ClothConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 14.0,
            height: 10.0,
            width_count: 55,
            height_count: 45,
            gravity: [0.0, -0.2, 0.0],
            wind: [0.5, 0.0, 0.2],
            ball_center: [7.0, -5.0, 0.0],
            ball_radius: 2.0,
            ball_sweep: Some(BallSweep::default()),
            cloth: ClothConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ClothError> {
        let scene: Self = serde_json::from_str(json)?;
        scene.cloth.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClothError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn gravity_force(&self) -> Vector3 {
        Vector3::from(self.gravity) * self.cloth.step_size_squared()
    }

    pub fn wind_force(&self) -> Vector3 {
        Vector3::from(self.wind) * self.cloth.step_size_squared()
    }

    pub fn ball_center(&self) -> Vector3 {
        Vector3::from(self.ball_center)
    }
}
