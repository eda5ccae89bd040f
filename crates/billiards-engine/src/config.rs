use serde::{Deserialize, Serialize};

use crate::entities::ball::CollisionModel;
use crate::error::{Result, SimError};
use crate::math::vector::Vector2D;
use crate::placement::PlacementKind;

/// Immutable configuration for one simulation session.
/// Lengths are in meters, the table's own unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravitational acceleration used by the friction model.
    pub gravity: f32,
    /// Kinetic friction coefficient between ball and cloth.
    pub friction_coefficient: f32,
    pub ball_radius: f32,
    /// Only consulted when `collision_model` is `MassWeighted`.
    pub ball_mass: f32,
    pub pocket_radius: f32,
    pub table_width: f32,
    pub table_height: f32,
    /// Top-left corner of the table in the outer coordinate space.
    pub table_origin: Vector2D,
    /// Screen pixels per meter.
    pub px_per_meter: f32,
    /// Speeds below this snap to exactly zero.
    pub velocity_threshold: f32,
    /// Longest drag (in meters) a launch gesture can register.
    pub max_drag_distance: f32,
    /// Divisor applied to the per-frame friction deceleration.
    pub time_scale: f32,
    /// Extra gap between neighbouring balls in the triangular rack.
    pub rack_gap: f32,
    /// Object balls per layout (the cue ball is added on top).
    pub ball_count: usize,
    pub placement: PlacementKind,
    /// Rejection-sampling budget per ball for the scatter layout.
    pub max_placement_attempts: u32,
    pub collision_model: CollisionModel,
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            friction_coefficient: 0.02,
            ball_radius: 0.034,
            ball_mass: 0.17,
            pocket_radius: 0.072,
            table_width: 2.84,
            table_height: 1.42,
            table_origin: Vector2D::ZERO,
            px_per_meter: 400.0,
            velocity_threshold: 1e-3,
            max_drag_distance: 0.4,
            time_scale: 1000.0,
            rack_gap: 0.01,
            ball_count: 10,
            placement: PlacementKind::Triangle,
            max_placement_attempts: 10_000,
            collision_model: CollisionModel::EqualMass,
            seed: None,
        }
    }
}

fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(msg()))
    }
}

impl SimConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject anything the physics cannot run with.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.gravity,
            self.friction_coefficient,
            self.ball_radius,
            self.ball_mass,
            self.pocket_radius,
            self.table_width,
            self.table_height,
            self.table_origin.x,
            self.table_origin.y,
            self.px_per_meter,
            self.velocity_threshold,
            self.max_drag_distance,
            self.time_scale,
            self.rack_gap,
        ];
        ensure(finite.iter().all(|v| v.is_finite()), || {
            "all numeric fields must be finite".to_string()
        })?;

        ensure(self.ball_radius > 0.0, || {
            format!("ball_radius must be positive, got {}", self.ball_radius)
        })?;
        ensure(self.ball_mass > 0.0, || {
            format!("ball_mass must be positive, got {}", self.ball_mass)
        })?;
        ensure(self.pocket_radius > 0.0, || {
            format!("pocket_radius must be positive, got {}", self.pocket_radius)
        })?;
        ensure(self.table_width > 0.0 && self.table_height > 0.0, || {
            format!(
                "table dimensions must be positive, got {}x{}",
                self.table_width, self.table_height
            )
        })?;
        ensure(
            self.table_width > 2.0 * self.ball_radius && self.table_height > 2.0 * self.ball_radius,
            || "table must be wider and taller than one ball".to_string(),
        )?;
        ensure(self.px_per_meter > 0.0, || {
            format!("px_per_meter must be positive, got {}", self.px_per_meter)
        })?;
        ensure(self.gravity >= 0.0 && self.friction_coefficient >= 0.0, || {
            "gravity and friction_coefficient must not be negative".to_string()
        })?;
        ensure(self.velocity_threshold >= 0.0, || {
            "velocity_threshold must not be negative".to_string()
        })?;
        ensure(self.max_drag_distance > 0.0, || {
            "max_drag_distance must be positive".to_string()
        })?;
        ensure(self.time_scale > 0.0, || "time_scale must be positive".to_string())?;
        ensure(self.rack_gap >= 0.0, || "rack_gap must not be negative".to_string())?;
        ensure(self.ball_count >= 1, || "ball_count must be at least 1".to_string())?;
        ensure(self.max_placement_attempts >= 1, || {
            "max_placement_attempts must be at least 1".to_string()
        })?;
        Ok(())
    }

    /// Copy of this config with the runtime-tunable fields replaced.
    pub fn with_runtime(&self, runtime: &RuntimeConfig) -> Self {
        Self {
            gravity: runtime.gravity,
            friction_coefficient: runtime.friction_coefficient,
            ball_count: runtime.ball_count,
            placement: runtime.placement,
            ..self.clone()
        }
    }

    pub fn unit_scale(&self) -> UnitScale {
        UnitScale::new(self.px_per_meter)
    }
}

/// The knobs the UI may change while the app runs.
/// Applying them restarts the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub gravity: f32,
    pub friction_coefficient: f32,
    pub ball_count: usize,
    pub placement: PlacementKind,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig::from(&SimConfig::default())
    }
}

impl From<&SimConfig> for RuntimeConfig {
    fn from(config: &SimConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction_coefficient: config.friction_coefficient,
            ball_count: config.ball_count,
            placement: config.placement,
        }
    }
}

/// Conversion between table units (meters) and screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    px_per_meter: f32,
}

impl UnitScale {
    pub fn new(px_per_meter: f32) -> Self {
        Self { px_per_meter }
    }

    pub fn px_per_meter(&self) -> f32 {
        self.px_per_meter
    }

    pub fn meters_to_px(&self, meters: f32) -> f32 {
        meters * self.px_per_meter
    }

    pub fn px_to_meters(&self, px: f32) -> f32 {
        px / self.px_per_meter
    }

    pub fn vec_to_px(&self, v: Vector2D) -> Vector2D {
        v.scale(self.px_per_meter)
    }

    pub fn vec_to_meters(&self, v: Vector2D) -> Vector2D {
        Vector2D::new(v.x / self.px_per_meter, v.y / self.px_per_meter)
    }
}
