use serde::{Deserialize, Serialize};

use crate::api::types::{BallColor, BallId};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::math::vector::Vector2D;

/// How two colliding balls share momentum along the contact normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionModel {
    /// Swap the normal components. Mass is ignored.
    #[default]
    EqualMass,
    /// 1-D elastic exchange weighted by each ball's mass.
    MassWeighted,
}

/// Parameters of the per-frame friction integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub friction_coefficient: f32,
    pub gravity: f32,
    pub velocity_threshold: f32,
    pub time_scale: f32,
}

impl From<&SimConfig> for Kinematics {
    fn from(config: &SimConfig) -> Self {
        Self {
            friction_coefficient: config.friction_coefficient,
            gravity: config.gravity,
            velocity_threshold: config.velocity_threshold,
            time_scale: config.time_scale,
        }
    }
}

/// Hands out ball ids from a monotonic counter.
#[derive(Debug, Clone)]
pub struct BallIdAllocator {
    next: u32,
}

impl BallIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> BallId {
        let id = BallId(self.next);
        self.next += 1;
        id
    }
}

impl Default for BallIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A moving disc on the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: BallId,
    /// Center, in meters.
    pub position: Vector2D,
    /// Displacement per unit frame, in meters.
    pub velocity: Vector2D,
    pub color: BallColor,
    radius: f32,
    mass: f32,
}

impl Ball {
    /// Create a resting ball. `radius` and `mass` must be positive;
    /// the session guarantees this by validating its config.
    pub fn new(id: BallId, position: Vector2D, radius: f32, mass: f32, color: BallColor) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            id,
            position,
            velocity: Vector2D::ZERO,
            color,
            radius,
            mass,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// True only when the velocity is exactly zero.
    pub fn is_at_rest(&self) -> bool {
        self.speed() == 0.0
    }

    /// Pointer hit test, `point` in meters.
    pub fn contains_point(&self, point: Vector2D) -> bool {
        self.position.distance(point) <= self.radius
    }

    /// Advance one frame: constant-magnitude friction opposing motion,
    /// then forward-Euler translation.
    ///
    /// `delta_time` is a dimensionless frame multiplier (1.0 = one frame).
    /// Friction never reverses the direction of travel; a ball whose speed
    /// would overshoot zero stops exactly.
    pub fn update(&mut self, delta_time: f32, kinematics: &Kinematics) {
        if self.speed() < kinematics.velocity_threshold {
            self.velocity = Vector2D::ZERO;
            return;
        }
        let direction = match self.velocity.normalize() {
            Ok(direction) => direction,
            Err(_) => {
                self.velocity = Vector2D::ZERO;
                return;
            }
        };

        let deceleration = kinematics.friction_coefficient * kinematics.gravity * delta_time.max(0.0)
            / kinematics.time_scale;
        let delta_velocity = direction.scale(deceleration);

        if delta_velocity.magnitude() > self.speed() {
            self.velocity = Vector2D::ZERO;
        } else {
            self.velocity -= delta_velocity;
        }

        self.position += self.velocity;
    }

    /// True iff the discs touch or overlap.
    pub fn is_collided(&self, other: &Ball) -> bool {
        self.position.distance(other.position) <= self.radius + other.radius
    }

    /// Elastic exchange along the line connecting the centers.
    ///
    /// Tangential components are untouched. Fails without modifying either
    /// ball when the centers coincide, since no contact normal exists.
    pub fn collide(&mut self, other: &mut Ball, model: CollisionModel) -> Result<()> {
        let normal = (self.position - other.position)
            .normalize()
            .map_err(|_| SimError::CoincidentCenters {
                a: self.id,
                b: other.id,
            })?;

        let va = self.velocity.dot(normal);
        let vb = other.velocity.dot(normal);

        let (va_after, vb_after) = match model {
            CollisionModel::EqualMass => (vb, va),
            CollisionModel::MassWeighted => {
                let (ma, mb) = (self.mass, other.mass);
                let total = ma + mb;
                (
                    (va * (ma - mb) + 2.0 * mb * vb) / total,
                    (vb * (mb - ma) + 2.0 * ma * va) / total,
                )
            }
        };

        self.velocity += normal.scale(va_after - va);
        other.velocity += normal.scale(vb_after - vb);
        Ok(())
    }
}
