//! Initial ball layouts: triangular rack and random scatter, plus the cue ball.

pub mod palette;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::api::types::BallColor;
use crate::config::SimConfig;
use crate::entities::ball::{Ball, BallIdAllocator};
use crate::entities::table::Table;
use crate::error::{Result, SimError};
use crate::math::vector::Vector2D;

/// Which generator lays out the object balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementKind {
    #[default]
    Triangle,
    Random,
}

/// Generates ball layouts for a table.
#[derive(Debug, Clone)]
pub struct PlacementService {
    origin: Vector2D,
    width: f32,
    height: f32,
    ball_radius: f32,
    ball_mass: f32,
    rack_gap: f32,
    max_attempts: u32,
}

impl PlacementService {
    pub fn new(table: &Table, config: &SimConfig) -> Self {
        Self {
            origin: table.origin(),
            width: table.width(),
            height: table.height(),
            ball_radius: config.ball_radius,
            ball_mass: config.ball_mass,
            rack_gap: config.rack_gap,
            max_attempts: config.max_placement_attempts,
        }
    }

    /// `count` object balls laid out by `kind`, followed by the cue ball.
    pub fn get_placement<R: Rng + ?Sized>(
        &self,
        kind: PlacementKind,
        count: usize,
        ids: &mut BallIdAllocator,
        rng: &mut R,
    ) -> Result<Vec<Ball>> {
        let cue = self.cue_position();
        let positions = match kind {
            PlacementKind::Triangle => self.triangle_positions(count),
            PlacementKind::Random => self.scatter_positions(count, &[cue], rng)?,
        };

        let mut balls: Vec<Ball> = positions
            .into_iter()
            .enumerate()
            .map(|(i, pos)| self.create_ball(ids, pos, palette::ball_color(i)))
            .collect();
        balls.push(self.create_ball(ids, cue, palette::CUE_BALL));
        Ok(balls)
    }

    /// Quarter width from the left wall, vertically centred.
    pub fn cue_position(&self) -> Vector2D {
        self.origin + Vector2D::new(self.width / 4.0, self.height / 2.0)
    }

    /// Rows grow to the right of a start point three quarters across the
    /// table. Row `r` holds `r` balls; each new row starts one radius higher.
    pub fn triangle_positions(&self, count: usize) -> Vec<Vector2D> {
        let spacing = 2.0 * self.ball_radius + self.rack_gap;
        let start_x = self.origin.x + 0.75 * self.width;
        let mut start_y = self.origin.y + 0.5 * self.height;

        let mut positions = Vec::with_capacity(count);
        let mut row = 1usize;
        let mut slot = 1usize;
        for _ in 0..count {
            positions.push(Vector2D::new(
                start_x + (row - 1) as f32 * spacing,
                start_y + (slot - 1) as f32 * spacing,
            ));

            slot += 1;
            if slot > row {
                row += 1;
                slot = 1;
                start_y -= self.ball_radius;
            }
        }
        positions
    }

    /// Uniform rejection sampling inside the walls, inset by one radius.
    ///
    /// A sample is rejected when it lies within two radii of any ball placed
    /// so far or of a `reserved` spot. Each ball gets `max_attempts` tries;
    /// running out yields [`SimError::LayoutInfeasible`].
    pub fn scatter_positions<R: Rng + ?Sized>(
        &self,
        count: usize,
        reserved: &[Vector2D],
        rng: &mut R,
    ) -> Result<Vec<Vector2D>> {
        let r = self.ball_radius;
        let min_distance = 2.0 * r;
        let span_x = (self.width - 2.0 * r).max(0.0);
        let span_y = (self.height - 2.0 * r).max(0.0);

        let mut positions: Vec<Vector2D> = Vec::with_capacity(count);
        for _ in 0..count {
            let accepted = (0..self.max_attempts).find_map(|_| {
                let candidate = Vector2D::new(
                    self.origin.x + r + rng.gen::<f32>() * span_x,
                    self.origin.y + r + rng.gen::<f32>() * span_y,
                );
                let clear = reserved
                    .iter()
                    .chain(positions.iter())
                    .all(|p| p.distance(candidate) > min_distance);
                clear.then_some(candidate)
            });

            match accepted {
                Some(pos) => positions.push(pos),
                None => {
                    return Err(SimError::LayoutInfeasible {
                        placed: positions.len(),
                        requested: count,
                        attempts: self.max_attempts,
                    })
                }
            }
        }
        Ok(positions)
    }

    fn create_ball(
        &self,
        ids: &mut BallIdAllocator,
        position: Vector2D,
        color: BallColor,
    ) -> Ball {
        Ball::new(ids.next_id(), position, self.ball_radius, self.ball_mass, color)
    }
}
