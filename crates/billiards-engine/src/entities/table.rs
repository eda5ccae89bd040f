use crate::api::types::BallId;
use crate::config::{SimConfig, UnitScale};
use crate::entities::ball::Ball;
use crate::error::{Result, SimError};
use crate::input::drag::{launch_multiplier, DragPreview, DragState};
use crate::math::vector::Vector2D;

/// Circular capture zone. A ball whose center falls inside is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vector2D,
    pub radius: f32,
}

impl Pocket {
    /// Strict containment test against the ball center, not its edge.
    pub fn captures(&self, point: Vector2D) -> bool {
        self.center.distance(point) < self.radius
    }
}

/// The play surface: walls, six fixed pockets and the launch gesture.
///
/// Geometry is in meters. Wall coordinates are derived from origin and size
/// on every call, so they cannot drift apart.
#[derive(Debug, Clone)]
pub struct Table {
    width: f32,
    height: f32,
    origin: Vector2D,
    pockets: [Pocket; 6],
    scale: UnitScale,
    max_drag_distance: f32,
    drag: DragState,
}

impl Table {
    pub fn new(
        width: f32,
        height: f32,
        origin: Vector2D,
        pocket_radius: f32,
        scale: UnitScale,
        max_drag_distance: f32,
    ) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "table dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !(pocket_radius > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "pocket radius must be positive, got {}",
                pocket_radius
            )));
        }

        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (x0 + width, y0 + height);
        // Corners first, then the middles of the two long sides.
        let middles = if width >= height {
            [Vector2D::new(x0 + width / 2.0, y0), Vector2D::new(x0 + width / 2.0, y1)]
        } else {
            [Vector2D::new(x0, y0 + height / 2.0), Vector2D::new(x1, y0 + height / 2.0)]
        };
        let centers = [
            Vector2D::new(x0, y0),
            Vector2D::new(x1, y0),
            Vector2D::new(x0, y1),
            Vector2D::new(x1, y1),
            middles[0],
            middles[1],
        ];
        let pockets = centers.map(|center| Pocket {
            center,
            radius: pocket_radius,
        });

        Ok(Self {
            width,
            height,
            origin,
            pockets,
            scale,
            max_drag_distance,
            drag: DragState::Idle,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self> {
        Self::new(
            config.table_width,
            config.table_height,
            config.table_origin,
            config.pocket_radius,
            config.unit_scale(),
            config.max_drag_distance,
        )
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn origin(&self) -> Vector2D {
        self.origin
    }

    pub fn center(&self) -> Vector2D {
        self.origin + Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn left_wall(&self) -> f32 {
        self.origin.x
    }

    pub fn right_wall(&self) -> f32 {
        self.origin.x + self.width
    }

    pub fn top_wall(&self) -> f32 {
        self.origin.y
    }

    pub fn bottom_wall(&self) -> f32 {
        self.origin.y + self.height
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn scale(&self) -> UnitScale {
        self.scale
    }

    /// Push a ball that crossed a wall back onto the boundary.
    ///
    /// Returns a reflection vector with components in `{-1, 1}`; a `-1`
    /// marks the axis whose wall was hit. `(1, 1)` means no wall was touched.
    /// The caller applies the reflection to the velocity.
    pub fn process_wall_collision(&self, ball: &mut Ball) -> Vector2D {
        let r = ball.radius();
        let mut reflection = Vector2D::ONE;

        if ball.position.x + r >= self.right_wall() {
            ball.position.x = self.right_wall() - r;
            reflection.x = -1.0;
        }
        if ball.position.x - r <= self.left_wall() {
            ball.position.x = self.left_wall() + r;
            reflection.x = -1.0;
        }
        if ball.position.y + r >= self.bottom_wall() {
            ball.position.y = self.bottom_wall() - r;
            reflection.y = -1.0;
        }
        if ball.position.y - r <= self.top_wall() {
            ball.position.y = self.top_wall() + r;
            reflection.y = -1.0;
        }

        reflection
    }

    /// Index of the pocket that captures this ball, if any.
    pub fn process_pocket_collision(&self, ball: &Ball) -> Option<usize> {
        self.pockets
            .iter()
            .position(|pocket| pocket.captures(ball.position))
    }

    // -- Launch gesture --

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Start dragging `ball`. Refused unless the ball is exactly at rest.
    pub fn begin_drag(&mut self, ball: &Ball) -> bool {
        if !ball.is_at_rest() {
            return false;
        }
        log::debug!("drag start on ball {}", ball.id);
        self.drag = DragState::Dragging {
            ball: ball.id,
            anchor: self.scale.vec_to_px(ball.position),
            current: None,
        };
        true
    }

    /// Track the pointer. Aborts the drag if the held ball is gone or has
    /// started moving; otherwise clamps the pull to the max drag distance.
    pub fn drag_move(&mut self, pointer: Vector2D, balls: &[Ball]) {
        let (held, anchor) = match self.drag {
            DragState::Dragging { ball, anchor, .. } => (ball, anchor),
            DragState::Idle => return,
        };
        if !balls.iter().any(|b| b.id == held && b.is_at_rest()) {
            log::debug!("drag on ball {} aborted, ball moved", held);
            self.cancel_drag();
            return;
        }

        let max_px = self.scale.meters_to_px(self.max_drag_distance);
        let offset = (pointer - anchor).clamp_length(max_px);
        self.drag = DragState::Dragging {
            ball: held,
            anchor,
            current: Some(anchor + offset),
        };
    }

    /// Release. Launches the held ball when both points are known and the
    /// ball is still at rest. The drag always resets.
    pub fn end_drag(&mut self, balls: &mut [Ball]) -> Option<(BallId, Vector2D)> {
        let drag = std::mem::take(&mut self.drag);
        let DragState::Dragging {
            ball,
            anchor,
            current: Some(current),
        } = drag
        else {
            return None;
        };

        let held = balls.iter_mut().find(|b| b.id == ball)?;
        if !held.is_at_rest() {
            return None;
        }

        let drag_vector = self.scale.vec_to_meters(anchor - current);
        held.velocity = drag_vector.scale(launch_multiplier(drag_vector.magnitude()));
        log::info!("launching ball {} with velocity {}", ball, held.velocity);
        Some((ball, held.velocity))
    }

    /// Pointer left the table or the gesture was cancelled.
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn drag_preview(&self) -> Option<DragPreview> {
        let DragState::Dragging {
            ball,
            anchor,
            current,
        } = self.drag
        else {
            return None;
        };
        let current = current.unwrap_or(anchor);
        let max_px = self.scale.meters_to_px(self.max_drag_distance);
        let intensity = ((current - anchor).magnitude() / max_px).clamp(0.0, 1.0);
        Some(DragPreview {
            ball,
            anchor,
            current,
            intensity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BallColor;

    const R: f32 = 0.034;

    fn table() -> Table {
        Table::from_config(&SimConfig::default()).unwrap()
    }

    fn ball(id: u32, x: f32, y: f32) -> Ball {
        Ball::new(BallId(id), Vector2D::new(x, y), R, 0.17, BallColor::WHITE)
    }

    #[test]
    fn walls_derive_from_origin() {
        let t = Table::new(2.0, 1.0, Vector2D::new(0.5, 0.25), 0.07, UnitScale::new(100.0), 0.4)
            .unwrap();
        assert_eq!(t.left_wall(), 0.5);
        assert_eq!(t.right_wall(), 2.5);
        assert_eq!(t.top_wall(), 0.25);
        assert_eq!(t.bottom_wall(), 1.25);
        assert_eq!(t.center(), Vector2D::new(1.5, 0.75));
    }

    #[test]
    fn six_pockets_on_corners_and_long_sides() {
        let t = table();
        assert_eq!(t.pockets().len(), 6);
        let centers: Vec<Vector2D> = t.pockets().iter().map(|p| p.center).collect();
        assert!(centers.contains(&Vector2D::new(0.0, 0.0)));
        assert!(centers.contains(&Vector2D::new(2.84, 1.42)));
        assert!(centers.contains(&Vector2D::new(1.42, 0.0)));
        assert!(centers.contains(&Vector2D::new(1.42, 1.42)));
    }

    #[test]
    fn portrait_table_puts_side_pockets_left_and_right() {
        let t = Table::new(1.0, 2.0, Vector2D::ZERO, 0.07, UnitScale::new(100.0), 0.4).unwrap();
        let centers: Vec<Vector2D> = t.pockets().iter().map(|p| p.center).collect();
        assert!(centers.contains(&Vector2D::new(0.0, 1.0)));
        assert!(centers.contains(&Vector2D::new(1.0, 1.0)));
    }

    #[test]
    fn rejects_bad_geometry() {
        let scale = UnitScale::new(100.0);
        assert!(Table::new(0.0, 1.0, Vector2D::ZERO, 0.07, scale, 0.4).is_err());
        assert!(Table::new(1.0, 1.0, Vector2D::ZERO, 0.0, scale, 0.4).is_err());
    }

    #[test]
    fn no_wall_contact_returns_sentinel() {
        let t = table();
        let mut b = ball(1, 1.0, 0.7);
        assert_eq!(t.process_wall_collision(&mut b), Vector2D::ONE);
        assert_eq!(b.position, Vector2D::new(1.0, 0.7));
    }

    #[test]
    fn edge_past_right_wall_is_clamped() {
        let t = table();
        let mut b = ball(1, t.right_wall() - R + 0.001, 0.7);
        let reflection = t.process_wall_collision(&mut b);
        assert_eq!(reflection, Vector2D::new(-1.0, 1.0));
        assert!((b.position.x + R - t.right_wall()).abs() < 1e-6);
        assert_eq!(b.velocity.mul_components(reflection), Vector2D::ZERO);
    }

    #[test]
    fn far_overshoot_into_corner_is_contained() {
        let t = table();
        let mut b = ball(1, -0.5, 3.0);
        let reflection = t.process_wall_collision(&mut b);
        assert_eq!(reflection, Vector2D::new(-1.0, -1.0));
        assert!(b.position.x - R >= t.left_wall() - 1e-6);
        assert!(b.position.y + R <= t.bottom_wall() + 1e-6);
    }

    #[test]
    fn pocket_capture_uses_center() {
        let t = table();
        // Edge overlaps the pocket but the center is outside.
        let outside = ball(1, 1.42, 0.072 + 0.001);
        assert_eq!(t.process_pocket_collision(&outside), None);
        let inside = ball(2, 1.42, 0.05);
        assert_eq!(t.process_pocket_collision(&inside), Some(4));
    }

    #[test]
    fn drag_requires_resting_ball() {
        let mut t = table();
        let moving = ball(1, 1.0, 0.7).with_velocity(Vector2D::new(0.01, 0.0));
        assert!(!t.begin_drag(&moving));
        assert_eq!(t.drag_state(), DragState::Idle);

        let resting = ball(2, 1.0, 0.7);
        assert!(t.begin_drag(&resting));
        assert_eq!(t.drag_state().held_ball(), Some(BallId(2)));
    }

    #[test]
    fn drag_move_clamps_to_max_distance() {
        let mut t = table();
        let balls = vec![ball(1, 1.0, 0.7)];
        t.begin_drag(&balls[0]);
        // 0.4 m at 400 px/m is 160 px.
        t.drag_move(Vector2D::new(400.0 + 1000.0, 280.0), &balls);
        let preview = t.drag_preview().unwrap();
        assert!((preview.anchor - Vector2D::new(400.0, 280.0)).magnitude() < 1e-3);
        assert!(((preview.current - preview.anchor).magnitude() - 160.0).abs() < 1e-3);
        assert!(preview.current.x > preview.anchor.x);
        assert!((preview.intensity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn drag_aborts_when_ball_starts_moving() {
        let mut t = table();
        let mut balls = vec![ball(1, 1.0, 0.7)];
        t.begin_drag(&balls[0]);
        balls[0].velocity = Vector2D::new(0.0, 0.02);
        t.drag_move(Vector2D::new(420.0, 280.0), &balls);
        assert_eq!(t.drag_state(), DragState::Idle);
    }

    #[test]
    fn release_launches_along_pull() {
        let mut t = table();
        let mut balls = vec![ball(1, 1.0, 0.7)];
        t.begin_drag(&balls[0]);
        // Pull 40 px (0.1 m) to the right of the ball.
        t.drag_move(Vector2D::new(440.0, 280.0), &balls);
        let (id, velocity) = t.end_drag(&mut balls).unwrap();
        assert_eq!(id, BallId(1));
        let expected = 0.1 * 0.5 * 1.1f32.ln();
        assert!((velocity.x - expected).abs() < 1e-6);
        assert!(velocity.y.abs() < 1e-6);
        assert_eq!(balls[0].velocity, velocity);
        assert_eq!(t.drag_state(), DragState::Idle);
    }

    #[test]
    fn release_without_move_does_not_launch() {
        let mut t = table();
        let mut balls = vec![ball(1, 1.0, 0.7)];
        t.begin_drag(&balls[0]);
        assert!(t.end_drag(&mut balls).is_none());
        assert!(balls[0].is_at_rest());
        assert_eq!(t.drag_state(), DragState::Idle);
    }

    #[test]
    fn cancel_discards_preview() {
        let mut t = table();
        let balls = vec![ball(1, 1.0, 0.7)];
        t.begin_drag(&balls[0]);
        t.drag_move(Vector2D::new(380.0, 280.0), &balls);
        t.cancel_drag();
        assert!(t.drag_preview().is_none());
    }
}
