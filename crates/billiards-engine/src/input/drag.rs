use crate::api::types::BallId;
use crate::math::vector::Vector2D;

/// Launch gesture state. Points are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        ball: BallId,
        /// Ball center when the drag began.
        anchor: Vector2D,
        /// Latest pointer position, already clamped to the max drag distance.
        /// `None` until the first move.
        current: Option<Vector2D>,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn held_ball(&self) -> Option<BallId> {
        match *self {
            DragState::Dragging { ball, .. } => Some(ball),
            DragState::Idle => None,
        }
    }
}

/// What the presentation layer needs to draw an aiming line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub ball: BallId,
    pub anchor: Vector2D,
    pub current: Vector2D,
    /// Pull length relative to the maximum, in `[0, 1]`.
    pub intensity: f32,
}

/// Speed multiplier for a pull of `length` meters.
/// Logarithmic, so long pulls add less and less speed.
pub fn launch_multiplier(length: f32) -> f32 {
    -0.5 * (1.0 + length).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_holds_nothing() {
        assert!(!DragState::Idle.is_dragging());
        assert_eq!(DragState::default().held_ball(), None);
    }

    #[test]
    fn multiplier_is_sub_linear() {
        assert_eq!(launch_multiplier(0.0), 0.0);
        let short = launch_multiplier(0.1).abs() * 0.1;
        let long = launch_multiplier(0.4).abs() * 0.4;
        assert!(long > short);
        assert!(launch_multiplier(0.4).abs() / launch_multiplier(0.1).abs() < 4.0);
    }
}
