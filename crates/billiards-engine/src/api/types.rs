use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::vector::Vector2D;

/// Unique identifier for a ball within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque display token for a ball, packed 0xRRGGBB.
/// The core never interprets it; the presentation layer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallColor(pub u32);

impl BallColor {
    pub const WHITE: BallColor = BallColor(0xffffff);
}

/// Something that happened during a frame, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A ball's center entered a pocket; the ball left the live set.
    BallPocketed { ball: BallId, pocket: usize },
    /// Two balls started touching and exchanged momentum.
    BallsCollided { a: BallId, b: BallId },
    /// A ball was pushed back from a wall and its velocity reflected.
    WallHit { ball: BallId },
    /// The last ball left the table. The session resets right after.
    AllBallsRemoved,
    /// A drag gesture ended and gave a resting ball a velocity.
    Launched { ball: BallId, velocity: Vector2D },
}

impl SimEvent {
    pub const KIND_BALL_POCKETED: f32 = 1.0;
    pub const KIND_BALLS_COLLIDED: f32 = 2.0;
    pub const KIND_WALL_HIT: f32 = 3.0;
    pub const KIND_ALL_BALLS_REMOVED: f32 = 4.0;
    pub const KIND_LAUNCHED: f32 = 5.0;

    /// Flatten into the fixed 4-float record read by the bridge.
    pub fn to_wire(&self) -> WireEvent {
        match *self {
            SimEvent::BallPocketed { ball, pocket } => WireEvent {
                kind: Self::KIND_BALL_POCKETED,
                a: ball.0 as f32,
                b: pocket as f32,
                c: 0.0,
            },
            SimEvent::BallsCollided { a, b } => WireEvent {
                kind: Self::KIND_BALLS_COLLIDED,
                a: a.0 as f32,
                b: b.0 as f32,
                c: 0.0,
            },
            SimEvent::WallHit { ball } => WireEvent {
                kind: Self::KIND_WALL_HIT,
                a: ball.0 as f32,
                b: 0.0,
                c: 0.0,
            },
            SimEvent::AllBallsRemoved => WireEvent {
                kind: Self::KIND_ALL_BALLS_REMOVED,
                ..WireEvent::default()
            },
            SimEvent::Launched { ball, velocity } => WireEvent {
                kind: Self::KIND_LAUNCHED,
                a: ball.0 as f32,
                b: velocity.x,
                c: velocity.y,
            },
        }
    }
}

/// A simulation event as written to the shared state buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
}
