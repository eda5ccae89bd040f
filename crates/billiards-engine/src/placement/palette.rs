//! Ball colours, cycled by placement index.

use crate::api::types::BallColor;

pub const CUE_BALL: BallColor = BallColor::WHITE;

pub const BALLS: [BallColor; 15] = [
    BallColor(0xff5733), // orange
    BallColor(0xffc300), // yellow
    BallColor(0x900c3f), // magenta
    BallColor(0x2980b9), // blue
    BallColor(0x27ae60), // green
    BallColor(0x8e44ad), // purple
    BallColor(0xe74c3c), // red
    BallColor(0xf1c40f), // sunflower
    BallColor(0xffb31a), // bright orange
    BallColor(0xff99cc), // soft pink
    BallColor(0x99ccff), // pale blue
    BallColor(0x99ffcc), // pale green
    BallColor(0xff9999), // soft red
    BallColor(0xffcc99), // soft orange
    BallColor(0xff66ff), // pastel pink
];

/// Colour for the `index`-th placed object ball.
pub fn ball_color(index: usize) -> BallColor {
    BALLS[index % BALLS.len()]
}
