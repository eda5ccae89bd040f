//! Flat `f32` snapshot of the simulation for the presentation layer.
//! Must stay in sync with the host-side reader.
//!
//! Sections (each exposed through its own pointer):
//! ```text
//! [Header: 8 floats]
//! [Drag:   6 floats]  active, anchor x/y, current x/y, intensity (pixels)
//! [Pockets: 6 × 3 floats]  x, y, radius (meters)
//! [Balls:  n × 8 floats]   see `BallInstance`
//! [Events: m × 4 floats]   see `WireEvent`
//! ```

use bytemuck::{Pod, Zeroable};

use crate::api::session::Simulation;
use crate::api::types::{SimEvent, WireEvent};
use crate::entities::ball::Ball;
use crate::entities::table::Pocket;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_BALL_COUNT: usize = 2;
pub const HEADER_TABLE_X: usize = 3;
pub const HEADER_TABLE_Y: usize = 4;
pub const HEADER_TABLE_WIDTH: usize = 5;
pub const HEADER_TABLE_HEIGHT: usize = 6;
pub const HEADER_PX_PER_METER: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the drag preview section.
pub const DRAG_FLOATS: usize = 6;

/// Per-ball state, 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub id: f32,
    /// Center in meters.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Packed 0xRRGGBB, exact in f32.
    pub color: f32,
    pub speed: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl From<&Ball> for BallInstance {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id.0 as f32,
            x: ball.position.x,
            y: ball.position.y,
            vx: ball.velocity.x,
            vy: ball.velocity.y,
            radius: ball.radius(),
            color: ball.color.0 as f32,
            speed: ball.speed(),
        }
    }
}

/// Per-pocket geometry, 3 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PocketInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl PocketInstance {
    pub const FLOATS: usize = 3;
}

impl From<&Pocket> for PocketInstance {
    fn from(pocket: &Pocket) -> Self {
        Self {
            x: pocket.center.x,
            y: pocket.center.y,
            radius: pocket.radius,
        }
    }
}

/// Reusable snapshot buffers, rebuilt once per frame.
pub struct StateBuffer {
    header: [f32; HEADER_FLOATS],
    drag: [f32; DRAG_FLOATS],
    pockets: Vec<PocketInstance>,
    balls: Vec<BallInstance>,
    events: Vec<WireEvent>,
}

impl StateBuffer {
    pub fn new() -> Self {
        Self {
            header: [0.0; HEADER_FLOATS],
            drag: [0.0; DRAG_FLOATS],
            pockets: Vec::with_capacity(6),
            balls: Vec::with_capacity(32),
            events: Vec::with_capacity(32),
        }
    }

    /// Refresh every section from `sim`. `events` are the ones drained
    /// from the session this frame.
    pub fn rebuild(&mut self, sim: &Simulation, events: &[SimEvent]) {
        let table = sim.table();
        self.header = [0.0; HEADER_FLOATS];
        self.header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        self.header[HEADER_FRAME_COUNTER] = sim.frame() as f32;
        self.header[HEADER_BALL_COUNT] = sim.balls().len() as f32;
        self.header[HEADER_TABLE_X] = table.origin().x;
        self.header[HEADER_TABLE_Y] = table.origin().y;
        self.header[HEADER_TABLE_WIDTH] = table.width();
        self.header[HEADER_TABLE_HEIGHT] = table.height();
        self.header[HEADER_PX_PER_METER] = table.scale().px_per_meter();

        self.drag = match sim.drag_preview() {
            Some(p) => [1.0, p.anchor.x, p.anchor.y, p.current.x, p.current.y, p.intensity],
            None => [0.0; DRAG_FLOATS],
        };

        self.pockets.clear();
        self.pockets.extend(table.pockets().iter().map(PocketInstance::from));

        self.balls.clear();
        self.balls.extend(sim.balls().iter().map(BallInstance::from));

        self.events.clear();
        self.events.extend(events.iter().map(SimEvent::to_wire));
    }

    pub fn header(&self) -> &[f32] {
        &self.header
    }

    pub fn drag(&self) -> &[f32] {
        &self.drag
    }

    pub fn balls(&self) -> &[BallInstance] {
        &self.balls
    }

    pub fn pockets(&self) -> &[PocketInstance] {
        &self.pockets
    }

    pub fn events(&self) -> &[WireEvent] {
        &self.events
    }

    /// Ball records as one flat float slice.
    pub fn ball_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.balls)
    }

    // ---- Raw pointers for shared-memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn drag_ptr(&self) -> *const f32 {
        self.drag.as_ptr()
    }

    pub fn balls_ptr(&self) -> *const f32 {
        self.balls.as_ptr() as *const f32
    }

    pub fn pockets_ptr(&self) -> *const f32 {
        self.pockets.as_ptr() as *const f32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }
}

impl Default for StateBuffer {
    fn default() -> Self {
        Self::new()
    }
}
