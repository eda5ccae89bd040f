pub mod api;
pub mod bridge;
pub mod config;
pub mod core;
pub mod entities;
pub mod error;
pub mod input;
pub mod math;
pub mod physics;
pub mod placement;

// Re-export key types at crate root for convenience
pub use api::session::Simulation;
pub use api::types::{BallColor, BallId, SimEvent, WireEvent};
pub use bridge::protocol::{BallInstance, PocketInstance, StateBuffer};
pub use config::{RuntimeConfig, SimConfig, UnitScale};
pub use crate::core::time::FrameClock;
pub use entities::ball::{Ball, BallIdAllocator, CollisionModel, Kinematics};
pub use entities::table::{Pocket, Table};
pub use error::{Result, SimError};
pub use input::drag::{DragPreview, DragState};
pub use input::queue::{InputEvent, InputQueue};
pub use math::vector::Vector2D;
pub use physics::collision::CollisionResolver;
pub use placement::{PlacementKind, PlacementService};
