use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::types::{BallId, SimEvent};
use crate::config::{RuntimeConfig, SimConfig};
use crate::entities::ball::{Ball, BallIdAllocator, Kinematics};
use crate::entities::table::Table;
use crate::error::Result;
use crate::input::drag::DragPreview;
use crate::input::queue::{InputEvent, InputQueue};
use crate::math::vector::Vector2D;
use crate::physics::collision::CollisionResolver;
use crate::placement::PlacementService;

/// One simulation session: the table, its live balls and everything needed
/// to advance them frame by frame.
///
/// The host drives it: push input, call [`Simulation::step`] once per frame,
/// then read balls, drag preview and drained events.
pub struct Simulation {
    config: SimConfig,
    kinematics: Kinematics,
    table: Table,
    balls: Vec<Ball>,
    resolver: CollisionResolver,
    placement: PlacementService,
    ids: BallIdAllocator,
    rng: StdRng,
    events: Vec<SimEvent>,
    frame: u64,
    paused: bool,
}

impl Simulation {
    /// Validate `config`, build the table and lay out the first rack.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let table = Table::from_config(&config)?;
        let placement = PlacementService::new(&table, &config);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Self {
            kinematics: Kinematics::from(&config),
            resolver: CollisionResolver::new(config.collision_model),
            config,
            table,
            balls: Vec::new(),
            placement,
            ids: BallIdAllocator::new(),
            rng,
            events: Vec::new(),
            frame: 0,
            paused: false,
        };
        sim.reset()?;
        log::info!(
            "simulation started: {} balls, {:?} layout, {}x{} m table",
            sim.balls.len(),
            sim.config.placement,
            sim.config.table_width,
            sim.config.table_height
        );
        Ok(sim)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(SimConfig::from_json(json)?)
    }

    /// Advance one frame. `delta` is the dimensionless frame multiplier.
    ///
    /// Order: integrate, walls, pockets, ball-ball, then reset if the table
    /// emptied. No-op while paused.
    pub fn step(&mut self, delta: f32) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        self.frame += 1;

        for ball in &mut self.balls {
            ball.update(delta, &self.kinematics);
        }

        for ball in self.resolver.resolve_ball_board_collision(&self.table, &mut self.balls) {
            self.events.push(SimEvent::WallHit { ball });
        }
        for (ball, pocket) in self.resolver.resolve_ball_hole_collision(&self.table, &mut self.balls) {
            self.events.push(SimEvent::BallPocketed { ball, pocket });
        }
        for (a, b) in self.resolver.resolve_balls_collision(&mut self.balls) {
            self.events.push(SimEvent::BallsCollided { a, b });
        }

        if self.balls.is_empty() {
            log::info!("all balls pocketed on frame {}, resetting", self.frame);
            self.events.push(SimEvent::AllBallsRemoved);
            self.reset()?;
        }
        Ok(())
    }

    /// Remove every ball, forget contacts and any drag, then lay out a new
    /// rack. On failure the table is left empty.
    pub fn reset(&mut self) -> Result<()> {
        self.clear_table();
        self.balls = self.placement.get_placement(
            self.config.placement,
            self.config.ball_count,
            &mut self.ids,
            &mut self.rng,
        )?;
        log::debug!("table reset with {} balls", self.balls.len());
        Ok(())
    }

    /// Apply new runtime settings and restart the table.
    ///
    /// The new rack is laid out before anything is replaced. If the settings
    /// are invalid or the layout cannot be placed, the current config and
    /// balls stay as they were.
    pub fn reconfigure(&mut self, runtime: RuntimeConfig) -> Result<()> {
        let next = self.config.with_runtime(&runtime);
        next.validate()?;
        let placement = PlacementService::new(&self.table, &next);
        let balls = placement
            .get_placement(next.placement, next.ball_count, &mut self.ids, &mut self.rng)
            .map_err(|e| {
                log::warn!("reconfigure rejected, keeping current table: {}", e);
                e
            })?;

        log::info!("reconfigured: {:?}", runtime);
        self.kinematics = Kinematics::from(&next);
        self.config = next;
        self.placement = placement;
        self.clear_table();
        self.balls = balls;
        Ok(())
    }

    fn clear_table(&mut self) {
        self.balls.clear();
        self.resolver.clear();
        self.table.cancel_drag();
    }

    // -- Input --

    /// Route queued input. Does not drain the queue.
    pub fn handle_input(&mut self, input: &InputQueue) -> Result<()> {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => {
                    self.pointer_down(Vector2D::new(x, y));
                }
                InputEvent::PointerMove { x, y } => self.pointer_move(Vector2D::new(x, y)),
                InputEvent::PointerUp { .. } => self.pointer_up(),
                InputEvent::PointerLeave => self.pointer_leave(),
                InputEvent::Reset => self.reset()?,
                InputEvent::TogglePause => self.toggle_pause(),
            }
        }
        Ok(())
    }

    /// Begin a drag on the top-most ball under `point` (screen pixels).
    /// Returns whether a drag started.
    pub fn pointer_down(&mut self, point: Vector2D) -> bool {
        let target = self.table.scale().vec_to_meters(point);
        match self.balls.iter().rev().find(|b| b.contains_point(target)) {
            Some(ball) => self.table.begin_drag(ball),
            None => false,
        }
    }

    /// Begin a drag on a specific ball, e.g. when the host does its own
    /// hit testing.
    pub fn pointer_down_on(&mut self, id: BallId) -> bool {
        match self.balls.iter().find(|b| b.id == id) {
            Some(ball) => self.table.begin_drag(ball),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, point: Vector2D) {
        self.table.drag_move(point, &self.balls);
    }

    pub fn pointer_up(&mut self) {
        if let Some((ball, velocity)) = self.table.end_drag(&mut self.balls) {
            self.events.push(SimEvent::Launched { ball, velocity });
        }
    }

    pub fn pointer_leave(&mut self) {
        self.table.cancel_drag();
    }

    // -- Pause --

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // -- Read access --

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Mutable access for hosts that place or nudge balls directly.
    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn drag_preview(&self) -> Option<DragPreview> {
        self.table.drag_preview()
    }

    /// Frames stepped so far (paused frames excluded).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the live set, e.g. to set up a scenario.
    /// Contacts and any drag in progress are dropped.
    pub fn set_balls(&mut self, balls: Vec<Ball>) {
        self.resolver.clear();
        self.table.cancel_drag();
        self.balls = balls;
    }

    /// Id for a ball the host creates itself.
    pub fn next_ball_id(&mut self) -> BallId {
        self.ids.next_id()
    }
}
