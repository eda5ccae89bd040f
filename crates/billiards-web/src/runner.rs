use billiards_engine::{
    FrameClock, InputEvent, InputQueue, Result, RuntimeConfig, SimConfig, Simulation, StateBuffer,
};

/// Wires one simulation session to the browser frame loop.
///
/// The host pushes pointer input as it arrives, calls `tick` once per
/// animation frame and then reads the state buffer through raw pointers.
pub struct SessionRunner {
    sim: Simulation,
    input: InputQueue,
    clock: FrameClock,
    state: StateBuffer,
}

impl SessionRunner {
    pub fn new(config: SimConfig) -> Result<Self> {
        let sim = Simulation::new(config)?;
        let mut state = StateBuffer::new();
        state.rebuild(&sim, &[]);
        Ok(Self {
            sim,
            input: InputQueue::new(),
            clock: FrameClock::default(),
            state,
        })
    }

    /// Build from a JSON config; an empty string means defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Self::new(SimConfig::default());
        }
        Self::new(SimConfig::from_json(json)?)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: route input, step physics, rebuild the state buffer.
    pub fn tick(&mut self, elapsed_seconds: f32) {
        if let Err(e) = self.sim.handle_input(&self.input) {
            log::error!("input handling failed: {}", e);
        }
        self.input.clear();

        let delta = self.clock.delta(elapsed_seconds);
        if let Err(e) = self.sim.step(delta) {
            log::error!("step failed on frame {}: {}", self.sim.frame(), e);
        }

        let events = self.sim.drain_events();
        self.state.rebuild(&self.sim, &events);
    }

    /// Apply new runtime settings. Pending input is dropped with the old rack.
    pub fn reconfigure(&mut self, runtime: RuntimeConfig) -> Result<()> {
        self.sim.reconfigure(runtime)?;
        self.input.clear();
        self.state.rebuild(&self.sim, &[]);
        Ok(())
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn state(&self) -> &StateBuffer {
        &self.state
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.state.header_ptr()
    }

    pub fn header_len(&self) -> u32 {
        self.state.header().len() as u32
    }

    pub fn drag_ptr(&self) -> *const f32 {
        self.state.drag_ptr()
    }

    pub fn drag_len(&self) -> u32 {
        self.state.drag().len() as u32
    }

    pub fn pockets_ptr(&self) -> *const f32 {
        self.state.pockets_ptr()
    }

    pub fn pocket_count(&self) -> u32 {
        self.state.pockets().len() as u32
    }

    pub fn balls_ptr(&self) -> *const f32 {
        self.state.balls_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.state.balls().len() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.state.events_ptr()
    }

    pub fn event_count(&self) -> u32 {
        self.state.events().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SessionRunner {
        SessionRunner::new(SimConfig {
            seed: Some(21),
            ..SimConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn state_is_ready_before_first_tick() {
        let r = runner();
        assert_eq!(r.ball_count(), 11);
        assert_eq!(r.pocket_count(), 6);
        assert_eq!(r.event_count(), 0);
    }

    #[test]
    fn empty_json_uses_defaults() {
        let r = SessionRunner::from_json("  ").unwrap();
        assert_eq!(r.simulation().config().ball_count, 10);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(SessionRunner::from_json("{ not json").is_err());
    }

    #[test]
    fn tick_advances_frame_and_drains_input() {
        let mut r = runner();
        r.push_input(InputEvent::TogglePause);
        r.tick(1.0 / 60.0);
        assert!(r.simulation().is_paused());
        assert_eq!(r.simulation().frame(), 0);

        r.push_input(InputEvent::TogglePause);
        r.tick(1.0 / 60.0);
        r.tick(1.0 / 60.0);
        assert_eq!(r.simulation().frame(), 2);
    }

    #[test]
    fn reconfigure_rebuilds_state() {
        let mut r = runner();
        let mut runtime = RuntimeConfig::from(r.simulation().config());
        runtime.ball_count = 3;
        r.reconfigure(runtime).unwrap();
        assert_eq!(r.ball_count(), 4);
    }

    #[test]
    fn drag_and_release_reports_launch_event() {
        let mut r = runner();
        let cue = r.simulation().balls().last().unwrap().position;
        let px = r.simulation().table().scale().vec_to_px(cue);

        r.push_input(InputEvent::PointerDown { x: px.x, y: px.y });
        r.push_input(InputEvent::PointerMove { x: px.x - 50.0, y: px.y });
        r.tick(0.0);
        assert_eq!(r.state().drag()[0], 1.0);

        r.push_input(InputEvent::PointerUp { x: px.x - 50.0, y: px.y });
        r.tick(0.0);
        assert_eq!(r.state().drag()[0], 0.0);
        assert!(r.event_count() >= 1);
    }
}
