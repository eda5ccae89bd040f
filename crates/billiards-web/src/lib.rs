pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use billiards_engine::{InputEvent, RuntimeConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` until `billiards_init` succeeded.
fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("billiards not initialized, call billiards_init() first");
                None
            }
        }
    })
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

/// Create the session. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn billiards_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("billiards: initialized");
    Ok(())
}

/// Apply runtime settings from the host's options panel and restart the table.
#[wasm_bindgen]
pub fn billiards_reconfigure(runtime_json: &str) -> Result<(), JsValue> {
    let runtime: RuntimeConfig =
        serde_json::from_str(runtime_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    match with_runner(|r| r.reconfigure(runtime)) {
        Some(result) => result.map_err(|e| JsValue::from_str(&e.to_string())),
        None => Err(JsValue::from_str("billiards not initialized")),
    }
}

#[wasm_bindgen]
pub fn billiards_tick(elapsed_seconds: f32) {
    with_runner(|r| r.tick(elapsed_seconds));
}

#[wasm_bindgen]
pub fn billiards_pointer_down(x: f32, y: f32) {
    push(InputEvent::PointerDown { x, y });
}

#[wasm_bindgen]
pub fn billiards_pointer_move(x: f32, y: f32) {
    push(InputEvent::PointerMove { x, y });
}

#[wasm_bindgen]
pub fn billiards_pointer_up(x: f32, y: f32) {
    push(InputEvent::PointerUp { x, y });
}

#[wasm_bindgen]
pub fn billiards_pointer_leave() {
    push(InputEvent::PointerLeave);
}

#[wasm_bindgen]
pub fn billiards_reset() {
    push(InputEvent::Reset);
}

#[wasm_bindgen]
pub fn billiards_toggle_pause() {
    push(InputEvent::TogglePause);
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_header_len() -> u32 {
    with_runner(|r| r.header_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_drag_ptr() -> *const f32 {
    with_runner(|r| r.drag_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_drag_len() -> u32 {
    with_runner(|r| r.drag_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_pockets_ptr() -> *const f32 {
    with_runner(|r| r.pockets_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_pocket_count() -> u32 {
    with_runner(|r| r.pocket_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_balls_ptr() -> *const f32 {
    with_runner(|r| r.balls_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count()).unwrap_or(0)
}
