/// Input events the simulation understands.
/// Pointer coordinates are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y). Starts a drag if it lands on a resting ball.
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at (x, y). Releases the drag.
    PointerUp { x: f32, y: f32 },
    /// The pointer moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// The pointer left the table surface.
    PointerLeave,
    /// Clear the table and lay out a fresh rack.
    Reset,
    /// Stop or resume stepping.
    TogglePause,
}

/// Gestures collected between two frames, in arrival order.
///
/// Consecutive pointer moves collapse into the latest one, since the drag
/// only tracks where the pointer ended up. Anything else is kept as pushed.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        let coalesce = matches!(event, InputEvent::PointerMove { .. })
            && matches!(self.events.last(), Some(InputEvent::PointerMove { .. }));
        match self.events.last_mut() {
            Some(last) if coalesce => *last = event,
            _ => self.events.push(event),
        }
    }

    /// Hand over this frame's gestures and start the next frame empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending gestures, oldest first. The session routes them from here.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Drop pending gestures, e.g. when the rack they aimed at is replaced.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::PointerLeave);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InputEvent::PointerLeave);
        assert!(q.is_empty());
    }

    #[test]
    fn iter_does_not_consume() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Reset);
        assert_eq!(q.iter().count(), 1);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn consecutive_moves_keep_only_the_latest() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        q.push(InputEvent::PointerMove { x: 2.0, y: 2.0 });
        q.push(InputEvent::PointerMove { x: 3.0, y: 4.0 });
        q.push(InputEvent::PointerUp { x: 3.0, y: 4.0 });
        q.push(InputEvent::PointerMove { x: 5.0, y: 5.0 });

        let events = q.drain();
        assert_eq!(
            events,
            vec![
                InputEvent::PointerDown { x: 1.0, y: 1.0 },
                InputEvent::PointerMove { x: 3.0, y: 4.0 },
                InputEvent::PointerUp { x: 3.0, y: 4.0 },
                InputEvent::PointerMove { x: 5.0, y: 5.0 },
            ]
        );
    }

    #[test]
    fn clear_discards_pending_gestures() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Reset);
        q.push(InputEvent::TogglePause);
        q.clear();
        assert!(q.is_empty());
    }
}
