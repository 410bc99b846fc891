use glam::Vec2;

/// Input event types the engine understands.
/// Generic: no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/cursor moved to world coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A printable key was pressed.
    Key { key: char },
    /// A command from the host UI (buttons, forms).
    Command { kind: u32 },
}

impl InputEvent {
    fn pointer(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

/// A queue of input events.
/// JS writes events into the queue; the runner hands them to the game on
/// the next tick and then clears it.
pub struct InputQueue {
    events: Vec<InputEvent>,
    last_pointer: Option<Vec2>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            last_pointer: None,
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        if let Some(p) = event.pointer() {
            self.last_pointer = Some(p);
        }
        self.events.push(event);
    }

    /// Iterate over pending events in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Drop pending events. The last pointer position survives.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Most recent pointer position seen, for hover feedback such as an aim line.
    pub fn last_pointer(&self) -> Option<Vec2> {
        self.last_pointer
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
    fn events_keep_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Key { key: '2' });
        q.push(InputEvent::Command { kind: 1 });
        assert_eq!(q.len(), 3);

        let kinds: Vec<_> = q.iter().copied().collect();
        assert_eq!(kinds[1], InputEvent::Key { key: '2' });

        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn last_pointer_survives_clear() {
        let mut q = InputQueue::new();
        assert_eq!(q.last_pointer(), None);
        q.push(InputEvent::PointerMove { x: 5.0, y: 6.0 });
        q.push(InputEvent::Key { key: '1' });
        q.clear();
        assert_eq!(q.last_pointer(), Some(Vec2::new(5.0, 6.0)));
    }
}
