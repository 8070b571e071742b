//! Notifications from the session controller to the UI.
//!
//! Single-threaded (WASM), so the queue sits behind `Rc<RefCell<..>>`.
//! The UI drains it once per frame. A hidden tab stops producing frames,
//! so the queue is bounded and sheds its oldest entries when full.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use studio_types::event::StudioEvent;

pub const DEFAULT_CAPACITY: usize = 256;

struct Queue {
    events: VecDeque<StudioEvent>,
    capacity: usize,
    dropped: usize,
}

#[derive(Clone)]
pub struct EventBus {
    queue: Rc<RefCell<Queue>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue {
                events: VecDeque::new(),
                capacity: capacity.max(1),
                dropped: 0,
            })),
        }
    }

    pub fn emit(&self, event: StudioEvent) {
        let mut queue = self.queue.borrow_mut();
        if queue.events.len() == queue.capacity {
            queue.events.pop_front();
            queue.dropped += 1;
        }
        queue.events.push_back(event);
    }

    /// Take everything queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<StudioEvent> {
        let mut queue = self.queue.borrow_mut();
        if queue.dropped > 0 {
            log::warn!("Event bus shed {} undrained events", queue.dropped);
            queue.dropped = 0;
        }
        queue.events.drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
