use crate::error::InvariantViolation;
use crate::queues::request::Event;

const INIT_CAPACITY: usize = 16;

#[derive(PartialEq,Eq,Clone,Copy,Debug)]
enum Sink {
    Left,
    Right,
    Stop,
}

/// Array-backed binary min-heap of events.
///
/// Ties are not broken FIFO: sift-down prefers the left child when both
/// children compare equal, and only sinks while a child is strictly smaller.
/// Simulation traces depend on this exact order.
#[derive(Debug)]
pub struct EventHeap {
    events: Vec<Event>,
}

impl Default for EventHeap {
    fn default() -> Self {
        EventHeap::new()
    }
}

impl EventHeap {
    pub fn new () -> EventHeap {
        EventHeap {
            events: Vec::with_capacity(INIT_CAPACITY)
        }
    }

    pub fn push (&mut self, event: Event) {
        if self.events.len() == self.events.capacity() {
            let capacity = self.events.capacity().max(1);
            self.events.reserve_exact(capacity);
        }
        self.events.push(event);

        let mut index = self.events.len() - 1;
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.events[index].precedes(&self.events[parent]) {
                self.events.swap(index, parent);
                index = parent;
            }
            else {
                break;
            }
        }
    }

    pub fn peek (&self) -> Result<&Event, InvariantViolation> {
        self.events.first().ok_or(InvariantViolation::EmptyEventHeap)
    }

    pub fn pop (&mut self) -> Result<Event, InvariantViolation> {
        if self.events.is_empty() {
            return Err(InvariantViolation::EmptyEventHeap);
        }
        let ret = self.events.swap_remove(0);

        let mut index = 0;
        loop {
            match self.sinkable(index) {
                Sink::Left => {
                    self.events.swap(index, 2 * index + 1);
                    index = 2 * index + 1;
                },
                Sink::Right => {
                    self.events.swap(index, 2 * index + 2);
                    index = 2 * index + 2;
                },
                Sink::Stop => break,
            }
        }

        Ok(ret)
    }

    // Which way, if any, the node at 'index' should sink
    fn sinkable (&self, index: usize) -> Sink {
        let size = self.events.len();
        let (left, right) = (2 * index + 1, 2 * index + 2);
        if left >= size {
            return Sink::Stop;
        }

        let current = &self.events[index];
        let l = &self.events[left];
        if right >= size {
            return if l.precedes(current) { Sink::Left } else { Sink::Stop };
        }

        let r = &self.events[right];
        if !r.precedes(l) && l.precedes(current) {
            Sink::Left
        }
        else if !l.precedes(r) && r.precedes(current) {
            Sink::Right
        }
        else {
            Sink::Stop
        }
    }

    pub fn len (&self) -> usize {
        self.events.len()
    }

    pub fn is_empty (&self) -> bool {
        self.events.is_empty()
    }

    /// Discards whatever is still scheduled without dispatching it.
    pub fn clear (&mut self) {
        self.events.clear()
    }

    #[cfg(test)]
    fn as_slice (&self) -> &[Event] {
        &self.events
    }
}
