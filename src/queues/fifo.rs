use std::collections::VecDeque;

use crate::error::InvariantViolation;
use crate::queues::request::{JobId, QueueEntry, Resource, Time};

/// FIFO line in front of one server. The head is the job in service.
#[derive(Debug)]
pub struct FifoQueue {
    resource: Resource,
    entries: VecDeque<QueueEntry>,
}

impl FifoQueue {
    pub fn new (resource: Resource) -> Self {
        FifoQueue {
            resource,
            entries: VecDeque::new(),
        }
    }

    pub fn push (&mut self, job: JobId, enqueue_time: Time) {
        self.entries.push_back(QueueEntry { job, enqueue_time });
    }

    pub fn pop (&mut self) -> Result<QueueEntry, InvariantViolation> {
        let resource = self.resource;
        self.entries.pop_front().ok_or(InvariantViolation::EmptyResourceQueue { resource })
    }

    pub fn peek (&self) -> Result<&QueueEntry, InvariantViolation> {
        let resource = self.resource;
        self.entries.front().ok_or(InvariantViolation::EmptyResourceQueue { resource })
    }

    pub fn is_empty (&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len (&self) -> usize {
        self.entries.len()
    }

    pub fn iter (&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}
