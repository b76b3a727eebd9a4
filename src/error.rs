use std::io;

use crate::config::ConfigError;
use crate::queues::request::{JobId, Resource, Time};

/// Broken engine invariants. These are logic defects: the run aborts.
#[derive(Debug,Clone,PartialEq,Eq,thiserror::Error)]
pub enum InvariantViolation {
    #[error("attempted to pop from an empty event heap")]
    EmptyEventHeap,
    #[error("attempted to pop from an empty {resource} queue")]
    EmptyResourceQueue { resource: Resource },
    #[error("event heap exhausted at time {time} before the simulation end event")]
    HeapExhausted { time: Time },
    #[error("{resource} completion for Job{expected} but Job{found} heads the queue")]
    JobMismatch { resource: Resource, expected: JobId, found: JobId },
}

#[derive(Debug,thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("engine invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
