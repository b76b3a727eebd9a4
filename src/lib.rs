//! Discrete-event simulation of a CPU feeding two disks.
//!
//! Jobs arrive at the CPU, are served, then either leave the network or go to
//! whichever disk has the shorter queue before coming back to the CPU. Time
//! only moves when the earliest scheduled event is dispatched.

pub mod config;
pub mod distribution;
pub mod error;
pub mod helpers;
pub mod queues;
pub mod stats;
pub mod sweep;

pub use crate::config::{Config, ConfigError, LoadedConfig};
pub use crate::error::{Error, InvariantViolation};
pub use crate::queues::queueing_network::{QNet, RunState, Transition, TransitionKind};
pub use crate::queues::request::{Event, EventKind, JobId, QueueEntry, Resource, Time};
pub use crate::stats::{ResourceStats, Statistics};
