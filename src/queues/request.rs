use std::cmp::Ordering;
use std::fmt;

pub type Time  = i64;
pub type JobId = u64;

/// The three servers of the network.
#[derive(PartialEq,Eq,Clone,Copy,Debug,Hash)]
pub enum Resource {
    Cpu,
    Disk1,
    Disk2,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Cpu, Resource::Disk1, Resource::Disk2];

    pub fn index(self) -> usize {
        match self {
            Resource::Cpu   => 0,
            Resource::Disk1 => 1,
            Resource::Disk2 => 2,
        }
    }

    /// Completion event kind for a job finishing at this resource.
    pub fn done_kind(self) -> EventKind {
        match self {
            Resource::Cpu   => EventKind::CpuDone,
            Resource::Disk1 => EventKind::Disk1Done,
            Resource::Disk2 => EventKind::Disk2Done,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resource::Cpu   => write!(f, "CPU"),
            Resource::Disk1 => write!(f, "Disk1"),
            Resource::Disk2 => write!(f, "Disk2"),
        }
    }
}

#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum EventKind {
    Arrival,
    CpuDone,
    Disk1Done,
    Disk2Done,
    SimEnd,
}

impl EventKind {
    // SimEnd wins ties against anything scheduled at FIN_TIME
    fn rank(self) -> u8 {
        match self {
            EventKind::SimEnd => 0,
            _ => 1,
        }
    }
}

/// A scheduled occurrence. Never mutated once created.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct Event {
    time: Time,
    job: JobId,
    kind: EventKind,
}

impl Event {
    pub fn new (time: Time, job: JobId, kind: EventKind) -> Self {
        Event { time, job, kind }
    }

    /// The terminal event carries no job.
    pub fn sim_end (time: Time) -> Self {
        Event::new(time, 0, EventKind::SimEnd)
    }

    pub fn get_time (&self) -> Time {
        self.time
    }

    pub fn get_job (&self) -> JobId {
        self.job
    }

    pub fn get_kind (&self) -> EventKind {
        self.kind
    }

    /// Heap ordering key. Only the time separates non-terminal events.
    pub fn precedes (&self, other: &Event) -> bool {
        self.key_cmp(other) == Ordering::Less
    }

    pub fn key_cmp (&self, other: &Event) -> Ordering {
        (self.time, self.kind.rank()).cmp(&(other.time, other.kind.rank()))
    }
}

/// A job waiting (or in service) at a resource.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct QueueEntry {
    pub job: JobId,
    pub enqueue_time: Time,
}
