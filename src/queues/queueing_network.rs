use std::fmt;

use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::distribution::Delays;
use crate::error::InvariantViolation;
use crate::helpers::event_heap::EventHeap;
use crate::queues::fifo::FifoQueue;
use crate::queues::request::{Event, EventKind, JobId, Resource, Time};
use crate::stats::Statistics;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum RunState {
    Running,
    Terminated,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TransitionKind {
    Arrival,
    Finished(Resource),
    Quit,
    SimulationFinished,
}

/// A log-worthy occurrence produced while dispatching an event.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Transition {
    pub time: Time,
    pub job: JobId,
    pub kind: TransitionKind,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TransitionKind::Arrival => write!(f, "{}: Job{} arrives", self.time, self.job),
            TransitionKind::Finished(Resource::Cpu) => write!(f, "{}: Job{} finishes at CPU", self.time, self.job),
            TransitionKind::Finished(Resource::Disk1) => write!(f, "{}: Job{} finishes at disk1", self.time, self.job),
            TransitionKind::Finished(Resource::Disk2) => write!(f, "{}: Job{} finishes at disk2", self.time, self.job),
            TransitionKind::Quit => write!(f, "{}: Job{} quitting", self.time, self.job),
            TransitionKind::SimulationFinished => write!(f, "{}: Simulation Finished", self.time),
        }
    }
}

/// One server: its line of jobs and when it last went from idle to busy.
#[derive(Debug)]
struct Server {
    queue: FifoQueue,
    service_start: Time,
}

impl Server {
    fn new (resource: Resource) -> Self {
        Server { queue: FifoQueue::new(resource), service_start: 0 }
    }
}

/// Builds the run's generator from the configured seed.
pub fn seeded_rng (seed: i64) -> StdRng {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    StdRng::from_seed(bytes)
}

/// CPU + two disks driven by a single time-ordered event heap.
///
/// Jobs arrive at the CPU, then either quit or move to the shorter disk
/// queue (Disk2 on ties), and come back to the CPU after disk service.
/// The job at the head of each queue is the one in service.
pub struct QNet<R = StdRng> {
    delays: Delays,
    rng: R,
    events: EventHeap,
    servers: [Server; 3],
    time: Time,
    job_count: JobId,
    state: RunState,
    stats: Statistics,
}

impl QNet<StdRng> {
    pub fn new (config: &Config) -> Result<Self, ConfigError> {
        QNet::with_rng(config, seeded_rng(config.seed))
    }
}

impl<R> QNet<R> where R: RngCore {

    pub fn with_rng (config: &Config, rng: R) -> Result<Self, ConfigError> {
        let delays = Delays::from_config(config)?;

        let mut events = EventHeap::new();
        events.push(Event::sim_end(config.fin_time));
        events.push(Event::new(config.init_time, 1, EventKind::Arrival));

        Ok(QNet {
            delays,
            rng,
            events,
            servers: [Server::new(Resource::Cpu), Server::new(Resource::Disk1), Server::new(Resource::Disk2)],
            time: config.init_time,
            job_count: 1,
            state: RunState::Running,
            stats: Statistics::new(config.duration()),
        })
    }

    /// Pops the earliest event and applies it. Returns what happened, in
    /// order; nothing once the run has terminated.
    pub fn make_transition (&mut self) -> Result<Vec<Transition>, InvariantViolation> {
        if self.state == RunState::Terminated {
            return Ok(Vec::new());
        }
        if self.events.is_empty() {
            return Err(InvariantViolation::HeapExhausted { time: self.time });
        }

        let event = self.events.pop()?;
        self.time = event.get_time();
        let job = event.get_job();
        debug!(time = self.time, job, kind = ?event.get_kind(), "dispatching event");

        let mut log = Vec::new();
        match event.get_kind() {
            EventKind::Arrival => self.job_arrives(job, &mut log),
            EventKind::CpuDone => self.cpu_finishes(job, &mut log)?,
            EventKind::Disk1Done => self.disk_finishes(Resource::Disk1, job, &mut log)?,
            EventKind::Disk2Done => self.disk_finishes(Resource::Disk2, job, &mut log)?,
            EventKind::SimEnd => {
                log.push(self.transition(0, TransitionKind::SimulationFinished));
                self.state = RunState::Terminated;
                // Leftover events are dropped, never dispatched
                self.events.clear();
                return Ok(log);
            }
        }

        self.sample_queue_lengths();
        Ok(log)
    }

    /// Runs until the end event, handing every transition to 'sink'.
    pub fn run<F, E> (&mut self, mut sink: F) -> Result<&Statistics, E>
        where F: FnMut(Transition) -> Result<(), E>,
              E: From<InvariantViolation>
    {
        while self.state == RunState::Running {
            for transition in self.make_transition()? {
                sink(transition)?;
            }
        }
        Ok(&self.stats)
    }

    pub fn run_to_end (&mut self) -> Result<&Statistics, InvariantViolation> {
        self.run(|_| Ok(()))
    }

    fn job_arrives (&mut self, job: JobId, log: &mut Vec<Transition>) {
        let next = self.delays.arrival.next_time(&mut self.rng, self.time);
        self.events.push(Event::new(next, self.job_count + 1, EventKind::Arrival));
        self.job_count += 1;
        self.stats.arrivals += 1;

        log.push(self.transition(job, TransitionKind::Arrival));
        self.enter(Resource::Cpu, job);
    }

    fn cpu_finishes (&mut self, job: JobId, log: &mut Vec<Transition>) -> Result<(), InvariantViolation> {
        self.leave(Resource::Cpu, job, log)?;

        if self.delays.quit.quits(&mut self.rng) {
            self.stats.quits += 1;
            log.push(self.transition(job, TransitionKind::Quit));
        }
        else {
            let disk = if self.queue_len(Resource::Disk1) < self.queue_len(Resource::Disk2) {
                Resource::Disk1
            }
            else {
                Resource::Disk2
            };
            self.enter(disk, job);
        }

        self.serve_next(Resource::Cpu)
    }

    fn disk_finishes (&mut self, disk: Resource, job: JobId, log: &mut Vec<Transition>) -> Result<(), InvariantViolation> {
        self.leave(disk, job, log)?;
        self.enter(Resource::Cpu, job);
        self.serve_next(disk)
    }

    // Queues 'job' at 'resource', starting service right away if it was idle
    fn enter (&mut self, resource: Resource, job: JobId) {
        if self.servers[resource.index()].queue.is_empty() {
            self.start_service(resource, job);
        }
        let time = self.time;
        self.servers[resource.index()].queue.push(job, time);
    }

    fn start_service (&mut self, resource: Resource, job: JobId) {
        let done = self.delays.service(resource).next_time(&mut self.rng, self.time);
        self.events.push(Event::new(done, job, resource.done_kind()));
        self.servers[resource.index()].service_start = self.time;
    }

    // Removes the job in service at 'resource', which must be 'job'
    fn leave (&mut self, resource: Resource, job: JobId, log: &mut Vec<Transition>) -> Result<(), InvariantViolation> {
        let server = &mut self.servers[resource.index()];
        let entry = server.queue.pop()?;
        if entry.job != job {
            return Err(InvariantViolation::JobMismatch { resource, expected: job, found: entry.job });
        }
        self.stats.resource_mut(resource).record_completion(self.time, server.service_start, &entry);
        log.push(self.transition(job, TransitionKind::Finished(resource)));
        Ok(())
    }

    fn serve_next (&mut self, resource: Resource) -> Result<(), InvariantViolation> {
        let queue = &self.servers[resource.index()].queue;
        if !queue.is_empty() {
            let next = queue.peek()?.job;
            self.start_service(resource, next);
        }
        Ok(())
    }

    fn sample_queue_lengths (&mut self) {
        for &resource in Resource::ALL.iter() {
            let len = self.queue_len(resource);
            self.stats.resource_mut(resource).sample_len(len);
        }
    }

    fn transition (&self, job: JobId, kind: TransitionKind) -> Transition {
        Transition { time: self.time, job, kind }
    }

    pub fn time (&self) -> Time {
        self.time
    }

    pub fn state (&self) -> RunState {
        self.state
    }

    pub fn statistics (&self) -> &Statistics {
        &self.stats
    }

    pub fn queue (&self, resource: Resource) -> &FifoQueue {
        &self.servers[resource.index()].queue
    }

    pub fn queue_len (&self, resource: Resource) -> usize {
        self.servers[resource.index()].queue.len()
    }

    /// Highest job id handed out so far, including the next scheduled arrival.
    pub fn job_count (&self) -> JobId {
        self.job_count
    }

    pub fn pending_events (&self) -> usize {
        self.events.len()
    }
}
