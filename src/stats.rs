use std::fmt;

use crate::queues::request::{QueueEntry, Resource, Time};

/// Running aggregates for one resource.
#[derive(Debug,Clone,Default,PartialEq,Eq)]
pub struct ResourceStats {
    pub max_len: usize,
    pub cumul_len: u64,
    pub num_lens: u64,
    pub busy_time: Time,
    /// Sum of response times; wider than `Time` since it adds up many spans.
    pub cumul_resp_time: i128,
    pub max_resp_time: Time,
    pub completed: u64,
}

impl ResourceStats {
    pub fn sample_len (&mut self, len: usize) {
        self.max_len = self.max_len.max(len);
        self.cumul_len += len as u64;
        self.num_lens += 1;
    }

    /// Accounts for 'entry' leaving the resource at 'now' after a service
    /// period that began at 'service_start'.
    pub fn record_completion (&mut self, now: Time, service_start: Time, entry: &QueueEntry) {
        let resp = now - entry.enqueue_time;
        self.busy_time += now - service_start;
        self.cumul_resp_time += i128::from(resp);
        self.max_resp_time = self.max_resp_time.max(resp);
        self.completed += 1;
    }

    pub fn avg_queue_len (&self) -> f64 {
        if self.num_lens == 0 { 0. } else { self.cumul_len as f64 / self.num_lens as f64 }
    }

    /// Percentage of 'total_time' the resource spent serving.
    pub fn utilization (&self, total_time: Time) -> f64 {
        self.busy_time as f64 * 100. / total_time as f64
    }

    pub fn avg_response_time (&self) -> Option<f64> {
        if self.completed == 0 {
            None
        }
        else {
            Some(self.cumul_resp_time as f64 / self.completed as f64)
        }
    }

    /// Completed jobs per 100 units of time.
    pub fn throughput (&self, total_time: Time) -> f64 {
        self.completed as f64 * 100. / total_time as f64
    }
}

/// Aggregates for the whole network.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Statistics {
    pub cpu: ResourceStats,
    pub disk1: ResourceStats,
    pub disk2: ResourceStats,
    pub total_time: Time,
    pub arrivals: u64,
    pub quits: u64,
}

impl Statistics {
    pub fn new (total_time: Time) -> Self {
        Statistics {
            cpu: ResourceStats::default(),
            disk1: ResourceStats::default(),
            disk2: ResourceStats::default(),
            total_time,
            arrivals: 0,
            quits: 0,
        }
    }

    pub fn resource (&self, resource: Resource) -> &ResourceStats {
        match resource {
            Resource::Cpu   => &self.cpu,
            Resource::Disk1 => &self.disk1,
            Resource::Disk2 => &self.disk2,
        }
    }

    pub fn resource_mut (&mut self, resource: Resource) -> &mut ResourceStats {
        match resource {
            Resource::Cpu   => &mut self.cpu,
            Resource::Disk1 => &mut self.disk1,
            Resource::Disk2 => &mut self.disk2,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, &resource) in Resource::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let s = self.resource(resource);
            writeln!(f, "{} avg queue size = {:.6}", resource, s.avg_queue_len())?;
            writeln!(f, "{} max queue size = {}", resource, s.max_len)?;
            writeln!(f, "{} utilization = {:.6}%", resource, s.utilization(self.total_time))?;
            match s.avg_response_time() {
                Some(avg) => writeln!(f, "{} avg response time = {:.6}", resource, avg)?,
                None => writeln!(f, "{} avg response time = n/a", resource)?,
            }
            writeln!(f, "{} max response time = {}", resource, s.max_resp_time)?;
            writeln!(f, "{} throughput = {:.6} per 100 units of time", resource, s.throughput(self.total_time))?;
        }
        Ok(())
    }
}
