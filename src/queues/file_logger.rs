use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::io::Result;
use std::path::Path;

use tracing::error;

use crate::queues::queueing_network::Transition;
use crate::stats::Statistics;

const BANNER: &str = "STARTING NEW SIMULATION\n~~~~~~~~~~~~~~~~~~~~~~~\n";
const RUN_SEPARATOR: &str = "\n\n\n";

/// Banner and echoed config options that open every run in the log and stats files.
pub fn write_header<W: Write> (out: &mut W, entries: &[(String, String)]) -> Result<()>
{
    out.write_all(BANNER.as_bytes())?;
    for (option, value) in entries {
        writeln!(out, "{} = {}", option, value)?;
    }
    writeln!(out)
}

/// One run's section of the stats file.
pub fn write_stats<W: Write> (out: &mut W, entries: &[(String, String)], stats: &Statistics) -> Result<()>
{
    write_header(out, entries)?;
    write!(out, "{}", stats)?;
    out.write_all(RUN_SEPARATOR.as_bytes())?;
    out.flush()
}

pub fn open_append<P: AsRef<Path>> (path: P) -> Result<File>
{
    OpenOptions::new().create(true).append(true).open(path)
}

/// Buffers transitions and writes them as log lines in batches.
pub struct FileLogger<W: Write> {
    buffer: Vec<Transition>,
    buffer_size: usize,
    out: W,
    finished: bool,
}

impl FileLogger<File> {

    pub fn append<P: AsRef<Path>> (buffer_size: usize, path: P) -> Result<Self>
    {
        Ok(FileLogger::new(buffer_size, open_append(path)?))
    }
}

impl<W: Write> FileLogger<W> {

    pub fn new (buffer_size: usize, out: W) -> Self
    {
        FileLogger {
            buffer: Vec::with_capacity(buffer_size),
            buffer_size: buffer_size.max(1),
            out,
            finished: false,
        }
    }

    pub fn write_header (&mut self, entries: &[(String, String)]) -> Result<()>
    {
        write_header(&mut self.out, entries)
    }

    pub fn record (&mut self, transition: Transition) -> Result<()>
    {
        self.buffer.push(transition);
        if self.buffer.len() >= self.buffer_size {
            self.dump_log()?;
        }
        Ok(())
    }

    /// Writes what is left and closes the run's section.
    pub fn finish (&mut self) -> Result<()>
    {
        self.dump_log()?;
        self.out.write_all(RUN_SEPARATOR.as_bytes())?;
        self.out.flush()?;
        self.finished = true;
        Ok(())
    }

    pub fn get_ref (&self) -> &W
    {
        &self.out
    }

    fn dump_log (&mut self) -> Result<()>
    {
        for transition in self.buffer.drain(..) {
            writeln!(self.out, "{}", transition)?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for FileLogger<W> {

    // A run that aborted still leaves its partial log behind
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.dump_log().and_then(|_| self.out.flush()) {
            error!(error = %e, "failed to write log on drop");
        }
    }
}
