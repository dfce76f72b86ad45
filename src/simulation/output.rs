//! Trajectory sinks for the sampled mean position of the bunch

use crate::error::SimulationResult;
use crate::physics::math::Vector;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination for sampled bunch positions
pub trait TrajectorySink {
    fn record(&mut self, position: Vector) -> SimulationResult<()>;
}

/// In-memory capture, mostly for tests
impl TrajectorySink for Vec<Vector> {
    fn record(&mut self, position: Vector) -> SimulationResult<()> {
        self.push(position);
        Ok(())
    }
}

impl<S: TrajectorySink + ?Sized> TrajectorySink for Box<S> {
    fn record(&mut self, position: Vector) -> SimulationResult<()> {
        (**self).record(position)
    }
}

/// Writes one `x,y` line per sample and flushes after every line
#[derive(Debug)]
pub struct CsvTrajectoryWriter<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> CsvTrajectoryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvTrajectoryWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TrajectorySink for CsvTrajectoryWriter<W> {
    fn record(&mut self, position: Vector) -> SimulationResult<()> {
        writeln!(self.writer, "{},{}", position.x, position.y)?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }
}
