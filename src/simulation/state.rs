//! Bookkeeping owned by the cyclotron driver between ticks

use crate::physics::math::Scalar;

/// Simulation time, the current (adaptive) step and the tick count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    time: Scalar,
    time_step: Scalar,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(time_step: Scalar) -> Self {
        Self {
            time: 0.0,
            time_step,
            ticks: 0,
        }
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn time_step(&self) -> Scalar {
        self.time_step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Move the clock past the step that was just integrated
    pub fn advance(&mut self) {
        self.time += self.time_step;
        self.ticks += 1;
    }

    /// Halve the step for every following tick
    pub fn halve_step(&mut self) {
        self.time_step *= 0.5;
    }
}

/// Counts orbits by watching the bunch's distance from the origin
///
/// A revolution is one pass through closest approach: the displacement stops
/// shrinking after having shrunk on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevolutionCounter {
    count: u32,
    converging: bool,
    previous_displacement: Scalar,
}

impl RevolutionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_converging(&self) -> bool {
        self.converging
    }

    /// Feed the latest displacement; returns whether a revolution completed
    pub fn observe(&mut self, displacement: Scalar) -> bool {
        let mut completed = false;
        if displacement >= self.previous_displacement {
            if self.converging {
                self.count += 1;
                completed = true;
            }
            self.converging = false;
        } else {
            self.converging = true;
        }
        self.previous_displacement = displacement;
        completed
    }
}

/// One full pass of the bunch through the accelerating gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapCrossing {
    /// 1-based crossing number
    pub index: u32,
    /// Simulation time at which the bunch left the gap
    pub time: Scalar,
    /// Total kinetic energy of the bunch on entry
    pub entry_energy: Scalar,
    /// Total kinetic energy of the bunch on exit
    pub exit_energy: Scalar,
}

impl GapCrossing {
    pub fn energy_change(&self) -> Scalar {
        self.exit_energy - self.entry_energy
    }
}

/// Tracks the bunch entering and leaving the gap `|y| <= half_width`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapMonitor {
    half_width: Scalar,
    in_gap: bool,
    entry_energy: Scalar,
    crossings: u32,
    total_energy_delta: Scalar,
    last_crossing: Option<GapCrossing>,
}

impl GapMonitor {
    pub fn new(half_width: Scalar) -> Self {
        Self {
            half_width,
            in_gap: false,
            entry_energy: 0.0,
            crossings: 0,
            total_energy_delta: 0.0,
            last_crossing: None,
        }
    }

    pub fn half_width(&self) -> Scalar {
        self.half_width
    }

    pub fn in_gap(&self) -> bool {
        self.in_gap
    }

    pub fn crossings(&self) -> u32 {
        self.crossings
    }

    /// Sum of `|exit - entry|` over every completed crossing
    pub fn total_energy_delta(&self) -> Scalar {
        self.total_energy_delta
    }

    pub fn last_crossing(&self) -> Option<GapCrossing> {
        self.last_crossing
    }

    pub fn contains(&self, y: Scalar) -> bool {
        y.abs() <= self.half_width
    }

    /// Feed the bunch's mean y and total kinetic energy after a tick
    ///
    /// Returns the crossing when this observation takes the bunch out of the gap.
    pub fn observe(&mut self, y: Scalar, total_energy: Scalar, time: Scalar) -> Option<GapCrossing> {
        let inside = self.contains(y);
        if !self.in_gap {
            if inside {
                self.in_gap = true;
                self.entry_energy = total_energy;
            }
            return None;
        }
        if inside {
            return None;
        }

        self.in_gap = false;
        self.crossings += 1;
        self.total_energy_delta += (total_energy - self.entry_energy).abs();
        let crossing = GapCrossing {
            index: self.crossings,
            time,
            entry_energy: self.entry_energy,
            exit_energy: total_energy,
        };
        self.last_crossing = Some(crossing);
        Some(crossing)
    }
}
