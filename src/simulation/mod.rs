//! The cyclotron experiment driver
//!
//! A [`Cyclotron`] owns the field set, the bunch and the chosen integrator,
//! and advances them one tick at a time. After every tick it adapts the time
//! step, accounts for gap crossings, counts revolutions and samples the
//! bunch's mean position into a [`TrajectorySink`].

use crate::error::{SimulationError, SimulationResult};
use crate::physics::bunch::Bunch;
use crate::physics::fields::FieldSet;
use crate::physics::integrators::Integrator;
use crate::physics::math::Scalar;
use bevy::log::{debug, info};
use std::fmt;

pub mod output;
pub mod setup;
pub mod state;

pub use output::{CsvTrajectoryWriter, TrajectorySink};
pub use setup::build_cyclotron;
pub use state::{GapCrossing, GapMonitor, RevolutionCounter, SimulationClock};

/// Loop controls for a cyclotron run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    /// Initial time step in seconds
    pub time_step: Scalar,
    /// Half-width `L` of the accelerating gap in y
    pub gap_half_width: Scalar,
    /// Revolutions after which a run is complete
    pub max_revolutions: u32,
    /// Ticks after which an unfinished run gives up
    pub max_ticks: u64,
    /// Record the mean position every this many ticks
    pub sample_every: u64,
}

impl DriverSettings {
    pub fn validate(&self) -> SimulationResult<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if !(self.gap_half_width.is_finite() && self.gap_half_width > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "gap half-width must be positive, got {}",
                self.gap_half_width
            )));
        }
        if self.max_revolutions == 0 {
            return Err(SimulationError::InvalidConfig(
                "revolution target must be at least 1".to_string(),
            ));
        }
        if self.sample_every == 0 {
            return Err(SimulationError::InvalidConfig(
                "sample cadence must be at least 1 tick".to_string(),
            ));
        }
        Ok(())
    }
}

/// What happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    pub crossing: Option<GapCrossing>,
    pub revolution_completed: bool,
    pub step_halved: bool,
}

/// Summary of a (finished or interrupted) run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub final_time: Scalar,
    pub final_time_step: Scalar,
    pub revolutions: u32,
    pub crossings: u32,
    /// Sum of `|ΔE|` over all gap crossings
    pub total_energy_delta: Scalar,
    pub kinetic_energy_spread: Scalar,
    pub average_kinetic_energy: Scalar,
}

impl RunReport {
    /// Mean `|ΔE|` per gap crossing
    pub fn average_energy_gain(&self) -> SimulationResult<Scalar> {
        if self.crossings == 0 {
            return Err(SimulationError::NoGapCrossings);
        }
        Ok(self.total_energy_delta / self.crossings as Scalar)
    }

    /// Final kinetic energy spread relative to the final average energy
    pub fn spread_to_energy_ratio(&self) -> SimulationResult<Scalar> {
        if self.average_kinetic_energy == 0.0 {
            return Err(SimulationError::ZeroKineticEnergy);
        }
        Ok(self.kinetic_energy_spread / self.average_kinetic_energy)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} revolutions in {} ticks (t = {} s, final dt = {} s)",
            self.revolutions, self.ticks, self.final_time, self.final_time_step
        )?;
        match self.average_energy_gain() {
            Ok(gain) => writeln!(
                f,
                "Average difference in KE over {} gap crossings: {} J",
                self.crossings, gain
            )?,
            Err(error) => writeln!(f, "{error}")?,
        }
        writeln!(f, "Spread in KE: {} J", self.kinetic_energy_spread)?;
        match self.spread_to_energy_ratio() {
            Ok(ratio) => write!(f, "Ratio of KE spread to final average KE: {ratio}"),
            Err(error) => write!(f, "{error}"),
        }
    }
}

/// A bunch of charged particles circulating through a field set
pub struct Cyclotron {
    fields: FieldSet,
    bunch: Bunch,
    integrator: Box<dyn Integrator>,
    settings: DriverSettings,
    clock: SimulationClock,
    revolutions: RevolutionCounter,
    gap: GapMonitor,
}

impl Cyclotron {
    pub fn new(
        fields: FieldSet,
        bunch: Bunch,
        integrator: Box<dyn Integrator>,
        settings: DriverSettings,
    ) -> SimulationResult<Self> {
        if bunch.is_empty() {
            return Err(SimulationError::EmptyBunch {
                quantity: "A cyclotron run",
            });
        }
        settings.validate()?;

        Ok(Self {
            fields,
            bunch,
            integrator,
            settings,
            clock: SimulationClock::new(settings.time_step),
            revolutions: RevolutionCounter::new(),
            gap: GapMonitor::new(settings.gap_half_width),
        })
    }

    pub fn bunch(&self) -> &Bunch {
        &self.bunch
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn revolutions(&self) -> u32 {
        self.revolutions.count()
    }

    pub fn gap(&self) -> &GapMonitor {
        &self.gap
    }

    pub fn is_finished(&self) -> bool {
        self.revolutions.count() >= self.settings.max_revolutions
    }

    /// Advance the whole bunch by one time step
    pub fn tick(&mut self, sink: &mut dyn TrajectorySink) -> SimulationResult<TickOutcome> {
        let t = self.clock.time();
        let dt = self.clock.time_step();
        for particle in self.bunch.iter_mut() {
            self.integrator.step(particle, &self.fields, t, dt);
        }
        self.clock.advance();

        let mut outcome = TickOutcome::default();

        // A bunch faster than L / dt could jump the gap in a single step
        let speed = self.bunch.mean_velocity()?.length();
        if self.settings.gap_half_width / speed < dt {
            self.clock.halve_step();
            outcome.step_halved = true;
            info!(
                "Bunch speed {} m/s could skip the gap; time step halved to {} s",
                speed,
                self.clock.time_step()
            );
        }

        let position = self.bunch.mean_position()?;
        outcome.crossing = self.gap.observe(
            position.y,
            self.bunch.total_kinetic_energy(),
            self.clock.time(),
        );
        if let Some(crossing) = outcome.crossing {
            info!(
                "Bunch has crossed gap: {} times; difference in KE between start and end of gap: {} J",
                crossing.index,
                crossing.energy_change().abs()
            );
        }

        outcome.revolution_completed = self.revolutions.observe(position.length());
        if outcome.revolution_completed {
            debug!(
                "Revolution {} completed at t = {} s",
                self.revolutions.count(),
                self.clock.time()
            );
        }

        if self.clock.ticks() % self.settings.sample_every == 0 {
            sink.record(position)?;
        }

        Ok(outcome)
    }

    /// Tick until the revolution target is met or the tick budget runs out
    pub fn run(&mut self, sink: &mut dyn TrajectorySink) -> SimulationResult<RunReport> {
        while !self.is_finished() {
            self.check_budget()?;
            self.tick(sink)?;
        }
        self.report()
    }

    /// Fail with `NotConverged` once the tick budget is spent
    pub fn check_budget(&self) -> SimulationResult<()> {
        if self.clock.ticks() >= self.settings.max_ticks {
            return Err(SimulationError::NotConverged {
                revolutions: self.revolutions.count(),
                max_revolutions: self.settings.max_revolutions,
                ticks: self.clock.ticks(),
            });
        }
        Ok(())
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> SimulationResult<RunReport> {
        Ok(RunReport {
            ticks: self.clock.ticks(),
            final_time: self.clock.time(),
            final_time_step: self.clock.time_step(),
            revolutions: self.revolutions.count(),
            crossings: self.gap.crossings(),
            total_energy_delta: self.gap.total_energy_delta(),
            kinetic_energy_spread: self.bunch.kinetic_energy_spread()?,
            average_kinetic_energy: self.bunch.average_kinetic_energy()?,
        })
    }
}

impl fmt::Debug for Cyclotron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cyclotron")
            .field("fields", &self.fields)
            .field("bunch", &self.bunch)
            .field("integrator", &self.integrator.name())
            .field("settings", &self.settings)
            .field("clock", &self.clock)
            .field("revolutions", &self.revolutions)
            .field("gap", &self.gap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fields::UniformField;
    use crate::physics::integrators::{EulerCromer, RungeKuttaFourthOrder};
    use crate::physics::math::Vector;
    use crate::physics::particle::ChargedParticle;

    fn settings() -> DriverSettings {
        DriverSettings {
            time_step: 0.01,
            gap_half_width: 0.05,
            max_revolutions: 1,
            max_ticks: 10_000,
            sample_every: 10,
        }
    }

    /// Unit particle on the unit circle about (1, 0): it starts at the origin
    /// and recedes, so the first closest approach is one full period away
    fn circling_bunch() -> Bunch {
        let mut bunch = Bunch::new();
        bunch.add_particle(ChargedParticle::with_state(1.0, 1.0, Vector::ZERO, Vector::Y).unwrap());
        bunch
    }

    fn magnet() -> FieldSet {
        FieldSet::single(UniformField::magnetic_only(Vector::Z))
    }

    #[test]
    fn test_rejects_empty_bunch_and_bad_settings() {
        assert!(matches!(
            Cyclotron::new(magnet(), Bunch::new(), Box::new(EulerCromer), settings()),
            Err(SimulationError::EmptyBunch { .. })
        ));

        for broken in [
            DriverSettings {
                time_step: 0.0,
                ..settings()
            },
            DriverSettings {
                gap_half_width: -1.0,
                ..settings()
            },
            DriverSettings {
                gap_half_width: 0.0,
                ..settings()
            },
            DriverSettings {
                max_revolutions: 0,
                ..settings()
            },
            DriverSettings {
                sample_every: 0,
                ..settings()
            },
        ] {
            assert!(matches!(
                Cyclotron::new(magnet(), circling_bunch(), Box::new(EulerCromer), broken),
                Err(SimulationError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_tick_advances_clock_and_samples_on_cadence() {
        let mut cyclotron =
            Cyclotron::new(magnet(), circling_bunch(), Box::new(RungeKuttaFourthOrder), settings())
                .unwrap();
        let mut samples: Vec<Vector> = Vec::new();

        for _ in 0..25 {
            cyclotron.tick(&mut samples).unwrap();
        }

        assert_eq!(cyclotron.clock().ticks(), 25);
        assert!((cyclotron.clock().time() - 0.25).abs() < 1e-12);
        assert_eq!(samples.len(), 2);
        assert_eq!(cyclotron.integrator_name(), "runge_kutta_fourth_order");
    }

    #[test]
    fn test_fast_bunch_halves_the_step() {
        // L / |v| = 0.00625 is below dt = 0.01 but not below dt / 2
        let mut bunch = Bunch::new();
        bunch.add_particle(
            ChargedParticle::with_state(1.0, 0.0, Vector::ZERO, Vector::new(8.0, 0.0, 0.0))
                .unwrap(),
        );
        let mut cyclotron =
            Cyclotron::new(magnet(), bunch, Box::new(EulerCromer), settings()).unwrap();
        let mut samples: Vec<Vector> = Vec::new();

        let first = cyclotron.tick(&mut samples).unwrap();
        assert!(first.step_halved);
        assert_eq!(cyclotron.clock().time_step(), 0.005);

        let second = cyclotron.tick(&mut samples).unwrap();
        assert!(!second.step_halved);
        assert_eq!(cyclotron.clock().time_step(), 0.005);
        assert!((cyclotron.clock().time() - 0.015).abs() < 1e-15);
    }

    #[test]
    fn test_run_counts_one_revolution() {
        let mut cyclotron =
            Cyclotron::new(magnet(), circling_bunch(), Box::new(RungeKuttaFourthOrder), settings())
                .unwrap();
        let mut samples: Vec<Vector> = Vec::new();

        let report = cyclotron.run(&mut samples).unwrap();

        // The orbit returns to the origin after 2π
        assert_eq!(report.revolutions, 1);
        let period = 2.0 * std::f64::consts::PI;
        assert!(
            (report.final_time - period).abs() < 0.05,
            "revolution detected at t = {}",
            report.final_time
        );
        assert!(cyclotron.is_finished());
        // Speed is conserved by a pure magnetic field
        assert!((report.average_kinetic_energy - 0.5).abs() < 1e-6);
        assert_eq!(report.kinetic_energy_spread, 0.0);
    }

    #[test]
    fn test_run_gives_up_after_tick_budget() {
        let mut cyclotron = Cyclotron::new(
            magnet(),
            circling_bunch(),
            Box::new(RungeKuttaFourthOrder),
            DriverSettings {
                max_ticks: 100,
                max_revolutions: 10,
                ..settings()
            },
        )
        .unwrap();
        let mut samples: Vec<Vector> = Vec::new();

        let result = cyclotron.run(&mut samples);

        assert!(matches!(
            result,
            Err(SimulationError::NotConverged {
                revolutions: 0,
                max_revolutions: 10,
                ticks: 100,
            })
        ));
    }

    #[test]
    fn test_report_energy_gain_requires_crossings() {
        let report = RunReport {
            ticks: 10,
            final_time: 1.0,
            final_time_step: 0.1,
            revolutions: 1,
            crossings: 0,
            total_energy_delta: 0.0,
            kinetic_energy_spread: 1.0,
            average_kinetic_energy: 4.0,
        };
        assert!(matches!(
            report.average_energy_gain(),
            Err(SimulationError::NoGapCrossings)
        ));
        assert_eq!(report.spread_to_energy_ratio().unwrap(), 0.25);

        let crossed = RunReport {
            crossings: 4,
            total_energy_delta: 2.0,
            ..report
        };
        assert_eq!(crossed.average_energy_gain().unwrap(), 0.5);
        assert!(crossed.to_string().contains("over 4 gap crossings: 0.5 J"));
    }

    #[test]
    fn test_bunch_at_rest_has_no_energy_ratio() {
        let mut bunch = Bunch::new();
        bunch.add_particle(ChargedParticle::new(1.0, 1.0).unwrap());
        let cyclotron = Cyclotron::new(magnet(), bunch, Box::new(EulerCromer), settings()).unwrap();

        let report = cyclotron.report().unwrap();

        assert_eq!(report.average_kinetic_energy, 0.0);
        assert!(matches!(
            report.spread_to_energy_ratio(),
            Err(SimulationError::ZeroKineticEnergy)
        ));
        let text = report.to_string();
        assert!(text.contains("the bunch has no kinetic energy"));
        assert!(!text.contains("NaN"));
    }
}
