//! Name-based lookup and construction of integrators
//!
//! Each integrator describes itself (canonical name, aliases, convergence
//! order) and the registry indexes it under every one of those names. All
//! built-in integrators are stateless unit structs, so handing one out is a
//! fresh `clone_box()`.

use super::Integrator;
use crate::error::{SimulationError, SimulationResult};
use std::collections::{BTreeSet, HashMap};

/// Registry for runtime integrator lookup
pub struct IntegratorRegistry {
    /// Canonical names and aliases, each mapped to a prototype instance
    integrators: HashMap<String, Box<dyn Integrator>>,
}

impl IntegratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            integrators: HashMap::new(),
        }
    }

    /// Add the four built-in schemes
    pub fn with_standard_integrators(mut self) -> Self {
        use super::{EulerCromer, ExplicitEuler, RungeKuttaFourthOrder, RungeKuttaSecondOrder};

        self.register_integrator(Box::new(ExplicitEuler));
        self.register_integrator(Box::new(EulerCromer));
        self.register_integrator(Box::new(RungeKuttaSecondOrder));
        self.register_integrator(Box::new(RungeKuttaFourthOrder));

        self
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.register_integrator(integrator);
        self
    }

    /// Index an integrator under its name and aliases, replacing earlier entries
    pub fn register_integrator(&mut self, integrator: Box<dyn Integrator>) {
        for alias in integrator.aliases() {
            self.integrators
                .insert(alias.to_string(), integrator.clone_box());
        }
        self.integrators
            .insert(integrator.name().to_string(), integrator);
    }

    /// Create an integrator by canonical name or alias (case-sensitive)
    pub fn create(&self, name: &str) -> SimulationResult<Box<dyn Integrator>> {
        match self.integrators.get(name) {
            Some(integrator) => Ok(integrator.clone_box()),
            None => {
                let aliases: Vec<String> = self
                    .list_aliases()
                    .into_iter()
                    .map(|(alias, _)| alias)
                    .collect();
                Err(SimulationError::UnknownIntegrator(format!(
                    "'{}'. Available integrators: {}. Aliases: {}",
                    name,
                    self.list_available().join(", "),
                    aliases.join(", ")
                )))
            }
        }
    }

    /// Canonical names, sorted
    pub fn list_available(&self) -> Vec<String> {
        self.integrators
            .values()
            .map(|integrator| integrator.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(alias, canonical name)` pairs, sorted by alias
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .integrators
            .iter()
            .filter(|(key, integrator)| key.as_str() != integrator.name())
            .map(|(key, integrator)| (key.clone(), integrator.name().to_string()))
            .collect();
        aliases.sort();
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
