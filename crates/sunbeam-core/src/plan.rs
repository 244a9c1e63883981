//! Plan: lista ordenada de steps que se ejecuta como una unidad fail-fast.
//!
//! ```ignore
//! let plan = Plan::builder()
//!     .step(ClusterInitStep::new(cluster.clone(), role))
//!     .step_if(role.is_control_node(), || BootstrapJujuStep::new(..))
//!     .build()?;
//! ```
use std::collections::HashSet;

use crate::errors::EngineError;
use crate::step::StepDefinition;

pub struct Plan {
    steps: Vec<Box<dyn StepDefinition>>,
}

impl Plan {
    #[inline]
    pub fn builder() -> PlanBuilder {
        PlanBuilder { steps: Vec::new() }
    }

    /// Plan sin steps; `run_plan` devuelve un registro vacío.
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Construye un plan a partir de steps ya boxeados, validando que no haya
    /// identidades repetidas.
    pub fn from_steps(steps: Vec<Box<dyn StepDefinition>>) -> Result<Self, EngineError> {
        let mut seen = HashSet::with_capacity(steps.len());
        for s in &steps {
            if !seen.insert(s.id().to_string()) {
                return Err(EngineError::DuplicateStep(s.id().to_string()));
            }
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    pub(crate) fn steps(&self) -> &[Box<dyn StepDefinition>] {
        &self.steps
    }
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan").field("steps", &self.step_ids()).finish()
    }
}

/// Builder de `Plan`. Acumula steps en orden; la validación de identidades
/// duplicadas ocurre en `build`.
pub struct PlanBuilder {
    steps: Vec<Box<dyn StepDefinition>>,
}

impl PlanBuilder {
    #[inline]
    pub fn step<S>(mut self, step: S) -> Self
        where S: StepDefinition + 'static
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Añade el step sólo si `include` es verdadero. El constructor se evalúa
    /// de forma perezosa para no crear steps que no aplican al rol.
    #[inline]
    pub fn step_if<S, F>(self, include: bool, make: F) -> Self
        where S: StepDefinition + 'static,
              F: FnOnce() -> S
    {
        if include {
            self.step(make())
        } else {
            self
        }
    }

    pub fn boxed(mut self, step: Box<dyn StepDefinition>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<Plan, EngineError> {
        Plan::from_steps(self.steps)
    }
}
