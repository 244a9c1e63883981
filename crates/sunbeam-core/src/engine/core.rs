//! Implementación de `PlanExecutor`.

use log::{debug, warn};
use uuid::Uuid;

use crate::errors::EngineError;
use crate::event::{EventStore, InMemoryEventStore, PlanEvent, PlanEventKind};
use crate::plan::Plan;
use crate::registry::ResultRegistry;
use crate::reporter::ProgressReporter;
use crate::step::{ExecutionContext, ResultStatus};

/// Executor secuencial, un solo intento por step.
///
/// Cada llamada a `run_plan` recibe un `plan_id` nuevo y un `ResultRegistry`
/// vacío. El registro es propiedad exclusiva del executor mientras el plan
/// corre; los steps sólo lo ven a través de `ExecutionContext`.
#[derive(Debug)]
pub struct PlanExecutor<E = InMemoryEventStore>
    where E: EventStore
{
    event_store: E,
    last_plan_id: Option<Uuid>,
    // resultados registrados antes del step que abortó el último plan
    aborted_results: Option<ResultRegistry>,
}

impl Default for PlanExecutor<InMemoryEventStore> {
    fn default() -> Self {
        Self::with_store(InMemoryEventStore::default())
    }
}

impl<E> PlanExecutor<E> where E: EventStore
{
    pub fn with_store(event_store: E) -> Self {
        Self { event_store,
               last_plan_id: None,
               aborted_results: None }
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Id del último plan ejecutado (completo o abortado).
    pub fn last_plan_id(&self) -> Option<Uuid> {
        self.last_plan_id
    }

    /// Resultados de los steps que completaron antes del fallo, si el último
    /// plan se abortó.
    pub fn aborted_results(&self) -> Option<&ResultRegistry> {
        self.aborted_results.as_ref()
    }

    pub fn last_plan_events(&self) -> Vec<PlanEvent> {
        self.last_plan_id.map(|id| self.event_store.list(id)).unwrap_or_default()
    }

    /// Ejecuta los steps del plan en orden.
    ///
    /// `Completed`/`Skipped` se registran y se continúa. El primer `Failed` se
    /// reporta, se aborta el resto del plan y se devuelve
    /// `EngineError::StepFailed` con el mensaje del step.
    pub fn run_plan<R>(&mut self, reporter: &mut R, plan: &Plan) -> Result<ResultRegistry, EngineError>
        where R: ProgressReporter + ?Sized
    {
        let plan_id = Uuid::new_v4();
        self.last_plan_id = Some(plan_id);
        self.aborted_results = None;
        self.event_store.append_kind(plan_id, PlanEventKind::PlanStarted { step_count: plan.len() });

        let mut registry = ResultRegistry::new();
        for (index, step) in plan.steps().iter().enumerate() {
            let step_id = step.id().to_string();
            let line = format!("{} ... ", step.description());
            debug!("Starting step {step_id} ({}/{})", index + 1, plan.len());
            reporter.announce(&line);
            self.event_store.append_kind(plan_id,
                                         PlanEventKind::StepStarted { step_index: index,
                                                                      step_id: step_id.clone() });

            let result = step.run(&ExecutionContext::new(&registry));

            match result.status {
                ResultStatus::Completed => {
                    debug!("Step {step_id} completed");
                    reporter.succeed(&line);
                    self.event_store.append_kind(plan_id,
                                                 PlanEventKind::StepCompleted { step_index: index,
                                                                                step_id: step_id.clone() });
                }
                ResultStatus::Skipped => {
                    debug!("Step {step_id} skipped: {}", result.message.as_deref().unwrap_or("already applied"));
                    reporter.skip(&line);
                    self.event_store.append_kind(plan_id,
                                                 PlanEventKind::StepSkipped { step_index: index,
                                                                              step_id: step_id.clone(),
                                                                              reason: result.message.clone() });
                }
                ResultStatus::Failed => {
                    let message = result.failure_message();
                    warn!("Step {step_id} failed: {message}");
                    reporter.fail(&line);
                    self.event_store.append_kind(plan_id,
                                                 PlanEventKind::StepFailed { step_index: index,
                                                                             step_id: step_id.clone(),
                                                                             message: message.clone() });
                    self.event_store.append_kind(plan_id,
                                                 PlanEventKind::PlanAborted { failed_step: step_id.clone() });
                    self.aborted_results = Some(registry);
                    return Err(EngineError::StepFailed { step: step_id,
                                                         message });
                }
            }
            registry.record(&step_id, result);
        }

        self.event_store.append_kind(plan_id, PlanEventKind::PlanCompleted { recorded: registry.len() });
        Ok(registry)
    }
}
