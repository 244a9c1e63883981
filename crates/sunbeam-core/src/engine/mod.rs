//! Executor de planes.
//!
//! `PlanExecutor` recorre un `Plan` en orden, registra cada resultado y aborta
//! en el primer `Failed`. La función libre `run_plan` usa un executor con log
//! de eventos en memoria.

pub mod core;

pub use self::core::PlanExecutor;

use crate::errors::EngineError;
use crate::event::InMemoryEventStore;
use crate::plan::Plan;
use crate::registry::ResultRegistry;
use crate::reporter::ProgressReporter;

/// Ejecuta `plan` con un executor descartable.
pub fn run_plan<R>(reporter: &mut R, plan: &Plan) -> Result<ResultRegistry, EngineError>
    where R: ProgressReporter + ?Sized
{
    PlanExecutor::<InMemoryEventStore>::default().run_plan(reporter, plan)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::PlanEventKind;
    use crate::reporter::{RecordingReporter, ReportLine};
    use crate::step::{ExecutionContext, ResultStatus, StepDefinition, StepResult};

    // Step de prueba que devuelve un resultado fijo y anota su ejecución
    struct FixedStep {
        id: &'static str,
        result: StepResult,
        ran: Rc<RefCell<Vec<&'static str>>>,
    }

    impl StepDefinition for FixedStep {
        fn id(&self) -> &str {
            self.id
        }
        fn description(&self) -> &str {
            self.id
        }
        fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
            self.ran.borrow_mut().push(self.id);
            self.result.clone()
        }
    }

    fn plan_of(results: Vec<(&'static str, StepResult)>, ran: &Rc<RefCell<Vec<&'static str>>>) -> Plan {
        results.into_iter()
               .fold(Plan::builder(), |b, (id, result)| {
                   b.step(FixedStep { id,
                                      result,
                                      ran: ran.clone() })
               })
               .build()
               .expect("unique ids")
    }

    #[test]
    fn all_completed_records_every_step_in_order() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let plan = plan_of(vec![("a", StepResult::completed()),
                                ("b", StepResult::skipped()),
                                ("c", StepResult::completed())],
                           &ran);
        let mut reporter = RecordingReporter::new();
        let reg = run_plan(&mut reporter, &plan).expect("plan should complete");

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.step_ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(reg.get("b").unwrap().status, ResultStatus::Skipped);
        assert_eq!(*ran.borrow(), vec!["a", "b", "c"]);
        assert_eq!(reporter.announced(), vec!["a ... ", "b ... ", "c ... "]);
        assert!(reporter.lines.contains(&ReportLine::Skip("b ... ".into())));
    }

    #[test]
    fn failure_aborts_remaining_steps() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let plan = plan_of(vec![("a", StepResult::completed()),
                                ("b", StepResult::completed()),
                                ("c", StepResult::failed("c broke")),
                                ("d", StepResult::completed())],
                           &ran);
        let mut reporter = RecordingReporter::new();
        let mut executor = PlanExecutor::<InMemoryEventStore>::default();
        let err = executor.run_plan(&mut reporter, &plan).unwrap_err();

        assert_eq!(err,
                   EngineError::StepFailed { step: "c".into(),
                                             message: "c broke".into() });
        assert_eq!(err.to_string(), "c broke");
        assert_eq!(*ran.borrow(), vec!["a", "b", "c"]);
        assert_eq!(reporter.failures(), vec!["c ... "]);

        let partial = executor.aborted_results().expect("partial results kept");
        assert_eq!(partial.step_ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!partial.contains("c"));

        let events = executor.last_plan_events();
        assert!(matches!(events.last().map(|e| &e.kind), Some(PlanEventKind::PlanAborted { failed_step }) if failed_step == "c"));
        assert!(!events.iter().any(|e| matches!(&e.kind, PlanEventKind::StepStarted { step_id, .. } if step_id == "d")));
    }

    #[test]
    fn empty_plan_yields_empty_registry() {
        let mut reporter = RecordingReporter::new();
        let reg = run_plan(&mut reporter, &Plan::empty()).unwrap();
        assert!(reg.is_empty());
        assert!(reporter.lines.is_empty());
    }
}
