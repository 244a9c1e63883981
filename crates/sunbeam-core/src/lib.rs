//! sunbeam-core: motor de planes de bootstrap.
//!
//! Un plan es una lista ordenada de Steps que se ejecutan uno tras otro. Cada
//! Step devuelve un `StepResult` que el executor registra en un
//! `ResultRegistry`; el primer fallo aborta el plan (fail-fast).
//!
//! Este crate no conoce Juju, Terraform ni el servicio de cluster: sólo define
//! los contratos (`StepDefinition`, `Check`, `ProgressReporter`) y el executor.
pub mod check;
pub mod engine;
pub mod errors;
pub mod event;
pub mod plan;
pub mod registry;
pub mod reporter;
pub mod role;
pub mod step;

pub use check::{run_preflight_checks, Check, CheckOutcome};
pub use engine::{run_plan, PlanExecutor};
pub use errors::EngineError;
pub use event::{EventStore, InMemoryEventStore, PlanEvent, PlanEventKind};
pub use plan::{Plan, PlanBuilder};
pub use registry::{get_step_message, ResultRegistry};
pub use reporter::{NullReporter, ProgressReporter, RecordingReporter, ReportLine};
pub use role::Role;
pub use step::{ExecutionContext, ResultStatus, StepDefinition, StepIdentity, StepPayload, StepResult};
