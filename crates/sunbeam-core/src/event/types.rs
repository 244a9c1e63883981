//! Tipos de evento del plan y estructura `PlanEvent`.
//!
//! Cada `run_plan` emite eventos a un `EventStore` append-only. Sirven como
//! traza auditable de qué se ejecutó, en qué orden y dónde se abortó. No se
//! persisten entre procesos.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanEventKind {
    /// Primer evento de un `plan_id`.
    PlanStarted { step_count: usize },
    StepStarted { step_index: usize, step_id: String },
    StepCompleted { step_index: usize, step_id: String },
    StepSkipped { step_index: usize, step_id: String, reason: Option<String> },
    /// El plan no continúa tras este evento.
    StepFailed { step_index: usize, step_id: String, message: String },
    PlanCompleted { recorded: usize },
    PlanAborted { failed_step: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEvent {
    pub seq: u64, // orden append dentro del plan
    pub plan_id: Uuid,
    pub kind: PlanEventKind,
    pub ts: DateTime<Utc>,
}
