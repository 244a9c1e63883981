use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{PlanEvent, PlanEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, plan_id: Uuid, kind: PlanEventKind) -> PlanEvent;
    /// Lista eventos de un plan (orden ascendente por seq).
    fn list(&self, plan_id: Uuid) -> Vec<PlanEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<PlanEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, plan_id: Uuid, kind: PlanEventKind) -> PlanEvent {
        let vec = self.inner.entry(plan_id).or_default();
        let ev = PlanEvent { seq: vec.len() as u64,
                             plan_id,
                             kind,
                             ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, plan_id: Uuid) -> Vec<PlanEvent> {
        self.inner.get(&plan_id).cloned().unwrap_or_default()
    }
}
