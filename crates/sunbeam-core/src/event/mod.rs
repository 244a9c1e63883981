//! Log de eventos de ejecución de planes.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{PlanEvent, PlanEventKind};
