use super::{ExecutionContext, StepResult};

/// Trait que define un Step.
///
/// Las dependencias (handles a colaboradores, payloads de planes anteriores)
/// se inyectan en el constructor. Un step no decide si aplica según el rol:
/// quien arma el plan simplemente no lo incluye.
pub trait StepDefinition {
    /// Identificador estable y único dentro del plan. Es la clave en el
    /// `ResultRegistry`.
    fn id(&self) -> &str;

    /// Descripción legible para el reporter.
    fn description(&self) -> &str;

    /// Ejecuta el step. Los fallos de colaboradores se devuelven como
    /// `StepResult::failed`, nunca como panic.
    fn run(&self, ctx: &ExecutionContext<'_>) -> StepResult;
}

/// Identidad estática de un tipo de step.
///
/// Permite buscar el resultado de un step por tipo
/// (`registry.payload_of::<CreateJujuUserStep>()`) en vez de repetir strings.
pub trait StepIdentity {
    const ID: &'static str;
}
