//! Orquestación de `cluster bootstrap`.
//!
//! Preflight y luego cuatro planes, cada uno con su propio registro:
//! 1. inicializar el cluster (y el controller Juju en nodos de control),
//! 2. crear el usuario Juju del nodo,
//! 3. guardar ese usuario en la base del cluster y localmente,
//! 4. registrar el usuario y desplegar microk8s y el control plane.
//!
//! El token del plan 2 llega al plan 3 por constructor; dentro de un mismo
//! plan los steps se leen entre sí con `ExecutionContext`.
use std::path::PathBuf;
use std::rc::Rc;

use log::info;
use sunbeam_core::{run_preflight_checks, Check, InMemoryEventStore, Plan, PlanExecutor, ProgressReporter, ResultRegistry, Role};
use sunbeam_steps::steps::{AddMicrok8sCloudStep, AddMicrok8sUnitStep, BackupBootstrapUserStep, BootstrapJujuStep,
                           ClusterAddJujuUserStep, ClusterInitStep, ClusterUpdateJujuControllerStep, CreateJujuUserStep,
                           DeployControlPlaneStep, DeployMicrok8sApplicationStep, RegisterJujuUserStep,
                           SaveJujuUserLocallyStep, TerraformInitStep};
use sunbeam_steps::{ClusterService, JujuController, JujuSnapCheck, TerraformApplier};

use crate::errors::BootstrapError;

/// Todo lo que necesita un bootstrap: parámetros del nodo y colaboradores.
pub struct BootstrapContext {
    pub role: Role,
    pub fqdn: String,
    pub cloud_name: String,
    pub cloud_type: String,
    pub controller: String,
    pub data_location: PathBuf,
    pub cluster: Rc<dyn ClusterService>,
    pub juju: Rc<dyn JujuController>,
    pub microk8s_tf: Rc<dyn TerraformApplier>,
    pub openstack_tf: Rc<dyn TerraformApplier>,
    pub checks: Vec<Box<dyn Check>>,
}

/// Registros de los planes ejecutados, en orden.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub registries: Vec<ResultRegistry>,
}

impl BootstrapReport {
    pub fn plans_run(&self) -> usize {
        self.registries.len()
    }

    /// Identidades de todos los steps registrados, en orden de ejecución.
    pub fn step_ids(&self) -> Vec<String> {
        self.registries.iter().flat_map(|r| r.step_ids().map(str::to_string)).collect()
    }
}

/// Checks de preflight para el rol: sólo los nodos de control necesitan juju.
pub fn default_checks(role: Role) -> Vec<Box<dyn Check>> {
    let mut checks: Vec<Box<dyn Check>> = Vec::new();
    if role.is_control_node() {
        checks.push(Box::new(JujuSnapCheck::new()));
    }
    checks
}

pub fn init_plan(ctx: &BootstrapContext) -> Result<Plan, BootstrapError> {
    let control = ctx.role.is_control_node();
    Ok(Plan::builder().step(ClusterInitStep::new(ctx.cluster.clone(), &ctx.fqdn, ctx.role))
                      .step_if(control, || {
                          BootstrapJujuStep::new(ctx.juju.clone(), &ctx.cloud_name, &ctx.cloud_type, &ctx.controller)
                      })
                      .build()?)
}

pub fn juju_user_plan(ctx: &BootstrapContext) -> Result<Plan, BootstrapError> {
    let control = ctx.role.is_control_node();
    Ok(Plan::builder().step_if(control, || CreateJujuUserStep::new(ctx.juju.clone(), &ctx.fqdn))
                      .step_if(control, || {
                          ClusterUpdateJujuControllerStep::new(ctx.cluster.clone(), ctx.juju.clone(), &ctx.controller)
                      })
                      .build()?)
}

pub fn cluster_user_plan(ctx: &BootstrapContext, token: Option<String>) -> Result<Plan, BootstrapError> {
    let control = ctx.role.is_control_node();
    Ok(Plan::builder().step_if(control, || ClusterAddJujuUserStep::new(ctx.cluster.clone(), &ctx.fqdn, token))
                      .step_if(control, || {
                          BackupBootstrapUserStep::new(ctx.juju.clone(), &ctx.fqdn, ctx.data_location.clone())
                      })
                      .step_if(control, || SaveJujuUserLocallyStep::new(&ctx.fqdn, ctx.data_location.clone()))
                      .build()?)
}

pub fn deploy_plan(ctx: &BootstrapContext) -> Result<Plan, BootstrapError> {
    let control = ctx.role.is_control_node();
    Ok(Plan::builder().step_if(control, || {
                          RegisterJujuUserStep::new(ctx.cluster.clone(),
                                                    ctx.juju.clone(),
                                                    &ctx.fqdn,
                                                    &ctx.controller,
                                                    ctx.data_location.clone(),
                                                    true)
                      })
                      .step_if(control, || TerraformInitStep::new(ctx.microk8s_tf.clone()))
                      .step_if(control, || DeployMicrok8sApplicationStep::new(ctx.microk8s_tf.clone(), ctx.juju.clone()))
                      .step_if(control, || AddMicrok8sUnitStep::new(ctx.juju.clone(), &ctx.fqdn))
                      .step_if(control, || AddMicrok8sCloudStep::new(ctx.juju.clone(), &ctx.controller))
                      .step_if(control, || TerraformInitStep::new(ctx.openstack_tf.clone()))
                      .step_if(control, || DeployControlPlaneStep::new(ctx.openstack_tf.clone(), ctx.juju.clone()))
                      .build()?)
}

/// Ejecuta el preflight y los cuatro planes; se detiene en el primer fallo.
pub fn bootstrap<R>(ctx: BootstrapContext, reporter: &mut R) -> Result<BootstrapReport, BootstrapError>
    where R: ProgressReporter + ?Sized
{
    info!("Bootstrapping {} as a {} node", ctx.fqdn, ctx.role);
    run_preflight_checks(&ctx.checks, reporter)?;

    let mut executor = PlanExecutor::<InMemoryEventStore>::default();
    let mut report = BootstrapReport::default();

    report.registries.push(executor.run_plan(reporter, &init_plan(&ctx)?)?);

    let user_results = executor.run_plan(reporter, &juju_user_plan(&ctx)?)?;
    let token = if ctx.role.is_control_node() {
        user_results.payload_of::<CreateJujuUserStep>()?.as_token().map(str::to_string)
    } else {
        None
    };
    report.registries.push(user_results);

    report.registries.push(executor.run_plan(reporter, &cluster_user_plan(&ctx, token)?)?);
    report.registries.push(executor.run_plan(reporter, &deploy_plan(&ctx)?)?);

    Ok(report)
}
