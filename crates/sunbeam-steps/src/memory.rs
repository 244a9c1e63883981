//! Colaboradores en memoria.
//!
//! Reproducen el comportamiento observable de los colaboradores reales sin
//! tocar red ni binarios externos. Cada uno anota las operaciones mutantes en
//! `calls` y puede forzarse a fallar en una operación concreta con `fail_on`.
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use sunbeam_core::Role;

use crate::collaborators::{ClusterService, ControllerInfo, JujuController, JujuUser, TerraformApplier};
use crate::errors::CollaboratorError;

fn injected(op: &str) -> CollaboratorError {
    CollaboratorError::CommandFailed { command: op.to_string(),
                                       stderr: "injected failure".to_string() }
}

#[derive(Debug, Default)]
pub struct InMemoryClusterService {
    pub nodes: RefCell<Vec<(String, Role)>>,
    pub config: RefCell<BTreeMap<String, String>>,
    pub users: RefCell<Vec<JujuUser>>,
    pub calls: RefCell<Vec<String>>,
    pub fail_on: Option<&'static str>,
}

impl InMemoryClusterService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(op: &'static str) -> Self {
        Self { fail_on: Some(op),
               ..Self::default() }
    }

    fn guard(&self, op: &str) -> Result<(), CollaboratorError> {
        match self.fail_on {
            Some(f) if f == op => Err(injected(op)),
            _ => Ok(()),
        }
    }
}

impl ClusterService for InMemoryClusterService {
    fn is_bootstrapped(&self) -> Result<bool, CollaboratorError> {
        self.guard("is_bootstrapped")?;
        Ok(!self.nodes.borrow().is_empty())
    }

    fn bootstrap(&self, node_name: &str, role: Role) -> Result<(), CollaboratorError> {
        self.guard("bootstrap")?;
        self.calls.borrow_mut().push(format!("bootstrap {node_name} {}", role.cluster_role()));
        self.nodes.borrow_mut().push((node_name.to_string(), role));
        Ok(())
    }

    fn get_config(&self, key: &str) -> Result<Option<String>, CollaboratorError> {
        self.guard("get_config")?;
        Ok(self.config.borrow().get(key).cloned())
    }

    fn update_config(&self, key: &str, value: &str) -> Result<(), CollaboratorError> {
        self.guard("update_config")?;
        self.calls.borrow_mut().push(format!("update_config {key}"));
        self.config.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_juju_user(&self, name: &str) -> Result<Option<JujuUser>, CollaboratorError> {
        self.guard("get_juju_user")?;
        Ok(self.users.borrow().iter().find(|u| u.name == name).cloned())
    }

    fn add_juju_user(&self, name: &str, token: &str) -> Result<(), CollaboratorError> {
        self.guard("add_juju_user")?;
        self.calls.borrow_mut().push(format!("add_juju_user {name} {token}"));
        self.users.borrow_mut().retain(|u| u.name != name);
        self.users.borrow_mut().push(JujuUser { name: name.to_string(),
                                                token: token.to_string() });
        Ok(())
    }
}

/// Controller Juju simulado. Los tokens emitidos son `token-<n>-<user>`.
#[derive(Debug, Default)]
pub struct InMemoryJuju {
    pub data_dir: PathBuf,
    pub controllers: RefCell<BTreeSet<String>>,
    pub users: RefCell<BTreeSet<String>>,
    pub registered: RefCell<Vec<(String, String)>>,
    pub applications: RefCell<BTreeSet<(String, String)>>,
    pub machines: RefCell<BTreeMap<String, String>>,
    pub units: RefCell<Vec<(String, String, String)>>,
    pub clouds: RefCell<BTreeSet<String>>,
    pub calls: RefCell<Vec<String>>,
    pub fail_on: Option<&'static str>,
    issued: RefCell<u32>,
}

impl InMemoryJuju {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir,
               ..Self::default() }
    }

    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn with_machine(self, id: &str, hostname: &str) -> Self {
        self.machines.borrow_mut().insert(id.to_string(), hostname.to_string());
        self
    }

    /// Marca una aplicación como desplegada (la usa el terraform simulado).
    pub fn deploy_application(&self, model: &str, application: &str) {
        self.applications.borrow_mut().insert((model.to_string(), application.to_string()));
    }

    fn guard(&self, op: &str) -> Result<(), CollaboratorError> {
        match self.fail_on {
            Some(f) if f == op => Err(injected(op)),
            _ => Ok(()),
        }
    }

    fn call(&self, op: String) {
        self.calls.borrow_mut().push(op);
    }
}

impl JujuController for InMemoryJuju {
    fn controller_exists(&self, controller: &str) -> Result<bool, CollaboratorError> {
        self.guard("controller_exists")?;
        Ok(self.controllers.borrow().contains(controller))
    }

    fn bootstrap(&self, cloud_name: &str, cloud_type: &str, controller: &str) -> Result<(), CollaboratorError> {
        self.guard("bootstrap")?;
        self.call(format!("bootstrap {cloud_name} {cloud_type} {controller}"));
        self.controllers.borrow_mut().insert(controller.to_string());
        Ok(())
    }

    fn show_controller(&self, controller: &str) -> Result<ControllerInfo, CollaboratorError> {
        self.guard("show_controller")?;
        if !self.controllers.borrow().contains(controller) {
            return Err(CollaboratorError::NotFound(format!("controller {controller}")));
        }
        Ok(ControllerInfo { name: controller.to_string(),
                            api_endpoints: vec!["10.0.0.1:17070".to_string()],
                            ca_cert: "CA".to_string() })
    }

    fn user_exists(&self, user: &str) -> Result<bool, CollaboratorError> {
        self.guard("user_exists")?;
        Ok(self.users.borrow().contains(user))
    }

    fn add_user(&self, user: &str) -> Result<String, CollaboratorError> {
        self.guard("add_user")?;
        self.call(format!("add_user {user}"));
        self.users.borrow_mut().insert(user.to_string());
        let mut n = self.issued.borrow_mut();
        *n += 1;
        Ok(format!("token-{n}-{user}"))
    }

    fn remove_user(&self, user: &str) -> Result<(), CollaboratorError> {
        self.guard("remove_user")?;
        self.call(format!("remove_user {user}"));
        self.users.borrow_mut().remove(user);
        Ok(())
    }

    fn register_user(&self, token: &str, password: &str, controller: &str, replace: bool) -> Result<(), CollaboratorError> {
        self.guard("register_user")?;
        self.call(format!("register_user {token} {controller} replace={replace}"));
        self.registered.borrow_mut().push((token.to_string(), password.to_string()));
        Ok(())
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn application_exists(&self, model: &str, application: &str) -> Result<bool, CollaboratorError> {
        self.guard("application_exists")?;
        Ok(self.applications.borrow().contains(&(model.to_string(), application.to_string())))
    }

    fn machine_for_host(&self, _model: &str, hostname: &str) -> Result<Option<String>, CollaboratorError> {
        self.guard("machine_for_host")?;
        Ok(self.machines.borrow().iter().find(|(_, h)| h.as_str() == hostname).map(|(id, _)| id.clone()))
    }

    fn unit_on_machine(&self, model: &str, application: &str, machine: &str) -> Result<Option<String>, CollaboratorError> {
        self.guard("unit_on_machine")?;
        Ok(self.units
               .borrow()
               .iter()
               .position(|(m, a, mach)| m == model && a == application && mach == machine)
               .map(|i| format!("{application}/{i}")))
    }

    fn add_unit(&self, model: &str, application: &str, machine: &str) -> Result<(), CollaboratorError> {
        self.guard("add_unit")?;
        self.call(format!("add_unit {model} {application} {machine}"));
        self.units.borrow_mut().push((model.to_string(), application.to_string(), machine.to_string()));
        Ok(())
    }

    fn cloud_exists(&self, cloud: &str) -> Result<bool, CollaboratorError> {
        self.guard("cloud_exists")?;
        Ok(self.clouds.borrow().contains(cloud))
    }

    fn kubeconfig(&self, _model: &str, application: &str) -> Result<String, CollaboratorError> {
        self.guard("kubeconfig")?;
        Ok(format!("kubeconfig-of-{application}"))
    }

    fn add_k8s_cloud(&self, cloud: &str, controller: &str, _kubeconfig: &str) -> Result<(), CollaboratorError> {
        self.guard("add_k8s_cloud")?;
        self.call(format!("add_k8s_cloud {cloud} {controller}"));
        self.clouds.borrow_mut().insert(cloud.to_string());
        Ok(())
    }

    // Lo que terraform despliega aparece en el modelo al quedar listo
    fn wait_application_ready(&self, model: &str, application: &str, _timeout: Duration) -> Result<(), CollaboratorError> {
        self.guard("wait_application_ready")?;
        self.call(format!("wait_application_ready {model} {application}"));
        self.deploy_application(model, application);
        Ok(())
    }

    fn wait_model_ready(&self, model: &str, _timeout: Duration) -> Result<(), CollaboratorError> {
        self.guard("wait_model_ready")?;
        self.call(format!("wait_model_ready {model}"));
        Ok(())
    }
}

/// Terraform simulado: anota `init`/`apply` y las variables recibidas.
#[derive(Debug, Default)]
pub struct RecordingTerraform {
    pub plan: String,
    pub calls: RefCell<Vec<String>>,
    pub applied_vars: RefCell<Vec<Value>>,
    pub fail_on: Option<&'static str>,
}

impl RecordingTerraform {
    pub fn new(plan: &str) -> Self {
        Self { plan: plan.to_string(),
               ..Self::default() }
    }

    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }
}

impl TerraformApplier for RecordingTerraform {
    fn plan_name(&self) -> &str {
        &self.plan
    }

    fn init(&self) -> Result<(), CollaboratorError> {
        if self.fail_on == Some("init") {
            return Err(injected("terraform init"));
        }
        self.calls.borrow_mut().push(format!("init {}", self.plan));
        Ok(())
    }

    fn apply(&self, vars: &Value) -> Result<(), CollaboratorError> {
        if self.fail_on == Some("apply") {
            return Err(injected("terraform apply"));
        }
        self.calls.borrow_mut().push(format!("apply {}", self.plan));
        self.applied_vars.borrow_mut().push(vars.clone());
        Ok(())
    }
}
