//! Steps contra el controller Juju y la cuenta local del nodo.
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use log::debug;
use sunbeam_core::{ExecutionContext, StepDefinition, StepIdentity, StepPayload, StepResult};

use super::failed;
use crate::account::JujuAccount;
use crate::collaborators::{ClusterService, JujuController};
use crate::constants::BOOTSTRAP_ACCOUNTS_BACKUP;
use crate::errors::CollaboratorError;

/// Bootstrap del controller Juju sobre la cloud local.
pub struct BootstrapJujuStep {
    juju: Rc<dyn JujuController>,
    cloud_name: String,
    cloud_type: String,
    controller: String,
}

impl BootstrapJujuStep {
    pub fn new(juju: Rc<dyn JujuController>, cloud_name: &str, cloud_type: &str, controller: &str) -> Self {
        Self { juju,
               cloud_name: cloud_name.to_string(),
               cloud_type: cloud_type.to_string(),
               controller: controller.to_string() }
    }
}

impl StepIdentity for BootstrapJujuStep {
    const ID: &'static str = "bootstrap_juju";
}

impl StepDefinition for BootstrapJujuStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Bootstrapping Juju onto machine"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.juju.controller_exists(&self.controller) {
            Ok(true) => return StepResult::skipped_because(format!("controller {} already exists", self.controller)),
            Ok(false) => {}
            Err(e) => return failed("Error listing Juju controllers", e),
        }
        match self.juju.bootstrap(&self.cloud_name, &self.cloud_type, &self.controller) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error bootstrapping Juju", e),
        }
    }
}

/// Crea el usuario Juju del nodo y devuelve su token de registro.
///
/// Si el usuario ya existe se elimina y se vuelve a crear: el token anterior
/// no es recuperable y los steps siguientes lo necesitan.
pub struct CreateJujuUserStep {
    juju: Rc<dyn JujuController>,
    name: String,
}

impl CreateJujuUserStep {
    pub fn new(juju: Rc<dyn JujuController>, name: &str) -> Self {
        Self { juju,
               name: name.to_string() }
    }

    fn create(&self) -> Result<String, CollaboratorError> {
        if self.juju.user_exists(&self.name)? {
            debug!("Juju user {} exists, recreating it", self.name);
            self.juju.remove_user(&self.name)?;
        }
        self.juju.add_user(&self.name)
    }
}

impl StepIdentity for CreateJujuUserStep {
    const ID: &'static str = "create_juju_user";
}

impl StepDefinition for CreateJujuUserStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Creating user for machine in Juju"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.create() {
            Ok(token) => StepResult::completed_with(StepPayload::Token(token)),
            Err(e) => failed(&format!("Error creating Juju user {}", self.name), e),
        }
    }
}

/// Copia el accounts.yaml del usuario admin antes de registrar el usuario del
/// nodo (que lo reemplaza).
pub struct BackupBootstrapUserStep {
    juju: Rc<dyn JujuController>,
    name: String,
    data_location: PathBuf,
}

impl BackupBootstrapUserStep {
    pub fn new(juju: Rc<dyn JujuController>, name: &str, data_location: PathBuf) -> Self {
        Self { juju,
               name: name.to_string(),
               data_location }
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_location.join(BOOTSTRAP_ACCOUNTS_BACKUP)
    }
}

impl StepIdentity for BackupBootstrapUserStep {
    const ID: &'static str = "backup_bootstrap_user";
}

impl StepDefinition for BackupBootstrapUserStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Backup Bootstrap user"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        let target = self.backup_path();
        if target.exists() {
            return StepResult::skipped_because("bootstrap user already backed up");
        }
        let source = self.juju.data_dir().join("accounts.yaml");
        if !source.exists() {
            return StepResult::failed(format!("Juju accounts file {} not found", source.display()));
        }
        debug!("Backing up bootstrap user before registering {}", self.name);
        let copied = fs::create_dir_all(&self.data_location).and_then(|_| fs::copy(&source, &target));
        match copied {
            Ok(_) => StepResult::completed(),
            Err(e) => failed("Error backing up bootstrap user", e.into()),
        }
    }
}

/// Genera y guarda la cuenta (usuario + password) Juju del nodo.
pub struct SaveJujuUserLocallyStep {
    name: String,
    data_location: PathBuf,
}

impl SaveJujuUserLocallyStep {
    pub fn new(name: &str, data_location: PathBuf) -> Self {
        Self { name: name.to_string(),
               data_location }
    }
}

impl StepIdentity for SaveJujuUserLocallyStep {
    const ID: &'static str = "save_juju_user_locally";
}

impl StepDefinition for SaveJujuUserLocallyStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Save Juju user for local usage"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match JujuAccount::load(&self.data_location) {
            Ok(Some(acc)) if acc.user == self.name => return StepResult::skipped_with(StepPayload::Secret(acc.password)),
            Ok(_) => {}
            Err(e) => return failed("Error reading local Juju account", e),
        }
        let account = JujuAccount::generate(&self.name);
        match account.save(&self.data_location) {
            Ok(path) => {
                debug!("Juju account for {} saved to {}", self.name, path.display());
                StepResult::completed_with(StepPayload::Secret(account.password))
            }
            Err(e) => failed("Error saving local Juju account", e),
        }
    }
}

/// Registra el usuario del nodo en el cliente juju local.
///
/// El token sale de la base del cluster y la password de la cuenta local.
pub struct RegisterJujuUserStep {
    cluster: Rc<dyn ClusterService>,
    juju: Rc<dyn JujuController>,
    name: String,
    controller: String,
    data_location: PathBuf,
    replace: bool,
}

impl RegisterJujuUserStep {
    pub fn new(cluster: Rc<dyn ClusterService>,
               juju: Rc<dyn JujuController>,
               name: &str,
               controller: &str,
               data_location: PathBuf,
               replace: bool)
               -> Self {
        Self { cluster,
               juju,
               name: name.to_string(),
               controller: controller.to_string(),
               data_location,
               replace }
    }

    fn register(&self) -> Result<(), String> {
        let user = self.cluster
                       .get_juju_user(&self.name)
                       .map_err(|e| format!("Error reading Juju user from cluster DB: {e}"))?
                       .ok_or_else(|| format!("Juju user {} not found in cluster DB", self.name))?;
        let account = JujuAccount::load(&self.data_location).map_err(|e| format!("Error reading local Juju account: {e}"))?
                                                            .ok_or_else(|| format!("No local Juju account for {}", self.name))?;
        self.juju
            .register_user(&user.token, &account.password, &self.controller, self.replace)
            .map_err(|e| format!("Error registering Juju user {}: {e}", self.name))
    }
}

impl StepIdentity for RegisterJujuUserStep {
    const ID: &'static str = "register_juju_user";
}

impl StepDefinition for RegisterJujuUserStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Register Juju user"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        if !self.replace {
            match self.juju.controller_exists(&self.controller) {
                Ok(true) => return StepResult::skipped_because("controller already registered"),
                Ok(false) => {}
                Err(e) => return failed("Error listing Juju controllers", e),
            }
        }
        match self.register() {
            Ok(()) => StepResult::completed(),
            Err(message) => StepResult::failed(message),
        }
    }
}
