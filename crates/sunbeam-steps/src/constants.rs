//! Nombres fijos del despliegue.

/// Controller Juju por defecto.
pub const CONTROLLER: &str = "sunbeam-controller";
/// Modelo donde vive MicroK8S (el del controller).
pub const CONTROLLER_MODEL: &str = "controller";
pub const MICROK8S_APPLICATION: &str = "microk8s";
/// Cloud k8s que se registra en el controller apuntando a MicroK8S.
pub const MICROK8S_CLOUD: &str = "sunbeam-microk8s";
pub const OPENSTACK_MODEL: &str = "openstack";

/// Clave de configuración en el servicio de cluster con los datos del controller.
pub const JUJU_CONTROLLER_KEY: &str = "JujuController";

/// Archivo con la cuenta Juju del nodo (dentro de `data_location`).
pub const JUJU_ACCOUNT_FILE: &str = "juju_account.json";
/// Copia del accounts.yaml original (usuario admin del bootstrap).
pub const BOOTSTRAP_ACCOUNTS_BACKUP: &str = "accounts.bootstrap.yaml";

pub const MICROK8S_DEPLOY_TIMEOUT_SECS: u64 = 1200;
pub const OPENSTACK_DEPLOY_TIMEOUT_SECS: u64 = 3600;
