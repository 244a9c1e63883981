//! Configuración central de la aplicación.
//! Carga `.env` una sola vez (`dotenvy`) y construye `AppConfig` a partir de
//! variables `SUNBEAM_*`, con valores por defecto para una instalación snap.
use std::env;
use std::path::PathBuf;
use std::process::Command;

use once_cell::sync::Lazy;
use sunbeam_steps::collaborators::terraform::StateBackend;

use crate::errors::BootstrapError;

/// `true` si se encontró un `.env`; evaluado la primera vez que se lee la config.
static DOTENV_LOADED: Lazy<bool> = Lazy::new(|| dotenvy::dotenv().is_ok());

/// Configuración resuelta del bootstrap.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directorio de sólo lectura con los planes empaquetados.
    pub snap_dir: PathBuf,
    /// Directorio escribible del snap.
    pub snap_common: PathBuf,
    /// Estado local: cuenta Juju, base de datos del cluster, estado terraform.
    pub data_dir: PathBuf,
    /// `JUJU_DATA` para el binario `juju`.
    pub juju_data_dir: PathBuf,
    pub cloud_type: String,
    pub cloud_name: String,
    pub controller: String,
    pub tf_backend: StateBackend,
    /// Servidor de estado para el backend `http`.
    pub tf_http_address: Option<String>,
    pub tf_parallelism: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BootstrapError> {
        let _ = *DOTENV_LOADED;
        let home = env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/root"));

        let snap_dir = path_var("SUNBEAM_SNAP_DIR").unwrap_or_else(|| PathBuf::from("/snap/openstack/current"));
        let snap_common = path_var("SUNBEAM_SNAP_COMMON").unwrap_or_else(|| home.join(".local/share/openstack"));
        let data_dir = path_var("SUNBEAM_DATA_DIR").unwrap_or_else(|| snap_common.join("data"));
        let juju_data_dir = path_var("JUJU_DATA").unwrap_or_else(|| home.join(".local/share/juju"));

        let tf_backend = string_var("SUNBEAM_TF_BACKEND", "http").parse()
                                                                 .map_err(|e| BootstrapError::Config(format!("SUNBEAM_TF_BACKEND: {e}")))?;
        let tf_parallelism = parse_parallelism(env::var("SUNBEAM_TF_PARALLELISM").ok().as_deref())?;

        Ok(Self { snap_dir,
                  snap_common,
                  data_dir,
                  juju_data_dir,
                  cloud_type: string_var("SUNBEAM_JUJU_CLOUD_TYPE", "manual"),
                  cloud_name: string_var("SUNBEAM_JUJU_CLOUD_NAME", "sunbeam"),
                  controller: string_var("SUNBEAM_CONTROLLER", sunbeam_steps::constants::CONTROLLER),
                  tf_backend,
                  tf_http_address: env::var("SUNBEAM_TF_HTTP_ADDRESS").ok().filter(|v| !v.trim().is_empty()),
                  tf_parallelism })
    }

    /// Directorio del plan terraform ya instalado (`<snap_common>/etc/<plan>`).
    pub fn plan_dir(&self, plan: &str) -> PathBuf {
        self.snap_common.join("etc").join(plan)
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn string_var(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

/// Paralelismo de terraform; ausente = 1, cero o no numérico = error.
pub fn parse_parallelism(raw: Option<&str>) -> Result<u32, BootstrapError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(1),
        Some(v) => match v.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(BootstrapError::Config(format!("SUNBEAM_TF_PARALLELISM must be a positive integer, got '{v}'"))),
        },
    }
}

/// Nombre completo del nodo: `SUNBEAM_FQDN`, luego `hostname -f`, luego `HOSTNAME`.
pub fn resolve_fqdn() -> Result<String, BootstrapError> {
    let _ = *DOTENV_LOADED;
    if let Some(fqdn) = env::var("SUNBEAM_FQDN").ok().filter(|v| !v.trim().is_empty()) {
        return Ok(fqdn.trim().to_string());
    }
    if let Ok(out) = Command::new("hostname").arg("-f").output() {
        let name = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if out.status.success() && !name.is_empty() {
            return Ok(name);
        }
    }
    env::var("HOSTNAME").ok()
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| BootstrapError::Config("unable to determine the node FQDN".to_string()))
}
