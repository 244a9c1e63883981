//! Cliente Juju que invoca el binario `juju`.
//!
//! Las consultas usan `--format json` y se interpretan con `serde_json`. Las
//! esperas (`wait_*`) hacen polling de `juju status` hasta el timeout dado.
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use serde_json::{json, Value};

use super::command::{run, run_checked};
use super::{ControllerInfo, JujuController};
use crate::errors::CollaboratorError;

#[derive(Debug, Clone)]
pub struct JujuCli {
    binary: String,
    data_dir: PathBuf,
    cloud_endpoint: Option<String>,
    poll_interval: Duration,
}

impl JujuCli {
    /// `data_dir` es el directorio de datos del cliente (`JUJU_DATA`).
    pub fn new(data_dir: PathBuf) -> Self {
        Self { binary: "juju".to_string(),
               data_dir,
               cloud_endpoint: None,
               poll_interval: Duration::from_secs(10) }
    }

    /// Host de la cloud que se define antes del bootstrap (obligatorio para `manual`).
    pub fn with_cloud_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.cloud_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn env(&self) -> Vec<(String, String)> {
        vec![("JUJU_DATA".to_string(), self.data_dir.display().to_string())]
    }

    fn juju(&self, args: &[&str]) -> Result<String, CollaboratorError> {
        run_checked(&self.binary, args, None, &self.env(), None)
    }

    fn juju_json(&self, args: &[&str]) -> Result<Value, CollaboratorError> {
        let out = self.juju(args)?;
        Ok(serde_json::from_str(&out)?)
    }

    fn status(&self, model: &str) -> Result<Value, CollaboratorError> {
        self.juju_json(&["status", "-m", model, "--format", "json"])
    }

    fn wait_until<F>(&self, what: &str, timeout: Duration, mut ready: F) -> Result<(), CollaboratorError>
        where F: FnMut() -> Result<bool, CollaboratorError>
    {
        let deadline = Instant::now() + timeout;
        loop {
            if ready()? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(CollaboratorError::Timeout { what: what.to_string(),
                                                        secs: timeout.as_secs() });
            }
            debug!("Waiting for {what}");
            thread::sleep(self.poll_interval);
        }
    }
}

impl JujuController for JujuCli {
    fn controller_exists(&self, controller: &str) -> Result<bool, CollaboratorError> {
        let v = self.juju_json(&["controllers", "--format", "json"])?;
        Ok(v.get("controllers").and_then(|c| c.get(controller)).is_some())
    }

    fn bootstrap(&self, cloud_name: &str, cloud_type: &str, controller: &str) -> Result<(), CollaboratorError> {
        if !self.cloud_exists(cloud_name)? {
            let definition = cloud_definition(cloud_name, cloud_type, self.cloud_endpoint.as_deref())?;
            // JSON es YAML válido para `juju add-cloud --file`
            let file = self.data_dir.join(format!("{cloud_name}-cloud.json"));
            fs::create_dir_all(&self.data_dir)?;
            fs::write(&file, serde_json::to_vec_pretty(&definition)?)?;
            debug!("Adding {cloud_type} cloud {cloud_name}");
            let file = file.display().to_string();
            self.juju(&["add-cloud", cloud_name, "--file", &file, "--client"])?;
        }
        debug!("Bootstrapping controller {controller} on {cloud_name}");
        self.juju(&["bootstrap", cloud_name, controller]).map(|_| ())
    }

    fn show_controller(&self, controller: &str) -> Result<ControllerInfo, CollaboratorError> {
        let v = self.juju_json(&["show-controller", controller, "--format", "json"])?;
        parse_controller_info(controller, &v)
    }

    fn user_exists(&self, user: &str) -> Result<bool, CollaboratorError> {
        let out = run(&self.binary, &["show-user", user, "--format", "json"], None, &self.env(), None)?;
        if out.success {
            return Ok(true);
        }
        if out.stderr.contains("not found") {
            return Ok(false);
        }
        Err(CollaboratorError::CommandFailed { command: format!("{} show-user {user}", self.binary),
                                               stderr: out.stderr })
    }

    fn add_user(&self, user: &str) -> Result<String, CollaboratorError> {
        let out = self.juju(&["add-user", user])?;
        parse_register_token(&out)
    }

    fn remove_user(&self, user: &str) -> Result<(), CollaboratorError> {
        self.juju(&["remove-user", user, "--yes"]).map(|_| ())
    }

    fn register_user(&self, token: &str, password: &str, controller: &str, replace: bool) -> Result<(), CollaboratorError> {
        let mut args = vec!["register"];
        if replace {
            args.push("--replace");
        }
        args.push(token);
        // juju register pregunta: password, confirmación y nombre del controller
        let answers = format!("{password}\n{password}\n{controller}\n");
        run_checked(&self.binary, &args, None, &self.env(), Some(&answers)).map(|_| ())
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn application_exists(&self, model: &str, application: &str) -> Result<bool, CollaboratorError> {
        let status = self.status(model)?;
        Ok(status.pointer(&format!("/applications/{application}")).is_some())
    }

    fn machine_for_host(&self, model: &str, hostname: &str) -> Result<Option<String>, CollaboratorError> {
        let status = self.status(model)?;
        Ok(find_machine_for_host(&status, hostname))
    }

    fn unit_on_machine(&self, model: &str, application: &str, machine: &str) -> Result<Option<String>, CollaboratorError> {
        let status = self.status(model)?;
        Ok(find_unit_on_machine(&status, application, machine))
    }

    fn add_unit(&self, model: &str, application: &str, machine: &str) -> Result<(), CollaboratorError> {
        self.juju(&["add-unit", "-m", model, application, "--to", machine]).map(|_| ())
    }

    fn cloud_exists(&self, cloud: &str) -> Result<bool, CollaboratorError> {
        let v = self.juju_json(&["clouds", "--client", "--format", "json"])?;
        Ok(v.get(cloud).is_some())
    }

    fn kubeconfig(&self, model: &str, application: &str) -> Result<String, CollaboratorError> {
        let unit = format!("{application}/leader");
        self.juju(&["exec", "-m", model, "--unit", &unit, "--", "microk8s", "config"])
    }

    fn add_k8s_cloud(&self, cloud: &str, controller: &str, kubeconfig: &str) -> Result<(), CollaboratorError> {
        run_checked(&self.binary,
                    &["add-k8s", cloud, "--controller", controller, "--client"],
                    None,
                    &self.env(),
                    Some(kubeconfig)).map(|_| ())
    }

    fn wait_application_ready(&self, model: &str, application: &str, timeout: Duration) -> Result<(), CollaboratorError> {
        self.wait_until(&format!("application {application} in model {model}"), timeout, || {
                let status = self.status(model)?;
                Ok(application_active(&status, application))
            })
    }

    fn wait_model_ready(&self, model: &str, timeout: Duration) -> Result<(), CollaboratorError> {
        self.wait_until(&format!("model {model}"), timeout, || {
                let status = self.status(model)?;
                Ok(model_active(&status))
            })
    }
}

/// Definición de cloud para `juju add-cloud`. Una cloud `manual` apunta al host
/// del propio nodo.
pub fn cloud_definition(cloud_name: &str, cloud_type: &str, endpoint: Option<&str>) -> Result<Value, CollaboratorError> {
    let mut cloud = json!({ "type": cloud_type, "auth-types": ["empty"] });
    match endpoint {
        Some(host) => cloud["endpoint"] = json!(host),
        None if cloud_type == "manual" => {
            return Err(CollaboratorError::Config(format!("manual cloud {cloud_name} needs an endpoint")));
        }
        None => {}
    }
    Ok(json!({ "clouds": { cloud_name: cloud } }))
}

/// Extrae el token de la salida de `juju add-user` (última palabra de la línea
/// `juju register <token>`).
pub fn parse_register_token(output: &str) -> Result<String, CollaboratorError> {
    output.lines()
          .map(str::trim)
          .find_map(|l| l.strip_prefix("juju register "))
          .map(|t| t.trim().to_string())
          .filter(|t| !t.is_empty())
          .ok_or_else(|| CollaboratorError::Parse("no registration token in juju add-user output".into()))
}

pub fn parse_controller_info(controller: &str, v: &Value) -> Result<ControllerInfo, CollaboratorError> {
    let details = v.get(controller)
                   .and_then(|c| c.get("details"))
                   .ok_or_else(|| CollaboratorError::NotFound(format!("controller {controller}")))?;
    let api_endpoints = details.get("api-endpoints")
                               .and_then(Value::as_array)
                               .map(|a| a.iter().filter_map(Value::as_str).map(String::from).collect())
                               .unwrap_or_default();
    let ca_cert = details.get("ca-cert")
                         .and_then(Value::as_str)
                         .ok_or_else(|| CollaboratorError::Parse(format!("controller {controller} has no ca-cert")))?
                         .to_string();
    Ok(ControllerInfo { name: controller.to_string(),
                        api_endpoints,
                        ca_cert })
}

pub fn find_machine_for_host(status: &Value, hostname: &str) -> Option<String> {
    status.get("machines")?
          .as_object()?
          .iter()
          .find(|(_, m)| {
              m.get("hostname").and_then(Value::as_str) == Some(hostname)
              || m.get("dns-name").and_then(Value::as_str) == Some(hostname)
          })
          .map(|(id, _)| id.clone())
}

pub fn find_unit_on_machine(status: &Value, application: &str, machine: &str) -> Option<String> {
    status.pointer(&format!("/applications/{application}/units"))?
          .as_object()?
          .iter()
          .find(|(_, u)| u.get("machine").and_then(Value::as_str) == Some(machine))
          .map(|(name, _)| name.clone())
}

fn application_active(status: &Value, application: &str) -> bool {
    status.pointer(&format!("/applications/{application}/application-status/current"))
          .and_then(Value::as_str)
          == Some("active")
}

fn model_active(status: &Value) -> bool {
    match status.get("applications").and_then(Value::as_object) {
        Some(apps) => apps.keys().all(|a| application_active(status, a)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_token_is_parsed() {
        let out = "User \"node1\" added\nPlease send this command to node1:\n    juju register MFUTEwRub2RlMTAeExwxMC4\n";
        assert_eq!(parse_register_token(out).unwrap(), "MFUTEwRub2RlMTAeExwxMC4");
        assert!(matches!(parse_register_token("User added"), Err(CollaboratorError::Parse(_))));
    }

    #[test]
    fn controller_info_is_parsed() {
        let v = json!({"sunbeam-controller": {"details": {"api-endpoints": ["10.0.0.1:17070"], "ca-cert": "CERT"}}});
        let info = parse_controller_info("sunbeam-controller", &v).unwrap();
        assert_eq!(info.api_endpoints, vec!["10.0.0.1:17070"]);
        assert_eq!(info.ca_cert, "CERT");
        assert!(matches!(parse_controller_info("other", &v), Err(CollaboratorError::NotFound(_))));
    }

    #[test]
    fn machines_and_units_are_found() {
        let status = json!({
            "machines": {"0": {"hostname": "node1", "dns-name": "10.0.0.1"}},
            "applications": {
                "microk8s": {
                    "application-status": {"current": "waiting"},
                    "units": {"microk8s/0": {"machine": "0"}}
                }
            }
        });
        assert_eq!(find_machine_for_host(&status, "node1").as_deref(), Some("0"));
        assert_eq!(find_machine_for_host(&status, "10.0.0.1").as_deref(), Some("0"));
        assert_eq!(find_machine_for_host(&status, "node2"), None);
        assert_eq!(find_unit_on_machine(&status, "microk8s", "0").as_deref(), Some("microk8s/0"));
        assert_eq!(find_unit_on_machine(&status, "microk8s", "1"), None);
        assert!(!application_active(&status, "microk8s"));
        assert!(!model_active(&status));
        assert!(model_active(&json!({})));
    }

    #[test]
    fn manual_cloud_points_at_the_node() {
        let def = cloud_definition("sunbeam", "manual", Some("node1.maas")).unwrap();
        assert_eq!(def, json!({"clouds": {"sunbeam": {"type": "manual", "auth-types": ["empty"], "endpoint": "node1.maas"}}}));
        assert!(matches!(cloud_definition("sunbeam", "manual", None), Err(CollaboratorError::Config(_))));
        assert!(cloud_definition("lxd", "lxd", None).unwrap().pointer("/clouds/lxd/endpoint").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn bootstrap_adds_the_cloud_first() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("juju.log");
        let bin = dir.path().join("fake-juju");
        let script = format!("#!/bin/sh\necho \"$@\" >> {}\nif [ \"$1\" = clouds ]; then echo '{{}}'; fi\n",
                             log.display());
        fs::write(&bin, script).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        let data = dir.path().join("juju-data");
        let juju = JujuCli::new(data.clone()).with_binary(bin.display().to_string())
                                             .with_cloud_endpoint("node1.maas");
        juju.bootstrap("sunbeam", "manual", "sunbeam-controller").unwrap();

        let calls = fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        let cloud_file = data.join("sunbeam-cloud.json");
        assert_eq!(calls,
                   vec!["clouds --client --format json".to_string(),
                        format!("add-cloud sunbeam --file {} --client", cloud_file.display()),
                        "bootstrap sunbeam sunbeam-controller".to_string()]);
        let written: Value = serde_json::from_slice(&fs::read(&cloud_file).unwrap()).unwrap();
        assert_eq!(written.pointer("/clouds/sunbeam/type"), Some(&json!("manual")));
    }
}
