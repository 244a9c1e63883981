use std::fs;
use std::rc::Rc;

use sunbeam::bootstrap::{bootstrap, default_checks, deploy_plan, BootstrapContext};
use sunbeam::BootstrapError;
use sunbeam_core::{Check, CheckOutcome, EngineError, RecordingReporter, Role};
use sunbeam_steps::account::JujuAccount;
use sunbeam_steps::collaborators::ClusterService;
use sunbeam_steps::memory::{InMemoryClusterService, InMemoryJuju, RecordingTerraform};
use tempfile::TempDir;

const FQDN: &str = "node1.maas";

struct Fixture {
    cluster: Rc<InMemoryClusterService>,
    juju: Rc<InMemoryJuju>,
    microk8s_tf: Rc<RecordingTerraform>,
    openstack_tf: Rc<RecordingTerraform>,
    juju_dir: TempDir,
    data_dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self::with_juju(|juju| juju)
    }

    fn with_juju(customize: impl FnOnce(InMemoryJuju) -> InMemoryJuju) -> Self {
        let juju_dir = tempfile::tempdir().unwrap();
        fs::write(juju_dir.path().join("accounts.yaml"), "controllers: {}\n").unwrap();
        let juju = customize(InMemoryJuju::new(juju_dir.path().to_path_buf()).with_machine("0", FQDN));
        Self { cluster: Rc::new(InMemoryClusterService::new()),
               juju: Rc::new(juju),
               microk8s_tf: Rc::new(RecordingTerraform::new("microk8s-plan")),
               openstack_tf: Rc::new(RecordingTerraform::new("openstack-plan")),
               juju_dir,
               data_dir: tempfile::tempdir().unwrap() }
    }

    fn context(&self, role: Role, checks: Vec<Box<dyn Check>>) -> BootstrapContext {
        BootstrapContext { role,
                           fqdn: FQDN.to_string(),
                           cloud_name: "sunbeam".to_string(),
                           cloud_type: "manual".to_string(),
                           controller: "sunbeam-controller".to_string(),
                           data_location: self.data_dir.path().to_path_buf(),
                           cluster: self.cluster.clone(),
                           juju: self.juju.clone(),
                           microk8s_tf: self.microk8s_tf.clone(),
                           openstack_tf: self.openstack_tf.clone(),
                           checks }
    }
}

struct MissingJuju;

impl Check for MissingJuju {
    fn name(&self) -> &str {
        "juju_snap"
    }

    fn description(&self) -> &str {
        "Checking for presence of Juju"
    }

    fn run(&self) -> Result<CheckOutcome, EngineError> {
        Ok(CheckOutcome::Failed { message: "juju not installed".to_string() })
    }
}

#[test]
fn converged_node_runs_every_plan() {
    let fx = Fixture::new();
    let mut reporter = RecordingReporter::new();
    let report = bootstrap(fx.context(Role::Converged, Vec::new()), &mut reporter).unwrap();

    assert_eq!(report.plans_run(), 4);
    assert_eq!(report.step_ids(),
               vec!["cluster_init",
                    "bootstrap_juju",
                    "create_juju_user",
                    "cluster_update_juju_controller",
                    "cluster_add_juju_user",
                    "backup_bootstrap_user",
                    "save_juju_user_locally",
                    "register_juju_user",
                    "terraform_init_microk8s",
                    "deploy_microk8s_application",
                    "add_microk8s_unit",
                    "add_microk8s_cloud",
                    "terraform_init_openstack",
                    "deploy_control_plane"]);
    assert!(reporter.failures().is_empty());

    // el token del plan 2 llegó a la base del cluster
    assert_eq!(*fx.cluster.calls.borrow(),
               vec![format!("bootstrap {FQDN} CONVERGED"),
                    "update_config JujuController".to_string(),
                    format!("add_juju_user {FQDN} token-1-{FQDN}")]);

    let account = JujuAccount::load(fx.data_dir.path()).unwrap().unwrap();
    assert_eq!(*fx.juju.registered.borrow(), vec![(format!("token-1-{FQDN}"), account.password)]);
    assert!(fx.data_dir.path().join("accounts.bootstrap.yaml").exists());

    assert_eq!(*fx.microk8s_tf.calls.borrow(), vec!["init microk8s-plan", "apply microk8s-plan"]);
    assert_eq!(*fx.openstack_tf.calls.borrow(), vec!["init openstack-plan", "apply openstack-plan"]);
    assert_eq!(fx.openstack_tf.applied_vars.borrow()[0]["cloud"], "sunbeam-microk8s");
    assert!(fx.juju_dir.path().join("accounts.yaml").exists());
}

#[test]
fn compute_node_only_joins_the_cluster() {
    let fx = Fixture::new();
    let mut reporter = RecordingReporter::new();
    let report = bootstrap(fx.context(Role::Compute, default_checks(Role::Compute)), &mut reporter).unwrap();

    assert_eq!(report.plans_run(), 4);
    assert_eq!(report.step_ids(), vec!["cluster_init"]);
    assert_eq!(reporter.announced(), vec!["Bootstrapping Sunbeam cluster ... "]);
    assert!(fx.juju.calls.borrow().is_empty());
    assert!(fx.microk8s_tf.calls.borrow().is_empty());
}

#[test]
fn failed_check_prevents_every_step() {
    let fx = Fixture::new();
    let mut reporter = RecordingReporter::new();
    let err = bootstrap(fx.context(Role::Control, vec![Box::new(MissingJuju)]), &mut reporter).unwrap_err();

    assert_eq!(err.to_string(), "juju not installed");
    assert!(matches!(err, BootstrapError::Engine(EngineError::CheckFailed { .. })));
    assert_eq!(reporter.announced(), vec!["Checking for presence of Juju ... "]);
    assert!(fx.cluster.calls.borrow().is_empty());
    assert!(fx.juju.calls.borrow().is_empty());
}

#[test]
fn failure_in_user_plan_stops_the_bootstrap() {
    let fx = Fixture::with_juju(|juju| juju.failing_on("add_user"));
    let mut reporter = RecordingReporter::new();
    let err = bootstrap(fx.context(Role::Control, Vec::new()), &mut reporter).unwrap_err();

    match err {
        BootstrapError::Engine(EngineError::StepFailed { step, .. }) => assert_eq!(step, "create_juju_user"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(reporter.failures(), vec!["Creating user for machine in Juju ... "]);
    // ni el plan 3 ni el 4 llegaron a ejecutarse
    assert!(fx.cluster.users.borrow().is_empty());
    assert!(JujuAccount::load(fx.data_dir.path()).unwrap().is_none());
    assert!(fx.microk8s_tf.calls.borrow().is_empty());
}

#[test]
fn second_bootstrap_skips_applied_work() {
    let fx = Fixture::new();
    bootstrap(fx.context(Role::Converged, Vec::new()), &mut RecordingReporter::new()).unwrap();

    let mut reporter = RecordingReporter::new();
    bootstrap(fx.context(Role::Converged, Vec::new()), &mut reporter).unwrap();
    assert_eq!(fx.cluster.nodes.borrow().len(), 1);
    assert_eq!(fx.juju.units.borrow().len(), 1);
    // el usuario se vuelve a emitir con un token nuevo
    assert!(fx.juju.calls.borrow().contains(&format!("remove_user {FQDN}")));
    let latest = format!("token-2-{FQDN}");
    assert_eq!(fx.cluster.get_juju_user(FQDN).unwrap().map(|u| u.token), Some(latest.clone()));
    assert_eq!(fx.juju.registered.borrow().last().map(|(token, _)| token.clone()), Some(latest));
}

#[test]
fn deploy_plan_is_empty_for_compute() {
    let fx = Fixture::new();
    assert!(deploy_plan(&fx.context(Role::Compute, Vec::new())).unwrap().is_empty());
    assert_eq!(deploy_plan(&fx.context(Role::Control, Vec::new())).unwrap().len(), 7);
}

#[test]
fn only_control_roles_check_for_juju() {
    assert!(default_checks(Role::Compute).is_empty());
    assert_eq!(default_checks(Role::Control).len(), 1);
    assert_eq!(default_checks(Role::Converged)[0].name(), "juju_snap");
}
