use std::rc::Rc;

use sunbeam_core::{ExecutionContext, ResultRegistry, ResultStatus, Role, StepDefinition, StepPayload};
use sunbeam_steps::collaborators::ClusterService;
use sunbeam_steps::memory::{InMemoryClusterService, InMemoryJuju};
use sunbeam_steps::steps::{ClusterAddJujuUserStep, ClusterInitStep, ClusterUpdateJujuControllerStep};

fn run(step: &dyn StepDefinition) -> sunbeam_core::StepResult {
    let reg = ResultRegistry::new();
    step.run(&ExecutionContext::new(&reg))
}

#[test]
fn cluster_init_bootstraps_then_skips() {
    let cluster = Rc::new(InMemoryClusterService::new());
    let step = ClusterInitStep::new(cluster.clone(), "node1.local", Role::Converged);

    assert_eq!(run(&step).status, ResultStatus::Completed);
    assert_eq!(*cluster.calls.borrow(), vec!["bootstrap node1.local CONVERGED"]);

    let again = run(&step);
    assert_eq!(again.status, ResultStatus::Skipped);
    assert_eq!(cluster.calls.borrow().len(), 1);
}

#[test]
fn cluster_init_reports_collaborator_failure() {
    let cluster = Rc::new(InMemoryClusterService::failing_on("bootstrap"));
    let res = run(&ClusterInitStep::new(cluster, "node1", Role::Control));
    assert_eq!(res.status, ResultStatus::Failed);
    assert!(res.failure_message().starts_with("Error bootstrapping cluster"));
}

#[test]
fn controller_details_are_stored_once() {
    let cluster = Rc::new(InMemoryClusterService::new());
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    juju.controllers.borrow_mut().insert("sunbeam-controller".into());
    let step = ClusterUpdateJujuControllerStep::new(cluster.clone(), juju, "sunbeam-controller");

    let res = run(&step);
    assert_eq!(res.status, ResultStatus::Completed);
    let stored = res.payload.as_json().expect("json payload");
    assert_eq!(stored["ca_cert"], "CA");
    assert!(cluster.get_config("JujuController").unwrap().is_some());

    let again = run(&step);
    assert_eq!(again.status, ResultStatus::Skipped);
    assert_eq!(again.payload.as_json(), Some(stored));
}

#[test]
fn missing_controller_fails() {
    let cluster = Rc::new(InMemoryClusterService::new());
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let res = run(&ClusterUpdateJujuControllerStep::new(cluster, juju, "nope"));
    assert_eq!(res.status, ResultStatus::Failed);
    assert!(res.failure_message().contains("controller nope"));
}

#[test]
fn add_juju_user_requires_token() {
    let cluster = Rc::new(InMemoryClusterService::new());
    let res = run(&ClusterAddJujuUserStep::new(cluster.clone(), "node1", None));
    assert_eq!(res.status, ResultStatus::Failed);
    assert_eq!(res.failure_message(), "No registration token available for Juju user node1");

    let ok = run(&ClusterAddJujuUserStep::new(cluster.clone(), "node1", Some("tok".into())));
    assert_eq!(ok.status, ResultStatus::Completed);
    assert_eq!(ok.payload, StepPayload::None);

    // Ya registrado: no necesita token
    let skipped = run(&ClusterAddJujuUserStep::new(cluster, "node1", None));
    assert_eq!(skipped.status, ResultStatus::Skipped);
}

#[test]
fn new_token_replaces_the_stored_one() {
    let cluster = Rc::new(InMemoryClusterService::new());
    run(&ClusterAddJujuUserStep::new(cluster.clone(), "node1", Some("token-1".into())));

    let same = run(&ClusterAddJujuUserStep::new(cluster.clone(), "node1", Some("token-1".into())));
    assert_eq!(same.status, ResultStatus::Skipped);

    let reissued = run(&ClusterAddJujuUserStep::new(cluster.clone(), "node1", Some("token-2".into())));
    assert_eq!(reissued.status, ResultStatus::Completed);
    assert_eq!(cluster.get_juju_user("node1").unwrap().map(|u| u.token), Some("token-2".to_string()));
    assert_eq!(cluster.users.borrow().len(), 1);
}

#[test]
fn corrupt_stored_controller_fails() {
    let cluster = Rc::new(InMemoryClusterService::new());
    cluster.update_config("JujuController", "{not json").unwrap();
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let res = run(&ClusterUpdateJujuControllerStep::new(cluster, juju, "sunbeam-controller"));
    assert_eq!(res.status, ResultStatus::Failed);
    assert!(res.failure_message().starts_with("Error decoding stored Juju controller"));
}
