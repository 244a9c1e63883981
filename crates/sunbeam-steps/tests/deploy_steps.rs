use std::rc::Rc;

use sunbeam_core::{run_plan, ExecutionContext, Plan, RecordingReporter, ResultRegistry, ResultStatus, StepDefinition,
                   StepPayload, StepResult};
use sunbeam_steps::memory::{InMemoryJuju, RecordingTerraform};
use sunbeam_steps::steps::{AddMicrok8sCloudStep, AddMicrok8sUnitStep, DeployControlPlaneStep,
                           DeployMicrok8sApplicationStep, TerraformInitStep};

fn run(step: &dyn StepDefinition) -> StepResult {
    let reg = ResultRegistry::new();
    step.run(&ExecutionContext::new(&reg))
}

#[test]
fn terraform_init_failure_is_a_failed_result() {
    let tf = Rc::new(RecordingTerraform::new("microk8s-plan").failing_on("init"));
    let step = TerraformInitStep::new(tf);
    assert_eq!(step.id(), "terraform_init_microk8s");
    let res = run(&step);
    assert_eq!(res.status, ResultStatus::Failed);
    assert!(res.failure_message().contains("microk8s-plan"));
}

#[test]
fn microk8s_is_deployed_once() {
    let tf = Rc::new(RecordingTerraform::new("microk8s-plan"));
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let step = DeployMicrok8sApplicationStep::new(tf.clone(), juju.clone());

    assert_eq!(run(&step).status, ResultStatus::Completed);
    assert_eq!(*tf.calls.borrow(), vec!["apply microk8s-plan"]);
    assert_eq!(tf.applied_vars.borrow()[0]["model"], "controller");

    assert_eq!(run(&step).status, ResultStatus::Skipped);
    assert_eq!(tf.calls.borrow().len(), 1);
}

#[test]
fn microk8s_unit_needs_a_machine() {
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let res = run(&AddMicrok8sUnitStep::new(juju, "node1"));
    assert_eq!(res.failure_message(), "No machine for node1 in model controller");

    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()).with_machine("0", "node1"));
    let step = AddMicrok8sUnitStep::new(juju.clone(), "node1");
    assert_eq!(run(&step).status, ResultStatus::Completed);
    assert_eq!(run(&step).status, ResultStatus::Skipped);
    assert_eq!(*juju.calls.borrow(), vec!["add_unit controller microk8s 0"]);
}

#[test]
fn cloud_payload_reaches_control_plane_in_same_plan() {
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let tf = Rc::new(RecordingTerraform::new("openstack-plan"));
    let plan = Plan::builder().step(TerraformInitStep::new(tf.clone()))
                              .step(AddMicrok8sCloudStep::new(juju.clone(), "sunbeam-controller"))
                              .step(DeployControlPlaneStep::new(tf.clone(), juju.clone()))
                              .build()
                              .unwrap();
    let reg = run_plan(&mut RecordingReporter::new(), &plan).unwrap();

    assert_eq!(reg.payload_of::<AddMicrok8sCloudStep>().unwrap(),
               &StepPayload::Cloud { name: "sunbeam-microk8s".into() });
    assert_eq!(tf.applied_vars.borrow()[0]["cloud"], "sunbeam-microk8s");
    assert_eq!(*juju.calls.borrow(), vec!["add_k8s_cloud sunbeam-microk8s sunbeam-controller", "wait_model_ready openstack"]);
}

#[test]
fn control_plane_apply_failure_aborts() {
    let juju = Rc::new(InMemoryJuju::new("/tmp/juju".into()));
    let tf = Rc::new(RecordingTerraform::new("openstack-plan").failing_on("apply"));
    let res = run(&DeployControlPlaneStep::new(tf, juju.clone()));
    assert_eq!(res.status, ResultStatus::Failed);
    assert!(juju.calls.borrow().is_empty());
}
