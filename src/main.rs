use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::debug;
use sunbeam::bootstrap::{bootstrap, default_checks, BootstrapContext};
use sunbeam::config::{resolve_fqdn, AppConfig};
use sunbeam::console::ConsoleReporter;
use sunbeam::templates::install_plan_templates;
use sunbeam::{logging, BootstrapError};
use sunbeam_core::Role;
use sunbeam_steps::collaborators::{JujuCli, LocalClusterService, TerraformHelper};

#[derive(Parser, Debug)]
#[command(name = "sunbeam", version, about = "Bootstrap de nodos Sunbeam")]
struct Cli {
    /// Sólo errores en el log.
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Log de depuración.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gestión del cluster.
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },
}

#[derive(Subcommand, Debug)]
enum ClusterAction {
    /// Bootstrap del nodo local.
    Bootstrap {
        /// Rol del nodo.
        #[arg(long, default_value = "converged", ignore_case = true,
              value_parser = ["control", "compute", "converged"])]
        role: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Cluster { action: ClusterAction::Bootstrap { role }, } => run_bootstrap(&role),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_bootstrap(role: &str) -> Result<(), BootstrapError> {
    let role: Role = role.parse()?;
    let config = AppConfig::from_env()?;
    let fqdn = resolve_fqdn()?;
    debug!("Loaded configuration: {config:?}");

    install_plan_templates(&config.snap_dir, &config.snap_common)?;

    let tf = |plan: &str, dir: &str| {
        let helper =
            TerraformHelper::new(config.plan_dir(dir), plan, config.tf_parallelism, config.tf_backend, config.data_dir.clone());
        match &config.tf_http_address {
            Some(address) => helper.with_http_address(address.clone()),
            None => helper,
        }
    };
    let ctx = BootstrapContext { role,
                                 fqdn: fqdn.clone(),
                                 cloud_name: config.cloud_name.clone(),
                                 cloud_type: config.cloud_type.clone(),
                                 controller: config.controller.clone(),
                                 data_location: config.data_dir.clone(),
                                 cluster: Rc::new(LocalClusterService::new(&config.data_dir)),
                                 juju: Rc::new(JujuCli::new(config.juju_data_dir.clone()).with_cloud_endpoint(fqdn.clone())),
                                 microk8s_tf: Rc::new(tf("microk8s-plan", "deploy-microk8s")),
                                 openstack_tf: Rc::new(tf("openstack-plan", "deploy-openstack")),
                                 checks: default_checks(role) };

    let mut reporter = ConsoleReporter::new();
    bootstrap(ctx, &mut reporter)?;
    println!("Node has been bootstrapped as a {role} node");
    Ok(())
}
