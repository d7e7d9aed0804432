mod certs;
mod config;
mod error;
mod exec;
mod fetch;
mod kubeconfig;
mod platform;
mod verify;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::BootstrapConfig;
use error::BootstrapError;

#[derive(Parser)]
#[command(name = "kubeup")]
#[command(version)]
#[command(about = "Kubectl Bootstrap - install and configure kubectl for a remote cluster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full bootstrap pipeline (install, certs, configure, verify)
    Setup {
        /// Kubernetes release to install (e.g. v1.3.0)
        #[arg(long)]
        release: Option<String>,
        /// Master address as host[:port]
        #[arg(long, short = 'm')]
        master: Option<String>,
        /// Remote user for the certificate copy
        #[arg(long, short = 'u')]
        remote_user: Option<String>,
    },
    /// Download and install the kubectl binary for this machine
    Install {
        /// Kubernetes release to install (e.g. v1.3.0)
        #[arg(long)]
        release: Option<String>,
    },
    /// Copy TLS certificates from the cluster master
    Certs {
        /// Master address as host[:port]
        #[arg(long, short = 'm')]
        master: Option<String>,
        /// Remote user for the certificate copy
        #[arg(long, short = 'u')]
        remote_user: Option<String>,
    },
    /// Register cluster, credentials and context in the kubectl config
    Configure {
        /// Master address as host[:port]
        #[arg(long, short = 'm')]
        master: Option<String>,
    },
    /// List cluster nodes through the active context
    Verify,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("✗ {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = BootstrapConfig::load()?;

    match cli.command {
        Commands::Setup {
            release,
            master,
            remote_user,
        } => {
            config.apply_overrides(release, master, remote_user);
            setup(&config)?;
        }
        Commands::Install { release } => {
            config.apply_overrides(release, None, None);
            let target = platform::detect()?;
            fetch::install_kubectl(&config, &target)?;
        }
        Commands::Certs {
            master,
            remote_user,
        } => {
            config.apply_overrides(None, master, remote_user);
            certs::retrieve_certs(&config)?;
        }
        Commands::Configure { master } => {
            config.apply_overrides(None, master, None);
            kubeconfig::write_config(&config)?;
        }
        Commands::Verify => {
            verify::check_connectivity(&config)?;
        }
    }

    Ok(())
}

/// Full pipeline: platform detection, binary install, certificate retrieval,
/// config registration, connectivity check. Fail-fast, strictly in order.
fn setup(config: &BootstrapConfig) -> Result<()> {
    println!(
        "Bootstrapping kubectl for {} (running as {})",
        config.master,
        whoami::username()
    );
    println!();

    let target = platform::detect()?;
    println!("✓ Detected platform {}/{}", target.platform, target.arch);

    fetch::install_kubectl(config, &target)?;
    certs::retrieve_certs(config)?;
    kubeconfig::write_config(config)?;
    verify::check_connectivity(config)?;

    println!();
    println!("✓ Bootstrap complete");
    Ok(())
}

/// Map a pipeline error to its process exit code. Stage errors carry their
/// documented codes; anything else exits 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BootstrapError>())
        .map(BootstrapError::exit_code)
        .unwrap_or(1)
}
