//! Cluster connectivity check

use crate::config::BootstrapConfig;
use crate::exec;
use anyhow::Result;

/// List cluster nodes through the freshly activated context. The output is
/// purely diagnostic and goes straight to the operator.
pub fn check_connectivity(config: &BootstrapConfig) -> Result<()> {
    println!("Checking cluster connectivity...");
    exec::run_interactive(&config.install_path, &["get", "nodes"])
}
