//! Certificate retrieval from the cluster master

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::exec;
use anyhow::{Context, Result};
use std::path::Path;

/// Copy the certificate directory from the master into the local certificate
/// directory over scp, replacing any existing contents. Transferred files are
/// trusted as-is; transport security is the only integrity guarantee.
pub fn retrieve_certs(config: &BootstrapConfig) -> Result<()> {
    if !exec::command_exists("scp") {
        return Err(BootstrapError::NoCopyTool.into());
    }

    let host = master_hostname(&config.master);
    let source = format!(
        "{}@{}:{}",
        config.remote_user, host, config.remote_cert_dir
    );

    let cert_dir = Path::new(&config.cert_dir);
    if cert_dir.exists() {
        std::fs::remove_dir_all(cert_dir)
            .with_context(|| format!("Failed to clear {}", cert_dir.display()))?;
    }
    if let Some(parent) = cert_dir.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    println!("Copying certificates from {}...", source);
    exec::run_interactive("scp", &["-r", &source, &config.cert_dir])?;

    println!("✓ Certificates copied to {}", config.cert_dir);
    Ok(())
}

/// Hostname portion of a `host[:port]` master address.
fn master_hostname(master: &str) -> &str {
    master.split(':').next().unwrap_or(master)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_from_host_and_port() {
        assert_eq!(master_hostname("master.example.com:443"), "master.example.com");
        assert_eq!(master_hostname("10.0.0.1:6443"), "10.0.0.1");
    }

    #[test]
    fn test_bare_hostname_is_unchanged() {
        assert_eq!(master_hostname("master.example.com"), "master.example.com");
    }

    #[test]
    fn test_hostname_with_trailing_colon() {
        assert_eq!(master_hostname("master:"), "master");
    }

    #[test]
    fn test_hostname_stops_at_first_colon() {
        assert_eq!(master_hostname("master:443:extra"), "master");
    }
}
