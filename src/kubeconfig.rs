//! Kubectl configuration management
//!
//! Registers the cluster, credentials and context in the local kubectl
//! configuration and activates the context. The existing config file is
//! copied aside with a date suffix first so an operator can roll back by
//! hand.

use crate::config::BootstrapConfig;
use crate::exec;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Register cluster endpoint, credentials and context, then activate the
/// context. The four mutations run in order and any failure aborts the
/// remaining ones.
pub fn write_config(config: &BootstrapConfig) -> Result<()> {
    backup_existing_config(Path::new(&config.kube_config_path));

    for args in config_mutations(config) {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        exec::run_interactive(&config.install_path, &args)?;
    }

    println!("✓ Context '{}' is now active", config.context);
    Ok(())
}

/// The four kubectl config invocations, in registration order.
fn config_mutations(config: &BootstrapConfig) -> Vec<Vec<String>> {
    vec![
        vec![
            "config".to_string(),
            "set-cluster".to_string(),
            config.cluster.clone(),
            format!("--server=https://{}", config.master),
            format!("--certificate-authority={}", config.ca_cert),
            "--embed-certs=true".to_string(),
        ],
        vec![
            "config".to_string(),
            "set-credentials".to_string(),
            config.credential.clone(),
            format!("--client-certificate={}", config.client_cert),
            format!("--client-key={}", config.client_key),
            "--embed-certs=true".to_string(),
        ],
        vec![
            "config".to_string(),
            "set-context".to_string(),
            config.context.clone(),
            format!("--cluster={}", config.cluster),
            format!("--user={}", config.credential),
        ],
        vec![
            "config".to_string(),
            "use-context".to_string(),
            config.context.clone(),
        ],
    ]
}

/// Copy an existing config file aside before mutating it. Best-effort manual
/// rollback point; a same-day backup is overwritten and a failed backup does
/// not abort the run.
fn backup_existing_config(config_path: &Path) {
    let today = chrono::Local::now().date_naive();
    match backup_config_on(config_path, today) {
        Ok(Some(backup)) => println!("Existing config backed up to {}", backup.display()),
        Ok(None) => {}
        Err(err) => println!("⚠ Could not back up existing config: {:#}", err),
    }
}

fn backup_config_on(config_path: &Path, date: NaiveDate) -> Result<Option<PathBuf>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let backup = backup_path(config_path, date);
    std::fs::copy(config_path, &backup).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            config_path.display(),
            backup.display()
        )
    })?;
    Ok(Some(backup))
}

/// Backup file name for a config file on a given date: `<path>.<YYYYMMDD>`.
fn backup_path(config_path: &Path, date: NaiveDate) -> PathBuf {
    let mut os = config_path.as_os_str().to_owned();
    os.push(format!(".{}", date.format("%Y%m%d")));
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;

    fn test_config() -> BootstrapConfig {
        BootstrapConfig {
            release: "v1.3.0".to_string(),
            release_base: "https://example.com/release".to_string(),
            master: "master.example.com:443".to_string(),
            remote_user: "root".to_string(),
            remote_cert_dir: "/srv/kubernetes".to_string(),
            cert_dir: "/home/op/.kube/certs".to_string(),
            install_path: "/usr/local/bin/kubectl".to_string(),
            kube_config_path: "/home/op/.kube/config".to_string(),
            ca_cert: "/home/op/.kube/certs/ca.crt".to_string(),
            client_cert: "/home/op/.kube/certs/kubecfg.crt".to_string(),
            client_key: "/home/op/.kube/certs/kubecfg.key".to_string(),
            cluster: "kubernetes".to_string(),
            credential: "admin".to_string(),
            context: "admin@kubernetes".to_string(),
        }
    }

    #[test]
    fn test_mutations_run_in_registration_order() {
        let mutations = config_mutations(&test_config());
        let subcommands: Vec<&str> = mutations.iter().map(|m| m[1].as_str()).collect();
        assert_eq!(
            subcommands,
            vec!["set-cluster", "set-credentials", "set-context", "use-context"]
        );
    }

    #[test]
    fn test_cluster_mutation_embeds_certificate_authority() {
        let mutations = config_mutations(&test_config());
        let cluster = &mutations[0];
        assert!(cluster.contains(&"--server=https://master.example.com:443".to_string()));
        assert!(
            cluster.contains(&"--certificate-authority=/home/op/.kube/certs/ca.crt".to_string())
        );
        assert!(cluster.contains(&"--embed-certs=true".to_string()));
    }

    #[test]
    fn test_credential_mutation_carries_client_material() {
        let mutations = config_mutations(&test_config());
        let credentials = &mutations[1];
        assert!(
            credentials
                .contains(&"--client-certificate=/home/op/.kube/certs/kubecfg.crt".to_string())
        );
        assert!(credentials.contains(&"--client-key=/home/op/.kube/certs/kubecfg.key".to_string()));
    }

    #[test]
    fn test_context_binds_cluster_to_credential() {
        let mutations = config_mutations(&test_config());
        let context = &mutations[2];
        assert_eq!(context[2], "admin@kubernetes");
        assert!(context.contains(&"--cluster=kubernetes".to_string()));
        assert!(context.contains(&"--user=admin".to_string()));
    }

    #[test]
    fn test_backup_path_uses_eight_digit_date() {
        let date = NaiveDate::from_ymd_opt(2016, 3, 5).unwrap();
        let backup = backup_path(Path::new("/home/op/.kube/config"), date);
        assert_eq!(backup, PathBuf::from("/home/op/.kube/config.20160305"));
    }

    #[test]
    fn test_missing_config_needs_no_backup() {
        let missing = Path::new("/nonexistent/kubeup-test/config");
        let date = NaiveDate::from_ymd_opt(2016, 3, 5).unwrap();
        assert!(backup_config_on(missing, date).unwrap().is_none());
    }

    #[test]
    fn test_same_day_backup_is_overwritten_without_error() {
        let dir = std::env::temp_dir().join(format!("kubeup-backup-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config");
        let date = NaiveDate::from_ymd_opt(2016, 3, 5).unwrap();

        std::fs::write(&config_path, "first").unwrap();
        let backup = backup_config_on(&config_path, date).unwrap().unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "first");

        std::fs::write(&config_path, "second").unwrap();
        let backup_again = backup_config_on(&config_path, date).unwrap().unwrap();
        assert_eq!(backup_again, backup);
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "second");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
