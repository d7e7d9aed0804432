//! Runtime configuration
//!
//! Values resolve in order: CLI flag, environment variable, built-in default.
//! A `.env` file in the working directory is honored before reading the
//! environment (see `.env.example`).

use anyhow::Result;
use std::env;

const DEFAULT_RELEASE: &str = "v1.3.0";
const DEFAULT_RELEASE_BASE: &str = "https://storage.googleapis.com/kubernetes-release/release";
const DEFAULT_MASTER: &str = "kubernetes-master:443";
const DEFAULT_REMOTE_USER: &str = "root";
const DEFAULT_REMOTE_CERT_DIR: &str = "/srv/kubernetes";
const DEFAULT_INSTALL_PATH: &str = "/usr/local/bin/kubectl";
const DEFAULT_CLUSTER: &str = "kubernetes";
const DEFAULT_CREDENTIAL: &str = "admin";
const DEFAULT_CONTEXT: &str = "admin@kubernetes";

/// Operator-facing knobs for a bootstrap run, passed into the pipeline entry
/// point. Each value is set once during loading and only read afterwards.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Kubernetes release whose kubectl build gets installed (e.g. "v1.3.0")
    pub release: String,
    /// Base URL of the release artifact host
    pub release_base: String,
    /// API server address as host[:port]
    pub master: String,
    /// Remote user for the certificate copy
    pub remote_user: String,
    /// Certificate directory on the master
    pub remote_cert_dir: String,
    /// Local directory the certificates are copied into
    pub cert_dir: String,
    /// Where the kubectl binary gets installed
    pub install_path: String,
    /// The kubectl configuration file mutated by the config writer
    pub kube_config_path: String,
    pub ca_cert: String,
    pub client_cert: String,
    pub client_key: String,
    /// Names registered in the kubectl configuration
    pub cluster: String,
    pub credential: String,
    pub context: String,
}

impl BootstrapConfig {
    /// Load configuration from the environment, after a best-effort .env load.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let kube_dir = format!("{}/.kube", home);
        let cert_dir = env_or("KUBEUP_CERT_DIR", &format!("{}/certs", kube_dir));

        Ok(Self {
            release: env_or("KUBEUP_RELEASE", DEFAULT_RELEASE),
            release_base: env_or("KUBEUP_RELEASE_BASE", DEFAULT_RELEASE_BASE),
            master: env_or("KUBEUP_MASTER", DEFAULT_MASTER),
            remote_user: env_or("KUBEUP_REMOTE_USER", DEFAULT_REMOTE_USER),
            remote_cert_dir: env_or("KUBEUP_REMOTE_CERT_DIR", DEFAULT_REMOTE_CERT_DIR),
            install_path: env_or("KUBEUP_INSTALL_PATH", DEFAULT_INSTALL_PATH),
            kube_config_path: format!("{}/config", kube_dir),
            ca_cert: format!("{}/ca.crt", cert_dir),
            client_cert: format!("{}/kubecfg.crt", cert_dir),
            client_key: format!("{}/kubecfg.key", cert_dir),
            cluster: env_or("KUBEUP_CLUSTER", DEFAULT_CLUSTER),
            credential: env_or("KUBEUP_USER", DEFAULT_CREDENTIAL),
            context: env_or("KUBEUP_CONTEXT", DEFAULT_CONTEXT),
            cert_dir,
        })
    }

    /// Apply CLI overrides on top of environment values and defaults.
    pub fn apply_overrides(
        &mut self,
        release: Option<String>,
        master: Option<String>,
        remote_user: Option<String>,
    ) {
        if let Some(release) = release {
            self.release = release;
        }
        if let Some(master) = master {
            self.master = master;
        }
        if let Some(remote_user) = remote_user {
            self.remote_user = remote_user;
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
