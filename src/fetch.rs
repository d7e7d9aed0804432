//! Kubectl binary download and installation

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::exec;
use crate::platform::TargetPair;
use anyhow::{Context, Result};
use std::path::Path;

/// External transfer tool used for the release download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferTool {
    Curl,
    Wget,
}

impl TransferTool {
    /// Probe PATH for a usable transfer tool, preferring curl.
    fn detect() -> Result<Self, BootstrapError> {
        if exec::command_exists("curl") {
            Ok(TransferTool::Curl)
        } else if exec::command_exists("wget") {
            Ok(TransferTool::Wget)
        } else {
            Err(BootstrapError::NoTransferTool)
        }
    }

    fn program(&self) -> &'static str {
        match self {
            TransferTool::Curl => "curl",
            TransferTool::Wget => "wget",
        }
    }

    fn download_args<'a>(&self, url: &'a str, dest: &'a str) -> Vec<&'a str> {
        match self {
            TransferTool::Curl => vec!["-L", "-o", dest, url],
            TransferTool::Wget => vec!["-O", dest, url],
        }
    }
}

/// Download the kubectl build for the detected platform and install it to the
/// configured path.
pub fn install_kubectl(config: &BootstrapConfig, target: &TargetPair) -> Result<()> {
    validate_release(&config.release)?;
    let tool = TransferTool::detect()?;
    let url = download_url(&config.release_base, &config.release, target);

    println!("Downloading kubectl from: {}", url);

    let staging = std::env::temp_dir().join("kubeup-kubectl");
    let staging_str = staging.to_string_lossy().to_string();
    exec::run_interactive(tool.program(), &tool.download_args(&url, &staging_str))?;

    make_executable(&staging)?;
    install_binary(&staging, Path::new(&config.install_path))?;
    println!("✓ kubectl installed at {}", config.install_path);

    // Echo the installed binary's current configuration as a sanity check
    println!();
    exec::run_interactive(&config.install_path, &["config", "view"])?;

    Ok(())
}

/// Download URL for a release and target pair.
fn download_url(base: &str, release: &str, target: &TargetPair) -> String {
    format!(
        "{}/{}/bin/{}/{}/kubectl",
        base, release, target.platform, target.arch
    )
}

/// Reject release strings that would escape the release path on the
/// download host.
fn validate_release(release: &str) -> Result<()> {
    if release.is_empty() || release.contains('/') || release.contains("..") {
        anyhow::bail!("Invalid release identifier: {:?}", release);
    }
    Ok(())
}

fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

/// Move the staged binary into place, falling back to copy-and-remove when
/// the temp directory is on another filesystem.
fn install_binary(staging: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if std::fs::rename(staging, dest).is_err() {
        std::fs::copy(staging, dest).with_context(|| {
            format!(
                "Failed to install {} to {}",
                staging.display(),
                dest.display()
            )
        })?;
        std::fs::remove_file(staging).ok();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_shape() {
        let target = TargetPair {
            platform: "linux",
            arch: "amd64",
        };
        let url = download_url(
            "https://storage.googleapis.com/kubernetes-release/release",
            "v1.3.0",
            &target,
        );
        assert_eq!(
            url,
            "https://storage.googleapis.com/kubernetes-release/release/v1.3.0/bin/linux/amd64/kubectl"
        );
    }

    #[test]
    fn test_download_url_for_darwin_386() {
        let target = TargetPair {
            platform: "darwin",
            arch: "386",
        };
        let url = download_url("https://example.com/release", "v1.2.4", &target);
        assert!(url.ends_with("/v1.2.4/bin/darwin/386/kubectl"));
    }

    #[test]
    fn test_release_validation() {
        assert!(validate_release("v1.3.0").is_ok());
        assert!(validate_release("v1.3.0-beta.2").is_ok());
        assert!(validate_release("").is_err());
        assert!(validate_release("v1.3.0/../../evil").is_err());
        assert!(validate_release("..").is_err());
    }

    #[test]
    fn test_transfer_tool_args() {
        assert_eq!(
            TransferTool::Curl.download_args("https://u", "/tmp/k"),
            vec!["-L", "-o", "/tmp/k", "https://u"]
        );
        assert_eq!(
            TransferTool::Wget.download_args("https://u", "/tmp/k"),
            vec!["-O", "/tmp/k", "https://u"]
        );
    }

    #[test]
    fn test_transfer_tool_programs() {
        assert_eq!(TransferTool::Curl.program(), "curl");
        assert_eq!(TransferTool::Wget.program(), "wget");
    }
}
