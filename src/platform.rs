//! Host platform detection

use crate::error::BootstrapError;
use crate::exec;
use anyhow::Result;

/// Supported (platform, architecture) pair for a kubectl release build.
/// Derived once at the start of a run and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPair {
    pub platform: &'static str,
    pub arch: &'static str,
}

/// Detect the running OS and CPU architecture from uname.
pub fn detect() -> Result<TargetPair> {
    let os = exec::run_captured("uname", &["-s"])?;
    let machine = exec::run_captured("uname", &["-m"])?;

    let platform = map_platform(&os)?;
    let arch = map_architecture(&machine)?;

    Ok(TargetPair { platform, arch })
}

fn map_platform(os: &str) -> Result<&'static str, BootstrapError> {
    match os {
        "Linux" => Ok("linux"),
        "Darwin" => Ok("darwin"),
        other => Err(BootstrapError::UnsupportedPlatform(other.to_string())),
    }
}

fn map_architecture(machine: &str) -> Result<&'static str, BootstrapError> {
    match machine {
        "x86_64" | "amd64" => Ok("amd64"),
        "i386" | "i486" | "i586" | "i686" | "x86" => Ok("386"),
        other => Err(BootstrapError::UnsupportedArchitecture(other.to_string())),
    }
}
