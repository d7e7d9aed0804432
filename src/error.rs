use thiserror::Error;

/// Failure classes for the bootstrap stages. Each variant maps to a distinct
/// process exit code so scripted callers can tell the causes apart.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("No download tool found. Install curl or wget and try again.")]
    NoTransferTool,

    #[error("No secure copy tool found. Install scp and try again.")]
    NoCopyTool,

    #[error("{program} exited with code {code}")]
    CommandFailed { program: String, code: i32 },
}

impl BootstrapError {
    /// Process exit code for this failure class. Exit codes of invoked
    /// external programs are propagated verbatim.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::UnsupportedPlatform(_) => 1,
            BootstrapError::UnsupportedArchitecture(_) => 2,
            BootstrapError::NoTransferTool => 3,
            BootstrapError::NoCopyTool => 4,
            BootstrapError::CommandFailed { code, .. } => *code,
        }
    }
}
