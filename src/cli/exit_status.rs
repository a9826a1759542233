use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): everything was read and written
/// - `Failure` (1): the command ran, but some files could not be processed
///   or pruning was refused
/// - `Error` (2): the command could not run (config error, missing root, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
