use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::SubprocessError;

/// Gateway for subprocess invocations made from inside templates.
///
/// Rendering code calls [`run`](Self::run) instead of spawning processes
/// directly, so that the same template can be executed safely (mocked) or for
/// real, selected explicitly by the owning session.
pub trait SubprocessManager: Send + Sync {
    /// Runs a command and returns its output.
    fn run(&self, command: &str) -> Result<String, SubprocessError>;

    /// Whether this manager mocks execution instead of performing it.
    fn is_mock(&self) -> bool;
}

/// Records-only manager that never executes anything.
///
/// Every command succeeds with an empty output. This is the safe default
/// while editing templates interactively.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessManagerMock;

impl SubprocessManager for SubprocessManagerMock {
    fn run(&self, _command: &str) -> Result<String, SubprocessError> {
        Ok(String::new())
    }

    fn is_mock(&self) -> bool {
        true
    }
}

/// Manager that executes commands through the platform shell.
///
/// Commands run via `sh -c` (or `cmd /C` on Windows) with stdin closed and
/// stderr discarded; stdout is captured and returned. A non-zero exit status
/// is an error.
///
/// No timeout is applied by default: a long-running command blocks the render
/// for as long as it takes. Use [`with_timeout`](Self::with_timeout) to bound
/// execution time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellSubprocessManager {
    timeout: Option<Duration>,
}

impl ShellSubprocessManager {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Creates a manager that kills commands exceeding `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl SubprocessManager for ShellSubprocessManager {
    fn run(&self, command: &str) -> Result<String, SubprocessError> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn()?;

        match self.timeout {
            Some(duration) => match child.wait_timeout(duration)? {
                Some(status) => {
                    if !status.success() {
                        return Err(SubprocessError::CommandFailed(command.to_string(), status));
                    }
                }
                None => {
                    child.kill()?;
                    return Err(SubprocessError::Timeout(command.to_string(), duration));
                }
            },
            None => {
                let status = child.wait()?;
                if !status.success() {
                    return Err(SubprocessError::CommandFailed(command.to_string(), status));
                }
            }
        }

        let mut bytes = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut bytes)?;
        }

        Ok(String::from_utf8(bytes)?)
    }

    fn is_mock(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_empty_output() {
        let manager = SubprocessManagerMock;
        assert_eq!(manager.run("echo hello").unwrap(), "");
        assert!(manager.is_mock());
    }

    #[test]
    fn test_shell_echo() {
        let manager = ShellSubprocessManager::new();
        let output = manager.run("echo hello").unwrap();
        assert!(output.trim().contains("hello"));
        assert!(!manager.is_mock());
    }

    #[test]
    fn test_shell_failing_command() {
        let manager = ShellSubprocessManager::new();
        let err = manager.run("exit 3").unwrap_err();
        assert!(matches!(err, SubprocessError::CommandFailed(_, _)));
    }

    #[test]
    fn test_shell_timeout() {
        let cmd = if cfg!(windows) {
            "ping -n 3 127.0.0.1"
        } else {
            "sleep 2"
        };
        let manager = ShellSubprocessManager::with_timeout(Duration::from_millis(250));
        let err = manager.run(cmd).unwrap_err();
        assert!(matches!(err, SubprocessError::Timeout(_, _)));
    }
}
