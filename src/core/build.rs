//! Project build invocation

use crate::error::{PrunerError, Result};
use crate::models::config::Settings;
use crate::models::validation::BuildValidation;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output readers may lag behind a killed build
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// A build command run in the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Option<Duration>,
}

impl BuildCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.to_path_buf(),
            timeout: None,
        }
    }

    /// The configured build, or `None` when building is disabled
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let (program, args) = settings.build_command.as_ref()?.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd: settings.project_root.clone(),
            timeout: settings.build_timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Display form used in logs and error messages
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the build to completion or until the timeout expires
    ///
    /// Only a failure to start the process is an error; a non-zero exit or a
    /// timeout is reported in the returned `BuildValidation`.
    pub fn run(&self) -> Result<BuildValidation> {
        tracing::info!(command = %self.display(), cwd = %self.cwd.display(), "running build");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so a timeout can take down npm's children too
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|source| PrunerError::BuildSpawn {
                command: self.display(),
                source,
            })?;

        let stdout = capture(child.stdout.take());
        let stderr = capture(child.stderr.take());

        let (status, timed_out) = self.wait(&mut child)?;

        let drain_deadline = timed_out.then(|| Instant::now() + DRAIN_GRACE);
        let mut output = join_capture(stdout, drain_deadline);
        output.push_str(&join_capture(stderr, drain_deadline));

        let exit_code = status.and_then(|s| s.code());
        let can_build = !timed_out && status.is_some_and(|s| s.success());
        let error = if timed_out {
            Some(format!(
                "Build timed out after {}s",
                self.timeout.map(|t| t.as_secs()).unwrap_or_default()
            ))
        } else if !can_build {
            Some(match exit_code {
                Some(code) => format!("Build failed with exit code {}", code),
                None => "Build terminated by signal".to_string(),
            })
        } else {
            None
        };

        if can_build {
            tracing::info!("build succeeded");
        } else {
            tracing::warn!(exit_code = ?exit_code, timed_out, "build failed");
        }

        Ok(BuildValidation {
            can_build,
            output,
            exit_code,
            error,
            timed_out,
        })
    }

    fn wait(&self, child: &mut Child) -> Result<(Option<ExitStatus>, bool)> {
        let Some(timeout) = self.timeout else {
            return Ok((Some(child.wait()?), false));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok((Some(status), false));
            }
            if Instant::now() >= deadline {
                kill_tree(child);
                let status = child.wait().ok();
                return Ok((status, true));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn capture<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<String>> {
    stream.map(|mut stream| {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = stream.read_to_end(&mut bytes);
            String::from_utf8_lossy(&bytes).into_owned()
        })
    })
}

/// Collect a reader's output; past `deadline` a still-blocked reader is
/// abandoned along with whatever it has buffered
fn join_capture(handle: Option<JoinHandle<String>>, deadline: Option<Instant>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    if let Some(deadline) = deadline {
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                tracing::warn!("build output still open after kill, not waiting for it");
                return String::new();
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
    handle.join().unwrap_or_default()
}

/// Kill the build and every process in its group
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // The child leads its own group, see `run`
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
            tracing::debug!(pid, "sent SIGKILL to build process group");
        }
    }
    if let Err(err) = child.kill() {
        tracing::debug!("kill after group signal: {}", err);
    }
}
