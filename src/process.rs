// Thu Oct 15 2026 - Alex

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),
    #[error("Tool {tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },
    #[error("Tool {tool} exited with status {status}")]
    Failed { tool: String, status: i32, output: String },
    #[error("IO error running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ToolError::NotFound(_))
    }
}

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs an external program with a hard wall-clock limit. The child is
/// killed once the limit passes.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    program: String,
    timeout: Duration,
}

impl ToolRunner {
    pub fn new(program: &str, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn run(&self, args: &[&str]) -> Result<ToolOutput, ToolError> {
        log::debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        log::warn!("{} timed out after {:?}", self.program, self.timeout);
                        return Err(ToolError::TimedOut {
                            tool: self.program.clone(),
                            secs: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(ToolError::Io { tool: self.program.clone(), source: e });
                }
            }
        };

        let output = ToolOutput {
            status: status.code().unwrap_or(-1),
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
        };

        if !status.success() {
            return Err(ToolError::Failed {
                tool: self.program.clone(),
                status: output.status,
                output: output.combined(),
            });
        }

        Ok(output)
    }

    fn spawn_error(&self, e: io::Error) -> ToolError {
        if e.kind() == io::ErrorKind::NotFound {
            ToolError::NotFound(self.program.clone())
        } else {
            ToolError::Io { tool: self.program.clone(), source: e }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
