//! External renderer subprocess.
//!
//! The renderer is spawned with the engine address, the local address and a
//! private spool directory:
//!
//! ```text
//! deepnote-engine --address <engine_addr> --local <local_addr> --spool <dir>
//! ```
//!
//! Handoff happens through the spool. The renderer creates `ready` once it is
//! listening. Each graph is written atomically as `<NAME>.deepnote.json` and
//! the renderer acknowledges it by creating `<NAME>.ack`. The process exits
//! when playback ends, which is what [`Engine::wait`] blocks on.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use deepnote_spec::{EngineSettings, GraphDef};
use tracing::{debug, info, warn};

use crate::engine::{Ack, Engine};
use crate::error::{EngineError, EngineResult};
use crate::persist::{graph_file_name, write_atomic};

/// Environment variable naming the renderer executable.
pub const ENGINE_PATH_ENV: &str = "DEEPNOTE_ENGINE_PATH";

/// Renderer executable looked up in `PATH`.
pub const ENGINE_BINARY: &str = "deepnote-engine";

/// Marker the renderer creates in the spool once it is ready.
pub const READY_MARKER: &str = "ready";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bytes of renderer stderr kept for error reports.
const STDERR_TAIL_BYTES: usize = 16 * 1024;

/// Acknowledgement file name for a graph: `<NAME>.ack`.
pub fn ack_file_name(name: &str) -> String {
    format!("{}.ack", name)
}

/// Configuration for [`ProcessEngine`].
#[derive(Debug, Clone)]
pub struct ProcessEngineConfig {
    /// Renderer executable; when set it must exist.
    pub executable: Option<PathBuf>,
    /// Address the renderer listens on.
    pub engine_addr: String,
    /// Address the renderer replies to.
    pub local_addr: String,
    /// Bound on startup and on each acknowledgement.
    pub start_timeout: Duration,
    /// Bound on playback; unbounded when `None`.
    pub wait_timeout: Option<Duration>,
}

impl Default for ProcessEngineConfig {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for ProcessEngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            executable: settings.executable.as_ref().map(PathBuf::from),
            engine_addr: settings.engine_addr.clone(),
            local_addr: settings.local_addr.clone(),
            start_timeout: Duration::from_secs(settings.start_timeout_secs),
            wait_timeout: settings.wait_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl ProcessEngineConfig {
    /// Sets the renderer executable.
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Sets the startup and acknowledgement timeout.
    pub fn start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// Sets the playback timeout.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }
}

struct Running {
    child: Child,
    stderr: StderrTail,
    spool: tempfile::TempDir,
}

/// Drains the renderer's stderr on a background thread so a chatty renderer
/// never blocks on a full pipe. Only the last [`STDERR_TAIL_BYTES`] are kept.
struct StderrTail {
    reader: Option<JoinHandle<String>>,
}

impl StderrTail {
    fn spawn(pipe: Option<ChildStderr>) -> Self {
        let reader = pipe.map(|mut pipe| {
            std::thread::spawn(move || {
                let mut tail = Vec::new();
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            tail.extend_from_slice(&chunk[..n]);
                            if tail.len() > STDERR_TAIL_BYTES {
                                let excess = tail.len() - STDERR_TAIL_BYTES;
                                tail.drain(..excess);
                            }
                        }
                    }
                }
                String::from_utf8_lossy(&tail).trim_end().to_string()
            })
        });
        Self { reader }
    }

    /// Joins the reader. Call only once the process has exited.
    fn collect(&mut self) -> String {
        self.reader
            .take()
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default()
    }

    /// Lets the reader finish on its own. A killed renderer's children may
    /// still hold the pipe open.
    fn detach(&mut self) {
        self.reader.take();
    }
}

/// Drives a renderer subprocess.
///
/// The process is killed when the engine is stopped or dropped.
pub struct ProcessEngine {
    config: ProcessEngineConfig,
    running: Option<Running>,
}

impl ProcessEngine {
    /// Creates a stopped engine.
    pub fn new(config: ProcessEngineConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Finds the renderer executable.
    pub fn find_executable(&self) -> EngineResult<PathBuf> {
        if let Some(ref path) = self.config.executable {
            return if path.exists() {
                Ok(path.clone())
            } else {
                Err(EngineError::EngineNotFound)
            };
        }

        if let Ok(path) = std::env::var(ENGINE_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        which::which(ENGINE_BINARY).map_err(|_| EngineError::EngineNotFound)
    }

    /// Spool directory of the running renderer.
    pub fn spool_dir(&self) -> Option<&Path> {
        self.running.as_ref().map(|r| r.spool.path())
    }
}

impl Engine for ProcessEngine {
    fn start(&mut self) -> EngineResult<()> {
        if self.running.is_some() {
            return Ok(());
        }

        let executable = self.find_executable()?;
        let spool = tempfile::Builder::new().prefix("deepnote_spool_").tempdir()?;

        let mut cmd = Command::new(&executable);
        cmd.arg("--address")
            .arg(&self.config.engine_addr)
            .arg("--local")
            .arg(&self.config.local_addr)
            .arg("--spool")
            .arg(spool.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(EngineError::SpawnFailed)?;
        let mut stderr = StderrTail::spawn(child.stderr.take());
        info!(
            executable = %executable.display(),
            pid = child.id(),
            address = %self.config.engine_addr,
            "spawned renderer"
        );

        let ready = spool.path().join(READY_MARKER);
        let started = wait_for_file(
            &mut child,
            &mut stderr,
            &ready,
            self.config.start_timeout,
            "starting renderer",
        );
        if let Err(err) = started {
            let _ = child.kill();
            let _ = child.wait();
            stderr.detach();
            return Err(err);
        }

        self.running = Some(Running {
            child,
            stderr,
            spool,
        });
        Ok(())
    }

    fn send(&mut self, graph: &GraphDef) -> EngineResult<Ack> {
        let timeout = self.config.start_timeout;
        let running = self.running.as_mut().ok_or(EngineError::NotStarted)?;

        let json = graph.to_json_pretty()?;
        let graph_path = running.spool.path().join(graph_file_name(&graph.name));
        write_atomic(&graph_path, json.as_bytes())?;
        debug!(path = %graph_path.display(), "handed graph to renderer");

        let ack = running.spool.path().join(ack_file_name(&graph.name));
        wait_for_file(
            &mut running.child,
            &mut running.stderr,
            &ack,
            timeout,
            "waiting for acknowledgement",
        )?;

        info!(graph = %graph.name, nodes = graph.nodes.len(), "renderer acknowledged graph");
        Ok(Ack::for_graph(graph))
    }

    fn wait(&mut self) -> EngineResult<()> {
        let mut running = self.running.take().ok_or(EngineError::NotStarted)?;

        let status = match wait_with_timeout(&mut running.child, self.config.wait_timeout) {
            Ok(status) => status,
            Err(err) => {
                let _ = running.child.kill();
                let _ = running.child.wait();
                running.stderr.detach();
                return Err(err);
            }
        };

        let stderr = running.stderr.collect();
        if !status.success() {
            return Err(EngineError::process_failed(status.code().unwrap_or(-1), stderr));
        }
        if !stderr.is_empty() {
            debug!(stderr = %stderr, "renderer stderr");
        }

        info!("renderer finished");
        Ok(())
    }

    fn stop(&mut self) -> EngineResult<()> {
        if let Some(mut running) = self.running.take() {
            if running.child.try_wait()?.is_none() {
                warn!(pid = running.child.id(), "stopping renderer");
                running.child.kill()?;
                running.child.wait()?;
                running.stderr.detach();
            } else {
                running.child.wait()?;
                running.stderr.collect();
            }
        }
        Ok(())
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Polls until `path` exists, failing if the process exits first or the
/// timeout elapses.
fn wait_for_file(
    child: &mut Child,
    stderr: &mut StderrTail,
    path: &Path,
    timeout: Duration,
    phase: &'static str,
) -> EngineResult<()> {
    let start = Instant::now();

    loop {
        if path.exists() {
            return Ok(());
        }
        if let Some(status) = child.try_wait()? {
            // The file may have landed between the two checks.
            if path.exists() {
                return Ok(());
            }
            let stderr = stderr.collect();
            if status.success() {
                return Err(EngineError::ExitedEarly { phase, stderr });
            }
            let stderr = if stderr.is_empty() {
                format!("exited while {}", phase)
            } else {
                stderr
            };
            return Err(EngineError::process_failed(status.code().unwrap_or(-1), stderr));
        }
        if start.elapsed() > timeout {
            return Err(EngineError::Timeout {
                phase,
                timeout_secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> EngineResult<ExitStatus> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if let Some(timeout) = timeout {
                    if start.elapsed() > timeout {
                        return Err(EngineError::Timeout {
                            phase: "waiting for playback to finish",
                            timeout_secs: timeout.as_secs(),
                        });
                    }
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(EngineError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_settings() {
        let settings = EngineSettings {
            executable: Some("/opt/renderer".to_string()),
            wait_timeout_secs: Some(40),
            ..Default::default()
        };
        let config = ProcessEngineConfig::from(&settings);
        assert_eq!(config.executable, Some(PathBuf::from("/opt/renderer")));
        assert_eq!(config.engine_addr, "127.0.0.1:57120");
        assert_eq!(config.start_timeout, Duration::from_secs(5));
        assert_eq!(config.wait_timeout, Some(Duration::from_secs(40)));
    }

    #[test]
    fn test_missing_configured_executable() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProcessEngineConfig::default().executable(dir.path().join("absent"));
        let mut engine = ProcessEngine::new(config);
        assert!(matches!(engine.start(), Err(EngineError::EngineNotFound)));
        assert!(engine.spool_dir().is_none());
    }

    #[test]
    fn test_send_and_wait_require_start() {
        let mut engine = ProcessEngine::new(ProcessEngineConfig::default());
        let graph = deepnote_spec::graph::GraphBuilder::new("X").finish();
        assert!(matches!(engine.send(&graph), Err(EngineError::NotStarted)));
        assert!(matches!(engine.wait(), Err(EngineError::NotStarted)));
        assert!(engine.stop().is_ok());
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("renderer.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        const SPOOL_ARG: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    --spool) spool="$2"; shift ;;
  esac
  shift
done"#;

        #[test]
        fn test_full_lifecycle() {
            let dir = tempfile::tempdir().unwrap();
            let body = format!(
                "{}\ntouch \"$spool/ready\"\nwhile [ ! -f \"$spool/TEST.deepnote.json\" ]; do sleep 0.05; done\ntouch \"$spool/TEST.ack\"",
                SPOOL_ARG
            );
            let config = ProcessEngineConfig::default().executable(script(dir.path(), &body));
            let mut engine = ProcessEngine::new(config);

            engine.start().unwrap();
            let spool = engine.spool_dir().unwrap().to_path_buf();
            assert!(spool.join(READY_MARKER).exists());

            let graph = deepnote_spec::graph::GraphBuilder::new("TEST").finish();
            let ack = engine.send(&graph).unwrap();
            assert_eq!(ack.graph, "TEST");
            assert!(spool.join("TEST.deepnote.json").exists());

            engine.wait().unwrap();
            assert!(engine.spool_dir().is_none());
            assert!(!spool.exists());
        }

        #[test]
        fn test_early_exit_reports_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'no audio device' >&2\nexit 3");
            let mut engine = ProcessEngine::new(ProcessEngineConfig::default().executable(exe));

            let err = engine.start().unwrap_err();
            let EngineError::ProcessFailed { exit_code, stderr } = err else {
                panic!("expected ProcessFailed, got {}", err);
            };
            assert_eq!(exit_code, 3);
            assert_eq!(stderr, "no audio device");
        }

        #[test]
        fn test_start_timeout_kills_renderer() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "sleep 10");
            let config = ProcessEngineConfig::default()
                .executable(exe)
                .start_timeout(Duration::from_millis(200));
            let mut engine = ProcessEngine::new(config);

            let started = Instant::now();
            let err = engine.start().unwrap_err();
            assert!(matches!(
                err,
                EngineError::Timeout {
                    phase: "starting renderer",
                    ..
                }
            ));
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[test]
        fn test_failed_playback() {
            let dir = tempfile::tempdir().unwrap();
            let body = format!("{}\ntouch \"$spool/ready\"\nsleep 0.2\nexit 2", SPOOL_ARG);
            let config = ProcessEngineConfig::default().executable(script(dir.path(), &body));
            let mut engine = ProcessEngine::new(config);

            engine.start().unwrap();
            let err = engine.wait().unwrap_err();
            assert!(matches!(err, EngineError::ProcessFailed { exit_code: 2, .. }));
        }

        #[test]
        fn test_noisy_renderer_does_not_stall_playback() {
            let dir = tempfile::tempdir().unwrap();
            let body = format!(
                "{}\ntouch \"$spool/ready\"\nhead -c 262144 /dev/zero | tr '\\0' x >&2\nexit 0",
                SPOOL_ARG
            );
            let config = ProcessEngineConfig::default()
                .executable(script(dir.path(), &body))
                .wait_timeout(Duration::from_secs(5));
            let mut engine = ProcessEngine::new(config);

            engine.start().unwrap();
            engine.wait().unwrap();
        }

        #[test]
        fn test_noisy_failure_keeps_stderr_tail() {
            let dir = tempfile::tempdir().unwrap();
            let body = format!(
                "{}\ntouch \"$spool/ready\"\nhead -c 262144 /dev/zero | tr '\\0' x >&2\necho 'render thread died' >&2\nexit 4",
                SPOOL_ARG
            );
            let config = ProcessEngineConfig::default()
                .executable(script(dir.path(), &body))
                .wait_timeout(Duration::from_secs(5));
            let mut engine = ProcessEngine::new(config);

            engine.start().unwrap();
            let err = engine.wait().unwrap_err();
            let EngineError::ProcessFailed { exit_code, stderr } = err else {
                panic!("expected ProcessFailed, got {}", err);
            };
            assert_eq!(exit_code, 4);
            assert!(stderr.len() <= STDERR_TAIL_BYTES);
            assert!(stderr.ends_with("render thread died"));
        }

        #[test]
        fn test_clean_exit_before_ready() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "exit 0");
            let mut engine = ProcessEngine::new(ProcessEngineConfig::default().executable(exe));

            let err = engine.start().unwrap_err();
            assert!(matches!(
                err,
                EngineError::ExitedEarly {
                    phase: "starting renderer",
                    ..
                }
            ));
            assert_eq!(
                err.to_string(),
                "renderer exited prematurely while starting renderer"
            );
        }
    }
}
