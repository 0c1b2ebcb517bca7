//! OpenSSH-backed remote sessions.
//!
//! `connect` starts a multiplexing master (`ssh -M`) on a private control
//! socket; every `run` reuses that authenticated connection and `close` tells
//! the master to exit.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::application::ports::{RemoteConnector, RemoteSession};
use crate::domain::ssh::REMOTE_USER;

const CONNECT_TIMEOUT_SECS: u32 = 10;
const CHUNK: usize = 1024;

/// The `ssh` client invocation: a program plus arguments placed before the
/// per-call ones.
#[derive(Debug, Clone)]
pub struct SshProgram {
    program: OsString,
    leading_args: Vec<OsString>,
}

impl SshProgram {
    #[must_use]
    pub fn new(program: impl Into<OsString>, leading_args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd
    }
}

impl Default for SshProgram {
    fn default() -> Self {
        Self::new("ssh", Vec::new())
    }
}

/// Opens sessions as `root` with a fixed identity and known-hosts file.
pub struct OpenSshConnector {
    ssh: SshProgram,
    identity_file: PathBuf,
    known_hosts: PathBuf,
}

impl OpenSshConnector {
    #[must_use]
    pub fn new(identity_file: PathBuf, known_hosts: PathBuf) -> Self {
        Self::with_program(SshProgram::default(), identity_file, known_hosts)
    }

    /// Connector that invokes `ssh` instead of the client found on `PATH`.
    #[must_use]
    pub fn with_program(ssh: SshProgram, identity_file: PathBuf, known_hosts: PathBuf) -> Self {
        Self {
            ssh,
            identity_file,
            known_hosts,
        }
    }
}

impl RemoteConnector for OpenSshConnector {
    type Session = OpenSshSession;

    fn connect(&self, host: &str) -> Result<OpenSshSession> {
        let dir = tempfile::Builder::new()
            .prefix("fuzzrig-ssh")
            .tempdir()
            .context("creating control socket directory")?;
        let socket = dir.path().join("ctl");
        let log_path = dir.path().join("connect.log");
        let destination = format!("{REMOTE_USER}@{host}");
        // The backgrounded master inherits stdio, so it must not hold a pipe
        // this process waits on.
        let log = std::fs::File::create(&log_path)
            .with_context(|| format!("creating {}", log_path.display()))?;

        // New host keys are accepted and recorded; a changed key is refused.
        let status = self
            .ssh
            .command()
            .arg("-M")
            .arg("-S")
            .arg(&socket)
            .arg("-i")
            .arg(&self.identity_file)
            .args(["-o", "ControlPersist=yes"])
            .args(["-o", "BatchMode=yes"])
            .args(["-o", "StrictHostKeyChecking=accept-new"])
            .arg("-o")
            .arg(format!("UserKnownHostsFile={}", self.known_hosts.display()))
            .arg("-o")
            .arg(format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"))
            .args(["-o", "LogLevel=ERROR"])
            .args(["-f", "-N"])
            .arg(&destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .status()
            .context("failed to spawn ssh")?;

        if !status.success() {
            let detail = std::fs::read_to_string(&log_path).unwrap_or_default();
            anyhow::bail!("ssh to {destination} failed: {}", detail.trim());
        }
        debug!(%destination, socket = %socket.display(), "ssh master started");
        Ok(OpenSshSession {
            _dir: dir,
            ssh: self.ssh.clone(),
            socket,
            destination,
            closed: false,
        })
    }
}

/// A live multiplexed connection. Dropping it without `close` still stops
/// the master.
pub struct OpenSshSession {
    _dir: tempfile::TempDir,
    ssh: SshProgram,
    socket: PathBuf,
    destination: String,
    closed: bool,
}

impl OpenSshSession {
    fn client(&self) -> Command {
        let mut cmd = self.ssh.command();
        cmd.arg("-S")
            .arg(&self.socket)
            .args(["-o", "BatchMode=yes", "-o", "LogLevel=ERROR"]);
        cmd
    }

    /// Asks the master to exit. Runs at most once per session.
    fn stop_master(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let output = self
            .ssh
            .command()
            .arg("-S")
            .arg(&self.socket)
            .args(["-O", "exit"])
            .arg(&self.destination)
            .stdin(Stdio::null())
            .output()
            .context("failed to spawn ssh")?;
        anyhow::ensure!(
            output.status.success(),
            "closing ssh connection to {} failed: {}",
            self.destination,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(())
    }
}

impl RemoteSession for OpenSshSession {
    fn run(&mut self, command: &str, out: &mut dyn Write) -> Result<i32> {
        debug!(destination = %self.destination, "running remote command");
        // Remote stderr is merged by the shell; the client's own stderr
        // shares the same pipe so its errors land in `out` too.
        let (mut reader, writer) = std::io::pipe().context("creating output pipe")?;
        let writer_err = writer.try_clone().context("creating output pipe")?;
        let mut child = self
            .client()
            .arg(&self.destination)
            .arg(format!("exec 2>&1\n{command}"))
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err)
            .spawn()
            .context("failed to spawn ssh")?;

        let mut buf = [0u8; CHUNK];
        loop {
            let n = reader.read(&mut buf).context("reading remote output")?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n]).context("forwarding remote output")?;
            out.flush().context("forwarding remote output")?;
        }

        let status = child.wait().context("waiting for ssh")?;
        Ok(status.code().unwrap_or(-1))
    }

    fn close(mut self) -> Result<()> {
        self.stop_master()
    }
}

impl Drop for OpenSshSession {
    fn drop(&mut self) {
        if let Err(e) = self.stop_master() {
            warn!(error = %format!("{e:#}"), "failed to close ssh session");
        }
    }
}
