//! Shared fakes for unit tests.
//!
//! Each fake records the calls it receives so tests can assert on order and
//! arguments without touching the network, the filesystem, or real time.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use fuzzrig_cli::application::ports::{
    CloudApi, InstanceSpec, ProgressReporter, ProjectFs, RemoteConnector, RemoteInstance,
    RemoteSession, SshKeyRecord,
};
use fuzzrig_cli::domain::{Clock, CloudError};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Clock that only advances when slept on.
pub struct FakeClock {
    now: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Duration::from_secs(10_000)),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Total simulated time slept.
    pub fn slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.borrow().len()
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Reporter that keeps every message, prefixed by its kind.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}

// ── Cloud API ─────────────────────────────────────────────────────────────────

pub fn instance(id: &str, label: &str, main_ip: &str) -> RemoteInstance {
    RemoteInstance {
        id: id.to_string(),
        label: label.to_string(),
        status: if main_ip == "0.0.0.0" { "pending" } else { "active" }.to_string(),
        main_ip: main_ip.to_string(),
    }
}

pub fn key(id: &str, name: &str) -> SshKeyRecord {
    SshKeyRecord {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// In-memory cloud account.
///
/// `get_instance` pops addresses from `addresses`; once only one remains it
/// is returned forever.
#[derive(Default)]
pub struct FakeCloud {
    pub instances: RefCell<Vec<RemoteInstance>>,
    pub keys: RefCell<Vec<SshKeyRecord>>,
    pub addresses: RefCell<VecDeque<String>>,
    pub created: RefCell<Vec<(String, String, u32, String, Vec<String>, bool)>>,
    pub calls: RefCell<Vec<String>>,
    /// Calls whose name is listed here fail with HTTP 500.
    pub failing: RefCell<Vec<&'static str>>,
    next_id: Cell<u32>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addresses(addresses: &[&str]) -> Self {
        let cloud = Self::new();
        cloud
            .addresses
            .borrow_mut()
            .extend(addresses.iter().map(|a| (*a).to_string()));
        cloud
    }

    pub fn fail_on(&self, call: &'static str) {
        self.failing.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str, arg: &str) -> Result<(), CloudError> {
        self.calls.borrow_mut().push(if arg.is_empty() {
            call.to_string()
        } else {
            format!("{call}({arg})")
        });
        if self.failing.borrow().contains(&call) {
            return Err(CloudError::Api {
                status: 500,
                body: format!("{{\"error\":\"{call} failed\"}}"),
            });
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("{prefix}-{n}")
    }
}

impl CloudApi for FakeCloud {
    fn list_instances(&self) -> Result<Vec<RemoteInstance>, CloudError> {
        self.record("list_instances", "")?;
        Ok(self.instances.borrow().clone())
    }

    fn get_instance(&self, id: &str) -> Result<RemoteInstance, CloudError> {
        self.record("get_instance", id)?;
        let mut addresses = self.addresses.borrow_mut();
        let ip = if addresses.len() > 1 {
            addresses.pop_front().unwrap_or_default()
        } else {
            addresses.front().cloned().unwrap_or_else(|| "0.0.0.0".to_string())
        };
        Ok(instance(id, "env", &ip))
    }

    fn create_instance(&self, spec: &InstanceSpec<'_>) -> Result<RemoteInstance, CloudError> {
        self.record("create_instance", spec.label)?;
        self.created.borrow_mut().push((
            spec.region.to_string(),
            spec.plan.to_string(),
            spec.os_id,
            spec.label.to_string(),
            spec.ssh_key_ids.clone(),
            spec.backups,
        ));
        let created = instance(&self.fresh_id("inst"), spec.label, "0.0.0.0");
        self.instances.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_instance(&self, id: &str) -> Result<(), CloudError> {
        self.record("delete_instance", id)?;
        self.instances.borrow_mut().retain(|i| i.id != id);
        Ok(())
    }

    fn list_ssh_keys(&self) -> Result<Vec<SshKeyRecord>, CloudError> {
        self.record("list_ssh_keys", "")?;
        Ok(self.keys.borrow().clone())
    }

    fn create_ssh_key(&self, name: &str, _public_key: &str) -> Result<SshKeyRecord, CloudError> {
        self.record("create_ssh_key", name)?;
        let created = key(&self.fresh_id("key"), name);
        self.keys.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_ssh_key(&self, id: &str) -> Result<(), CloudError> {
        self.record("delete_ssh_key", id)?;
        self.keys.borrow_mut().retain(|k| k.id != id);
        Ok(())
    }
}

// ── Remote shell ──────────────────────────────────────────────────────────────

/// Shared counters observed by tests after sessions are gone.
#[derive(Default)]
pub struct SessionLog {
    pub connects: Cell<u32>,
    pub closes: Cell<u32>,
    pub commands: RefCell<Vec<String>>,
}

/// Connector that fails a fixed number of times before succeeding.
pub struct FakeConnector {
    failures_left: Cell<u32>,
    /// Output chunks and exit status every session's `run` produces.
    pub output: Vec<&'static str>,
    pub status: i32,
    pub log: Rc<SessionLog>,
}

impl FakeConnector {
    pub fn new(failures: u32) -> Self {
        Self {
            failures_left: Cell::new(failures),
            output: vec!["hello\n", "world\n"],
            status: 0,
            log: Rc::new(SessionLog::default()),
        }
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }
}

impl RemoteConnector for FakeConnector {
    type Session = FakeSession;

    fn connect(&self, host: &str) -> Result<FakeSession> {
        self.log.connects.set(self.log.connects.get() + 1);
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            anyhow::bail!("ssh: connect to host {host} port 22: Connection refused");
        }
        Ok(FakeSession {
            output: self.output.clone(),
            status: self.status,
            log: Rc::clone(&self.log),
        })
    }
}

pub struct FakeSession {
    output: Vec<&'static str>,
    status: i32,
    log: Rc<SessionLog>,
}

impl RemoteSession for FakeSession {
    fn run(&mut self, command: &str, out: &mut dyn Write) -> Result<i32> {
        self.log.commands.borrow_mut().push(command.to_string());
        for chunk in &self.output {
            out.write_all(chunk.as_bytes())?;
        }
        Ok(self.status)
    }

    fn close(self) -> Result<()> {
        self.log.closes.set(self.log.closes.get() + 1);
        Ok(())
    }
}

// ── Filesystem ────────────────────────────────────────────────────────────────

/// In-memory `ProjectFs`.
#[derive(Default)]
pub struct MemoryFs {
    pub files: RefCell<BTreeMap<PathBuf, String>>,
    pub dirs: RefCell<Vec<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn seed(&self, path: &Path, contents: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
    }
}

impl ProjectFs for MemoryFs {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.seed(path, contents);
        Ok(())
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read(path)
            .ok_or_else(|| anyhow::anyhow!("No such file: {}", path.display()))
    }
}
