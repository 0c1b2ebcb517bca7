//! Application service — remote command execution on a provisioned instance.

use std::convert::Infallible;
use std::io::Write;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::ports::{RemoteConnector, RemoteSession};
use crate::domain::{Attempt, Clock, RemoteError, RetryError, RetryPolicy};

/// Connect to `host`, retrying every failed attempt until `policy` runs out.
///
/// # Errors
///
/// Returns [`RemoteError::ConnectionTimeout`] carrying the elapsed time once
/// `policy.timeout` has passed without a successful connection.
pub fn connect_with_retry<C: RemoteConnector>(
    connector: &C,
    clock: &impl Clock,
    policy: RetryPolicy,
    host: &str,
) -> Result<C::Session, RemoteError> {
    policy
        .run(clock, |attempt| match connector.connect(host) {
            Ok(session) => Attempt::<_, Infallible>::Done(session),
            Err(e) => {
                debug!(attempt, host, error = %format!("{e:#}"), "ssh not reachable yet");
                Attempt::Retry
            }
        })
        .map_err(|e| match e {
            RetryError::Exhausted { elapsed, .. } => RemoteError::ConnectionTimeout { elapsed },
            RetryError::Aborted(never) => match never {},
        })
}

/// Connect, run `f` with the session, and release the session afterwards.
///
/// The session is closed whether or not `f` succeeds; an error from `f`
/// takes precedence over an error from closing.
///
/// # Errors
///
/// Returns a connection timeout, the error from `f`, or the close error.
pub fn with_session<C: RemoteConnector, T>(
    connector: &C,
    clock: &impl Clock,
    policy: RetryPolicy,
    host: &str,
    f: impl FnOnce(&mut C::Session) -> Result<T>,
) -> Result<T> {
    let mut session = connect_with_retry(connector, clock, policy, host)?;
    let result = f(&mut session);
    let closed = session.close();
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), close_result) => {
            if let Err(close_err) = close_result {
                warn!(error = %format!("{close_err:#}"), "failed to close ssh session");
            }
            Err(e)
        }
    }
}

/// Run `command` and fail unless it exits with status 0.
///
/// # Errors
///
/// Returns [`RemoteError::CommandFailed`] for a non-zero exit status, or the
/// session's own error.
pub fn run_checked(
    session: &mut impl RemoteSession,
    command: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let status = session.run(command, out)?;
    if status != 0 {
        return Err(RemoteError::CommandFailed { status }.into());
    }
    Ok(())
}

/// Prepare a fresh instance for fuzzing and clone `repo_url` onto it.
///
/// # Errors
///
/// Returns [`RemoteError::CommandFailed`] if the script exits non-zero.
pub fn run_bootstrap(
    session: &mut impl RemoteSession,
    repo_url: &str,
    out: &mut dyn Write,
) -> Result<()> {
    run_checked(session, &bootstrap_script(repo_url), out)
}

/// Shell script that turns a fresh Debian instance into a fuzzing box and
/// clones `repo_url` into root's home directory.
#[must_use]
pub fn bootstrap_script(repo_url: &str) -> String {
    let repo = shell_quote(repo_url);
    format!(
        "set -e\n\
         apt-get update -y\n\
         DEBIAN_FRONTEND=noninteractive apt-get -o Dpkg::Options::=--force-confold -o Dpkg::Options::=--force-confdef -y --allow-downgrades --allow-remove-essential --allow-change-held-packages dist-upgrade\n\
         apt-get install -y cmake build-essential git curl\n\
         curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y\n\
         . \"$HOME/.cargo/env\"\n\
         rustup install nightly\n\
         rustup default nightly\n\
         cargo install cargo-fuzz\n\
         git clone {repo}\n"
    )
}

/// Single-quote `s` for a POSIX shell.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
