//! `fuzzrig launch-dev-env` — provision a fuzzing box and clone a repository.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{HostAliasStore, ProgressReporter};
use crate::application::services::{config_service, dev_env, remote};
use crate::domain::{RepoUrl, RetryPolicy};
use crate::infra::clock::SystemClock;
use crate::infra::ssh::{KnownHostsManager, SshConfigManager, ensure_identity_key};
use crate::infra::ssh_session::OpenSshConnector;
use crate::infra::vultr::VultrClient;

/// Arguments for the launch-dev-env command.
#[derive(Args)]
pub struct LaunchArgs {
    /// Git URL of the repository to clone onto the instance
    pub repo: String,
}

/// Run the launch-dev-env command.
///
/// # Errors
///
/// Returns the first failure: invalid URL, missing token, any API error,
/// address or SSH timeout, or a failed bootstrap.
pub fn run(app: &AppContext, args: &LaunchArgs) -> Result<()> {
    let repo = RepoUrl::parse(&args.repo)?;
    let (_config, token) = config_service::load_with_token(&app.config_store)?;
    let key = ensure_identity_key()?;
    let label = repo.label();

    let api = VultrClient::new(&token);
    let clock = SystemClock::new();
    let reporter = app.output.reporter();

    let instance = dev_env::provision(&api, &clock, &reporter, &label, &key.public_key, |existing| {
        reporter.clear();
        app.confirm(
            &format!("Delete instance {} to make room for {label}?", existing.label),
            false,
        )
    })?;

    let identity = key.private_path.display().to_string();
    SshConfigManager::new()?.register(&label, &instance.address, &identity)?;
    reporter.success(&format!("Added host {label} to ~/.ssh/config"));

    let known_hosts = KnownHostsManager::new()?;
    known_hosts.ensure()?;
    known_hosts.forget(&instance.address)?;

    let connector = OpenSshConnector::new(key.private_path.clone(), known_hosts.path().to_path_buf());
    reporter.step("Waiting for SSH...");
    remote::with_session(
        &connector,
        &clock,
        RetryPolicy::CONNECTION_WAIT,
        &instance.address,
        |session| {
            reporter.success(&format!("Connected to {}", instance.address));
            app.output
                .info("Installing toolchain and cloning repository...");
            let mut out: Box<dyn Write> = if app.output.quiet {
                Box::new(std::io::sink())
            } else {
                Box::new(std::io::stdout())
            };
            remote::run_bootstrap(session, &repo.url, &mut out)
        },
    )?;

    app.output.success(&format!("Dev environment {label} is ready"));
    app.output.info("Connect with:");
    app.output.block(&format!("ssh {label}"));
    Ok(())
}
