//! Application service — provisioning a throwaway dev environment.
//!
//! The account is expected to hold at most one environment instance. This is
//! a convention of this tool, not something the provider enforces, and two
//! concurrent runs against the same account are not guarded against.
//!
//! Every API failure is fatal: each step needs the previous step's output
//! (instance id, key id, address), so there is no partial continuation.

use anyhow::Result;
use tracing::{debug, info};

use crate::application::ports::{CloudApi, InstanceSpec, ProgressReporter, RemoteInstance};
use crate::domain::ssh::ssh_key_name;
use crate::domain::{Attempt, Clock, CloudError, ProvisionError, RetryError, RetryPolicy};

/// Region every environment is created in.
pub const REGION: &str = "lax";
/// 4 vCPU / 8 GB.
pub const PLAN: &str = "vc2-4c-8gb";
/// Debian 11 x64.
pub const OS_ID: u32 = 477;

/// An instance that has been created and has a usable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedInstance {
    pub id: String,
    pub label: String,
    pub address: String,
}

/// If any instance exists, ask `confirm` whether to delete the first one.
///
/// # Errors
///
/// Returns [`ProvisionError::Declined`] if the user keeps the instance, or a
/// [`CloudError`] from the list/delete calls.
pub fn check_existing(
    api: &impl CloudApi,
    reporter: &impl ProgressReporter,
    confirm: impl FnOnce(&RemoteInstance) -> Result<bool>,
) -> Result<()> {
    let instances = api.list_instances()?;
    let Some(existing) = instances.first() else {
        debug!("no existing instances");
        return Ok(());
    };

    reporter.warn(&format!(
        "You already have a dev environment running ({}, {})",
        existing.label, existing.main_ip
    ));
    if !confirm(existing)? {
        return Err(ProvisionError::Declined {
            label: existing.label.clone(),
        }
        .into());
    }

    reporter.step(&format!("Deleting instance {}...", existing.label));
    api.delete_instance(&existing.id)?;
    reporter.success(&format!("Deleted instance {}", existing.label));
    Ok(())
}

/// Return the id of the uploaded copy of `pubkey`, uploading it if needed.
///
/// A record named after the key's hash is reused. Otherwise every key on the
/// account is treated as stale, deleted, and the local key is uploaded.
///
/// # Errors
///
/// Returns a [`CloudError`] from any of the key calls.
pub fn ensure_ssh_key(
    api: &impl CloudApi,
    reporter: &impl ProgressReporter,
    pubkey: &str,
) -> Result<String, CloudError> {
    let expected = ssh_key_name(pubkey);
    let keys = api.list_ssh_keys()?;

    if let Some(key) = keys.iter().find(|k| k.name == expected) {
        reporter.success(&format!("Authenticating with Vultr key {}", key.name));
        return Ok(key.id.clone());
    }

    if !keys.is_empty() {
        reporter.warn("Vultr key invalid, deleting all uploaded keys...");
        for key in &keys {
            debug!(id = %key.id, name = %key.name, "deleting stale ssh key");
            api.delete_ssh_key(&key.id)?;
        }
    }

    reporter.step("Uploading SSH key to Vultr...");
    let created = api.create_ssh_key(&expected, pubkey.trim())?;
    reporter.success(&format!("Uploaded key {expected}"));
    Ok(created.id)
}

/// Create the environment instance and return its id.
///
/// # Errors
///
/// Returns a [`CloudError`] if the create call fails.
pub fn create_instance(
    api: &impl CloudApi,
    reporter: &impl ProgressReporter,
    label: &str,
    ssh_key_id: &str,
) -> Result<String, CloudError> {
    reporter.step("Creating new Debian instance...");
    let spec = InstanceSpec {
        region: REGION,
        plan: PLAN,
        os_id: OS_ID,
        label,
        ssh_key_ids: vec![ssh_key_id.to_string()],
        backups: false,
    };
    let instance = api.create_instance(&spec)?;
    info!(id = %instance.id, label, "instance created");
    Ok(instance.id)
}

/// Poll the instance until it reports a non-placeholder address.
///
/// # Errors
///
/// Returns [`CloudError::AddressTimeout`] once `policy.timeout` has elapsed,
/// or the first API error encountered while polling.
pub fn await_address(
    api: &impl CloudApi,
    clock: &impl Clock,
    policy: RetryPolicy,
    instance_id: &str,
) -> Result<String, CloudError> {
    policy
        .run(clock, |attempt| match api.get_instance(instance_id) {
            Ok(instance) => match instance.assigned_address() {
                Some(address) => Attempt::Done(address.to_string()),
                None => {
                    debug!(attempt, status = %instance.status, "instance has no address yet");
                    Attempt::Retry
                }
            },
            Err(e) => Attempt::Abort(e),
        })
        .map_err(|e| match e {
            RetryError::Exhausted { elapsed, .. } => CloudError::AddressTimeout { elapsed },
            RetryError::Aborted(e) => e,
        })
}

/// Run the whole provisioning sequence for an environment labelled `label`.
///
/// # Errors
///
/// Returns the first failure of any step; later steps are not attempted.
pub fn provision(
    api: &impl CloudApi,
    clock: &impl Clock,
    reporter: &impl ProgressReporter,
    label: &str,
    pubkey: &str,
    confirm: impl FnOnce(&RemoteInstance) -> Result<bool>,
) -> Result<ProvisionedInstance> {
    check_existing(api, reporter, confirm)?;
    let key_id = ensure_ssh_key(api, reporter, pubkey)?;
    let id = create_instance(api, reporter, label, &key_id)?;

    reporter.step("Waiting for the instance to get an address...");
    let address = await_address(api, clock, RetryPolicy::ADDRESS_WAIT, &id)?;
    reporter.success(&format!("Instance {label} is at {address}"));

    Ok(ProvisionedInstance {
        id,
        label: label.to_string(),
        address,
    })
}
