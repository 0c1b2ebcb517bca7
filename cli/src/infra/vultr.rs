//! Vultr v2 REST client implementing the `CloudApi` port.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{CloudApi, InstanceSpec, RemoteInstance, SshKeyRecord};
use crate::domain::CloudError;

/// Production API endpoint.
pub const VULTR_API_URL: &str = "https://api.vultr.com/v2";

/// Overrides [`VULTR_API_URL`], e.g. to point at a local stub.
pub const API_URL_ENV: &str = "FUZZRIG_VULTR_API_URL";

const PAGE_SIZE: u32 = 500;

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireInstance {
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    main_ip: String,
}

impl From<WireInstance> for RemoteInstance {
    fn from(w: WireInstance) -> Self {
        Self {
            id: w.id,
            label: w.label,
            status: w.status,
            main_ip: w.main_ip,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstanceList {
    #[serde(default)]
    instances: Vec<WireInstance>,
}

#[derive(Debug, Deserialize)]
struct InstanceEnvelope {
    instance: WireInstance,
}

#[derive(Debug, Deserialize)]
struct WireSshKey {
    id: String,
    #[serde(default)]
    name: String,
}

impl From<WireSshKey> for SshKeyRecord {
    fn from(w: WireSshKey) -> Self {
        Self {
            id: w.id,
            name: w.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SshKeyList {
    #[serde(default)]
    ssh_keys: Vec<WireSshKey>,
}

#[derive(Debug, Deserialize)]
struct SshKeyEnvelope {
    ssh_key: WireSshKey,
}

#[derive(Debug, Serialize)]
struct CreateInstanceBody<'a> {
    region: &'a str,
    plan: &'a str,
    os_id: u32,
    label: &'a str,
    sshkey_id: &'a [String],
    backups: &'static str,
}

impl<'a> From<&'a InstanceSpec<'a>> for CreateInstanceBody<'a> {
    fn from(spec: &'a InstanceSpec<'a>) -> Self {
        Self {
            region: spec.region,
            plan: spec.plan,
            os_id: spec.os_id,
            label: spec.label,
            sshkey_id: &spec.ssh_key_ids,
            backups: if spec.backups { "enabled" } else { "disabled" },
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateSshKeyBody<'a> {
    name: &'a str,
    ssh_key: &'a str,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CloudError> {
    serde_json::from_str(body).map_err(|e| CloudError::Decode(e.to_string()))
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Blocking Vultr client authenticated with a personal access token.
pub struct VultrClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl VultrClient {
    /// Client for the production API, or `$FUZZRIG_VULTR_API_URL` if set.
    #[must_use]
    pub fn new(token: &str) -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| VULTR_API_URL.to_string());
        Self::with_base_url(token, &base_url)
    }

    /// Client for an explicit endpoint.
    #[must_use]
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("fuzzrig/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Send one request and return the response body.
    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<String, CloudError> {
        let url = format!("{}{path}", self.base_url);
        debug!(method, %url, "vultr request");
        let req = self
            .agent
            .request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.token));

        let result = match body {
            Some(json) => req.set("Content-Type", "application/json").send_string(&json),
            None => req.call(),
        };

        match result {
            Ok(resp) => {
                debug!(method, %url, status = resp.status(), "vultr response");
                resp.into_string()
                    .map_err(|e| CloudError::Transport(format!("reading response: {e}")))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                debug!(method, %url, status, "vultr request rejected");
                Err(CloudError::Api { status, body })
            }
            Err(e) => Err(CloudError::Transport(e.to_string())),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CloudError> {
        decode(&self.send("GET", path, None)?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, CloudError> {
        let json = serde_json::to_string(body).map_err(|e| CloudError::Decode(e.to_string()))?;
        decode(&self.send("POST", path, Some(json))?)
    }

    fn delete(&self, path: &str) -> Result<(), CloudError> {
        self.send("DELETE", path, None).map(|_| ())
    }
}

impl CloudApi for VultrClient {
    fn list_instances(&self) -> Result<Vec<RemoteInstance>, CloudError> {
        let list: InstanceList = self.get(&format!("/instances?per_page={PAGE_SIZE}"))?;
        Ok(list.instances.into_iter().map(Into::into).collect())
    }

    fn get_instance(&self, id: &str) -> Result<RemoteInstance, CloudError> {
        let env: InstanceEnvelope = self.get(&format!("/instances/{id}"))?;
        Ok(env.instance.into())
    }

    fn create_instance(&self, spec: &InstanceSpec<'_>) -> Result<RemoteInstance, CloudError> {
        let env: InstanceEnvelope = self.post("/instances", &CreateInstanceBody::from(spec))?;
        Ok(env.instance.into())
    }

    fn delete_instance(&self, id: &str) -> Result<(), CloudError> {
        self.delete(&format!("/instances/{id}"))
    }

    fn list_ssh_keys(&self) -> Result<Vec<SshKeyRecord>, CloudError> {
        let list: SshKeyList = self.get(&format!("/ssh-keys?per_page={PAGE_SIZE}"))?;
        Ok(list.ssh_keys.into_iter().map(Into::into).collect())
    }

    fn create_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKeyRecord, CloudError> {
        let body = CreateSshKeyBody {
            name,
            ssh_key: public_key,
        };
        let env: SshKeyEnvelope = self.post("/ssh-keys", &body)?;
        Ok(env.ssh_key.into())
    }

    fn delete_ssh_key(&self, id: &str) -> Result<(), CloudError> {
        self.delete(&format!("/ssh-keys/{id}"))
    }
}
