//! Azure Resource Manager client for `moveResources`.
//!
//! The move is a long-running operation: the POST answers `202 Accepted` with a
//! `Location` header that is polled until it stops answering `202`.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{LOCATION, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use tfshift_core::ident::resource_group_id;

pub const MOVE_API_VERSION: &str = "2021-04-01";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Request body of `moveResources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub resources: Vec<String>,
    pub target_resource_group: String,
}

impl MoveInfo {
    pub fn new(resources: Vec<String>, target_subscription: &str, target_resource_group: &str) -> Self {
        Self {
            resources,
            target_resource_group: resource_group_id(target_subscription, target_resource_group),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl ArmClient {
    pub fn new(endpoint: &str, token: String) -> Result<Self> {
        let endpoint = Url::parse(endpoint).with_context(|| format!("invalid ARM endpoint: {endpoint}"))?;
        if endpoint.cannot_be_a_base() {
            bail!("invalid ARM endpoint: {endpoint}");
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("tfshift/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, endpoint, token })
    }

    /// `{endpoint}/subscriptions/{sub}/resourceGroups/{rg}/moveResources?api-version=...`
    pub fn move_url(&self, subscription: &str, resource_group: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("invalid ARM endpoint: {}", self.endpoint))?
            .pop_if_empty()
            .extend(["subscriptions", subscription, "resourceGroups", resource_group, "moveResources"]);
        url.query_pairs_mut().append_pair("api-version", MOVE_API_VERSION);
        Ok(url)
    }

    /// Move `info.resources` out of `source_resource_group` and wait until
    /// Azure reports completion or `timeout` elapses.
    pub async fn move_resources(
        &self,
        subscription: &str,
        source_resource_group: &str,
        info: &MoveInfo,
        timeout: Duration,
    ) -> Result<()> {
        let url = self.move_url(subscription, source_resource_group)?;
        info!(%url, count = info.resources.len(), "requesting resource move");

        let work = async {
            let resp = self
                .http
                .post(url)
                .bearer_auth(&self.token)
                .json(info)
                .send()
                .await
                .context("cannot move resources")?;
            self.wait(resp).await
        };

        tokio::time::timeout(timeout, work)
            .await
            .map_err(|_| anyhow!("move did not finish within {}s", timeout.as_secs()))?
    }

    async fn wait(&self, mut resp: Response) -> Result<()> {
        loop {
            match resp.status() {
                StatusCode::OK | StatusCode::NO_CONTENT => {
                    info!("resource move completed");
                    return Ok(());
                }
                StatusCode::ACCEPTED => {}
                status => {
                    let body = resp.text().await.unwrap_or_default();
                    bail!("cannot get the move response: {status}: {body}");
                }
            }

            let location = header_str(&resp, LOCATION)
                .ok_or_else(|| anyhow!("move accepted without a Location header to poll"))?;
            let location = Url::parse(location).with_context(|| format!("invalid Location header: {location}"))?;
            let delay = header_str(&resp, RETRY_AFTER)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_POLL_INTERVAL);

            debug!(%location, delay_secs = delay.as_secs(), "move in progress");
            tokio::time::sleep(delay).await;

            resp = self
                .http
                .get(location)
                .bearer_auth(&self.token)
                .send()
                .await
                .context("cannot poll the move operation")?;
        }
    }
}

fn header_str(resp: &Response, name: reqwest::header::HeaderName) -> Option<&str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}
