use crate::config::RemoteConfig;
use crate::domain::model::CallSite;
use crate::domain::ports::RemoteGateway;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallEnvelope<'a> {
    site: &'a str,
    requested_at: String,
}

/// 透過 HTTP 呼叫真正的後端；2xx 視為成功
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| AppError::Config {
            message: "remote.endpoint is not set".to_string(),
        })?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, endpoint })
    }

    fn url_for(&self, site: CallSite) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), site.as_str())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn call(&self, site: CallSite) -> Result<()> {
        let url = self.url_for(site);
        tracing::debug!("Making {} request to: {}", site, url);

        let envelope = CallEnvelope {
            site: site.as_str(),
            requested_at: Utc::now().to_rfc3339(),
        };
        let response = self.client.post(&url).json(&envelope).send().await?;

        tracing::debug!("{} response status: {}", site, response.status());

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::RemoteCallFailure {
                site: site.to_string(),
            })
        }
    }
}
