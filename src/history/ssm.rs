// ABOUTME: SSM Parameter Store history backend.
// ABOUTME: Each service's history is a single String parameter, overwritten on every change.

use super::backend::ParameterStore;
use crate::orchestrator::RemoteError;
use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::types::{ParameterStringFilter, ParameterType};

/// Parameter store backed by SSM.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, RemoteError> {
        tracing::debug!(name, "GetParameter");
        let result = self.client.get_parameter().name(name).send().await;

        match result {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_string)),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found()) =>
            {
                Ok(None)
            }
            Err(e) => Err(RemoteError::api("GetParameter", e)),
        }
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), RemoteError> {
        tracing::debug!(name, "PutParameter");
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| RemoteError::api("PutParameter", e))?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError> {
        const OP: &str = "DescribeParameters";

        let filter = ParameterStringFilter::builder()
            .key("Name")
            .option("BeginsWith")
            .values(prefix)
            .build()
            .map_err(|e| RemoteError::api(OP, e))?;

        let mut names = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .client
                .describe_parameters()
                .parameter_filters(filter.clone())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| RemoteError::api(OP, e))?;

            names.extend(
                output
                    .parameters()
                    .iter()
                    .filter_map(|p| p.name())
                    .map(str::to_string),
            );

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(names)
    }
}
