// ABOUTME: AWS Lambda implementation of the remote function traits.
// ABOUTME: Translates trait calls to SDK requests and SDK errors to RemoteError.

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, EventSourceMappingConfiguration, FunctionCode, Runtime};
use bytes::Bytes;
use std::collections::HashMap;

use super::RemoteError;
use super::traits::{
    ConfigurationUpdate, FunctionOps, FunctionSettings, FunctionSpec, FunctionState,
    LastUpdateStatus, LifecycleState, MappingOps, MappingSettings, TriggerMapping,
};
use crate::types::{FunctionName, MappingId, QueueArn};

/// Remote backend talking to the AWS Lambda API.
#[derive(Debug, Clone)]
pub struct LambdaRemote {
    client: Client,
}

impl LambdaRemote {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Classify an SDK failure by the provider's error code.
fn classify<E>(err: SdkError<E>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_string);
    RemoteError::from_code(code.as_deref(), DisplayErrorContext(&err).to_string())
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn environment(settings: &FunctionSettings) -> Environment {
    let variables: HashMap<String, String> = settings
        .environment
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Environment::builder().set_variables(Some(variables)).build()
}

fn layers(settings: &FunctionSettings) -> Vec<String> {
    settings
        .layers
        .iter()
        .map(|layer| layer.as_str().to_string())
        .collect()
}

/// Convert an observed mapping, skipping entries missing their identity.
fn trigger_mapping(config: &EventSourceMappingConfiguration) -> Option<TriggerMapping> {
    let id = config.uuid()?;
    let queue = config.event_source_arn()?;
    let enabled = !matches!(config.state(), Some("Disabled" | "Disabling"));

    Some(TriggerMapping {
        id: MappingId::new(id),
        queue: QueueArn::new(queue),
        settings: MappingSettings {
            batch_size: config
                .batch_size()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or_default(),
            batching_window: config
                .maximum_batching_window_in_seconds()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or_default(),
            enabled,
        },
    })
}

#[async_trait]
impl FunctionOps for LambdaRemote {
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionState, RemoteError> {
        let output = self
            .client
            .get_function_configuration()
            .function_name(name.as_str())
            .send()
            .await
            .map_err(classify)?;

        Ok(FunctionState {
            state: output
                .state()
                .map(|s| LifecycleState::from_provider(s.as_str()))
                .unwrap_or(LifecycleState::Pending),
            last_update: output
                .last_update_status()
                .map(|s| LastUpdateStatus::from_provider(s.as_str()))
                .unwrap_or(LastUpdateStatus::InProgress),
            last_update_reason: output.last_update_status_reason().map(str::to_string),
            last_modified: output
                .last_modified()
                .and_then(FunctionState::parse_last_modified),
        })
    }

    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), RemoteError> {
        let settings = &spec.settings;
        let code = FunctionCode::builder()
            .zip_file(Blob::new(spec.code.to_vec()))
            .build();

        self.client
            .create_function()
            .function_name(spec.name.as_str())
            .role(spec.role.as_str())
            .code(code)
            .handler(&settings.handler)
            .runtime(Runtime::from(settings.runtime.as_str()))
            .description(&settings.description)
            .timeout(to_i32(settings.timeout))
            .memory_size(to_i32(settings.memory))
            .environment(environment(settings))
            .set_layers(Some(layers(settings)))
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn update_function_code(
        &self,
        name: &FunctionName,
        code: &Bytes,
    ) -> Result<(), RemoteError> {
        self.client
            .update_function_code()
            .function_name(name.as_str())
            .zip_file(Blob::new(code.to_vec()))
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn update_function_configuration(
        &self,
        update: &ConfigurationUpdate,
    ) -> Result<(), RemoteError> {
        let settings = &update.settings;

        self.client
            .update_function_configuration()
            .function_name(update.name.as_str())
            .handler(&settings.handler)
            .runtime(Runtime::from(settings.runtime.as_str()))
            .description(&settings.description)
            .timeout(to_i32(settings.timeout))
            .memory_size(to_i32(settings.memory))
            .environment(environment(settings))
            .set_layers(Some(layers(settings)))
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }
}

#[async_trait]
impl MappingOps for LambdaRemote {
    async fn list_mappings(
        &self,
        function: &FunctionName,
    ) -> Result<Vec<TriggerMapping>, RemoteError> {
        let mut mappings = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_event_source_mappings()
                .function_name(function.as_str())
                .set_marker(marker.take())
                .send()
                .await
                .map_err(classify)?;

            mappings.extend(output.event_source_mappings().iter().filter_map(trigger_mapping));

            match output.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(mappings)
    }

    async fn create_mapping(
        &self,
        function: &FunctionName,
        queue: &QueueArn,
        settings: &MappingSettings,
    ) -> Result<MappingId, RemoteError> {
        let output = self
            .client
            .create_event_source_mapping()
            .function_name(function.as_str())
            .event_source_arn(queue.as_str())
            .batch_size(to_i32(settings.batch_size))
            .maximum_batching_window_in_seconds(to_i32(settings.batching_window))
            .enabled(settings.enabled)
            .send()
            .await
            .map_err(classify)?;

        output
            .uuid()
            .map(MappingId::new)
            .ok_or_else(|| RemoteError::Other(format!("no mapping id returned for {queue}")))
    }

    async fn update_mapping(
        &self,
        id: &MappingId,
        function: &FunctionName,
        settings: &MappingSettings,
    ) -> Result<(), RemoteError> {
        self.client
            .update_event_source_mapping()
            .uuid(id.as_str())
            .function_name(function.as_str())
            .batch_size(to_i32(settings.batch_size))
            .maximum_batching_window_in_seconds(to_i32(settings.batching_window))
            .enabled(settings.enabled)
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn delete_mapping(&self, id: &MappingId) -> Result<(), RemoteError> {
        self.client
            .delete_event_source_mapping()
            .uuid(id.as_str())
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }
}
