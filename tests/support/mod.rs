// ABOUTME: Test support utilities.
// ABOUTME: In-memory recording remote, fake artifact builder, and tracing setup.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use lamsync::package::{Artifact, ArtifactBuilder, PackageError};
use lamsync::remote::{
    ConfigurationUpdate, FunctionOps, FunctionSettings, FunctionSpec, FunctionState,
    LastUpdateStatus, LifecycleState, MappingOps, MappingSettings, RemoteError, TriggerMapping,
};
use lamsync::types::{FunctionName, MappingId, QueueArn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive(
            "lamsync=debug"
                .parse()
                .expect("static directive should parse"),
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn ready() -> FunctionState {
    FunctionState::new(LifecycleState::Active, LastUpdateStatus::Successful)
}

pub fn updating() -> FunctionState {
    FunctionState::new(LifecycleState::Active, LastUpdateStatus::InProgress)
}

pub fn failed(reason: &str) -> FunctionState {
    let mut state = FunctionState::new(LifecycleState::Active, LastUpdateStatus::Failed);
    state.last_update_reason = Some(reason.to_string());
    state
}

/// A remote call as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFunction,
    CreateFunction(FunctionSpec),
    UpdateCode(Bytes),
    UpdateConfiguration(FunctionSettings),
    ListMappings,
    CreateMapping {
        queue: String,
        settings: MappingSettings,
    },
    UpdateMapping {
        id: String,
        settings: MappingSettings,
    },
    DeleteMapping(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::GetFunction | Call::ListMappings)
    }
}

#[derive(Default)]
struct Inner {
    exists: bool,
    /// Responses for get_function once the function exists, consumed in
    /// order; when empty the function reports ready.
    states: VecDeque<Result<FunctionState, RemoteError>>,
    calls: Vec<Call>,
    code_conflicts: u32,
    config_conflicts: u32,
    mapping_conflicts: u32,
    mappings: Vec<TriggerMapping>,
    next_mapping: u32,
    fail_code_update: Option<RemoteError>,
    fail_list: Option<RemoteError>,
}

/// In-memory stand-in for the function API that records every call.
#[derive(Default)]
pub struct FakeRemote {
    inner: Mutex<Inner>,
}

impl FakeRemote {
    /// A remote where the function does not exist yet.
    pub fn absent() -> Self {
        Self::default()
    }

    /// A remote where the function exists and is ready.
    pub fn existing() -> Self {
        let remote = Self::default();
        remote.inner.lock().exists = true;
        remote
    }

    /// Script the next get_function responses, existence check included.
    pub fn with_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = Result<FunctionState, RemoteError>>,
    {
        self.inner.get_mut().states.extend(states);
        self
    }

    pub fn with_code_conflicts(mut self, n: u32) -> Self {
        self.inner.get_mut().code_conflicts = n;
        self
    }

    pub fn with_config_conflicts(mut self, n: u32) -> Self {
        self.inner.get_mut().config_conflicts = n;
        self
    }

    pub fn with_mapping_conflicts(mut self, n: u32) -> Self {
        self.inner.get_mut().mapping_conflicts = n;
        self
    }

    pub fn with_mapping(mut self, id: &str, queue: &str, batch_size: u32) -> Self {
        self.inner.get_mut().mappings.push(TriggerMapping {
            id: MappingId::new(id),
            queue: QueueArn::new(queue),
            settings: MappingSettings {
                batch_size,
                batching_window: 0,
                enabled: true,
            },
        });
        self
    }

    pub fn failing_code_update(mut self, error: RemoteError) -> Self {
        self.inner.get_mut().fail_code_update = Some(error);
        self
    }

    pub fn failing_list(mut self, error: RemoteError) -> Self {
        self.inner.get_mut().fail_list = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn mappings(&self) -> Vec<TriggerMapping> {
        self.inner.lock().mappings.clone()
    }

    pub fn exists(&self) -> bool {
        self.inner.lock().exists
    }
}

fn take_conflict(counter: &mut u32) -> Result<(), RemoteError> {
    if *counter > 0 {
        *counter -= 1;
        return Err(RemoteError::Conflict(
            "The operation cannot be performed at this time. An update is in progress".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl FunctionOps for FakeRemote {
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionState, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::GetFunction);
        if !inner.exists {
            return Err(RemoteError::NotFound(format!("Function not found: {name}")));
        }
        inner.states.pop_front().unwrap_or_else(|| Ok(ready()))
    }

    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::CreateFunction(spec.clone()));
        inner.exists = true;
        Ok(())
    }

    async fn update_function_code(
        &self,
        _name: &FunctionName,
        code: &Bytes,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::UpdateCode(code.clone()));
        if let Some(error) = inner.fail_code_update.clone() {
            return Err(error);
        }
        take_conflict(&mut inner.code_conflicts)
    }

    async fn update_function_configuration(
        &self,
        update: &ConfigurationUpdate,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(Call::UpdateConfiguration(update.settings.clone()));
        take_conflict(&mut inner.config_conflicts)
    }
}

#[async_trait]
impl MappingOps for FakeRemote {
    async fn list_mappings(
        &self,
        _function: &FunctionName,
    ) -> Result<Vec<TriggerMapping>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::ListMappings);
        if let Some(error) = inner.fail_list.clone() {
            return Err(error);
        }
        Ok(inner.mappings.clone())
    }

    async fn create_mapping(
        &self,
        _function: &FunctionName,
        queue: &QueueArn,
        settings: &MappingSettings,
    ) -> Result<MappingId, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::CreateMapping {
            queue: queue.to_string(),
            settings: *settings,
        });
        take_conflict(&mut inner.mapping_conflicts)?;

        inner.next_mapping += 1;
        let id = MappingId::new(format!("created-{}", inner.next_mapping));
        inner.mappings.push(TriggerMapping {
            id: id.clone(),
            queue: queue.clone(),
            settings: *settings,
        });
        Ok(id)
    }

    async fn update_mapping(
        &self,
        id: &MappingId,
        _function: &FunctionName,
        settings: &MappingSettings,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::UpdateMapping {
            id: id.to_string(),
            settings: *settings,
        });
        take_conflict(&mut inner.mapping_conflicts)?;

        match inner.mappings.iter_mut().find(|m| &m.id == id) {
            Some(mapping) => {
                mapping.settings = *settings;
                Ok(())
            }
            None => Err(RemoteError::NotFound(format!("mapping {id}"))),
        }
    }

    async fn delete_mapping(&self, id: &MappingId) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::DeleteMapping(id.to_string()));
        take_conflict(&mut inner.mapping_conflicts)?;

        inner.mappings.retain(|m| &m.id != id);
        Ok(())
    }
}

/// Artifact builder that skips the filesystem walk and remembers where it
/// put each artifact.
#[derive(Default)]
pub struct FakeBuilder {
    built: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl FakeBuilder {
    pub fn failing() -> Self {
        Self {
            built: Mutex::default(),
            fail: true,
        }
    }

    pub fn built(&self) -> Vec<PathBuf> {
        self.built.lock().clone()
    }
}

pub const FAKE_ARCHIVE: &[u8] = b"PK\x03\x04fake-archive";

#[async_trait]
impl ArtifactBuilder for FakeBuilder {
    async fn build(&self, source: &Path, _includes: &[String]) -> Result<Artifact, PackageError> {
        if self.fail {
            // Reuse the real builder's error for a missing source.
            let missing = source.join("does-not-exist");
            return lamsync::package::ZipBuilder::new(None)
                .build(&missing, &[])
                .await;
        }
        let artifact = Artifact::from_bytes(FAKE_ARCHIVE)?;
        self.built.lock().push(artifact.path().to_path_buf());
        Ok(artifact)
    }
}
