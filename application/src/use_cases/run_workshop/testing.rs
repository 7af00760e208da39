//! In-memory adapters for engine tests.

use super::WorkshopEngine;
use crate::config::EngineOptions;
use crate::ports::config_source::{ConfigError, ConfigSource};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::inference_provider::{Generation, InferenceProvider, ProviderError};
use crate::ports::snapshot_store::{ArtifactSink, PersistenceError, SnapshotStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use workshop_domain::{ParticipantSpec, SessionSnapshot, SessionState, WorkshopConfig};

pub(crate) type TestEngine = WorkshopEngine<ScriptedProvider>;

/// Provider that replays queued results, then answers with a default reply.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Generation, ProviderError>>>,
    calls: Mutex<Vec<(String, String)>>,
    /// Calls left before every further call hangs forever.
    hang_after: Mutex<Option<usize>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, content: &str, tokens: u64) -> Self {
        self.push(Ok(Generation::new(content, tokens)))
    }

    pub(crate) fn fail(self, error: ProviderError) -> Self {
        self.push(Err(error))
    }

    fn push(self, result: Result<Generation, ProviderError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn hang_next(&self) {
        self.hang_after(0);
    }

    pub(crate) fn hang_after(&self, calls: usize) {
        *self.hang_after.lock().unwrap() = Some(calls);
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str, system: &str) -> Result<Generation, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));

        let hang = {
            let mut remaining = self.hang_after.lock().unwrap();
            match remaining.as_mut() {
                Some(0) => true,
                Some(n) => {
                    *n -= 1;
                    false
                }
                None => false,
            }
        };
        if hang {
            std::future::pending::<()>().await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Generation::new("Scripted contribution", 1)))
    }
}

#[derive(Default)]
pub(crate) struct MemoryConfigSource {
    configs: Mutex<HashMap<PathBuf, WorkshopConfig>>,
}

impl MemoryConfigSource {
    pub(crate) fn insert(&self, path: &str, config: WorkshopConfig) {
        self.configs.lock().unwrap().insert(PathBuf::from(path), config);
    }
}

impl ConfigSource for MemoryConfigSource {
    fn load(&self, path: &Path) -> Result<WorkshopConfig, ConfigError> {
        self.configs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ConfigError::Read {
                path: path.to_path_buf(),
                message: "No such file or directory".to_string(),
            })
    }
}

/// Snapshot store keeping serialized JSON in memory.
#[derive(Default)]
pub(crate) struct MemorySnapshotStore {
    files: Mutex<HashMap<PathBuf, String>>,
    fail_saves: Mutex<bool>,
}

impl MemorySnapshotStore {
    pub(crate) fn put(&self, path: &str, snapshot: &SessionSnapshot) {
        self.put_raw(path, &serde_json::to_string(snapshot).unwrap());
    }

    pub(crate) fn put_raw(&self, path: &str, raw: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), raw.to_string());
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(Path::new(path))
    }

    pub(crate) fn fail_saves(&self) {
        *self.fail_saves.lock().unwrap() = true;
    }

    pub(crate) fn load_state(&self, path: &str) -> SessionState {
        SessionState::from_snapshot(self.load(Path::new(path)).unwrap()).unwrap()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        if *self.fail_saves.lock().unwrap() {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                message: "Permission denied".to_string(),
            });
        }
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            PersistenceError::Serialization {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        self.files.lock().unwrap().insert(path.to_path_buf(), json);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SessionSnapshot, PersistenceError> {
        let raw = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| PersistenceError::Io {
                path: path.to_path_buf(),
                message: "No such file or directory".to_string(),
            })?;
        serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[derive(Default)]
pub(crate) struct MemoryArtifacts {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryArtifacts {
    pub(crate) fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl ArtifactSink for MemoryArtifacts {
    fn write(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<ConversationEvent>>,
}

impl RecordingLogger {
    pub(crate) fn events(&self) -> Vec<ConversationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Shared handles to the adapters wired into a test engine.
#[derive(Clone)]
pub(crate) struct Handles {
    pub(crate) provider: Arc<ScriptedProvider>,
    pub(crate) configs: Arc<MemoryConfigSource>,
    pub(crate) snapshots: Arc<MemorySnapshotStore>,
    pub(crate) artifacts: Arc<MemoryArtifacts>,
    pub(crate) logger: Arc<RecordingLogger>,
}

/// A named workshop; the first entry becomes facilitator at start.
pub(crate) fn workshop(names: &[&str]) -> WorkshopConfig {
    let mut config = WorkshopConfig::default();
    config.workshop.name = Some("Retro".into());
    config.workshop.description = Some("Sprint retrospective".into());
    config.participants = names
        .iter()
        .map(|n| ParticipantSpec::new(*n, "Engineer"))
        .collect();
    config
}

pub(crate) fn engine_with(config: WorkshopConfig, provider: ScriptedProvider) -> (TestEngine, Handles) {
    engine_with_options(config, provider, EngineOptions::default())
}

pub(crate) fn engine_with_options(
    config: WorkshopConfig,
    provider: ScriptedProvider,
    options: EngineOptions,
) -> (TestEngine, Handles) {
    let handles = Handles {
        provider: Arc::new(provider),
        configs: Arc::new(MemoryConfigSource::default()),
        snapshots: Arc::new(MemorySnapshotStore::default()),
        artifacts: Arc::new(MemoryArtifacts::default()),
        logger: Arc::new(RecordingLogger::default()),
    };
    let (mut engine, handles) = engine_with_handles(handles);
    engine = engine.with_options(options);
    if config != WorkshopConfig::default() {
        handles.configs.insert("workshop.yaml", config);
        engine.load(Path::new("workshop.yaml")).unwrap();
    }
    (engine, handles)
}

/// Engine wired to existing adapters, e.g. to restore what another saved.
pub(crate) fn engine_with_handles(handles: Handles) -> (TestEngine, Handles) {
    let engine = WorkshopEngine::new(
        handles.provider.clone(),
        handles.configs.clone(),
        handles.snapshots.clone(),
        handles.artifacts.clone(),
    )
    .with_logger(handles.logger.clone())
    .with_seed(7);
    (engine, handles)
}

pub(crate) async fn started_engine(names: &[&str], provider: ScriptedProvider) -> (TestEngine, Handles) {
    started_engine_with_options(names, provider, EngineOptions::default()).await
}

pub(crate) async fn started_engine_with_options(
    names: &[&str],
    provider: ScriptedProvider,
    options: EngineOptions,
) -> (TestEngine, Handles) {
    let (mut engine, handles) = engine_with_options(workshop(names), provider, options);
    engine.start(None).await.unwrap();
    (engine, handles)
}
