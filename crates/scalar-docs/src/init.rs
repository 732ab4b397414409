//! One-time spec discovery per middleware instance.
//!
//! The resolver runs at most once per [`Initializer`], no matter how many
//! requests arrive concurrently before it has finished. Callers that lose the
//! race wait for the winner and then share its outcome.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use scalar_docs_telemetry::{log_docs_initialized, log_docs_unavailable};

use crate::auto::AutoDiscovery;
use crate::config::DocsConfig;
use crate::error::DiscoveryError;
use crate::fs::SpecFs;
use crate::resolver::{resolve, InitOutcome};

/// Lifecycle of an [`Initializer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl InitState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::Failed,
            _ => Self::Uninitialized,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Initializing => 1,
            Self::Ready => 2,
            Self::Failed => 3,
        }
    }
}

/// How an [`Initializer`] locates its spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Explicit paths, or probing `search_dirs` for well-known file names.
    Search,
    /// Walk `search_dirs` recursively for the first valid spec file.
    Auto,
}

/// Owns a configuration and the cached discovery outcome for it.
pub struct Initializer {
    config: DocsConfig,
    mode: DiscoveryMode,
    fs: Arc<dyn SpecFs>,
    outcome: OnceLock<Arc<InitOutcome>>,
    state: AtomicU8,
}

impl std::fmt::Debug for Initializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Initializer")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Initializer {
    /// Create an initializer. Empty config values are replaced with defaults.
    pub fn new(config: DocsConfig, fs: Arc<dyn SpecFs>) -> Self {
        Self::with_mode(config, DiscoveryMode::Search, fs)
    }

    /// Create an initializer that auto-discovers below `config.search_dirs`.
    /// Explicit spec paths are ignored in this mode.
    pub fn auto(config: DocsConfig, fs: Arc<dyn SpecFs>) -> Self {
        Self::with_mode(config, DiscoveryMode::Auto, fs)
    }

    fn with_mode(config: DocsConfig, mode: DiscoveryMode, fs: Arc<dyn SpecFs>) -> Self {
        let config = match mode {
            DiscoveryMode::Auto if config.search_dirs.is_empty() => {
                config.with_search_dirs(DocsConfig::auto_search_dirs())
            }
            _ => config,
        };
        Self {
            config: config.normalized(),
            mode,
            fs,
            outcome: OnceLock::new(),
            state: AtomicU8::new(InitState::Uninitialized.as_u8()),
        }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub fn mode(&self) -> DiscoveryMode {
        self.mode
    }

    pub fn state(&self) -> InitState {
        InitState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// The outcome, if discovery has already completed.
    pub fn get(&self) -> Option<Arc<InitOutcome>> {
        self.outcome.get().cloned()
    }

    /// Run discovery if needed, blocking the current thread until the
    /// outcome is available.
    pub fn outcome_blocking(&self) -> Arc<InitOutcome> {
        let outcome = self.outcome.get_or_init(|| {
            self.set_state(InitState::Initializing);
            let outcome = match self.mode {
                DiscoveryMode::Search => resolve(&self.config, self.fs.as_ref()),
                DiscoveryMode::Auto => {
                    AutoDiscovery::run(self.fs.as_ref(), &self.config.search_dirs).into_outcome()
                }
            };

            match &outcome {
                InitOutcome::Ready(bundle) => {
                    log_docs_initialized!(
                        docs_path = %self.config.docs_path,
                        spec_url = %bundle.primary_url,
                        "API docs ready"
                    );
                    self.set_state(InitState::Ready);
                }
                InitOutcome::Failed(error) => {
                    log_docs_unavailable!(
                        docs_path = %self.config.docs_path,
                        error = %error,
                        "API docs unavailable"
                    );
                    self.set_state(InitState::Failed);
                }
            }

            Arc::new(outcome)
        });
        Arc::clone(outcome)
    }

    /// Run discovery if needed without blocking the async runtime.
    ///
    /// File reads happen on the blocking pool. Dropping the returned future
    /// does not cancel a discovery that is already running, and never causes
    /// a second one.
    pub async fn outcome(self: &Arc<Self>) -> Arc<InitOutcome> {
        if let Some(outcome) = self.get() {
            return outcome;
        }

        let this = Arc::clone(self);
        match tokio::task::spawn_blocking(move || this.outcome_blocking()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "spec discovery task failed");
                Arc::new(InitOutcome::Failed(DiscoveryError::InitializationAborted(
                    e.to_string(),
                )))
            }
        }
    }

    fn set_state(&self, state: InitState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }
}
