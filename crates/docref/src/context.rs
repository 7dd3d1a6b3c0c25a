//! Solve-pass configuration

use std::fmt;
use std::sync::Arc;

use tracing::debug_span;

use crate::document::{ActiveDocumentProvider, Document};
use crate::error::Result;
use crate::reference::{ElementReference, EntityKind, ResolutionState};

/// Knobs controlling how references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Look up by unique id before the numeric id
    pub prefer_unique_id: bool,

    /// Overwrite a stale cached numeric id with the freshly found one
    pub heal_entity_ids: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            prefer_unique_id: true,
            heal_entity_ids: true,
        }
    }
}

/// Configuration and state for one solve pass.
///
/// Holds a snapshot of the active document taken when the pass starts, so
/// every reference in the pass resolves against the same document even if
/// the host switches documents halfway through.
#[derive(Clone, Default)]
pub struct SolveContext {
    active: Option<Arc<dyn Document>>,

    /// How references resolve during this pass
    pub options: ResolveOptions,
}

impl SolveContext {
    /// Create a context with no active document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with an explicit active document.
    pub fn with_active(document: Arc<dyn Document>) -> Self {
        Self {
            active: Some(document),
            ..Default::default()
        }
    }

    /// Snapshot the provider's current document.
    pub fn snapshot(provider: &dyn ActiveDocumentProvider) -> Self {
        Self {
            active: provider.current(),
            ..Default::default()
        }
    }

    /// Replace the resolve options (builder pattern).
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// The document this pass resolves against.
    pub fn active_document(&self) -> Option<&dyn Document> {
        self.active.as_deref()
    }

    /// Ensure every reference is resolved against the active document.
    ///
    /// Stops at the first hard error; references are never left half-updated.
    pub fn resolve_all<K: EntityKind>(
        &self,
        references: &mut [ElementReference<K>],
    ) -> Result<ResolveSummary> {
        let span = debug_span!("resolve_all", kind = K::KIND.name(), count = references.len());
        let _enter = span.enter();

        let mut summary = ResolveSummary::default();
        for reference in references.iter_mut() {
            match reference.resolve(self)? {
                ResolutionState::Unbound => summary.unbound += 1,
                ResolutionState::Unresolved => {}
                ResolutionState::Resolved => summary.resolved += 1,
                ResolutionState::Failed => summary.failed += 1,
            }
        }
        Ok(summary)
    }
}

impl fmt::Debug for SolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveContext")
            .field("active", &self.active.as_ref().map(|d| d.token()))
            .field("options", &self.options)
            .finish()
    }
}

/// Outcome counts of one [`SolveContext::resolve_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// References now holding a live value
    pub resolved: usize,
    /// References whose entity could not be found
    pub failed: usize,
    /// References with no document to resolve against
    pub unbound: usize,
}

impl ResolveSummary {
    /// Total number of references visited.
    pub fn total(&self) -> usize {
        self.resolved + self.failed + self.unbound
    }
}
