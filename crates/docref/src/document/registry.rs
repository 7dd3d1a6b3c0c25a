//! Registry of open documents

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use tracing::debug;

use super::{ActiveDocumentProvider, Document};
use crate::id::DocumentToken;

/// The documents a host currently has open, keyed by token, plus which one
/// is active.
///
/// References persisted with a document token use this to find their own
/// document again after a reload.
#[derive(Default)]
pub struct DocumentRegistry {
    documents: DashMap<DocumentToken, Arc<dyn Document>>,
    active: RwLock<Option<DocumentToken>>,
}

impl DocumentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document. The first document opened becomes active.
    pub fn open(&self, document: Arc<dyn Document>) -> DocumentToken {
        let token = document.token();
        self.documents.insert(token, document);
        debug!(document = %token, "document opened");

        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if active.is_none() {
            *active = Some(token);
        }
        token
    }

    /// Unregister a document, clearing the active slot if it pointed there.
    pub fn close(&self, token: DocumentToken) -> Option<Arc<dyn Document>> {
        let (_, document) = self.documents.remove(&token)?;
        debug!(document = %token, "document closed");

        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if *active == Some(token) {
            *active = None;
        }
        Some(document)
    }

    /// Make an open document the active one. Returns false if it is not open.
    pub fn activate(&self, token: DocumentToken) -> bool {
        // Held across the membership check so a concurrent close cannot slip in between
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if !self.documents.contains_key(&token) {
            return false;
        }
        *active = Some(token);
        debug!(document = %token, "document activated");
        true
    }

    /// Token of the active document.
    pub fn active_token(&self) -> Option<DocumentToken> {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Find an open document by token.
    pub fn get(&self, token: DocumentToken) -> Option<Arc<dyn Document>> {
        self.documents.get(&token).map(|entry| entry.value().clone())
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check whether no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ActiveDocumentProvider for DocumentRegistry {
    fn current(&self) -> Option<Arc<dyn Document>> {
        self.active_token().and_then(|token| self.get(token))
    }
}
