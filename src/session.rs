use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::document_parser::Document;

/// Outcome of adding a document to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Added,
    AlreadyLoaded,
}

/// Extracted workbooks accumulated across tool calls.
///
/// Documents are kept in load order and keyed by `metadata.file_name`; a name that is
/// already present is not loaded again.
#[derive(Debug, Default)]
pub struct WorkbookSession {
    documents: Vec<Document>,
    loaded_names: HashSet<String>,
}

impl WorkbookSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.loaded_names.contains(file_name)
    }

    pub fn append(&mut self, document: Document) -> AppendOutcome {
        if !self.loaded_names.insert(document.metadata.file_name.clone()) {
            return AppendOutcome::AlreadyLoaded;
        }
        self.documents.push(document);
        AppendOutcome::Added
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.loaded_names.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.documents
            .iter()
            .map(|doc| doc.metadata.file_name.as_str())
            .collect()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Wrap every loaded document into the multi-file context payload
    pub fn combined_context(&self) -> FilesContext<'_> {
        FilesContext {
            metadata: FilesMetadata {
                total_files: self.documents.len(),
                files: self.file_names(),
                sheets_info: IndexMap::new(),
            },
            files_data: &self.documents,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilesMetadata<'a> {
    pub total_files: usize,
    pub files: Vec<&'a str>,
    /// Always empty at this level; per-file details live in each document
    pub sheets_info: IndexMap<String, ()>,
}

/// `{ metadata: {...}, files_data: [Document, ...] }`
#[derive(Debug, Serialize)]
pub struct FilesContext<'a> {
    pub metadata: FilesMetadata<'a>,
    pub files_data: &'a [Document],
}
