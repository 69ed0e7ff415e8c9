//! Finds the already-open document for a file, across every window.

use crate::host::DocumentId;
use crate::mirror::Mirror;
use crate::path_key::PathKey;

/// The first document whose file mirror points at `canonical`.
///
/// `documents` must enumerate every document-bearing tab of every window.
/// Untitled documents and documents backed by anything but a file are
/// skipped. Nothing is cached: call it again after tabs change.
pub fn find_open<'a, I>(canonical: &PathKey, documents: I) -> Option<DocumentId>
where
    I: IntoIterator<Item = (DocumentId, Option<&'a Mirror>)>,
{
    documents.into_iter().find_map(|(document, mirror)| {
        let path = mirror.and_then(Mirror::file_path)?;
        (path == canonical).then_some(document)
    })
}
