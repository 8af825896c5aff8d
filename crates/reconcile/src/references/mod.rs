//! Reference extraction from documents

mod syntax;

pub use syntax::LinkSyntax;

use imgsweep_errors::{Error, SweepError};
use imgsweep_platform::{FilesystemOperations, PlatformContext};
use imgsweep_types::{ExtensionSet, ReferenceSet, TreeEntry};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::path::Path;

/// Prefix `target` with `<canonical>/` unless it already starts with it.
///
/// The prefix check is case-sensitive, matching how paths are compared
/// when orphans are reaped.
#[must_use]
pub fn normalize_reference(target: &str, canonical: &str) -> String {
    let target = target.trim();
    let prefix = format!("{canonical}/");
    if target.starts_with(&prefix) {
        target.to_string()
    } else {
        format!("{prefix}{target}")
    }
}

/// Targets with a URL scheme point outside the vault.
fn is_remote(target: &str) -> bool {
    target.contains("://")
}

/// Inline links are URLs, so `Pasted%20image.png` names `Pasted image.png`.
/// Wiki embeds are taken literally. Escapes that do not decode to UTF-8
/// leave the target unchanged.
fn decode_target(syntax: LinkSyntax, target: &str) -> String {
    match syntax {
        LinkSyntax::InlineImage => percent_decode_str(target)
            .decode_utf8()
            .map_or_else(|_| target.to_string(), |decoded| decoded.into_owned()),
        LinkSyntax::WikiEmbed => target.to_string(),
    }
}

/// Finds image references in document text.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    matchers: Vec<(LinkSyntax, Regex)>,
    canonical_folder: String,
}

impl ReferenceExtractor {
    /// Compile matchers for every supported syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if a matcher fails to compile.
    pub fn new(
        extensions: &ExtensionSet,
        canonical_folder: impl Into<String>,
    ) -> Result<Self, Error> {
        let matchers = LinkSyntax::ALL
            .into_iter()
            .map(|syntax| Ok((syntax, syntax.compile(extensions)?)))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            matchers,
            canonical_folder: canonical_folder.into(),
        })
    }

    /// Raw targets in document order, per syntax, before normalization.
    #[must_use]
    pub fn targets(&self, text: &str) -> Vec<(LinkSyntax, String)> {
        let mut found = Vec::new();
        for (syntax, regex) in &self.matchers {
            for caps in regex.captures_iter(text) {
                if let Some(target) = caps.iter().skip(1).flatten().next() {
                    let target = target.as_str().trim();
                    if !target.is_empty() && !is_remote(target) {
                        found.push((*syntax, decode_target(*syntax, target)));
                    }
                }
            }
        }
        found
    }

    /// Add every normalized reference in `text` to `set`; returns how many
    /// were new.
    pub fn collect_into(&self, text: &str, set: &mut ReferenceSet) -> usize {
        self.targets(text)
            .into_iter()
            .filter(|(_, target)| set.insert(normalize_reference(target, &self.canonical_folder)))
            .count()
    }

    #[must_use]
    pub fn canonical_folder(&self) -> &str {
        &self.canonical_folder
    }
}

/// Outcome of scanning a batch of documents.
#[derive(Debug, Default)]
pub struct Extraction {
    pub references: ReferenceSet,
    pub documents_scanned: usize,
    pub failures: Vec<SweepError>,
}

/// Read each document under `root` and gather its references.
///
/// A document that cannot be read contributes nothing and is reported as a
/// `ReadFailure`; the remaining documents are still scanned.
pub async fn extract_references(
    fs: &dyn FilesystemOperations,
    ctx: &PlatformContext,
    root: &Path,
    documents: &[TreeEntry],
    extractor: &ReferenceExtractor,
) -> Extraction {
    let mut extraction = Extraction::default();

    for document in documents {
        match fs.read_text(ctx, &root.join(&document.path)).await {
            Ok(text) => {
                extraction.documents_scanned += 1;
                let added = extractor.collect_into(&text, &mut extraction.references);
                tracing::trace!(document = %document.path, added, "scanned document");
            }
            Err(e) => extraction.failures.push(SweepError::ReadFailure {
                path: document.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    extraction
}
