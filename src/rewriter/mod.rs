//! Stream rewriter for multi-document YAML manifests
//!
//! Each document is decoded, classified by its original `apiVersion` and
//! `kind`, mutated in place by at most one rule, and encoded again before the
//! next document is read. Output order and count always match the input.

pub mod rules;

use std::io::{Read, Write};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info, instrument};

use crate::document::{classify, ClassificationKey};
use crate::{Error, Result};

pub use rules::Rule;

/// Document separator written between encoded documents
const DOCUMENT_SEPARATOR: &[u8] = b"---\n";

/// Source and destination API groups for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    pub from_api_group: String,
    pub to_api_group: String,
}

impl RewriteConfig {
    /// Create a config, rejecting empty groups
    pub fn new(
        from_api_group: impl Into<String>,
        to_api_group: impl Into<String>,
    ) -> Result<Self> {
        let from_api_group = from_api_group.into();
        let to_api_group = to_api_group.into();

        if from_api_group.is_empty() {
            return Err(Error::ConfigError(
                "source API group (--from) cannot be empty".to_string(),
            ));
        }
        if to_api_group.is_empty() {
            return Err(Error::ConfigError(
                "destination API group (--to) cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            from_api_group,
            to_api_group,
        })
    }
}

/// What happened to a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Key read from the document before it was rewritten
    pub key: ClassificationKey,
    pub rule: Rule,
    pub changed: bool,
}

/// Counters for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents read and written
    pub documents: usize,
    /// Documents with at least one rewritten field
    pub rewritten: usize,
    pub custom_resource_definitions: usize,
    pub roles: usize,
    pub api_versions: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome) {
        self.documents += 1;
        if !outcome.changed {
            return;
        }
        self.rewritten += 1;
        match outcome.rule {
            Rule::CustomResourceDefinition => self.custom_resource_definitions += 1,
            Rule::Role => self.roles += 1,
            Rule::GroupPrefix => self.api_versions += 1,
            Rule::PassThrough => {}
        }
    }
}

/// Rewrites API groups in a stream of YAML documents
#[derive(Debug, Clone)]
pub struct Rewriter {
    config: RewriteConfig,
}

impl Rewriter {
    /// Create a rewriter for the given groups
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    /// Apply the matching rule to a single decoded document
    pub fn rewrite_document(&self, document: &mut Value) -> Outcome {
        let from = self.config.from_api_group.as_str();
        let to = self.config.to_api_group.as_str();

        // Classify before mutating anything
        let key = classify(document);
        let rule = Rule::select(&key, from);
        let changed = match rule {
            Rule::CustomResourceDefinition => rules::rewrite_crd(document, from, to),
            Rule::Role => rules::rewrite_role(document, from, to),
            Rule::GroupPrefix => rules::rewrite_api_version(document, from, to),
            Rule::PassThrough => false,
        };

        Outcome { key, rule, changed }
    }

    /// Drain `reader`, writing every document to `writer` in order
    ///
    /// Stops at the first decode or encode error; documents written before
    /// the error stay written.
    ///
    /// The whole input is read before the first document is decoded, so
    /// piped input produces no output until the input reaches EOF. This
    /// departs from decoding one document at a time; serde_yaml's reader
    /// path buffers the full input regardless.
    #[instrument(skip_all, fields(from = %self.config.from_api_group, to = %self.config.to_api_group))]
    pub fn run<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(Error::ReadError)?;

        if is_blank_stream(&input) {
            info!("Input stream has no documents");
            return Ok(summary);
        }

        for (index, deserializer) in serde_yaml::Deserializer::from_slice(&input).enumerate() {
            let mut document = Value::deserialize(deserializer).map_err(|source| {
                Error::DecodeError {
                    document: index,
                    source,
                }
            })?;

            let outcome = self.rewrite_document(&mut document);
            if outcome.changed {
                debug!(
                    document = index,
                    rule = outcome.rule.as_str(),
                    kind = %outcome.key.kind,
                    "Rewrote document"
                );
            }

            write_document(&mut writer, index, &document)?;
            summary.record(&outcome);
        }

        info!(
            documents = summary.documents,
            rewritten = summary.rewritten,
            crds = summary.custom_resource_definitions,
            roles = summary.roles,
            api_versions = summary.api_versions,
            "Finished rewriting stream"
        );
        Ok(summary)
    }
}

/// UTF-8 byte order mark some editors write at the start of a file
const BYTE_ORDER_MARK: &[u8] = b"\xef\xbb\xbf";

/// True when the stream holds nothing but whitespace and comments
fn is_blank_stream(input: &[u8]) -> bool {
    let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);
    input.split(|byte| *byte == b'\n').all(|line| {
        match line.iter().find(|byte| !byte.is_ascii_whitespace()) {
            None => true,
            Some(byte) => *byte == b'#',
        }
    })
}

fn write_document<W: Write>(writer: &mut W, index: usize, document: &Value) -> Result<()> {
    if index > 0 {
        writer
            .write_all(DOCUMENT_SEPARATOR)
            .map_err(|source| Error::WriteError {
                document: index,
                source,
            })?;
    }

    serde_yaml::to_writer(&mut *writer, document).map_err(|source| Error::EncodeError {
        document: index,
        source,
    })?;

    writer.flush().map_err(|source| Error::WriteError {
        document: index,
        source,
    })
}
