//! Assembly of classified columns into a schema document

use crate::classifier::classify_field;
use crate::diagnostics::DiagnosticSink;
use crate::types::SchemaDocument;
use cdcs_core::SchemaConfig;
use cdcs_core::config::{DEFAULT_NAMESPACE, DEFAULT_RECORD_NAME};
use std::sync::Arc;

/// Build the document of one table.
///
/// Every column yields exactly one field, in the order given. An empty
/// sequence yields a document with no fields.
pub fn assemble<I, N, T>(
    namespace: &str,
    record_name: &str,
    columns: I,
    sink: &dyn DiagnosticSink,
) -> SchemaDocument
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: AsRef<str>,
{
    let mut document = SchemaDocument::new(namespace, record_name);
    document.fields = columns
        .into_iter()
        .map(|(name, raw_type)| classify_field(name, raw_type.as_ref(), sink))
        .collect();
    document
}

/// [`assemble`] with the standard change-record namespace and name
pub fn assemble_default<I, N, T>(columns: I, sink: &dyn DiagnosticSink) -> SchemaDocument
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: AsRef<str>,
{
    assemble(DEFAULT_NAMESPACE, DEFAULT_RECORD_NAME, columns, sink)
}

/// Assembler bound to a namespace, record name and diagnostic sink
#[derive(Clone)]
pub struct SchemaAssembler {
    namespace: String,
    record_name: String,
    sink: Arc<dyn DiagnosticSink>,
}

impl SchemaAssembler {
    pub fn new(
        namespace: impl Into<String>,
        record_name: impl Into<String>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            record_name: record_name.into(),
            sink,
        }
    }

    pub fn from_config(config: &SchemaConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::new(config.namespace.clone(), config.record_name.clone(), sink)
    }

    pub fn assemble<I, N, T>(&self, columns: I) -> SchemaDocument
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        self.assemble_with_sink(columns, self.sink.as_ref())
    }

    /// Assemble with a different sink, e.g. one wrapping [`Self::sink`]
    pub fn assemble_with_sink<I, N, T>(
        &self,
        columns: I,
        sink: &dyn DiagnosticSink,
    ) -> SchemaDocument
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        assemble(&self.namespace, &self.record_name, columns, sink)
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }
}
