//! The document-level resource table.
//!
//! yEd stores embedded vector graphics once, in a `<y:Resources>` block, and
//! nodes refer to them by id. The table is filled before any element is
//! built and is read-only afterwards.

use indexmap::IndexMap;
use log::{debug, warn};
use roxmltree::Document;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
    span::Span,
};

/// Resource identifier to textual payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceTable {
    entries: IndexMap<String, String>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every `<y:Resource>` in the document.
    pub fn from_document(document: &Document<'_>) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let mut table = Self::new();

        let resources = document
            .descendants()
            .filter(|n| markup::is_element(*n, ns::YWORKS, "Resource"));
        for resource in resources {
            let Some(id) = resource.attribute("id") else {
                collector.emit(
                    Diagnostic::warning("<y:Resource> without `id` is ignored")
                        .with_code(ErrorCode::E101)
                        .with_span(Span::of(resource), "no id"),
                );
                continue;
            };
            if table.insert(id, markup::text_content(resource)).is_some() {
                warn!(id = id; "Duplicate resource id, keeping the last one");
            }
        }

        debug!(count = table.len(); "Resource table built");
        collector.finish(table)
    }

    /// Stores a payload, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<String>, payload: impl Into<String>) -> Option<String> {
        self.entries.insert(id.into(), payload.into())
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_are_unescaped() {
        let source = r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <data key="d7">
    <y:Resources>
      <y:Resource id="1">&lt;svg id="root"/&gt;</y:Resource>
      <y:Resource>orphan</y:Resource>
      <y:Resource id="2"><![CDATA[<svg/>]]></y:Resource>
    </y:Resources>
  </data>
</graphml>"#;
        let document = markup::parse_document(source).unwrap();
        let parsed = ResourceTable::from_document(&document);

        let table = parsed.value();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("1"), Some(r#"<svg id="root"/>"#));
        assert_eq!(table.get("2"), Some("<svg/>"));
        assert_eq!(table.get("3"), None);
        assert_eq!(parsed.diagnostics().len(), 1);
        assert_eq!(parsed.diagnostics()[0].code(), Some(ErrorCode::E101));
    }
}
