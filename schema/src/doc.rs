use serde::Serialize;

/// A documentation tree as it appeared inside a `<desc>` block.
///
/// Text and markup are kept interleaved in document order so the renderer can
/// flatten them faithfully later.
pub type Doc = Vec<DocNode>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocNode {
    Text(DocText),
    Element(DocElement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocElement {
    pub tag:        String,
    pub attributes: Vec<(String, String)>,
    pub children:   Doc,
}

impl DocNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocNode::Text(DocText { text: text.into() })
    }

    pub fn element(tag: impl Into<String>, attributes: Vec<(String, String)>, children: Doc) -> Self {
        DocNode::Element(DocElement {
            tag: tag.into(),
            attributes,
            children,
        })
    }
}

impl DocElement {
    /// Looks up a markup attribute such as `to` on `<link>` or `internal` on `<note>`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
