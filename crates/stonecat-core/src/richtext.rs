//! Plain text to the store's rich-text (Lexical editor) document format.
//!
//! Only the subset the importer needs is modelled: a root holding paragraphs,
//! each paragraph holding a single unformatted text node.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextDocument {
    pub root: RootNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub format: String,
    pub indent: u32,
    pub version: u32,
    pub children: Vec<ParagraphNode>,
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub format: String,
    pub indent: u32,
    pub version: u32,
    pub children: Vec<TextNode>,
    pub direction: Option<String>,
    pub text_style: String,
    pub text_format: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub mode: String,
    pub text: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub style: String,
    pub detail: u32,
    pub format: u32,
    pub version: u32,
}

impl RichTextDocument {
    /// Builds a document with one paragraph per non-blank line of `text`.
    ///
    /// Lines are trimmed and blank lines dropped. Returns `None` when nothing
    /// is left, so callers can omit the field instead of sending an empty
    /// document.
    #[must_use]
    pub fn from_plain_text(text: &str) -> Option<Self> {
        let children: Vec<ParagraphNode> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ParagraphNode::from_line)
            .collect();

        if children.is_empty() {
            return None;
        }

        Some(Self {
            root: RootNode {
                node_type: "root".to_owned(),
                format: String::new(),
                indent: 0,
                version: 1,
                children,
                direction: None,
            },
        })
    }

    /// Text of each paragraph, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.root
            .children
            .iter()
            .flat_map(|p| p.children.iter().map(|t| t.text.as_str()))
    }
}

impl ParagraphNode {
    fn from_line(line: &str) -> Self {
        Self {
            node_type: "paragraph".to_owned(),
            format: String::new(),
            indent: 0,
            version: 1,
            children: vec![TextNode {
                mode: "normal".to_owned(),
                text: line.to_owned(),
                node_type: "text".to_owned(),
                style: String::new(),
                detail: 0,
                format: 0,
                version: 1,
            }],
            direction: None,
            text_style: String::new(),
            text_format: 0,
        }
    }
}
