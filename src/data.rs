use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::notion::RichText;

/// Failure to recognize a name from one of the closed name sets (block types, callout types, table types)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} name: {name:?}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
}

impl ParseNameError {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
        }
    }
}

/// Place of a token in the (line-ending normalized) source. Both fields are 1-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TokenKind {
    #[cfg_attr(feature = "serde", serde(rename = "HEADING_1"))]
    Heading1,
    #[cfg_attr(feature = "serde", serde(rename = "HEADING_2"))]
    Heading2,
    #[cfg_attr(feature = "serde", serde(rename = "HEADING_3"))]
    Heading3,
    ToggleHeading,
    QuoteBlock,
    ToggleList,
    Callout,
    ListItemBulleted,
    ListItemNumbered,
    ListItemTodo,
    CodeBlock,
    TableRow,
    Divider,
    Audio,
    Image,
    File,
    Bookmark,
    BlankLine,
    Text,
    Eof,
}

impl TokenKind {
    /// Every kind the lexer is able to produce
    pub const ALL: [TokenKind; 20] = [
        TokenKind::Heading1,
        TokenKind::Heading2,
        TokenKind::Heading3,
        TokenKind::ToggleHeading,
        TokenKind::QuoteBlock,
        TokenKind::ToggleList,
        TokenKind::Callout,
        TokenKind::ListItemBulleted,
        TokenKind::ListItemNumbered,
        TokenKind::ListItemTodo,
        TokenKind::CodeBlock,
        TokenKind::TableRow,
        TokenKind::Divider,
        TokenKind::Audio,
        TokenKind::Image,
        TokenKind::File,
        TokenKind::Bookmark,
        TokenKind::BlankLine,
        TokenKind::Text,
        TokenKind::Eof,
    ];

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            TokenKind::ListItemBulleted | TokenKind::ListItemNumbered | TokenKind::ListItemTodo
        )
    }

    pub fn is_media(&self) -> bool {
        matches!(
            self,
            TokenKind::Audio | TokenKind::Image | TokenKind::File | TokenKind::Bookmark
        )
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            TokenKind::Heading1 => Some(1),
            TokenKind::Heading2 => Some(2),
            TokenKind::Heading3 => Some(3),
            _ => None,
        }
    }
}

/// Delimiter style a table was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TableType {
    Csv,
    Tsv,
    /// Regular markdown `| a | b |` table
    Pipe,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Csv => "csv",
            TableType::Tsv => "tsv",
            TableType::Pipe => "pipe",
        }
    }
}

impl FromStr for TableType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(TableType::Csv),
            "tsv" => Ok(TableType::Tsv),
            "pipe" => Ok(TableType::Pipe),
            _ => Err(ParseNameError::new("table type", s)),
        }
    }
}

/// `> [!type]` callout flavours.
///
/// Anything outside of the fixed set is still a callout, just an `Unknown` one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum CalloutType {
    Note,
    Info,
    Tip,
    Warning,
    Danger,
    Success,
    Unknown,
}

impl CalloutType {
    pub const KNOWN: [CalloutType; 6] = [
        CalloutType::Note,
        CalloutType::Info,
        CalloutType::Tip,
        CalloutType::Warning,
        CalloutType::Danger,
        CalloutType::Success,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutType::Note => "note",
            CalloutType::Info => "info",
            CalloutType::Tip => "tip",
            CalloutType::Warning => "warning",
            CalloutType::Danger => "danger",
            CalloutType::Success => "success",
            CalloutType::Unknown => "unknown",
        }
    }

    /// Lenient conversion used by the lexer: case-insensitive, never fails
    pub fn from_label(label: &str) -> Self {
        label
            .to_ascii_lowercase()
            .parse()
            .unwrap_or(CalloutType::Unknown)
    }
}

impl FromStr for CalloutType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalloutType::KNOWN
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseNameError::new("callout type", s))
    }
}

impl From<String> for CalloutType {
    fn from(value: String) -> Self {
        CalloutType::from_label(&value)
    }
}

impl From<CalloutType> for String {
    fn from(value: CalloutType) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenMeta {
    pub level: Option<u8>,
    pub table_type: Option<TableType>,
    pub callout_type: Option<CalloutType>,
    pub language: Option<String>,
    pub checked: Option<bool>,
    pub url: Option<String>,
    /// Leading whitespace width of a list item (tab counts as 4)
    pub indent: usize,
    /// Already split cells of a table row
    pub cells: Vec<String>,
    pub is_toggleable: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: TokenMeta,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            content: content.into(),
            meta: TokenMeta::default(),
            position,
        }
    }

    pub fn with_meta(mut self, meta: TokenMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", Position::new(line, 1))
    }
}

/// Block types, mirroring the ones Notion has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Toggle,
    Callout,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Quote,
    Code,
    Table,
    TableRow,
    Divider,
    Audio,
    File,
    Bookmark,
    Image,
    /// A type name this crate does not know. Only ever appears in deserialized trees
    Unsupported,
}

impl BlockType {
    pub const SUPPORTED: [BlockType; 18] = [
        BlockType::Paragraph,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Toggle,
        BlockType::Callout,
        BlockType::BulletedListItem,
        BlockType::NumberedListItem,
        BlockType::ToDo,
        BlockType::Quote,
        BlockType::Code,
        BlockType::Table,
        BlockType::TableRow,
        BlockType::Divider,
        BlockType::Audio,
        BlockType::File,
        BlockType::Bookmark,
        BlockType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::Toggle => "toggle",
            BlockType::Callout => "callout",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::ToDo => "to_do",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Table => "table",
            BlockType::TableRow => "table_row",
            BlockType::Divider => "divider",
            BlockType::Audio => "audio",
            BlockType::File => "file",
            BlockType::Bookmark => "bookmark",
            BlockType::Image => "image",
            BlockType::Unsupported => "unsupported",
        }
    }

    pub fn heading(level: u8) -> Self {
        match level {
            1 => BlockType::Heading1,
            2 => BlockType::Heading2,
            _ => BlockType::Heading3,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockType::Heading1 => Some(1),
            BlockType::Heading2 => Some(2),
            BlockType::Heading3 => Some(3),
            _ => None,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::BulletedListItem | BlockType::NumberedListItem | BlockType::ToDo
        )
    }

    pub fn is_media(&self) -> bool {
        matches!(
            self,
            BlockType::Audio | BlockType::File | BlockType::Bookmark | BlockType::Image
        )
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::SUPPORTED
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseNameError::new("block type", s))
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(BlockType::Unsupported)
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeMeta {
    /// Parsed inline formatting of the node's content
    pub rich_text: Option<Vec<RichText>>,
    pub is_toggleable: bool,
    pub has_children: bool,
    pub callout_type: Option<CalloutType>,
    pub language: Option<String>,
    pub checked: Option<bool>,
    pub url: Option<String>,
    pub table_type: Option<TableType>,
    /// Raw cells of a table row
    pub cells: Vec<String>,
    /// Parsed cells of a table row
    pub cell_rich_text: Option<Vec<Vec<RichText>>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AstNode {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: BlockType,
    pub content: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: NodeMeta,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(kind: BlockType, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            meta: NodeMeta::default(),
            children: Vec::new(),
        }
    }

    /// Node with its content parsed into rich text
    pub fn with_rich_text(kind: BlockType, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut node = Self::new(kind, content);
        node.meta.rich_text = Some(crate::format::parse_rich_text(&node.content));
        node
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_toggleable(&self) -> bool {
        self.meta.is_toggleable
    }

    /// Rich text of this node; parsed on the spot if the node came without it
    pub fn rich_text(&self) -> Vec<RichText> {
        match &self.meta.rich_text {
            Some(rich_text) => rich_text.clone(),
            None => crate::format::parse_rich_text(&self.content),
        }
    }

    /// Structural equivalence, used to check that printing and parsing again gives back the same tree.
    ///
    /// Compares types, nesting, toggle/callout/checkbox/language metadata and table cells.
    /// Content is compared modulo whitespace. Table delimiter style is deliberately not compared,
    /// since tables get normalized on print.
    pub fn is_equivalent(&self, other: &AstNode) -> bool {
        self.kind == other.kind
            && normalize_whitespace(&self.content) == normalize_whitespace(&other.content)
            && self.meta.is_toggleable == other.meta.is_toggleable
            && self.meta.callout_type == other.meta.callout_type
            && self.meta.checked == other.meta.checked
            && self.meta.language == other.meta.language
            && self.meta.url == other.meta.url
            && self
                .meta
                .cells
                .iter()
                .map(|c| normalize_whitespace(c))
                .eq(other.meta.cells.iter().map(|c| normalize_whitespace(c)))
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.is_equivalent(b))
    }
}

/// [`AstNode::is_equivalent`], for whole documents
pub fn equivalent_trees(a: &[AstNode], b: &[AstNode]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.is_equivalent(b))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        {$name:ident, $input:literal, $output:expr} => {
            #[test]
            fn $name() {
                // arrange

                // act
                let output: Result<BlockType, _> = $input.parse();

                // assert
                assert_eq!(output, $output);
            }
        };
    }

    test! {paragraph, "paragraph", Ok(BlockType::Paragraph)}
    test! {heading, "heading_2", Ok(BlockType::Heading2)}
    test! {to_do, "to_do", Ok(BlockType::ToDo)}
    test! {table_row, "table_row", Ok(BlockType::TableRow)}
    test! {unknown, "synced_block", Err(ParseNameError::new("block type", "synced_block"))}
    test! {sentinel_is_not_a_name, "unsupported", Err(ParseNameError::new("block type", "unsupported"))}

    #[test]
    fn names_are_unique() {
        // arrange
        let names: Vec<_> = BlockType::SUPPORTED.iter().map(BlockType::as_str).collect();

        // act
        let unique = names.iter().unique().count();

        // assert
        assert_eq!(unique, names.len());
    }

    #[test]
    fn unknown_names_become_unsupported() {
        assert_eq!(BlockType::from("column_list".to_owned()), BlockType::Unsupported);
        assert_eq!(BlockType::from("quote".to_owned()), BlockType::Quote);
    }

    #[test]
    fn callout_labels() {
        assert_eq!(CalloutType::from_label("WARNING"), CalloutType::Warning);
        assert_eq!(CalloutType::from_label("Tip"), CalloutType::Tip);
        assert_eq!(CalloutType::from_label("important"), CalloutType::Unknown);
        assert!("unknown".parse::<CalloutType>().is_err());
    }

    #[test]
    fn equivalence_ignores_whitespace() {
        // arrange
        let a = AstNode::new(BlockType::Quote, "Line 1\nLine 2");
        let b = AstNode::new(BlockType::Quote, "Line 1 \n  Line 2 ");

        // act
        let same = a.is_equivalent(&b);

        // assert
        assert!(same);
    }

    #[test]
    fn equivalence_sees_children() {
        // arrange
        let a = AstNode::new(BlockType::Toggle, "Title")
            .with_children(vec![AstNode::new(BlockType::Paragraph, "body")]);
        let b = AstNode::new(BlockType::Toggle, "Title");

        // act
        let same = a.is_equivalent(&b);

        // assert
        assert!(!same);
    }
}
