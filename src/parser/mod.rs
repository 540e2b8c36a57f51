//! Block parsers, and the registry choosing between them.
//!
//! Every parser looks at the token under the cursor only. The registry asks them in order of descending
//! priority, and the first one to accept gets to parse. [`BlockParser::Paragraph`] accepts anything,
//! so some parser always does.

mod heading;
mod list;
mod quote;
mod simple;
mod table;

use log::debug;

use crate::{
    data::{AstNode, Token, TokenKind},
    stream::TokenStream,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockParser {
    ToggleHeading,
    Callout,
    ToggleList,
    Heading,
    Code,
    Table,
    ListItem,
    Divider,
    Media,
    Quote,
    BlankLine,
    Paragraph,
}

/// All the parsers, highest priority first
pub const PARSERS: [BlockParser; 12] = [
    BlockParser::ToggleHeading,
    BlockParser::Callout,
    BlockParser::ToggleList,
    BlockParser::Heading,
    BlockParser::Code,
    BlockParser::Table,
    BlockParser::ListItem,
    BlockParser::Divider,
    BlockParser::Media,
    BlockParser::Quote,
    BlockParser::BlankLine,
    BlockParser::Paragraph,
];

impl BlockParser {
    pub fn priority(&self) -> u8 {
        match self {
            BlockParser::ToggleHeading => 95,
            BlockParser::Callout => 90,
            BlockParser::ToggleList => 85,
            BlockParser::Heading => 80,
            BlockParser::Code => 75,
            BlockParser::Table => 70,
            BlockParser::ListItem => 60,
            BlockParser::Divider => 50,
            BlockParser::Media => 45,
            BlockParser::Quote => 40,
            BlockParser::BlankLine => 10,
            BlockParser::Paragraph => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockParser::ToggleHeading => "toggle heading",
            BlockParser::Callout => "callout",
            BlockParser::ToggleList => "toggle list",
            BlockParser::Heading => "heading",
            BlockParser::Code => "code",
            BlockParser::Table => "table",
            BlockParser::ListItem => "list item",
            BlockParser::Divider => "divider",
            BlockParser::Media => "media",
            BlockParser::Quote => "quote",
            BlockParser::BlankLine => "blank line",
            BlockParser::Paragraph => "paragraph",
        }
    }

    /// Accepts whatever nobody else does
    pub fn is_fallback(&self) -> bool {
        matches!(self, BlockParser::Paragraph)
    }

    /// Checks the token under the cursor. Never consumes anything
    pub fn can_parse(&self, stream: &TokenStream<'_>) -> bool {
        let kind = stream.peek_kind(0);
        match self {
            BlockParser::ToggleHeading => kind == TokenKind::ToggleHeading,
            BlockParser::Callout => kind == TokenKind::Callout,
            BlockParser::ToggleList => kind == TokenKind::ToggleList,
            BlockParser::Heading => kind.heading_level().is_some(),
            BlockParser::Code => kind == TokenKind::CodeBlock,
            BlockParser::Table => kind == TokenKind::TableRow,
            BlockParser::ListItem => kind.is_list_item(),
            BlockParser::Divider => kind == TokenKind::Divider,
            BlockParser::Media => kind.is_media(),
            BlockParser::Quote => kind == TokenKind::QuoteBlock,
            BlockParser::BlankLine => kind == TokenKind::BlankLine,
            BlockParser::Paragraph => kind != TokenKind::Eof,
        }
    }

    /// Parses a block. `None` means the consumed tokens produce no node
    pub fn parse(&self, stream: &mut TokenStream<'_>) -> Option<AstNode> {
        match self {
            BlockParser::ToggleHeading => heading::parse_toggle(stream),
            BlockParser::Callout => quote::parse_callout(stream),
            BlockParser::ToggleList => quote::parse_toggle(stream),
            BlockParser::Heading => heading::parse(stream),
            BlockParser::Code => simple::parse_code(stream),
            BlockParser::Table => table::parse(stream),
            BlockParser::ListItem => list::parse(stream),
            BlockParser::Divider => simple::parse_divider(stream),
            BlockParser::Media => simple::parse_media(stream),
            BlockParser::Quote => quote::parse(stream),
            BlockParser::BlankLine => simple::parse_blank(stream),
            BlockParser::Paragraph => simple::parse_paragraph(stream),
        }
    }
}

/// Highest priority parser accepting the token under the cursor, if there's any token left
pub fn select(stream: &TokenStream<'_>) -> Option<BlockParser> {
    PARSERS.into_iter().find(|parser| parser.can_parse(stream))
}

/// Parses a single block off the stream
///
/// # Panics
/// If the chosen parser does not advance the stream
pub fn parse_block(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let parser = select(stream)?;
    let before = stream.position();
    debug!(
        "Dispatching {:?} at token {before} to {} parser",
        stream.peek_kind(0),
        parser.name()
    );
    let node = parser.parse(stream);
    assert!(
        stream.position() > before,
        "{} parser accepted a token, but consumed nothing",
        parser.name()
    );
    node
}

/// Parses all the tokens into a list of top-level blocks
pub fn parse_tokens(tokens: &[Token]) -> Vec<AstNode> {
    let mut stream = TokenStream::new(tokens);
    let mut nodes = Vec::new();
    while stream.has_next() {
        nodes.extend(parse_block(&mut stream));
    }
    nodes
}
