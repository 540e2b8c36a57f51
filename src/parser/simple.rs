//! Single-token blocks

use crate::{
    data::{AstNode, BlockType, TokenKind},
    stream::TokenStream,
};

pub(super) fn parse_code(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let mut node = AstNode::new(BlockType::Code, &token.content);
    node.meta.language = token.meta.language.clone();
    Some(node)
}

pub(super) fn parse_divider(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    stream.next()?;
    Some(AstNode::new(BlockType::Divider, ""))
}

pub(super) fn parse_media(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let kind = match token.kind {
        TokenKind::Audio => BlockType::Audio,
        TokenKind::Image => BlockType::Image,
        TokenKind::File => BlockType::File,
        TokenKind::Bookmark => BlockType::Bookmark,
        _ => return None,
    };
    let mut node = AstNode::new(kind, &token.content);
    node.meta.url = token.meta.url.clone();
    Some(node)
}

/// Blank lines only separate blocks
pub(super) fn parse_blank(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    stream.next();
    None
}

pub(super) fn parse_paragraph(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    Some(AstNode::with_rich_text(BlockType::Paragraph, &token.content))
}
