use crate::{
    data::{AstNode, BlockType, CalloutType, TokenKind},
    stream::TokenStream,
};

/// Body of a toggle: consecutive quote lines, each one a paragraph
pub(super) fn toggle_body(stream: &mut TokenStream<'_>) -> Vec<AstNode> {
    std::iter::from_fn(|| stream.next_if(TokenKind::QuoteBlock))
        .map(|token| AstNode::with_rich_text(BlockType::Paragraph, &token.content))
        .collect()
}

pub(super) fn parse(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    Some(AstNode::with_rich_text(BlockType::Quote, &token.content))
}

pub(super) fn parse_toggle(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let children = toggle_body(stream);
    let mut node = AstNode::with_rich_text(BlockType::Toggle, &token.content).with_children(children);
    node.meta.has_children = !node.children.is_empty();
    Some(node)
}

pub(super) fn parse_callout(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let mut node = AstNode::with_rich_text(BlockType::Callout, &token.content);
    node.meta.callout_type = Some(token.meta.callout_type.unwrap_or(CalloutType::Unknown));
    Some(node)
}
