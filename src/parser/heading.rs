use crate::{
    data::{AstNode, BlockType},
    stream::TokenStream,
};

pub(super) fn parse(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let level = token.kind.heading_level()?;
    Some(AstNode::with_rich_text(
        BlockType::heading(level),
        &token.content,
    ))
}

/// Toggleable heading, with every following quote line as its body
pub(super) fn parse_toggle(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let level = token.meta.level.unwrap_or(1);
    let children = super::quote::toggle_body(stream);
    let mut node =
        AstNode::with_rich_text(BlockType::heading(level), &token.content).with_children(children);
    node.meta.is_toggleable = true;
    node.meta.has_children = !node.children.is_empty();
    Some(node)
}
