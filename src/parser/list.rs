use log::debug;

use crate::{
    data::{AstNode, BlockType, TokenKind},
    stream::TokenStream,
};

/// List item, along with every following item indented deeper than it
pub(super) fn parse(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let token = stream.next()?;
    let kind = match token.kind {
        TokenKind::ListItemBulleted => BlockType::BulletedListItem,
        TokenKind::ListItemNumbered => BlockType::NumberedListItem,
        TokenKind::ListItemTodo => BlockType::ToDo,
        _ => return None,
    };
    let mut node = AstNode::with_rich_text(kind, &token.content);
    if kind == BlockType::ToDo {
        node.meta.checked = Some(token.meta.checked.unwrap_or(false));
    }

    let indent = token.meta.indent;
    while stream
        .peek(0)
        .is_some_and(|next| next.kind.is_list_item() && next.meta.indent > indent)
    {
        debug!("Nesting list item at token {}", stream.position());
        node.children.extend(parse(stream));
    }
    node.meta.has_children = !node.children.is_empty();
    Some(node)
}
