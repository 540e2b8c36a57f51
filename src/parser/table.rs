use crate::{
    data::{AstNode, BlockType, TableType, Token, TokenKind},
    format::parse_rich_text,
    stream::TokenStream,
};

fn row(token: &Token) -> AstNode {
    let mut node = AstNode::new(BlockType::TableRow, &token.content);
    node.meta.cells = token.meta.cells.clone();
    node.meta.cell_rich_text = Some(
        token
            .meta
            .cells
            .iter()
            .map(|cell| parse_rich_text(cell))
            .collect(),
    );
    node.meta.table_type = token.meta.table_type;
    node
}

/// Consecutive rows of the same table type. Csv and tsv rows must also agree on width
pub(super) fn parse(stream: &mut TokenStream<'_>) -> Option<AstNode> {
    let first = stream.next_if(TokenKind::TableRow)?;
    let table_type = first.meta.table_type;
    let width = first.meta.cells.len();
    let belongs = |token: &Token| {
        token.kind == TokenKind::TableRow
            && token.meta.table_type == table_type
            && (table_type == Some(TableType::Pipe) || token.meta.cells.len() == width)
    };

    let mut rows = vec![row(first)];
    while let Some(next) = stream.peek(0).filter(|t| belongs(*t)) {
        stream.next();
        rows.push(row(next));
    }

    let mut table = AstNode::new(BlockType::Table, "").with_children(rows);
    table.meta.table_type = table_type;
    table.meta.has_children = true;
    Some(table)
}
