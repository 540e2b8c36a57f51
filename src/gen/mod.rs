pub mod markdown;

use std::fmt::Write;

use itertools::Itertools;

use crate::data::AstNode;

#[derive(Debug, derive_more::From, thiserror::Error)]
pub enum GenerationError {
    #[error("{}", .0)]
    Fmt(std::fmt::Error),
    #[error("{}", .0)]
    Io(std::io::Error),
}

pub type Res = Result<(), GenerationError>;

/// Something able to write AST nodes out in some format
pub trait OutputGenerator<Context> {
    fn write_to<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        node: &AstNode,
    ) -> Res;

    fn write_nodes_to<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        nodes: &[AstNode],
    ) -> Res {
        nodes
            .iter()
            .map(|node| self.write_to(output, context, node))
            .try_collect()
    }
}
