//! Markdown in, Notion blocks out.
//!
//! Pasted markdown goes through a pipeline of small stages, every one of them usable on its own:
//! - [`lexer`] splits raw text into a flat list of line-based [`Token`]s,
//! deciding on multi-line constructs (tables, toggles, callouts) by looking at the following lines;
//! - [`stream`] is a cursor over those tokens;
//! - [`parser`] holds the block parsers, tried in priority order until one accepts the current token,
//! producing a tree of [`AstNode`]s;
//! - [`format`] parses inline markup (bold, italic, code, strikethrough, links) into styled [`RichText`] runs,
//! and [`format::live`] re-formats a line as it is being typed;
//! - [`convert`] maps the tree onto Notion API block objects;
//! - [`gen`] prints the tree back into markdown, in a form that parses into the same tree again.
//!
//! None of the stages fail on malformed markdown: whatever is not recognized ends up as plain text.
//!
//! ```
//! let blocks = notionmark::markdown_to_notion("# Title\n\n> Steps:\n> one");
//! assert_eq!(blocks.len(), 2);
//! ```

use gen::{
    markdown::{Context, MarkdownPrinter},
    GenerationError, OutputGenerator,
};
use util::FmtToIo;

pub mod config;
pub mod convert;
/// This module defines types that are used to represent parsed data
pub mod data;
pub mod format;
pub mod gen;
pub mod lexer;
pub mod notion;
pub mod parser;
pub mod stream;
mod util;

pub use config::{ConvertOptions, PrintOptions, TableStyle};
pub use convert::NotionConverter;
pub use data::{AstNode, BlockType, CalloutType, TableType, Token, TokenKind};
pub use format::{live::process_inline_formatting, live::InlineFormatting, parse_rich_text};
pub use lexer::tokenize;
pub use notion::{NotionBlock, RichText};

/// Markdown text into a tree of blocks
pub fn parse(text: &str) -> Vec<AstNode> {
    parser::parse_tokens(&tokenize(text))
}

pub fn convert(nodes: &[AstNode]) -> Vec<NotionBlock> {
    convert_with(nodes, &ConvertOptions::default())
}

pub fn convert_with(nodes: &[AstNode], options: &ConvertOptions) -> Vec<NotionBlock> {
    NotionConverter::new(options).convert(nodes)
}

/// Whole pipeline: parse, then convert with default options
pub fn markdown_to_notion(text: &str) -> Vec<NotionBlock> {
    convert(&parse(text))
}

pub fn print(nodes: &[AstNode]) -> String {
    print_with(nodes, &PrintOptions::default())
}

pub fn print_with(nodes: &[AstNode], options: &PrintOptions) -> String {
    let mut output = String::new();
    match MarkdownPrinter::new(options).write_nodes_to(&mut output, &mut Context::default(), nodes) {
        Ok(()) => output,
        Err(err) => unreachable!("Writing into a string can't fail, but got: {err}"),
    }
}

/// Prints markdown into an io sink
pub fn print_to(
    nodes: &[AstNode],
    options: &PrintOptions,
    output: impl std::io::Write,
) -> Result<(), GenerationError> {
    let mut output = FmtToIo::new(output);
    MarkdownPrinter::new(options)
        .write_nodes_to(&mut output, &mut Context::default(), nodes)
        .map_err(|err| match output.get_error() {
            Some(io) => GenerationError::Io(io),
            None => err,
        })
}
