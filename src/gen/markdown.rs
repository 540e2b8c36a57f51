//! AST back to markdown.
//!
//! Output is meant to be parsed again into the same tree, so every block is written in the form
//! the lexer recognizes it by: blocks are separated by blank lines, list items by single line breaks,
//! toggles and callouts are quote groups.

use std::fmt::Write;

use itertools::Itertools;

use super::{OutputGenerator, Res};
use crate::{
    config::{PrintOptions, TableStyle},
    data::{AstNode, BlockType, CalloutType, TableType},
};

#[derive(Debug, Clone, Default)]
pub struct Context {
    /// List nesting level
    pub depth: usize,
    /// Number of the numbered list item being written
    number: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkdownPrinter<'options> {
    options: &'options PrintOptions,
}

/// Writes every line prefixed with `> `, empty lines as a lone `>`
fn write_quoted<W: Write + ?Sized>(output: &mut W, text: &str) -> Res {
    let lines = text
        .split('\n')
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                ">".to_owned()
            } else {
                format!("> {line}")
            }
        })
        .join("\n");
    output.write_str(&lines)?;
    Ok(())
}

fn escape_pipe_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

fn escape_csv_cell(cell: &str) -> String {
    if cell.contains([',', '"']) || cell.trim() != cell {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}

/// Fence long enough not to be closed by anything inside of the code
fn code_fence(code: &str) -> String {
    let longest = code
        .lines()
        .map(|line| line.trim().chars().take_while(|c| c == &'`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

impl<'options> MarkdownPrinter<'options> {
    pub fn new(options: &'options PrintOptions) -> Self {
        Self { options }
    }

    fn write_list_item<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        node: &AstNode,
    ) -> Res {
        let indent = " ".repeat(context.depth * self.options.indent_width.max(1));
        let marker = match node.kind {
            BlockType::NumberedListItem => format!("{}.", context.number.max(1)),
            BlockType::ToDo if node.meta.checked == Some(true) => "- [x]".to_owned(),
            BlockType::ToDo => "- [ ]".to_owned(),
            _ => "-".to_owned(),
        };
        write!(output, "{indent}{marker} {}", node.content)?;
        if !node.children.is_empty() {
            output.write_char('\n')?;
            let mut nested = Context {
                depth: context.depth + 1,
                number: 0,
            };
            self.write_nodes_to(output, &mut nested, &node.children)?;
        }
        Ok(())
    }

    /// Toggle title followed by its body, all in one quote group
    fn write_toggle<W: Write + ?Sized>(&self, output: &mut W, title: &str, node: &AstNode) -> Res {
        write_quoted(output, title)?;
        for child in &node.children {
            output.write_char('\n')?;
            write_quoted(output, &child.content)?;
        }
        Ok(())
    }

    fn write_pipe_table<W: Write + ?Sized>(&self, output: &mut W, rows: &[&[String]]) -> Res {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0).max(1);
        let line = |cells: &[String]| {
            format!(
                "| {} |",
                cells.iter().map(|cell| escape_pipe_cell(cell)).join(" | ")
            )
        };
        let separator = format!("| {} |", std::iter::repeat("---").take(width).join(" | "));
        let lines = rows
            .iter()
            .take(1)
            .map(|row| line(row))
            .chain(std::iter::once(separator))
            .chain(rows.iter().skip(1).map(|row| line(row)))
            .join("\n");
        output.write_str(&lines)?;
        Ok(())
    }

    fn write_table<W: Write + ?Sized>(&self, output: &mut W, node: &AstNode) -> Res {
        let rows: Vec<&[String]> = node
            .children
            .iter()
            .map(|row| row.meta.cells.as_slice())
            .collect();
        let width = rows.first().map_or(0, |row| row.len());
        // a delimited table needs at least two rows of the same width to be recognized again
        let delimited = rows.len() >= 2 && width >= 2 && rows.iter().all(|row| row.len() == width);
        let lines = match (self.options.table_style, node.meta.table_type) {
            (TableStyle::Preserve, Some(TableType::Csv)) if delimited => rows
                .iter()
                .map(|row| row.iter().map(|cell| escape_csv_cell(cell)).join(","))
                .join("\n"),
            (TableStyle::Preserve, Some(TableType::Tsv)) if delimited => {
                rows.iter().map(|row| row.join("\t")).join("\n")
            }
            _ => return self.write_pipe_table(output, &rows),
        };
        output.write_str(&lines)?;
        Ok(())
    }
}

impl OutputGenerator<Context> for MarkdownPrinter<'_> {
    fn write_to<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        node: &AstNode,
    ) -> Res {
        match node.kind {
            BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
                let level = node.kind.heading_level().unwrap_or(1) as usize;
                let title = format!("{} {}", "#".repeat(level), node.content);
                if node.is_toggleable() {
                    self.write_toggle(output, &title, node)?;
                } else {
                    output.write_str(&title)?;
                    if !node.children.is_empty() {
                        output.write_str("\n\n")?;
                        self.write_nodes_to(output, &mut Context::default(), &node.children)?;
                    }
                }
            }
            BlockType::Toggle => self.write_toggle(output, &node.content, node)?,
            BlockType::Callout => {
                let label = node
                    .meta
                    .callout_type
                    .unwrap_or(CalloutType::Unknown)
                    .as_str();
                let (first, rest) = node
                    .content
                    .split_once('\n')
                    .map_or((node.content.as_str(), None), |(first, rest)| {
                        (first, Some(rest))
                    });
                write!(output, "> [!{label}]")?;
                if !first.trim().is_empty() {
                    write!(output, " {}", first.trim_end())?;
                }
                if let Some(rest) = rest {
                    output.write_char('\n')?;
                    write_quoted(output, rest)?;
                }
            }
            BlockType::Quote => write_quoted(output, &node.content)?,
            BlockType::BulletedListItem | BlockType::NumberedListItem | BlockType::ToDo => {
                self.write_list_item(output, context, node)?
            }
            BlockType::Code => {
                let fence = code_fence(&node.content);
                // a backtick would end the info string
                let language: String = node
                    .meta
                    .language
                    .as_deref()
                    .unwrap_or_default()
                    .chars()
                    .filter(|c| c != &'`')
                    .collect();
                if node.content.is_empty() {
                    write!(output, "{fence}{language}\n{fence}")?;
                } else {
                    write!(output, "{fence}{language}\n{}\n{fence}", node.content)?;
                }
            }
            BlockType::Table => self.write_table(output, node)?,
            BlockType::Divider => output.write_str("---")?,
            BlockType::Audio | BlockType::File | BlockType::Bookmark => {
                output.write_str(node.meta.url.as_deref().unwrap_or(&node.content))?
            }
            BlockType::Image => {
                let url = node.meta.url.as_deref().unwrap_or(&node.content);
                // a bare url only stays an image with an image extension
                let alt = if node.content == url { "" } else { node.content.as_str() };
                write!(output, "![{alt}]({url})")?;
            }
            BlockType::Paragraph | BlockType::TableRow | BlockType::Unsupported => {
                output.write_str(&node.content)?
            }
        }
        Ok(())
    }

    /// Blank line between blocks, single line break between list items
    fn write_nodes_to<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        nodes: &[AstNode],
    ) -> Res {
        let mut number = 0;
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                let previous = nodes[i - 1].kind;
                let separator = if previous.is_list_item() && node.kind.is_list_item() {
                    "\n"
                } else {
                    "\n\n"
                };
                output.write_str(separator)?;
            }
            number = if node.kind == BlockType::NumberedListItem {
                number + 1
            } else {
                0
            };
            context.number = number;
            self.write_to(output, context, node)?;
        }
        Ok(())
    }
}
