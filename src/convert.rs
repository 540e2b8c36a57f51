//! AST to Notion blocks.

use log::warn;

use crate::{
    config::ConvertOptions,
    data::{AstNode, BlockType, CalloutType},
    format::parse_rich_text,
    notion::{
        BlockData, CalloutBlock, CodeBlock, Color, EmptyBlock, ExternalBlock, HeadingBlock, Icon,
        NotionBlock, RichText, TableBlock, TableRowBlock, TextBlock, ToDoBlock,
    },
    util::split_chunks,
};

/// Languages of code blocks Notion knows about
const NOTION_LANGUAGES: [&str; 72] = [
    "abap", "arduino", "bash", "basic", "c", "clojure", "coffeescript", "c++", "c#", "css",
    "dart", "diff", "docker", "elixir", "elm", "erlang", "flow", "fortran", "f#", "gherkin",
    "glsl", "go", "graphql", "groovy", "haskell", "html", "java", "javascript", "json", "julia",
    "kotlin", "latex", "less", "lisp", "livescript", "lua", "makefile", "markdown", "markup",
    "matlab", "mermaid", "nix", "objective-c", "ocaml", "pascal", "perl", "php", "plain text",
    "powershell", "prolog", "protobuf", "python", "r", "reason", "ruby", "rust", "sass", "scala",
    "scheme", "scss", "shell", "sql", "swift", "typescript", "vb.net", "verilog", "vhdl",
    "visual basic", "webassembly", "xml", "yaml", "java/c/c++/c#",
];

/// Common fence names that Notion spells differently
fn language_alias(language: &str) -> Option<&'static str> {
    Some(match language {
        "js" | "jsx" | "mjs" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" | "python3" => "python",
        "rs" => "rust",
        "sh" | "zsh" | "console" => "shell",
        "ps" | "ps1" | "pwsh" => "powershell",
        "yml" => "yaml",
        "cpp" | "cxx" | "hpp" => "c++",
        "cs" | "csharp" => "c#",
        "fs" | "fsharp" => "f#",
        "md" => "markdown",
        "golang" => "go",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "dockerfile" => "docker",
        "make" => "makefile",
        "tex" => "latex",
        "objc" => "objective-c",
        "proto" => "protobuf",
        "wasm" => "webassembly",
        "text" | "txt" | "plaintext" | "plain" => "plain text",
        "htm" | "xhtml" => "html",
        _ => return None,
    })
}

/// Emoji and background color of a callout type
pub fn callout_style(callout_type: Option<CalloutType>) -> (&'static str, Color) {
    match callout_type.unwrap_or(CalloutType::Unknown) {
        CalloutType::Note => ("📝", Color::BlueBackground),
        CalloutType::Info => ("ℹ️", Color::BlueBackground),
        CalloutType::Tip => ("💡", Color::GreenBackground),
        CalloutType::Warning => ("⚠️", Color::YellowBackground),
        CalloutType::Danger => ("🚨", Color::RedBackground),
        CalloutType::Success => ("✅", Color::GreenBackground),
        CalloutType::Unknown => ("💬", Color::GrayBackground),
    }
}

/// Converts AST nodes into Notion blocks
#[derive(Debug, Clone, Copy)]
pub struct NotionConverter<'options> {
    options: &'options ConvertOptions,
}

impl<'options> NotionConverter<'options> {
    pub fn new(options: &'options ConvertOptions) -> Self {
        Self { options }
    }

    /// One block per node, children nested inside their parent's block
    pub fn convert(&self, nodes: &[AstNode]) -> Vec<NotionBlock> {
        nodes.iter().map(|node| self.convert_node(node)).collect()
    }

    /// Splits runs exceeding the length limit into several runs of the same style
    fn limit_runs(&self, runs: Vec<RichText>) -> Vec<RichText> {
        let max = self.options.max_text_length;
        runs.into_iter()
            .flat_map(|run| {
                if run.content().chars().count() <= max {
                    return vec![run];
                }
                split_chunks(run.content(), max)
                    .into_iter()
                    .map(|chunk| {
                        let mut piece = run.clone();
                        piece.text.content = chunk.to_owned();
                        piece
                    })
                    .collect()
            })
            .collect()
    }

    fn rich_text(&self, node: &AstNode) -> Vec<RichText> {
        self.limit_runs(node.rich_text())
    }

    /// Text as is, with no formatting
    fn plain_text(&self, text: &str) -> Vec<RichText> {
        if text.is_empty() {
            return Vec::new();
        }
        self.limit_runs(vec![RichText::plain(text)])
    }

    fn language(&self, language: Option<&str>) -> String {
        let Some(language) = language.map(str::to_ascii_lowercase) else {
            return self.options.code_language_fallback.clone();
        };
        if NOTION_LANGUAGES.contains(&language.as_str()) {
            return language;
        }
        match language_alias(&language) {
            Some(alias) => alias.to_owned(),
            None => self.options.code_language_fallback.clone(),
        }
    }

    fn text_block(&self, node: &AstNode) -> TextBlock {
        TextBlock {
            rich_text: self.rich_text(node),
            color: Color::Default,
            children: self.convert(&node.children),
        }
    }

    fn heading_block(&self, node: &AstNode) -> HeadingBlock {
        HeadingBlock {
            rich_text: self.rich_text(node),
            is_toggleable: node.is_toggleable(),
            color: Color::Default,
            children: self.convert(&node.children),
        }
    }

    fn external_block(&self, node: &AstNode) -> ExternalBlock {
        let url = node.meta.url.as_deref().unwrap_or(&node.content);
        let mut block = ExternalBlock::new(url);
        if node.kind == BlockType::Image && !node.content.is_empty() && node.content != url {
            block.caption = self.limit_runs(parse_rich_text(&node.content));
        }
        block
    }

    fn table_row(&self, row: &AstNode, width: usize) -> TableRowBlock {
        let mut cells: Vec<Vec<RichText>> = match &row.meta.cell_rich_text {
            Some(cells) => cells.clone(),
            None => row.meta.cells.iter().map(|c| parse_rich_text(c)).collect(),
        };
        cells.resize_with(width, Vec::new);
        TableRowBlock {
            cells: cells
                .into_iter()
                .map(|cell| self.limit_runs(cell))
                .collect(),
        }
    }

    fn table_block(&self, node: &AstNode) -> TableBlock {
        let rows: Vec<&AstNode> = node
            .children
            .iter()
            .filter(|row| row.kind == BlockType::TableRow)
            .collect();
        let width = rows
            .iter()
            .map(|row| {
                row.meta
                    .cell_rich_text
                    .as_ref()
                    .map_or(row.meta.cells.len(), Vec::len)
            })
            .max()
            .unwrap_or(0)
            .max(1);
        TableBlock {
            table_width: width,
            has_column_header: true,
            has_row_header: false,
            children: rows
                .into_iter()
                .map(|row| {
                    NotionBlock::new(BlockData::TableRow {
                        table_row: self.table_row(row, width),
                    })
                })
                .collect(),
        }
    }

    /// Anything not convertible on its own turns into a paragraph with a single unformatted run of the raw content,
    /// an empty one included
    fn fallback(&self, node: &AstNode) -> NotionBlock {
        warn!(
            "Can't convert {} node on its own, falling back to a paragraph",
            node.kind
        );
        NotionBlock::new(BlockData::Paragraph {
            paragraph: TextBlock {
                rich_text: self.limit_runs(vec![RichText::plain(node.content.as_str())]),
                ..TextBlock::default()
            },
        })
    }

    pub fn convert_node(&self, node: &AstNode) -> NotionBlock {
        let data = match node.kind {
            BlockType::Paragraph => BlockData::Paragraph {
                paragraph: self.text_block(node),
            },
            BlockType::Heading1 => BlockData::Heading1 {
                heading_1: self.heading_block(node),
            },
            BlockType::Heading2 => BlockData::Heading2 {
                heading_2: self.heading_block(node),
            },
            BlockType::Heading3 => BlockData::Heading3 {
                heading_3: self.heading_block(node),
            },
            BlockType::Toggle => BlockData::Toggle {
                toggle: self.text_block(node),
            },
            BlockType::Callout => {
                let (emoji, color) = callout_style(node.meta.callout_type);
                BlockData::Callout {
                    callout: CalloutBlock {
                        rich_text: self.rich_text(node),
                        icon: Icon::Emoji {
                            emoji: emoji.to_owned(),
                        },
                        color,
                        children: self.convert(&node.children),
                    },
                }
            }
            BlockType::BulletedListItem => BlockData::BulletedListItem {
                bulleted_list_item: self.text_block(node),
            },
            BlockType::NumberedListItem => BlockData::NumberedListItem {
                numbered_list_item: self.text_block(node),
            },
            BlockType::ToDo => BlockData::ToDo {
                to_do: ToDoBlock {
                    rich_text: self.rich_text(node),
                    checked: node.meta.checked.unwrap_or(false),
                    color: Color::Default,
                    children: self.convert(&node.children),
                },
            },
            BlockType::Quote => BlockData::Quote {
                quote: self.text_block(node),
            },
            BlockType::Code => BlockData::Code {
                code: CodeBlock {
                    rich_text: self.plain_text(&node.content),
                    language: self.language(node.meta.language.as_deref()),
                    caption: Vec::new(),
                },
            },
            BlockType::Table => BlockData::Table {
                table: self.table_block(node),
            },
            BlockType::Divider => BlockData::Divider {
                divider: EmptyBlock {},
            },
            BlockType::Audio => BlockData::Audio {
                audio: self.external_block(node),
            },
            BlockType::File => BlockData::File {
                file: self.external_block(node),
            },
            BlockType::Bookmark => BlockData::Bookmark {
                bookmark: self.external_block(node),
            },
            BlockType::Image => BlockData::Image {
                image: self.external_block(node),
            },
            BlockType::TableRow | BlockType::Unsupported => return self.fallback(node),
        };
        NotionBlock::new(data)
    }
}
