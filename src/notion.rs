//! Notion API block shapes.
//!
//! These mirror the public block schema closely enough to be serialized straight into a
//! "append block children" request body. Children of hierarchical blocks live inside their
//! type payload, as the API expects on creation.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        self == &Annotations::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextContent {
    pub content: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RichTextKind {
    #[default]
    Text,
}

/// One styled run of text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RichText {
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: RichTextKind,
    pub text: TextContent,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Annotations,
}

impl RichText {
    pub fn new(content: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            kind: RichTextKind::Text,
            text: TextContent {
                content: content.into(),
                link: None,
            },
            annotations,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, Annotations::default())
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.text.link = Some(Link { url: url.into() });
        self
    }

    pub fn content(&self) -> &str {
        &self.text.content
    }

    pub fn url(&self) -> Option<&str> {
        self.text.link.as_ref().map(|l| l.url.as_str())
    }

    /// Both runs would render identically, were their contents the same
    pub fn same_style(&self, other: &RichText) -> bool {
        self.annotations == other.annotations && self.text.link == other.text.link
    }
}

/// Concatenated content of the runs, markup-free
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(RichText::content).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectKind {
    #[default]
    Block,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NotionBlock {
    pub object: ObjectKind,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: BlockData,
}

impl NotionBlock {
    pub fn new(data: BlockData) -> Self {
        Self {
            object: ObjectKind::Block,
            data,
        }
    }

    /// Notion's name for this block type
    pub fn kind(&self) -> &'static str {
        self.data.kind()
    }

    pub fn rich_text(&self) -> Option<&[RichText]> {
        self.data.rich_text()
    }

    pub fn children(&self) -> &[NotionBlock] {
        self.data.children()
    }

    pub fn is_toggleable(&self) -> bool {
        match &self.data {
            BlockData::Heading1 { heading_1: h }
            | BlockData::Heading2 { heading_2: h }
            | BlockData::Heading3 { heading_3: h } => h.is_toggleable,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BlockData {
    Paragraph {
        paragraph: TextBlock,
    },
    #[cfg_attr(feature = "serde", serde(rename = "heading_1"))]
    Heading1 {
        heading_1: HeadingBlock,
    },
    #[cfg_attr(feature = "serde", serde(rename = "heading_2"))]
    Heading2 {
        heading_2: HeadingBlock,
    },
    #[cfg_attr(feature = "serde", serde(rename = "heading_3"))]
    Heading3 {
        heading_3: HeadingBlock,
    },
    Toggle {
        toggle: TextBlock,
    },
    Callout {
        callout: CalloutBlock,
    },
    BulletedListItem {
        bulleted_list_item: TextBlock,
    },
    NumberedListItem {
        numbered_list_item: TextBlock,
    },
    ToDo {
        to_do: ToDoBlock,
    },
    Quote {
        quote: TextBlock,
    },
    Code {
        code: CodeBlock,
    },
    Table {
        table: TableBlock,
    },
    TableRow {
        table_row: TableRowBlock,
    },
    Divider {
        divider: EmptyBlock,
    },
    Audio {
        audio: ExternalBlock,
    },
    File {
        file: ExternalBlock,
    },
    Bookmark {
        bookmark: ExternalBlock,
    },
    Image {
        image: ExternalBlock,
    },
}

impl BlockData {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockData::Paragraph { .. } => "paragraph",
            BlockData::Heading1 { .. } => "heading_1",
            BlockData::Heading2 { .. } => "heading_2",
            BlockData::Heading3 { .. } => "heading_3",
            BlockData::Toggle { .. } => "toggle",
            BlockData::Callout { .. } => "callout",
            BlockData::BulletedListItem { .. } => "bulleted_list_item",
            BlockData::NumberedListItem { .. } => "numbered_list_item",
            BlockData::ToDo { .. } => "to_do",
            BlockData::Quote { .. } => "quote",
            BlockData::Code { .. } => "code",
            BlockData::Table { .. } => "table",
            BlockData::TableRow { .. } => "table_row",
            BlockData::Divider { .. } => "divider",
            BlockData::Audio { .. } => "audio",
            BlockData::File { .. } => "file",
            BlockData::Bookmark { .. } => "bookmark",
            BlockData::Image { .. } => "image",
        }
    }

    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            BlockData::Paragraph { paragraph: b }
            | BlockData::Toggle { toggle: b }
            | BlockData::BulletedListItem {
                bulleted_list_item: b,
            }
            | BlockData::NumberedListItem {
                numbered_list_item: b,
            }
            | BlockData::Quote { quote: b } => Some(&b.rich_text),
            BlockData::Heading1 { heading_1: h }
            | BlockData::Heading2 { heading_2: h }
            | BlockData::Heading3 { heading_3: h } => Some(&h.rich_text),
            BlockData::Callout { callout } => Some(&callout.rich_text),
            BlockData::ToDo { to_do } => Some(&to_do.rich_text),
            BlockData::Code { code } => Some(&code.rich_text),
            BlockData::Table { .. }
            | BlockData::TableRow { .. }
            | BlockData::Divider { .. }
            | BlockData::Audio { .. }
            | BlockData::File { .. }
            | BlockData::Bookmark { .. }
            | BlockData::Image { .. } => None,
        }
    }

    pub fn children(&self) -> &[NotionBlock] {
        match self {
            BlockData::Paragraph { paragraph: b }
            | BlockData::Toggle { toggle: b }
            | BlockData::BulletedListItem {
                bulleted_list_item: b,
            }
            | BlockData::NumberedListItem {
                numbered_list_item: b,
            }
            | BlockData::Quote { quote: b } => &b.children,
            BlockData::Heading1 { heading_1: h }
            | BlockData::Heading2 { heading_2: h }
            | BlockData::Heading3 { heading_3: h } => &h.children,
            BlockData::Callout { callout } => &callout.children,
            BlockData::ToDo { to_do } => &to_do.children,
            BlockData::Table { table } => &table.children,
            BlockData::Code { .. }
            | BlockData::TableRow { .. }
            | BlockData::Divider { .. }
            | BlockData::Audio { .. }
            | BlockData::File { .. }
            | BlockData::Bookmark { .. }
            | BlockData::Image { .. } => &[],
        }
    }
}

/// Payload shared by every block that is "just text": paragraphs, toggles, quotes, list items
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    pub rich_text: Vec<RichText>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Color,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<NotionBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingBlock {
    pub rich_text: Vec<RichText>,
    pub is_toggleable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Color,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<NotionBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Icon {
    Emoji { emoji: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalloutBlock {
    pub rich_text: Vec<RichText>,
    pub icon: Icon,
    pub color: Color,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<NotionBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToDoBlock {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Color,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<NotionBlock>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeBlock {
    pub rich_text: Vec<RichText>,
    pub language: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableBlock {
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
    pub children: Vec<NotionBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRowBlock {
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmptyBlock {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FileKind {
    #[default]
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalUrl {
    pub url: String,
}

/// Payload of media blocks pointing to an external url
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalBlock {
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: FileKind,
    pub external: ExternalUrl,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub caption: Vec<RichText>,
}

impl ExternalBlock {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            kind: FileKind::External,
            external: ExternalUrl { url: url.into() },
            caption: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.external.url
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn paragraph_wire_shape() {
        // arrange
        let block = NotionBlock::new(BlockData::Paragraph {
            paragraph: TextBlock {
                rich_text: vec![RichText::plain("hi").with_link("https://notion.so")],
                ..TextBlock::default()
            },
        });

        // act
        let value = serde_json::to_value(&block).expect("Should serialize");

        // assert
        assert_eq!(
            value,
            serde_json::json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [{
                        "type": "text",
                        "text": { "content": "hi", "link": { "url": "https://notion.so" } },
                        "annotations": {
                            "bold": false, "italic": false, "strikethrough": false,
                            "underline": false, "code": false, "color": "default"
                        }
                    }],
                    "color": "default"
                }
            })
        );
    }

    #[test]
    fn heading_and_callout_names() {
        // arrange
        let heading = NotionBlock::new(BlockData::Heading2 {
            heading_2: HeadingBlock {
                is_toggleable: true,
                ..HeadingBlock::default()
            },
        });
        let callout = NotionBlock::new(BlockData::Callout {
            callout: CalloutBlock {
                rich_text: Vec::new(),
                icon: Icon::Emoji {
                    emoji: "💡".into(),
                },
                color: Color::GreenBackground,
                children: Vec::new(),
            },
        });

        // act
        let heading = serde_json::to_value(&heading).expect("Should serialize");
        let callout = serde_json::to_value(&callout).expect("Should serialize");

        // assert
        assert_eq!(heading["type"], "heading_2");
        assert_eq!(heading["heading_2"]["is_toggleable"], true);
        assert_eq!(callout["callout"]["icon"]["type"], "emoji");
        assert_eq!(callout["callout"]["color"], "green_background");
    }

    #[test]
    fn blocks_deserialize_back() {
        // arrange
        let block = NotionBlock::new(BlockData::Audio {
            audio: ExternalBlock::new("https://example.com/a.mp3"),
        });

        // act
        let json = serde_json::to_string(&block).expect("Should serialize");
        let back: NotionBlock = serde_json::from_str(&json).expect("Should deserialize");

        // assert
        assert_eq!(back, block);
        assert_eq!(json.matches("\"external\"").count(), 2);
    }
}
