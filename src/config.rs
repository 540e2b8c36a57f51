use smart_default::SmartDefault;

/// How tables get printed back into markdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TableStyle {
    /// Markdown `| a | b |` table, whatever the table was written as
    #[default]
    Pipe,
    /// Delimiter recorded at parse time: csv stays csv, tsv stays tsv
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, SmartDefault)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    /// Spaces per nesting level of list items
    #[default = 2]
    pub indent_width: usize,
    pub table_style: TableStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, SmartDefault)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Longest text content of a single rich text run Notion accepts
    #[default = 2000]
    pub max_text_length: usize,
    /// Code block language used when the one specified is not known to Notion
    #[default = "plain text"]
    pub code_language_fallback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let print = PrintOptions::default();
        let convert = ConvertOptions::default();

        assert_eq!(print.indent_width, 2);
        assert_eq!(print.table_style, TableStyle::Pipe);
        assert_eq!(convert.max_text_length, 2000);
        assert_eq!(convert.code_language_fallback, "plain text");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_options_deserialize() {
        // arrange
        let json = r#"{ "table_style": "preserve" }"#;

        // act
        let options: PrintOptions = serde_json::from_str(json).expect("Should deserialize");

        // assert
        assert_eq!(options.indent_width, 2);
        assert_eq!(options.table_style, TableStyle::Preserve);
    }
}
