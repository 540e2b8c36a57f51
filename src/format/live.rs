//! As-you-type formatting for the editor.
//!
//! On every keystroke the editor hands over its text and the cursor. If the line under the cursor
//! now holds a complete markdown span, the first one found is swapped for its HTML counterpart,
//! and the cursor is moved to account for the length change.

use super::{first_span, pieces, InlinePattern, Piece, Span, MAX_DEPTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFormatting {
    pub applied: bool,
    pub new_text: String,
    /// Byte offset into `new_text`
    pub new_cursor_position: usize,
}

impl InlinePattern {
    /// HTML element a span turns into
    fn html(&self, span: &Span<'_>, depth: usize) -> String {
        let inner = match self {
            InlinePattern::Code => span.inner.to_owned(),
            _ => inner_html(span.inner, depth + 1),
        };
        match self {
            InlinePattern::Bold => format!("<strong>{inner}</strong>"),
            InlinePattern::Italic => format!("<em>{inner}</em>"),
            InlinePattern::Code => format!("<code>{inner}</code>"),
            InlinePattern::Strikethrough => format!("<s>{inner}</s>"),
            InlinePattern::Link => {
                let url = span.url.unwrap_or_default();
                format!("<a href=\"{}\">{inner}</a>", url.replace('"', "&quot;"))
            }
        }
    }
}

/// Span content, with escapes resolved and nested spans turned into HTML as well
fn inner_html(text: &str, depth: usize) -> String {
    pieces(text, depth < MAX_DEPTH)
        .map(|(_, piece)| match piece {
            Piece::Literal(c) => c.to_string(),
            Piece::Span(pattern, span) => pattern.html(&span, depth),
        })
        .collect()
}

/// Clamps the cursor into the text, moving it back onto a char boundary
fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Replaces the first complete markdown span on the cursor's line with HTML
///
/// `cursor_position` is a UTF-8 byte offset into `text`, not a character index. Past the end, it's clamped
/// to the text length, and inside of a multibyte character it's moved back to that character's start.
///
/// Only the line containing the cursor is inspected. Spans are recognized exactly as [`super::parse_rich_text`]
/// recognizes them: the leftmost one wins, with backslash escapes and nesting handled the same way.
pub fn process_inline_formatting(text: &str, cursor_position: usize) -> InlineFormatting {
    let cursor = clamp_cursor(text, cursor_position);
    let line_start = text[..cursor].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[cursor..].find('\n').map_or(text.len(), |i| cursor + i);
    let line = &text[line_start..line_end];

    let Some((range, pattern, span)) = first_span(line) else {
        return InlineFormatting {
            applied: false,
            new_text: text.to_owned(),
            new_cursor_position: cursor,
        };
    };
    let replacement = pattern.html(&span, 0);
    let start = line_start + range.start;
    let end = line_start + range.end;

    let mut new_text = String::with_capacity(text.len() + replacement.len());
    new_text.push_str(&text[..start]);
    new_text.push_str(&replacement);
    new_text.push_str(&text[end..]);

    let new_cursor_position = if cursor >= end {
        cursor - (end - start) + replacement.len()
    } else if cursor > start {
        start + replacement.len()
    } else {
        cursor
    };
    log::trace!("Live {pattern:?} applied at {start}..{end}");

    InlineFormatting {
        applied: true,
        new_text,
        new_cursor_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        {$name:ident, $input:literal, $cursor:expr, $text:literal, $new_cursor:expr} => {
            #[test]
            fn $name() {
                // arrange

                // act
                let result = process_inline_formatting($input, $cursor);

                // assert
                assert!(result.applied, "Formatting should apply to {:?}", $input);
                assert_eq!(result.new_text, $text);
                assert_eq!(result.new_cursor_position, $new_cursor);
            }
        };
        {$name:ident, $input:literal, $cursor:expr} => {
            #[test]
            fn $name() {
                // arrange

                // act
                let result = process_inline_formatting($input, $cursor);

                // assert
                assert!(!result.applied, "Nothing should apply to {:?}", $input);
                assert_eq!(result.new_text, $input);
            }
        };
    }

    test! {bold, "make **this** bold", 12, "make <strong>this</strong> bold", 26}
    test! {italic, "*word*", 6, "<em>word</em>", 13}
    test! {code, "call `f()` here", 10, "call <code>f()</code> here", 21}
    test! {strikethrough, "~~old~~ new", 11, "<s>old</s> new", 14}
    test! {link, "[site](https://notion.so)", 25, "<a href=\"https://notion.so\">site</a>", 36}
    test! {cursor_before_match, "x **y**", 0, "x <strong>y</strong>", 0}
    test! {cursor_inside_match, "**abc**", 3, "<strong>abc</strong>", 20}
    test! {bold_before_italic, "**a** *b*", 9, "<strong>a</strong> *b*", 22}
    test! {other_lines_untouched, "**a**\nplain *b*", 15, "**a**\nplain <em>b</em>", 22}
    test! {cursor_past_end, "*a*", 100, "<em>a</em>", 10}

    test! {incomplete_bold, "**almost*", 9}
    test! {escaped_asterisks, r"\*not italic\*", 14}
    test! {link_with_parentheses, "[wiki](https://en.wikipedia.org/wiki/Rust_(language))", 53,
        "<a href=\"https://en.wikipedia.org/wiki/Rust_(language)\">wiki</a>", 64}
    test! {bold_italic, "***both***", 10, "<strong><em>both</em></strong>", 30}
    test! {escape_inside_span, r"**a \** b**", 11, "<strong>a ** b</strong>", 23}
    test! {spaced, "2 * 3 * 4", 9}
    test! {lone_asterisk_of_bold, "**a *b", 6}
    test! {match_on_another_line, "**a**\nplain", 8}
    test! {empty, "", 0}

    #[test]
    fn agrees_with_rich_text() {
        let inputs = [
            "plain text",
            "**a *b",
            "**almost*",
            r"\*not italic\*",
            "***both***",
            "[wiki](https://en.wikipedia.org/wiki/Rust_(language))",
            "[label](not a url)",
            "a ` b",
            "~~gone~~",
        ];
        for input in inputs {
            // arrange
            let styled = crate::format::parse_rich_text(input)
                .iter()
                .any(|run| !run.annotations.is_plain() || run.url().is_some());

            // act
            let result = process_inline_formatting(input, input.len());

            // assert
            assert_eq!(result.applied, styled, "Live and static formatting differ on {input:?}");
        }
    }

    #[test]
    fn cursor_on_char_boundary() {
        // arrange
        let text = "é *a*";

        // act
        let result = process_inline_formatting(text, 1);

        // assert
        assert!(result.applied);
        assert_eq!(result.new_cursor_position, 0);
    }
}
