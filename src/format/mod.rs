//! Inline markdown formatting: `**bold**`, `*italic*`, `` `code` ``, `~~strikethrough~~` and `[links](url)`.
//!
//! Patterns are tried at every position of the text, in the order of [`INLINE_PATTERNS`].
//! Content of a matched span is parsed again, so a span can carry formatting of its own
//! (say, code inside a bold span), but only one level deep. Markup nested any deeper is kept as literal text:
//! `**bold with *italic and `code`* text**` gives bold "bold with ", bold+italic "italic and `code`" and bold " text".

pub mod live;

use std::ops::Range;

use itertools::Itertools;
use nom::{
    bytes::complete::tag,
    character::complete::char,
    error::{ErrorKind, ParseError},
    sequence::{delimited, preceded, tuple},
    IResult, Parser,
};

use crate::notion::{Annotations, RichText};

/// Spans nested deeper than this are left as they are
const MAX_DEPTH: usize = 2;

/// Characters a backslash turns into literals
const ESCAPABLE: [char; 6] = ['*', '`', '~', '[', ']', '\\'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlinePattern {
    Bold,
    Italic,
    Code,
    Strikethrough,
    Link,
}

/// Order patterns are attempted in, at each position
pub const INLINE_PATTERNS: [InlinePattern; 5] = [
    InlinePattern::Bold,
    InlinePattern::Italic,
    InlinePattern::Code,
    InlinePattern::Strikethrough,
    InlinePattern::Link,
];

/// A matched span: text between the delimiters, and link target, if that's a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span<'source> {
    inner: &'source str,
    url: Option<&'source str>,
}

impl InlinePattern {
    /// Opening and closing delimiters, as they appear around the content
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            InlinePattern::Bold => ("**", "**"),
            InlinePattern::Italic => ("*", "*"),
            InlinePattern::Code => ("`", "`"),
            InlinePattern::Strikethrough => ("~~", "~~"),
            InlinePattern::Link => ("[", ")"),
        }
    }

    fn span<'source>(&self, input: &'source str) -> IResult<&'source str, Span<'source>> {
        match self {
            InlinePattern::Bold => preceded(tag("**"), closed_by("**", true, bold_close))
                .map(Span::plain)
                .parse(input),
            InlinePattern::Italic => preceded(char('*'), closed_by("*", true, italic_close))
                .map(Span::plain)
                .parse(input),
            InlinePattern::Code => preceded(char('`'), closed_by("`", false, |_, _| true))
                .map(Span::plain)
                .parse(input),
            InlinePattern::Strikethrough => {
                preceded(tag("~~"), closed_by("~~", true, no_leading_space))
                    .map(Span::plain)
                    .parse(input)
            }
            InlinePattern::Link => link(input),
        }
    }

    fn apply(&self, style: &Style, url: Option<&str>) -> Style {
        let mut style = style.clone();
        match self {
            InlinePattern::Bold => style.annotations.bold = true,
            InlinePattern::Italic => style.annotations.italic = true,
            InlinePattern::Code => style.annotations.code = true,
            InlinePattern::Strikethrough => style.annotations.strikethrough = true,
            InlinePattern::Link => style.link = url.map(str::to_owned),
        }
        style
    }
}

impl<'source> Span<'source> {
    fn plain(inner: &'source str) -> Self {
        Self { inner, url: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Style {
    annotations: Annotations,
    link: Option<String>,
}

impl Style {
    fn run(&self, content: impl Into<String>) -> RichText {
        let run = RichText::new(content, self.annotations.clone());
        match &self.link {
            Some(url) => run.with_link(url.clone()),
            None => run,
        }
    }
}

/// Odd number of backslashes right before `index`
fn is_escaped(input: &str, index: usize) -> bool {
    input[..index]
        .chars()
        .rev()
        .take_while(|c| c == &'\\')
        .count()
        % 2
        == 1
}

fn no_leading_space(inner: &str, _: &str) -> bool {
    !inner.starts_with(char::is_whitespace)
}

/// `***x***` closes bold on the last pair of asterisks, leaving `*x*` inside
fn bold_close(inner: &str, after: &str) -> bool {
    no_leading_space(inner, after) && !after.starts_with('*')
}

fn italic_close(inner: &str, after: &str) -> bool {
    no_leading_space(inner, after)
        && !inner.starts_with('*')
        && !inner.ends_with('*')
        && !inner.ends_with(char::is_whitespace)
        && !after.starts_with('*')
}

/// Parses non-empty content up to the first closing delimiter satisfying `accept`, consuming the delimiter too
///
/// `accept` receives content candidate, and everything after the delimiter
fn closed_by<'source, E: ParseError<&'source str>>(
    close: &'static str,
    escapable: bool,
    accept: fn(&str, &str) -> bool,
) -> impl Fn(&'source str) -> IResult<&'source str, &'source str, E> {
    move |input: &'source str| {
        let found = input
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .filter(|i| input[*i..].starts_with(close))
            .filter(|i| !escapable || !is_escaped(input, *i))
            .find(|i| accept(&input[..*i], &input[(*i + close.len())..]));
        match found {
            Some(i) => Ok((&input[(i + close.len())..], &input[..i])),
            None => Err(nom::Err::Error(E::from_error_kind(
                input,
                ErrorKind::TakeUntil,
            ))),
        }
    }
}

/// Link target: no whitespace, parentheses must be balanced
fn link_url<'source, E: ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, &'source str, E> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                if i == 0 {
                    break;
                }
                return Ok((&input[i..], &input[..i]));
            }
            ')' => depth -= 1,
            c if c.is_whitespace() => break,
            _ => {}
        }
    }
    Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Char)))
}

fn link(input: &str) -> IResult<&str, Span<'_>> {
    tuple((
        preceded(
            char('['),
            closed_by("]", true, |inner, after| {
                !inner.contains(['[', ']']) && after.starts_with('(')
            }),
        ),
        delimited(char('('), link_url, char(')')),
    ))
    .map(|(inner, url)| Span {
        inner,
        url: Some(url),
    })
    .parse(input)
}

/// Piece of inline text, as seen by a left to right scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'source> {
    /// Single character, escaped ones included
    Literal(char),
    Span(InlinePattern, Span<'source>),
}

/// Highest priority span starting at `index`
///
/// Italic never opens right after another asterisk, so a half-typed `**bold*` stays literal.
fn span_at(text: &str, index: usize) -> Option<(InlinePattern, &str, Span<'_>)> {
    let rest = &text[index..];
    let after_asterisk = text[..index].ends_with('*');
    INLINE_PATTERNS
        .into_iter()
        .filter(|pattern| !(after_asterisk && *pattern == InlinePattern::Italic))
        .find_map(|pattern| {
            pattern
                .span(rest)
                .ok()
                .map(|(after, span)| (pattern, after, span))
        })
}

/// Walks the text, yielding characters and matched spans with their byte ranges
///
/// Spans are only looked for if `match_spans` is set, otherwise everything is literal.
fn pieces<'source>(
    text: &'source str,
    match_spans: bool,
) -> impl Iterator<Item = (Range<usize>, Piece<'source>)> + 'source {
    let mut index = 0;
    std::iter::from_fn(move || {
        let rest = &text[index..];
        let c = rest.chars().next()?;
        let start = index;
        let escaped = rest
            .strip_prefix('\\')
            .and_then(|escaped| escaped.chars().next())
            .filter(|escaped| ESCAPABLE.contains(escaped));
        if let Some(escaped) = escaped {
            index += 1 + escaped.len_utf8();
            return Some((start..index, Piece::Literal(escaped)));
        }
        if let Some((pattern, after, span)) = match_spans.then(|| span_at(text, index)).flatten() {
            index = text.len() - after.len();
            return Some((start..index, Piece::Span(pattern, span)));
        }
        index += c.len_utf8();
        Some((start..index, Piece::Literal(c)))
    })
}

/// Byte range, pattern and span of the first span in `text`
fn first_span(text: &str) -> Option<(Range<usize>, InlinePattern, Span<'_>)> {
    pieces(text, true).find_map(|(range, piece)| match piece {
        Piece::Span(pattern, span) => Some((range, pattern, span)),
        Piece::Literal(_) => None,
    })
}

fn parse_into(text: &str, style: &Style, depth: usize, output: &mut Vec<RichText>) {
    let mut literal = String::new();
    for (_, piece) in pieces(text, depth < MAX_DEPTH) {
        let (pattern, span) = match piece {
            Piece::Literal(c) => {
                literal.push(c);
                continue;
            }
            Piece::Span(pattern, span) => (pattern, span),
        };
        if !literal.is_empty() {
            output.push(style.run(std::mem::take(&mut literal)));
        }
        let inner_style = pattern.apply(style, span.url);
        match pattern {
            // code is literal
            InlinePattern::Code => output.push(inner_style.run(span.inner)),
            _ => parse_into(span.inner, &inner_style, depth + 1, output),
        }
    }
    if !literal.is_empty() {
        output.push(style.run(literal));
    }
}

/// Splits text into rich text runs, according to its inline formatting
///
/// Incomplete markup is kept as literal text. Adjacent runs of the same style are merged.
pub fn parse_rich_text(text: &str) -> Vec<RichText> {
    let mut runs = Vec::new();
    parse_into(text, &Style::default(), 0, &mut runs);
    runs.into_iter()
        .filter(|run| !run.content().is_empty())
        .coalesce(|mut a, b| {
            if a.same_style(&b) {
                a.text.content.push_str(b.content());
                Ok(a)
            } else {
                Err((a, b))
            }
        })
        .collect()
}
