//! Line-oriented markdown lexer.
//!
//! Input is looked at one line at a time. Each line is offered to a list of classifiers, in a fixed order,
//! and the first one to recognize it produces token(s) for it (multi-line constructs consume several lines at once).
//! Lines nobody recognizes become plain text. The order matters a lot: audio links must be seen before bookmarks,
//! toggle headings before quotes, tables before text.

use log::trace;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit1, none_of, one_of, space0, space1},
    combinator::{all_consuming, eof, map, not, value, verify},
    multi::{fold_many0, many1_count, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult, Parser,
};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{
    data::{CalloutType, Position, TableType, Token, TokenKind, TokenMeta},
    util::{indent_width, normalize_line_endings},
};

const AUDIO_EXTENSIONS: [&str; 9] = ["mp3", "wav", "ogg", "oga", "m4a", "aac", "flac", "opus", "wma"];
const IMAGE_EXTENSIONS: [&str; 12] = [
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "tif", "tiff", "heic", "ico", "avif",
];
const FILE_EXTENSIONS: [&str; 19] = [
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf", "txt", "csv",
    "zip", "rar", "7z", "tar", "gz", "epub",
];

/// Hosts serving audio, whatever the url looks like
static AUDIO_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|\.)(soundcloud\.com|snd\.sc)$").expect("Audio host pattern should compile")
});

/// Tokens produced from the lines at hand, along with number of lines they span
#[derive(Debug, Clone, PartialEq)]
struct Lexed {
    tokens: Vec<Token>,
    consumed: usize,
}

impl Lexed {
    fn single(token: Token) -> Self {
        Self {
            tokens: vec![token],
            consumed: 1,
        }
    }
}

/// Classifier receives all remaining lines, and the (1-based) number of the first one
type Classifier = fn(&[&str], usize) -> Option<Lexed>;

/// Classifiers of lines that start a block on their own
const BLOCK_CLASSIFIERS: [(&str, Classifier); 7] = [
    ("blank", blank_lines),
    ("code fence", fenced_code),
    ("quote group", quote_group),
    ("heading", heading),
    ("divider", divider),
    ("list item", list_item),
    ("media", media),
];

/// Runs a marker parser, forgetting the error (no line is ever *wrong*, it's just not this particular kind)
fn run<'source, O>(
    mut parser: impl Parser<&'source str, O, nom::error::Error<&'source str>>,
    input: &'source str,
) -> Option<(&'source str, O)> {
    parser.parse(input).ok()
}

fn position(line: &str, line_number: usize) -> Position {
    let leading = line.chars().take_while(|c| c.is_whitespace()).count();
    let column = if leading == line.chars().count() {
        1
    } else {
        leading + 1
    };
    Position::new(line_number, column)
}

fn token(kind: TokenKind, content: impl Into<String>, line: &str, line_number: usize) -> Token {
    Token::new(kind, content, position(line, line_number))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Heading marker, `#` through `######` and a space
///
/// Returns number of hashes
fn heading_marker<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, usize, E> {
    verify(terminated(many1_count(char('#')), space1), |count: &usize| {
        *count <= 6
    })(input)
}

/// Code fence opening, three or more backticks or tildes
///
/// Info string after backticks can't hold a backtick itself, so ```` ```code``` ```` is not a fence.
fn fence<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, &'source str, E> {
    alt((
        terminated(
            take_while_m_n(3, usize::MAX, |c: char| c == '`'),
            not(take_until("`")),
        ),
        take_while_m_n(3, usize::MAX, |c: char| c == '~'),
    ))(input)
}

/// `>` and a single optional space after it
fn quote_marker<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, (), E> {
    value((), pair(char('>'), take_while_m_n(0, 1, |c: char| c == ' ')))(input)
}

/// `[!type]` opening a callout
fn callout_marker<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, &'source str, E> {
    terminated(
        delimited(
            tag("[!"),
            take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
            char(']'),
        ),
        space0,
    )(input)
}

/// Thematic break made of `marker` characters, spaces allowed between them
fn thematic_break<'source, E: nom::error::ParseError<&'source str>>(
    marker: char,
) -> impl FnMut(&'source str) -> IResult<&'source str, usize, E> {
    verify(many1_count(terminated(char(marker), space0)), |count: &usize| {
        *count >= 3
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Todo { checked: bool },
    Bulleted,
    Numbered,
}

impl ListMarker {
    fn kind(&self) -> TokenKind {
        match self {
            ListMarker::Todo { .. } => TokenKind::ListItemTodo,
            ListMarker::Bulleted => TokenKind::ListItemBulleted,
            ListMarker::Numbered => TokenKind::ListItemNumbered,
        }
    }
}

/// List item marker, including the checkbox, if any
fn list_marker<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, ListMarker, E> {
    alt((
        map(
            terminated(
                preceded(
                    pair(one_of("-*+"), space1),
                    delimited(char('['), one_of(" xX"), char(']')),
                ),
                alt((space1, eof)),
            ),
            |mark: char| ListMarker::Todo {
                checked: mark != ' ',
            },
        ),
        value(ListMarker::Bulleted, pair(one_of("-*+"), space1)),
        value(
            ListMarker::Numbered,
            tuple((digit1, one_of(".)"), space1)),
        ),
    ))(input)
}

/// Image in markdown syntax, `![alt](url)`
fn image_markdown<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, (&'source str, &'source str), E> {
    pair(
        delimited(tag("!["), take_until("]("), tag("](")),
        terminated(
            take_while1(|c: char| c != ')' && !c.is_whitespace()),
            char(')'),
        ),
    )(input)
}

fn csv_quoted<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, String, E> {
    delimited(
        char('"'),
        fold_many0(
            alt((none_of("\""), value('"', tag("\"\"")))),
            String::new,
            |mut field: String, c: char| {
                field.push(c);
                field
            },
        ),
        char('"'),
    )(input)
}

fn csv_field<'source, E: nom::error::ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, String, E> {
    delimited(
        space0,
        alt((
            csv_quoted,
            map(take_while(|c: char| c != ','), |field: &str| {
                field.trim().to_owned()
            }),
        )),
        space0,
    )(input)
}

/// Comma separated row, with optionally double-quoted fields
fn csv_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if !line.contains(',') {
        return None;
    }
    run(all_consuming(separated_list1(char(','), csv_field)), line)
        .map(|(_, cells)| cells)
        .filter(|cells| cells.len() >= 2)
}

fn tsv_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim_matches(' ');
    if !line.contains('\t') {
        return None;
    }
    let cells: Vec<_> = line.split('\t').map(|c| c.trim().to_owned()).collect();
    (cells.len() >= 2).then_some(cells)
}

fn is_pipe_row(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('|') && line[1..].contains('|')
}

/// Splits `| a | b |` into cells. `\|` stands for a pipe inside of a cell
pub(crate) fn pipe_cells(line: &str) -> Vec<String> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            c => cell.push(c),
        }
    }
    // no closing pipe
    if !cell.trim().is_empty() {
        cells.push(cell);
    }
    cells.into_iter().map(|c| c.trim().to_owned()).collect()
}

/// Header separator of a pipe table, like `|---|:---:|`
fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
        })
}

fn blank_lines(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let consumed = lines.iter().take_while(|line| is_blank(line)).count();
    (consumed > 0).then(|| Lexed {
        tokens: vec![Token::new(
            TokenKind::BlankLine,
            "",
            Position::new(line_number, 1),
        )],
        consumed,
    })
}

/// Fenced code block. Runs up to the closing fence, or the end of input if there's none
fn fenced_code(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let first = lines.first()?;
    let (info, opening) = run(fence, first.trim_start())?;
    let marker = opening.chars().next()?;
    let language = info.split_whitespace().next().map(str::to_owned);

    let closing = lines[1..].iter().position(|line| {
        let line = line.trim();
        line.len() >= opening.len() && line.chars().all(|c| c == marker)
    });
    let body_end = closing.map_or(lines.len(), |i| i + 1);
    let content = lines[1..body_end].join("\n");
    let consumed = closing.map_or(lines.len(), |i| i + 2);

    let token = token(TokenKind::CodeBlock, content, first, line_number).with_meta(TokenMeta {
        language,
        ..TokenMeta::default()
    });
    Some(Lexed {
        tokens: vec![token],
        consumed,
    })
}

/// Header line of a two-line toggle: ends with a colon, or is bold as a whole
fn is_heading_like(line: &str) -> bool {
    let line = line.trim();
    line.ends_with(':') || (line.len() > 4 && line.starts_with("**") && line.ends_with("**"))
}

/// Line of a quote group, with the marker stripped
#[derive(Debug, Clone, Copy)]
struct QuoteLine<'source> {
    raw: &'source str,
    text: &'source str,
    line_number: usize,
}

impl QuoteLine<'_> {
    fn quote_block(&self) -> Token {
        token(TokenKind::QuoteBlock, self.text.trim(), self.raw, self.line_number)
    }
}

/// Consecutive `>` lines: toggle heading, callout, quote or toggle list
fn quote_group(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let group: Vec<QuoteLine> = lines
        .iter()
        .enumerate()
        .map_while(|(i, &raw)| {
            run(quote_marker, raw.trim_start()).map(|(text, _)| QuoteLine {
                raw,
                text,
                line_number: line_number + i,
            })
        })
        .collect();
    let consumed = group.len();
    if consumed == 0 {
        return None;
    }

    let start = group.iter().position(|l| !is_blank(l.text));
    let end = group.iter().rposition(|l| !is_blank(l.text));
    let body = match (start, end) {
        (Some(start), Some(end)) => &group[start..=end],
        _ => {
            return Some(Lexed::single(token(
                TokenKind::QuoteBlock,
                "",
                lines[0],
                line_number,
            )))
        }
    };
    let first = body[0];
    let non_empty: Vec<QuoteLine> = body.iter().copied().filter(|l| !is_blank(l.text)).collect();

    let tokens = if let Some((title, level)) = run(heading_marker, first.text.trim_start())
        .filter(|(title, level)| *level <= 3 && !is_blank(title) && non_empty.len() >= 2)
    {
        let heading = token(TokenKind::ToggleHeading, title.trim(), first.raw, first.line_number)
            .with_meta(TokenMeta {
                level: Some(level as u8),
                is_toggleable: true,
                ..TokenMeta::default()
            });
        std::iter::once(heading)
            .chain(non_empty[1..].iter().map(QuoteLine::quote_block))
            .collect()
    } else if let Some((rest, label)) = run(callout_marker, first.text.trim_start()) {
        let content = std::iter::once(rest)
            .chain(body[1..].iter().map(|l| l.text))
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        vec![
            token(TokenKind::Callout, content.trim(), first.raw, first.line_number).with_meta(
                TokenMeta {
                    callout_type: Some(CalloutType::from_label(label)),
                    ..TokenMeta::default()
                },
            ),
        ]
    } else if non_empty.len() == 1 {
        vec![first.quote_block()]
    } else if non_empty.len() >= 3 || is_heading_like(first.text) {
        let header = token(TokenKind::ToggleList, first.text.trim(), first.raw, first.line_number);
        std::iter::once(header)
            .chain(non_empty[1..].iter().map(QuoteLine::quote_block))
            .collect()
    } else {
        let content = body
            .iter()
            .map(|l| l.text.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        vec![token(TokenKind::QuoteBlock, content, first.raw, first.line_number)]
    };
    Some(Lexed { tokens, consumed })
}

fn heading(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let line = lines.first()?;
    let (title, level) = run(heading_marker, line.trim_start())?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let kind = match level {
        1 => TokenKind::Heading1,
        2 => TokenKind::Heading2,
        _ => TokenKind::Heading3,
    };
    let level = level.min(3) as u8;
    Some(Lexed::single(
        token(kind, title, line, line_number).with_meta(TokenMeta {
            level: Some(level),
            ..TokenMeta::default()
        }),
    ))
}

fn divider(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let line = lines.first()?;
    run(
        all_consuming(alt((
            thematic_break('-'),
            thematic_break('*'),
            thematic_break('_'),
        ))),
        line.trim(),
    )?;
    Some(Lexed::single(token(
        TokenKind::Divider,
        "",
        line,
        line_number,
    )))
}

fn list_item(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let line = lines.first()?;
    let (content, marker) = run(list_marker, line.trim_start())?;
    let checked = match marker {
        ListMarker::Todo { checked } => Some(checked),
        _ => None,
    };
    Some(Lexed::single(
        token(marker.kind(), content.trim(), line, line_number).with_meta(TokenMeta {
            checked,
            indent: indent_width(line),
            ..TokenMeta::default()
        }),
    ))
}

/// Kind of media a bare url points to
fn media_kind(url: &Url) -> TokenKind {
    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    let host = url.host_str().unwrap_or_default();
    if AUDIO_HOST.is_match(host) || AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        TokenKind::Audio
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        TokenKind::Image
    } else if FILE_EXTENSIONS.contains(&extension.as_str()) {
        TokenKind::File
    } else {
        TokenKind::Bookmark
    }
}

/// A line holding nothing but an image, or a bare http(s) url
fn media(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let line = lines.first()?;
    let trimmed = line.trim();
    let meta = |url: &str| TokenMeta {
        url: Some(url.to_owned()),
        ..TokenMeta::default()
    };

    if let Some((_, (alt, url))) = run(all_consuming(image_markdown), trimmed) {
        let alt = alt.trim();
        let content = if alt.is_empty() { url } else { alt };
        return Some(Lexed::single(
            token(TokenKind::Image, content, line, line_number).with_meta(meta(url)),
        ));
    }

    if trimmed.contains(char::is_whitespace) {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(Lexed::single(
        token(media_kind(&url), trimmed, line, line_number).with_meta(meta(trimmed)),
    ))
}

/// Would this line be claimed by something other than a table?
fn starts_block(line: &str) -> bool {
    BLOCK_CLASSIFIERS
        .iter()
        .any(|(_, classify)| classify(std::slice::from_ref(&line), 0).is_some())
}

fn table_rows(
    rows: impl IntoIterator<Item = (usize, Vec<String>)>,
    lines: &[&str],
    line_number: usize,
    table_type: TableType,
) -> Vec<Token> {
    rows.into_iter()
        .map(|(i, cells)| {
            token(
                TokenKind::TableRow,
                cells.join(" | "),
                lines[i],
                line_number + i,
            )
            .with_meta(TokenMeta {
                table_type: Some(table_type),
                cells,
                ..TokenMeta::default()
            })
        })
        .collect()
}

/// Two or more `| a | b |` lines. A header separator, if present, is folded into the table
fn pipe_table(lines: &[&str], line_number: usize) -> Option<Lexed> {
    let consumed = lines.iter().take_while(|line| is_pipe_row(line)).count();
    if consumed < 2 {
        return None;
    }
    let rows = lines[..consumed]
        .iter()
        .map(|line| pipe_cells(line))
        .enumerate()
        .filter(|(i, cells)| *i != 1 || !is_separator_row(cells));
    Some(Lexed {
        tokens: table_rows(rows, lines, line_number, TableType::Pipe),
        consumed,
    })
}

/// Two or more lines, split by `split` into the same number of cells
fn delimited_table(
    lines: &[&str],
    line_number: usize,
    table_type: TableType,
    split: fn(&str) -> Option<Vec<String>>,
) -> Option<Lexed> {
    let first = split(lines.first()?)?;
    let width = first.len();
    let rest = lines[1..]
        .iter()
        .map_while(|line| {
            if starts_block(line) {
                return None;
            }
            split(line).filter(|cells| cells.len() == width)
        });
    let rows: Vec<_> = std::iter::once(first).chain(rest).enumerate().collect();
    if rows.len() < 2 {
        return None;
    }
    let consumed = rows.len();
    Some(Lexed {
        tokens: table_rows(rows, lines, line_number, table_type),
        consumed,
    })
}

fn table(lines: &[&str], line_number: usize) -> Option<Lexed> {
    pipe_table(lines, line_number)
        .or_else(|| delimited_table(lines, line_number, TableType::Tsv, tsv_row))
        .or_else(|| delimited_table(lines, line_number, TableType::Csv, csv_row))
}

fn text(lines: &[&str], line_number: usize) -> Lexed {
    let line = lines.first().copied().unwrap_or_default();
    Lexed::single(token(TokenKind::Text, line.trim(), line, line_number))
}

/// Splits markdown text into tokens
///
/// Never fails: anything unrecognized is [`TokenKind::Text`]. Output always ends with a single [`TokenKind::Eof`].
pub fn tokenize(text: &str) -> Vec<Token> {
    let text = normalize_line_endings(text);
    let lines: Vec<&str> = text.lines().collect();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let rest = &lines[index..];
        let line_number = index + 1;
        let lexed = BLOCK_CLASSIFIERS
            .iter()
            .find_map(|(_, classify)| classify(rest, line_number))
            .or_else(|| table(rest, line_number))
            .unwrap_or_else(|| self::text(rest, line_number));
        assert!(
            lexed.consumed > 0,
            "Classifier at line {line_number} consumed nothing"
        );
        for token in &lexed.tokens {
            trace!(
                "{:?} at {}:{}",
                token.kind,
                token.position.line,
                token.position.column
            );
        }
        index += lexed.consumed;
        tokens.extend(lexed.tokens);
    }
    tokens.push(Token::eof(lines.len() + 1));
    tokens
}
