use std::{borrow::Cow, collections::VecDeque};

/// Replaces `\r\n` and lone `\r` with `\n`
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Width of the leading whitespace, with a tab counting as 4 spaces
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Splits text into pieces of at most `max_chars` characters each (on char boundaries)
///
/// Empty text gives no pieces
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Adapts [`std::io::Write`] to be used as [`std::fmt::Write`]
///
/// Formatting machinery discards the underlying io errors, so they are stored here to be retrieved later
pub struct FmtToIo<W>(W, VecDeque<std::io::Error>);
impl<W> FmtToIo<W> {
    pub fn new(io: W) -> Self
    where
        W: std::io::Write,
    {
        Self(io, VecDeque::new())
    }

    pub fn get_error(&mut self) -> Option<std::io::Error> {
        self.1.pop_front()
    }
}
impl<W: std::io::Write> std::fmt::Write for FmtToIo<W> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        if let Err(err) = self.0.write_all(s.as_bytes()) {
            self.1.push_back(err);
            return Err(std::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    macro_rules! test {
        {$name:ident, $input:literal, $max:literal, [$($chunk:literal),*]} => {
            #[test]
            fn $name() {
                // arrange

                // act
                let chunks = split_chunks($input, $max);

                // assert
                let expected: Vec<&str> = vec![$($chunk),*];
                assert_eq!(chunks, expected);
            }
        };
    }

    test! {chunks_empty, "", 3, []}
    test! {chunks_short, "ab", 3, ["ab"]}
    test! {chunks_exact, "abcdef", 3, ["abc", "def"]}
    test! {chunks_tail, "abcdefg", 3, ["abc", "def", "g"]}
    test! {chunks_multibyte, "ééé", 2, ["éé", "é"]}

    #[test]
    fn line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn indents() {
        assert_eq!(indent_width("- a"), 0);
        assert_eq!(indent_width("  - a"), 2);
        assert_eq!(indent_width("\t- a"), 4);
        assert_eq!(indent_width(" \t- a"), 5);
    }

    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_errors_are_kept() {
        // arrange
        let mut adapter = FmtToIo::new(Broken);

        // act
        let result = adapter.write_str("text");

        // assert
        assert!(result.is_err());
        let err = adapter.get_error().expect("Error should be stored");
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert!(adapter.get_error().is_none());
    }
}
