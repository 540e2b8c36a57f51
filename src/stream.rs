use crate::data::{Token, TokenKind};

/// Forward-only cursor over lexed tokens
///
/// Tokens themselves are never modified, parsers only move the cursor.
/// Nested blocks are parsed by passing the same stream down.
#[derive(Debug, Clone)]
pub struct TokenStream<'tokens> {
    tokens: &'tokens [Token],
    cursor: usize,
}

impl<'tokens> TokenStream<'tokens> {
    pub fn new(tokens: &'tokens [Token]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Token `offset` positions ahead of the cursor, without consuming anything
    pub fn peek(&self, offset: usize) -> Option<&'tokens Token> {
        self.tokens.get(self.cursor + offset)
    }

    /// Kind of the token `offset` positions ahead; running past the end reads as [`TokenKind::Eof`]
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.peek(offset).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Consumes a token. Stays put at the end of input
    pub fn next(&mut self) -> Option<&'tokens Token> {
        if !self.has_next() {
            return None;
        }
        let token = self.peek(0);
        self.cursor += 1;
        token
    }

    /// Consumes a token, if it's of the given kind
    pub fn next_if(&mut self, kind: TokenKind) -> Option<&'tokens Token> {
        if self.peek_kind(0) == kind && kind != TokenKind::Eof {
            self.next()
        } else {
            None
        }
    }

    pub fn has_next(&self) -> bool {
        self.peek_kind(0) != TokenKind::Eof
    }

    /// Number of tokens consumed so far
    pub fn position(&self) -> usize {
        self.cursor
    }
}
