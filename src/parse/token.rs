//! Lazy tokenizer driven by two 256-entry byte classification tables.
//!
//! The tokenizer never allocates: tokens borrow their text from the source.

/// Coarse class of the first byte of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    IdentStart,
    Number,
    Quote,
    Space,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Ampersand,
    Pipe,
    Bang,
    Dot,
    Comma,
    End,
    Unknown,
}

/// Classification of a token's first byte.
pub static FIRST_BYTE_CLASS: [ByteClass; 256] = {
    let mut table = [ByteClass::Unknown; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let b = i as u8;
        table[i] = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => ByteClass::IdentStart,
            b'0'..=b'9' | b'-' | b'+' => ByteClass::Number,
            b'"' | b'\'' => ByteClass::Quote,
            b' ' | b'\t' | b'\r' | b'\n' => ByteClass::Space,
            b'(' => ByteClass::LParen,
            b')' => ByteClass::RParen,
            b'[' => ByteClass::LBracket,
            b']' => ByteClass::RBracket,
            b'&' => ByteClass::Ampersand,
            b'|' => ByteClass::Pipe,
            b'!' => ByteClass::Bang,
            b'.' => ByteClass::Dot,
            b',' => ByteClass::Comma,
            _ => ByteClass::Unknown,
        };
        i += 1;
    }
    table
};

/// `true` for bytes that may continue an identifier: a-z, A-Z, 0-9 and `_`.
pub static IDENT_CONTINUE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let b = i as u8;
        table[i] = matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_');
        i += 1;
    }
    table
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Ident,
    Int(i32),
    Float(f32),
    /// Integer literal that does not fit in an `i32`.
    BadNumber,
    /// Terminated string literal; `escaped` is set when the content holds a `\`.
    Str { escaped: bool },
    UnterminatedStr,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Not,
    And,
    Or,
    Eof,
    Unknown,
}

/// A classified token. `text` is the exact source slice, quotes included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Content of a string literal without its delimiters, still escaped.
    #[must_use]
    pub fn string_content(&self) -> &'a str {
        let text = self.text;
        match self.kind {
            TokenKind::Str { .. } => &text[1..text.len() - 1],
            TokenKind::UnterminatedStr => &text[1..],
            _ => text,
        }
    }
}

/// Cursor over an expression. `peek` classifies the next token, `advance`
/// also moves past it.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn peek(&self) -> Token<'a> {
        self.scan(self.pos).0
    }

    pub fn advance(&mut self) -> Token<'a> {
        let (token, next) = self.scan(self.pos);
        self.pos = next;
        token
    }

    /// Scan the token starting at or after `pos`, skipping leading whitespace.
    /// Returns the token and the offset just past it.
    #[must_use]
    pub fn scan(&self, pos: usize) -> (Token<'a>, usize) {
        let bytes = self.src.as_bytes();
        let mut start = pos;
        while self.class_at(start) == ByteClass::Space {
            start += 1;
        }

        let (kind, end) = match self.class_at(start) {
            ByteClass::End => (TokenKind::Eof, start),
            ByteClass::IdentStart => {
                let mut end = start + 1;
                while end < bytes.len() && IDENT_CONTINUE[bytes[end] as usize] {
                    end += 1;
                }
                (TokenKind::Ident, end)
            }
            ByteClass::Number => self.scan_number(start),
            ByteClass::Quote => self.scan_string(start),
            ByteClass::LParen => (TokenKind::LParen, start + 1),
            ByteClass::RParen => (TokenKind::RParen, start + 1),
            ByteClass::LBracket => (TokenKind::LBracket, start + 1),
            ByteClass::RBracket => (TokenKind::RBracket, start + 1),
            ByteClass::Dot => (TokenKind::Dot, start + 1),
            ByteClass::Comma => (TokenKind::Comma, start + 1),
            ByteClass::Bang => (TokenKind::Not, start + 1),
            ByteClass::Ampersand => self.scan_double(start, b'&', TokenKind::And),
            ByteClass::Pipe => self.scan_double(start, b'|', TokenKind::Or),
            ByteClass::Space | ByteClass::Unknown => (TokenKind::Unknown, self.char_end(start)),
        };

        let token = Token {
            kind,
            text: &self.src[start..end],
        };
        (token, end)
    }

    fn class_at(&self, pos: usize) -> ByteClass {
        match self.src.as_bytes().get(pos) {
            Some(&b) => FIRST_BYTE_CLASS[b as usize],
            None => ByteClass::End,
        }
    }

    /// End of the (possibly multi-byte) character starting at `pos`.
    fn char_end(&self, pos: usize) -> usize {
        pos + self.src[pos..].chars().next().map_or(1, char::len_utf8)
    }

    /// `&&` and `||`; a lone `&` or `|` is an unknown token.
    fn scan_double(&self, start: usize, byte: u8, kind: TokenKind) -> (TokenKind, usize) {
        if self.src.as_bytes().get(start + 1) == Some(&byte) {
            (kind, start + 2)
        } else {
            (TokenKind::Unknown, start + 1)
        }
    }

    fn scan_number(&self, start: usize) -> (TokenKind, usize) {
        let bytes = self.src.as_bytes();
        let digits_from = if matches!(bytes[start], b'-' | b'+') {
            start + 1
        } else {
            start
        };
        let mut end = digits_from;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_from {
            // sign with no digits
            return (TokenKind::Unknown, start + 1);
        }

        if bytes.get(end) == Some(&b'.') {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            return match self.src[start..end].parse::<f32>() {
                Ok(v) => (TokenKind::Float(v), end),
                Err(_) => (TokenKind::BadNumber, end),
            };
        }

        match self.src[start..end].parse::<i32>() {
            Ok(v) => (TokenKind::Int(v), end),
            Err(_) => (TokenKind::BadNumber, end),
        }
    }

    fn scan_string(&self, start: usize) -> (TokenKind, usize) {
        let bytes = self.src.as_bytes();
        let quote = bytes[start];
        let mut escaped = false;
        let mut end = start + 1;
        while end < bytes.len() {
            match bytes[end] {
                b'\\' => {
                    escaped = true;
                    end += 2;
                }
                b if b == quote => return (TokenKind::Str { escaped }, end + 1),
                _ => end += 1,
            }
        }
        // a trailing backslash may have stepped past the end
        (TokenKind::UnterminatedStr, bytes.len())
    }
}

/// Resolve the escape sequences of a string literal's content.
///
/// `\n`, `\r`, `\t`, `\0`, `\\`, `\'` and `\"` are recognized. Any other
/// escaped character is kept as-is without its backslash.
#[must_use]
pub fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut tokens = Tokenizer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = tokens.advance();
            if tok.kind == TokenKind::Eof {
                return out;
            }
            out.push(tok.kind);
        }
    }

    #[test]
    fn classification_tables() {
        assert_eq!(FIRST_BYTE_CLASS[b'a' as usize], ByteClass::IdentStart);
        assert_eq!(FIRST_BYTE_CLASS[b'_' as usize], ByteClass::IdentStart);
        assert_eq!(FIRST_BYTE_CLASS[b'7' as usize], ByteClass::Number);
        assert_eq!(FIRST_BYTE_CLASS[b'-' as usize], ByteClass::Number);
        assert_eq!(FIRST_BYTE_CLASS[b'\'' as usize], ByteClass::Quote);
        assert_eq!(FIRST_BYTE_CLASS[b'\t' as usize], ByteClass::Space);
        assert_eq!(FIRST_BYTE_CLASS[b'#' as usize], ByteClass::Unknown);
        assert_eq!(FIRST_BYTE_CLASS[0], ByteClass::Unknown);
        assert_eq!(FIRST_BYTE_CLASS[0xC3], ByteClass::Unknown);
        assert!(IDENT_CONTINUE[b'9' as usize]);
        assert!(!IDENT_CONTINUE[b'.' as usize]);
    }

    #[test]
    fn statement_tokens() {
        assert_eq!(
            kinds("age.gte(18)"),
            vec![
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Int(18),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn whitespace_skipped() {
        let mut tokens = Tokenizer::new(" \t\r\n name \n");
        let tok = tokens.advance();
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text, "name");
        assert_eq!(tokens.advance().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut tokens = Tokenizer::new("a b");
        assert_eq!(tokens.peek().text, "a");
        assert_eq!(tokens.peek().text, "a");
        assert_eq!(tokens.position(), 0);
        assert_eq!(tokens.advance().text, "a");
        assert_eq!(tokens.peek().text, "b");
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Int(42)]);
        assert_eq!(kinds("-7"), vec![TokenKind::Int(-7)]);
        assert_eq!(kinds("+7"), vec![TokenKind::Int(7)]);
        assert_eq!(kinds("2."), vec![TokenKind::Float(2.0)]);
        assert_eq!(kinds("2.5"), vec![TokenKind::Float(2.5)]);
        assert_eq!(kinds("-0.5"), vec![TokenKind::Float(-0.5)]);
        assert_eq!(kinds("99999999999"), vec![TokenKind::BadNumber]);
        assert_eq!(kinds("-"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn float_is_correctly_rounded() {
        assert_eq!(kinds("1.9999999"), vec![TokenKind::Float(1.999_999_9)]);
        assert_ne!(kinds("1.9999999"), vec![TokenKind::Float(2.0)]);
    }

    #[test]
    fn strings() {
        let mut tokens = Tokenizer::new(r#""raw" 'it\'s'"#);
        let raw = tokens.advance();
        assert_eq!(raw.kind, TokenKind::Str { escaped: false });
        assert_eq!(raw.text, "\"raw\"");
        assert_eq!(raw.string_content(), "raw");

        let esc = tokens.advance();
        assert_eq!(esc.kind, TokenKind::Str { escaped: true });
        assert_eq!(esc.string_content(), r"it\'s");
        assert_eq!(unescape(esc.string_content()), "it's");
    }

    #[test]
    fn unterminated_strings() {
        assert_eq!(kinds("'abc"), vec![TokenKind::UnterminatedStr]);
        assert_eq!(kinds(r#""abc\""#), vec![TokenKind::UnterminatedStr]);
        assert_eq!(kinds(r#""abc\"#), vec![TokenKind::UnterminatedStr]);
        assert_eq!(kinds("\"é\\"), vec![TokenKind::UnterminatedStr]);
    }

    #[test]
    fn mismatched_quote_does_not_close() {
        assert_eq!(kinds(r#""a'b""#), vec![TokenKind::Str { escaped: false }]);
    }

    #[test]
    fn boolean_operators() {
        assert_eq!(kinds("&& ||"), vec![TokenKind::And, TokenKind::Or]);
        let tok = Tokenizer::new("&x").peek();
        assert_eq!(tok.kind, TokenKind::Unknown);
        assert_eq!(tok.text, "&");
        assert_eq!(kinds("|"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn unknown_multibyte_character() {
        let tok = Tokenizer::new("é").peek();
        assert_eq!(tok.kind, TokenKind::Unknown);
        assert_eq!(tok.text, "é");
    }

    #[test]
    fn unescape_sequences() {
        assert_eq!(unescape(r#"\n\t\\\""#), "\n\t\\\"");
        assert_eq!(unescape(r"\r\0"), "\r\0");
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape("plain"), "plain");
    }
}
