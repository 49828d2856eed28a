use crate::token::{keyword_kind, Token, TokenKind};

/// Lex RBF source into a token sequence.
///
/// Never fails: unknown words, stray characters, and malformed `!` markers
/// are dropped without a diagnostic. An EXIT token is always appended, so
/// the result is never empty.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).scan()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn scan(mut self) -> Vec<Token> {
        while let Some(ch) = self.current() {
            match ch {
                c if c.is_ascii_alphabetic() => self.keyword(),
                c if c.is_ascii_digit() => self.number(),
                ';' | '\n' => {
                    self.tokens.push(Token::new(TokenKind::Separator));
                    self.advance();
                }
                '!' => self.address(),
                '#' => self.comment(),
                _ => self.advance(),
            }
        }

        self.tokens.push(Token::new(TokenKind::Exit));
        self.tokens
    }

    /// Maximal run of ASCII letters, looked up in the keyword table.
    /// Unrecognized words vanish.
    fn keyword(&mut self) {
        let mut word = String::new();
        while let Some(c) = self.current() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            word.push(c);
            self.advance();
        }

        if let Some(kind) = keyword_kind(&word) {
            self.tokens.push(Token::new(kind));
        }
    }

    /// Maximal run of digits. One character after the run is consumed
    /// unconditionally, so `65;PRNT` lexes with no separator token.
    fn number(&mut self) {
        let digits = self.digit_run();
        self.advance();
        let value = digits.parse::<i64>().unwrap_or(i64::MAX);
        self.tokens
            .push(Token::with_value(TokenKind::IntLiteral, value));
    }

    /// `!N` direct-address marker. Same trailing consume as a digit run;
    /// a bare `!` with no digits produces no token but still eats the
    /// trailing character.
    fn address(&mut self) {
        self.advance();
        let digits = self.digit_run();
        self.advance();
        if digits.is_empty() {
            return;
        }
        let value = digits.parse::<i64>().unwrap_or(i64::MAX);
        self.tokens
            .push(Token::with_value(TokenKind::Address, value));
    }

    fn digit_run(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.current() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        digits
    }

    /// `#` opens a comment that runs to the next newline, a closing `#`, or
    /// the end of the source; the terminator itself is skipped too, so a
    /// newline that closes a comment yields no separator token.
    fn comment(&mut self) {
        self.advance();
        while let Some(c) = self.current() {
            if c == '\n' || c == '#' {
                break;
            }
            self.advance();
        }
        self.advance();
    }
}
