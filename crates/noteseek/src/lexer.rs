//! Tokenizer for raw query text.
//!
//! Scans the input once, left to right. Whitespace separates tokens and
//! carries no meaning of its own; the parser treats juxtaposition as AND.

use crate::clause::{PropertyFilter, Term};
use crate::error::{QueryError, Result};

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A comparison (word, phrase, `key:value` or `[property]`).
    Term(Term),
    /// The `OR` keyword.
    Or,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Term(term) if term.negated => write!(f, "-{}:{}", term.key, term.value),
            Token::Term(term) => write!(f, "{}:{}", term.key, term.value),
            Token::Or => write!(f, "OR"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Splits a query string into tokens.
///
/// # Errors
///
/// Returns [`QueryError::UnterminatedQuote`] or
/// [`QueryError::UnterminatedBracket`] when a quoted phrase or property
/// bracket never closes.
///
/// # Example
///
/// ```
/// use noteseek::{tokenize, Term, Token};
///
/// let tokens = tokenize("alpha OR -tag:work").unwrap();
/// assert_eq!(tokens, vec![
///     Token::Term(Term::bare("alpha")),
///     Token::Or,
///     Token::Term(Term::new("tag", "work").negate(true)),
/// ]);
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    negate_next: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            negate_next: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                break;
            };

            match c {
                '-' => {
                    self.pos += 1;
                    self.negate_next = true;
                }
                '(' => {
                    self.pos += 1;
                    self.emit(Token::LParen);
                }
                ')' => {
                    self.pos += 1;
                    self.emit(Token::RParen);
                }
                '[' => {
                    let filter = self.read_property()?;
                    self.emit_term(Term::property(&filter));
                }
                '"' => {
                    let phrase = self.read_quoted()?;
                    self.emit_term(Term::bare(phrase));
                }
                _ => self.read_word()?,
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Pushes a token. A pending `-` only ever applies to terms, so any other
    /// token clears it.
    fn emit(&mut self, token: Token) {
        self.negate_next = false;
        self.tokens.push(token);
    }

    fn emit_term(&mut self, term: Term) {
        let negated = self.negate_next;
        self.emit(Token::Term(term.negate(negated)));
    }

    /// Reads a `"..."` phrase starting at the opening quote.
    ///
    /// `\"` becomes a literal quote and `\\` is kept as is, so a trailing
    /// escaped backslash does not swallow the closing quote.
    fn read_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '"' => return Ok(out),
                '\\' => match self.peek() {
                    Some('"') => {
                        self.pos += 1;
                        out.push('"');
                    }
                    Some('\\') => {
                        self.pos += 1;
                        out.push_str("\\\\");
                    }
                    _ => out.push('\\'),
                },
                _ => out.push(c),
            }
        }
        Err(QueryError::UnterminatedQuote { position: start })
    }

    /// Reads a `[name]` or `[name: expr]` filter starting at the opening
    /// bracket.
    fn read_property(&mut self) -> Result<PropertyFilter> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut in_quote = false;
        let mut i = self.pos;

        while let Some(&c) = self.chars.get(i) {
            if in_quote {
                match c {
                    '\\' => i += 1,
                    '"' => in_quote = false,
                    _ => {}
                }
            } else {
                match c {
                    '"' => in_quote = true,
                    '[' => depth += 1,
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            let inner: String = self.chars[start + 1..i].iter().collect();
                            self.pos = i + 1;
                            return Ok(split_property(&inner));
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
        Err(QueryError::UnterminatedBracket { position: start })
    }

    /// Reads a bare word, which may be a `key:value` filter or `OR`.
    fn read_word(&mut self) -> Result<()> {
        let start = self.pos;
        let mut seen_colon = false;
        let mut colon = None;

        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']') {
                break;
            }
            if c == ':' && !seen_colon {
                seen_colon = true;
                // Only a colon after at least one character starts a key.
                if self.pos == start {
                    self.pos += 1;
                    continue;
                }
                colon = Some(self.pos);
                if self.chars.get(self.pos + 1) == Some(&'"') {
                    // `key:"multi word value"`
                    let key: String = self.chars[start..self.pos].iter().collect();
                    self.pos += 1;
                    let value = self.read_quoted()?;
                    self.emit_term(Term::new(key, value));
                    return Ok(());
                }
            }
            self.pos += 1;
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        if word.is_empty() {
            // A stray `]` outside any bracket.
            self.pos += 1;
            return Ok(());
        }

        match colon {
            Some(idx) => {
                let key: String = self.chars[start..idx].iter().collect();
                let value: String = self.chars[idx + 1..self.pos].iter().collect();
                self.emit_term(Term::new(key, strip_quotes(&value)));
            }
            None if !self.negate_next && word.eq_ignore_ascii_case("or") => {
                self.emit(Token::Or);
            }
            None => self.emit_term(Term::bare(strip_quotes(&word))),
        }
        Ok(())
    }
}

/// Removes one layer of surrounding double quotes.
fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Splits bracket contents on the first colon outside quotes and parentheses.
fn split_property(inner: &str) -> PropertyFilter {
    let mut in_quote = false;
    let mut parens = 0usize;
    let mut escaped = false;

    for (idx, c) in inner.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            ':' if parens == 0 => {
                let name = inner[..idx].trim();
                let expr = inner[idx + 1..].trim();
                return PropertyFilter::new(name, Some(expr.to_string()));
            }
            _ => {}
        }
    }
    PropertyFilter::new(inner.trim(), None)
}
