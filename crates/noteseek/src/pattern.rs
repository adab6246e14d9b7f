//! Operand matching: case-insensitive substrings and `/regex/flags` literals.

use regex::{Regex, RegexBuilder};

const REGEX_FLAGS: &[char] = &['g', 'i', 'm', 's', 'u', 'y'];

/// A `/body/flags` literal split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteral<'a> {
    pub body: &'a str,
    pub flags: &'a str,
}

impl<'a> RegexLiteral<'a> {
    /// Recognizes a regex literal.
    ///
    /// The flags are the maximal trailing run of `gimsuy`. The character
    /// before them must be a `/` preceded by an even number of backslashes,
    /// and the body between the slashes must be non-empty.
    pub fn parse(value: &'a str) -> Option<Self> {
        let rest = value.strip_prefix('/')?;
        let flags_start = rest.trim_end_matches(REGEX_FLAGS).len();
        let (head, flags) = rest.split_at(flags_start);
        let body = head.strip_suffix('/')?;
        if body.is_empty() {
            return None;
        }
        let backslashes = body.chars().rev().take_while(|&c| c == '\\').count();
        if backslashes % 2 == 1 {
            return None;
        }
        Some(RegexLiteral { body, flags })
    }

    /// Compiles the literal, translating its flags.
    ///
    /// `y` anchors the match at the start of the haystack. `g` and `u` have
    /// no effect on a yes/no test.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        let body = unescape_slashes(self.body);
        let source = if self.flags.contains('y') {
            format!(r"\A(?:{body})")
        } else {
            body
        };
        let mut builder = RegexBuilder::new(&source);
        for flag in self.flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                _ => {}
            }
        }
        builder.build()
    }
}

/// Turns `\/` into `/`, leaving every other escape untouched.
fn unescape_slashes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('/') => out.push('/'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A compiled operand.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Case-insensitive substring, stored lowercased.
    Literal(String),
    /// A compiled regex literal.
    Regex(Regex),
    /// A regex literal that failed to compile. Never matches.
    Invalid,
}

impl Pattern {
    /// Compiles an operand, detecting regex literals.
    pub fn new(value: &str) -> Self {
        match RegexLiteral::parse(value) {
            Some(literal) => match literal.compile() {
                Ok(regex) => Pattern::Regex(regex),
                Err(err) => {
                    tracing::trace!(pattern = value, error = %err, "invalid regex literal");
                    Pattern::Invalid
                }
            },
            None => Pattern::Literal(value.to_lowercase()),
        }
    }

    /// Returns `true` if the operand was written as a regex literal.
    pub fn is_regex(&self) -> bool {
        !matches!(self, Pattern::Literal(_))
    }

    /// Tests a haystack.
    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Pattern::Literal(needle) => haystack.to_lowercase().contains(needle.as_str()),
            Pattern::Regex(regex) => regex.is_match(haystack),
            Pattern::Invalid => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_regex_literals() {
        let lit = RegexLiteral::parse("/work/").unwrap();
        assert_eq!(lit.body, "work");
        assert_eq!(lit.flags, "");

        let lit = RegexLiteral::parse("/^a.b$/gi").unwrap();
        assert_eq!(lit.body, "^a.b$");
        assert_eq!(lit.flags, "gi");
    }

    #[test]
    fn rejects_non_literals() {
        assert_eq!(RegexLiteral::parse("work"), None);
        assert_eq!(RegexLiteral::parse("/work"), None);
        assert_eq!(RegexLiteral::parse("/"), None);
        assert_eq!(RegexLiteral::parse("//"), None);
        assert_eq!(RegexLiteral::parse("/work/x"), None);
        assert_eq!(RegexLiteral::parse("a/work/"), None);
    }

    #[test]
    fn escaped_terminator_is_not_a_literal() {
        assert_eq!(RegexLiteral::parse(r"/foo\/"), None);
        // An escaped backslash leaves the slash unescaped.
        let lit = RegexLiteral::parse(r"/foo\\/").unwrap();
        assert_eq!(lit.body, r"foo\\");
    }

    #[test]
    fn slashes_in_body_are_unescaped() {
        let pattern = Pattern::new(r"/work\/project/");
        assert!(pattern.is_match("work/project"));
        assert!(!pattern.is_match("work-project"));
    }

    #[test]
    fn regex_flags() {
        assert!(!Pattern::new("/Alpha/").is_match("alpha"));
        assert!(Pattern::new("/Alpha/i").is_match("alpha"));
        assert!(Pattern::new("/^b/m").is_match("a\nb"));
        assert!(!Pattern::new("/^b/").is_match("a\nb"));
        assert!(Pattern::new("/a.b/s").is_match("a\nb"));
        assert!(Pattern::new("/a/guy").is_match("a"));
    }

    #[test]
    fn sticky_flag_anchors_at_start() {
        assert!(Pattern::new("/abc/y").is_match("abcd"));
        assert!(!Pattern::new("/abc/y").is_match("xabc"));
        assert!(!Pattern::new("/b|abc/y").is_match("xb"));
        assert!(!Pattern::new("/^b/my").is_match("a\nb"));
        assert!(Pattern::new("/ABC/iy").is_match("abc"));
    }

    #[test]
    fn literal_is_case_insensitive_substring() {
        let pattern = Pattern::new("Phrase Here");
        assert!(!pattern.is_regex());
        assert!(pattern.is_match("an exact phrase here"));
        assert!(!pattern.is_match("phrase\nhere"));
    }

    #[test]
    fn invalid_regex_fails_closed() {
        let pattern = Pattern::new("/(unclosed/");
        assert!(matches!(pattern, Pattern::Invalid));
        assert!(pattern.is_regex());
        assert!(!pattern.is_match("(unclosed"));
    }
}
