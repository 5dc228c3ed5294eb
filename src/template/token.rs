//! Reserved placeholder tokens and their substitution

use std::collections::BTreeMap;
use std::fmt;

/// A reserved marker embedded in a checked-in template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    /// Root of the SM plotting library tree
    SmLib,
    /// Root of the AquaTerm library tree
    AqLib,
    /// MOOG source root
    SrcDir,
    /// Platform machine tag
    Machine,
    /// Complete `FC = ...` configuration line
    FConfig,
}

impl Token {
    pub const ALL: [Token; 5] = [
        Token::SmLib,
        Token::AqLib,
        Token::SrcDir,
        Token::Machine,
        Token::FConfig,
    ];

    /// Literal text of the marker as it appears in templates
    pub fn marker(self) -> &'static str {
        match self {
            Self::SmLib => "$SMLIB",
            Self::AqLib => "$AQLIB",
            Self::SrcDir => "$SRCDIR",
            Self::Machine => "$MACHINE",
            Self::FConfig => "$FCONFIG",
        }
    }

    fn at_start_of(bytes: &[u8]) -> Option<Token> {
        Self::ALL
            .into_iter()
            .find(|t| bytes.starts_with(t.marker().as_bytes()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Resolved value for every token
pub type TokenValues = BTreeMap<Token, String>;

/// Replace every known marker in `text` with its value
///
/// Works on raw bytes: markers are ASCII, so any encoding the template uses
/// passes through untouched. Runs in a single left-to-right pass, so text
/// produced by a substitution is never scanned again. Markers without a value
/// and unknown `$` sequences are copied through as is.
pub fn substitute(text: &[u8], values: &TokenValues) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.iter().position(|&b| b == b'$') {
        out.extend_from_slice(&rest[..pos]);
        let tail = &rest[pos..];

        match Token::at_start_of(tail).and_then(|t| values.get(&t).map(|v| (t, v))) {
            Some((token, value)) => {
                out.extend_from_slice(value.as_bytes());
                rest = &tail[token.marker().len()..];
            }
            None => {
                out.push(b'$');
                rest = &tail[1..];
            }
        }
    }

    out.extend_from_slice(rest);
    out
}

fn contains_marker(text: &[u8], token: Token) -> bool {
    let marker = token.marker().as_bytes();
    text.windows(marker.len()).any(|w| w == marker)
}

/// Tokens from `expected` whose marker does not occur in `text`
pub fn missing_tokens(text: &[u8], expected: &[Token]) -> Vec<Token> {
    expected
        .iter()
        .copied()
        .filter(|&t| !contains_marker(text, t))
        .collect()
}

/// Whether `text` still contains any known marker
pub fn contains_any(text: &[u8]) -> bool {
    Token::ALL.into_iter().any(|t| contains_marker(text, t))
}
