//! Cite key templates
//!
//! A template is literal text with any number of recognized tokens:
//!
//! | Token | Value |
//! |-------|-------|
//! | `{auth}` | First author last name, lowercase |
//! | `{Auth}` | First author last name, capitalized |
//! | `{year}` | Four-digit year, or `nd` |
//! | `{title}` | First N significant title words, CamelCase |
//! | `{title_lower}` | First N significant title words, lowercase_underscored |
//!
//! Anything else, including unknown `{...}` placeholders, is kept literally.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{[^{}]*\}").unwrap();
}

/// A recognized template token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    AuthorLower,
    AuthorCapitalized,
    Year,
    TitleCamel,
    TitleLower,
}

impl Token {
    /// All tokens, in substitution order
    pub const ALL: [Token; 5] = [
        Token::AuthorLower,
        Token::AuthorCapitalized,
        Token::Year,
        Token::TitleCamel,
        Token::TitleLower,
    ];

    /// Placeholder text as written in a template
    pub fn placeholder(self) -> &'static str {
        match self {
            Token::AuthorLower => "{auth}",
            Token::AuthorCapitalized => "{Auth}",
            Token::Year => "{year}",
            Token::TitleCamel => "{title}",
            Token::TitleLower => "{title_lower}",
        }
    }

    pub fn from_placeholder(text: &str) -> Option<Token> {
        Token::ALL.into_iter().find(|t| t.placeholder() == text)
    }

    fn is_author(self) -> bool {
        matches!(self, Token::AuthorLower | Token::AuthorCapitalized)
    }
}

/// Render `template` by replacing every occurrence of each token, in
/// [`Token::ALL`] order, with the value `resolve` returns for it.
///
/// `resolve` is called at most once per token, and only for tokens present
/// at the time their turn comes.
pub fn render<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(Token) -> String,
{
    let mut rendered = template.to_string();
    for token in Token::ALL {
        if rendered.contains(token.placeholder()) {
            let value = resolve(token);
            rendered = rendered.replace(token.placeholder(), &value);
        }
    }
    rendered
}

/// Result of validating a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateValidation {
    /// Whether the template can produce a key at all
    pub is_valid: bool,
    /// Error message if invalid, empty if valid
    pub error_message: String,
    /// Recognized tokens, in order of appearance
    pub tokens: Vec<Token>,
    /// List of warnings (valid but potentially problematic)
    pub warnings: Vec<String>,
}

/// Check a template for problems a user would want to hear about.
///
/// Unknown placeholders are legal (they render literally), so they only
/// produce warnings.
pub fn validate_template(template: &str) -> TemplateValidation {
    if template.is_empty() {
        return TemplateValidation {
            is_valid: false,
            error_message: "Template is empty".to_string(),
            tokens: vec![],
            warnings: vec![],
        };
    }

    let mut tokens = Vec::new();
    let mut warnings = Vec::new();

    for m in PLACEHOLDER_RE.find_iter(template) {
        match Token::from_placeholder(m.as_str()) {
            Some(token) => tokens.push(token),
            None => warnings.push(format!(
                "Unknown token {} will appear literally in every key",
                m.as_str()
            )),
        }
    }

    if tokens.is_empty() {
        warnings.push("Template contains no tokens, all cite keys will be identical".to_string());
    } else if !tokens.iter().any(|t| t.is_author() || *t == Token::Year) {
        warnings.push(
            "Template has neither author nor year, consider adding one for uniqueness".to_string(),
        );
    }

    TemplateValidation {
        is_valid: true,
        error_message: String::new(),
        tokens,
        warnings,
    }
}
