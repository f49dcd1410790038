//! Terminal styling for lens output.
//!
//! Two pieces live here:
//! - [`Painter`] applies a semantic [`Tone`] to text, or leaves it alone when output is
//!   not a terminal
//! - [`Highlighter`] syntax-highlights code-match snippets by their language tag, and
//!   the TOML printed by `lens config`

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Escape sequence that clears every attribute.
const RESET: &str = "\x1b[0m";

/// What a piece of output means, which decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section titles of a report.
    Title,
    /// Heading breadcrumbs in a context view.
    Heading,
    /// File paths.
    Path,
    /// Highlighted search terms.
    Mark,
    /// Secondary information.
    Dim,
    /// Something that worked.
    Success,
    /// Something worth attention.
    Warning,
    /// Something that failed.
    Error,
}

impl Tone {
    /// ANSI attributes for the tone.
    fn codes(self) -> &'static str {
        match self {
            Self::Title => "\x1b[1m\x1b[36m",
            Self::Heading => "\x1b[1m\x1b[35m",
            Self::Path => "\x1b[1m",
            Self::Mark => "\x1b[30m\x1b[43m",
            Self::Dim => "\x1b[2m",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

/// Styles text for a terminal, or passes it through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    /// Whether escape sequences are emitted.
    ansi: bool,
}

impl Painter {
    /// A painter that emits ANSI escape sequences.
    pub fn ansi() -> Self {
        Self { ansi: true }
    }

    /// A painter that returns text unchanged.
    pub fn plain() -> Self {
        Self { ansi: false }
    }

    /// Returns true if this painter emits escape sequences.
    pub fn is_ansi(self) -> bool {
        self.ansi
    }

    /// Styles `text` with `tone`.
    pub fn paint(self, tone: Tone, text: &str) -> String {
        if self.ansi {
            format!("{}{text}{RESET}", tone.codes())
        } else {
            text.to_string()
        }
    }

    /// A dimmed horizontal rule `width` columns wide.
    pub fn rule(self, width: usize) -> String {
        self.paint(Tone::Dim, &"─".repeat(width))
    }
}

/// Syntax highlighter for snippets shown in a terminal.
pub struct Highlighter {
    /// Language definitions, including the extra ones (TOML, TypeScript, ...).
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter using the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Returns true if `lang` names a known syntax, by extension or by name.
    pub fn has_syntax(&self, lang: &str) -> bool {
        self.syntax_set.find_syntax_by_token(lang).is_some()
    }

    /// Highlights TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight_code(content, "toml")
    }

    /// Highlights a code snippet tagged with `lang`.
    ///
    /// A fence info string may carry more than the language (`rust ignore`); only its
    /// first word is used. Unknown languages are rendered as plain text.
    pub fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self.syntax_for(lang.split_whitespace().next().unwrap_or_default());
        let mut lines = HighlightLines::new(syntax, self.theme_set.get(self.theme));

        let mut output = String::with_capacity(code.len());
        for line in LinesWithEndings::from(code) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }

    /// Resolves a language token, falling back to plain text.
    fn syntax_for(&self, token: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(token)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_painter_is_identity() {
        let painter = Painter::plain();
        assert!(!painter.is_ansi());
        assert_eq!(painter.paint(Tone::Mark, "rust"), "rust");
        assert_eq!(painter.rule(3), "───");
    }

    #[test]
    fn test_ansi_painter_wraps_and_resets() {
        let painted = Painter::ansi().paint(Tone::Warning, "careful");
        assert!(painted.starts_with("\x1b[33m"));
        assert!(painted.contains("careful"));
        assert!(painted.ends_with(RESET));
    }

    #[test]
    fn test_tones_are_distinct() {
        let tones = [
            Tone::Title,
            Tone::Heading,
            Tone::Path,
            Tone::Mark,
            Tone::Dim,
            Tone::Success,
            Tone::Warning,
            Tone::Error,
        ];
        for (i, a) in tones.iter().enumerate() {
            for b in &tones[i + 1..] {
                assert_ne!(a.codes(), b.codes(), "{a:?} and {b:?} look the same");
            }
        }
    }

    #[test]
    fn test_known_syntaxes() {
        let highlighter = Highlighter::new();
        assert!(highlighter.has_syntax("rust"));
        assert!(highlighter.has_syntax("rs"));
        assert!(highlighter.has_syntax("toml"));
        assert!(!highlighter.has_syntax("no-such-language"));
    }

    #[test]
    fn test_highlight_code_colors_keywords() {
        let highlighter = Highlighter::new();
        let output = highlighter.highlight_code("fn main() {}\n", "rust");
        assert!(output.contains("\x1b["));
        assert!(output.contains("main"));
        assert!(output.ends_with(RESET));
    }

    #[test]
    fn test_info_string_uses_first_word() {
        let highlighter = Highlighter::new();
        let tagged = highlighter.highlight_code("let x = 1;\n", "rust ignore");
        let bare = highlighter.highlight_code("let x = 1;\n", "rust");
        assert_eq!(tagged, bare);
    }

    #[test]
    fn test_unknown_language_keeps_text() {
        let highlighter = Highlighter::new();
        let output = highlighter.highlight_code("just words\n", "no-such-language");
        assert!(output.contains("just words"));
        let empty = highlighter.highlight_code("x\n", "");
        assert!(empty.contains('x'));
    }

    #[test]
    fn test_highlight_toml() {
        let highlighter = Highlighter::new();
        let output = highlighter.highlight_toml("[settings]\nenabled = true\n");
        assert!(output.contains("settings"));
        assert!(output.contains("enabled"));
    }
}
