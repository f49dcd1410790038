//! Printing the host's element tree for a terminal, and as JSON.

use lens_context::classes as lens_classes;
use lens_highlight::{Highlighter, Painter, Tone};
use lens_host::{Element, classes};
use lens_patch::MOUNT_CLASS;
use serde::Serialize;

/// Indentation per nesting level.
const INDENT: &str = "  ";

/// An element serialized as JSON.
#[derive(Serialize)]
pub struct JsonElement {
    /// Tag name, `#text` for text nodes.
    tag: String,
    /// Class list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    classes: Vec<String>,
    /// Text of a text node.
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Child elements.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Self>,
}

impl From<&Element> for JsonElement {
    fn from(el: &Element) -> Self {
        if el.is_text() {
            return Self {
                tag: el.tag().to_string(),
                classes: Vec::new(),
                text: Some(el.text_content()),
                children: Vec::new(),
            };
        }
        Self {
            tag: el.tag().to_string(),
            classes: el.classes(),
            text: None,
            children: el.children().iter().map(Self::from).collect(),
        }
    }
}

/// Turns result item elements into indented terminal text.
///
/// Context views print as a heading outline with their blocks underneath. Native
/// snippets print on one line, code snippets as a highlighted block. Host actions
/// print as bracketed labels.
pub struct ItemPrinter<'a> {
    /// Styling for the output.
    painter: Painter,
    /// Highlighter for code snippets; only used with an ANSI painter.
    highlighter: &'a Highlighter,
    /// Text printed so far.
    out: String,
}

impl<'a> ItemPrinter<'a> {
    /// Creates a printer.
    pub fn new(painter: Painter, highlighter: &'a Highlighter) -> Self {
        Self {
            painter,
            highlighter,
            out: String::new(),
        }
    }

    /// Prints one result item element.
    pub fn item(&mut self, el: &Element) {
        self.element(el, 0);
    }

    /// Returns everything printed.
    pub fn finish(self) -> String {
        self.out
    }

    /// Prints an element at `depth`.
    fn element(&mut self, el: &Element, depth: usize) {
        if el.is_text() {
            return;
        }
        if el.has_class(classes::FILE_TITLE) {
            let title = self.painter.paint(Tone::Path, &el.text_content());
            self.line(depth, &title);
        } else if el.has_class(classes::MATCH) {
            self.match_el(el, depth);
        } else if el.has_class(lens_classes::HEADING) {
            self.heading(el, depth);
        } else if el.has_class(lens_classes::SECTION) {
            self.section(el, depth);
        } else if is_action(el) {
            let label = format!("[{}]", el.text_content().trim());
            let label = self.painter.paint(Tone::Dim, &label);
            self.line(depth, &label);
        } else {
            let depth = if el.has_class(classes::FILE_MATCHES) {
                depth + 1
            } else {
                depth
            };
            for child in el.children() {
                self.element(&child, depth);
            }
        }
    }

    /// Prints a match element: a code block, a context view or a native snippet.
    fn match_el(&mut self, el: &Element, depth: usize) {
        if el.has_class(classes::CODE_MATCH) {
            let lang = el.attr("data-lang").unwrap_or_default();
            let fence = self.painter.paint(Tone::Dim, &format!("```{lang}"));
            self.line(depth, &fence);
            let code = inline(el, Painter::plain());
            let code = if self.painter.is_ansi() {
                self.highlighter.highlight_code(&code, &lang)
            } else {
                code
            };
            for line in code.lines() {
                self.line(depth, line);
            }
            let fence = self.painter.paint(Tone::Dim, "```");
            self.line(depth, &fence);
            self.actions(el, depth);
            return;
        }

        if el.children().iter().any(|c| c.has_class(MOUNT_CLASS)) {
            for child in el.children() {
                self.element(&child, depth);
            }
            return;
        }

        let snippet = format!("> {}", inline(el, self.painter));
        self.line(depth, &snippet);
        self.actions(el, depth);
    }

    /// Prints a heading of a context view, then what is nested under it.
    fn heading(&mut self, el: &Element, depth: usize) {
        let level: usize = el
            .attr("data-level")
            .and_then(|l| l.parse().ok())
            .unwrap_or(1);
        let title = el
            .query_selector(lens_classes::HEADING_TITLE)
            .map(|t| inline(&t, self.painter))
            .unwrap_or_default();
        let marker = self.painter.paint(Tone::Heading, &"#".repeat(level));
        self.line(depth, &format!("{marker} {title}"));
        if let Some(children) = el.query_selector(lens_classes::HEADING_CHILDREN) {
            for child in children.children() {
                self.element(&child, depth + 1);
            }
        }
    }

    /// Prints a block of a context view, one gutter-marked line per source line.
    fn section(&mut self, el: &Element, depth: usize) {
        let gutter = self.painter.paint(Tone::Dim, "│");
        let text = inline(el, self.painter);
        for line in text.lines() {
            self.line(depth, &format!("{gutter} {line}"));
        }
    }

    /// Prints the host actions held directly by `el`.
    fn actions(&mut self, el: &Element, depth: usize) {
        for child in el.children().iter().filter(|c| is_action(c)) {
            self.element(child, depth);
        }
    }

    /// Appends one indented line.
    fn line(&mut self, depth: usize, text: &str) {
        self.out.push_str(&INDENT.repeat(depth));
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Returns true for host action buttons.
fn is_action(el: &Element) -> bool {
    el.has_class(classes::REPLACE_BUTTON) || el.has_class(classes::HOVER_BUTTON)
}

/// Text of `el` with highlighted terms painted, leaving out host actions.
fn inline(el: &Element, painter: Painter) -> String {
    let mut text = String::new();
    for child in el.children() {
        if child.is_text() {
            text.push_str(&child.text_content());
        } else if is_action(&child) {
            continue;
        } else if child.has_class(lens_classes::MARK) || child.has_class(classes::MATCHED_TEXT) {
            text.push_str(&painter.paint(Tone::Mark, &child.text_content()));
        } else {
            text.push_str(&inline(&child, painter));
        }
    }
    text
}
