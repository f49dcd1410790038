//! Implementation of `lens inspect`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use lens_document::{HeadingCache, LoadedDocument, Section, load_document};
use lens_highlight::{Painter, Tone};
use serde::Serialize;

use crate::cli::{args::InspectCommand, context::CommandContext};

/// Characters of a section shown in the table.
const PREVIEW_CHARS: usize = 48;

/// JSON output of `lens inspect`.
#[derive(Serialize)]
struct JsonInspect<'a> {
    /// Path as given.
    path: String,
    /// Lower-case extension.
    extension: &'a str,
    /// Size in bytes.
    size: u64,
    /// Top-level blocks; `None` when the file has no structure.
    sections: Option<&'a [Section]>,
    /// Headings in document order.
    headings: &'a [HeadingCache],
    /// Front matter values as `(key, value)` pairs.
    properties: Vec<(&'a str, String)>,
}

/// Prints the sections, headings and properties lens sees in a file.
pub fn run(ctx: &CommandContext, cmd: &InspectCommand) -> ExitCode {
    let doc = match load_document(&cmd.file) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&doc);
    }
    print_report(&doc, ctx.painter);
    ExitCode::SUCCESS
}

/// Prints the structure as JSON.
fn print_json(doc: &LoadedDocument) -> ExitCode {
    let output = JsonInspect {
        path: doc.path.display().to_string(),
        extension: &doc.extension,
        size: doc.stat.size,
        sections: doc.structure.sections.as_deref(),
        headings: &doc.structure.headings,
        properties: doc
            .structure
            .frontmatter
            .as_ref()
            .map(|fm| fm.texts().collect())
            .unwrap_or_default(),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the structure for a reader.
fn print_report(doc: &LoadedDocument, painter: Painter) {
    let structure = &doc.structure;
    println!(
        "--- {} ---",
        painter.paint(Tone::Title, &doc.path.display().to_string())
    );
    println!(
        "{}",
        painter.paint(Tone::Dim, &format!("{} bytes, .{}", doc.stat.size, doc.extension))
    );
    println!();

    let Some(sections) = &structure.sections else {
        println!(
            "{}",
            painter.paint(Tone::Dim, "no structure (context views are not shown for this file)")
        );
        return;
    };

    println!("{}", painter.paint(Tone::Title, &format!("Sections ({})", sections.len())));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Kind", "Lines", "Preview"]);
    for (idx, section) in sections.iter().enumerate() {
        let start = section.position.start.line + 1;
        let end = section.position.end.line + 1;
        let lines = if start == end {
            start.to_string()
        } else {
            format!("{start}-{end}")
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(section.kind.as_str()),
            Cell::new(lines),
            Cell::new(preview(&doc.content, section)),
        ]);
    }
    println!("{table}");
    println!();

    println!(
        "{}",
        painter.paint(Tone::Title, &format!("Headings ({})", structure.headings.len()))
    );
    if structure.headings.is_empty() {
        println!("  {}", painter.paint(Tone::Dim, "(none)"));
    }
    for heading in &structure.headings {
        let indent = "  ".repeat(usize::from(heading.level));
        let marker = "#".repeat(usize::from(heading.level));
        println!(
            "{indent}{} {} {}",
            marker,
            painter.paint(Tone::Heading, &heading.heading),
            painter.paint(Tone::Dim, &format!("L{}", heading.position.start.line + 1))
        );
    }

    if let Some(frontmatter) = &structure.frontmatter {
        println!();
        println!("{}", painter.paint(Tone::Title, "Properties"));
        for (key, value) in frontmatter.texts() {
            println!("  {}: {value}", painter.paint(Tone::Path, key));
        }
    }
}

/// First line of a section, shortened for the table.
fn preview(content: &str, section: &Section) -> String {
    let text = content
        .get(section.position.start.offset..section.position.end.offset)
        .unwrap_or_default();
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let short: String = line.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{short}…")
    } else {
        line.to_string()
    }
}
