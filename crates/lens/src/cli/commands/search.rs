//! Implementation of `lens search`.

use std::{process::ExitCode, rc::Rc};

use lens_context::{DISPOSED_ATTR, MarkdownContextEngine};
use lens_highlight::{Highlighter, Tone};
use lens_host::{Element, Host, RecordingNotifier, ResultSet, Vault};
use lens_patch::{MOUNT_CLASS, PatchStats, Patcher};
use serde::Serialize;
use tracing::debug;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{ItemPrinter, JsonElement},
};

/// Width of the rule above the summary.
const RULE_WIDTH: usize = 40;

/// Output captured while the results are still rendered.
enum Report {
    /// Items for `--json`.
    Json(Vec<JsonItem>),
    /// Printed items.
    Text(String),
}

/// JSON output of `lens search`.
#[derive(Serialize)]
struct JsonSearchOutput {
    /// The query as given.
    query: String,
    /// Whether context views were installed.
    augmented: bool,
    /// One entry per result item.
    items: Vec<JsonItem>,
    /// What happened to the items.
    stats: JsonStats,
    /// Context views released when the results were emptied.
    released: usize,
    /// Messages of the notices shown.
    notices: Vec<String>,
}

/// One result item in JSON output.
#[derive(Serialize)]
struct JsonItem {
    /// Path of the matched file.
    path: String,
    /// Match children left after augmentation.
    matches: usize,
    /// Whether a context view was mounted.
    mounted: bool,
    /// The item's rendered element tree.
    element: JsonElement,
}

/// Outcome counters in JSON output.
#[derive(Serialize)]
struct JsonStats {
    /// Items that got a context view.
    mounted: usize,
    /// Items trimmed but left without a view.
    skipped: usize,
    /// Items left to the host.
    deferred: usize,
    /// Items whose augmentation failed.
    failed: usize,
}

impl From<PatchStats> for JsonStats {
    fn from(stats: PatchStats) -> Self {
        Self {
            mounted: stats.mounted,
            skipped: stats.skipped,
            deferred: stats.deferred,
            failed: stats.failed,
        }
    }
}

/// Searches the given files through a headless host and prints what it renders.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let vault = match Vault::load(&cmd.files) {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let host = Host::new();
    let notifier = Rc::new(RecordingNotifier::new());
    let augment = !cmd.native && ctx.config.settings.enabled;
    let patcher = augment.then(|| {
        let engine = MarkdownContextEngine::new(&ctx.config.render);
        let patcher = Patcher::new(engine, &ctx.config, notifier.clone());
        patcher.patch_component(host.component_prototype());
        patcher
    });
    debug!(augment, files = cmd.files.len(), "searching");

    let view = if cmd.backlinks {
        host.open_backlinks_view()
    } else {
        host.open_search_view()
    };
    view.run_search(&vault, &cmd.query);
    let Some(set) = view.result_set() else {
        eprintln!("error: the view has no result list");
        return ExitCode::FAILURE;
    };

    let stats = patcher.as_ref().map(|p| p.stats()).unwrap_or_default();
    let items = set.items();
    let painter = ctx.painter;

    // Rendered output is captured before the results are emptied, which releases the views.
    let report = if cmd.json {
        Report::Json(
            items
                .iter()
                .map(|item| JsonItem {
                    path: item.file().path.clone(),
                    matches: item.children().len(),
                    mounted: item.el().query_selector(MOUNT_CLASS).is_some(),
                    element: JsonElement::from(item.el()),
                })
                .collect(),
        )
    } else {
        let highlighter = Highlighter::new();
        let mut printer = ItemPrinter::new(painter, &highlighter);
        for item in &items {
            printer.item(item.el());
        }
        Report::Text(printer.finish())
    };
    let count = items.len();

    let released = release(&set);
    if let Some(patcher) = &patcher {
        for err in patcher.unload() {
            eprintln!("warning: {err}");
        }
    }
    let notices: Vec<String> = notifier
        .shown()
        .iter()
        .map(|n| n.message().to_string())
        .collect();
    for notice in &notices {
        eprintln!("notice: {notice}");
    }

    let text = match report {
        Report::Json(items) => {
            let output = JsonSearchOutput {
                query: cmd.query.clone(),
                augmented: augment,
                items,
                stats: stats.into(),
                released,
                notices,
            };
            return match serde_json::to_string_pretty(&output) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: failed to serialize output: {e}");
                    ExitCode::FAILURE
                }
            };
        }
        Report::Text(text) => text,
    };

    if count == 0 {
        println!(
            "{}",
            painter.paint(Tone::Dim, &format!("no results for \"{}\"", cmd.query))
        );
        return ExitCode::SUCCESS;
    }

    print!("{text}");
    println!("{}", painter.rule(RULE_WIDTH));
    let summary = format!(
        "{count} results: {} with context, {} skipped, {} native, {} failed; released {released} context views",
        stats.mounted, stats.skipped, stats.deferred, stats.failed,
    );
    println!("{}", painter.paint(Tone::Dim, &summary));
    ExitCode::SUCCESS
}

/// Empties the result list and counts the context views that were released.
///
/// The elements are snapshotted first; emptying detaches them from the list.
fn release(set: &Rc<ResultSet>) -> usize {
    let mounts: Vec<Element> = set
        .items()
        .iter()
        .flat_map(|item| item.el().query_selector_all(MOUNT_CLASS))
        .collect();
    set.empty_results();
    mounts
        .iter()
        .filter(|m| m.attr(DISPOSED_ATTR).is_some())
        .count()
}
