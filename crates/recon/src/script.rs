//! Turns group reports into shell script lines and human diagnostics.

use crate::model::{GroupReport, GroupStatus, MatchOutcome, RecordOutcome};

pub const SCRIPT_HEADER: &str = "#!/usr/bin/env bash";

/// Output for one group: commands go to stdout, diagnostics to stderr.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub commands: Vec<String>,
    pub diagnostics: Vec<String>,
}

/// Quote a path for use inside double quotes in a POSIX shell.
pub fn shell_quote(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 2);
    out.push('"');
    for ch in path.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

pub fn rename_command(from: &str, to: &str) -> String {
    format!("mv -v {} {}", shell_quote(from), shell_quote(to))
}

pub fn render(report: &GroupReport) -> Rendered {
    let mut out = Rendered::default();
    match &report.status {
        GroupStatus::Skipped { .. } => {}
        GroupStatus::Failed(err) => {
            out.diagnostics
                .push(format!("error: cannot fetch item {}: {}", report.owner, err));
        }
        GroupStatus::Reconciled { view_link, outcomes } => {
            let item = item_label(view_link, report);
            for outcome in outcomes {
                render_outcome(outcome, &item, &mut out);
            }
        }
    }
    out
}

/// The view link when the repository sent one, else the owner key.
fn item_label(view_link: &str, report: &GroupReport) -> String {
    if view_link.is_empty() {
        report.owner.to_string()
    } else {
        view_link.to_string()
    }
}

fn render_outcome(o: &RecordOutcome, item: &str, out: &mut Rendered) {
    let name = &o.record.mangled_filename;
    match &o.outcome {
        MatchOutcome::ExactLiteral => out.diagnostics.push(format!(
            "note: exact match for filename \"{name}\" on item {item}, the question mark was literal"
        )),
        MatchOutcome::Renameable(target) => out
            .commands
            .push(rename_command(&o.record.original_path(), &o.record.renamed_path(target))),
        MatchOutcome::NoMatch => out.diagnostics.push(format!(
            "warning: no matches for mangled filename \"{name}\" on item {item}"
        )),
        MatchOutcome::Unmatchable(reason) => out.diagnostics.push(format!(
            "warning: cannot match mangled filename \"{name}\" on item {item}: {reason}"
        )),
        MatchOutcome::AmbiguousMatch(candidates) => {
            let mut msg = format!(
                "warning: multiple matches for mangled filename \"{name}\" on item {item}:"
            );
            for c in candidates {
                msg.push_str("\n  - ");
                msg.push_str(c);
            }
            out.diagnostics.push(msg);
        }
    }
}
