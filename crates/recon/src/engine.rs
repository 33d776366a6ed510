//! Reconciliation driver.
//!
//! One fetch per item, then every record of that item is matched against
//! the item's candidates. Items are processed by a small pool of scoped
//! worker threads; reports come back over a channel and are handed to the
//! caller one whole group at a time, in completion order.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use crate::error::FetchError;
use crate::matcher::match_filename;
use crate::model::{
    AttachmentInfo, EntityGroup, EntityGroups, GroupReport, GroupStatus, OwnerKey, PathRecord,
    RecordOutcome, RunSummary,
};

pub const DEFAULT_JOBS: usize = 8;

/// Where authoritative attachment metadata comes from.
pub trait AttachmentSource: Sync {
    fn fetch(&self, owner: &OwnerKey) -> Result<AttachmentInfo, FetchError>;
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of items fetched at once.
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { jobs: DEFAULT_JOBS }
    }
}

/// Match every record of a live item against its deduplicated candidates.
pub fn reconcile_records(records: Vec<PathRecord>, info: &AttachmentInfo) -> Vec<RecordOutcome> {
    let candidates = info.candidates();
    records
        .into_iter()
        .map(|record| {
            let outcome = match_filename(&record.mangled_filename, &candidates);
            RecordOutcome { record, outcome }
        })
        .collect()
}

/// Fetch one item and classify all of its records.
pub fn process_group<S: AttachmentSource + ?Sized>(group: EntityGroup, source: &S) -> GroupReport {
    let EntityGroup { owner, records } = group;
    log::debug!("fetching item {owner} ({} records)", records.len());

    let status = match source.fetch(&owner) {
        Err(err) => {
            log::debug!("item {owner}: fetch failed: {err}");
            GroupStatus::Failed(err)
        }
        Ok(info) if !info.is_live() => {
            log::debug!("item {owner}: status {:?}, skipping", info.status);
            GroupStatus::Skipped { status: info.status }
        }
        Ok(info) => {
            let outcomes = reconcile_records(records, &info);
            GroupStatus::Reconciled { view_link: info.view_link, outcomes }
        }
    };

    GroupReport { owner, status }
}

/// Reconcile every group. `on_report` runs on the calling thread once per
/// group, as each group finishes. Returns after all fetches have settled.
pub fn run<S, F>(groups: EntityGroups, source: &S, options: &RunOptions, mut on_report: F) -> RunSummary
where
    S: AttachmentSource + ?Sized,
    F: FnMut(&GroupReport),
{
    let mut summary = RunSummary::default();
    if groups.is_empty() {
        return summary;
    }

    let workers = options.jobs.clamp(1, groups.len());
    let queue = Mutex::new(groups.into_iter());
    let (tx, rx) = mpsc::channel::<GroupReport>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            scope.spawn(move || loop {
                let next = match queue.lock() {
                    Ok(mut q) => q.next(),
                    Err(poisoned) => poisoned.into_inner().next(),
                };
                let Some(group) = next else { break };
                if tx.send(process_group(group, source)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for report in rx {
            summary.record(&report);
            on_report(&report);
        }
    });

    log::info!("{summary}");
    summary
}
