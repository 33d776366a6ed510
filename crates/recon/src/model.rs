use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Composite item identity. Neither the id nor the version alone is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey {
    pub entity_id: String,
    pub version: String,
}

impl OwnerKey {
    pub fn new(entity_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { entity_id: entity_id.into(), version: version.into() }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_id, self.version)
    }
}

/// One line of the export listing, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub line: String,
    pub owner: OwnerKey,
    /// Everything before the filename, without a trailing slash.
    pub directory_prefix: String,
    /// May itself contain `/`.
    pub mangled_filename: String,
}

impl PathRecord {
    pub fn original_path(&self) -> String {
        format!("{}/{}", self.directory_prefix, self.mangled_filename)
    }

    pub fn renamed_path(&self, target: &str) -> String {
        format!("{}/{}", self.directory_prefix, target)
    }
}

/// Records sharing one owner key, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityGroup {
    pub owner: OwnerKey,
    pub records: Vec<PathRecord>,
}

/// All groups produced by the parse phase, in first-encounter order.
#[derive(Debug, Default)]
pub struct EntityGroups {
    groups: Vec<EntityGroup>,
    index: HashMap<OwnerKey, usize>,
}

impl EntityGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PathRecord) {
        match self.index.get(&record.owner) {
            Some(&i) => self.groups[i].records.push(record),
            None => {
                self.index.insert(record.owner.clone(), self.groups.len());
                self.groups.push(EntityGroup {
                    owner: record.owner.clone(),
                    records: vec![record],
                });
            }
        }
    }

    pub fn get(&self, owner: &OwnerKey) -> Option<&EntityGroup> {
        self.index.get(owner).map(|&i| &self.groups[i])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityGroup> {
        self.groups.iter()
    }
}

impl IntoIterator for EntityGroups {
    type Item = EntityGroup;
    type IntoIter = std::vec::IntoIter<EntityGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Remote metadata
// ---------------------------------------------------------------------------

pub const LIVE_STATUS: &str = "live";

/// Authoritative attachment data for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub status: String,
    pub view_link: String,
    /// Raw attachment filenames; may contain duplicates.
    pub filenames: Vec<String>,
}

impl AttachmentInfo {
    pub fn is_live(&self) -> bool {
        self.status == LIVE_STATUS
    }

    /// Filenames with duplicates removed, first occurrence wins.
    pub fn candidates(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.filenames
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The question mark was a real character; nothing to rename.
    ExactLiteral,
    Renameable(String),
    NoMatch,
    AmbiguousMatch(Vec<String>),
    /// The name could not be turned into a pattern (too long); carries the reason.
    Unmatchable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub record: PathRecord,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    /// Fetched but not published. Produces no output at all.
    Skipped { status: String },
    Failed(FetchError),
    Reconciled { view_link: String, outcomes: Vec<RecordOutcome> },
}

/// Everything one group produced, delivered as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub owner: OwnerKey,
    pub status: GroupStatus,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: usize,
    pub reconciled: usize,
    pub skipped: usize,
    pub failed: usize,
    pub renames: usize,
    pub literal: usize,
    pub no_match: usize,
    pub ambiguous: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &GroupReport) {
        self.groups += 1;
        match &report.status {
            GroupStatus::Skipped { .. } => self.skipped += 1,
            GroupStatus::Failed(_) => self.failed += 1,
            GroupStatus::Reconciled { outcomes, .. } => {
                self.reconciled += 1;
                for o in outcomes {
                    match o.outcome {
                        MatchOutcome::ExactLiteral => self.literal += 1,
                        MatchOutcome::Renameable(_) => self.renames += 1,
                        MatchOutcome::NoMatch | MatchOutcome::Unmatchable(_) => self.no_match += 1,
                        MatchOutcome::AmbiguousMatch(_) => self.ambiguous += 1,
                    }
                }
            }
        }
    }

    /// Records that still need a human to look at them.
    pub fn unresolved(&self) -> usize {
        self.no_match + self.ambiguous
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items ({} reconciled, {} not live, {} failed): {} renames, {} literal, {} unmatched, {} ambiguous",
            self.groups,
            self.reconciled,
            self.skipped,
            self.failed,
            self.renames,
            self.literal,
            self.no_match,
            self.ambiguous,
        )
    }
}
