//! `qmark-recon` - question-mark filename reconciliation engine.
//!
//! Pure engine crate: parses the export listing, matches mangled filenames
//! against authoritative attachment names, and renders rename commands.
//! No HTTP; metadata comes in through [`AttachmentSource`].

pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod parse;
pub mod script;

pub use engine::{run, AttachmentSource, RunOptions};
pub use error::{FetchError, ParseError, ReconError};
pub use matcher::match_filename;
pub use model::{AttachmentInfo, EntityGroups, GroupReport, MatchOutcome, OwnerKey, RunSummary};
pub use parse::{parse_lines, PathLayout};
