//! CLI Exit Code Registry
//!
//! Single source of truth for `qmark` exit codes. Scripts wrapping the
//! tool rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success (every item fetched; unresolved records are fine) |
//! | 1    | General error (e.g. stdout closed)                        |
//! | 2    | Usage error (bad arguments)                               |
//! | 3    | Input listing unreadable or malformed                     |
//! | 4    | No usable API token                                       |
//! | 5    | One or more items could not be fetched                    |
//!
//! Code 5 is reported after the script has been written: the commands
//! that were printed are still valid for the items that were fetched.

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. Matches clap's own exit code.
pub const EXIT_USAGE: u8 = 2;

/// Input listing missing, unreadable, or a line is malformed.
pub const EXIT_INPUT: u8 = 3;

/// Token file missing/empty and no `QMARK_TOKEN`.
pub const EXIT_NOT_AUTH: u8 = 4;

/// At least one item fetch failed (network, HTTP status, bad JSON).
pub const EXIT_FETCH_FAILED: u8 = 5;
