//! Filename matcher.
//!
//! `?` is the only character the export destroyed, so it is the only
//! wildcard. Everything else in the mangled name matches literally, and
//! the pattern must cover the whole candidate.

use regex::Regex;

use crate::model::MatchOutcome;

/// Build the anchored pattern for a mangled filename: each `?` matches any
/// single character, all other characters match themselves.
///
/// Fails only when the compiled program would exceed the regex size limit,
/// which very long names can reach.
pub fn wildcard_pattern(mangled: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(mangled.len() * 2 + 2);
    pattern.push('^');
    let mut buf = [0u8; 4];
    for ch in mangled.chars() {
        if ch == '?' {
            pattern.push('.');
        } else {
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
}

/// Classify a mangled filename against the (deduplicated) candidates.
pub fn match_filename(mangled: &str, candidates: &[String]) -> MatchOutcome {
    if candidates.iter().any(|c| c == mangled) {
        return MatchOutcome::ExactLiteral;
    }

    let re = match wildcard_pattern(mangled) {
        Ok(re) => re,
        Err(e) => {
            log::debug!("no pattern for {} char name: {e}", mangled.chars().count());
            return MatchOutcome::Unmatchable(e.to_string());
        }
    };
    let mut matches: Vec<String> = Vec::new();
    for candidate in candidates {
        if re.is_match(candidate) && !matches.contains(candidate) {
            matches.push(candidate.clone());
        }
    }

    match matches.len() {
        0 => MatchOutcome::NoMatch,
        1 => MatchOutcome::Renameable(matches.remove(0)),
        _ => MatchOutcome::AmbiguousMatch(matches),
    }
}
