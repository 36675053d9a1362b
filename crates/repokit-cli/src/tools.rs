//! Forced-command parsing and repository-name hygiene.
//!
//! The shell is wired up as an SSH forced command, so the user's real
//! command line arrives as a single string in `SSH_ORIGINAL_COMMAND`.
//! Repository names come from that untrusted string and are only ever
//! joined under the repository root after passing the safe-name filter.

/// Split a forced-command string into `(command, args)`.
///
/// Parts are whitespace-separated with surrounding single/double quotes
/// stripped, matching what common git/hg clients send. Returns `None`
/// when no command remains.
pub fn parse_forced_command(raw: &str) -> Option<(String, Vec<String>)> {
    let mut parts = raw
        .split_whitespace()
        .map(|part| part.trim_matches(['\'', '"']).to_string())
        .filter(|part| !part.is_empty());
    let command = parts.next()?;
    Some((command, parts.collect()))
}

/// Whether `name` is safe to join under the repository root: non-empty,
/// only alphanumerics and `.`, `_`, `-`, and not starting with a dot
/// (which also rules out `.` and `..`).
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Coerce an arbitrary string into a safe repository name: whitespace
/// becomes `_`, everything outside the safe alphabet is dropped, leading
/// dots are stripped. May return an empty string.
pub fn to_safe_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
