//! Parsers for rclone stdout
//!
//! Only four subcommands have output we read back: `version`,
//! `listremotes`, `config show`, and `lsd`. The formats are not a stable
//! contract, so the parsers accept anything close enough and skip lines
//! they don't recognize rather than failing the whole call.

use chrono::NaiveDateTime;

use pdrive_core::ports::remote_backend::{ConfigDump, RemoteDirEntry, RemoteEntry, ToolVersion};

use crate::error::RcloneError;

/// Parse `version` output
///
/// The first line looks like `rclone v1.66.0`; everything after it
/// (os/arch, go version) is ignored.
pub fn parse_version(stdout: &str) -> Result<ToolVersion, RcloneError> {
    let first = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| RcloneError::Parse("empty version output".to_string()))?;

    let version = first
        .split_whitespace()
        .find_map(|token| token.strip_prefix('v'))
        .filter(|v| v.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .ok_or_else(|| RcloneError::Parse(format!("unrecognized version line: {first}")))?;

    Ok(ToolVersion {
        version: version.to_string(),
        raw: first.to_string(),
    })
}

/// Parse `listremotes` output: one `name:` per line
pub fn parse_remotes(stdout: &str) -> Vec<RemoteEntry> {
    stdout
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_suffix(':'))
        .filter(|name| !name.is_empty())
        .map(|name| RemoteEntry {
            name: name.to_string(),
        })
        .collect()
}

/// Parse `config show <name>` output: `key = value` lines under a
/// `[name]` section header
pub fn parse_config_show(stdout: &str) -> ConfigDump {
    let entries = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('[') && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect();
    ConfigDump::new(entries)
}

/// Parse `lsd` output
///
/// Each line is `<size> <date> <time> <count> <name>`, where size and count
/// are `-1` for directories and the name may contain spaces:
///
/// ```text
///           -1 2024-06-01 10:20:30        -1 My Documents
/// ```
pub fn parse_lsd(stdout: &str) -> Vec<RemoteDirEntry> {
    stdout.lines().filter_map(parse_lsd_line).collect()
}

fn parse_lsd_line(line: &str) -> Option<RemoteDirEntry> {
    let mut rest = line.trim();
    if rest.is_empty() {
        return None;
    }

    // Peel off the four fixed columns; the remainder is the name
    let mut columns = Vec::with_capacity(4);
    for _ in 0..4 {
        let split = rest.find(char::is_whitespace)?;
        columns.push(&rest[..split]);
        rest = rest[split..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }

    let modified =
        NaiveDateTime::parse_from_str(&format!("{} {}", columns[1], columns[2]), "%Y-%m-%d %H:%M:%S")
            .ok();

    Some(RemoteDirEntry {
        name: rest.to_string(),
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- version --

    #[test]
    fn version_parses_first_line() {
        let out = "rclone v1.66.0\n- os/version: ubuntu 22.04 (64 bit)\n- go/version: go1.22.1\n";
        let version = parse_version(out).unwrap();
        assert_eq!(version.version, "1.66.0");
        assert_eq!(version.raw, "rclone v1.66.0");
    }

    #[test]
    fn version_tolerates_beta_suffix() {
        let version = parse_version("rclone v1.67.0-beta.7890.abcdef012\n").unwrap();
        assert_eq!(version.version, "1.67.0-beta.7890.abcdef012");
    }

    #[test]
    fn version_rejects_empty_output() {
        assert!(matches!(parse_version("\n\n"), Err(RcloneError::Parse(_))));
    }

    #[test]
    fn version_rejects_garbage() {
        assert!(matches!(
            parse_version("command not found"),
            Err(RcloneError::Parse(_))
        ));
    }

    // -- listremotes --

    #[test]
    fn remotes_parses_names() {
        let out = "protondrive:\ngdrive:\n";
        let remotes = parse_remotes(out);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "protondrive");
        assert_eq!(remotes[1].name, "gdrive");
    }

    #[test]
    fn remotes_skips_lines_without_colon() {
        let out = "protondrive:\nsome stray warning\n\n";
        let remotes = parse_remotes(out);
        assert_eq!(remotes.len(), 1);
    }

    #[test]
    fn remotes_empty_output() {
        assert!(parse_remotes("").is_empty());
    }

    // -- config show --

    #[test]
    fn config_show_parses_key_values() {
        let out = "[protondrive]\ntype = protondrive\nusername = user@proton.me\npassword = *** ENCRYPTED ***\n";
        let dump = parse_config_show(out);
        assert_eq!(dump.get("type"), Some("protondrive"));
        assert_eq!(dump.get("username"), Some("user@proton.me"));
        assert_eq!(dump.len(), 3);
    }

    #[test]
    fn config_show_skips_headers_and_junk() {
        let out = "[protondrive]\n# comment\nnot a pair\nusername = u@p.me\n";
        let dump = parse_config_show(out);
        assert_eq!(dump.len(), 1);
        assert_eq!(dump.get("username"), Some("u@p.me"));
    }

    #[test]
    fn config_show_keeps_equals_in_values() {
        let out = "password = YWJjZGVmZ2g=\n";
        let dump = parse_config_show(out);
        assert_eq!(dump.get("password"), Some("YWJjZGVmZ2g="));
    }

    // -- lsd --

    #[test]
    fn lsd_parses_directories() {
        let out = "          -1 2024-06-01 10:20:30        -1 Documents\n          -1 2024-06-02 08:00:00        -1 Photos\n";
        let dirs = parse_lsd(out);
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].name, "Documents");
        assert_eq!(
            dirs[0].modified.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-06-01 10:20:30"
        );
    }

    #[test]
    fn lsd_keeps_spaces_in_names() {
        let out = "          -1 2024-06-01 10:20:30        -1 My Tax Documents\n";
        let dirs = parse_lsd(out);
        assert_eq!(dirs[0].name, "My Tax Documents");
    }

    #[test]
    fn lsd_tolerates_unparseable_timestamp() {
        let out = "          -1 unknown when        -1 Stuff\n";
        let dirs = parse_lsd(out);
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].name, "Stuff");
        assert!(dirs[0].modified.is_none());
    }

    #[test]
    fn lsd_skips_short_lines() {
        assert!(parse_lsd("\n-1 only two\n").is_empty());
    }
}
