use crate::error::GitResult;
use semver::Version;
use serde::Serialize;

/// Parse `git show-ref` output: `<hash> <full-ref-path>` per line
///
/// Malformed lines are skipped. The short name is the last `/`-delimited
/// segment of the ref path; refs under `refs/remotes/` carry the tracking
/// remote's name.
pub fn parse_show_ref(output: &str) -> GitResult<Vec<ShowRefEntry>> {
    let mut entries = Vec::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let hash = parts[0];
        let path = parts[1];

        let name = path.rsplit('/').next().unwrap_or(path);
        let remote = path
            .strip_prefix("refs/remotes/")
            .and_then(|rest| rest.split('/').next())
            .map(|remote| remote.to_string());

        entries.push(ShowRefEntry {
            hash: hash.to_string(),
            name: name.to_string(),
            remote,
        });
    }

    Ok(entries)
}

/// Parse a combined change listing: porcelain status lines interleaved with
/// `---- <submodule-path>` sentinel lines
///
/// A sentinel sets the current submodule path (empty for the top-level
/// tree); every other line is `<2-char-code><space><filename>`. Filenames
/// under a submodule are joined with the submodule's path.
pub fn parse_changes(output: &str) -> GitResult<Vec<ChangeEntry>> {
    let mut entries = Vec::new();
    let mut submodule = String::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("----") {
            submodule = rest.trim().to_string();
            continue;
        }

        // Status codes are ASCII, so byte slicing is safe; skip anything
        // too short to carry a filename.
        let (code, name) = match (line.get(..2), line.get(3..)) {
            (Some(code), Some(name)) if !name.is_empty() => (code, name),
            _ => continue,
        };

        let path = if submodule.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", submodule, name)
        };

        entries.push(ChangeEntry {
            code: code.to_string(),
            path,
            submodule: submodule.clone(),
        });
    }

    Ok(entries)
}

/// Parse `git tag --list` output into the semver-ordered tag names,
/// highest first
///
/// Tags that do not parse as semantic versions (an optional leading `v` is
/// allowed) are dropped.
pub fn parse_tag_list(output: &str) -> GitResult<Vec<String>> {
    let mut tags: Vec<(Version, String)> = Vec::new();

    for line in output.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        if let Some(version) = parse_semver(name) {
            tags.push((version, name.to_string()));
        }
    }

    tags.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(tags.into_iter().map(|(_, name)| name).collect())
}

fn parse_semver(tag: &str) -> Option<Version> {
    let bare = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(bare).ok()
}

/// Represents one ref from `git show-ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRefEntry {
    pub hash: String,
    /// Short name: the last path segment of the full ref
    pub name: String,
    /// Tracking-remote name for refs under `refs/remotes/`, None otherwise
    pub remote: Option<String>,
}

/// Represents one modified, staged, or untracked path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    /// Two-character porcelain status code
    pub code: String,
    /// Repository-relative path, joined with the enclosing submodule path
    /// when the change lives inside a submodule
    pub path: String,
    /// Owning submodule path, empty for the top-level tree
    pub submodule: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_ref_local_and_remote() {
        let output = "\
aaa111 refs/heads/main
bbb222 refs/remotes/origin/main
ccc333 refs/tags/v1.0.0";
        let entries = parse_show_ref(output).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].hash, "aaa111");
        assert_eq!(entries[0].name, "main");
        assert_eq!(entries[0].remote, None);
        assert_eq!(entries[1].name, "main");
        assert_eq!(entries[1].remote.as_deref(), Some("origin"));
        assert_eq!(entries[2].name, "v1.0.0");
        assert_eq!(entries[2].remote, None);
    }

    #[test]
    fn test_parse_show_ref_upstream_remote_name() {
        let output = "ddd444 refs/remotes/upstream/release/candidate";
        let entries = parse_show_ref(output).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "candidate");
        assert_eq!(entries[0].remote.as_deref(), Some("upstream"));
    }

    #[test]
    fn test_parse_show_ref_skips_malformed_lines() {
        let output = "justonehash\n\naaa111 refs/heads/main";
        let entries = parse_show_ref(output).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "main");
    }

    #[test]
    fn test_parse_changes_top_level_and_submodule() {
        let output = "----\nM  a.txt\n---- sub\nM  b.txt";
        let entries = parse_changes(output).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "M ");
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[0].submodule, "");
        assert_eq!(entries[1].code, "M ");
        assert_eq!(entries[1].path, "sub/b.txt");
        assert_eq!(entries[1].submodule, "sub");
    }

    #[test]
    fn test_parse_changes_untracked_and_unstaged_codes() {
        let output = "----\n?? new.txt\n M lib.rs\nA  staged.rs";
        let entries = parse_changes(output).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].code, "??");
        assert_eq!(entries[0].path, "new.txt");
        assert_eq!(entries[1].code, " M");
        assert_eq!(entries[2].code, "A ");
    }

    #[test]
    fn test_parse_changes_nested_submodule_path() {
        let output = "----\n---- libs/inner\nD  gone.c";
        let entries = parse_changes(output).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "libs/inner/gone.c");
        assert_eq!(entries[0].submodule, "libs/inner");
    }

    #[test]
    fn test_parse_changes_drops_blank_and_short_lines() {
        let output = "----\n\nM  kept.txt\n??\n";
        let entries = parse_changes(output).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "kept.txt");
    }

    #[test]
    fn test_parse_changes_path_with_spaces() {
        let output = "----\nM  my file with spaces.txt";
        let entries = parse_changes(output).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "my file with spaces.txt");
    }

    #[test]
    fn test_parse_tag_list_sorts_descending() {
        let output = "v1.2.3\nv1.10.0\nv1.9.9\n2.0.0";
        let tags = parse_tag_list(output).unwrap();

        assert_eq!(tags, vec!["2.0.0", "v1.10.0", "v1.9.9", "v1.2.3"]);
    }

    #[test]
    fn test_parse_tag_list_drops_non_semver() {
        let output = "v1.0.0\nnightly\nrelease-candidate\nv0.9";
        let tags = parse_tag_list(output).unwrap();

        assert_eq!(tags, vec!["v1.0.0"]);
    }

    #[test]
    fn test_parse_tag_list_prerelease_ordering() {
        let output = "v2.0.0-rc.1\nv2.0.0\nv2.0.0-beta.3";
        let tags = parse_tag_list(output).unwrap();

        assert_eq!(tags, vec!["v2.0.0", "v2.0.0-rc.1", "v2.0.0-beta.3"]);
    }

    #[test]
    fn test_parse_tag_list_crlf_output() {
        let output = "v1.0.0\r\nv1.1.0\r\n";
        let tags = parse_tag_list(output).unwrap();

        assert_eq!(tags, vec!["v1.1.0", "v1.0.0"]);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_show_ref("").unwrap().len(), 0);
        assert_eq!(parse_changes("").unwrap().len(), 0);
        assert_eq!(parse_tag_list("").unwrap().len(), 0);
    }
}
