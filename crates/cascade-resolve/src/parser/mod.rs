//! Parsers for `dependencies.txt` and `clusters.txt`.
//!
//! Each line is classified into an explicit token so that malformed input is
//! handled the same way every time: callers log [`DependencyLine::Malformed`]
//! and [`ClusterLine::Malformed`] and move on.

pub mod lexer;

use cascade_common::constants::CLUSTER_ASSIGN;
use cascade_common::types::{ClusterId, ComponentName};

/// One classified line of a `dependencies.txt` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyLine {
    /// Empty, whitespace-only, or comment-only line.
    Blank,
    /// The single component this directory depends on.
    Name(ComponentName),
    /// A line that does not name exactly one component.
    Malformed {
        /// Why the line was rejected.
        reason: String,
    },
}

/// One classified line of a `clusters.txt` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterLine {
    /// Empty, whitespace-only, or comment-only line.
    Blank,
    /// `<id> = <member>, <member> ...`
    Declaration {
        /// Cluster identifier on the left of `=`.
        id: ClusterId,
        /// Raw member paths, relative to the declaring directory.
        members: Vec<String>,
    },
    /// A line that is not a valid cluster declaration.
    Malformed {
        /// Why the line was rejected.
        reason: String,
    },
}

/// Classifies a single `dependencies.txt` line.
#[must_use]
pub fn parse_dependency_line(line: &str) -> DependencyLine {
    let content = lexer::strip_comment(line);
    if content.is_empty() {
        return DependencyLine::Blank;
    }
    match lexer::single_word(content) {
        Ok((_, name)) => DependencyLine::Name(ComponentName::new(name)),
        Err(_) => DependencyLine::Malformed {
            reason: format!("expected a single component name, got \"{content}\""),
        },
    }
}

/// Classifies a single `clusters.txt` line.
#[must_use]
pub fn parse_cluster_line(line: &str) -> ClusterLine {
    let content = lexer::strip_comment(line);
    if content.is_empty() {
        return ClusterLine::Blank;
    }

    let Ok((_, (id, members))) = lexer::assignment(content) else {
        return malformed_cluster(format!("missing '{CLUSTER_ASSIGN}' in \"{content}\""));
    };

    let id = id.trim();
    if id.is_empty() {
        return malformed_cluster(format!("empty cluster id in \"{content}\""));
    }
    if id.contains(char::is_whitespace) {
        return malformed_cluster(format!("cluster id \"{id}\" contains whitespace"));
    }
    if members.contains(CLUSTER_ASSIGN) {
        return malformed_cluster(format!("more than one '{CLUSTER_ASSIGN}' in \"{content}\""));
    }

    match lexer::member_list(members) {
        Ok((_, members)) => ClusterLine::Declaration {
            id: ClusterId::new(id),
            members: members.into_iter().map(str::to_owned).collect(),
        },
        Err(e) => malformed_cluster(format!("unreadable member list in \"{content}\" ({e})")),
    }
}

const fn malformed_cluster(reason: String) -> ClusterLine {
    ClusterLine::Malformed { reason }
}

/// Parses a whole `dependencies.txt`, pairing each line with its 1-based
/// line number. Blank lines are omitted.
#[must_use]
pub fn parse_dependencies(text: &str) -> Vec<(usize, DependencyLine)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, parse_dependency_line(line)))
        .filter(|(_, line)| *line != DependencyLine::Blank)
        .collect()
}

/// Parses a whole `clusters.txt`, pairing each line with its 1-based line
/// number. Blank lines are omitted.
#[must_use]
pub fn parse_clusters(text: &str) -> Vec<(usize, ClusterLine)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, parse_cluster_line(line)))
        .filter(|(_, line)| *line != ClusterLine::Blank)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DependencyLine {
        DependencyLine::Name(ComponentName::new(s))
    }

    #[test]
    fn dependency_with_comment_equals_plain() {
        assert_eq!(parse_dependency_line("compX # not used"), name("compX"));
        assert_eq!(parse_dependency_line("compX"), name("compX"));
    }

    #[test]
    fn dependency_comment_only_is_blank() {
        assert_eq!(parse_dependency_line("# libs/core"), DependencyLine::Blank);
        assert_eq!(parse_dependency_line("   \t"), DependencyLine::Blank);
        assert_eq!(parse_dependency_line(""), DependencyLine::Blank);
    }

    #[test]
    fn dependency_path_like_name() {
        assert_eq!(parse_dependency_line("  libs/core  "), name("libs/core"));
        assert_eq!(
            parse_dependency_line("cluster/shared-libs"),
            name("cluster/shared-libs")
        );
    }

    #[test]
    fn dependency_two_names_is_malformed() {
        let line = parse_dependency_line("libs/core libs/extra");
        assert!(
            matches!(line, DependencyLine::Malformed { ref reason } if reason.contains("libs/core libs/extra")),
            "got: {line:?}"
        );
    }

    #[test]
    fn cluster_declaration_with_commas() {
        let line = parse_cluster_line("shared-libs = libs/core, libs/extra");
        assert_eq!(
            line,
            ClusterLine::Declaration {
                id: ClusterId::new("shared-libs"),
                members: vec!["libs/core".into(), "libs/extra".into()],
            }
        );
    }

    #[test]
    fn cluster_declaration_with_whitespace_only() {
        let line = parse_cluster_line("web=app admin   # frontends");
        assert_eq!(
            line,
            ClusterLine::Declaration {
                id: ClusterId::new("web"),
                members: vec!["app".into(), "admin".into()],
            }
        );
    }

    #[test]
    fn cluster_declaration_without_members() {
        let line = parse_cluster_line("empty =");
        assert_eq!(
            line,
            ClusterLine::Declaration {
                id: ClusterId::new("empty"),
                members: Vec::new(),
            }
        );
    }

    #[test]
    fn cluster_missing_equals_is_malformed() {
        let line = parse_cluster_line("shared-libs libs/core");
        assert!(
            matches!(line, ClusterLine::Malformed { ref reason } if reason.contains("missing '='")),
            "got: {line:?}"
        );
    }

    #[test]
    fn cluster_empty_id_is_malformed() {
        assert!(matches!(
            parse_cluster_line(" = libs/core"),
            ClusterLine::Malformed { .. }
        ));
    }

    #[test]
    fn cluster_id_with_space_is_malformed() {
        assert!(matches!(
            parse_cluster_line("shared libs = libs/core"),
            ClusterLine::Malformed { .. }
        ));
    }

    #[test]
    fn cluster_second_equals_is_malformed() {
        assert!(matches!(
            parse_cluster_line("a = b = c"),
            ClusterLine::Malformed { .. }
        ));
    }

    #[test]
    fn cluster_equals_inside_comment_is_ignored() {
        assert!(matches!(
            parse_cluster_line("shared # = libs/core"),
            ClusterLine::Malformed { .. }
        ));
    }

    #[test]
    fn parse_dependencies_reports_line_numbers() {
        let text = "# header\nlibs/core\n\nlibs/extra # pinned\nbad line\n";
        let lines = parse_dependencies(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (2, name("libs/core")));
        assert_eq!(lines[1], (4, name("libs/extra")));
        assert_eq!(lines[2].0, 5);
        assert!(matches!(lines[2].1, DependencyLine::Malformed { .. }));
    }

    #[test]
    fn parse_clusters_skips_blank_lines() {
        let text = "\n# clusters\nshared = a, b\n\nbroken\n";
        let lines = parse_clusters(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, 3);
        assert!(matches!(lines[0].1, ClusterLine::Declaration { .. }));
        assert_eq!(lines[1].0, 5);
        assert!(matches!(lines[1].1, ClusterLine::Malformed { .. }));
    }
}
