//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::project::Project;

/// Find the project from `--project` or by walking up from the current directory
pub fn discover_project(global: &GlobalOpts) -> Result<Project> {
    let found = match global.project {
        Some(ref root) => Project::discover_from(root),
        None => Project::discover(),
    };
    found.map_err(|e| miette::miette!("{}", e))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Make a value safe for a single TSV cell
pub fn tsv_cell(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

/// Format an optional number, using an empty string for `None`
pub fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("fragancia ñ", 8), "fraga...");
    }

    #[test]
    fn test_tsv_cell() {
        assert_eq!(tsv_cell("simple"), "simple");
        assert_eq!(tsv_cell("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_opt_to_string() {
        assert_eq!(opt_to_string(Some(3u32)), "3");
        assert_eq!(opt_to_string::<u32>(None), "");
    }
}
