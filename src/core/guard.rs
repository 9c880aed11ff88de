//! Structural protection for destructive edits
//!
//! Deletes are refused as a unit when any line in range is protected. The
//! default rule is a text-prefix heuristic; it does not parse the file.

use crate::infra::config::GuardConfig;

/// Decides whether a single line may be removed by a delete.
pub trait LineGuard {
    fn is_protected(&self, line: &str) -> bool;
}

/// Protects lines starting with a definition marker, and blank lines.
#[derive(Debug, Clone)]
pub struct PrefixGuard {
    markers: Vec<String>,
    protect_blank: bool,
}

impl PrefixGuard {
    pub fn new(markers: Vec<String>, protect_blank: bool) -> Self {
        Self {
            markers,
            protect_blank,
        }
    }

    pub fn from_config(cfg: &GuardConfig) -> Self {
        Self::new(cfg.markers.clone(), cfg.protect_blank)
    }
}

impl Default for PrefixGuard {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl LineGuard for PrefixGuard {
    fn is_protected(&self, line: &str) -> bool {
        let t = line.trim();
        if t.is_empty() {
            return self.protect_blank;
        }
        self.markers.iter().any(|m| t.starts_with(m.as_str()))
    }
}

/// A line that blocked a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedLine {
    pub line_no: usize, // 1-based
    pub text: String,
}

/// Every protected line inside the inclusive 1-based range `start..=end`.
///
/// The range must already be within `lines`; callers check bounds first.
pub fn protected_lines(
    guard: &dyn LineGuard,
    lines: &[String],
    start: usize,
    end: usize,
) -> Vec<ProtectedLine> {
    lines[start - 1..end]
        .iter()
        .enumerate()
        .filter(|(_, l)| guard.is_protected(l))
        .map(|(i, l)| ProtectedLine {
            line_no: start + i,
            text: l.trim_end().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_markers() {
        let g = PrefixGuard::default();
        assert!(g.is_protected("def main():"));
        assert!(g.is_protected("    class Foo:"));
        assert!(g.is_protected(""));
        assert!(g.is_protected("   \t"));
        assert!(!g.is_protected("x = define()"));
        assert!(!g.is_protected("    return 1"));
    }

    #[test]
    fn test_blank_protection_is_optional() {
        let g = PrefixGuard::new(vec!["fn ".into()], false);
        assert!(!g.is_protected("   "));
        assert!(g.is_protected("fn main() {"));
        assert!(!g.is_protected("def main():"));
    }

    #[test]
    fn test_protected_lines_reports_one_based_numbers() {
        let buf = lines(&["a = 1", "", "def f():", "    pass", "b = 2"]);
        let hits = protected_lines(&PrefixGuard::default(), &buf, 2, 4);
        assert_eq!(
            hits,
            vec![
                ProtectedLine {
                    line_no: 2,
                    text: String::new()
                },
                ProtectedLine {
                    line_no: 3,
                    text: "def f():".into()
                },
            ]
        );
        assert!(protected_lines(&PrefixGuard::default(), &buf, 4, 5).is_empty());
    }

    struct Never;
    impl LineGuard for Never {
        fn is_protected(&self, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_guard_plugs_in() {
        let buf = lines(&["", "def f():"]);
        assert!(protected_lines(&Never, &buf, 1, 2).is_empty());
    }
}
