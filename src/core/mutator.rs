//! In-memory application of one intent to a file's line sequence.

use crate::core::error::ExecError;
use crate::core::guard::{LineGuard, ProtectedLine, protected_lines};
use crate::core::intent::{Command, Intent, Payload};

/// Result of a mutation attempt that did not error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// Delete refused by the guard; buffer untouched
    Refused(Vec<ProtectedLine>),
}

/// Apply `intent` to `lines` (0-indexed storage, 1-based addressing).
///
/// Deletes are checked against `guard` after the bounds check; a refused
/// delete leaves `lines` untouched. Nothing is mutated on error.
pub fn apply_intent(
    lines: &mut Vec<String>,
    intent: &Intent,
    guard: &dyn LineGuard,
) -> Result<Mutation, ExecError> {
    let len = lines.len();

    match intent.command {
        Command::Modify => {
            let at = line_at(intent, len, len)?;
            lines[at - 1] = single_line(intent)?;
        }
        Command::Insert => {
            let at = line_at(intent, len + 1, len)?;
            let text = single_line(intent)?;
            lines.insert(at - 1, text);
        }
        Command::Delete => {
            let (start, end) = span(intent, len)?;
            let hits = protected_lines(guard, lines, start, end);
            if !hits.is_empty() {
                return Ok(Mutation::Refused(hits));
            }
            lines.drain(start - 1..end);
        }
        Command::Append => {
            lines.push(single_line(intent)?);
        }
        Command::Replace => {
            let (start, end) = span(intent, len)?;
            let replacement = match &intent.payload {
                Some(Payload::Lines(v)) => v.iter().map(|l| normalize(l)).collect::<Vec<_>>(),
                _ => return Err(type_mismatch(intent, "a list of lines")),
            };
            lines.splice(start - 1..end, replacement);
        }
    }

    Ok(Mutation::Applied)
}

/// Validate a single-line address: `1 <= n <= max`.
fn line_at(intent: &Intent, max: usize, len: usize) -> Result<usize, ExecError> {
    match intent.line_start {
        Some(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(out_of_range(intent, len)),
    }
}

/// Validate an inclusive span: `1 <= start <= end <= len`.
fn span(intent: &Intent, len: usize) -> Result<(usize, usize), ExecError> {
    match (intent.line_start, intent.line_end) {
        (Some(s), Some(e)) if s >= 1 && s <= e && e <= len => Ok((s, e)),
        _ => Err(out_of_range(intent, len)),
    }
}

fn single_line(intent: &Intent) -> Result<String, ExecError> {
    match &intent.payload {
        Some(Payload::Line(text)) => Ok(normalize(text)),
        _ => Err(type_mismatch(intent, "a single line")),
    }
}

/// Strip any line terminator carried in payload text.
fn normalize(text: &str) -> String {
    text.trim_end_matches(['\r', '\n']).to_string()
}

fn out_of_range(intent: &Intent, len: usize) -> ExecError {
    ExecError::OutOfRange {
        file: intent.target.clone(),
        command: intent.command,
        range: intent.range_label(),
        len,
    }
}

fn type_mismatch(intent: &Intent, expected: &'static str) -> ExecError {
    ExecError::TypeMismatch {
        file: intent.target.clone(),
        command: intent.command,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::guard::PrefixGuard;
    use crate::core::intent::Literal;

    fn buf(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn run(lines: &mut Vec<String>, intent: Intent) -> Result<Mutation, ExecError> {
        apply_intent(lines, &intent, &PrefixGuard::default())
    }

    #[test]
    fn test_modify_replaces_line() {
        let mut b = buf(&["a", "b", "c"]);
        run(&mut b, Intent::modify("f", 2, "B\n")).unwrap();
        assert_eq!(b, buf(&["a", "B", "c"]));
    }

    #[test]
    fn test_modify_bounds() {
        let mut b = buf(&["a", "b"]);
        for n in [0, 3] {
            let err = run(&mut b, Intent::modify("f", n, "x")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange);
        }
        assert_eq!(b, buf(&["a", "b"]));
    }

    #[test]
    fn test_insert_before_and_at_end() {
        let mut b = buf(&["a", "b"]);
        run(&mut b, Intent::insert("f", 1, "first")).unwrap();
        run(&mut b, Intent::insert("f", 4, "last")).unwrap();
        assert_eq!(b, buf(&["first", "a", "b", "last"]));
        assert!(run(&mut b, Intent::insert("f", 6, "x")).is_err());
        assert!(run(&mut b, Intent::insert("f", 0, "x")).is_err());
    }

    #[test]
    fn test_delete_range() {
        let mut b = buf(&["a", "b", "c", "d"]);
        assert_eq!(run(&mut b, Intent::delete("f", 2, 3)).unwrap(), Mutation::Applied);
        assert_eq!(b, buf(&["a", "d"]));
    }

    #[test]
    fn test_delete_bounds() {
        let mut b = buf(&["a", "b", "c"]);
        for (s, e) in [(0, 1), (2, 1), (2, 4), (4, 4)] {
            let err = run(&mut b, Intent::delete("f", s, e)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange, "{s}-{e}");
        }
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_delete_refused_as_a_unit() {
        let mut b = buf(&["x = 1", "def f():", "    return x", "", "y = 2"]);
        match run(&mut b, Intent::delete("f", 1, 4)).unwrap() {
            Mutation::Refused(hits) => {
                let nums: Vec<_> = hits.iter().map(|h| h.line_no).collect();
                assert_eq!(nums, vec![2, 4]);
            }
            other => panic!("expected refusal, got {other:?}"),
        }
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn test_append_never_out_of_range() {
        let mut b = Vec::new();
        run(&mut b, Intent::append("f", "one")).unwrap();
        run(&mut b, Intent::append("f", "one")).unwrap();
        assert_eq!(b, buf(&["one", "one"]));
    }

    #[test]
    fn test_replace_grows_range() {
        let mut b = buf(&["a", "b", "c", "d"]);
        run(&mut b, Intent::replace("f", 3, 3, vec!["x".into(), "y".into()])).unwrap();
        assert_eq!(b, buf(&["a", "b", "x", "y", "d"]));
    }

    #[test]
    fn test_replace_with_empty_list_shrinks() {
        let mut b = buf(&["a", "b", "c"]);
        run(&mut b, Intent::replace("f", 1, 2, vec![])).unwrap();
        assert_eq!(b, buf(&["c"]));
    }

    #[test]
    fn test_replace_needs_line_list() {
        let mut b = buf(&["a", "b"]);
        let mut intent = Intent::replace("f", 1, 1, vec![]);
        intent.payload = Some(Payload::Line("x".into()));
        let err = run(&mut b, intent).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = run(&mut b, Intent::replace("f", 2, 3, vec![])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_modify_needs_single_line() {
        let mut b = buf(&["a"]);
        let mut intent = Intent::modify("f", 1, "x");
        intent.payload = Some(Payload::Lines(vec!["x".into()]));
        assert_eq!(run(&mut b, intent).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_replace_with_non_string_elements_is_type_mismatch() {
        let mut b = buf(&["a", "b"]);
        let mut intent = Intent::replace("f", 1, 1, vec![]);
        intent.payload = Some(Payload::Values(vec![
            Literal::Str("ok".into()),
            Literal::Number("3".into()),
        ]));
        let err = run(&mut b, intent).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(b, buf(&["a", "b"]));
    }
}
