//! Property tests for the intent grammar.

use intentedit::core::error::ParseError;
use intentedit::core::intent::{Command, Intent};
use intentedit::core::parser::parse_intent_line;
use proptest::prelude::*;

fn file_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,24}"
}

/// Free text that does not start or end with whitespace
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_(){}=:#\"' ]{0,30}[a-zA-Z0-9_(){}=:#]"
}

/// Python-style single-quoted literal for `s`
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

proptest! {
    #[test]
    fn single_line_commands_recover_their_fields(
        file in file_name(),
        n in 0usize..100_000,
        body in text(),
        cmd in prop_oneof![Just(Command::Modify), Just(Command::Insert)],
    ) {
        let line = format!("{cmd} {file} at line {n} with {body}");
        let expected = match cmd {
            Command::Modify => Intent::modify(&file, n, &body),
            _ => Intent::insert(&file, n, &body),
        };
        prop_assert_eq!(parse_intent_line(&line).unwrap(), expected);
    }

    #[test]
    fn delete_and_append_recover_their_fields(
        file in file_name(),
        n in 0usize..100_000,
        m in 0usize..100_000,
        body in text(),
    ) {
        let delete = format!("delete {file} from line {n} to {m}");
        prop_assert_eq!(parse_intent_line(&delete).unwrap(), Intent::delete(&file, n, m));

        let append = format!("append {file} with {body}");
        prop_assert_eq!(parse_intent_line(&append).unwrap(), Intent::append(&file, &body));
    }

    #[test]
    fn replace_recovers_every_list_element(
        file in file_name(),
        n in 1usize..1_000,
        len in 0usize..10,
        items in prop::collection::vec("[ -~]{0,12}", 0..6),
    ) {
        let literal = format!(
            "[{}]",
            items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(", ")
        );
        let line = format!("replace {file} lines {n}-{} with {literal}", n + len);
        prop_assert_eq!(
            parse_intent_line(&line).unwrap(),
            Intent::replace(&file, n, n + len, items.clone())
        );
    }

    #[test]
    fn text_after_a_complete_delete_is_ignored(
        file in file_name(),
        n in 0usize..100_000,
        m in 0usize..100_000,
        tail in " [ -~]{0,20}",
    ) {
        let line = format!("delete {file} from line {n} to {m}{tail}");
        prop_assert_eq!(parse_intent_line(&line).unwrap(), Intent::delete(&file, n, m));
    }

    #[test]
    fn lines_without_a_command_keyword_are_malformed(line in "[A-Z0-9 ][ -~]{0,40}") {
        match parse_intent_line(&line) {
            Err(ParseError::Malformed(text)) => prop_assert_eq!(text, line),
            other => prop_assert!(false, "expected Malformed, got {:?}", other),
        }
    }
}
