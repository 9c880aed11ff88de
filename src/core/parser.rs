//! Intent line grammar
//!
//! One intent per line, five fixed shapes:
//! - `modify <file> at line <n> with <text>`
//! - `insert <file> at line <n> with <text>`
//! - `delete <file> from line <n> to <m>`
//! - `append <file> with <text>`
//! - `replace <file> lines <n>-<m> with [<string>, ...]`
//!
//! A grammar only has to match from the start of the line. Whatever follows
//! a complete match is ignored: text after the last number of a delete, or
//! after the final `]` of a replace.
//!
//! Line numbers are not range-checked here; that happens against the live
//! file at execution time.

use regex::{Captures, Regex};
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::core::error::ParseError;
use crate::core::intent::{Command, Intent, Literal, Payload, SourcedIntent};

/// Grammars in match precedence order. Modify/Insert come before the looser
/// `append ... with` shape.
static GRAMMARS: LazyLock<[(Command, Regex); 5]> = LazyLock::new(|| {
    let re = |p: &str| Regex::new(p).expect("static intent grammar");
    [
        (Command::Modify, re(r"^modify (\S+) at line (\d+) with (.+)")),
        (Command::Insert, re(r"^insert (\S+) at line (\d+) with (.+)")),
        (Command::Delete, re(r"^delete (\S+) from line (\d+) to (\d+)")),
        (Command::Append, re(r"^append (\S+) with (.+)")),
        (Command::Replace, re(r"^replace (\S+) lines (\d+)-(\d+) with (\[.*\])")),
    ]
});

/// Parse one intent line.
pub fn parse_intent_line(line: &str) -> Result<Intent, ParseError> {
    for (command, grammar) in GRAMMARS.iter() {
        if let Some(caps) = grammar.captures(line) {
            return build_intent(*command, &caps, line);
        }
    }
    Err(ParseError::Malformed(line.to_string()))
}

fn build_intent(command: Command, caps: &Captures<'_>, line: &str) -> Result<Intent, ParseError> {
    let target = PathBuf::from(&caps[1]);
    let number = |i: usize| -> Result<usize, ParseError> {
        caps[i]
            .parse::<usize>()
            .map_err(|_| ParseError::Malformed(line.to_string()))
    };
    let text = |i: usize| Payload::Line(caps[i].to_string());

    let intent = match command {
        Command::Modify | Command::Insert => Intent {
            command,
            target,
            line_start: Some(number(2)?),
            line_end: None,
            payload: Some(text(3)),
        },
        Command::Delete => Intent {
            command,
            target,
            line_start: Some(number(2)?),
            line_end: Some(number(3)?),
            payload: None,
        },
        Command::Append => Intent {
            command,
            target,
            line_start: None,
            line_end: None,
            payload: Some(text(2)),
        },
        Command::Replace => {
            let items = parse_list_literal(&caps[4]).map_err(|reason| ParseError::ListLiteral {
                line: line.to_string(),
                reason,
            })?;
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|l| l.as_str().map(str::to_string))
                .collect();
            let payload = match strings {
                Some(lines) => Payload::Lines(lines),
                None => Payload::Values(items),
            };
            Intent {
                command,
                target,
                line_start: Some(number(2)?),
                line_end: Some(number(3)?),
                payload: Some(payload),
            }
        }
    };
    Ok(intent)
}

/// Read every non-blank, non-comment line of an intent source.
///
/// Parsing never stops early: each line yields either an intent or the error
/// for that line, tagged with its 1-based position in the source.
pub fn parse_intent_source(src: &str) -> Vec<Result<SourcedIntent, (usize, ParseError)>> {
    src.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            // Strip BOM on the first line
            let raw = if idx == 0 { raw.trim_start_matches('\u{FEFF}') } else { raw };
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line_no = idx + 1;
            Some(
                parse_intent_line(line)
                    .map(|intent| SourcedIntent { line_no, intent })
                    .map_err(|e| (line_no, e)),
            )
        })
        .collect()
}

/// Parse a bracketed list literal, e.g. `['a', "b\tc", 3, None]`.
///
/// Elements may be quoted strings, numbers, `True`/`False`/`None`, or nested
/// lists. Whether they are usable as lines is decided at execution time.
pub fn parse_list_literal(src: &str) -> Result<Vec<Literal>, String> {
    let mut chars = src.trim().chars().peekable();
    if chars.next() != Some('[') {
        return Err("expected `[`".into());
    }
    let items = read_list(&mut chars)?;

    skip_ws(&mut chars);
    if let Some(c) = chars.next() {
        return Err(format!("unexpected `{c}` after closing `]`"));
    }
    Ok(items)
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn skip_ws(chars: &mut Chars<'_>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

/// Elements up to and including the closing `]`; the `[` is already consumed.
fn read_list(chars: &mut Chars<'_>) -> Result<Vec<Literal>, String> {
    let mut out = Vec::new();
    loop {
        skip_ws(chars);
        if chars.next_if_eq(&']').is_some() {
            return Ok(out);
        }
        out.push(read_element(chars, out.len() + 1)?);
        skip_ws(chars);
        match chars.next() {
            Some(',') => continue,
            Some(']') => return Ok(out),
            Some(c) => return Err(format!("expected `,` or `]`, found `{c}`")),
            None => return Err("unterminated list".into()),
        }
    }
}

fn read_element(chars: &mut Chars<'_>, index: usize) -> Result<Literal, String> {
    match chars.peek().copied() {
        Some(q @ ('\'' | '"')) => {
            chars.next();
            read_quoted(chars, q).map(Literal::Str)
        }
        Some('[') => {
            chars.next();
            read_list(chars).map(Literal::List)
        }
        Some(_) => {
            let mut word = String::new();
            while let Some(c) =
                chars.next_if(|c| !matches!(c, ',' | '[' | ']') && !c.is_whitespace())
            {
                word.push(c);
            }
            match word.as_str() {
                "True" => Ok(Literal::Bool(true)),
                "False" => Ok(Literal::Bool(false)),
                "None" => Ok(Literal::None),
                w if is_number(w) => Ok(Literal::Number(w.to_string())),
                w => Err(format!("element {index} is not a literal (`{w}`)")),
            }
        }
        None => Err("unterminated list".into()),
    }
}

fn is_number(word: &str) -> bool {
    let digits = word.trim_start_matches(['-', '+']);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.replace('_', "").parse::<f64>().is_ok()
}

fn read_quoted(chars: &mut Chars<'_>, quote: char) -> Result<String, String> {
    let mut s = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string literal".into()),
            Some(c) if c == quote => return Ok(s),
            Some('\\') => s.push(read_escape(chars)?),
            Some(c) => s.push(c),
        }
    }
}

fn read_escape(chars: &mut Chars<'_>) -> Result<char, String> {
    let c = chars.next().ok_or("dangling backslash")?;
    let ch = match c {
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        'x' => hex_char(chars, 2)?,
        'u' if chars.peek() == Some(&'{') => {
            chars.next();
            let mut hex = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(h) if h.is_ascii_hexdigit() && hex.len() < 6 => hex.push(h),
                    _ => return Err("malformed \\u{...} escape".into()),
                }
            }
            code_point(&hex)?
        }
        'u' => hex_char(chars, 4)?,
        other => return Err(format!("unknown escape `\\{other}`")),
    };
    Ok(ch)
}

fn hex_char(chars: &mut Chars<'_>, digits: usize) -> Result<char, String> {
    let hex: String = (0..digits).filter_map(|_| chars.next()).collect();
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected {digits} hex digits in escape"));
    }
    code_point(&hex)
}

fn code_point(hex: &str) -> Result<char, String> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid code point `{hex}`"))
}
