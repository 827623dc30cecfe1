//! Line-level tokenizer.
//!
//! Turns one raw source line into either a classification (blank, comment,
//! header, program number) or an [`InstructionLine`] whose words are already
//! in execution order.

use crate::codes::{GCode, MCode};
use crate::error::GcodeError;
use crate::state::Axis;

/// Letters allowed to start a parameter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLetter { G, X, Y, Z, F, T, M, S }

impl TryFrom<char> for CommandLetter {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'G' => Ok(CommandLetter::G),
            'X' => Ok(CommandLetter::X),
            'Y' => Ok(CommandLetter::Y),
            'Z' => Ok(CommandLetter::Z),
            'F' => Ok(CommandLetter::F),
            'T' => Ok(CommandLetter::T),
            'M' => Ok(CommandLetter::M),
            'S' => Ok(CommandLetter::S),
            other => Err(other),
        }
    }
}

/// One parameter token after conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    Axis(Axis, f64),
    FeedRate(f64),
    SpindleSpeed(i64),
    // Raw token, e.g. "T3"
    Tool(String),
    G(GCode),
    M(MCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionLine {
    pub number: u64,
    pub words: Vec<Word>,
}

/// Shape of a raw line before any state is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLine<'a> {
    Blank,
    Comment,
    Header,
    ProgramNumber(&'a str),
    Code(&'a str),
}

pub fn classify(raw: &str) -> SourceLine<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        SourceLine::Blank
    } else if trimmed.starts_with('(') {
        SourceLine::Comment
    } else if trimmed == "%" {
        SourceLine::Header
    } else if trimmed.starts_with('O') {
        SourceLine::ProgramNumber(trimmed)
    } else {
        SourceLine::Code(trimmed)
    }
}

/// Parse an `N<digits> word word ...` line.
///
/// Words come back sorted by descending token text, which puts the axis words
/// (`Z`, `Y`, `X`) ahead of `M` and `G`. A motion code therefore always sees
/// every axis value given on its line, whatever the source order was.
pub fn parse_instruction(line: usize, raw: &str) -> Result<InstructionLine, GcodeError> {
    let trimmed = raw.trim();
    let malformed = || GcodeError::MalformedInstructionLine { line, found: trimmed.to_string() };

    let rest = trimmed.strip_prefix('N').ok_or_else(malformed)?;
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return Err(malformed());
    }
    let (digits, params) = rest.split_at(digits_end);
    if !params.is_empty() && !params.starts_with(char::is_whitespace) {
        return Err(malformed());
    }
    let number = digits.parse::<u64>().map_err(|_| malformed())?;

    let mut tokens: Vec<&str> = params.split_whitespace().collect();
    tokens.sort_by(|a, b| b.cmp(a));

    let words = tokens
        .into_iter()
        .map(|token| parse_word(line, token))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InstructionLine { number, words })
}

fn parse_word(line: usize, token: &str) -> Result<Word, GcodeError> {
    let mut chars = token.chars();
    let first = chars.next().unwrap_or_default();
    let literal = chars.as_str();

    let letter = CommandLetter::try_from(first).map_err(|letter| GcodeError::UnknownCommandLetter {
        line,
        letter,
        token: token.to_string(),
    })?;

    let number = || {
        parse_number(literal).ok_or_else(|| GcodeError::InvalidNumericLiteral {
            line,
            token: token.to_string(),
        })
    };
    let unsupported = || GcodeError::UnsupportedCode { line, token: token.to_string() };

    Ok(match letter {
        CommandLetter::X => Word::Axis(Axis::X, number()?),
        CommandLetter::Y => Word::Axis(Axis::Y, number()?),
        CommandLetter::Z => Word::Axis(Axis::Z, number()?),
        CommandLetter::F => Word::FeedRate(number()?),
        // Fractional RPM is truncated toward zero.
        CommandLetter::S => Word::SpindleSpeed(number()?.trunc() as i64),
        CommandLetter::T => Word::Tool(token.to_string()),
        CommandLetter::G => Word::G(GCode::from_literal(literal).ok_or_else(unsupported)?),
        CommandLetter::M => Word::M(MCode::from_literal(literal).ok_or_else(unsupported)?),
    })
}

/// Decimal literal: optional sign, digits, at most one dot, then an optional
/// exponent (`1e3`, `2.5E-2`). The whole string must be consumed.
pub fn parse_number(literal: &str) -> Option<f64> {
    let bytes = literal.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut len = 0usize;
    if bytes[len] == b'+' || bytes[len] == b'-' {
        len += 1;
    }

    let mut has_digit = false;
    let mut has_dot = false;
    while len < bytes.len() {
        let b = bytes[len];
        if b.is_ascii_digit() {
            has_digit = true;
            len += 1;
            continue;
        }
        if b == b'.' && !has_dot {
            has_dot = true;
            len += 1;
            continue;
        }
        break;
    }

    if !has_digit {
        return None;
    }

    if len < bytes.len() && (bytes[len] == b'e' || bytes[len] == b'E') {
        len += 1;
        if len < bytes.len() && (bytes[len] == b'+' || bytes[len] == b'-') {
            len += 1;
        }
        let exp_start = len;
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
        if len == exp_start {
            return None;
        }
    }

    if len != bytes.len() {
        return None;
    }
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_lines() {
        assert_eq!(classify(""), SourceLine::Blank);
        assert_eq!(classify("   \t"), SourceLine::Blank);
        assert_eq!(classify("  (roughing pass)"), SourceLine::Comment);
        assert_eq!(classify("%\n"), SourceLine::Header);
        assert_eq!(classify("O1001"), SourceLine::ProgramNumber("O1001"));
        assert_eq!(classify("N5 G90"), SourceLine::Code("N5 G90"));
    }

    #[test]
    fn axis_words_sort_ahead_of_motion_code() {
        let parsed = parse_instruction(2, "N5 G90 G01 X-12.000 Y-12.000").unwrap();
        assert_eq!(parsed.number, 5);
        assert_eq!(
            parsed.words,
            vec![
                Word::Axis(Axis::Y, -12.0),
                Word::Axis(Axis::X, -12.0),
                Word::G(GCode::Absolute),
                Word::G(GCode::Linear),
            ]
        );
    }

    #[test]
    fn g_codes_sort_descending_among_themselves() {
        let parsed = parse_instruction(1, "N1 G00 G17 G21 G40 G49 G80 G94").unwrap();
        let codes: Vec<_> = parsed
            .words
            .iter()
            .map(|w| match w {
                Word::G(g) => g.number(),
                other => panic!("unexpected word {other:?}"),
            })
            .collect();
        assert_eq!(codes, vec![94, 80, 49, 40, 21, 17, 0]);
    }

    #[test]
    fn tool_keeps_raw_token_and_spindle_truncates() {
        let parsed = parse_instruction(1, "N10 T3 S1200.9 M06").unwrap();
        assert_eq!(
            parsed.words,
            vec![
                Word::Tool("T3".to_string()),
                Word::SpindleSpeed(1200),
                Word::M(MCode::ToolChange),
            ]
        );
    }

    #[test]
    fn line_number_only_is_valid() {
        let parsed = parse_instruction(1, "N42").unwrap();
        assert_eq!(parsed.number, 42);
        assert!(parsed.words.is_empty());
    }

    #[test]
    fn rejects_malformed_line_numbers() {
        for raw in ["G01 X1", "N G01", "NX1", "N5G01", "M30"] {
            let err = parse_instruction(4, raw).unwrap_err();
            assert!(
                matches!(err, GcodeError::MalformedInstructionLine { line: 4, .. }),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn rejects_unknown_letter() {
        let err = parse_instruction(3, "N6 A01 Y-12.000").unwrap_err();
        assert!(matches!(err, GcodeError::UnknownCommandLetter { letter: 'A', .. }));
    }

    #[test]
    fn letters_are_case_sensitive() {
        let err = parse_instruction(3, "N6 x1").unwrap_err();
        assert!(matches!(err, GcodeError::UnknownCommandLetter { letter: 'x', .. }));
    }

    #[test]
    fn rejects_bad_numbers() {
        for raw in ["N6 G01 Y.-12.000", "N6 X", "N6 F1e", "N6 Z1.2.3", "N6 Sfast", "N6 Xe3"] {
            let err = parse_instruction(3, raw).unwrap_err();
            assert!(matches!(err, GcodeError::InvalidNumericLiteral { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn rejects_unsupported_codes() {
        let err = parse_instruction(3, "N6 G02 X1").unwrap_err();
        assert!(matches!(err, GcodeError::UnsupportedCode { ref token, .. } if token == "G02"));
        let err = parse_instruction(3, "N6 M08").unwrap_err();
        assert!(matches!(err, GcodeError::UnsupportedCode { .. }));
    }

    #[test]
    fn number_forms() {
        assert_eq!(parse_number("-12.000"), Some(-12.0));
        assert_eq!(parse_number("+4"), Some(4.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn exponent_forms_are_numbers() {
        assert_eq!(parse_number("1e1"), Some(10.0));
        assert_eq!(parse_number("-2.5E-2"), Some(-0.025));
        assert_eq!(parse_number("3e+2"), Some(300.0));
        assert_eq!(parse_number("1e"), None);
        assert_eq!(parse_number("1e400"), None);

        let parsed = parse_instruction(2, "N1 G90 G01 X1e1").unwrap();
        assert_eq!(parsed.words[0], Word::Axis(Axis::X, 10.0));
    }
}
