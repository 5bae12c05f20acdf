use std::fmt;

use crate::error::ParseError;

/// Leading letter of a recognized command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLetter {
    G,
    M,
}

impl CommandLetter {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'G' => Some(CommandLetter::G),
            'M' => Some(CommandLetter::M),
            _ => None,
        }
    }
}

impl fmt::Display for CommandLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLetter::G => f.write_str("G"),
            CommandLetter::M => f.write_str("M"),
        }
    }
}

/// One G/M line broken into letter and code.
///
/// `text` is the normalized line (comment stripped, trimmed, upper-cased);
/// parameters are read from it on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    letter: CommandLetter,
    code: i32,
    text: String,
}

impl ParsedLine {
    /// Parse a raw line.
    ///
    /// Returns `Ok(None)` for blank lines, comment-only lines and lines that
    /// do not start with `G` or `M`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let text = strip_comment(line).to_ascii_uppercase();
        let Some(letter) = text.chars().next().and_then(CommandLetter::from_char) else {
            return Ok(None);
        };
        let code = extract_code(&text)?;
        Ok(Some(Self { letter, code, text }))
    }

    pub fn letter(&self) -> CommandLetter {
        self.letter
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    /// The normalized line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of parameter `letter`, `0.0` when absent.
    pub fn param(&self, letter: char) -> Result<f64, ParseError> {
        extract_param_value(&self.text, letter.to_ascii_uppercase())
    }
}

/// Drop a `;` comment and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '\r'
}

/// Read the integer code that follows the command letter.
///
/// Scans from the second character up to the first space, carriage return
/// or end of line. `"G28"` is 28; `"G"` and `"GX"` are errors.
pub fn extract_code(line: &str) -> Result<i32, ParseError> {
    let text: String = line.chars().skip(1).take_while(|c| !is_delimiter(*c)).collect();
    text.parse::<i32>()
        .map_err(|_| ParseError::InvalidCode { text })
}

/// Read the numeric value following the first `letter` on the line.
///
/// An absent letter is not an error: the value defaults to `0.0`.
///
/// The character right after the letter is always taken, even when it is a
/// delimiter; scanning for a space, carriage return or end of line starts
/// one character later. The collected text is then trimmed, so `"Z 5"` reads
/// as 5.0. A letter with nothing after it is [`ParseError::MissingValue`].
pub fn extract_param_value(line: &str, letter: char) -> Result<f64, ParseError> {
    let Some(idx) = line.find(letter) else {
        return Ok(0.0);
    };

    let mut rest = line[idx + letter.len_utf8()..].chars();
    let first = rest.next().ok_or(ParseError::MissingValue { letter })?;

    let mut text = String::new();
    text.push(first);
    text.extend(rest.take_while(|c| !is_delimiter(*c)));

    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            letter,
            text: trimmed.to_string(),
        })
}
