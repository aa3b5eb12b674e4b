//! G-Code command tokenizer
//!
//! Turns one line of text into a [`Command`]: the operation word, the
//! letter/value parameter words and an optional comment. Tokenizing never
//! fails; fragments that cannot be read are listed in [`Command::issues`].

use cyclekit_core::GcodeError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::trace;

/// One parsed G-code line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    /// First G word on the line (e.g. `"G81"`), `None` for parameter-only lines
    pub operation: Option<String>,
    /// Any further G words, in line order
    pub additional_operations: Vec<String>,
    /// Parameter words; the last occurrence of a letter wins
    pub parameters: BTreeMap<char, f64>,
    /// Parenthesized (or trailing `;`) comment text
    pub comment: Option<String>,
    /// Fragments that could not be tokenized
    pub issues: Vec<GcodeError>,
    /// Trimmed source line
    pub source: String,
}

impl Command {
    /// Numeric value of the operation word (`"G00"` → 0)
    pub fn code_number(&self) -> Option<u32> {
        self.operation.as_deref().and_then(parse_code_number)
    }

    /// Numeric values of every G word on the line, in order
    pub fn code_numbers(&self) -> Vec<u32> {
        self.operation
            .iter()
            .chain(self.additional_operations.iter())
            .filter_map(|word| parse_code_number(word))
            .collect()
    }

    /// Value of a parameter word
    pub fn get(&self, letter: char) -> Option<f64> {
        self.parameters.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn has(&self, letter: char) -> bool {
        self.parameters.contains_key(&letter.to_ascii_uppercase())
    }

    /// True when the line carries an X or Y word
    pub fn has_xy(&self) -> bool {
        self.has('X') || self.has('Y')
    }

    /// True when the line carries no operation and no parameters
    pub fn is_empty(&self) -> bool {
        self.operation.is_none() && self.parameters.is_empty()
    }

    pub fn is_malformed(&self) -> bool {
        !self.issues.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = self
            .operation
            .iter()
            .chain(self.additional_operations.iter())
            .cloned()
            .collect();
        words.extend(
            self.parameters
                .iter()
                .map(|(letter, value)| format!("{}{}", letter, value)),
        );
        write!(f, "{}", words.join(" "))?;
        if let Some(comment) = &self.comment {
            write!(f, " ({})", comment)?;
        }
        Ok(())
    }
}

fn parse_code_number(word: &str) -> Option<u32> {
    word.strip_prefix('G').and_then(|digits| digits.parse().ok())
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"(?P<letter>[A-Z])\s*(?P<value>[^A-Z\s]*)").expect("invalid regex pattern")
    })
}

fn number_regex() -> &'static Regex {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBER_REGEX
        .get_or_init(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("invalid regex pattern"))
}

fn operation_regex() -> &'static Regex {
    static OPERATION_REGEX: OnceLock<Regex> = OnceLock::new();
    OPERATION_REGEX.get_or_init(|| Regex::new(r"^\d+$").expect("invalid regex pattern"))
}

/// Split a comment off an upper-cased line.
///
/// Returns the code part with comment text blanked out (so columns are
/// preserved), the first comment found, and any issue.
fn split_comment(line: &str) -> (String, Option<String>, Option<GcodeError>) {
    let mut code = String::with_capacity(line.len());
    let mut comment: Option<String> = None;
    let mut issue = None;
    let mut chars = line.char_indices();

    while let Some((column, c)) = chars.next() {
        match c {
            '(' => {
                let mut text = String::new();
                let mut closed = false;
                code.push(' ');
                for (_, inner) in chars.by_ref() {
                    code.push(' ');
                    if inner == ')' {
                        closed = true;
                        break;
                    }
                    text.push(inner);
                }
                if !closed {
                    issue = Some(GcodeError::UnterminatedComment { column });
                }
                if comment.is_none() {
                    comment = Some(text.trim().to_string());
                }
            }
            ';' => {
                if comment.is_none() {
                    comment = Some(line[column + 1..].trim().to_string());
                }
                break;
            }
            other => code.push(other),
        }
    }

    (code, comment, issue)
}

/// Tokenize one line of G-code.
///
/// The line is upper-cased. The first `G<digits>` word becomes the operation;
/// every other `<letter><signed decimal>` word becomes a parameter. `G` words
/// are never parameters.
pub fn tokenize(line: &str) -> Command {
    let source = line.trim().to_string();
    let upper = source.to_uppercase();
    let (code, comment, comment_issue) = split_comment(&upper);

    let mut command = Command {
        comment,
        source,
        ..Default::default()
    };
    if let Some(issue) = comment_issue {
        command.issues.push(issue);
    }

    let mut cursor = 0;
    for caps in word_regex().captures_iter(&code) {
        let Some(whole) = caps.get(0) else { continue };
        record_stray_characters(&code[cursor..whole.start()], cursor, &mut command.issues);
        cursor = whole.end();

        let letter = caps["letter"].chars().next().unwrap_or_default();
        let value = &caps["value"];

        if letter == 'G' && operation_regex().is_match(value) {
            let word = format!("G{}", value);
            if command.operation.is_none() {
                command.operation = Some(word);
            } else {
                command.additional_operations.push(word);
            }
            continue;
        }

        match value.parse::<f64>() {
            Ok(number) if number_regex().is_match(value) && letter != 'G' => {
                command.parameters.insert(letter, number);
            }
            _ => command.issues.push(GcodeError::MalformedNumber {
                letter,
                text: value.to_string(),
                column: whole.start(),
            }),
        }
    }
    record_stray_characters(&code[cursor..], cursor, &mut command.issues);

    for issue in &command.issues {
        trace!("Tokenizer issue in '{}': {}", command.source, issue);
    }
    command
}

fn record_stray_characters(gap: &str, offset: usize, issues: &mut Vec<GcodeError>) {
    for (index, character) in gap.char_indices() {
        if !character.is_whitespace() {
            issues.push(GcodeError::UnexpectedCharacter {
                character,
                column: offset + index,
            });
        }
    }
}
