//! Parser for the monkey notes format.
//!
//! ```text
//! Monkey 0:
//!   Starting items: 79, 98
//!   Operation: new = old * 19
//!   Test: divisible by 23
//!     If true: throw to monkey 2
//!     If false: throw to monkey 3
//! ```
//!
//! Blocks are separated by blank lines. `old` on the right-hand side of the
//! operation selects the item's own value as operand. The parser only checks
//! structure; range checks (targets, divisors) happen when the troop is built.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{Result, WrapErr};
use regex::Regex;

use crate::agent::{Operand, Operation};
use crate::descriptor::AgentDescriptor;

/// Compiled regex patterns for the notes format
struct NotesPatterns {
    /// Match: "Monkey N:"
    header: Regex,
    /// Match: "Starting items: 79, 98"
    items: Regex,
    /// Match: "Operation: new = old * 19" / "new = old + old"
    operation: Regex,
    /// Match: "Test: divisible by 23"
    test: Regex,
    /// Match: "If true: throw to monkey 2"
    if_true: Regex,
    /// Match: "If false: throw to monkey 3"
    if_false: Regex,
}

impl NotesPatterns {
    fn new() -> Self {
        Self {
            header: Regex::new(r"^Monkey\s+(\d+)\s*:$").expect("Invalid header regex"),
            items: Regex::new(r"^Starting items:\s*(.*)$").expect("Invalid items regex"),
            operation: Regex::new(r"^Operation:\s*new\s*=\s*old\s*([+*])\s*(old|\d+)$")
                .expect("Invalid operation regex"),
            test: Regex::new(r"^Test:\s*divisible by\s+(\d+)$").expect("Invalid test regex"),
            if_true: Regex::new(r"^If true:\s*throw to monkey\s+(\d+)$")
                .expect("Invalid if_true regex"),
            if_false: Regex::new(r"^If false:\s*throw to monkey\s+(\d+)$")
                .expect("Invalid if_false regex"),
        }
    }
}

static PATTERNS: LazyLock<NotesPatterns> = LazyLock::new(NotesPatterns::new);

/// Errors found while reading notes; line numbers are 1-based
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unrecognized line '{content}'")]
    UnrecognizedLine { line: usize, content: String },

    #[error("line {line}: field appears before any 'Monkey N:' header")]
    FieldOutsideBlock { line: usize },

    #[error("line {line}: field '{field}' given twice for monkey {index}")]
    DuplicateField {
        line: usize,
        index: usize,
        field: &'static str,
    },

    #[error("monkey {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("line {line}: '{value}' is not a valid number")]
    InvalidNumber { line: usize, value: String },
}

/// Fields collected for one block
#[derive(Default)]
struct BlockBuilder {
    index: usize,
    items: Option<Vec<u64>>,
    transform: Option<(Operation, Operand)>,
    divisor: Option<u64>,
    if_true: Option<usize>,
    if_false: Option<usize>,
}

impl BlockBuilder {
    fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    fn finish(self) -> Result<AgentDescriptor, ParseError> {
        let index = self.index;
        let missing = |field: &'static str| ParseError::MissingField { index, field };

        let (operation, operand) = self.transform.ok_or_else(|| missing("Operation"))?;
        Ok(AgentDescriptor {
            index,
            starting_items: self.items.ok_or_else(|| missing("Starting items"))?,
            operation,
            operand,
            test_divisor: self.divisor.ok_or_else(|| missing("Test"))?,
            target_if_divisible: self.if_true.ok_or_else(|| missing("If true"))?,
            target_if_not: self.if_false.ok_or_else(|| missing("If false"))?,
        })
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    line: usize,
    index: usize,
    field: &'static str,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateField { line, index, field });
    }
    *slot = Some(value);
    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        line,
        value: value.trim().to_string(),
    })
}

/// Parse notes text into descriptors, in file order
pub fn parse_notes(input: &str) -> Result<Vec<AgentDescriptor>, ParseError> {
    let mut descriptors = Vec::new();
    let mut current: Option<BlockBuilder> = None;

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(caps) = PATTERNS.header.captures(text) {
            if let Some(block) = current.take() {
                descriptors.push(block.finish()?);
            }
            current = Some(BlockBuilder::new(parse_number(&caps[1], line)?));
            continue;
        }

        let block = current
            .as_mut()
            .ok_or(ParseError::FieldOutsideBlock { line })?;
        let index = block.index;

        if let Some(caps) = PATTERNS.items.captures(text) {
            let items = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_number(s, line))
                .collect::<Result<Vec<u64>, _>>()?;
            set_once(&mut block.items, items, line, index, "Starting items")?;
        } else if let Some(caps) = PATTERNS.operation.captures(text) {
            let operation = caps[1]
                .chars()
                .next()
                .and_then(Operation::from_symbol)
                .ok_or_else(|| ParseError::UnrecognizedLine {
                    line,
                    content: text.to_string(),
                })?;
            let operand = match &caps[2] {
                "old" => Operand::SelfValue,
                literal => Operand::Literal(parse_number(literal, line)?),
            };
            set_once(&mut block.transform, (operation, operand), line, index, "Operation")?;
        } else if let Some(caps) = PATTERNS.test.captures(text) {
            set_once(&mut block.divisor, parse_number(&caps[1], line)?, line, index, "Test")?;
        } else if let Some(caps) = PATTERNS.if_true.captures(text) {
            set_once(&mut block.if_true, parse_number(&caps[1], line)?, line, index, "If true")?;
        } else if let Some(caps) = PATTERNS.if_false.captures(text) {
            set_once(&mut block.if_false, parse_number(&caps[1], line)?, line, index, "If false")?;
        } else {
            return Err(ParseError::UnrecognizedLine {
                line,
                content: text.to_string(),
            });
        }
    }

    if let Some(block) = current {
        descriptors.push(block.finish()?);
    }

    log::debug!("Parsed {} monkey descriptors", descriptors.len());
    Ok(descriptors)
}

/// Read and parse a notes file
pub fn parse_notes_file(path: &Path) -> Result<Vec<AgentDescriptor>> {
    log::info!("Reading monkey notes from: {:?}", path);
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read notes file: {}", path.display()))?;
    parse_notes(&content).wrap_err_with(|| format!("Failed to parse notes file: {}", path.display()))
}
