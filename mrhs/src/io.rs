//! Textual serialization of MRHS systems, plus human-readable printing.
//!
//! The on-disk format is line oriented: a `rows blocks` header, one
//! `width rhs_count` line per block, the joint coefficient rows wrapped in
//! `[ ... ]` with one bit string per block, then each block's right-hand
//! sides, one bracketed bit string per line. Bit strings are written most
//! significant column first. The reader skips anything outside brackets, so
//! decorated or hand-edited files load fine.

use crate::system::{EquationBlock, MrhsSystem};
use bitrow::{Block, BLOCK_BITS};
use itertools::Itertools;
use std::fmt;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors the textual reader can produce.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// The leading dimension lines are missing, non-numeric or oversized.
    #[error("malformed header")]
    Header,

    /// The body ended before every declared row was read.
    #[error("unexpected end of input")]
    Truncated,

    /// Something other than a bit appeared inside a bracketed row.
    #[error("invalid bit character {found:?}")]
    Digit { found: char },
}

/// Serializes a system in the textual format. A system with no blocks
/// writes nothing, mirroring the reader's inability to represent one.
pub fn write_system<W: Write>(writer: &mut W, system: &MrhsSystem) -> io::Result<()> {
    if system.block_count() == 0 {
        return Ok(());
    }
    writeln!(writer, "{} {}", system.row_count(), system.block_count())?;
    for block in &system.blocks {
        writeln!(writer, "{} {}", block.width(), block.rhs_count())?;
    }
    for row in 0..system.row_count() {
        write!(writer, "[ ")?;
        for block in &system.blocks {
            write_bits(writer, block.lhs.row(row), block.width())?;
            write!(writer, " ")?;
        }
        writeln!(writer, "]")?;
    }
    for block in &system.blocks {
        writeln!(writer)?;
        for row in 0..block.rhs_count() {
            write!(writer, "[")?;
            write_bits(writer, block.rhs.row(row), block.width())?;
            writeln!(writer, "]")?;
        }
    }
    Ok(())
}

/// Deserializes a system from the textual format.
pub fn read_system<R: BufRead>(reader: &mut R) -> Result<MrhsSystem, ReadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_system(&text)
}

/// Parses a system from in-memory text.
pub fn parse_system(text: &str) -> Result<MrhsSystem, ReadError> {
    let mut scanner = Scanner::new(text);
    let row_count = scanner.integer()?;
    let block_count = scanner.integer()?;
    let mut shapes = Vec::with_capacity(block_count);
    for _ in 0..block_count {
        let width = scanner.integer()?;
        let rhs_count = scanner.integer()?;
        if width > BLOCK_BITS {
            return Err(ReadError::Header);
        }
        shapes.push((width, rhs_count));
    }

    let mut system = MrhsSystem::variable(row_count, &shapes);
    for row in 0..row_count {
        scanner.skip_to_bracket()?;
        for block in &mut system.blocks {
            let value = scanner.bits(block.width())?;
            block.lhs.assign_row(row, value);
        }
    }
    for block in &mut system.blocks {
        for row in 0..block.rhs_count() {
            scanner.skip_to_bracket()?;
            let value = scanner.bits(block.width())?;
            block.rhs.assign_row(row, value);
        }
    }
    Ok(system)
}

fn write_bits<W: Write>(writer: &mut W, value: Block, width: usize) -> io::Result<()> {
    for column in (0..width).rev() {
        write!(writer, "{}", u8::from(value.index(column)))?;
    }
    Ok(())
}

struct Scanner<'text> {
    bytes: &'text [u8],
    position: usize,
}

impl<'text> Scanner<'text> {
    fn new(text: &'text str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn integer(&mut self) -> Result<usize, ReadError> {
        while self.position < self.bytes.len() && self.bytes[self.position].is_ascii_whitespace() {
            self.position += 1;
        }
        let start = self.position;
        while self.position < self.bytes.len() && self.bytes[self.position].is_ascii_digit() {
            self.position += 1;
        }
        if start == self.position {
            return Err(ReadError::Header);
        }
        std::str::from_utf8(&self.bytes[start..self.position])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or(ReadError::Header)
    }

    fn skip_to_bracket(&mut self) -> Result<(), ReadError> {
        while self.position < self.bytes.len() {
            let byte = self.bytes[self.position];
            self.position += 1;
            if byte == b'[' {
                return Ok(());
            }
        }
        Err(ReadError::Truncated)
    }

    /// Reads `width` bit characters, most significant column first, skipping
    /// whitespace between them.
    fn bits(&mut self, width: usize) -> Result<Block, ReadError> {
        let mut value = Block::ZERO;
        for column in (0..width).rev() {
            let bit = loop {
                let Some(&byte) = self.bytes.get(self.position) else {
                    return Err(ReadError::Truncated);
                };
                self.position += 1;
                match byte {
                    b'0' => break false,
                    b'1' => break true,
                    byte if byte.is_ascii_whitespace() => continue,
                    byte => return Err(ReadError::Digit { found: byte as char }),
                }
            };
            value.assign_index(column, bit);
        }
        Ok(value)
    }
}

impl fmt::Display for MrhsSystem {
    /// Human-readable layout: the joint coefficient rows, a dashed rule, and
    /// the right-hand side sets below their blocks, padded where a block has
    /// run out of rows.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.block_count() == 0 {
            return Ok(());
        }
        for row in 0..self.row_count() {
            for block in &self.blocks {
                display_bits(formatter, block.lhs.row(row), block.width())?;
                write!(formatter, " ")?;
            }
            writeln!(formatter)?;
        }
        let rule = self.blocks.iter().map(|block| "-".repeat(block.width())).join(" ");
        writeln!(formatter, "{rule} ")?;
        let tallest = self.blocks.iter().map(EquationBlock::rhs_count).max().unwrap_or(0);
        for row in 0..tallest {
            for block in &self.blocks {
                if row < block.rhs_count() {
                    display_bits(formatter, block.rhs.row(row), block.width())?;
                    write!(formatter, " ")?;
                } else {
                    write!(formatter, "{:width$}", "", width = block.width() + 1)?;
                }
            }
            writeln!(formatter)?;
        }
        Ok(())
    }
}

fn display_bits(formatter: &mut fmt::Formatter<'_>, value: Block, width: usize) -> fmt::Result {
    for column in (0..width).rev() {
        write!(formatter, "{}", u8::from(value.index(column)))?;
    }
    Ok(())
}
