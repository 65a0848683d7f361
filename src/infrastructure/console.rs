//! Console prompts for the product id range

use std::io::{BufRead, Write};
use thiserror::Error;

pub const START_PROMPT: &str = "Enter the starting product ID: ";
pub const END_PROMPT: &str = "Enter the ending product ID: ";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read console input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input ended before a product ID was entered")]
    EndOfInput,

    #[error("'{input}' is not a valid product ID: {source}")]
    NotAnInteger {
        input: String,
        source: std::num::ParseIntError,
    },
}

/// Print `prompt`, read one line and parse it as a base-10 integer
pub fn prompt_product_id<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<i64, InputError> {
    write!(writer, "{prompt}")?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(InputError::EndOfInput);
    }

    let input = line.trim();
    input.parse::<i64>().map_err(|source| InputError::NotAnInteger {
        input: input.to_string(),
        source,
    })
}

/// Ask for the starting then the ending product id
pub fn read_id_bounds<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<(i64, i64), InputError> {
    let start = prompt_product_id(reader, writer, START_PROMPT)?;
    let end = prompt_product_id(reader, writer, END_PROMPT)?;
    Ok((start, end))
}
