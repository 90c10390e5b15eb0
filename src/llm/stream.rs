use std::io::{self, BufRead, Write};

use crate::error::{PrError, Result};

use super::GenerationResult;

/// One decoded line of a newline-delimited JSON stream.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StreamChunk {
    pub text: Option<String>,
    pub done: bool,
}

/// Read a streaming response line-by-line, echoing chunks as they arrive.
///
/// Read failures on `reader` go through `map_read_error`, which knows the
/// transport and can tell a timeout from a broken connection.
pub fn read_stream<R, W, F, M>(
    reader: R,
    echo: &mut W,
    mut parse_line: F,
    map_read_error: M,
) -> Result<GenerationResult>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<StreamChunk>,
    M: Fn(io::Error) -> PrError,
{
    let mut out = String::new();
    let mut done = false;

    for line in reader.lines() {
        let line = line.map_err(&map_read_error)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let chunk = parse_line(line)?;
        if let Some(text) = chunk.text {
            out.push_str(&text);
            write!(echo, "{text}")?;
            echo.flush()?;
        }
        if chunk.done {
            done = true;
            break;
        }
    }

    writeln!(echo)?;
    Ok(GenerationResult { text: out, done })
}
