//! Human-readable dump of arrays, in the shape of a config file.
//!
//! Short keyless lists of scalars fit on one line: `("a", "b", 3)`.
//! Everything else is expanded one entry per line, keys padded to a common
//! width, with a `# index` comment every five keyed entries.

use std::fmt::{self, Write};

use crate::data::{Data, DataKind, Value};
use crate::Array;

const INDENT: &str = "    ";
const ONELINE_MAX: usize = 5;
const INDEX_COMMENT_EVERY: usize = 5;

fn indent(out: &mut impl Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn quoted(out: &mut impl Write, bytes: &[u8]) -> fmt::Result {
    out.write_char('"')?;
    for c in String::from_utf8_lossy(bytes).chars() {
        if c == '"' || c == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    out.write_char('"')
}

/// Characters [`quoted`] writes between the quotes.
fn quoted_width(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| if c == '"' || c == '\\' { 2 } else { 1 })
        .sum()
}

impl Data {
    /// Write the payload (not the key) at nesting `depth`.
    pub fn print(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        match self.value() {
            Value::String(s) => quoted(out, s),
            Value::Integer(i) => write!(out, "{i}"),
            Value::Array(a) => a.print(out, depth),
        }
    }
}

impl Array {
    fn prints_on_one_line(&self) -> bool {
        self.len() <= ONELINE_MAX
            && self.iter().all(|d| {
                d.key().is_empty() && matches!(d.kind(), DataKind::String | DataKind::Integer)
            })
    }

    /// Write every logical entry, indented for nesting `depth`.
    pub fn print(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        if self.prints_on_one_line() {
            out.write_char('(')?;
            for (i, d) in self.iter().enumerate() {
                if i != 0 {
                    out.write_str(", ")?;
                }
                d.print(out, depth + 1)?;
            }
            return out.write_char(')');
        }

        let width = self.iter().map(|d| quoted_width(d.key())).max().unwrap_or(0);
        out.write_str("(\n")?;
        for (i, d) in self.iter().enumerate() {
            indent(out, depth + 1)?;
            if !d.key().is_empty() {
                if i != 0 && i % INDEX_COMMENT_EVERY == 0 {
                    writeln!(out, "# {i}")?;
                    indent(out, depth + 1)?;
                }
                quoted(out, d.key())?;
                for _ in quoted_width(d.key())..width {
                    out.write_char(' ')?;
                }
                out.write_str(" => ")?;
            }
            d.print(out, depth + 1)?;
            out.write_str(",\n")?;
        }
        indent(out, depth + 1)?;
        writeln!(out, "# {}", self.len())?;
        indent(out, depth)?;
        out.write_char(')')
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f, 0)
    }
}
