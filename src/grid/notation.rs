//! Plain-text codel notation
//!
//! One grid row per line, codels separated by whitespace. Each codel is a
//! color mnemonic (`lR`, `R`, `dR`, ..., `W`, `K`) or a `#RRGGBB` code.
//! Blank lines and lines starting with `#` followed by a space (or nothing)
//! are skipped, so a hex code at the start of a row is still a codel.
//!
//! ```text
//! # push 1, then out_number
//! lR R  dM W
//! K  K  K  K
//! ```

use super::color::Color;
use super::{Grid, GridError};
use std::str::FromStr;

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();

        for (line_no, line) in s.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || is_comment(trimmed) {
                continue;
            }

            let mut row = Vec::new();
            let mut column = 0;
            for token in trimmed.split_whitespace() {
                column += 1;
                let color = token
                    .parse::<Color>()
                    .map_err(|_| GridError::UnknownColor {
                        token: token.to_string(),
                        line: line_no + 1,
                        column,
                    })?;
                row.push(color);
            }
            rows.push(row);
        }

        Grid::from_rows(rows)
    }
}

fn is_comment(line: &str) -> bool {
    line == "#" || line.starts_with("# ") || line.starts_with("#\t")
}

/// Render a grid back to notation, one row per line
pub fn to_notation(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.cells().chunks(grid.width()) {
        let tokens: Vec<String> = row.iter().map(|c| format!("{:<2}", c.color)).collect();
        out.push_str(tokens.join(" ").trim_end());
        out.push('\n');
    }
    out
}
