//! Command results and how they are printed.
//!
//! Every command produces a [`CommandOutput`] holding both renderings; the
//! `--json` flag picks which one reaches stdout.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, CliResult};

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub json: Value,
    pub text: String,
}

impl CommandOutput {
    pub fn new<T: Serialize>(value: &T, text: impl Into<String>) -> CliResult<Self> {
        Ok(CommandOutput {
            json: serde_json::to_value(value)?,
            text: text.into(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Printer { json }
    }

    pub fn print(&self, output: &CommandOutput) {
        if self.json {
            println!("{}", output.json);
        } else {
            print!("{}", output.text);
            if !output.text.ends_with('\n') {
                println!();
            }
        }
    }

    /// JSON errors go to stdout so scripts read one stream; text goes to
    /// stderr.
    pub fn error(&self, err: &ApiError) {
        if self.json {
            match serde_json::to_string(err) {
                Ok(json) => println!("{}", json),
                Err(_) => eprintln!("error: {}", err.message),
            }
        } else {
            eprintln!("error: {}", err.message);
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Plain-text table with padded columns.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Table {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            align: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing cells render empty; extra cells are dropped.
    pub fn row(&mut self, cells: Vec<String>) -> &mut Self {
        let mut cells = cells;
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().map(|r| &r[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&self.render_line(&self.headers, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.render_line(row, &widths));
        }
        out
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.align)
            .map(|((cell, width), align)| {
                let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
                match align {
                    Align::Left => format!("{}{}", cell, pad),
                    Align::Right => format!("{}{}", pad, cell),
                }
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    }
}

/// `label: value` lines with the values lined up.
pub fn key_values(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}\n", format!("{}:", k), v, width = width + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(&[("Brand", Align::Left), ("Stock", Align::Right)]);
        table.row(vec!["AGS".to_string(), "7".to_string()]);
        table.row(vec!["Bridgepower".to_string(), "12".to_string()]);

        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Brand        Stock");
        assert_eq!(lines[1], "-----------  -----");
        assert_eq!(lines[2], "AGS              7");
        assert_eq!(lines[3], "Bridgepower     12");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(&[("A", Align::Left), ("B", Align::Left)]);
        table.row(vec!["x".to_string()]);
        assert!(!table.is_empty());
        assert_eq!(table.render().lines().nth(2), Some("x"));
    }

    #[test]
    fn test_key_values() {
        let text = key_values(&[("Shop", "Murick".to_string()), ("Contact", "061".to_string())]);
        assert_eq!(text, "Shop:     Murick\nContact:  061\n");
    }

    #[test]
    fn test_command_output_json() {
        let out = CommandOutput::new(&vec![1, 2], "two numbers").unwrap();
        assert_eq!(out.json, serde_json::json!([1, 2]));
        assert_eq!(out.text, "two numbers");
    }
}
