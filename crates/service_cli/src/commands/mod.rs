//! CLI command implementations
//!
//! Each submodule implements one subcommand: it folds its flags into the
//! loaded [`PricerConfig`](crate::config::PricerConfig), evaluates a report
//! and prints it as a table or as JSON.

pub mod check;
pub mod greeks;
pub mod lattice;
pub mod monte_carlo;

use std::fmt;

use clap::{Args, ValueEnum};
use pricer_core::types::OptionType;
use serde::Serialize;

use crate::config::ContractSection;
use crate::Result;

/// Report output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table on stdout.
    #[default]
    Table,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// Which option sides to price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Side {
    /// Call only.
    Call,
    /// Put only.
    Put,
    /// Call then put.
    #[default]
    Both,
}

impl Side {
    /// Option types in reporting order.
    pub fn option_types(self) -> Vec<OptionType> {
        match self {
            Side::Call => vec![OptionType::Call],
            Side::Put => vec![OptionType::Put],
            Side::Both => vec![OptionType::Call, OptionType::Put],
        }
    }
}

/// Contract flags shared by every pricing command. Unset flags keep the
/// configured value.
#[derive(Args, Clone, Debug, Default)]
pub struct ContractArgs {
    /// Underlying price S
    #[arg(short = 'S', long)]
    pub spot: Option<f64>,

    /// Strike K
    #[arg(short = 'K', long)]
    pub strike: Option<f64>,

    /// Time to maturity in years
    #[arg(short = 't', long)]
    pub maturity: Option<f64>,

    /// Risk-free rate r
    #[arg(short = 'r', long)]
    pub rate: Option<f64>,

    /// Cost-of-carry b (b = r stock, b = 0 futures)
    #[arg(short = 'b', long = "carry")]
    pub cost_of_carry: Option<f64>,

    /// Volatility sigma
    #[arg(short = 's', long = "sigma")]
    pub volatility: Option<f64>,
}

impl ContractArgs {
    /// Overwrite the fields of `section` that were given on the command line.
    pub fn apply(&self, section: &mut ContractSection) {
        if let Some(spot) = self.spot {
            section.spot = spot;
        }
        if let Some(strike) = self.strike {
            section.strike = strike;
        }
        if let Some(maturity) = self.maturity {
            section.maturity = maturity;
        }
        if let Some(rate) = self.rate {
            section.rate = rate;
        }
        if let Some(carry) = self.cost_of_carry {
            section.cost_of_carry = carry;
        }
        if self.volatility.is_some() {
            section.volatility = self.volatility;
        }
    }
}

/// Print `report` in the requested format.
pub fn emit<R: Serialize + fmt::Display>(report: &R, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

/// Box-drawn table used by every table report.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Table with the given column headers.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty.
    pub fn row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> &mut Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }
}

fn rule(f: &mut fmt::Formatter<'_>, widths: &[usize], left: &str, mid: &str, right: &str) -> fmt::Result {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    writeln!(f, "{}{}{}", left, segments.join(mid), right)
}

fn cells(f: &mut fmt::Formatter<'_>, widths: &[usize], row: &[String]) -> fmt::Result {
    write!(f, "│")?;
    for (i, width) in widths.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        write!(f, " {:<width$} │", cell, width = width)?;
    }
    writeln!(f)
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        rule(f, &widths, "┌", "┬", "┐")?;
        cells(f, &widths, &self.headers)?;
        rule(f, &widths, "├", "┼", "┤")?;
        for row in &self.rows {
            cells(f, &widths, row)?;
        }
        rule(f, &widths, "└", "┴", "┘")
    }
}

/// Format a price for table output.
pub fn fmt_value(value: f64) -> String {
    format!("{:.6}", value)
}

/// One-line contract summary printed above each table.
pub fn contract_line(contract: &ContractSection) -> String {
    let sigma = contract
        .volatility
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "S={} K={} t={:.6} r={} b={} sigma={}",
        contract.spot, contract.strike, contract.maturity, contract.rate, contract.cost_of_carry, sigma
    )
}
