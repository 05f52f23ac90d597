//! Printing distributions and result tables.
//!
//! Formatting is configured per call through [`DisplayOptions`] rather than
//! through any global state.

use crate::distribution::Distribution;
use std::fmt;

/// How probabilities and measure values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Print numbers as the closest fraction with a denominator of at most
    /// `max_denominator`.
    pub exact: bool,
    /// Digits after the decimal point when `exact` is off.
    pub precision: usize,
    pub max_denominator: u64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            exact: false,
            precision: 6,
            max_denominator: 1000,
        }
    }
}

impl DisplayOptions {
    pub fn exact() -> Self {
        Self {
            exact: true,
            ..Self::default()
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_max_denominator(mut self, max_denominator: u64) -> Self {
        self.max_denominator = max_denominator;
        self
    }

    pub fn format_number(&self, value: f64) -> String {
        if self.exact {
            if let Some((numerator, denominator)) =
                approximate_fraction(value, self.max_denominator)
            {
                return if denominator == 1 {
                    numerator.to_string()
                } else {
                    format!("{}/{}", numerator, denominator)
                };
            }
        }
        format!("{:.*}", self.precision, value)
    }
}

/// Best rational approximation of `value` with a denominator of at most
/// `max_denominator`, from the continued fraction expansion.
///
/// Returns `None` for non-finite values and for values whose numerator does
/// not fit in an `i64`.
pub fn approximate_fraction(value: f64, max_denominator: u64) -> Option<(i64, u64)> {
    if !value.is_finite() {
        return None;
    }
    let max_denominator = max_denominator.max(1);
    let negative = value < 0.0;
    let target = value.abs();

    // Convergents h/k, with (h0, k0) the one before (h1, k1).
    let (mut h0, mut k0, mut h1, mut k1) = (0u64, 1u64, 1u64, 0u64);
    let mut x = target;
    loop {
        let a = x.floor();
        if a > u64::MAX as f64 {
            break;
        }
        let a = a as u64;
        let Some(k2) = a.checked_mul(k1).and_then(|v| v.checked_add(k0)) else {
            break;
        };
        if k2 > max_denominator {
            break;
        }
        let Some(h2) = a.checked_mul(h1).and_then(|v| v.checked_add(h0)) else {
            break;
        };
        (h0, k0, h1, k1) = (h1, k1, h2, k2);
        let rest = x - a as f64;
        if rest < 1e-12 {
            break;
        }
        x = 1.0 / rest;
    }

    // The integer part alone did not fit.
    if k1 == 0 {
        return None;
    }

    // The largest semiconvergent within the bound may beat the last convergent.
    let (mut numerator, mut denominator) = (h1, k1);
    if k1 < max_denominator {
        let n = (max_denominator - k0) / k1;
        let semiconvergent = n
            .checked_mul(h1)
            .and_then(|v| v.checked_add(h0))
            .zip(n.checked_mul(k1).and_then(|v| v.checked_add(k0)));
        if let Some((hs, ks)) = semiconvergent.filter(|_| n > 0) {
            let error_convergent = (target - h1 as f64 / k1 as f64).abs();
            let error_semi = (target - hs as f64 / ks as f64).abs();
            if error_semi < error_convergent {
                numerator = hs;
                denominator = ks;
            }
        }
    }

    let numerator = i64::try_from(numerator).ok()?;
    Some((if negative { -numerator } else { numerator }, denominator))
}

/// Outcomes with positive probability, one per line, with a `x  p(x)` header.
///
/// ```
/// use conjecture_find::constructors::uniform_distribution;
/// use conjecture_find::display::{format_distribution, DisplayOptions};
///
/// let d = uniform_distribution(2, 2).unwrap();
/// let text = format_distribution(&d, &DisplayOptions::exact());
/// assert!(text.contains("01  1/4"));
/// ```
pub fn format_distribution(distribution: &Distribution, options: &DisplayOptions) -> String {
    let mut table = Table::new(vec!["x", "p(x)"]);
    let compact = distribution.alphabets().iter().all(|&k| k <= 10);
    for (outcome, p) in distribution.support() {
        let label = if compact {
            outcome.iter().map(|s| s.to_string()).collect::<String>()
        } else {
            let symbols: Vec<String> = outcome.iter().map(|s| s.to_string()).collect();
            format!("({})", symbols.join(", "))
        };
        table.add_row(vec![Cell::from(label), Cell::from(p)]);
    }
    table.render(options)
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_distribution(self, &DisplayOptions::default()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl Cell {
    fn render(&self, options: &DisplayOptions) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => options.format_number(*value),
        }
    }
}

/// A left-aligned text table with columns separated by two spaces.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<H: Into<String>>(headers: Vec<H>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, options: &DisplayOptions) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.render(options)).collect())
            .collect();

        let columns = rendered
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for line in std::iter::once(&self.headers).chain(rendered.iter()) {
            for (i, text) in line.iter().enumerate() {
                widths[i] = widths[i].max(text.chars().count());
            }
        }

        let mut out = String::new();
        for line in std::iter::once(&self.headers).chain(rendered.iter()) {
            let cells: Vec<String> = line
                .iter()
                .enumerate()
                .map(|(i, text)| format!("{:<width$}", text, width = widths[i]))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}
