use crate::revolution::approximate_volume::simpson_volume;
use crate::revolution::axis::IntoAxis;
use crate::revolution::errors::RevolutionError;
use crate::revolution::exact_volume::exact_volume_unrounded;
use crate::symbolic::symbolic_engine::Expr;
use tabled::{builder::Builder, settings::Style};

/// One Simpson run compared against the exact volume
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceRow {
    pub n: usize,
    pub simpson: f64,
    pub exact: f64,
    pub abs_error: f64,
    /// error of the previous row divided by this error
    pub error_ratio: Option<f64>,
}

/// Unrounded Simpson volumes for every `n` in `ns` next to the unrounded exact volume.
pub fn convergence_study(
    f: &Expr,
    a: f64,
    b: f64,
    axis: impl IntoAxis,
    ns: &[usize],
) -> Result<Vec<ConvergenceRow>, RevolutionError> {
    let axis = axis.into_axis()?;
    let exact = exact_volume_unrounded(f, a, b, axis)?;
    let mut rows: Vec<ConvergenceRow> = Vec::with_capacity(ns.len());
    for &n in ns {
        let simpson = simpson_volume(f, a, b, axis, n)?;
        let abs_error = (simpson - exact).abs();
        let error_ratio = rows
            .last()
            .filter(|_| abs_error > 0.0)
            .map(|previous| previous.abs_error / abs_error);
        rows.push(ConvergenceRow {
            n,
            simpson,
            exact,
            abs_error,
            error_ratio,
        });
    }
    Ok(rows)
}

pub fn convergence_table(rows: &[ConvergenceRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["n", "Simpson", "exact", "abs. error", "error ratio"]);
    for row in rows {
        builder.push_record([
            row.n.to_string(),
            format!("{:.10}", row.simpson),
            format!("{:.10}", row.exact),
            format!("{:.3e}", row.abs_error),
            row.error_ratio
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
