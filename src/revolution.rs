/// # Solids of revolution
/// volume of the solid obtained by revolving y = f(x), a <= x <= b, about the x-axis, the y-axis
/// or an arbitrary line y = slope*x + intercept.
///
/// `exact_volume` integrates symbolically, `approximate_volume` uses composite Simpson's rule.
/// The axis may be given as `Axis`, `"x"`, `"y"`, `'x'`, `'y'` or a tuple/slice of line coefficients.
///# Example#
/// ```
/// use RustedSolids::revolution::{approximate_volume, exact_volume, Axis};
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^2").unwrap();
/// let exact = exact_volume(&f, 0.0, 1.0, "x").unwrap();
/// assert!((exact - std::f64::consts::PI / 5.0).abs() < 1e-6);
/// let approx = approximate_volume(&f, 0.0, 1.0, Axis::XAxis, 10).unwrap();
/// assert!((exact - approx).abs() < 1e-4);
/// ```
pub mod approximate_volume;
pub mod axis;
/// Simpson error against the exact volume for a sequence of subdivisions
pub mod convergence;
pub mod errors;
pub mod exact_volume;
/// axis specific integrands and rounding
pub mod integrands;
/// plain-text task documents
pub mod task;

#[cfg(test)]
mod revolution_tests;

pub use approximate_volume::{approximate_volume, simpson_volume};
pub use axis::{Axis, AxisKind, IntoAxis};
pub use convergence::{ConvergenceRow, convergence_study, convergence_table};
pub use errors::RevolutionError;
pub use exact_volume::{exact_volume, exact_volume_unrounded};
pub use integrands::round_to_significant;
pub use task::{RenderSettings, RevolutionReport, RevolutionTask};
