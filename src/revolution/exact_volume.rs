use crate::revolution::axis::IntoAxis;
use crate::revolution::errors::RevolutionError;
use crate::revolution::integrands::{
    VolumeIntegrand, function_variable, round_to_significant, volume_integrand,
};
use crate::symbolic::symbolic_engine::Expr;
use log::info;

/// Significant digits of `exact_volume`.
pub const EXACT_SIGNIFICANT_DIGITS: u32 = 7;

/// Exact volume of the solid obtained by revolving `f` on [a, b] about `axis`,
/// rounded to 7 significant digits.
///
/// # Example
/// ```
/// use RustedSolids::revolution::exact_volume;
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("abs(x)").unwrap();
/// let volume = exact_volume(&f, -1.0, 1.0, (1.0, 4.0)).unwrap();
/// assert!(volume > 0.0);
/// ```
pub fn exact_volume(f: &Expr, a: f64, b: f64, axis: impl IntoAxis) -> Result<f64, RevolutionError> {
    let volume = exact_volume_unrounded(f, a, b, axis)?;
    Ok(round_to_significant(volume, EXACT_SIGNIFICANT_DIGITS))
}

/// `exact_volume` without the final rounding.
pub fn exact_volume_unrounded(
    f: &Expr,
    a: f64,
    b: f64,
    axis: impl IntoAxis,
) -> Result<f64, RevolutionError> {
    let axis = axis.into_axis()?;
    let var = function_variable(f)?;
    let VolumeIntegrand { integrand, scale } = volume_integrand(f, &axis, &var);
    let integral = integrand
        .definite_integrate(&var, a, b)
        .map_err(RevolutionError::Integration)?;
    let volume = scale * integral;
    info!("exact volume of {} on [{}, {}] about {}: {}", f, a, b, axis, volume);
    Ok(volume)
}
