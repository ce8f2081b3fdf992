use crate::revolution::axis::IntoAxis;
use crate::revolution::errors::RevolutionError;
use crate::revolution::integrands::{
    VolumeIntegrand, function_variable, round_to_significant, volume_integrand,
};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_integration::simpson;
use log::info;

/// Significant digits of `approximate_volume`.
pub const APPROXIMATE_SIGNIFICANT_DIGITS: u32 = 5;

/// Volume by composite Simpson's rule on `n` subintervals, rounded to 5 significant digits.
///
/// `n` must be positive and even.
pub fn approximate_volume(
    f: &Expr,
    a: f64,
    b: f64,
    axis: impl IntoAxis,
    n: usize,
) -> Result<f64, RevolutionError> {
    let volume = simpson_volume(f, a, b, axis, n)?;
    Ok(round_to_significant(volume, APPROXIMATE_SIGNIFICANT_DIGITS))
}

/// `approximate_volume` without the final rounding.
pub fn simpson_volume(
    f: &Expr,
    a: f64,
    b: f64,
    axis: impl IntoAxis,
    n: usize,
) -> Result<f64, RevolutionError> {
    let axis = axis.into_axis()?;
    check_subdivisions(n)?;
    let var = function_variable(f)?;
    let VolumeIntegrand { integrand, scale } = volume_integrand(f, &axis, &var);
    // every node is substituted into the symbolic integrand, sums stay unrounded
    let integral = simpson(
        |x| integrand.set_variable(&var, x).eval_constant(),
        a,
        b,
        n,
    )
    .map_err(RevolutionError::Evaluation)?;
    if !integral.is_finite() {
        return Err(RevolutionError::Evaluation(format!(
            "{} is not finite on [{}, {}]",
            integrand, a, b
        )));
    }
    let volume = scale * integral;
    info!(
        "Simpson volume of {} on [{}, {}] about {} with n = {}: {}",
        f, a, b, axis, n, volume
    );
    Ok(volume)
}

fn check_subdivisions(n: usize) -> Result<(), RevolutionError> {
    if n == 0 {
        Err(RevolutionError::ZeroSubdivisions)
    } else if n % 2 == 1 {
        Err(RevolutionError::OddSubdivisions(n))
    } else {
        Ok(())
    }
}
