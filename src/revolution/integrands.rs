use crate::revolution::axis::Axis;
use crate::revolution::errors::RevolutionError;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::f64::consts::PI;

/// `scale * ∫ integrand dx` is the volume of the solid
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeIntegrand {
    pub integrand: Expr,
    pub scale: f64,
}

/// Name of the single free variable of `f`, `x` for constant functions.
pub fn function_variable(f: &Expr) -> Result<String, RevolutionError> {
    let mut vars = f.all_arguments_are_variables();
    match vars.len() {
        0 => Ok("x".to_string()),
        1 => Ok(vars.remove(0)),
        _ => Err(RevolutionError::Evaluation(format!(
            "function must depend on one variable, found {:?}",
            vars
        ))),
    }
}

/// Builds the integrand and its scalar factor for the given axis:
///
/// - x-axis: π ∫ f² dx
/// - y-axis: 2π ∫ |x|·|f| dx
/// - line y = m x + c: π/(m²+1)^(3/2) ∫ (1 + m f')(f - (m x + c))² dx
pub fn volume_integrand(f: &Expr, axis: &Axis, var: &str) -> VolumeIntegrand {
    let x = Expr::Var(var.to_string());
    match *axis {
        Axis::XAxis => VolumeIntegrand {
            integrand: f.clone().pow(Expr::Const(2.0)),
            scale: PI,
        },
        Axis::YAxis => VolumeIntegrand {
            integrand: x.abs() * f.clone().abs(),
            scale: 2.0 * PI,
        },
        Axis::Line { slope, intercept } => {
            let df = f.diff(var).simplify();
            debug!("f'({}) = {}", var, df);
            let line = Expr::Const(slope) * x + Expr::Const(intercept);
            let integrand = (Expr::Const(1.0) + Expr::Const(slope) * df)
                * (f.clone() - line).pow(Expr::Const(2.0));
            VolumeIntegrand {
                integrand,
                scale: PI / (slope * slope + 1.0).powf(1.5),
            }
        }
    }
}

/// Rounds `value` to `digits` significant digits.
pub fn round_to_significant(value: f64, digits: u32) -> f64 {
    // an f64 never carries more than 17 significant digits
    if value == 0.0 || !value.is_finite() || digits == 0 || digits >= 17 {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;
    if shift > 300 {
        // 10^shift overflows for subnormal values, so scale in two steps
        let (coarse, fine) = (10f64.powi(300), 10f64.powi(shift - 300));
        (value * coarse * fine).round() / fine / coarse
    } else if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_to_significant() {
        assert_eq!(round_to_significant(3.14159265, 5), 3.1416);
        assert_eq!(round_to_significant(-0.000123456, 3), -0.000123);
        assert_eq!(round_to_significant(123456.0, 2), 120000.0);
        assert_eq!(round_to_significant(0.0, 7), 0.0);
        assert_eq!(round_to_significant(1.0 / 3.0, 20), 1.0 / 3.0);
    }

    #[test]
    fn test_round_subnormal_values() {
        let rounded = round_to_significant(1e-310, 7);
        assert!(rounded.is_finite());
        assert_relative_eq!(rounded, 1e-310, max_relative = 1e-9);
        let rounded = round_to_significant(-1.234567891e-312, 3);
        assert_relative_eq!(rounded, -1.23e-312, max_relative = 1e-6);
        assert_relative_eq!(round_to_significant(f64::MIN_POSITIVE, 7), 2.225074e-308, max_relative = 1e-6);
    }

    #[test]
    fn test_function_variable() {
        let f = Expr::parse_expression("t^2 + sin(t)").unwrap();
        assert_eq!(function_variable(&f).unwrap(), "t");
        assert_eq!(function_variable(&Expr::Const(2.0)).unwrap(), "x");
        let g = Expr::parse_expression("x*y").unwrap();
        assert!(matches!(function_variable(&g), Err(RevolutionError::Evaluation(_))));
    }

    #[test]
    fn test_line_integrand_scale_and_values() {
        let f = Expr::parse_expression("x").unwrap();
        let VolumeIntegrand { integrand, scale } = volume_integrand(&f, &Axis::line(1.0, 4.0), "x");
        assert_relative_eq!(scale, PI / 2f64.powf(1.5), epsilon = 1e-15);
        // (1 + 1)(x - x - 4)^2 = 32
        assert_relative_eq!(integrand.eval_at("x", 0.7).unwrap(), 32.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_axis_integrand_uses_distances() {
        let f = Expr::parse_expression("x").unwrap();
        let VolumeIntegrand { integrand, scale } = volume_integrand(&f, &Axis::YAxis, "x");
        assert_relative_eq!(scale, 2.0 * PI);
        assert_relative_eq!(integrand.eval_at("x", -0.5).unwrap(), 0.25);
    }
}
