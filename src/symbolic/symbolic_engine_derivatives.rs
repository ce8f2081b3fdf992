//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, evaluation and parsing entry points for `Expr`.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - Analytical derivative
//!
//! ### Function evaluation
//! - `eval_expression()` - Direct evaluation without closure creation
//! - `eval_at()` - Evaluation of a single-variable expression at a point
//!
//! ### Parsing and Utilities
//! - `parse_expression()` - String to symbolic expression
//! - `all_arguments_are_variables()` - Extract variable names

use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules (power, product, quotient, chain). The derivative of
    /// `|g|` is `g/|g| * g'`; evaluation treats `g/|g|` as the sign of `g`, 0 where `g = 0`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            // d(b^g) = b^g * (g' * ln(b) + g * b'/b)
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(self.clone()),
                Box::new(Expr::Add(
                    Box::new(Expr::Mul(
                        Box::new(exp.diff(var)),
                        Box::new(Expr::Ln(base.clone())),
                    )),
                    Box::new(Expr::Mul(
                        exp.clone(),
                        Box::new(Expr::Div(Box::new(base.diff(var)), base.clone())),
                    )),
                )),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::Abs(expr) => Expr::Mul(
                Box::new(Expr::Div(expr.clone(), Box::new(Expr::Abs(expr.clone())))),
                Box::new(expr.diff(var)),
            ),
        }
    } // end of diff

    /// Evaluates the expression with the given variable bindings.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Errors
    /// Returns an error naming the first variable that has no binding.
    ///
    /// # Performance
    /// Use lambdify1D() for repeated evaluation, eval_expression() for one-time use
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, String> {
        let value = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&x| x == name)
                    .ok_or_else(|| format!("variable `{}` has no value", name))?;
                *values
                    .get(index)
                    .ok_or_else(|| format!("no value supplied for variable `{}`", name))?
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?
            }
            // g/|g| is the sign of g, 0 where g = 0
            Expr::Div(lhs, rhs) if is_sign_of(lhs, rhs) => sign(lhs.eval_expression(vars, values)?),
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?
            }
            Expr::Pow(base, exp) => {
                let base_val = base.eval_expression(vars, values)?;
                let exp_val = exp.eval_expression(vars, values)?;
                pow_real(base_val, exp_val)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::Abs(expr) => expr.eval_expression(vars, values)?.abs(),
        };
        Ok(value)
    } // end of eval_expression

    /// Evaluates an expression of one variable at `value`.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, String> {
        self.eval_expression(&[var], &[value])
    }

    /// Evaluates an expression that must not contain any variable.
    pub fn eval_constant(&self) -> Result<f64, String> {
        self.eval_expression(&[], &[])
    }

    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, var_name
    /// - Constants: 3.14, 2.5, 1e-6, pi, e
    /// - Operators: +, -, *, /, ^ (and ** as a synonym for ^)
    /// - Functions: exp, ln/log, sin, cos, tg/tan, abs
    /// - Parentheses for grouping
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + 2*x + 1")?;
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }

    /// Extracts all unique variable names from the symbolic expression.
    /// Returns a sorted, deduplicated list of variable names.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                vars.extend(lhs.all_arguments_are_variables());
                vars.extend(rhs.all_arguments_are_variables());
            }
            unary => {
                if let Some(arg) = unary.argument() {
                    vars.extend(arg.all_arguments_are_variables());
                }
            }
        }
        vars.sort();
        vars.dedup();
        vars
    } // end of all_arguments_are_variables
}

/// `lhs / rhs` has the shape `g / |g|`
pub(crate) fn is_sign_of(lhs: &Expr, rhs: &Expr) -> bool {
    matches!(rhs, Expr::Abs(inner) if inner.as_ref() == lhs)
}

pub(crate) fn sign(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.signum() }
}

/// `base^exp` with integral exponents routed through `powi`
pub(crate) fn pow_real(base: f64, exp: f64) -> f64 {
    if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
        base.powi(exp as i32)
    } else {
        base.powf(exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_diff_polynomial() {
        let f = x().pow(Expr::Const(3.0)) + Expr::Const(2.0) * x();
        let df = f.diff("x");
        // 3x^2 + 2 at x = 2
        assert_relative_eq!(df.eval_at("x", 2.0).unwrap(), 14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_abs_is_sign() {
        let f = x().abs();
        let df = f.diff("x");
        assert_relative_eq!(df.eval_at("x", 3.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(df.eval_at("x", -0.5).unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(df.eval_at("x", 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_diff_variable_exponent() {
        // d/dx 2^x = 2^x ln 2
        let f = Expr::Const(2.0).pow(x());
        let df = f.diff("x");
        assert_relative_eq!(
            df.eval_at("x", 1.0).unwrap(),
            2.0 * 2f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_expression_reports_unbound_variable() {
        let f = x() + Expr::Var("y".to_string());
        let err = f.eval_at("x", 1.0).unwrap_err();
        assert!(err.contains("`y`"));
    }

    #[test]
    fn test_pow_real_negative_base() {
        let f = x().pow(Expr::Const(3.0));
        assert_relative_eq!(f.eval_at("x", -2.0).unwrap(), -8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_arguments_are_variables_sorted_unique() {
        let f = Expr::parse_expression("y*x + sin(x) + abs(z)").unwrap();
        assert_eq!(f.all_arguments_are_variables(), vec!["x", "y", "z"]);
    }
}
