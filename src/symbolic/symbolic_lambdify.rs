use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_engine_derivatives::{is_sign_of, pow_real, sign};

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts a single-variable symbolic expression into an executable Rust closure.
    ///
    /// The closure mirrors the expression tree, so it is built once and can be called
    /// repeatedly. Expressions without variables become constant closures.
    ///
    /// # Errors
    /// Returns an error if the expression contains more than one variable.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D()?;
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Result<Box<dyn Fn(f64) -> f64>, String> {
        let vars = self.all_arguments_are_variables();
        if vars.len() > 1 {
            return Err(format!(
                "lambdify1D can only be used with expressions containing exactly one variable, found: {:?}",
                vars
            ));
        }
        Ok(self.lambdify1D_unchecked())
    } // end of lambdify1D

    fn lambdify1D_unchecked(&self) -> Box<dyn Fn(f64) -> f64> {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked();
                let rhs_fn = rhs.lambdify1D_unchecked();
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked();
                let rhs_fn = rhs.lambdify1D_unchecked();
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked();
                let rhs_fn = rhs.lambdify1D_unchecked();
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) if is_sign_of(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked();
                Box::new(move |x| sign(lhs_fn(x)))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D_unchecked();
                let rhs_fn = rhs.lambdify1D_unchecked();
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D_unchecked();
                let exp_fn = exp.lambdify1D_unchecked();
                Box::new(move |x| pow_real(base_fn(x), exp_fn(x)))
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::Abs(expr) => {
                let expr_fn = expr.lambdify1D_unchecked();
                Box::new(move |x| expr_fn(x).abs())
            }
        }
    }
}
