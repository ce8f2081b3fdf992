#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let input = "x^2 + 3*sin(x) - abs(x - 1)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let value = parsed_expression.eval_at("x", 0.0).unwrap();
/// assert_eq!(value, -1.0);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree `Expr`
/// 2) turns a symbolic expression into a string expression for printing and control results
/// 3) substitutes values and subexpressions for variables
///# Example#
/// ```
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let input = "exp(x) + ln(x)";
/// // here you've got symbolic expression
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x");
/// println!("df_dx = {}", df_dx);
/// // convert symbolic expression to a Rust function and evaluate the function
/// let function_of_x = parsed_expression.lambdify1D().unwrap();
/// assert!((function_of_x(1.0) - std::f64::consts::E).abs() < 1e-12);
/// ```
pub mod symbolic_engine;
/// differentiation and numeric evaluation
pub mod symbolic_engine_derivatives;
/// # Symbolic integration
/// indefinite and definite integrals of polynomial, exponential, trigonometric and
/// absolute-value integrands, plus composite Simpson's rule
///# Example#
/// ```
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*sin(x)").unwrap();
/// let exact = f.definite_integrate("x", 0.0, std::f64::consts::PI).unwrap();
/// assert!((exact - std::f64::consts::PI).abs() < 1e-10);
/// let approx = f.numerical_integrate("x", 0.0, std::f64::consts::PI, 100).unwrap();
/// assert!((exact - approx).abs() < 1e-6);
/// ```
pub mod symbolic_integration;
/// turns a symbolic expression into a Rust closure of one variable
pub mod symbolic_lambdify;
/// constant folding, polynomial collection and expansion into product terms
pub mod symbolic_simplify;
/// linspace and root bracketing
pub mod utils;
