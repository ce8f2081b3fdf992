//! # Symbolic Engine Module
//!
//! The expression tree every other part of the crate works with. A generating
//! function of a solid of revolution is stored as an `Expr`, differentiated for the
//! line-axis Jacobian term, expanded and integrated for the exact volume, and evaluated
//! point by point for Simpson's rule.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `Abs`
//!
//! ### Key Methods
//! - `set_variable()` - Substitute a variable with a value
//! - `diff(var: &str)` - Analytical differentiation (see `symbolic_engine_derivatives`)
//! - `integrate(var: &str)` - Analytical integration (see `symbolic_integration`)
//!
//! Trigonometric functions keep the mathematical notation (tg) used by the parser.

#![allow(non_camel_case_types)]

use std::f64;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Absolute value: |x|
    Abs(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::Abs(expr) => write!(f, "abs({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Rebuilds a unary function node around a new argument, keeping the function kind.
    pub(crate) fn with_argument(&self, arg: Expr) -> Expr {
        match self {
            Expr::Exp(_) => Expr::Exp(arg.boxed()),
            Expr::Ln(_) => Expr::Ln(arg.boxed()),
            Expr::sin(_) => Expr::sin(arg.boxed()),
            Expr::cos(_) => Expr::cos(arg.boxed()),
            Expr::tg(_) => Expr::tg(arg.boxed()),
            Expr::Abs(_) => Expr::Abs(arg.boxed()),
            _ => self.clone(),
        }
    }

    /// Argument of a unary function node, `None` for leaves and binary operations.
    pub(crate) fn argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::Abs(arg) => Some(arg),
            _ => None,
        }
    }

    /// Applies `transform` to every direct child and rebuilds the node.
    pub(crate) fn map_children<F>(&self, transform: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(transform(lhs).boxed(), transform(rhs).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(transform(lhs).boxed(), transform(rhs).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Mul(transform(lhs).boxed(), transform(rhs).boxed()),
            Expr::Div(lhs, rhs) => Expr::Div(transform(lhs).boxed(), transform(rhs).boxed()),
            Expr::Pow(base, exp) => Expr::Pow(transform(base).boxed(), transform(exp).boxed()),
            unary => match unary.argument() {
                Some(arg) => unary.with_argument(transform(arg)),
                None => unary.clone(),
            },
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    ///
    /// # Arguments
    /// * `var` - Name of the variable to substitute
    /// * `value` - Numerical value to substitute for the variable
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(|child| child.set_variable(var, value)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            unary => unary
                .argument()
                .map(|arg| arg.contains_variable(var_name))
                .unwrap_or(false),
        }
    }

    /// true if the expression contains at least one `Abs` node
    pub fn contains_abs(&self) -> bool {
        match self {
            Expr::Abs(_) => true,
            Expr::Var(_) | Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => left.contains_abs() || right.contains_abs(),
            unary => unary.argument().map(Expr::contains_abs).unwrap_or(false),
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Creates absolute value |self|.
    pub fn abs(self) -> Expr {
        Expr::Abs(self.boxed())
    }
}
