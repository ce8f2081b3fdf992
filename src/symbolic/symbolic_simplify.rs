//! # Symbolic Expression Simplification Module
//!
//! Algebraic rewriting used before and after integration:
//!
//! 1. **Constant Folding**: Evaluates arithmetic operations on numerical constants
//! 2. **Algebraic Identities**: Applies rules like x + 0 = x, x * 1 = x, 0 * x = 0
//! 3. **Polynomial Simplification**: Collects like terms in polynomial expressions
//! 4. **Expansion**: Distributes products and integer powers of sums into a flat list of
//!    product terms, which is the form the integrator works on
//! 5. **Dense Polynomials**: Recognizes univariate polynomials and returns their
//!    coefficient vector

use crate::symbolic::symbolic_engine::Expr;
use std::collections::{BTreeMap, HashMap};

/// Largest integer exponent that expansion will multiply out.
const MAX_EXPANSION_POWER: i32 = 16;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Recursive constant folding and identity elimination.
    ///
    /// ## Examples
    ///
    /// - `0 * (x + y)` → `0`
    /// - `2 * 3 + x` → `6 + x`
    /// - `sin(0)` → `0`
    /// - `x - x` → `0`
    /// - `3x + 2x` → `5x`
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(a), _) if *a == 0.0 => rhs,
                    (_, Expr::Const(b)) if *b == 0.0 => lhs,
                    _ => {
                        let expr = Expr::Add(Box::new(lhs), Box::new(rhs));
                        Self::simplify_polynomial(&expr).unwrap_or(expr)
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(b)) if *b == 0.0 => lhs,
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ => {
                        // a - b = a + (-1)*b
                        let neg_rhs =
                            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)).simplify_();
                        let add_expr = Expr::Add(Box::new(lhs), Box::new(neg_rhs));
                        Self::simplify_polynomial(&add_expr).unwrap_or(add_expr)
                    }
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(a), _) | (_, Expr::Const(a)) if *a == 0.0 => Expr::Const(0.0),
                    (Expr::Const(a), _) if *a == 1.0 => rhs,
                    (_, Expr::Const(b)) if *b == 1.0 => lhs,
                    // x^a * x^b = x^(a+b)
                    (Expr::Pow(base1, exp1), Expr::Pow(base2, exp2)) if base1 == base2 => {
                        let new_exp = Expr::Add(exp1.clone(), exp2.clone()).simplify_();
                        Expr::Pow(base1.clone(), Box::new(new_exp))
                    }
                    (other, Expr::Pow(base, exp)) | (Expr::Pow(base, exp), other)
                        if base.as_ref() == other =>
                    {
                        let new_exp = Expr::Add(Box::new(Expr::Const(1.0)), exp.clone()).simplify_();
                        Expr::Pow(base.clone(), Box::new(new_exp))
                    }
                    _ if lhs == rhs => {
                        Expr::Pow(Box::new(lhs.clone()), Box::new(Expr::Const(2.0)))
                    }
                    // (c1 * expr) * c2 = (c1 * c2) * expr
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(c))
                    | (Expr::Const(c), Expr::Mul(inner_lhs, inner_rhs)) => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(c1), rest) | (rest, Expr::Const(c1)) => {
                                Expr::Mul(Box::new(Expr::Const(c1 * c)), Box::new(rest.clone()))
                                    .simplify_()
                            }
                            _ => Expr::Mul(Box::new(lhs.clone()), Box::new(rhs.clone())),
                        }
                    }
                    // keep constants in front
                    (_, Expr::Const(_)) => Expr::Mul(Box::new(rhs), Box::new(lhs)),
                    _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
                    (_, Expr::Const(b)) if *b == 1.0 => lhs,
                    _ if lhs == rhs => Expr::Const(1.0),
                    // (c1 * expr) / c2 = (c1/c2) * expr
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(c)) if *c != 0.0 => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(c1), rest) | (rest, Expr::Const(c1)) => {
                                Expr::Mul(Box::new(Expr::Const(c1 / c)), Box::new(rest.clone()))
                                    .simplify_()
                            }
                            _ => Expr::Div(Box::new(lhs.clone()), Box::new(rhs.clone())),
                        }
                    }
                    // expr / c = (1/c) * expr
                    (_, Expr::Const(c)) if *c != 0.0 => {
                        Expr::Mul(Box::new(Expr::Const(1.0 / c)), Box::new(lhs)).simplify_()
                    }
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify_();
                let exp = exp.simplify_();
                match (&base, &exp) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.powf(*b)),
                    (_, Expr::Const(b)) if *b == 0.0 => Expr::Const(1.0),
                    (_, Expr::Const(b)) if *b == 1.0 => base,
                    (Expr::Const(a), _) if *a == 1.0 => Expr::Const(1.0),
                    // (x^a)^b = x^(a*b) for constant exponents
                    (Expr::Pow(inner_base, inner_exp), Expr::Const(b)) => {
                        match inner_exp.as_ref() {
                            Expr::Const(a) => Expr::Pow(inner_base.clone(), Box::new(Expr::Const(a * b))),
                            _ => Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())),
                        }
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            unary => {
                let arg = unary.argument().map(Expr::simplify_).unwrap_or(Expr::Const(0.0));
                match (unary, &arg) {
                    (Expr::Exp(_), Expr::Const(a)) => Expr::Const(a.exp()),
                    (Expr::Ln(_), Expr::Const(a)) if *a > 0.0 => Expr::Const(a.ln()),
                    (Expr::sin(_), Expr::Const(a)) => Expr::Const(a.sin()),
                    (Expr::cos(_), Expr::Const(a)) => Expr::Const(a.cos()),
                    (Expr::tg(_), Expr::Const(a)) => Expr::Const(a.tan()),
                    (Expr::Abs(_), Expr::Const(a)) => Expr::Const(a.abs()),
                    // ln(exp(g)) = g
                    (Expr::Ln(_), Expr::Exp(inner)) => *inner.clone(),
                    // ||g|| = |g|
                    (Expr::Abs(_), Expr::Abs(_)) => arg,
                    _ => unary.with_argument(arg),
                }
            }
        }
    }

    /// Simplify polynomial expressions by collecting like terms.
    ///
    /// Returns `None` when some term is not coefficient * monomial, or when
    /// no two terms share a monomial.
    fn simplify_polynomial(expr: &Expr) -> Option<Expr> {
        let mut terms = Vec::new();
        flatten_add(expr, &mut terms);
        if terms.len() < 2 {
            return None;
        }
        let mut poly_map: HashMap<MonomialKey, f64> = HashMap::new();
        for term in &terms {
            let (monomial, coeff) = extract_monomial(term)?;
            *poly_map.entry(monomial).or_insert(0.0) += coeff;
        }
        if poly_map.len() == terms.len() {
            return None;
        }
        // BTreeMap for a stable order of the rebuilt terms
        let ordered: BTreeMap<MonomialKey, f64> = poly_map.into_iter().collect();
        let result = ordered
            .iter()
            .filter(|(_, coeff)| **coeff != 0.0)
            .map(|(monomial, coeff)| Self::build_monomial_term(monomial, *coeff))
            .reduce(|a, b| Expr::Add(Box::new(a), Box::new(b)))
            .unwrap_or(Expr::Const(0.0));
        Some(result)
    }

    /// Build a term from monomial key and coefficient.
    ///
    /// - `monomial: {}, coeff: 5.0` → `Const(5.0)`
    /// - `monomial: {"x": 1}, coeff: 3.0` → `3.0 * x`
    /// - `monomial: {"x": 2}, coeff: 1.0` → `x^2`
    fn build_monomial_term(monomial: &MonomialKey, coeff: f64) -> Expr {
        if monomial.0.is_empty() {
            return Expr::Const(coeff);
        }
        let mut factors = Vec::new();
        if coeff != 1.0 {
            factors.push(Expr::Const(coeff));
        }
        for (var, exp) in &monomial.0 {
            let var_expr = Expr::Var(var.clone());
            match *exp {
                0 => {}
                1 => factors.push(var_expr),
                n => factors.push(Expr::Pow(Box::new(var_expr), Box::new(Expr::Const(n as f64)))),
            }
        }
        factors
            .into_iter()
            .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
            .unwrap_or(Expr::Const(1.0))
    }

    /// Public interface for expression simplification.
    pub fn simplify(&self) -> Expr {
        self.simplify_()
    }

    //___________________________________EXPANSION____________________________________

    /// Distributes products over sums and multiplies out positive integer powers of sums,
    /// returning the list of product terms whose sum equals `self`.
    ///
    /// Only subexpressions that depend on `var` are expanded; function arguments are kept
    /// as they are. Powers above a fixed limit are left unexpanded.
    ///
    /// - `(x + 1)^2` → `[x*x, x*1, 1*x, 1*1]`
    /// - `(x - 4) * sin(x)` → `[x*sin(x), -1*4*sin(x)]`
    pub fn expand_terms(&self, var: &str) -> Vec<Expr> {
        if !self.contains_variable(var) {
            return vec![self.clone()];
        }
        match self {
            Expr::Add(lhs, rhs) => {
                let mut terms = lhs.expand_terms(var);
                terms.extend(rhs.expand_terms(var));
                terms
            }
            Expr::Sub(lhs, rhs) => {
                let mut terms = lhs.expand_terms(var);
                terms.extend(rhs.expand_terms(var).into_iter().map(|t| -t));
                terms
            }
            Expr::Mul(lhs, rhs) => {
                let left = lhs.expand_terms(var);
                let right = rhs.expand_terms(var);
                multiply_term_lists(&left, &right)
            }
            Expr::Div(lhs, rhs) if !rhs.contains_variable(var) => lhs
                .expand_terms(var)
                .into_iter()
                .map(|t| Expr::Div(Box::new(t), rhs.clone()))
                .collect(),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n)
                    if n.fract() == 0.0 && *n >= 1.0 && *n <= MAX_EXPANSION_POWER as f64 =>
                {
                    let base_terms = base.expand_terms(var);
                    if base_terms.len() < 2 {
                        return vec![self.clone()];
                    }
                    let mut acc = base_terms.clone();
                    for _ in 1..(*n as i32) {
                        acc = multiply_term_lists(&acc, &base_terms);
                    }
                    acc
                }
                _ => vec![self.clone()],
            },
            _ => vec![self.clone()],
        }
    }

    //___________________________________DENSE POLYNOMIALS____________________________________

    /// Coefficients `[c0, c1, c2, ...]` of `self` as a polynomial in `var`, or `None` if the
    /// expression is not a polynomial in `var` (subexpressions free of `var` must evaluate
    /// to numbers).
    pub fn as_polynomial(&self, var: &str) -> Option<Vec<f64>> {
        if !self.contains_variable(var) {
            return self.eval_constant().ok().map(|c| vec![c]);
        }
        match self {
            Expr::Var(_) => Some(vec![0.0, 1.0]),
            Expr::Add(lhs, rhs) => Some(poly_add(&lhs.as_polynomial(var)?, &rhs.as_polynomial(var)?, 1.0)),
            Expr::Sub(lhs, rhs) => Some(poly_add(&lhs.as_polynomial(var)?, &rhs.as_polynomial(var)?, -1.0)),
            Expr::Mul(lhs, rhs) => Some(poly_mul(&lhs.as_polynomial(var)?, &rhs.as_polynomial(var)?)),
            Expr::Div(lhs, rhs) if !rhs.contains_variable(var) => {
                let denominator = rhs.eval_constant().ok()?;
                if denominator == 0.0 {
                    return None;
                }
                Some(lhs.as_polynomial(var)?.iter().map(|c| c / denominator).collect())
            }
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= 64.0 => {
                    let base_poly = base.as_polynomial(var)?;
                    let mut acc = vec![1.0];
                    for _ in 0..(*n as i32) {
                        acc = poly_mul(&acc, &base_poly);
                    }
                    Some(acc)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Slope and offset `(a, b)` if `self` equals `a*var + b`.
    pub fn as_linear(&self, var: &str) -> Option<(f64, f64)> {
        let poly = self.as_polynomial(var)?;
        if poly.iter().skip(2).any(|c| *c != 0.0) {
            return None;
        }
        Some((
            poly.get(1).copied().unwrap_or(0.0),
            poly.first().copied().unwrap_or(0.0),
        ))
    }
}

/// Represents the variable part of a polynomial term (monomial): variable → exponent.
///
/// - `x^2` → `MonomialKey({"x": 2})`
/// - `5` (constant) → `MonomialKey({})` (empty map)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialKey(pub BTreeMap<String, i32>);

/// Flatten nested Add/Sub expressions into a list of terms.
///
/// - `a - b` → `[a, -1*b]`
/// - `-1 * (x + y)` → `[-1*x, -1*y]`
fn flatten_add(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(a, b) => {
            flatten_add(a, out);
            flatten_add(b, out);
        }
        Expr::Sub(a, b) => {
            flatten_add(a, out);
            let neg_b = Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone());
            flatten_add(&neg_b, out);
        }
        Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
            (Expr::Const(c), Expr::Add(a, b)) | (Expr::Add(a, b), Expr::Const(c)) if *c == -1.0 => {
                flatten_add(&Expr::Mul(Box::new(Expr::Const(-1.0)), a.clone()), out);
                flatten_add(&Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone()), out);
            }
            _ => out.push(expr.clone()),
        },
        _ => out.push(expr.clone()),
    }
}

/// Flatten nested multiplication expressions into a list of factors.
///
/// - `(a * b) * c` → `[a, b, c]`
pub(crate) fn flatten_mul(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            flatten_mul(a, out);
            flatten_mul(b, out);
        }
        _ => out.push(expr.clone()),
    }
}

/// Monomial and coefficient of a product of constants and integer powers of variables
fn extract_monomial(expr: &Expr) -> Option<(MonomialKey, f64)> {
    let mut factors = Vec::new();
    flatten_mul(expr, &mut factors);
    let mut coeff = 1.0;
    let mut map = BTreeMap::new();
    for factor in factors {
        match factor {
            Expr::Const(c) => coeff *= c,
            Expr::Var(v) => *map.entry(v).or_insert(0) += 1,
            Expr::Pow(base, exp) => match (*base, *exp) {
                (Expr::Var(v), Expr::Const(n)) if n.fract() == 0.0 => {
                    *map.entry(v).or_insert(0) += n as i32
                }
                _ => return None,
            },
            _ => return None,
        }
    }
    map.retain(|_, exp| *exp != 0);
    Some((MonomialKey(map), coeff))
}

fn multiply_term_lists(left: &[Expr], right: &[Expr]) -> Vec<Expr> {
    left.iter()
        .flat_map(|l| right.iter().map(move |r| Expr::Mul(Box::new(l.clone()), Box::new(r.clone()))))
        .collect()
}

fn poly_add(a: &[f64], b: &[f64], sign: f64) -> Vec<f64> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0.0) + sign * b.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Build Horner form `((a_n x + a_{n-1}) x + ...) x + a_0` for dense coefficients
/// `[a_0, a_1, ..., a_n]`.
pub fn horner_univariate(var: &str, coeffs: &[f64]) -> Expr {
    let mut degree = match coeffs.iter().rposition(|c| *c != 0.0) {
        Some(d) => d,
        None => return Expr::Const(0.0),
    };
    let x = Expr::Var(var.to_string());
    let mut acc = Expr::Const(coeffs[degree]);
    while degree > 0 {
        acc = Expr::Add(
            Box::new(Expr::Mul(Box::new(acc), Box::new(x.clone()))),
            Box::new(Expr::Const(coeffs[degree - 1])),
        );
        degree -= 1;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_simplify_constant_folding() {
        let expr = Expr::parse_expression("2*3 + 0*x + sin(0)").unwrap();
        assert_eq!(expr.simplify(), Expr::Const(6.0));
    }

    #[test]
    fn test_simplify_collects_like_terms() {
        let expr = Expr::parse_expression("3*x + 2*x - x").unwrap();
        let simplified = expr.simplify();
        assert_eq!(
            simplified,
            Expr::Mul(Box::new(Expr::Const(4.0)), Box::new(x()))
        );
    }

    #[test]
    fn test_simplify_self_subtraction() {
        let expr = Expr::parse_expression("sin(x) - sin(x)").unwrap();
        assert_eq!(expr.simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_simplify_keeps_fractional_powers() {
        // x^0.5 + x^0.5 is not a polynomial and must not collapse to a constant
        let expr = Expr::parse_expression("x^0.5 + x^0.5").unwrap();
        let simplified = expr.simplify();
        assert_relative_eq!(simplified.eval_at("x", 4.0).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expand_terms_square_of_binomial() {
        let expr = Expr::parse_expression("(x + 1)^2").unwrap();
        let terms = expr.expand_terms("x");
        assert_eq!(terms.len(), 4);
        let total: f64 = terms.iter().map(|t| t.eval_at("x", 3.0).unwrap()).sum();
        assert_relative_eq!(total, 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expand_terms_keeps_function_arguments() {
        let expr = Expr::parse_expression("(x - 4)*sin(x + 1)").unwrap();
        let terms = expr.expand_terms("x");
        assert_eq!(terms.len(), 2);
        for t in &terms {
            assert!(!matches!(t, Expr::Add(_, _) | Expr::Sub(_, _)));
        }
    }

    #[test]
    fn test_as_polynomial() {
        let expr = Expr::parse_expression("(2*x - 1)^2 / 4 + 3").unwrap();
        let poly = expr.as_polynomial("x").unwrap();
        // x^2 - x + 3.25
        assert_relative_eq!(poly[0], 3.25, epsilon = 1e-12);
        assert_relative_eq!(poly[1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(poly[2], 1.0, epsilon = 1e-12);
        assert!(Expr::parse_expression("sin(x)").unwrap().as_polynomial("x").is_none());
        assert!(Expr::parse_expression("x^0.5").unwrap().as_polynomial("x").is_none());
    }

    #[test]
    fn test_as_linear() {
        let expr = Expr::parse_expression("3 - 2*x").unwrap();
        assert_eq!(expr.as_linear("x"), Some((-2.0, 3.0)));
        assert_eq!(Expr::parse_expression("x*x").unwrap().as_linear("x"), None);
    }

    #[test]
    fn test_horner_univariate() {
        let horner = horner_univariate("x", &[1.0, 2.0, 3.0, 0.0]);
        assert_relative_eq!(horner.eval_at("x", 2.0).unwrap(), 17.0, epsilon = 1e-12);
        assert_eq!(horner_univariate("x", &[0.0, 0.0]), Expr::Const(0.0));
    }
}
