//! # Symbolic Integration Module
//!
//! Closed-form antiderivatives for the class of integrands that volumes of revolution
//! produce: polynomials, products of powers of `x` with exponentials and sines/cosines of
//! linear arguments, logarithms and absolute values.
//!
//! ## Strategy
//!
//! 1. Polynomials are recognized directly and integrated coefficient by coefficient.
//! 2. Everything else is expanded into product terms (`expand_terms`), each term is
//!    normalized into `coeff * x^n * exp(px + q) * trig(rx + s) ...`, trigonometric pairs
//!    are reduced with product-to-sum identities and the result is integrated with the
//!    tabular form of integration by parts.
//! 3. `definite_integrate` splits the interval at the zeros of every `|g(x)|` argument so
//!    that each piece is free of absolute values.
//!
//! Integrands outside this class return `Err`; nothing is approximated silently.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::horner_univariate;
use crate::symbolic::utils::sign_change_roots;

/// Grid cells scanned for sign changes of `|g(x)|` arguments.
const ABS_SCAN_POINTS: usize = 2000;
/// Bisection tolerance for breakpoints of `|g(x)|`.
const ABS_ROOT_TOLERANCE: f64 = 1e-14;
/// Largest power of `x` multiplied into an exponential or trigonometric kernel.
const MAX_TABULAR_POWER: f64 = 64.0;
const LOG_DERIVATIVE_PROBES: [f64; 3] = [0.37, 1.13, 2.71];

/// `slope * x + offset`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Linear {
    slope: f64,
    offset: f64,
}

impl Linear {
    fn add(self, other: Linear) -> Linear {
        Linear {
            slope: self.slope + other.slope,
            offset: self.offset + other.offset,
        }
    }

    fn sub(self, other: Linear) -> Linear {
        Linear {
            slope: self.slope - other.slope,
            offset: self.offset - other.offset,
        }
    }

    fn scale(self, factor: f64) -> Linear {
        Linear {
            slope: self.slope * factor,
            offset: self.offset * factor,
        }
    }

    fn to_expr(self, var: &str) -> Expr {
        let x = Expr::Var(var.to_string());
        let scaled = if self.slope == 1.0 {
            x
        } else {
            Expr::Const(self.slope) * x
        };
        if self.offset == 0.0 {
            scaled
        } else {
            scaled + Expr::Const(self.offset)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Trig {
    Sin,
    Cos,
}

impl Trig {
    fn apply(self, arg: Expr) -> Expr {
        match self {
            Trig::Sin => Expr::sin(arg.boxed()),
            Trig::Cos => Expr::cos(arg.boxed()),
        }
    }

    fn value(self, arg: f64) -> f64 {
        match self {
            Trig::Sin => arg.sin(),
            Trig::Cos => arg.cos(),
        }
    }
}

/// `coeff * x^power * ln(ax + b)^k * exp(exp) * Π trig_i(arg_i)`, `log = Some((ax + b, k))`
#[derive(Clone, Debug, PartialEq)]
struct ProductTerm {
    coeff: f64,
    power: f64,
    log: Option<(Linear, u32)>,
    exp: Option<Linear>,
    trig: Vec<(Trig, Linear)>,
}

impl ProductTerm {
    fn unit() -> ProductTerm {
        ProductTerm {
            coeff: 1.0,
            power: 0.0,
            log: None,
            exp: None,
            trig: Vec::new(),
        }
    }

    fn from_expr(expr: &Expr, var: &str) -> Option<ProductTerm> {
        let mut term = ProductTerm::unit();
        term.absorb(expr, var, false)?;
        Some(term.normalized())
    }

    /// Multiplies `factor` (or its reciprocal when `inverse`) into the term.
    fn absorb(&mut self, factor: &Expr, var: &str, inverse: bool) -> Option<()> {
        if !factor.contains_variable(var) {
            let c = factor.eval_constant().ok()?;
            if inverse {
                if c == 0.0 {
                    return None;
                }
                self.coeff /= c;
            } else {
                self.coeff *= c;
            }
            return Some(());
        }
        let sign = if inverse { -1.0 } else { 1.0 };
        match factor {
            Expr::Var(_) => self.power += sign,
            Expr::Mul(lhs, rhs) => {
                self.absorb(lhs, var, inverse)?;
                self.absorb(rhs, var, inverse)?;
            }
            Expr::Div(lhs, rhs) => {
                self.absorb(lhs, var, inverse)?;
                self.absorb(rhs, var, !inverse)?;
            }
            Expr::Pow(base, exp) => {
                let n = exp.eval_constant().ok()?;
                match base.as_ref() {
                    Expr::Var(_) => self.power += sign * n,
                    // exp(g)^n = exp(n g)
                    Expr::Exp(arg) => {
                        let linear = arg.as_linear(var)?.into_linear().scale(sign * n);
                        self.merge_exp(linear);
                    }
                    _ if n.fract() == 0.0 && n >= 1.0 && n <= MAX_TABULAR_POWER => {
                        for _ in 0..(n as i32) {
                            self.absorb(base, var, inverse)?;
                        }
                    }
                    _ => return None,
                }
            }
            Expr::Exp(arg) => {
                let linear = arg.as_linear(var)?.into_linear().scale(sign);
                self.merge_exp(linear);
            }
            Expr::sin(arg) if !inverse => {
                self.trig.push((Trig::Sin, arg.as_linear(var)?.into_linear()));
            }
            Expr::cos(arg) if !inverse => {
                self.trig.push((Trig::Cos, arg.as_linear(var)?.into_linear()));
            }
            Expr::Ln(arg) if !inverse => {
                let linear = arg.as_linear(var)?.into_linear();
                self.merge_log(linear)?;
            }
            _ => return None,
        }
        Some(())
    }

    /// Only powers of a single logarithm are kept, ln(x) ln(x + 1) is not.
    fn merge_log(&mut self, linear: Linear) -> Option<()> {
        self.log = match self.log {
            None => Some((linear, 1)),
            Some((existing, k)) if existing == linear => Some((existing, k + 1)),
            Some(_) => return None,
        };
        Some(())
    }

    fn merge_exp(&mut self, linear: Linear) {
        self.exp = Some(match self.exp {
            Some(existing) => existing.add(linear),
            None => linear,
        });
    }

    /// Folds kernels whose argument does not depend on `x` into the coefficient.
    fn normalized(mut self) -> ProductTerm {
        if let Some((arg, k)) = self.log {
            if arg.slope == 0.0 {
                self.coeff *= arg.offset.ln().powi(k as i32);
                self.log = None;
            }
        }
        if let Some(exp) = self.exp {
            if exp.slope == 0.0 {
                self.coeff *= exp.offset.exp();
                self.exp = None;
            }
        }
        let mut kept = Vec::with_capacity(self.trig.len());
        for (kind, arg) in self.trig.drain(..) {
            if arg.slope == 0.0 {
                self.coeff *= kind.value(arg.offset);
            } else {
                kept.push((kind, arg));
            }
        }
        self.trig = kept;
        self
    }

    /// Product-to-sum reduction until every term carries at most one trigonometric factor.
    fn reduce(self) -> Vec<ProductTerm> {
        if self.trig.len() < 2 {
            return vec![self];
        }
        let mut rest = self;
        let ((kind_a, a), (kind_b, b)) = match (rest.trig.pop(), rest.trig.pop()) {
            (Some(first), Some(second)) => (first, second),
            _ => return vec![rest],
        };
        let sum = a.add(b);
        let diff = a.sub(b);
        let pieces = match (kind_a, kind_b) {
            // sin A sin B = [cos(A-B) - cos(A+B)]/2
            (Trig::Sin, Trig::Sin) => [(Trig::Cos, diff, 0.5), (Trig::Cos, sum, -0.5)],
            // cos A cos B = [cos(A-B) + cos(A+B)]/2
            (Trig::Cos, Trig::Cos) => [(Trig::Cos, diff, 0.5), (Trig::Cos, sum, 0.5)],
            // sin A cos B = [sin(A+B) + sin(A-B)]/2
            (Trig::Sin, Trig::Cos) => [(Trig::Sin, sum, 0.5), (Trig::Sin, diff, 0.5)],
            // cos A sin B = [sin(A+B) - sin(A-B)]/2
            (Trig::Cos, Trig::Sin) => [(Trig::Sin, sum, 0.5), (Trig::Sin, diff, -0.5)],
        };
        pieces
            .into_iter()
            .flat_map(|(kind, arg, factor)| {
                let mut term = rest.clone();
                term.coeff *= factor;
                term.trig.push((kind, arg));
                term.normalized().reduce()
            })
            .collect()
    }

    fn antiderivative(&self, var: &str) -> Result<Expr, String> {
        let x = Expr::Var(var.to_string());
        if self.coeff == 0.0 {
            return Ok(Expr::Const(0.0));
        }
        if let Some((arg, k)) = self.log {
            return self.log_antiderivative(arg, k, var);
        }
        if self.exp.is_none() && self.trig.is_empty() {
            if self.power == -1.0 {
                return Ok(Expr::Const(self.coeff) * x.abs().ln());
            }
            let p = self.power + 1.0;
            return Ok(Expr::Const(self.coeff / p) * x.pow(Expr::Const(p)));
        }
        let n = self.power;
        if n < 0.0 || n.fract() != 0.0 || n > MAX_TABULAR_POWER {
            return Err(format!(
                "Cannot integrate x^{} times an exponential or trigonometric factor",
                n
            ));
        }
        let n = n as u32;
        // tabular integration by parts: Σ (-1)^k n!/(n-k)! x^(n-k) V_{k+1}
        let mut terms: Vec<Expr> = Vec::with_capacity(n as usize + 1);
        let mut falling = 1.0;
        for k in 0..=n {
            if k > 0 {
                falling *= (n - k + 1) as f64;
            }
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            let (scale, kernel) = self.kernel_antiderivative(k + 1, var);
            let mut term = Expr::Const(self.coeff * sign * falling * scale);
            let x_power = n - k;
            if x_power == 1 {
                term = term * x.clone();
            } else if x_power > 1 {
                term = term * x.clone().pow(Expr::Const(x_power as f64));
            }
            terms.push(term * kernel);
        }
        Ok(sum_of(terms))
    }

    /// j-th repeated antiderivative of the kernel, as (scale, expression).
    fn kernel_antiderivative(&self, j: u32, var: &str) -> (f64, Expr) {
        let exp_part = self.exp.map(|lin| Expr::Exp(lin.to_expr(var).boxed()));
        match self.trig.first() {
            Some(&(kind, arg)) => {
                // e^(px+q) trig(rx+s): V_j = rho^-j e^(px+q) trig(rx + s - j*phi)
                let p = self.exp.map(|lin| lin.slope).unwrap_or(0.0);
                let rho = p.hypot(arg.slope);
                let phi = arg.slope.atan2(p);
                let shifted = Linear {
                    slope: arg.slope,
                    offset: arg.offset - j as f64 * phi,
                };
                let trig_part = kind.apply(shifted.to_expr(var));
                let kernel = match exp_part {
                    Some(e) => e * trig_part,
                    None => trig_part,
                };
                (rho.powi(-(j as i32)), kernel)
            }
            None => {
                // e^(px+q): V_j = e^(px+q) / p^j
                let p = self.exp.map(|lin| lin.slope).unwrap_or(1.0);
                (p.powi(-(j as i32)), exp_part.unwrap_or(Expr::Const(1.0)))
            }
        }
    }

    /// ∫ x^n ln(ax + b)^k dx by the substitution u = ax + b: x^n is rewritten as a sum of
    /// powers of u and every `u^m ln(u)^k` is integrated with `power_log_antiderivative`.
    fn log_antiderivative(&self, arg: Linear, k: u32, var: &str) -> Result<Expr, String> {
        if self.exp.is_some() || !self.trig.is_empty() {
            return Err(
                "Cannot integrate logarithms multiplied by exponential or trigonometric factors"
                    .to_string(),
            );
        }
        let Linear { slope: a, offset: b } = arg;
        let u = arg.to_expr(var);
        let n = self.power;
        // x^n = Σ c_m u^m
        let powers: Vec<(f64, f64)> = if b == 0.0 {
            if n.fract() != 0.0 && a < 0.0 {
                return Err(format!("Cannot integrate x^{} times ln({})", n, u));
            }
            vec![(n, a.powf(-n))]
        } else {
            if n < 0.0 || n.fract() != 0.0 || n > MAX_TABULAR_POWER {
                return Err(format!("Cannot integrate x^{} times ln({})", n, u));
            }
            // x^n = a^-n Σ C(n, j) u^j (-b)^(n-j)
            let n = n as u32;
            let mut binomial = 1.0;
            let mut powers = Vec::with_capacity(n as usize + 1);
            for j in 0..=n {
                if j > 0 {
                    binomial *= (n - j + 1) as f64 / j as f64;
                }
                let c = binomial * (-b).powi((n - j) as i32) / a.powi(n as i32);
                if c != 0.0 {
                    powers.push((j as f64, c));
                }
            }
            powers
        };
        let terms = powers
            .into_iter()
            .map(|(m, c)| Expr::Const(self.coeff * c / a) * power_log_antiderivative(&u, m, k))
            .collect();
        Ok(sum_of(terms))
    }
}

/// ∫ u^m ln(u)^k du = Σ_i (-1)^i k!/(k-i)! u^(m+1) ln(u)^(k-i) / (m+1)^(i+1),
/// ∫ ln(u)^k / u du = ln(u)^(k+1) / (k+1)
fn power_log_antiderivative(u: &Expr, m: f64, k: u32) -> Expr {
    let ln_power = |j: u32| match j {
        0 => Expr::Const(1.0),
        1 => u.clone().ln(),
        _ => u.clone().ln().pow(Expr::Const(j as f64)),
    };
    if m == -1.0 {
        return Expr::Const(1.0 / (k + 1) as f64) * ln_power(k + 1);
    }
    let p = m + 1.0;
    let u_power = if p == 1.0 {
        u.clone()
    } else {
        u.clone().pow(Expr::Const(p))
    };
    let mut falling = 1.0;
    let mut terms = Vec::with_capacity(k as usize + 1);
    for i in 0..=k {
        if i > 0 {
            falling *= (k - i + 1) as f64;
        }
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        let c = sign * falling / p.powi(i as i32 + 1);
        terms.push(Expr::Const(c) * u_power.clone() * ln_power(k - i));
    }
    sum_of(terms)
}

trait IntoLinear {
    fn into_linear(self) -> Linear;
}

impl IntoLinear for (f64, f64) {
    fn into_linear(self) -> Linear {
        Linear {
            slope: self.0,
            offset: self.1,
        }
    }
}

fn sum_of(terms: Vec<Expr>) -> Expr {
    terms
        .into_iter()
        .reduce(|a, b| a + b)
        .unwrap_or(Expr::Const(0.0))
}

/// ∫ Σ c_i x^i dx as a Horner-form polynomial
fn integrate_polynomial(var: &str, coeffs: &[f64]) -> Expr {
    let mut integrated = vec![0.0; coeffs.len() + 1];
    for (i, c) in coeffs.iter().enumerate() {
        integrated[i + 1] = c / (i as f64 + 1.0);
    }
    horner_univariate(var, &integrated)
}

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Main integration method - integrates with respect to a variable.
    /// Returns the indefinite integral (without constant of integration).
    ///
    /// # Errors
    /// Returns an error describing the first subexpression that has no rule.
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        // ∫ c dx = c*x
        if !self.contains_variable(var) {
            return Ok(self.clone() * Expr::Var(var.to_string()));
        }
        if let Some(coeffs) = self.as_polynomial(var) {
            return Ok(integrate_polynomial(var, &coeffs));
        }
        match self {
            // ∫ (f ± g) dx = ∫ f dx ± ∫ g dx
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),
            Expr::Div(lhs, rhs) => self
                .integrate_product(var)
                .or_else(|err| self.integrate_logarithmic_derivative(lhs, rhs, var).ok_or(err)),
            Expr::Ln(arg) => self.integrate_logarithm(arg, var),
            Expr::tg(arg) => self.integrate_tan(arg, var),
            Expr::Abs(arg) => self.integrate_abs(arg, var),
            _ => self.integrate_product(var),
        }
    }

    /// Expands the integrand into product terms and integrates each of them.
    fn integrate_product(&self, var: &str) -> Result<Expr, String> {
        let mut pieces = Vec::new();
        for term in self.expand_terms(var) {
            let product = ProductTerm::from_expr(&term, var)
                .ok_or_else(|| format!("Cannot integrate {} with respect to {}", term, var))?;
            for reduced in product.reduce() {
                pieces.push(reduced.antiderivative(var)?);
            }
        }
        Ok(sum_of(pieces))
    }

    /// ∫ c*f'(x)/f(x) dx = c*ln|f(x)|
    fn integrate_logarithmic_derivative(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Option<Expr> {
        let derivative = rhs.diff(var).simplify();
        if derivative == lhs.simplify() {
            return Some(rhs.clone().abs().ln());
        }
        // the ratio numerator/f' must be the same constant at a few sample points
        let ratios: Vec<f64> = LOG_DERIVATIVE_PROBES
            .iter()
            .filter_map(|&x| Some(lhs.eval_at(var, x).ok()? / derivative.eval_at(var, x).ok()?))
            .collect();
        let c = *ratios.first()?;
        let constant = ratios.len() == LOG_DERIVATIVE_PROBES.len()
            && c.is_finite()
            && ratios.iter().all(|r| (r - c).abs() <= 1e-12 * c.abs().max(1.0));
        constant.then(|| Expr::Const(c) * rhs.clone().abs().ln())
    }

    /// ∫ ln(ax + b) dx = ((ax + b) ln(ax + b) - (ax + b)) / a
    fn integrate_logarithm(&self, arg: &Expr, var: &str) -> Result<Expr, String> {
        let (a, _) = arg
            .as_linear(var)
            .ok_or_else(|| format!("Cannot integrate logarithm: ln({})", arg))?;
        let u = arg.clone();
        Ok((u.clone() * u.clone().ln() - u) / Expr::Const(a))
    }

    /// ∫ tg(ax + b) dx = -ln|cos(ax + b)| / a
    fn integrate_tan(&self, arg: &Expr, var: &str) -> Result<Expr, String> {
        let (a, _) = arg
            .as_linear(var)
            .ok_or_else(|| format!("Cannot integrate tan({})", arg))?;
        Ok(Expr::Const(-1.0 / a) * Expr::cos(Box::new(arg.clone())).abs().ln())
    }

    /// ∫ |ax + b| dx = (ax + b)|ax + b| / (2a)
    fn integrate_abs(&self, arg: &Expr, var: &str) -> Result<Expr, String> {
        let (a, _) = arg.as_linear(var).ok_or_else(|| {
            format!(
                "Cannot integrate |{}| in closed form; use definite_integrate to split the interval",
                arg
            )
        })?;
        Ok(arg.clone() * arg.clone().abs() / Expr::Const(2.0 * a))
    }

    //___________________________________ABSOLUTE VALUES____________________________________

    /// Arguments of every `Abs` node, outermost first.
    pub fn abs_arguments(&self) -> Vec<Expr> {
        let mut out = Vec::new();
        self.collect_abs_arguments(&mut out);
        out
    }

    fn collect_abs_arguments(&self, out: &mut Vec<Expr>) {
        match self {
            Expr::Var(_) | Expr::Const(_) => {}
            Expr::Abs(arg) => {
                out.push(*arg.clone());
                arg.collect_abs_arguments(out);
            }
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_abs_arguments(out);
                rhs.collect_abs_arguments(out);
            }
            unary => {
                if let Some(arg) = unary.argument() {
                    arg.collect_abs_arguments(out);
                }
            }
        }
    }

    /// Points in (lower, upper) where some `|g(x)|` argument changes sign, sorted.
    pub fn abs_breakpoints(&self, var: &str, lower: f64, upper: f64) -> Result<Vec<f64>, String> {
        let mut points = Vec::new();
        for arg in self.abs_arguments() {
            if !arg.contains_variable(var) {
                continue;
            }
            match arg.as_linear(var) {
                Some((slope, offset)) if slope != 0.0 => {
                    let root = -offset / slope;
                    if root > lower && root < upper {
                        points.push(root);
                    }
                }
                Some(_) => {}
                None => {
                    let g = arg.lambdify1D()?;
                    points.extend(sign_change_roots(
                        |x| g(x),
                        lower,
                        upper,
                        ABS_SCAN_POINTS,
                        ABS_ROOT_TOLERANCE,
                    ));
                }
            }
        }
        points.sort_by(|a, b| a.total_cmp(b));
        points.dedup_by(|a, b| (*a - *b).abs() <= ABS_ROOT_TOLERANCE);
        Ok(points)
    }

    /// Replaces every `|g|` by `s*g`, with `s` the sign of `g` at `point`, and every
    /// `g/|g|` by that sign.
    pub fn resolve_abs(&self, var: &str, point: f64) -> Result<Expr, String> {
        match self {
            Expr::Abs(arg) => {
                let inner = arg.resolve_abs(var, point)?;
                let sign = abs_sign(&inner, var, point)?;
                Ok(if sign > 0.0 {
                    inner
                } else {
                    Expr::Const(-1.0) * inner
                })
            }
            Expr::Div(lhs, rhs) => match rhs.as_ref() {
                Expr::Abs(arg) if arg == lhs => {
                    let inner = arg.resolve_abs(var, point)?;
                    Ok(Expr::Const(abs_sign(&inner, var, point)?))
                }
                _ => Ok(Expr::Div(
                    lhs.resolve_abs(var, point)?.boxed(),
                    rhs.resolve_abs(var, point)?.boxed(),
                )),
            },
            Expr::Var(_) | Expr::Const(_) => Ok(self.clone()),
            Expr::Add(lhs, rhs) => Ok(Expr::Add(
                lhs.resolve_abs(var, point)?.boxed(),
                rhs.resolve_abs(var, point)?.boxed(),
            )),
            Expr::Sub(lhs, rhs) => Ok(Expr::Sub(
                lhs.resolve_abs(var, point)?.boxed(),
                rhs.resolve_abs(var, point)?.boxed(),
            )),
            Expr::Mul(lhs, rhs) => Ok(Expr::Mul(
                lhs.resolve_abs(var, point)?.boxed(),
                rhs.resolve_abs(var, point)?.boxed(),
            )),
            Expr::Pow(lhs, rhs) => Ok(Expr::Pow(
                lhs.resolve_abs(var, point)?.boxed(),
                rhs.resolve_abs(var, point)?.boxed(),
            )),
            unary => match unary.argument() {
                Some(arg) => Ok(unary.with_argument(arg.resolve_abs(var, point)?)),
                None => Ok(unary.clone()),
            },
        }
    }

    /// Definite integration using the fundamental theorem of calculus.
    ///
    /// Integrands with absolute values are integrated piecewise between the zeros of the
    /// `|g(x)|` arguments. Reversed bounds change the sign of the result.
    pub fn definite_integrate(&self, var: &str, lower: f64, upper: f64) -> Result<f64, String> {
        if lower == upper {
            return Ok(0.0);
        }
        if lower > upper {
            return Ok(-self.definite_integrate(var, upper, lower)?);
        }
        if !self.contains_abs() {
            let indefinite = self.integrate(var)?;
            return Ok(indefinite.eval_at(var, upper)? - indefinite.eval_at(var, lower)?);
        }
        let mut nodes = vec![lower];
        nodes.extend(self.abs_breakpoints(var, lower, upper)?);
        nodes.push(upper);
        let mut total = 0.0;
        for window in nodes.windows(2) {
            let (a, b) = (window[0], window[1]);
            if b <= a {
                continue;
            }
            let piece = self.resolve_abs(var, 0.5 * (a + b))?;
            let indefinite = piece.integrate(var)?;
            total += indefinite.eval_at(var, b)? - indefinite.eval_at(var, a)?;
        }
        Ok(total)
    }

    /// Composite Simpson's rule on `n` (even) subintervals.
    pub fn numerical_integrate(&self, var: &str, lower: f64, upper: f64, n: usize) -> Result<f64, String> {
        simpson(|x| self.eval_at(var, x), lower, upper, n)
    }
}

fn abs_sign(inner: &Expr, var: &str, point: f64) -> Result<f64, String> {
    let value = inner.eval_at(var, point)?;
    Ok(if value < 0.0 { -1.0 } else { 1.0 })
}

/// Composite Simpson's rule for a fallible integrand:
/// h/3 * [g(a) + g(b) + 4 Σ g(odd nodes) + 2 Σ g(even interior nodes)]
pub fn simpson<F>(g: F, lower: f64, upper: f64, n: usize) -> Result<f64, String>
where
    F: Fn(f64) -> Result<f64, String>,
{
    if n == 0 || n % 2 != 0 {
        return Err(format!("n must be even for Simpson's rule, got {}", n));
    }
    let h = (upper - lower) / n as f64;
    let mut odd_sum = 0.0;
    let mut even_sum = 0.0;
    for i in 1..n {
        let value = g(lower + i as f64 * h)?;
        if i % 2 == 1 {
            odd_sum += value;
        } else {
            even_sum += value;
        }
    }
    let sum = g(lower)? + g(upper)? + 4.0 * odd_sum + 2.0 * even_sum;
    Ok(h / 3.0 * sum)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    #[test]
    fn test_integrate_constant() {
        let result = Expr::Const(5.0).integrate("x").unwrap();
        let result_val = result.eval_at("x", 2.0).unwrap();
        assert_relative_eq!(result_val, 10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_definite_integration_polynomial() {
        // ∫₁³ (x² + 1) dx = 32/3
        let result = parse("x^2 + 1").definite_integrate("x", 1.0, 3.0).unwrap();
        assert_relative_eq!(result, 32.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_product_of_polynomials() {
        // ∫₀² x*x*(x - 1) dx = 4 - 8/3
        let result = parse("x*x*(x - 1)").definite_integrate("x", 0.0, 2.0).unwrap();
        assert_relative_eq!(result, 4.0 - 8.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_reversed_bounds_change_sign() {
        let f = parse("x^3 + 2");
        let forward = f.definite_integrate("x", -1.0, 2.0).unwrap();
        let backward = f.definite_integrate("x", 2.0, -1.0).unwrap();
        assert_relative_eq!(forward, -backward, epsilon = 1e-12);
        assert_eq!(f.definite_integrate("x", 1.5, 1.5).unwrap(), 0.0);
    }

    #[test]
    fn test_integrate_one_over_x() {
        let f = parse("1/x");
        assert_relative_eq!(f.definite_integrate("x", 1.0, E).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.definite_integrate("x", -E, -1.0).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate_exponential_with_linear_argument() {
        // ∫₀¹ e^(2x+1) dx = (e^3 - e)/2
        let result = parse("exp(2*x + 1)").definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(result, (E.powi(3) - E) / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_x_squared_exp_negative_x() {
        // ∫₀¹ x² e^(-x) dx = 2 - 5/e
        let result = parse("x^2*exp(-x)").definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(result, 2.0 - 5.0 / E, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_exp_squared() {
        // ∫₀¹ (e^x)² dx = (e² - 1)/2
        let result = parse("exp(x)^2").definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(result, (E * E - 1.0) / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_x_sin_x() {
        // ∫₀^π x sin x dx = π
        let result = parse("x*sin(x)").definite_integrate("x", 0.0, PI).unwrap();
        assert_relative_eq!(result, PI, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_sin_squared() {
        // ∫₀^π sin²x dx = π/2
        let result = parse("sin(x)^2").definite_integrate("x", 0.0, PI).unwrap();
        assert_relative_eq!(result, PI / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_exp_times_sin() {
        // ∫₀^π e^x sin x dx = (e^π + 1)/2
        let result = parse("exp(x)*sin(x)").definite_integrate("x", 0.0, PI).unwrap();
        assert_relative_eq!(result, (PI.exp() + 1.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_integrate_square_of_mixed_sum_matches_simpson() {
        let f = parse("(sin(x) + x^2 - 4)^2 * (1 + 2*cos(x))");
        let exact = f.definite_integrate("x", 0.0, 2.0).unwrap();
        let numeric = f.numerical_integrate("x", 0.0, 2.0, 2000).unwrap();
        assert_relative_eq!(exact, numeric, epsilon = 1e-8);
    }

    #[test]
    fn test_integrate_logarithm() {
        assert_relative_eq!(
            parse("ln(x)").definite_integrate("x", 1.0, E).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            parse("x*ln(x)").definite_integrate("x", 1.0, E).unwrap(),
            (E * E + 1.0) / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_integrate_powers_of_logarithm() {
        // ∫ ln²x = x ln²x - 2x ln x + 2x
        assert_relative_eq!(
            parse("ln(x)^2").definite_integrate("x", 1.0, 2.0).unwrap(),
            2.0 * 2f64.ln().powi(2) - 4.0 * 2f64.ln() + 2.0,
            epsilon = 1e-12
        );
        // ∫₁^e ln³x = 6 - 2e
        assert_relative_eq!(
            parse("ln(x)^3").definite_integrate("x", 1.0, E).unwrap(),
            6.0 - 2.0 * E,
            epsilon = 1e-12
        );
        // ∫₁^e ln²x / x = 1/3
        assert_relative_eq!(
            parse("ln(x)^2/x").definite_integrate("x", 1.0, E).unwrap(),
            1.0 / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_integrate_logarithm_of_linear_argument() {
        // u = 2x + 1: 1/4 ∫₁³ (u - 1) ln u du = 3/8 ln 3
        assert_relative_eq!(
            parse("x*ln(2*x + 1)").definite_integrate("x", 0.0, 1.0).unwrap(),
            0.375 * 3f64.ln(),
            epsilon = 1e-12
        );
        let f = parse("x^2*ln(3 - x)^2");
        let exact = f.definite_integrate("x", 0.0, 2.0).unwrap();
        let numeric = f.numerical_integrate("x", 0.0, 2.0, 2000).unwrap();
        assert_relative_eq!(exact, numeric, epsilon = 1e-9);
    }

    #[test]
    fn test_integrate_tan() {
        // ∫₀^(π/4) tan x dx = ln(2)/2
        let result = parse("tan(x)").definite_integrate("x", 0.0, PI / 4.0).unwrap();
        assert_relative_eq!(result, 2f64.ln() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate_logarithmic_derivative() {
        // ∫₀¹ 2x/(x²+1) dx = ln 2
        let result = parse("2*x/(x^2 + 1)").definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(result, 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_indefinite_abs_of_linear() {
        let antiderivative = parse("abs(2*x - 1)").integrate("x").unwrap();
        let value = antiderivative.eval_at("x", 1.0).unwrap() - antiderivative.eval_at("x", 0.0).unwrap();
        assert_relative_eq!(value, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_definite_abs_splits_interval() {
        assert_relative_eq!(
            parse("abs(x)").definite_integrate("x", -1.0, 1.0).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            parse("x*abs(x)").definite_integrate("x", -1.0, 1.0).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            parse("abs(x^2 - 1)").definite_integrate("x", -2.0, 1.0).unwrap(),
            8.0 / 3.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_resolve_abs_derivative_ratio_becomes_sign() {
        let df = parse("abs(x - 1)").diff("x");
        let left = df.resolve_abs("x", 0.0).unwrap().simplify();
        let right = df.resolve_abs("x", 2.0).unwrap().simplify();
        assert_eq!(left, Expr::Const(-1.0));
        assert_eq!(right, Expr::Const(1.0));
    }

    #[test]
    fn test_unsupported_integrands_are_errors() {
        assert!(parse("sin(x^2)").integrate("x").is_err());
        assert!(parse("exp(x^2)").definite_integrate("x", 0.0, 1.0).is_err());
        assert!(parse("abs(x^2 - 2)").integrate("x").is_err());
        assert!(parse("ln(x)*ln(x + 1)").integrate("x").is_err());
        assert!(parse("exp(x)*ln(x)").integrate("x").is_err());
    }

    #[test]
    fn test_numerical_integration_simpson() {
        let f = parse("x^3");
        let result = f.numerical_integrate("x", 0.0, 2.0, 10).unwrap();
        assert_relative_eq!(result, 4.0, epsilon = 1e-12);
        assert!(f.numerical_integrate("x", 0.0, 2.0, 5).is_err());
        assert!(f.numerical_integrate("x", 0.0, 2.0, 0).is_err());
    }
}
