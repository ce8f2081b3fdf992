// numeric helpers shared by the symbolic modules and the renderer

/// `num_values` evenly spaced points from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            let mut values: Vec<f64> = (0..num_values).map(|i| start + i as f64 * step).collect();
            // keep the right end exact
            values[num_values - 1] = end;
            values
        }
    }
}

/// Finds the points in the open interval (a, b) where `f` changes sign.
///
/// The interval is scanned on a uniform grid of `scan_points` cells; every cell where the
/// sign flips (or a grid node hits zero) is refined by bisection down to `tolerance`.
/// Returned roots are sorted and deduplicated.
pub fn sign_change_roots<F>(f: F, a: f64, b: f64, scan_points: usize, tolerance: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi - lo <= 0.0 || scan_points == 0 {
        return Vec::new();
    }
    let grid = linspace(lo, hi, scan_points + 1);
    let values: Vec<f64> = grid.iter().map(|&x| f(x)).collect();
    let mut roots: Vec<f64> = Vec::new();
    for i in 0..scan_points {
        let (x0, x1) = (grid[i], grid[i + 1]);
        let (f0, f1) = (values[i], values[i + 1]);
        if !f0.is_finite() || !f1.is_finite() {
            continue;
        }
        if f0 == 0.0 {
            if x0 > lo {
                roots.push(x0);
            }
            continue;
        }
        if f0 * f1 < 0.0 {
            roots.push(bisection(&f, x0, x1, tolerance));
        }
    }
    roots.dedup_by(|r1, r2| (*r1 - *r2).abs() <= tolerance);
    roots
}

/// Bisection on a bracket [x0, x1] with f(x0)*f(x1) < 0
pub fn bisection<F>(f: &F, mut x0: f64, mut x1: f64, tolerance: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut f0 = f(x0);
    for _ in 0..200 {
        let mid = 0.5 * (x0 + x1);
        let f_mid = f(mid);
        if f_mid == 0.0 || (x1 - x0).abs() < tolerance {
            return mid;
        }
        if f0 * f_mid < 0.0 {
            x1 = mid;
        } else {
            x0 = mid;
            f0 = f_mid;
        }
    }
    0.5 * (x0 + x1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let x = linspace(-2.0, 2.0, 5);
        assert_eq!(x, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0]);
        assert!(linspace(1.0, 3.0, 0).is_empty());
    }

    #[test]
    fn test_sign_change_roots_finds_interior_roots() {
        let roots = sign_change_roots(|x| x * x - 1.0, -3.0, 3.0, 1000, 1e-12);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -1.0, epsilon = 1e-9);
        assert_relative_eq!(roots[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sign_change_roots_ignores_endpoint_zero() {
        // x = 0 is the left end, not an interior breakpoint
        let roots = sign_change_roots(|x| x, 0.0, 1.0, 100, 1e-12);
        assert!(roots.is_empty());
        // an interior grid node that is exactly zero is reported once
        let roots = sign_change_roots(|x| x, -1.0, 1.0, 100, 1e-12);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 0.0, epsilon = 1e-12);
    }
}
