use crate::revolution::{
    Axis, AxisKind, RevolutionError, approximate_volume, convergence_study, convergence_table,
    exact_volume, exact_volume_unrounded, round_to_significant, simpson_volume,
};
use crate::symbolic::symbolic_engine::Expr;
use approx::assert_relative_eq;
use std::f64::consts::{E, PI};
use strum::IntoEnumIterator;

fn parse(input: &str) -> Expr {
    Expr::parse_expression(input).unwrap()
}

fn axis_of(kind: AxisKind) -> Axis {
    match kind {
        AxisKind::X => Axis::XAxis,
        AxisKind::Y => Axis::YAxis,
        AxisKind::Line => Axis::line(1.0, 4.0),
    }
}

#[test]
fn test_line_exact_and_simpson_agree() {
    let f = parse("x");
    let exact = exact_volume(&f, -1.0, 1.0, (1.0, 4.0)).unwrap();
    let approx = approximate_volume(&f, -1.0, 1.0, (1.0, 4.0), 100).unwrap();
    // 2 * 16 over an interval of length 2
    assert_relative_eq!(exact, 64.0 * PI / 2f64.powf(1.5), max_relative = 1e-6);
    assert_relative_eq!(round_to_significant(exact, 5), approx);
}

#[test]
fn test_odd_n_is_rejected_for_every_axis() {
    let f = parse("x^2 + 1");
    for kind in AxisKind::iter() {
        let err = approximate_volume(&f, 0.0, 1.0, axis_of(kind), 5).unwrap_err();
        assert_eq!(err, RevolutionError::OddSubdivisions(5));
        assert!(err.to_string().contains("n must be even"));
    }
}

#[test]
fn test_zero_n_is_rejected() {
    let f = parse("x");
    let err = simpson_volume(&f, 0.0, 1.0, "x", 0).unwrap_err();
    assert_eq!(err, RevolutionError::ZeroSubdivisions);
}

#[test]
fn test_unknown_axis_is_rejected_by_both_calculators() {
    let f = parse("x");
    assert!(matches!(
        exact_volume(&f, 0.0, 1.0, "z"),
        Err(RevolutionError::InvalidAxis(_))
    ));
    // the axis is checked before n
    assert!(matches!(
        approximate_volume(&f, 0.0, 1.0, "z", 3),
        Err(RevolutionError::InvalidAxis(_))
    ));
}

#[test]
fn test_horizontal_line_through_origin_is_the_x_axis() {
    let f = parse("x^2");
    let about_x = exact_volume_unrounded(&f, -2.0, 2.0, Axis::XAxis).unwrap();
    let about_line = exact_volume_unrounded(&f, -2.0, 2.0, (0.0, 0.0)).unwrap();
    assert_relative_eq!(about_x, about_line, max_relative = 1e-12);
    assert_relative_eq!(about_x, 64.0 * PI / 5.0, max_relative = 1e-12);
    let simpson_x = simpson_volume(&f, -2.0, 2.0, 'x', 8).unwrap();
    let simpson_line = simpson_volume(&f, -2.0, 2.0, vec![0.0, 0.0], 8).unwrap();
    assert_relative_eq!(simpson_x, simpson_line, max_relative = 1e-12);
}

#[test]
fn test_simpson_converges_to_exact_volume() {
    let f = parse("x^3");
    let rows = convergence_study(&f, 0.0, 2.0, Axis::XAxis, &[4, 8, 16, 32]).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].error_ratio.is_none());
    for pair in rows.windows(2) {
        assert!(pair[1].abs_error < pair[0].abs_error);
        assert!(pair[1].error_ratio.unwrap() > 2.0);
    }
    assert_relative_eq!(rows[0].exact, 128.0 * PI / 7.0, max_relative = 1e-12);
    let table = convergence_table(&rows);
    assert!(table.contains("Simpson"));
    assert!(table.contains("error ratio"));
}

#[test]
fn test_constant_function_gives_a_cylinder() {
    let f = parse("3");
    assert_relative_eq!(exact_volume(&f, 0.0, 1.0, "x").unwrap(), round_to_significant(9.0 * PI, 7));
    assert_relative_eq!(approximate_volume(&f, 0.0, 1.0, "x", 2).unwrap(), 28.274);
}

#[test]
fn test_y_axis_uses_distance_from_the_axis() {
    let f = parse("x");
    let exact = exact_volume_unrounded(&f, -1.0, 1.0, Axis::YAxis).unwrap();
    assert!(exact > 0.0);
    assert_relative_eq!(exact, 4.0 * PI / 3.0, max_relative = 1e-12);
    let parabola = exact_volume_unrounded(&parse("x^2"), 0.0, 1.0, "y").unwrap();
    assert_relative_eq!(parabola, PI / 2.0, max_relative = 1e-12);
}

#[test]
fn test_closed_form_volumes() {
    let exp = exact_volume_unrounded(&parse("exp(x)"), 0.0, 1.0, "x").unwrap();
    assert_relative_eq!(exp, PI * (E * E - 1.0) / 2.0, max_relative = 1e-10);
    let sine = exact_volume_unrounded(&parse("sin(x)"), 0.0, PI, "x").unwrap();
    assert_relative_eq!(sine, PI * PI / 2.0, max_relative = 1e-10);
    let simpson = simpson_volume(&parse("sin(x)"), 0.0, PI, "x", 200).unwrap();
    assert_relative_eq!(simpson, sine, max_relative = 1e-8);
}

#[test]
fn test_abs_about_a_tilted_line() {
    let f = parse("abs(x)");
    let exact = exact_volume_unrounded(&f, -1.0, 1.0, (1.0, 4.0)).unwrap();
    assert_relative_eq!(exact, 32.0 * PI / 2f64.powf(1.5), max_relative = 1e-10);
    let simpson = simpson_volume(&f, -1.0, 1.0, (1.0, 4.0), 100).unwrap();
    assert_relative_eq!(simpson, exact, max_relative = 1e-8);
}

#[test]
fn test_integrand_without_antiderivative() {
    let f = parse("sin(x^2)");
    assert!(matches!(
        exact_volume(&f, 0.0, 1.0, "x"),
        Err(RevolutionError::Integration(_))
    ));
    // Simpson does not need an antiderivative
    assert!(approximate_volume(&f, 0.0, 1.0, "x", 10).is_ok());
}

#[test]
fn test_degenerate_and_reversed_intervals() {
    let f = parse("x^2");
    assert_eq!(exact_volume(&f, 1.0, 1.0, "x").unwrap(), 0.0);
    let forward = exact_volume(&f, 0.0, 1.0, "x").unwrap();
    let backward = exact_volume(&f, 1.0, 0.0, "x").unwrap();
    assert_relative_eq!(backward, -forward);
    // π x² is integrated exactly by Simpson's rule
    let simpson_backward = simpson_volume(&parse("x"), 1.0, 0.0, "x", 4).unwrap();
    assert_relative_eq!(simpson_backward, -PI / 3.0, max_relative = 1e-12);
}

#[test]
fn test_functions_of_two_variables_are_rejected() {
    let f = parse("x*y");
    assert!(matches!(
        exact_volume(&f, 0.0, 1.0, "x"),
        Err(RevolutionError::Evaluation(_))
    ));
}

#[test]
fn test_logarithm_about_the_x_axis() {
    let f = parse("ln(x)");
    let ln2 = 2f64.ln();
    // π [x ln²x - 2x ln x + 2x] from 1 to 2
    let expected = PI * (2.0 * ln2 * ln2 - 4.0 * ln2 + 2.0);
    let exact = exact_volume(&f, 1.0, 2.0, "x").unwrap();
    assert_relative_eq!(exact, round_to_significant(expected, 7));
    let approx = approximate_volume(&f, 1.0, 2.0, "x", 1000).unwrap();
    assert_relative_eq!(approx, 0.59162);
}

#[test]
fn test_logarithm_about_a_tilted_line() {
    let f = parse("ln(x)");
    let exact = exact_volume_unrounded(&f, 1.0, 2.0, (1.0, 0.0)).unwrap();
    let simpson = simpson_volume(&f, 1.0, 2.0, (1.0, 0.0), 1000).unwrap();
    assert_relative_eq!(exact, simpson, max_relative = 1e-9);
}
