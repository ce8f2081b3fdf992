use crate::revolution::errors::RevolutionError;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter};

/// Axis of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    /// the x-axis
    XAxis,
    /// the y-axis
    YAxis,
    /// the line y = slope*x + intercept
    Line { slope: f64, intercept: f64 },
}

/// Fieldless mirror of `Axis`, handy for iterating over every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum AxisKind {
    #[strum(to_string = "x")]
    X,
    #[strum(to_string = "y")]
    Y,
    #[strum(to_string = "line")]
    Line,
}

impl Axis {
    pub fn line(slope: f64, intercept: f64) -> Axis {
        Axis::Line { slope, intercept }
    }

    pub fn kind(&self) -> AxisKind {
        match self {
            Axis::XAxis => AxisKind::X,
            Axis::YAxis => AxisKind::Y,
            Axis::Line { .. } => AxisKind::Line,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::XAxis => write!(f, "x-axis"),
            Axis::YAxis => write!(f, "y-axis"),
            Axis::Line { slope, intercept } => write!(f, "line y = {}*x + {}", slope, intercept),
        }
    }
}

/// Accepts `"x"`, `"y"` (any case) or two comma separated numbers `"m, c"`.
impl FromStr for Axis {
    type Err = RevolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "x" => return Ok(Axis::XAxis),
            "y" => return Ok(Axis::YAxis),
            _ => {}
        }
        let inner = trimmed
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);
        let coefficients: Result<Vec<f64>, _> =
            inner.split(',').map(|part| part.trim().parse::<f64>()).collect();
        match coefficients {
            Ok(coefficients) => coefficients.into_axis(),
            Err(_) => Err(RevolutionError::InvalidAxis(s.to_string())),
        }
    }
}

/// Loose axis inputs: `Axis`, `"x"`/`"y"`, `'x'`/`'y'`, tuples and slices of line coefficients.
/// Only the first two coefficients are used.
pub trait IntoAxis {
    fn into_axis(self) -> Result<Axis, RevolutionError>;
}

impl IntoAxis for Axis {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        Ok(self)
    }
}

impl IntoAxis for &str {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        match self.trim().to_lowercase().as_str() {
            "x" => Ok(Axis::XAxis),
            "y" => Ok(Axis::YAxis),
            _ => Err(RevolutionError::InvalidAxis(self.to_string())),
        }
    }
}

impl IntoAxis for String {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        self.as_str().into_axis()
    }
}

impl IntoAxis for char {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        match self.to_ascii_lowercase() {
            'x' => Ok(Axis::XAxis),
            'y' => Ok(Axis::YAxis),
            _ => Err(RevolutionError::InvalidAxis(self.to_string())),
        }
    }
}

impl IntoAxis for (f64, f64) {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        Ok(Axis::line(self.0, self.1))
    }
}

impl IntoAxis for (f64, f64, f64) {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        Ok(Axis::line(self.0, self.1))
    }
}

impl IntoAxis for &[f64] {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        match self {
            [slope, intercept, ..] => Ok(Axis::line(*slope, *intercept)),
            _ => Err(RevolutionError::InvalidAxis(format!("{:?}", self))),
        }
    }
}

impl IntoAxis for Vec<f64> {
    fn into_axis(self) -> Result<Axis, RevolutionError> {
        self.as_slice().into_axis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_strings_and_chars() {
        assert_eq!("x".into_axis().unwrap(), Axis::XAxis);
        assert_eq!(" Y ".into_axis().unwrap(), Axis::YAxis);
        assert_eq!('X'.into_axis().unwrap(), Axis::XAxis);
        assert_eq!(String::from("y").into_axis().unwrap(), Axis::YAxis);
        assert!(matches!("z".into_axis(), Err(RevolutionError::InvalidAxis(_))));
        assert!('q'.into_axis().is_err());
    }

    #[test]
    fn test_tuples_and_slices_use_first_two_components() {
        assert_eq!((1.0, 4.0).into_axis().unwrap(), Axis::line(1.0, 4.0));
        assert_eq!((1.0, 4.0, 9.0).into_axis().unwrap(), Axis::line(1.0, 4.0));
        assert_eq!(vec![2.0, -1.0, 7.0].into_axis().unwrap(), Axis::line(2.0, -1.0));
        let short: &[f64] = &[1.0];
        assert!(short.into_axis().is_err());
        assert!(Vec::<f64>::new().into_axis().is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::XAxis);
        assert_eq!("(1, 4)".parse::<Axis>().unwrap(), Axis::line(1.0, 4.0));
        assert_eq!("0.5,-2".parse::<Axis>().unwrap(), Axis::line(0.5, -2.0));
        assert!("z".parse::<Axis>().is_err());
        assert!("1".parse::<Axis>().is_err());
    }

    #[test]
    fn test_kind_covers_every_mode() {
        let axes = [Axis::XAxis, Axis::YAxis, Axis::line(1.0, 0.0)];
        let kinds: Vec<AxisKind> = AxisKind::iter().collect();
        assert_eq!(kinds, axes.iter().map(|a| a.kind()).collect::<Vec<_>>());
        assert_eq!(AxisKind::Line.to_string(), "line");
    }
}
