use thiserror::Error;

/// Errors of the volume calculators, the task runner and the renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RevolutionError {
    #[error("axis must be x or y or tuple of coefficient of line (slope, intercept), got {0}")]
    InvalidAxis(String),
    #[error("n must be even for Simpson's rule, got n = {0}")]
    OddSubdivisions(usize),
    #[error("n must be a positive even number of subintervals, got n = 0")]
    ZeroSubdivisions,
    #[error("cannot parse function: {0}")]
    Parse(String),
    #[error("symbolic integration failed: {0}")]
    Integration(String),
    #[error("cannot evaluate integrand: {0}")]
    Evaluation(String),
    #[error("invalid task: {0}")]
    Task(String),
    #[error("rendering failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_the_documented_phrases() {
        let axis = RevolutionError::InvalidAxis("z".to_string()).to_string();
        assert!(axis.contains("axis must be x or y or tuple of coefficient of line"));
        assert!(axis.ends_with("got z"));
        let odd = RevolutionError::OddSubdivisions(5).to_string();
        assert!(odd.contains("n must be even"));
        assert!(odd.contains('5'));
    }
}
