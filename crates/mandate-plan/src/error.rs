use thiserror::Error;

/// Errors raised while configuring a planner.
///
/// Planning itself is infallible: elements that cannot be evaluated in
/// the requested scope surface as filtering data on the plan, never as
/// errors. Failures inside injected collaborators propagate to the
/// caller untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("rule validator is required")]
    MissingRuleValidator,

    #[error("scope must not be empty")]
    EmptyScope,
}

pub type PlanResult<T> = Result<T, PlanError>;
