//! Outcome alias and the sequencing pipeline.
//!
//! Every multi-step operation (validate → act → respond) is expressed
//! as a [`Pipeline`] over [`Outcome`] values: steps run strictly in
//! order, the first failure short-circuits the rest, and a step that
//! performs an external mutation is unreachable once an earlier step
//! has failed.

use super::error::Error;

/// Two-armed result of a domain operation: a success payload or a
/// structured [`Error`]. Pattern matching gives total, non-panicking
/// inspection of both arms.
pub type Outcome<T> = Result<T, Error>;

/// Wrap a value in the success arm.
pub fn success<T>(value: T) -> Outcome<T> {
    Ok(value)
}

/// Wrap an error in the failure arm.
pub fn failure<T>(error: Error) -> Outcome<T> {
    Err(error)
}

/// Sequencing combinator over [`Outcome`] values.
///
/// `then` applies its step only while the pipeline is still on the
/// success arm; after a failure every later step is skipped and the
/// original failure is carried to [`finish`](Pipeline::finish)
/// unchanged. Composition is associative: regrouping `then` calls
/// cannot change the result.
///
/// # Examples
/// ```
/// use backend::domain::{Error, Pipeline};
///
/// let out = Pipeline::start(2)
///     .then(|n| Ok(n * 10))
///     .then(|n| if n > 30 { Err(Error::invalid_request("too big")) } else { Ok(n) })
///     .finish();
/// assert_eq!(out, Ok(20));
/// ```
#[must_use]
pub struct Pipeline<T>(Outcome<T>);

impl<T> Pipeline<T> {
    /// Begin a pipeline from a plain value.
    pub fn start(value: T) -> Self {
        Self(Ok(value))
    }

    /// Begin a pipeline from an existing outcome, e.g. the result of a
    /// preceding asynchronous port call.
    pub fn start_with(outcome: Outcome<T>) -> Self {
        Self(outcome)
    }

    /// Run the next step if every step so far has succeeded.
    pub fn then<U, F>(self, step: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        Pipeline(self.0.and_then(step))
    }

    /// Unwrap the pipeline into its final outcome.
    pub fn finish(self) -> Outcome<T> {
        self.0
    }
}
