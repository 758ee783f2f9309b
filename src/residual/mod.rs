//! Residual functions over a bound list of point correspondences, used by
//! nonlinear optimizers and consensus scoring to measure how well a model
//! explains the observations.

mod affine;
mod homography;

pub use affine::AffineTransfer;
pub use homography::HomographyTransfer;

use crate::error::{Error, Result};
use crate::pair::AssociatedPair;

/// Geometric model residuals.
///
/// `process` takes `&self` and never allocates: it is called thousands of
/// times per frame, possibly from several threads against the same
/// observations.
pub trait ResidualModel<'a> {
    /// Binds the observations used by subsequent `process` calls.
    fn set_observations(&mut self, obs: &'a [AssociatedPair]);

    fn observations(&self) -> Option<&'a [AssociatedPair]>;

    /// Number of model parameters.
    fn parameter_count(&self) -> usize;

    /// Two residuals per bound observation, zero when nothing is bound.
    #[inline]
    fn residual_count(&self) -> usize {
        self.observations().map_or(0, |obs| obs.len() * 2)
    }

    /// Fewest observations `process` accepts.
    #[inline]
    fn min_observations(&self) -> usize {
        self.parameter_count() / 2
    }

    /// Writes `(model(key) - curr)` for every observation, x then y, in
    /// observation order.
    ///
    /// # Panics
    ///
    /// If no observations were bound or `output.len() != residual_count()`.
    fn process(&self, params: &[f64], output: &mut [f64]) -> Result<()>;
}

/// Checks the call contract shared by every model and returns the bound
/// observations.
pub(crate) fn prepare<'a, R>(model: &R, params: &[f64], output: &[f64]) -> Result<&'a [AssociatedPair]>
where
    R: ResidualModel<'a> + ?Sized,
{
    let obs = match model.observations() {
        Some(obs) => obs,
        None => panic!("residuals processed before observations were set"),
    };

    assert_eq!(
        output.len(),
        obs.len() * 2,
        "residual buffer has the wrong size"
    );

    if params.len() != model.parameter_count() {
        return Err(Error::ParameterCount {
            expected: model.parameter_count(),
            actual: params.len(),
        });
    }

    if obs.len() < model.min_observations() {
        return Err(Error::InsufficientObservations {
            required: model.min_observations(),
            actual: obs.len(),
        });
    }

    Ok(obs)
}
