use nalgebra as na;

use super::{prepare, ResidualModel};
use crate::error::Result;
use crate::math::homography_transfer;
use crate::pair::AssociatedPair;

/// Difference between the key point transferred by a homography and its
/// observed location in the current frame. Cheap to compute, though less
/// theoretically sound than a symmetric or reprojection error.
///
/// Parameters are the 9 elements of `H`, row-major.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomographyTransfer<'a> {
    obs: Option<&'a [AssociatedPair]>,
}

impl<'a> HomographyTransfer<'a> {
    pub fn new() -> Self {
        Self { obs: None }
    }

    pub fn with_observations(obs: &'a [AssociatedPair]) -> Self {
        Self { obs: Some(obs) }
    }
}

impl<'a> ResidualModel<'a> for HomographyTransfer<'a> {
    #[inline]
    fn set_observations(&mut self, obs: &'a [AssociatedPair]) {
        self.obs = Some(obs);
    }

    #[inline]
    fn observations(&self) -> Option<&'a [AssociatedPair]> {
        self.obs
    }

    #[inline]
    fn parameter_count(&self) -> usize {
        9
    }

    fn process(&self, params: &[f64], output: &mut [f64]) -> Result<()> {
        let obs = prepare(self, params, output)?;
        let h = na::Matrix3::from_row_slice(params);

        for (p, out) in obs.iter().zip(output.chunks_exact_mut(2)) {
            let t = homography_transfer(&h, &p.key);

            out[0] = t.x - p.curr.x;
            out[1] = t.y - p.curr.y;
        }

        Ok(())
    }
}
