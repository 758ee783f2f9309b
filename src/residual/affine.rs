use nalgebra as na;

use super::{prepare, ResidualModel};
use crate::error::Result;
use crate::math::affine_transfer;
use crate::pair::AssociatedPair;

/// Transfer error of a 2D affine model.
///
/// Parameters are `[a11, a12, tx, a21, a22, ty]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffineTransfer<'a> {
    obs: Option<&'a [AssociatedPair]>,
}

impl<'a> AffineTransfer<'a> {
    pub fn new() -> Self {
        Self { obs: None }
    }

    pub fn with_observations(obs: &'a [AssociatedPair]) -> Self {
        Self { obs: Some(obs) }
    }
}

impl<'a> ResidualModel<'a> for AffineTransfer<'a> {
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
        6
    }

    fn process(&self, params: &[f64], output: &mut [f64]) -> Result<()> {
        let obs = prepare(self, params, output)?;
        let a = na::Matrix2x3::from_row_slice(params);

        for (p, out) in obs.iter().zip(output.chunks_exact_mut(2)) {
            let t = affine_transfer(&a, &p.key);

            out[0] = t.x - p.curr.x;
            out[1] = t.y - p.curr.y;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_fits_exactly() {
        let (s, c) = 0.3f64.sin_cos();
        let obs: Vec<_> = [(1.0, 0.0), (0.0, 2.0), (-3.0, 1.0)]
            .iter()
            .map(|&(x, y)| {
                AssociatedPair::from_coords(x, y, c * x - s * y + 1.0, s * x + c * y - 1.0)
            })
            .collect();

        let mut model = AffineTransfer::new();
        model.set_observations(&obs);
        assert_eq!(model.min_observations(), 3);

        let mut out = vec![f64::NAN; model.residual_count()];
        model.process(&[c, -s, 1.0, s, c, -1.0], &mut out).unwrap();

        for r in out {
            assert_relative_eq!(r, 0.0, epsilon = 1e-12);
        }
    }
}
