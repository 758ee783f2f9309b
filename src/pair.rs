use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Observed location of one point in the reference (key) frame and in the
/// current frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AssociatedPair {
    pub key: na::Point2<f64>,
    pub curr: na::Point2<f64>,
}

impl AssociatedPair {
    #[inline]
    pub fn new(key: na::Point2<f64>, curr: na::Point2<f64>) -> Self {
        Self { key, curr }
    }

    #[inline]
    pub fn from_coords(kx: f64, ky: f64, cx: f64, cy: f64) -> Self {
        Self {
            key: na::Point2::new(kx, ky),
            curr: na::Point2::new(cx, cy),
        }
    }
}
