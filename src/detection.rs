use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// One (location, descriptor) observation of the current frame, no identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection<D> {
    pub location: na::Point2<f64>,
    #[serde(rename = "desc")]
    pub descriptor: D,
}

impl<D> Detection<D> {
    #[inline]
    pub fn new(x: f64, y: f64, descriptor: D) -> Self {
        Self {
            location: na::Point2::new(x, y),
            descriptor,
        }
    }

    #[inline(always)]
    pub fn x(&self) -> f64 {
        self.location.x
    }

    #[inline(always)]
    pub fn y(&self) -> f64 {
        self.location.y
    }
}
