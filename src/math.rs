use nalgebra as na;

/// Applies the homography `h` to `p`, including the projective division.
#[inline]
pub fn homography_transfer(h: &na::Matrix3<f64>, p: &na::Point2<f64>) -> na::Point2<f64> {
    let q = h * p.to_homogeneous();

    na::Point2::new(q.x / q.z, q.y / q.z)
}

/// Applies the affine transform `[a11 a12 tx; a21 a22 ty]` to `p`.
#[inline]
pub fn affine_transfer(a: &na::Matrix2x3<f64>, p: &na::Point2<f64>) -> na::Point2<f64> {
    let q = a * p.to_homogeneous();

    na::Point2::new(q.x, q.y)
}
