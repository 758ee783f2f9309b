//! Detect/associate point feature tracking and geometric residual models for
//! visual odometry front ends.
//!
//! A [`Tracker`] keeps the set of active [`Track`]s. Every frame the
//! detections are associated with the active tracks by descriptor distance.
//! Matched tracks move, unmatched tracks are dropped and unmatched detections
//! spawn new tracks. The `(previous, current)` locations of re-associated
//! tracks are the [`AssociatedPair`]s that a [`residual::ResidualModel`] scores
//! model hypotheses against.

pub mod association;
pub mod config;
pub mod descriptor;
pub mod detection;
pub mod error;
pub mod extractor;
pub mod frame;
pub mod math;
pub mod pair;
pub mod residual;
pub mod track;
pub mod tracker;

pub use association::{Associator, Match, Matching};
pub use config::{AssociationConfig, Strategy, TrackerConfig};
pub use descriptor::{Distance, Hamming, Sad, SquaredEuclidean, TupleDesc};
pub use detection::Detection;
pub use error::{Error, Result};
pub use extractor::{DetectAssociateTracker, FeatureExtractor};
pub use frame::Frame;
pub use pair::AssociatedPair;
pub use residual::{AffineTransfer, HomographyTransfer, ResidualModel};
pub use track::{Track, TrackId, TrackState};
pub use tracker::{FrameReport, FrameStatus, Tracker};

use std::fmt;

/// Element type of float descriptors.
pub trait Float: num_traits::Float + Copy + fmt::Debug + PartialEq + 'static {}

impl<T> Float for T where T: num_traits::Float + Copy + fmt::Debug + PartialEq + 'static {}

/// Frame-by-frame point tracker driven by images.
pub trait PointTracking {
    type Image: ?Sized;
    type Descriptor;
    type Auxiliary;

    fn process(&mut self, image: &Self::Image) -> FrameReport;
    fn active_tracks(&self) -> &[Track<Self::Descriptor, Self::Auxiliary>];
    fn drop_track(&mut self, id: TrackId) -> bool;
    fn drop_all(&mut self);
    fn reset(&mut self);
}
