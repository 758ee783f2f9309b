use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

use crate::pair::AssociatedPair;

/// Permanent track identifier. Issued in increasing order, never reused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Active,
    Dropped,
}

#[derive(Debug, Clone)]
pub struct Track<D, A = ()> {
    pub id: TrackId,
    pub state: TrackState,

    // in px
    pub location: na::Point2<f64>,

    // location before the latest association, equals `location` right after spawn
    pub prev_location: na::Point2<f64>,

    pub descriptor: D,
    pub auxiliary: A,

    pub spawned_frame: u64,
    pub last_seen_frame: u64,
}

impl<D, A> Track<D, A> {
    pub(crate) fn new(
        id: TrackId,
        frame: u64,
        location: na::Point2<f64>,
        descriptor: D,
        auxiliary: A,
    ) -> Self {
        Self {
            id,
            state: TrackState::Active,
            location,
            prev_location: location,
            descriptor,
            auxiliary,
            spawned_frame: frame,
            last_seen_frame: frame,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == TrackState::Active
    }

    /// Frames elapsed between spawn and the latest association.
    #[inline]
    pub fn age(&self) -> u64 {
        self.last_seen_frame - self.spawned_frame
    }

    #[inline]
    pub fn pair(&self) -> AssociatedPair {
        AssociatedPair::new(self.prev_location, self.location)
    }
}
