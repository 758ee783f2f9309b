use nalgebra as na;
use tracing::{debug, trace};

use crate::association::Associator;
use crate::config::TrackerConfig;
use crate::descriptor::Distance;
use crate::detection::Detection;
use crate::frame::Frame;
use crate::pair::AssociatedPair;
use crate::track::{Track, TrackId, TrackState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Tracked,
    /// The frame had no detections, every active track was dropped.
    NoDetections,
    /// There was nothing to associate against, every detection spawned a track.
    NoActiveTracks,
}

/// Summary of the transitions applied by one [`Tracker::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub matched: usize,
    pub dropped: usize,
    pub spawned: usize,
    pub status: FrameStatus,
}

#[derive(Debug, Clone, Default)]
struct SeqId {
    next: u64,
}

impl SeqId {
    #[inline]
    fn fetch_add(&mut self) -> TrackId {
        let id = TrackId(self.next);
        self.next += 1;
        id
    }
}

/// Owns the set of tracks and moves them through their lifecycle.
///
/// Active tracks are kept in creation order, which is also ascending
/// identifier order.
#[derive(Debug, Clone)]
pub struct Tracker<D, A, M> {
    update_description: bool,
    associator: Associator<M>,
    seq: SeqId,
    frame_id: u64,
    active: Vec<Track<D, A>>,
    dropped: Vec<Track<D, A>>,
    spawned: Vec<TrackId>,
}

impl<D, A, M> Tracker<D, A, M>
where
    D: Clone,
    M: Distance<D>,
{
    pub fn new(config: TrackerConfig, metric: M) -> Self {
        Self {
            update_description: config.update_description,
            associator: Associator::new(config.association, metric),
            seq: SeqId::default(),
            frame_id: 0,
            active: Vec::with_capacity(64),
            dropped: Vec::new(),
            spawned: Vec::new(),
        }
    }

    /// Associates `frame` against the active tracks and applies the result:
    /// matched tracks are updated, unmatched ones dropped and every unmatched
    /// detection spawns a new track with a default auxiliary value.
    pub fn advance(&mut self, frame: &Frame<D>) -> FrameReport
    where
        A: Default,
    {
        self.advance_with(frame, |_| A::default())
    }

    /// Same as [`Tracker::advance`] with the auxiliary value of each spawned
    /// track provided by `aux`.
    pub fn advance_with<F>(&mut self, frame: &Frame<D>, mut aux: F) -> FrameReport
    where
        F: FnMut(&Detection<D>) -> A,
    {
        self.frame_id += 1;
        self.dropped.clear();
        self.spawned.clear();

        let status = if frame.is_empty() {
            FrameStatus::NoDetections
        } else if self.active.is_empty() {
            FrameStatus::NoActiveTracks
        } else {
            FrameStatus::Tracked
        };

        let matching = self.associator.associate(&self.active, &frame.detections);

        for m in &matching.pairs {
            let det = &frame[m.detection];
            let track = &mut self.active[m.track];

            track.prev_location = track.location;
            track.location = det.location;
            track.last_seen_frame = self.frame_id;

            if self.update_description {
                track.descriptor.clone_from(&det.descriptor);
            }

            trace!(
                "{} associated with detection {} (distance {})",
                track.id,
                m.detection,
                m.distance
            );
        }

        if !matching.unmatched_tracks.is_empty() {
            let mut unmatched = matching.unmatched_tracks.iter().peekable();
            let active = std::mem::take(&mut self.active);

            for (idx, mut track) in active.into_iter().enumerate() {
                if unmatched.peek() == Some(&&idx) {
                    unmatched.next();
                    trace!("{} dropped", track.id);
                    track.state = TrackState::Dropped;
                    self.dropped.push(track);
                } else {
                    self.active.push(track);
                }
            }
        }

        for &j in &matching.unmatched_detections {
            let det = &frame[j];
            let auxiliary = aux(det);
            self.push_track(det.location, det.descriptor.clone(), auxiliary);
        }

        let report = FrameReport {
            frame: self.frame_id,
            matched: matching.pairs.len(),
            dropped: self.dropped.len(),
            spawned: self.spawned.len(),
            status,
        };

        debug!(
            "frame {}: {} detections, {} matched, {} dropped, {} spawned, {} active",
            report.frame,
            frame.len(),
            report.matched,
            report.dropped,
            report.spawned,
            self.active.len()
        );

        report
    }

    /// Manually creates a track outside of the normal detection flow.
    pub fn spawn(&mut self, location: na::Point2<f64>, descriptor: D, auxiliary: A) -> TrackId {
        self.push_track(location, descriptor, auxiliary)
    }

    fn push_track(&mut self, location: na::Point2<f64>, descriptor: D, auxiliary: A) -> TrackId {
        let id = self.seq.fetch_add();
        trace!("{} spawned at ({}, {})", id, location.x, location.y);

        self.active
            .push(Track::new(id, self.frame_id, location, descriptor, auxiliary));
        self.spawned.push(id);

        id
    }
}

impl<D, A, M> Tracker<D, A, M> {
    #[inline]
    fn position(&self, id: TrackId) -> Option<usize> {
        self.active.binary_search_by_key(&id, |t| t.id).ok()
    }

    /// Removes an active track. Returns `false` and does nothing if `id` isn't
    /// active.
    pub fn drop_track(&mut self, id: TrackId) -> bool {
        match self.position(id) {
            Some(idx) => {
                let mut track = self.active.remove(idx);
                track.state = TrackState::Dropped;
                self.dropped.push(track);
                true
            }
            None => false,
        }
    }

    pub fn drop_all(&mut self) {
        for mut track in self.active.drain(..) {
            track.state = TrackState::Dropped;
            self.dropped.push(track);
        }
    }

    /// Forgets every track. Identifiers keep counting from where they were.
    pub fn reset(&mut self) {
        self.active.clear();
        self.dropped.clear();
        self.spawned.clear();
    }

    #[inline]
    pub fn active_tracks(&self) -> &[Track<D, A>] {
        &self.active
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[inline]
    pub fn track(&self, id: TrackId) -> Option<&Track<D, A>> {
        self.position(id).map(|idx| &self.active[idx])
    }

    #[inline]
    pub fn is_active(&self, id: TrackId) -> bool {
        self.position(id).is_some()
    }

    #[inline]
    pub fn auxiliary(&self, id: TrackId) -> Option<&A> {
        self.track(id).map(|t| &t.auxiliary)
    }

    #[inline]
    pub fn auxiliary_mut(&mut self, id: TrackId) -> Option<&mut A> {
        let idx = self.position(id)?;
        Some(&mut self.active[idx].auxiliary)
    }

    /// Tracks dropped by the latest frame and by manual drops since.
    #[inline]
    pub fn dropped_tracks(&self) -> &[Track<D, A>] {
        &self.dropped
    }

    /// Tracks spawned by the latest frame and by manual spawns since, which
    /// are still active.
    pub fn new_tracks(&self) -> impl Iterator<Item = &Track<D, A>> + '_ {
        self.spawned.iter().filter_map(move |&id| self.track(id))
    }

    /// Active tracks which were re-associated in the latest frame.
    pub fn matched_tracks(&self) -> impl Iterator<Item = &Track<D, A>> + '_ {
        let frame = self.frame_id;
        self.active
            .iter()
            .filter(move |t| t.last_seen_frame == frame && t.spawned_frame < frame)
    }

    /// `(previous, current)` location of every track re-associated in the
    /// latest frame, in track order.
    pub fn correspondences(&self) -> Vec<AssociatedPair> {
        let mut out = Vec::with_capacity(self.active.len());
        self.correspondences_into(&mut out);
        out
    }

    pub fn correspondences_into(&self, out: &mut Vec<AssociatedPair>) {
        out.clear();
        out.extend(self.matched_tracks().map(Track::pair));
    }

    #[inline]
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Identifier the next spawned track will get.
    #[inline]
    pub fn next_id(&self) -> TrackId {
        TrackId(self.seq.next)
    }

    #[inline]
    pub fn update_description(&self) -> bool {
        self.update_description
    }

    #[inline]
    pub fn associator(&self) -> &Associator<M> {
        &self.associator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssociationConfig, TrackerConfig};
    use crate::descriptor::{SquaredEuclidean, TupleDesc};

    type Desc = TupleDesc<f64>;

    fn det(x: f64, y: f64, d: &[f64]) -> Detection<Desc> {
        Detection::new(x, y, TupleDesc::from(d.to_vec()))
    }

    fn tracker(update_description: bool) -> Tracker<Desc, (), SquaredEuclidean> {
        let assoc = AssociationConfig::default()
            .with_max_radius(10.0)
            .with_max_distance(1.0);
        Tracker::new(TrackerConfig::new(update_description, assoc), SquaredEuclidean)
    }

    #[test]
    fn first_frame_spawns_everything() {
        let mut t = tracker(false);
        let r = t.advance(&Frame::new(vec![
            det(0.0, 0.0, &[0.0]),
            det(50.0, 0.0, &[5.0]),
        ]));

        assert_eq!(r.status, FrameStatus::NoActiveTracks);
        assert_eq!(r.spawned, 2);
        assert_eq!(t.new_tracks().count(), 2);
        assert!(t.correspondences().is_empty());
    }

    #[test]
    fn prev_location_follows_updates() {
        let mut t = tracker(false);
        t.advance(&Frame::new(vec![det(0.0, 0.0, &[0.0])]));
        t.advance(&Frame::new(vec![det(2.0, 1.0, &[0.1])]));

        let track = &t.active_tracks()[0];
        assert_eq!(track.prev_location, na::Point2::new(0.0, 0.0));
        assert_eq!(track.location, na::Point2::new(2.0, 1.0));
        assert_eq!(track.age(), 1);
        assert_eq!(
            t.correspondences(),
            vec![AssociatedPair::from_coords(0.0, 0.0, 2.0, 1.0)]
        );
    }

    #[test]
    fn descriptor_is_frozen_unless_updating() {
        for update in [false, true] {
            let mut t = tracker(update);
            t.advance(&Frame::new(vec![det(0.0, 0.0, &[0.0, 0.0])]));
            for i in 1..=5 {
                let v = i as f64 * 0.1;
                t.advance(&Frame::new(vec![det(v, 0.0, &[v, v])]));
            }

            let track = &t.active_tracks()[0];
            assert_eq!(track.id, TrackId(0));
            if update {
                assert_eq!(track.descriptor.as_slice(), &[0.5, 0.5]);
            } else {
                assert_eq!(track.descriptor.as_slice(), &[0.0, 0.0]);
            }
        }
    }

    #[test]
    fn empty_frame_drops_all() {
        let mut t = tracker(false);
        t.advance(&Frame::new(vec![det(0.0, 0.0, &[0.0])]));
        let r = t.advance(&Frame::new(vec![]));

        assert_eq!(r.status, FrameStatus::NoDetections);
        assert_eq!(r.dropped, 1);
        assert!(t.is_empty());
        assert_eq!(t.dropped_tracks()[0].state, TrackState::Dropped);
    }

    #[test]
    fn manual_drop_is_idempotent() {
        let mut t = tracker(false);
        let a = t.spawn(na::Point2::new(1.0, 1.0), TupleDesc::from(vec![0.0]), ());
        let b = t.spawn(na::Point2::new(9.0, 9.0), TupleDesc::from(vec![0.0]), ());

        assert!(t.drop_track(a));
        assert!(!t.drop_track(a));
        assert!(!t.drop_track(TrackId(42)));
        assert!(t.is_active(b));
        assert_eq!(t.len(), 1);
        assert_eq!(t.dropped_tracks().len(), 1);
    }

    #[test]
    fn reset_keeps_counting() {
        let mut t = tracker(false);
        t.spawn(na::Point2::new(1.0, 1.0), TupleDesc::from(vec![0.0]), ());
        t.spawn(na::Point2::new(2.0, 1.0), TupleDesc::from(vec![0.0]), ());
        t.reset();

        assert!(t.is_empty());
        assert_eq!(t.next_id(), TrackId(2));
        let id = t.spawn(na::Point2::new(1.0, 1.0), TupleDesc::from(vec![0.0]), ());
        assert_eq!(id, TrackId(2));
    }

    #[test]
    fn auxiliary_is_kept_verbatim() {
        let assoc = AssociationConfig::default().with_max_radius(10.0);
        let mut t: Tracker<Desc, Option<String>, _> =
            Tracker::new(TrackerConfig::new(false, assoc), SquaredEuclidean);

        t.advance_with(&Frame::new(vec![det(0.0, 0.0, &[0.0])]), |d| {
            Some(format!("{}", d.x()))
        });
        let id = t.active_tracks()[0].id;
        *t.auxiliary_mut(id).unwrap() = Some("mine".to_string());

        t.advance(&Frame::new(vec![det(1.0, 0.0, &[0.0])]));
        assert_eq!(t.auxiliary(id), Some(&Some("mine".to_string())));
    }
}
