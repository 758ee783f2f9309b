use nalgebra as na;

use crate::config::TrackerConfig;
use crate::descriptor::Distance;
use crate::detection::Detection;
use crate::frame::Frame;
use crate::track::{Track, TrackId};
use crate::tracker::{FrameReport, Tracker};
use crate::PointTracking;

/// Detects features in an image and describes them.
///
/// Results of the latest `detect` call are accessed by index, `0..count()`.
pub trait FeatureExtractor {
    type Image: ?Sized;
    type Descriptor: Clone;

    fn detect(&mut self, image: &Self::Image);

    fn count(&self) -> usize;

    fn location(&self, idx: usize) -> na::Point2<f64>;

    fn descriptor(&self, idx: usize) -> &Self::Descriptor;

    /// An empty description of the right shape for this extractor.
    fn new_descriptor(&self) -> Self::Descriptor;
}

/// Tracker for features which are first detected and then associated using
/// their description only. The description must be distinctive enough to
/// associate correctly without any motion model.
pub struct DetectAssociateTracker<E, M, A = ()>
where
    E: FeatureExtractor,
{
    extractor: E,
    tracker: Tracker<E::Descriptor, A, M>,
    frame: Frame<E::Descriptor>,
}

impl<E, M, A> DetectAssociateTracker<E, M, A>
where
    E: FeatureExtractor,
    M: Distance<E::Descriptor>,
    A: Default,
{
    pub fn new(extractor: E, config: TrackerConfig, metric: M) -> Self {
        Self {
            extractor,
            tracker: Tracker::new(config, metric),
            frame: Frame::default(),
        }
    }

    /// Copies the extractor output into the frame buffer, reusing the
    /// descriptor storage of previous frames.
    fn collect_detections(&mut self) {
        let n = self.extractor.count();

        self.frame.detections.truncate(n);
        for (idx, det) in self.frame.detections.iter_mut().enumerate() {
            det.location = self.extractor.location(idx);
            det.descriptor.clone_from(self.extractor.descriptor(idx));
        }

        for idx in self.frame.len()..n {
            let mut descriptor = self.extractor.new_descriptor();
            descriptor.clone_from(self.extractor.descriptor(idx));

            self.frame.push(Detection {
                location: self.extractor.location(idx),
                descriptor,
            });
        }
    }

    pub fn process(&mut self, image: &E::Image) -> FrameReport {
        self.extractor.detect(image);
        self.collect_detections();
        self.tracker.advance(&self.frame)
    }

    pub fn spawn(
        &mut self,
        location: na::Point2<f64>,
        descriptor: E::Descriptor,
        auxiliary: A,
    ) -> TrackId {
        self.tracker.spawn(location, descriptor, auxiliary)
    }

    #[inline]
    pub fn tracker(&self) -> &Tracker<E::Descriptor, A, M> {
        &self.tracker
    }

    #[inline]
    pub fn tracker_mut(&mut self) -> &mut Tracker<E::Descriptor, A, M> {
        &mut self.tracker
    }

    #[inline]
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Detections of the latest processed image.
    #[inline]
    pub fn detections(&self) -> &Frame<E::Descriptor> {
        &self.frame
    }
}

impl<E, M, A> PointTracking for DetectAssociateTracker<E, M, A>
where
    E: FeatureExtractor,
    M: Distance<E::Descriptor>,
    A: Default,
{
    type Image = E::Image;
    type Descriptor = E::Descriptor;
    type Auxiliary = A;

    #[inline]
    fn process(&mut self, image: &Self::Image) -> FrameReport {
        DetectAssociateTracker::process(self, image)
    }

    #[inline]
    fn active_tracks(&self) -> &[Track<E::Descriptor, A>] {
        self.tracker.active_tracks()
    }

    #[inline]
    fn drop_track(&mut self, id: TrackId) -> bool {
        self.tracker.drop_track(id)
    }

    #[inline]
    fn drop_all(&mut self) {
        self.tracker.drop_all()
    }

    #[inline]
    fn reset(&mut self) {
        self.tracker.reset()
    }
}
