use crate::detection::Detection;

/// Detections of a single image; the position in `detections` is the
/// detection index reported by association.
#[derive(Debug, Clone)]
pub struct Frame<D> {
    pub detections: Vec<Detection<D>>,
}

impl<D> Frame<D> {
    #[inline]
    pub fn new(detections: Vec<Detection<D>>) -> Self {
        Self { detections }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    #[inline]
    pub fn push(&mut self, det: Detection<D>) {
        self.detections.push(det)
    }
}

impl<D> Default for Frame<D> {
    fn default() -> Self {
        Self {
            detections: Vec::new(),
        }
    }
}

impl<D> From<Vec<Detection<D>>> for Frame<D> {
    #[inline]
    fn from(detections: Vec<Detection<D>>) -> Self {
        Self { detections }
    }
}

impl<D> std::ops::Index<usize> for Frame<D> {
    type Output = Detection<D>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.detections[index]
    }
}
