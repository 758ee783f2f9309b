use munkres::{solve_assignment, WeightMatrix};
use nalgebra as na;
use tracing::{trace, warn};

use crate::config::{AssociationConfig, Strategy};
use crate::descriptor::Distance;
use crate::detection::Detection;
use crate::error::{Error, Result};
use crate::track::{Track, TrackId};

pub const MAX_OPTIMAL_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub track: usize,
    pub detection: usize,
    pub distance: f64,
}

/// Result of associating one frame. Indexes refer to the slices handed to
/// [`Associator::associate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matching {
    pub pairs: Vec<Match>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl Matching {
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn from_pairs(mut pairs: Vec<Match>, tracks: usize, dets: usize) -> Self {
        pairs.sort_by_key(|m| m.track);

        let mut track_taken = vec![false; tracks];
        let mut det_taken = vec![false; dets];
        for m in &pairs {
            track_taken[m.track] = true;
            det_taken[m.detection] = true;
        }

        Self {
            pairs,
            unmatched_tracks: (0..tracks).filter(|&i| !track_taken[i]).collect(),
            unmatched_detections: (0..dets).filter(|&i| !det_taken[i]).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    id: TrackId,
    track: usize,
    detection: usize,
}

/// Matches active track descriptions against the detections of a frame.
#[derive(Debug, Clone)]
pub struct Associator<M> {
    pub config: AssociationConfig,
    metric: M,
}

impl<M> Associator<M> {
    pub fn new(config: AssociationConfig, metric: M) -> Self {
        Self { config, metric }
    }

    #[inline]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    #[inline]
    fn in_radius(&self, from: &na::Point2<f64>, to: &na::Point2<f64>) -> bool {
        match self.config.max_radius {
            Some(r) => na::distance_squared(from, to) <= r * r,
            None => true,
        }
    }

    #[inline]
    fn acceptable(&self, distance: f64) -> bool {
        match self.config.max_distance {
            Some(max) => distance <= max,
            None => distance.is_finite(),
        }
    }

    pub fn associate<D, A>(&self, tracks: &[Track<D, A>], dets: &[Detection<D>]) -> Matching
    where
        M: Distance<D>,
    {
        if tracks.is_empty() || dets.is_empty() {
            return Matching::from_pairs(Vec::new(), tracks.len(), dets.len());
        }

        let candidates = self.candidates(tracks, dets);

        let pairs = match self.config.strategy {
            Strategy::Greedy => greedy(candidates, tracks.len(), dets.len()),
            Strategy::Optimal => match optimal(&candidates, tracks.len(), dets.len()) {
                Ok(pairs) => pairs,
                Err(err) => {
                    warn!("optimal association failed ({}), falling back to greedy", err);
                    greedy(candidates, tracks.len(), dets.len())
                }
            },
        };

        Matching::from_pairs(pairs, tracks.len(), dets.len())
    }

    fn candidates<D, A>(&self, tracks: &[Track<D, A>], dets: &[Detection<D>]) -> Vec<Candidate>
    where
        M: Distance<D>,
    {
        let mut candidates = Vec::new();

        for (ti, track) in tracks.iter().enumerate() {
            for (di, det) in dets.iter().enumerate() {
                if !self.in_radius(&track.location, &det.location) {
                    continue;
                }

                let distance = self.metric.distance(&track.descriptor, &det.descriptor);
                if !self.acceptable(distance) {
                    continue;
                }

                candidates.push(Candidate {
                    distance,
                    id: track.id,
                    track: ti,
                    detection: di,
                });
            }
        }

        trace!(
            "{} candidates for {} tracks and {} detections",
            candidates.len(),
            tracks.len(),
            dets.len()
        );

        candidates
    }
}

fn greedy(mut candidates: Vec<Candidate>, tracks: usize, dets: usize) -> Vec<Match> {
    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.id.cmp(&b.id))
            .then(a.detection.cmp(&b.detection))
    });

    let mut track_taken = vec![false; tracks];
    let mut det_taken = vec![false; dets];
    let mut pairs = Vec::new();

    for c in candidates {
        if track_taken[c.track] || det_taken[c.detection] {
            continue;
        }

        track_taken[c.track] = true;
        det_taken[c.detection] = true;
        pairs.push(Match {
            track: c.track,
            detection: c.detection,
            distance: c.distance,
        });
    }

    pairs
}

/// Weights of the padded square problem, with some rows pinned to a column
/// (or to no column at all).
struct CostMatrix {
    n: usize,
    tracks: usize,
    dets: usize,
    allowed: Vec<Option<f64>>,
    forbidden: f64,
    heavy: f64,
}

impl CostMatrix {
    fn new(candidates: &[Candidate], tracks: usize, dets: usize) -> Self {
        let n = tracks.max(dets);

        let mut allowed = vec![None; n * n];
        let mut max_distance = 0.0f64;
        for c in candidates {
            allowed[c.track * n + c.detection] = Some(c.distance);
            max_distance = max_distance.max(c.distance);
        }

        // heavier than any complete assignment made of candidates only
        let forbidden = (max_distance + 1.0) * (n as f64 + 1.0);

        Self {
            n,
            tracks,
            dets,
            allowed,
            forbidden,
            heavy: forbidden * (n as f64 + 1.0),
        }
    }

    #[inline]
    fn allowed(&self, r: usize, c: usize) -> Option<f64> {
        self.allowed[r * self.n + c]
    }

    /// Solves with `pinned[r] = Some(Some(c))` forcing track `r` onto
    /// detection `c` and `Some(None)` forcing it to stay unmatched. Returns
    /// the detection of every track.
    fn solve(&self, pinned: &[Option<Option<usize>>]) -> Result<Vec<Option<usize>>> {
        let n = self.n;

        let mut owner = vec![None; n];
        for (r, pin) in pinned.iter().enumerate() {
            if let Some(Some(c)) = pin {
                owner[*c] = Some(r);
            }
        }

        let mut mat = WeightMatrix::from_fn(n, |(r, c)| {
            let pin = pinned.get(r).copied().flatten();
            let weight = self.allowed(r, c);

            match (pin, weight) {
                (Some(Some(pc)), _) if pc != c => self.heavy,
                (Some(None), Some(_)) => self.heavy,
                _ if owner[c].map_or(false, |o| o != r) => self.heavy,
                (_, Some(w)) => w,
                (_, None) => self.forbidden,
            }
        });

        let solution =
            solve_assignment(&mut mat).map_err(|err| Error::Assignment(format!("{:?}", err)))?;

        let mut rows = vec![None; self.tracks];
        for pos in solution {
            if pos.row < self.tracks
                && pos.column < self.dets
                && self.allowed(pos.row, pos.column).is_some()
            {
                rows[pos.row] = Some(pos.column);
            }
        }

        Ok(rows)
    }

    /// Number of matches and their total distance, summed in track order.
    fn score(&self, rows: &[Option<usize>]) -> (usize, f64) {
        rows.iter()
            .enumerate()
            .filter_map(|(r, c)| c.and_then(|c| self.allowed(r, c)))
            .fold((0, 0.0), |(k, sum), d| (k + 1, sum + d))
    }

    #[inline]
    fn same_score(a: (usize, f64), b: (usize, f64)) -> bool {
        a.0 == b.0 && (a.1 - b.1).abs() <= 1e-9 * b.1.abs().max(1.0)
    }
}

/// Maximum-cardinality minimum-distance assignment. Among equally good
/// assignments the lowest track takes the lowest detection index it can
/// without raising the cost, then the next track, and so on.
fn optimal(candidates: &[Candidate], tracks: usize, dets: usize) -> Result<Vec<Match>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let n = tracks.max(dets);
    if n > MAX_OPTIMAL_SIZE {
        return Err(Error::AssignmentTooLarge {
            size: n,
            max: MAX_OPTIMAL_SIZE,
        });
    }

    let costs = CostMatrix::new(candidates, tracks, dets);
    let mut pinned = vec![None; tracks];
    let mut best = costs.solve(&pinned)?;
    let target = costs.score(&best);

    for r in 0..tracks {
        let current = best[r];

        for c in 0..current.unwrap_or(dets) {
            if costs.allowed(r, c).is_none() || best[..r].contains(&Some(c)) {
                continue;
            }

            pinned[r] = Some(Some(c));
            let trial = costs.solve(&pinned)?;
            if CostMatrix::same_score(costs.score(&trial), target) {
                best = trial;
                break;
            }
        }

        pinned[r] = Some(best[r]);
    }

    Ok(best
        .iter()
        .enumerate()
        .filter_map(|(r, c)| {
            let c = (*c)?;
            Some(Match {
                track: r,
                detection: c,
                distance: costs.allowed(r, c)?,
            })
        })
        .collect())
}
