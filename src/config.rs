use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Best-distance-first, ties broken by lowest track id then lowest detection index.
    #[default]
    Greedy,
    /// Globally optimal bipartite assignment (Hungarian).
    Optimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssociationConfig {
    pub strategy: Strategy,

    // descriptor distance above which a pair is never associated
    pub max_distance: Option<f64>,

    // search radius around the track's last location, in px
    pub max_radius: Option<f64>,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Greedy,
            max_distance: None,
            max_radius: None,
        }
    }
}

impl AssociationConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = Some(max_radius);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// If true the track description is replaced after every association.
    /// Typically this should be false so the appearance can't drift.
    pub update_description: bool,
    pub association: AssociationConfig,
}

impl TrackerConfig {
    pub fn new(update_description: bool, association: AssociationConfig) -> Self {
        Self {
            update_description,
            association,
        }
    }
}
