use serde::{Deserialize, Serialize};

/// Default number of results returned by the rule matcher
pub const DEFAULT_TOP_N: usize = 10;

/// Default number of neighbors returned by the neighbor matcher
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Result-size knobs shared by the matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_neighbors() -> usize {
    DEFAULT_NEIGHBORS
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

impl MatcherConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }
}
