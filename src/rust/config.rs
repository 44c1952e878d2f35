use crate::ExpertError;

/// Growth limits for the decision tree trained behind each expert.
///
/// The defaults grow the tree until every leaf is pure, matching a plain
/// CART tree with no pruning.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Maximum depth of the tree, `None` for unbounded
    pub max_depth: Option<usize>,
    /// Minimum number of samples a node needs before it is split
    pub min_samples_split: usize,
    /// Minimum number of samples each child of a split must keep
    pub min_samples_leaf: usize,
    /// A split is only kept if it lowers the Gini impurity by at least this much
    pub min_impurity_decrease: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            min_impurity_decrease: 0.0,
        }
    }
}

impl TreeConfig {
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn with_min_impurity_decrease(mut self, min_impurity_decrease: f64) -> Self {
        self.min_impurity_decrease = min_impurity_decrease;
        self
    }

    /// Checks that the limits describe a tree that can be grown.
    pub fn validate(&self) -> Result<(), ExpertError> {
        if self.max_depth == Some(0) {
            return Err(ExpertError::Validation("max_depth must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ExpertError::Validation(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf < 1 {
            return Err(ExpertError::Validation("min_samples_leaf must be at least 1".into()));
        }
        if !self.min_impurity_decrease.is_finite() || self.min_impurity_decrease < 0.0 {
            return Err(ExpertError::Validation(format!(
                "min_impurity_decrease must be a non-negative number, got {}",
                self.min_impurity_decrease
            )));
        }
        Ok(())
    }
}
