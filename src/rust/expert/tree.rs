use std::fmt::Debug;

use log::debug;
use ndarray::{ArrayView1, ArrayView2};

use super::error::ExpertError;
use crate::TreeConfig;

/// A supervised classifier over one-hot categorical features.
///
/// Implementations must be deterministic: fitting the same data twice yields
/// a model with the same predictions.
pub trait CategoricalClassifier: Send + Sync + Debug {
    /// Fits the model on `features` (one row per sample) and the parallel `labels`.
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: &[String]) -> Result<(), ExpertError>;

    /// Predicts the label of a single feature vector.
    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<String, ExpertError>;

    /// Distinct labels seen during fitting, sorted.
    fn classes(&self) -> &[String];

    /// Width of the feature vectors the model was fitted on, `None` before fitting.
    fn n_features(&self) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

/// CART decision tree using Gini impurity.
///
/// Features are scanned in schema order and a later split only replaces an
/// earlier one when strictly better, so training is reproducible without a
/// random seed. Leaf ties resolve to the smallest class label.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    classes: Vec<String>,
    nodes: Vec<Node>,
    n_features: Option<usize>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            classes: Vec::new(),
            nodes: Vec::new(),
            n_features: None,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf; a single-leaf tree has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = if self.nodes.is_empty() { vec![] } else { vec![(0, 0)] };
        while let Some((idx, depth)) = pending.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { left, right, .. } => {
                    pending.push((*right, depth + 1));
                    pending.push((*left, depth + 1));
                }
            }
        }
        deepest
    }

    /// Grows the tree from the root with an explicit work list, so very wide
    /// schemas cannot exhaust the call stack.
    fn grow(&mut self, features: &ArrayView2<'_, f64>, targets: &[usize], samples: Vec<usize>) {
        self.nodes.push(Node::Leaf { class: 0 });
        let mut pending = vec![(0usize, samples, 0usize)];

        while let Some((node_idx, samples, depth)) = pending.pop() {
            let counts = self.class_counts(targets, &samples);
            let impurity = gini(&counts, samples.len());
            self.nodes[node_idx] = Node::Leaf { class: majority(&counts) };

            let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
            if impurity == 0.0 || depth_reached || samples.len() < self.config.min_samples_split {
                continue;
            }

            let Some(best) = self.best_split(features, targets, &samples, impurity) else {
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&s| features[[s, best.feature]] <= best.threshold);

            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(Node::Leaf { class: 0 });
            self.nodes.push(Node::Leaf { class: 0 });
            self.nodes[node_idx] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };

            // left subtree is finished first
            pending.push((right, right_samples, depth + 1));
            pending.push((left, left_samples, depth + 1));
        }
    }

    fn best_split(
        &self,
        features: &ArrayView2<'_, f64>,
        targets: &[usize],
        samples: &[usize],
        impurity: f64,
    ) -> Option<SplitCandidate> {
        const EPSILON: f64 = 1e-12;
        let n = samples.len() as f64;
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..features.ncols() {
            let mut values: Vec<f64> = samples.iter().map(|&s| features[[s, feature]]).collect();
            values.sort_by(f64::total_cmp);
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let mut left = vec![0usize; self.classes.len()];
                let mut right = vec![0usize; self.classes.len()];
                for &s in samples {
                    if features[[s, feature]] <= threshold {
                        left[targets[s]] += 1;
                    } else {
                        right[targets[s]] += 1;
                    }
                }

                let n_left: usize = left.iter().sum();
                let n_right: usize = right.iter().sum();
                if n_left < self.config.min_samples_leaf || n_right < self.config.min_samples_leaf {
                    continue;
                }

                let weighted = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n;
                let decrease = impurity - weighted;
                if decrease + EPSILON < self.config.min_impurity_decrease {
                    continue;
                }
                if best.as_ref().map_or(true, |b| decrease > b.decrease + EPSILON) {
                    best = Some(SplitCandidate { feature, threshold, decrease });
                }
            }
        }

        best
    }

    fn class_counts(&self, targets: &[usize], samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.classes.len()];
        for &s in samples {
            counts[targets[s]] += 1;
        }
        counts
    }
}

impl CategoricalClassifier for DecisionTree {
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: &[String]) -> Result<(), ExpertError> {
        self.config.validate()?;
        if features.nrows() == 0 {
            return Err(ExpertError::Training("Cannot fit a tree on zero samples".into()));
        }
        if features.nrows() != labels.len() {
            return Err(ExpertError::Validation(format!(
                "Feature matrix has {} rows but {} labels were given",
                features.nrows(),
                labels.len()
            )));
        }

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        let targets: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        self.classes = classes;
        self.nodes.clear();
        self.n_features = Some(features.ncols());
        self.grow(&features, &targets, (0..labels.len()).collect());

        debug!(
            "Fitted decision tree: {} nodes, {} leaves, depth {}",
            self.nodes.len(),
            self.n_leaves(),
            self.depth()
        );
        Ok(())
    }

    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<String, ExpertError> {
        let expected = self
            .n_features
            .ok_or_else(|| ExpertError::Prediction("Decision tree has not been fitted".into()))?;
        if features.len() != expected {
            return Err(ExpertError::Schema(format!(
                "Feature vector has {} components, model expects {}",
                features.len(),
                expected
            )));
        }

        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { class }) => return Ok(self.classes[*class].clone()),
                Some(Node::Split { feature, threshold, left, right }) => {
                    idx = if features[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ExpertError::Prediction("Decision tree has not been fitted".into()))
                }
            }
        }
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}
