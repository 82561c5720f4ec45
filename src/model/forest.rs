//! Random-forest regression: serializable trees with native inference and a
//! CART fitting routine used by the offline training procedure.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One node of a binary regression tree.
///
/// Splits test `x[feature] <= threshold`; matches go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node holding the mean target of its training samples
    Leaf { value: f64 },
    /// Internal split node
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walk the tree for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = features.get(*feature).copied().unwrap_or(0.0);
                if value <= *threshold {
                    left.predict(features)
                } else {
                    right.predict(features)
                }
            }
        }
    }
}

/// Hyperparameters for forest fitting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,
    /// RNG seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 12,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// An ensemble of regression trees; prediction is the mean over trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<TreeNode>,
}

impl RandomForest {
    /// Predict one target value for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Fit a forest on a feature matrix and target vector.
    ///
    /// Each tree is grown on a bootstrap sample (drawn with replacement, same
    /// size as the training set) using greedy variance-reduction splits over
    /// all features.
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &ForestConfig) -> Self {
        debug_assert_eq!(x.len(), y.len());
        if x.is_empty() {
            return Self { trees: Vec::new() };
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = x.len();

        let trees = (0..config.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                grow_tree(x, y, &sample, 0, config)
            })
            .collect();

        Self { trees }
    }
}

fn mean_of(y: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

fn grow_tree(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    depth: usize,
    config: &ForestConfig,
) -> TreeNode {
    if depth >= config.max_depth || indices.len() < 2 * config.min_samples_leaf {
        return TreeNode::Leaf {
            value: mean_of(y, indices),
        };
    }

    match best_split(x, y, indices, config.min_samples_leaf) {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| x[i][feature] <= threshold);

            // Degenerate partition (all samples on one side) terminates.
            if left_idx.is_empty() || right_idx.is_empty() {
                return TreeNode::Leaf {
                    value: mean_of(y, indices),
                };
            }

            TreeNode::Split {
                feature,
                threshold,
                left: Box::new(grow_tree(x, y, &left_idx, depth + 1, config)),
                right: Box::new(grow_tree(x, y, &right_idx, depth + 1, config)),
            }
        }
        None => TreeNode::Leaf {
            value: mean_of(y, indices),
        },
    }
}

/// Find the split minimizing total within-node squared error.
///
/// Scans every feature with a sorted single pass using prefix sums; candidate
/// thresholds are midpoints between adjacent distinct values.
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let n_features = x[indices[0]].len();

    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sumsq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

    let mut best: Option<(f64, usize, f64)> = None; // (sse, feature, threshold)

    for feature in 0..n_features {
        let mut order = indices.to_vec();
        order.sort_by(|&a, &b| {
            x[a][feature]
                .partial_cmp(&x[b][feature])
                .unwrap_or(Ordering::Equal)
        });

        let mut sum_left = 0.0;
        let mut sumsq_left = 0.0;

        for i in 0..n - 1 {
            let yi = y[order[i]];
            sum_left += yi;
            sumsq_left += yi * yi;

            let n_left = i + 1;
            let n_right = n - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let here = x[order[i]][feature];
            let next = x[order[i + 1]][feature];
            if next <= here {
                continue; // cannot split between equal values
            }

            let sum_right = total_sum - sum_left;
            let sumsq_right = total_sumsq - sumsq_left;
            let sse = (sumsq_left - sum_left * sum_left / n_left as f64)
                + (sumsq_right - sum_right * sum_right / n_right as f64);

            if best.map_or(true, |(b, _, _)| sse < b) {
                best = Some((sse, feature, (here + next) / 2.0));
            }
        }
    }

    best.map(|(_, feature, threshold)| (feature, threshold))
}
