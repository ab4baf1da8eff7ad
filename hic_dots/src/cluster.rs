// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Single-link proximity clustering of accepted pixel calls.
//!
//! Replaces the original BIRCH-based clustering with a union-find over
//! pairwise distances, which satisfies the same contract (§9): any two
//! pixels within `threshold_cluster` of each other end up in the same
//! cluster, directly or via a chain of near neighbours.

use crate::pixel::ClusterRecord;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

pub struct Clusterer {
    threshold: f64,
}

impl Clusterer {
    pub fn new(threshold_cluster: f64) -> Self {
        Clusterer { threshold: threshold_cluster }
    }

    /// Clusters `points` (absolute `(bin1_id, bin2_id)` coordinates),
    /// returning one [`ClusterRecord`] per input point, in input order.
    pub fn cluster(&self, points: &[(usize, usize)]) -> Vec<ClusterRecord> {
        let n = points.len();
        let mut uf = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                let dx = xi as f64 - xj as f64;
                let dy = yi as f64 - yj as f64;
                if (dx * dx + dy * dy).sqrt() <= self.threshold {
                    uf.union(i, j);
                }
            }
        }

        let mut members: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
        for i in 0..n {
            let root = uf.find(i);
            members.entry(root).or_default().push(i);
        }

        let mut roots: Vec<usize> = members.keys().cloned().collect();
        roots.sort();
        let mut label_of_root: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
        for (label, root) in roots.iter().enumerate() {
            label_of_root.insert(*root, label);
        }

        let mut out = vec![
            ClusterRecord { cbin1_id: 0.0, cbin2_id: 0.0, c_label: 0, c_size: 0 };
            n
        ];
        for (&root, idxs) in &members {
            let size = idxs.len();
            let mean1 = idxs.iter().map(|&i| points[i].0 as f64).sum::<f64>() / size as f64;
            let mean2 = idxs.iter().map(|&i| points[i].1 as f64).sum::<f64>() / size as f64;
            let label = label_of_root[&root];
            for &i in idxs {
                out[i] = ClusterRecord { cbin1_id: mean1, cbin2_id: mean2, c_label: label, c_size: size };
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn close_points_share_a_cluster() {
        let clusterer = Clusterer::new(2.0);
        let points = vec![(0, 0), (1, 1), (100, 100)];
        let out = clusterer.cluster(&points);
        assert_eq!(out[0].c_label, out[1].c_label);
        assert_ne!(out[0].c_label, out[2].c_label);
    }

    #[test]
    fn chained_points_merge_transitively() {
        let clusterer = Clusterer::new(1.5);
        // each consecutive pair is within range, but point 0 and point 3 are not directly.
        let points = vec![(0, 0), (1, 0), (2, 0), (3, 0)];
        let out = clusterer.cluster(&points);
        let labels: Vec<usize> = out.iter().map(|r| r.c_label).collect();
        assert!(labels.iter().all(|&l| l == labels[0]));
        assert_eq!(out[0].c_size, 4);
    }

    #[test]
    fn labels_are_dense_from_zero() {
        let clusterer = Clusterer::new(0.5);
        let points = vec![(0, 0), (10, 10), (20, 20)];
        let out = clusterer.cluster(&points);
        let mut labels: Vec<usize> = out.iter().map(|r| r.c_label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn centroid_is_member_mean() {
        let clusterer = Clusterer::new(2.0);
        let points = vec![(0, 0), (2, 0)];
        let out = clusterer.cluster(&points);
        assert_eq!(out[0].cbin1_id, 1.0);
    }
}
