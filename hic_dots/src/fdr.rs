// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Benjamini-Hochberg false discovery rate control.

/// Result of [`benjamini_hochberg`].
pub struct BenjaminiHochberg {
    /// `reject[i]` is true iff `p_values[i]` is accepted, in the original
    /// index order.
    pub reject: Vec<bool>,
    /// Largest accepted p-value, if any pixel was accepted.
    pub p_max_reject: Option<f64>,
    /// Smallest rejected p-value, if any pixel was rejected.
    pub p_min_accept: Option<f64>,
}

/// Runs the Benjamini-Hochberg procedure at rate `alpha` over `p_values`.
/// Non-finite p-values are treated as `1.0` (never accepted).
pub fn benjamini_hochberg(p_values: &[f64], alpha: f64) -> BenjaminiHochberg {
    let n = p_values.len();
    if n == 0 {
        return BenjaminiHochberg { reject: Vec::new(), p_max_reject: None, p_min_accept: None };
    }

    let cleaned: Vec<f64> = p_values.iter().map(|&p| if p.is_finite() { p } else { 1.0 }).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| cleaned[a].partial_cmp(&cleaned[b]).unwrap());

    let mut accepted_rank = vec![false; n];
    for (rank, &idx) in order.iter().enumerate() {
        let k = (rank + 1) as f64;
        accepted_rank[rank] = cleaned[idx] <= alpha * k / n as f64;
    }

    let mut reject = vec![false; n];
    let mut p_max_reject = None;
    let mut p_min_accept = None;
    for (rank, &idx) in order.iter().enumerate() {
        reject[idx] = accepted_rank[rank];
        if accepted_rank[rank] {
            p_max_reject = Some(p_max_reject.map_or(cleaned[idx], |m: f64| m.max(cleaned[idx])));
        } else {
            p_min_accept = Some(p_min_accept.map_or(cleaned[idx], |m: f64| m.min(cleaned[idx])));
        }
    }

    BenjaminiHochberg { reject, p_max_reject, p_min_accept }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_input_has_no_reject() {
        let result = benjamini_hochberg(&[], 0.1);
        assert!(result.reject.is_empty());
        assert!(result.p_max_reject.is_none());
        assert!(result.p_min_accept.is_none());
    }

    #[test]
    fn rejects_small_p_values() {
        let result = benjamini_hochberg(&[0.001, 0.5, 0.8, 0.9], 0.1);
        assert!(result.reject[0]);
        assert!(!result.reject[2]);
    }

    #[test]
    fn monotone_in_rank() {
        let p = vec![0.001, 0.01, 0.02, 0.5, 0.9];
        let result = benjamini_hochberg(&p, 0.2);
        // if a larger p-value (by rank) is rejected, all smaller ones must be too.
        let mut ranked: Vec<(f64, bool)> = p.iter().cloned().zip(result.reject.iter().cloned()).collect();
        ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let mut seen_false = false;
        for (_, rejected) in ranked {
            if !rejected {
                seen_false = true;
            } else if seen_false {
                panic!("rejection set is not a prefix of the sorted p-values");
            }
        }
    }

    #[test]
    fn non_finite_p_values_never_reject() {
        let result = benjamini_hochberg(&[f64::NAN, 0.001], 0.5);
        assert!(!result.reject[0]);
    }

    #[test]
    fn all_equal_p_values_agree_on_outcome() {
        let result = benjamini_hochberg(&[0.5, 0.5, 0.5, 0.5], 0.9);
        assert!(result.reject.iter().all(|&r| r) || result.reject.iter().all(|&r| !r));
    }
}
