//! K-means clustering of whole profiles.
//!
//! Each profile is one point in `R^n`. Seeded k-means++ runs go through
//! aprender's `KMeans`, best of several restarts by inertia. Runs anchored
//! on caller-supplied centroids use the Lloyd loop below, since aprender
//! always picks its own starting centroids. A fixed seed reproduces the
//! same labels either way.

use aprender::cluster::KMeans as LloydKMeans;
use aprender::primitives::Matrix;
use aprender::traits::UnsupervisedEstimator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::KMeansConfig;
use crate::error::{AnalysisError, Result};

/// Outcome of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index per input point, in input order.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

pub struct KMeans {
    k: usize,
    n_init: usize,
    max_iter: usize,
    tolerance: f64,
    seed: u64,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(c, centroid)| (c, squared_distance(point, centroid)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

impl KMeans {
    pub fn new(config: &KMeansConfig) -> Self {
        Self {
            k: config.clusters,
            n_init: config.n_init.max(1),
            max_iter: config.max_iter.max(1),
            tolerance: config.tolerance,
            seed: config.seed,
        }
    }

    /// Cluster `points`, all of one dimension, with `k <= points.len()`.
    ///
    /// With no `seeds`, `n_init` seeded k-means++ runs are made and the one
    /// with the lowest inertia wins. Otherwise `seeds` are used verbatim as
    /// the first centroids, any missing ones are picked by k-means++ and a
    /// single run is made.
    pub fn fit(&self, points: &[&[f64]], seeds: &[&[f64]]) -> Result<Clustering> {
        let tol = self.tolerance * mean_feature_variance(points);
        if seeds.is_empty() {
            return self.fit_restarts(points, tol);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let init = self.init_centroids(points, seeds, &mut rng);
        Ok(self.lloyd(points, init, tol))
    }

    fn fit_restarts(&self, points: &[&[f64]], tol: f64) -> Result<Clustering> {
        let dim = points.first().map_or(0, |p| p.len());
        // aprender works in f32; only the labels are taken from it.
        let data: Vec<f32> = points
            .iter()
            .flat_map(|p| p.iter().map(|&v| v as f32))
            .collect();
        let matrix = Matrix::from_vec(points.len(), dim, data)
            .map_err(|e| AnalysisError::degenerate("kmeans", e.to_string()))?;

        let mut best: Option<Clustering> = None;
        for run in 0..self.n_init {
            let mut model = LloydKMeans::new(self.k)
                .with_max_iter(self.max_iter)
                .with_tol(tol as f32)
                .with_random_state(self.seed.wrapping_add(run as u64));
            model
                .fit(&matrix)
                .map_err(|e| AnalysisError::degenerate("kmeans", e.to_string()))?;
            let fit = summarise(points, model.predict(&matrix), self.k);
            log::debug!("k-means run {run}: inertia {:.6}", fit.inertia);
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or_else(|| AnalysisError::degenerate("kmeans", "no restarts were made"))
    }

    fn init_centroids(
        &self,
        points: &[&[f64]],
        seeds: &[&[f64]],
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        let mut centroids: Vec<Vec<f64>> =
            seeds.iter().take(self.k).map(|s| s.to_vec()).collect();

        // k-means++ top-up: next centroid drawn with probability proportional to the
        // squared distance to the closest centroid already chosen.
        while centroids.len() < self.k {
            let weights: Vec<f64> = points.iter().map(|p| nearest(p, &centroids).1).collect();
            let total: f64 = weights.iter().sum();
            let pick = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = points.len() - 1;
                for (i, w) in weights.iter().enumerate() {
                    if target < *w {
                        chosen = i;
                        break;
                    }
                    target -= w;
                }
                chosen
            } else {
                rng.gen_range(0..points.len())
            };
            centroids.push(points[pick].to_vec());
        }
        centroids
    }

    fn lloyd(&self, points: &[&[f64]], mut centroids: Vec<Vec<f64>>, tol: f64) -> Clustering {
        let dim = points.first().map_or(0, |p| p.len());
        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iter {
            iterations += 1;
            for (label, p) in labels.iter_mut().zip(points) {
                *label = nearest(p, &centroids).0;
            }

            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (&label, p) in labels.iter().zip(points) {
                counts[label] += 1;
                for (s, v) in sums[label].iter_mut().zip(p.iter()) {
                    *s += v;
                }
            }

            // An emptied cluster takes the point worst served by its centroid.
            for c in 0..self.k {
                if counts[c] > 0 {
                    continue;
                }
                let far = points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i, squared_distance(p, &centroids[labels[i]])))
                    .fold((0, f64::NEG_INFINITY), |best, cur| {
                        if cur.1 > best.1 {
                            cur
                        } else {
                            best
                        }
                    })
                    .0;
                let old = labels[far];
                counts[old] -= 1;
                for (s, v) in sums[old].iter_mut().zip(points[far].iter()) {
                    *s -= v;
                }
                labels[far] = c;
                counts[c] = 1;
                sums[c] = points[far].to_vec();
            }

            let mut shift = 0.0;
            for c in 0..self.k {
                if counts[c] == 0 {
                    continue;
                }
                let updated: Vec<f64> = sums[c].iter().map(|s| s / counts[c] as f64).collect();
                shift += squared_distance(&updated, &centroids[c]);
                centroids[c] = updated;
            }
            if shift <= tol {
                break;
            }
        }

        let mut inertia = 0.0;
        for (label, p) in labels.iter_mut().zip(points) {
            let (c, d) = nearest(p, &centroids);
            *label = c;
            inertia += d;
        }
        log::debug!("anchored k-means: inertia {inertia:.6} after {iterations} iterations");
        Clustering {
            labels,
            centroids,
            inertia,
        }
    }
}

/// Centroids and inertia (in f64) for a labelling of `points`.
fn summarise(points: &[&[f64]], labels: Vec<usize>, k: usize) -> Clustering {
    let dim = points.first().map_or(0, |p| p.len());
    let mut centroids = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];
    for (&label, p) in labels.iter().zip(points) {
        counts[label] += 1;
        for (c, v) in centroids[label].iter_mut().zip(p.iter()) {
            *c += v;
        }
    }
    for (centroid, &count) in centroids.iter_mut().zip(&counts) {
        if count > 0 {
            centroid.iter_mut().for_each(|c| *c /= count as f64);
        }
    }
    let inertia = labels
        .iter()
        .zip(points)
        .map(|(&label, p)| squared_distance(p, &centroids[label]))
        .sum();
    Clustering {
        labels,
        centroids,
        inertia,
    }
}

/// Mean over dimensions of the per-dimension variance; scales the
/// convergence tolerance to the data.
fn mean_feature_variance(points: &[&[f64]]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let n = points.len() as f64;
    let dim = first.len();
    if dim == 0 {
        return 0.0;
    }
    let total: f64 = (0..dim)
        .map(|d| {
            let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
            points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / dim as f64
}
