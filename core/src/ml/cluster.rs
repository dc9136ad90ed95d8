use rand::seq::index::sample;
use rand::Rng;

use crate::types::{EventRecord, FEATURE_COUNT};

pub const CLUSTER_COUNT: usize = 2;

const MAX_ITERATIONS: usize = 100;

// Initialization is random and unseeded, so label identity is not stable
// across runs.
pub fn label_events(records: &mut [EventRecord]) -> Result<(), String> {
    let points = records
        .iter()
        .map(|record| record.features)
        .collect::<Vec<_>>();

    let labels = fit_predict(&points, CLUSTER_COUNT)?;

    for (record, label) in records.iter_mut().zip(labels) {
        record.cluster = Some(label);
    }

    Ok(())
}

pub fn fit_predict(
    points: &[[f64; FEATURE_COUNT]],
    k: usize,
) -> Result<Vec<usize>, String> {
    fit_predict_with(points, k, &mut rand::thread_rng())
}

fn fit_predict_with<R: Rng>(
    points: &[[f64; FEATURE_COUNT]],
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>, String> {
    if k == 0 {
        return Err("cluster count must be positive".to_string());
    }
    if points.len() < k {
        return Err(format!(
            "clustering requires at least {} rows, got {}",
            k,
            points.len()
        ));
    }

    let mut centroids = sample(rng, points.len(), k)
        .into_iter()
        .map(|index| points[index])
        .collect::<Vec<_>>();
    let mut labels = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(points) {
            let nearest = nearest_centroid(point, &centroids);
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        // Recompute centroids as cluster means; an empty cluster keeps its
        // previous centroid.
        let mut sums = vec![[0.0f64; FEATURE_COUNT]; k];
        let mut counts = vec![0usize; k];
        for (point, &label) in points.iter().zip(&labels) {
            counts[label] += 1;
            for dim in 0..FEATURE_COUNT {
                sums[label][dim] += point[dim];
            }
        }
        for cluster in 0..k {
            if counts[cluster] == 0 {
                continue;
            }
            for dim in 0..FEATURE_COUNT {
                centroids[cluster][dim] = sums[cluster][dim] / counts[cluster] as f64;
            }
        }
    }

    Ok(labels)
}

fn nearest_centroid(point: &[f64; FEATURE_COUNT], centroids: &[[f64; FEATURE_COUNT]]) -> usize {
    let mut nearest = 0usize;
    let mut best = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best {
            best = distance;
            nearest = index;
        }
    }
    nearest
}

fn squared_distance(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
