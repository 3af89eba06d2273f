//! Reductions over grouped rows
//!
//! Undefined results (empty input, division by zero, too few observations)
//! come back as `None` and are never coerced to zero.

use ordered_float::OrderedFloat;

pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().sum()
}

/// Arithmetic mean, `None` for no values
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut moments = RunningMoments::new();
    values.into_iter().for_each(|v| moments.push(v));
    moments.mean()
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut moments = RunningMoments::new();
    values.into_iter().for_each(|v| moments.push(v));
    moments.sample_std_dev()
}

/// `numerator / denominator`, `None` when the denominator is zero
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Share of `total` in percent
pub fn percentage(part: f64, total: f64) -> Option<f64> {
    ratio(part, total).map(|r| r * 100.0)
}

/// Relative change from `base` to `current` in percent
pub fn percent_change(current: Option<f64>, base: Option<f64>) -> Option<f64> {
    let (current, base) = (current?, base?);
    percentage(current - base, base)
}

/// Welford accumulator for mean and variance
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMoments {
    count: usize,
    mean: f64,
    sq_diff_sum: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let before = value - self.mean;
        self.mean += before / self.count as f64;
        let after = value - self.mean;
        self.sq_diff_sum += before * after;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.sq_diff_sum / (self.count - 1) as f64)
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

/// Accumulates `Σ(value × weight) / Σ(weight)`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    pub weighted_sum: f64,
    pub total_weight: f64,
}

impl WeightedMean {
    pub fn push(&mut self, value: f64, weight: f64) {
        self.weighted_sum += value * weight;
        self.total_weight += weight;
    }

    pub fn value(&self) -> Option<f64> {
        ratio(self.weighted_sum, self.total_weight)
    }
}

/// Percentile rank of each value in `values`, in input order.
///
/// Ranks are 1-based and ascending; tied values share the average of the
/// ranks they span. The percentile is `rank / n × 100`.
pub fn fractional_percentiles(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| OrderedFloat(values[i]));

    let mut percentiles = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let tied = OrderedFloat(values[order[start]]);
        let mut end = start + 1;
        while end < n && OrderedFloat(values[order[end]]) == tied {
            end += 1;
        }
        // ranks start+1 ..= end
        let average_rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            percentiles[i] = average_rank / n as f64 * 100.0;
        }
        start = end;
    }
    percentiles
}
