//! Margin clustering for layout analysis.
//!
//! Groups a numeric feature taken over every block of a document (left
//! offsets, vertical gaps) into contiguous value bands and ranks the bands by
//! how many blocks fall into them. The top-ranked bands describe the
//! document's "typical" margins.

use indexmap::IndexMap;

/// Default proximity: a value joins a band when it lies within this distance
/// of the band's first value.
pub const DEFAULT_PROXIMITY: i64 = 20;

/// A contiguous band of values and the number of inputs it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarginBand {
    /// Smallest value in the band
    pub min: i64,
    /// Largest value in the band
    pub max: i64,
    /// Number of input values in the band
    pub count: usize,
}

impl MarginBand {
    /// Whether `value` lies within the band, bounds included.
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Range label: `"min-max"`, or the single value when the band is one value wide.
    pub fn label(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// Bands of one feature, ranked by descending member count.
///
/// Bands with equal counts stay in ascending value order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarginClusters {
    bands: Vec<MarginBand>,
}

impl MarginClusters {
    /// All bands, highest rank first.
    pub fn bands(&self) -> &[MarginBand] {
        &self.bands
    }

    /// Band at 0-based `rank`, if there are that many.
    pub fn rank(&self, rank: usize) -> Option<&MarginBand> {
        self.bands.get(rank)
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether no value was clustered.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Total number of clustered values.
    pub fn total_count(&self) -> usize {
        self.bands.iter().map(|b| b.count).sum()
    }

    /// `(label, count)` pairs, highest rank first.
    pub fn labelled(&self) -> Vec<(String, usize)> {
        self.bands.iter().map(|b| (b.label(), b.count)).collect()
    }
}

/// Cluster values into ranked bands.
///
/// Values are sorted ascending and walked in order. A value joins the current
/// group when its distance from the group's first value is at most
/// `proximity`; otherwise the group is closed and a new one starts. Absent
/// values (`None`) are skipped. An input without values yields no bands.
///
/// # Examples
///
/// ```
/// use layout_oxide::layout::clustering::{cluster_values, DEFAULT_PROXIMITY};
///
/// let clusters = cluster_values(vec![50, 52, 55, 200, 600, 605], DEFAULT_PROXIMITY);
/// assert_eq!(
///     clusters.labelled(),
///     vec![("50-55".to_string(), 3), ("600-605".to_string(), 2), ("200".to_string(), 1)]
/// );
/// ```
pub fn cluster_values<I, V>(values: I, proximity: i64) -> MarginClusters
where
    I: IntoIterator<Item = V>,
    V: Into<Option<i64>>,
{
    let mut sorted: Vec<i64> = values.into_iter().filter_map(Into::into).collect();
    sorted.sort_unstable();

    let mut counts: IndexMap<(i64, i64), usize> = IndexMap::new();
    let mut group: Vec<i64> = Vec::new();

    for value in sorted {
        match group.first() {
            Some(&first) if (value - first).abs() > proximity => {
                close_group(&mut counts, &group);
                group.clear();
            },
            _ => {},
        }
        group.push(value);
    }
    close_group(&mut counts, &group);

    let mut bands: Vec<MarginBand> = counts
        .into_iter()
        .map(|((min, max), count)| MarginBand { min, max, count })
        .collect();
    bands.sort_by(|a, b| b.count.cmp(&a.count));

    MarginClusters { bands }
}

fn close_group(counts: &mut IndexMap<(i64, i64), usize>, group: &[i64]) {
    // Sorted input: first and last are the bounds.
    if let (Some(&min), Some(&max)) = (group.first(), group.last()) {
        *counts.entry((min, max)).or_insert(0) += group.len();
    }
}
