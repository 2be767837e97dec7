use serde::{Deserialize, Serialize};

use super::detection_model::RawDetections;

/// Axis-aligned box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_xyxy(coords: [f32; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// Zero or more detected instances in one image, as four parallel sequences.
///
/// Index `i` across `boxes`, `labels`, and `scores` describes one instance;
/// those three are always the same length. `brands` is filled by a downstream
/// classification stage and stays empty until then.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    pub boxes: Vec<BoundingBox>,
    pub labels: Vec<i64>,
    pub scores: Vec<f32>,
    pub brands: Vec<String>,
}

impl DetectionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from one raw model output, with `brands` left empty.
    pub fn from_raw(raw: RawDetections) -> Self {
        debug_assert_eq!(raw.boxes.len(), raw.labels.len());
        debug_assert_eq!(raw.boxes.len(), raw.scores.len());
        Self {
            boxes: raw.boxes.into_iter().map(BoundingBox::from_xyxy).collect(),
            labels: raw.labels,
            scores: raw.scores,
            brands: Vec::new(),
        }
    }

    /// Number of detected instances.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Per-instance keep mask: `scores[i] > threshold` (strict).
    pub fn selection_mask(&self, threshold: f32) -> Vec<bool> {
        self.scores.iter().map(|&s| s > threshold).collect()
    }

    /// Keep only the instances whose score strictly exceeds `threshold`,
    /// preserving relative order. `brands` is reset to empty.
    pub fn filter_by_confidence(self, threshold: f32) -> Self {
        let keep = self.selection_mask(threshold);
        Self {
            boxes: apply_mask(self.boxes, &keep),
            labels: apply_mask(self.labels, &keep),
            scores: apply_mask(self.scores, &keep),
            brands: Vec::new(),
        }
    }
}

fn apply_mask<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, &k)| k.then_some(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn set_with_scores(scores: &[f32]) -> DetectionSet {
        let raw = RawDetections {
            boxes: (0..scores.len())
                .map(|i| [i as f32, i as f32, i as f32 + 10.0, i as f32 + 10.0])
                .collect(),
            labels: (0..scores.len() as i64).collect(),
            scores: scores.to_vec(),
        };
        DetectionSet::from_raw(raw)
    }

    #[test]
    fn test_from_raw_keeps_sequences_parallel() {
        let set = set_with_scores(&[0.1, 0.2, 0.3]);
        assert_eq!(set.boxes.len(), 3);
        assert_eq!(set.labels.len(), 3);
        assert_eq!(set.scores.len(), 3);
        assert!(set.brands.is_empty());
    }

    #[test]
    fn test_selection_mask_strict_inequality() {
        let set = set_with_scores(&[0.5, 0.50001, 0.49999]);
        assert_eq!(set.selection_mask(0.5), vec![false, true, false]);
    }

    #[test]
    fn test_filter_keeps_positions_zero_and_two() {
        let set = set_with_scores(&[0.9, 0.3, 0.95]);
        assert_eq!(set.selection_mask(0.5), vec![true, false, true]);

        let filtered = set.filter_by_confidence(0.5);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.labels, vec![0, 2]);
        assert_relative_eq!(filtered.scores[0], 0.9);
        assert_relative_eq!(filtered.scores[1], 0.95);
        assert_relative_eq!(filtered.boxes[0].x1, 0.0);
        assert_relative_eq!(filtered.boxes[1].x1, 2.0);
        assert!(filtered.brands.is_empty());
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let set = set_with_scores(&[0.6, 0.9, 0.7, 0.1, 0.8]);
        let filtered = set.filter_by_confidence(0.5);
        assert_eq!(filtered.labels, vec![0, 1, 2, 4]);
        assert_eq!(filtered.scores, vec![0.6, 0.9, 0.7, 0.8]);
    }

    #[test]
    fn test_filter_empty_set_is_valid() {
        let filtered = DetectionSet::empty().filter_by_confidence(0.5);
        assert!(filtered.is_empty());
        assert_eq!(filtered.len(), 0);
        assert!(filtered.labels.is_empty());
        assert!(filtered.scores.is_empty());
        assert!(filtered.brands.is_empty());
    }

    #[test]
    fn test_filter_nothing_above_threshold_yields_empty_set() {
        let filtered = set_with_scores(&[0.1, 0.2]).filter_by_confidence(0.5);
        assert!(filtered.is_empty());
    }

    #[rstest]
    #[case::all_above(&[0.6, 0.7], 0.5, 2)]
    #[case::all_below(&[0.1, 0.2], 0.5, 0)]
    #[case::boundary_excluded(&[0.5], 0.5, 0)]
    #[case::just_above_kept(&[0.500001], 0.5, 1)]
    #[case::zero_threshold_drops_zero_scores(&[0.0, 0.1], 0.0, 1)]
    fn test_filter_count(#[case] scores: &[f32], #[case] threshold: f32, #[case] expected: usize) {
        let filtered = set_with_scores(scores).filter_by_confidence(threshold);
        assert_eq!(filtered.len(), expected);
        assert_eq!(filtered.labels.len(), expected);
        assert_eq!(filtered.scores.len(), expected);
    }

    #[test]
    fn test_serializes_to_parallel_arrays() {
        let set = set_with_scores(&[0.9]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["scores"].as_array().unwrap().len(), 1);
        assert_eq!(json["labels"][0], 0);
        assert_eq!(json["brands"].as_array().unwrap().len(), 0);
        assert_relative_eq!(json["boxes"][0]["x2"].as_f64().unwrap(), 10.0);
    }

    #[test]
    fn test_bounding_box_dimensions() {
        let b = BoundingBox::new(10.0, 20.0, 40.0, 80.0);
        assert_relative_eq!(b.width(), 30.0);
        assert_relative_eq!(b.height(), 60.0);
    }
}
