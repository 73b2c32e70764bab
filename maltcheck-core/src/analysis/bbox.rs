use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box in image coordinates (origin top-left,
/// Y increasing downward), represented by minimum and maximum points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// The minimum point of the bounding box (top-left corner).
    pub min: glam::Vec2,
    /// The maximum point of the bounding box (bottom-right corner).
    pub max: glam::Vec2,
}

impl Bbox {
    pub fn new(min: glam::Vec2, max: glam::Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a bounding box from a minimum point and size vector.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use maltcheck_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_min_size(Vec2::new(10.0, 20.0), Vec2::new(40.0, 12.0));
    /// assert_eq!(bbox.max, Vec2::new(50.0, 32.0));
    /// ```
    pub fn from_min_size(min: glam::Vec2, size: glam::Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> glam::Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Euclidean distance between the centers of two bounding boxes.
    pub fn center_distance(&self, other: &Self) -> f32 {
        self.center().distance(other.center())
    }

    /// Area of intersection with another box, 0.0 when they do not overlap.
    pub fn intersection(&self, other: &Self) -> f32 {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        if max.x > min.x && max.y > min.y {
            (max.x - min.x) * (max.y - min.y)
        } else {
            0.0
        }
    }

    /// Intersection over Union with another box.
    ///
    /// 0.0 means no overlap, 1.0 identical boxes.
    pub fn iou(&self, other: &Self) -> f32 {
        let intersection_area = self.intersection(other);
        let union_area = self.area() + other.area() - intersection_area;

        if union_area > 0.0 {
            intersection_area / union_area
        } else {
            0.0
        }
    }

    /// Overlap ratio using the smaller area as denominator.
    ///
    /// More lenient than IoU when the boxes differ in size, which is the
    /// common case for two detectors drawing boxes of different tightness
    /// around the same word: a snug box fully inside a loose one scores 1.0
    /// here while its IoU stays low.
    pub fn overlap_ratio(&self, other: &Self) -> f32 {
        let intersection_area = self.intersection(other);
        let min_area = self.area().min(other.area());

        if min_area > 0.0 {
            intersection_area / min_area
        } else {
            0.0
        }
    }

    /// The smallest box containing both this box and another.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Clamps the box to stay within the given bounds, e.g. image borders.
    pub fn clamp(&self, min_bounds: glam::Vec2, max_bounds: glam::Vec2) -> Self {
        Self {
            min: self.min.max(min_bounds),
            max: self.max.min(max_bounds),
        }
    }
}
