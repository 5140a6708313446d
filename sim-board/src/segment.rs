use std::fmt;

/// A point on the board, in the range `0..N`
pub type Point = usize;

/// An undirected line between two distinct points
///
/// Segments are always stored normalized, with the smaller point first, so `(3, 1)` and `(1, 3)`
/// are the same segment. The derived `Ord` sorts segments by that normalized pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    low: Point,
    high: Point,
}

impl Segment {
    /// Build the normalized segment between `x` and `y`
    ///
    /// Returns `None` when both ends are the same point
    pub fn new(x: Point, y: Point) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { low: x, high: y }),
            std::cmp::Ordering::Greater => Some(Self { low: y, high: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller endpoint
    pub fn low(&self) -> Point {
        self.low
    }

    /// The larger endpoint
    pub fn high(&self) -> Point {
        self.high
    }

    /// Both endpoints as `(low, high)`
    pub fn endpoints(&self) -> (Point, Point) {
        (self.low, self.high)
    }

    /// Iterate over every segment between `points` points, in ascending order
    pub fn all(points: usize) -> impl Iterator<Item = Segment> {
        (0..points).flat_map(move |low| ((low + 1)..points).map(move |high| Segment { low, high }))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

impl From<Segment> for (Point, Point) {
    fn from(segment: Segment) -> Self {
        segment.endpoints()
    }
}
