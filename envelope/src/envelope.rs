/// The vertical extent of the samples surrounding one index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest y within the window
    pub lower: f64,
    /// Largest y within the window
    pub upper: f64,
}

impl Bounds {
    #[inline(always)]
    pub(crate) fn new(y: f64) -> Self {
        Self { lower: y, upper: y }
    }

    #[inline(always)]
    pub(crate) fn include(&mut self, y: f64) {
        if y < self.lower {
            self.lower = y;
        }
        if y > self.upper {
            self.upper = y;
        }
    }

    /// The distance between `upper` and `lower`
    #[inline(always)]
    pub fn spread(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Per-sample lower and upper bounds, aligned index for index with the input.
///
/// An index whose window holds no sample is `None`, so an undefined bound can
/// never be confused with real data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    bounds: Vec<Option<Bounds>>,
}

impl Envelope {
    pub(crate) fn from_bounds(bounds: Vec<Option<Bounds>>) -> Self {
        Self { bounds }
    }

    /// Number of samples the envelope was computed for
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Whether the envelope was computed for zero samples
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// The bounds at index `i`, `None` if it had no neighbours or is out of range
    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<Bounds> {
        self.bounds.get(i).copied().flatten()
    }

    /// The lower bound at index `i`
    #[inline(always)]
    pub fn lower(&self, i: usize) -> Option<f64> {
        self.get(i).map(|b| b.lower)
    }

    /// The upper bound at index `i`
    #[inline(always)]
    pub fn upper(&self, i: usize) -> Option<f64> {
        self.get(i).map(|b| b.upper)
    }

    /// Iterate over the bounds in input order
    pub fn iter(&self) -> impl Iterator<Item = Option<Bounds>> + '_ {
        self.bounds.iter().copied()
    }

    /// All lower bounds in input order
    pub fn lower_values(&self) -> Vec<Option<f64>> {
        self.iter().map(|b| b.map(|b| b.lower)).collect()
    }

    /// All upper bounds in input order
    pub fn upper_values(&self) -> Vec<Option<f64>> {
        self.iter().map(|b| b.map(|b| b.upper)).collect()
    }

    /// Indices that had no sample within their window
    pub fn missing(&self) -> Vec<usize> {
        self.bounds
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.is_none().then_some(i))
            .collect()
    }

    /// Consume the envelope, yielding the per-index bounds
    pub fn into_inner(self) -> Vec<Option<Bounds>> {
        self.bounds
    }
}
