use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in an N-dimensional grid space.
///
/// The arity is fixed at creation. Equality and hashing are component-wise,
/// so two coordinates built independently address the same cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(Box<[u32]>);

impl Coordinate {
    /// Create a coordinate from its components.
    pub fn new(components: Vec<u32>) -> Self {
        Self(components.into_boxed_slice())
    }

    /// Two-dimensional coordinate `(x, y)`.
    pub fn xy(x: u32, y: u32) -> Self {
        Self(Box::new([x, y]))
    }

    /// Coordinate of the given arity with every component set to zero.
    pub fn zeros(dimensions: usize) -> Self {
        Self(vec![0; dimensions].into_boxed_slice())
    }

    /// Number of components.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Component on `axis`, or `None` if the axis does not exist.
    pub fn get(&self, axis: usize) -> Option<u32> {
        self.0.get(axis).copied()
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Copy of this coordinate with `axis` replaced by `value`.
    ///
    /// Returns `None` if the axis does not exist.
    pub fn with_axis(&self, axis: usize, value: u32) -> Option<Self> {
        let mut components = self.0.clone();
        *components.get_mut(axis)? = value;
        Some(Self(components))
    }
}

impl<const N: usize> From<[u32; N]> for Coordinate {
    fn from(components: [u32; N]) -> Self {
        Self(Box::new(components))
    }
}

impl From<Vec<u32>> for Coordinate {
    fn from(components: Vec<u32>) -> Self {
        Self::new(components)
    }
}

impl From<&[u32]> for Coordinate {
    fn from(components: &[u32]) -> Self {
        Self(components.into())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}
