use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Coordinate vector of length {0} is not a multiple of 3")]
pub struct RaggedCoordinatesError(pub usize);

/// A flat coordinate vector of `3N` values in Angstroms.
///
/// Atom `i` occupies `[3i, 3i + 1, 3i + 2]`. The vector is owned by whoever proposed the
/// conformation; everything in this crate reads it through `as_slice` and never mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Coordinates {
    values: Vec<f64>,
}

impl Coordinates {
    /// Wraps a flat vector.
    ///
    /// # Errors
    ///
    /// Returns [`RaggedCoordinatesError`] if the length is not a multiple of three.
    pub fn from_flat(values: Vec<f64>) -> Result<Self, RaggedCoordinatesError> {
        if values.len() % 3 != 0 {
            return Err(RaggedCoordinatesError(values.len()));
        }
        Ok(Self { values })
    }

    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let values = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        Self { values }
    }

    pub fn atom_count(&self) -> usize {
        self.values.len() / 3
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }

    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        position_in(&self.values, index)
    }

    /// Iterates over atom positions in index order.
    pub fn points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.values
            .chunks_exact(3)
            .map(|xyz| Point3::new(xyz[0], xyz[1], xyz[2]))
    }
}

impl AsRef<[f64]> for Coordinates {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Reads the position of atom `index` from a flat coordinate slice.
pub fn position_in(coords: &[f64], index: usize) -> Option<Point3<f64>> {
    let start = index.checked_mul(3)?;
    let xyz = coords.get(start..start.checked_add(3)?)?;
    Some(Point3::new(xyz[0], xyz[1], xyz[2]))
}
