use crate::error::ResliceCursorError;
use crate::geometry::Bounds;

use nalgebra::{Point3, Vector3};
use ndarray::Array3;
use rayon::prelude::*;

/// Regular 3D scalar grid.
///
/// `data` is indexed `(z, y, x)`, i.e. `(depth, height, width)`, while
/// `spacing` and `origin` are given in world `(x, y, z)` order.
#[derive(Clone, Debug)]
pub struct ImageData {
    data: Array3<f32>,
    spacing: Vector3<f64>,
    origin: Point3<f64>,
    scalar_range: (f32, f32),
}

impl ImageData {
    pub fn new(
        data: Array3<f32>,
        spacing: (f64, f64, f64),
        origin: Point3<f64>,
    ) -> Result<Self, ResliceCursorError> {
        if data.is_empty() {
            return Err(ResliceCursorError::EmptyImage);
        }
        let (sx, sy, sz) = spacing;
        if [sx, sy, sz].iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ResliceCursorError::InvalidSpacing(sx, sy, sz));
        }
        let scalar_range = Self::compute_scalar_range(&data);
        Ok(Self {
            data,
            spacing: Vector3::new(spacing.0, spacing.1, spacing.2),
            origin,
            scalar_range,
        })
    }

    /// Ramp image with values growing across each axial slice, useful for
    /// debugging the reslice geometry without loading a file.
    pub fn synthetic(dims: (usize, usize, usize), spacing: f64) -> Result<Self, ResliceCursorError> {
        let (width, height, depth) = dims;
        let slice_len = (width * height) as f32;
        let data = Array3::from_shape_fn((depth, height, width), |(_, y, x)| {
            256.0 * ((y * width + x + 1) as f32 % slice_len) / slice_len
        });
        Self::new(data, (spacing, spacing, spacing), Point3::origin())
    }

    fn compute_scalar_range(data: &Array3<f32>) -> (f32, f32) {
        data.par_iter()
            .fold(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            )
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)),
            )
    }

    /// Get the dimensions of the grid (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of samples along world x, y and z.
    pub fn dimensions(&self) -> [usize; 3] {
        let (depth, height, width) = self.data.dim();
        [width, height, depth]
    }

    /// Index extent `[x0, x1, y0, y1, z0, z1]`, inclusive.
    pub fn extent(&self) -> [usize; 6] {
        let [nx, ny, nz] = self.dimensions();
        [0, nx - 1, 0, ny - 1, 0, nz - 1]
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    pub fn min_spacing(&self) -> f64 {
        self.spacing.min()
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    pub fn scalar_range(&self) -> (f32, f32) {
        self.scalar_range
    }

    pub fn bounds(&self) -> Bounds {
        let [nx, ny, nz] = self.dimensions();
        let size = Vector3::new(
            (nx - 1) as f64 * self.spacing.x,
            (ny - 1) as f64 * self.spacing.y,
            (nz - 1) as f64 * self.spacing.z,
        );
        Bounds::new(self.origin, self.origin + size)
    }

    pub fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }

    /// Length of the dimension vector, the upper limit for slab thickness in
    /// slices.
    pub fn max_slab_slices(&self) -> usize {
        let [nx, ny, nz] = self.dimensions();
        ((nx * nx + ny * ny + nz * nz) as f64).sqrt() as usize
    }

    /// Converts a world point into continuous `(x, y, z)` index coordinates.
    pub fn world_to_index(&self, point: &Point3<f64>) -> Vector3<f64> {
        (point - self.origin).component_div(&self.spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn geometry_follows_spacing_and_origin() {
        let data = Array3::<f32>::zeros((11, 21, 41));
        let image = ImageData::new(data, (0.5, 1.0, 2.0), Point3::new(10.0, 0.0, 0.0))
            .expect("should build image");
        assert_eq!(image.dimensions(), [41, 21, 11]);
        assert_eq!(image.extent(), [0, 40, 0, 20, 0, 10]);
        let bounds = image.bounds();
        assert_eq!(bounds.min, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(30.0, 20.0, 20.0));
        assert_eq!(image.center(), Point3::new(20.0, 10.0, 10.0));
        assert_eq!(image.min_spacing(), 0.5);
    }

    #[test]
    fn scalar_range_covers_all_values() {
        let mut data = Array3::<f32>::zeros((4, 4, 4));
        data[[1, 2, 3]] = 42.0;
        data[[3, 0, 0]] = -7.0;
        let image = ImageData::new(data, (1.0, 1.0, 1.0), Point3::origin()).unwrap();
        assert_eq!(image.scalar_range(), (-7.0, 42.0));
    }

    #[test]
    fn empty_image_is_rejected() {
        let data = Array3::<f32>::zeros((0, 4, 4));
        let result = ImageData::new(data, (1.0, 1.0, 1.0), Point3::origin());
        assert!(matches!(result, Err(ResliceCursorError::EmptyImage)));
    }

    #[test]
    fn bad_spacing_is_rejected() {
        for spacing in [(-1.0, 1.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, f64::NAN), (f64::INFINITY, 1.0, 1.0)] {
            let data = Array3::<f32>::zeros((4, 4, 4));
            let result = ImageData::new(data, spacing, Point3::origin());
            assert!(
                matches!(result, Err(ResliceCursorError::InvalidSpacing(..))),
                "spacing {spacing:?} should be rejected"
            );
        }
        assert!(ImageData::synthetic((4, 4, 4), 0.0).is_err());
    }

    #[test]
    fn synthetic_ramp_stays_in_byte_range() {
        let image = ImageData::synthetic((16, 16, 8), 0.1).unwrap();
        let (lo, hi) = image.scalar_range();
        assert!(lo >= 0.0);
        assert!(hi < 256.0);
        assert_eq!(image.max_slab_slices(), 24);
    }
}
