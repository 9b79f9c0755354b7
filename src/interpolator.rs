use nalgebra::Vector3;
use ndarray::Array3;

pub(crate) struct Interpolator;

impl Interpolator {
    /// Samples `data` at continuous index coordinates `(x, y, z)`.
    ///
    /// `data` is indexed `(z, y, x)`. Returns `None` outside the grid.
    #[inline]
    pub(crate) fn trilinear_interpolate(data: &Array3<f32>, index: &Vector3<f64>) -> Option<f32> {
        let (depth, height, width) = data.dim();
        let (x, y, z) = (index.x as f32, index.y as f32, index.z as f32);
        let inside = |v: f32, len: usize| v >= 0.0 && v <= (len - 1) as f32;
        if !(inside(x, width) && inside(y, height) && inside(z, depth)) {
            return None;
        }

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let z1 = (z0 + 1).min(depth - 1);

        let dx = x - x0 as f32;
        let dy = y - y0 as f32;
        let dz = z - z0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;
        let one_minus_dz = 1.0 - dz;

        let lerp_x = |z: usize, y: usize| data[[z, y, x0]].mul_add(one_minus_dx, data[[z, y, x1]] * dx);

        let v00 = lerp_x(z0, y0);
        let v01 = lerp_x(z0, y1);
        let v10 = lerp_x(z1, y0);
        let v11 = lerp_x(z1, y1);

        let v0 = v00.mul_add(one_minus_dy, v01 * dy);
        let v1 = v10.mul_add(one_minus_dy, v11 * dy);

        Some(v0.mul_add(one_minus_dz, v1 * dz))
    }
}
