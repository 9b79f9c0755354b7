use nalgebra::{Matrix4, Point3, Vector3};

/// Fixed tolerance for the near-equality checks deciding whether geometry
/// changed. Values within this distance are treated as unchanged.
pub const TOLERANCE: f64 = 1e-6;

#[inline]
pub fn approx_eq_vector(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    (a - b).amax() <= TOLERANCE
}

#[inline]
pub fn approx_eq_point(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a - b).amax() <= TOLERANCE
}

/// Axis-aligned world bounds of an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the diagonal between the two extreme corners
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }

    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    pub fn clamp(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }
}

/// One cutting plane of the reslice cursor.
///
/// `origin`, `point1` and `point2` span the rectangle that is resliced:
/// `point1 - origin` and `point2 - origin` are orthogonal to `normal` and to
/// each other, and `(point1 - origin) × (point2 - origin)` points along
/// `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneState {
    pub normal: Vector3<f64>,
    pub origin: Point3<f64>,
    pub point1: Point3<f64>,
    pub point2: Point3<f64>,
}

impl PlaneState {
    /// Builds a square plane of half-size `half_size` centered on `center`,
    /// with `axis` as the first in-plane direction.
    ///
    /// `normal` and `axis` must be orthonormal.
    pub fn centered(
        center: &Point3<f64>,
        normal: &Vector3<f64>,
        axis: &Vector3<f64>,
        half_size: f64,
    ) -> Self {
        let second_axis = normal.cross(axis);
        let origin = center - axis * half_size - second_axis * half_size;
        Self {
            normal: *normal,
            origin,
            point1: origin + axis * (2.0 * half_size),
            point2: origin + second_axis * (2.0 * half_size),
        }
    }

    pub fn axis1(&self) -> Vector3<f64> {
        self.point1 - self.origin
    }

    pub fn axis2(&self) -> Vector3<f64> {
        self.point2 - self.origin
    }

    /// Center of the resliced rectangle.
    pub fn center(&self) -> Point3<f64> {
        self.origin + (self.axis1() + self.axis2()) * 0.5
    }

    /// Signed distance of `point` from the plane, along the normal.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    pub fn approx_eq(&self, other: &PlaneState) -> bool {
        approx_eq_vector(&self.normal, &other.normal)
            && approx_eq_point(&self.origin, &other.origin)
            && approx_eq_point(&self.point1, &other.point1)
            && approx_eq_point(&self.point2, &other.point2)
    }

    /// Checks the plane invariant: unit normal, non-parallel in-plane axes,
    /// both orthogonal to the normal.
    pub fn is_consistent(&self) -> bool {
        let (axis1, axis2) = (self.axis1(), self.axis2());
        let scale = axis1.norm().max(axis2.norm()).max(1.0);
        (self.normal.norm() - 1.0).abs() <= TOLERANCE
            && self.normal.dot(&axis1).abs() <= TOLERANCE * scale
            && self.normal.dot(&axis2).abs() <= TOLERANCE * scale
            && axis1.cross(&axis2).norm() > TOLERANCE
    }
}

/// Homogeneous transform from reslice space into world space.
///
/// The columns are the first in-plane axis, the second in-plane axis, the
/// plane normal (all unit length) and the plane origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResliceAxes {
    pub matrix: Matrix4<f64>,
}

impl ResliceAxes {
    pub fn from_plane(plane: &PlaneState) -> Self {
        let u = plane.axis1().normalize();
        let v = plane.axis2().normalize();
        let n = plane.normal;
        let o = plane.origin;
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            u.x, v.x, n.x, o.x,
            u.y, v.y, n.y, o.y,
            u.z, v.z, n.z, o.z,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    pub fn axis_u(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 0).into_owned()
    }

    pub fn axis_v(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 1).into_owned()
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 2).into_owned()
    }

    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.matrix.fixed_view::<3, 1>(0, 3).into_owned())
    }

    /// Maps a point given in reslice coordinates `(u, v, w)` into world space.
    pub fn to_world(&self, u: f64, v: f64, w: f64) -> Point3<f64> {
        self.matrix.transform_point(&Point3::new(u, v, w))
    }

    pub fn approx_eq(&self, other: &ResliceAxes) -> bool {
        (self.matrix - other.matrix).amax() <= TOLERANCE
    }
}
