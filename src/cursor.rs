//! The reslice cursor: three cutting planes meeting in a shared center.

use std::fmt;

use log::{debug, info, warn};
use nalgebra::{Matrix3, Point3, Unit, UnitQuaternion, Vector3};

use crate::enums::{InteractionKind, ViewType};
use crate::error::ResliceCursorError;
use crate::geometry::{Bounds, PlaneState, TOLERANCE};
use crate::image_data::ImageData;
use crate::settings::ResliceSettings;

/// Sine of the smallest angle allowed between two normals, or between a
/// normal and the axis used to rebuild the basis around it.
const PARALLEL_TOLERANCE: f64 = 1e-3;

/// Axis-aligned defaults: sagittal, coronal, axial.
const DEFAULT_NORMALS: [Vector3<f64>; 3] = [
    Vector3::new(1.0, 0.0, 0.0),
    Vector3::new(0.0, 1.0, 0.0),
    Vector3::new(0.0, 0.0, 1.0),
];

/// Geometry change requested by one interaction on a cursor plane.
///
/// The rotation turns the plane's normal about the cursor center; the
/// translation moves the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaTransform {
    pub translation: Vector3<f64>,
    pub rotation: Option<UnitQuaternion<f64>>,
}

impl DeltaTransform {
    pub fn translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation: None,
        }
    }

    pub fn rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Some(rotation),
        }
    }

    /// Rotation of `angle` radians about `axis`.
    pub fn rotation_about(axis: &Vector3<f64>, angle: f64) -> Self {
        Self::rotation(UnitQuaternion::from_axis_angle(&Unit::new_normalize(*axis), angle))
    }

    /// Smallest rotation taking normal `from` onto `to`. Returns `None` when
    /// the two point in opposite directions and no unique rotation exists.
    pub fn rotate_normal(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Self> {
        UnitQuaternion::rotation_between(from, to).map(Self::rotation)
    }

    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.translation = translation;
        self
    }

    pub fn kind(&self) -> InteractionKind {
        match self.rotation {
            Some(rotation) if rotation.angle() > TOLERANCE => InteractionKind::Rotation,
            _ => InteractionKind::Translation,
        }
    }
}

/// A rotation that could not be applied without breaking the cursor. The
/// previous basis is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryAnomaly {
    /// The rotated normal became parallel to the normal the orthogonal basis is
    /// rebuilt from.
    ParallelToReference { plane: ViewType, reference: ViewType },
    /// The rotated normals no longer meet in a single point.
    DegenerateBasis { plane: ViewType },
}

impl fmt::Display for GeometryAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryAnomaly::ParallelToReference { plane, reference } => write!(
                f,
                "{plane} normal is parallel to the {reference} reference axis"
            ),
            GeometryAnomaly::DegenerateBasis { plane } => {
                write!(f, "{plane} normal leaves the planes without a common point")
            }
        }
    }
}

/// Outcome of [`CursorModel::apply_interaction`] for the active plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionResult {
    /// Whether any cursor geometry changed beyond [`TOLERANCE`].
    pub modified: bool,
    pub origin: Point3<f64>,
    pub point1: Point3<f64>,
    pub point2: Point3<f64>,
    /// Whether a rotation was applied to the normals.
    pub rotated: bool,
    pub anomaly: Option<GeometryAnomaly>,
}

#[derive(Clone, Debug)]
pub struct CursorModel {
    normals: [Vector3<f64>; 3],
    center: Point3<f64>,
    planes: [PlaneState; 3],
    initial_normals: [Vector3<f64>; 3],
    bounds: Bounds,
    half_size: f64,
    keep_orthogonality: bool,
    enable_rotation: bool,
    enable_translation: bool,
}

impl CursorModel {
    /// Creates an axis-aligned cursor centered on `image`.
    pub fn new(image: &ImageData, settings: &ResliceSettings) -> Self {
        let bounds = image.bounds();
        let half_size = bounds.diagonal().max(1.0);
        let center = bounds.center();
        let normals = DEFAULT_NORMALS;
        Self {
            normals,
            center,
            planes: Self::build_planes(&normals, &center, half_size),
            initial_normals: normals,
            bounds,
            half_size,
            keep_orthogonality: settings.keep_orthogonality,
            enable_rotation: settings.enable_rotation,
            enable_translation: settings.enable_translation,
        }
    }

    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    pub fn normals(&self) -> &[Vector3<f64>; 3] {
        &self.normals
    }

    pub fn planes(&self) -> &[PlaneState; 3] {
        &self.planes
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn plane(&self, view: ViewType) -> Result<PlaneState, ResliceCursorError> {
        let index = view
            .plane_index()
            .ok_or(ResliceCursorError::InvalidView(view))?;
        Ok(self.planes[index])
    }

    pub fn keep_orthogonality(&self) -> bool {
        self.keep_orthogonality
    }

    pub fn enable_rotation(&self) -> bool {
        self.enable_rotation
    }

    pub fn enable_translation(&self) -> bool {
        self.enable_translation
    }

    /// Turning orthogonality on squares up normals skewed while it was off.
    /// Returns whether the cursor changed.
    pub fn set_keep_orthogonality(&mut self, keep_orthogonality: bool) -> bool {
        let was_kept = self.keep_orthogonality;
        self.keep_orthogonality = keep_orthogonality;
        if !keep_orthogonality || was_kept {
            return false;
        }
        match Self::orthonormalized(&self.normals) {
            Some(normals) => self.update(normals, self.center),
            None => {
                warn!("Cannot square up degenerate cursor normals, restoring defaults");
                self.update(self.initial_normals, self.center)
            }
        }
    }

    pub fn set_enable_rotation(&mut self, enable_rotation: bool) {
        self.enable_rotation = enable_rotation;
    }

    pub fn set_enable_translation(&mut self, enable_translation: bool) {
        self.enable_translation = enable_translation;
    }

    /// Moves the center, clamped into the image bounds. Returns whether the
    /// cursor changed.
    pub fn set_center(&mut self, center: Point3<f64>) -> bool {
        self.update(self.normals, self.bounds.clamp(&center))
    }

    /// Restores the normals captured at construction and recenters the
    /// cursor on the image. Interaction flags are left untouched.
    pub fn reset(&mut self) -> bool {
        info!("Resetting reslice cursor to image center");
        self.update(self.initial_normals, self.bounds.center())
    }

    /// Applies one interaction on the plane shown by `plane`.
    ///
    /// Disabled interaction classes are dropped from `delta`. A rotation that
    /// would leave the cursor degenerate is discarded and reported through
    /// [`InteractionResult::anomaly`]; its translation still applies.
    pub fn apply_interaction(
        &mut self,
        plane: ViewType,
        delta: &DeltaTransform,
    ) -> Result<InteractionResult, ResliceCursorError> {
        let active = plane
            .plane_index()
            .ok_or(ResliceCursorError::InvalidView(plane))?;

        let mut normals = self.normals;
        let mut anomaly = None;
        let mut rotated = false;
        if let Some(rotation) = delta.rotation.filter(|_| self.enable_rotation) {
            match self.rotated_normals(active, &rotation) {
                Ok(new_normals) => {
                    rotated = delta.kind() == InteractionKind::Rotation;
                    normals = new_normals;
                }
                Err(degenerate) => {
                    warn!("Ignoring rotation of {plane} plane: {degenerate}");
                    anomaly = Some(degenerate);
                }
            }
        }

        let mut center = self.center;
        if self.enable_translation {
            center = self.bounds.clamp(&(center + delta.translation));
        }

        let modified = self.update(normals, center);
        if modified {
            debug!("Cursor moved by {plane} interaction, center {:?}", self.center);
        }
        let state = self.planes[active];
        Ok(InteractionResult {
            modified,
            origin: state.origin,
            point1: state.point1,
            point2: state.point2,
            rotated,
            anomaly,
        })
    }

    /// Point shared by the three planes, `None` if they do not meet in one.
    pub fn intersection(&self) -> Option<Point3<f64>> {
        let rows = Matrix3::from_rows(&[
            self.planes[0].normal.transpose(),
            self.planes[1].normal.transpose(),
            self.planes[2].normal.transpose(),
        ]);
        let offsets = Vector3::from_fn(|i, _| {
            self.planes[i].normal.dot(&self.planes[i].origin.coords)
        });
        rows.try_inverse()
            .map(|inverse| Point3::from(inverse * offsets))
    }

    fn rotated_normals(
        &self,
        active: usize,
        rotation: &UnitQuaternion<f64>,
    ) -> Result<[Vector3<f64>; 3], GeometryAnomaly> {
        let plane = ViewType::ORTHOGONAL[active];
        let normal = (rotation * self.normals[active]).normalize();
        let next = (active + 1) % 3;
        let previous = (active + 2) % 3;
        let mut normals = self.normals;

        if self.keep_orthogonality {
            // The next plane's normal anchors the basis; the third one closes
            // it so that n[i] x n[i + 1] = n[i + 2] still holds.
            let reference = self.normals[next];
            let projected = reference - normal * reference.dot(&normal);
            if projected.norm() <= PARALLEL_TOLERANCE {
                return Err(GeometryAnomaly::ParallelToReference {
                    plane,
                    reference: ViewType::ORTHOGONAL[next],
                });
            }
            let next_normal = projected.normalize();
            normals[active] = normal;
            normals[next] = next_normal;
            normals[previous] = normal.cross(&next_normal);
        } else {
            for other in [next, previous] {
                if normal.cross(&self.normals[other]).norm() <= PARALLEL_TOLERANCE {
                    return Err(GeometryAnomaly::ParallelToReference {
                        plane,
                        reference: ViewType::ORTHOGONAL[other],
                    });
                }
            }
            normals[active] = normal;
            let volume = normals[0].dot(&normals[1].cross(&normals[2]));
            if volume.abs() <= PARALLEL_TOLERANCE {
                return Err(GeometryAnomaly::DegenerateBasis { plane });
            }
        }
        Ok(normals)
    }

    /// Gram-Schmidt anchored on the axial normal. The sagittal normal is
    /// squared against it, or the coronal one if the sagittal is parallel.
    fn orthonormalized(normals: &[Vector3<f64>; 3]) -> Option<[Vector3<f64>; 3]> {
        let [sagittal, coronal, axial] = *normals;
        let axial = axial.try_normalize(TOLERANCE)?;
        let project = |v: Vector3<f64>| (v - axial * v.dot(&axial)).try_normalize(PARALLEL_TOLERANCE);
        if let Some(sagittal) = project(sagittal) {
            return Some([sagittal, axial.cross(&sagittal), axial]);
        }
        let coronal = project(coronal)?;
        Some([coronal.cross(&axial), coronal, axial])
    }

    fn update(&mut self, normals: [Vector3<f64>; 3], center: Point3<f64>) -> bool {
        let planes = Self::build_planes(&normals, &center, self.half_size);
        let modified = planes
            .iter()
            .zip(self.planes.iter())
            .any(|(new, old)| !new.approx_eq(old));
        if modified {
            self.normals = normals;
            self.center = center;
            self.planes = planes;
        }
        modified
    }

    fn build_planes(
        normals: &[Vector3<f64>; 3],
        center: &Point3<f64>,
        half_size: f64,
    ) -> [PlaneState; 3] {
        std::array::from_fn(|k| {
            let normal = normals[k];
            let next = normals[(k + 1) % 3];
            let axis = (next - normal * next.dot(&normal)).normalize();
            PlaneState::centered(center, &normal, &axis, half_size)
        })
    }
}
