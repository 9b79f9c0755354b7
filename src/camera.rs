//! Camera framing of the views and its synchronization with the cursor.

use log::{debug, warn};
use nalgebra::{Point3, Vector2, Vector3};

use crate::cursor::CursorModel;
use crate::enums::{FocalPointPolicy, ViewType};
use crate::error::ResliceCursorError;
use crate::geometry::{Bounds, TOLERANCE};
use crate::view::ViewContext;

/// Half of the default perspective view angle, in degrees.
const HALF_VIEW_ANGLE: f64 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub focal_point: Point3<f64>,
    pub view_up: Vector3<f64>,
    /// Half of the world height shown by a parallel projection.
    pub parallel_scale: f64,
    pub parallel_projection: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Camera {
    pub fn new(parallel_projection: bool) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            focal_point: Point3::origin(),
            view_up: Vector3::y(),
            parallel_scale: 1.0,
            parallel_projection,
        }
    }

    pub fn distance(&self) -> f64 {
        (self.focal_point - self.position).norm()
    }

    /// Unit vector from the position towards the focal point.
    pub fn direction_of_projection(&self) -> Vector3<f64> {
        (self.focal_point - self.position).normalize()
    }

    /// Screen-right direction.
    pub fn right(&self) -> Vector3<f64> {
        self.direction_of_projection().cross(&self.view_up).normalize()
    }

    /// Frames `bounds` while keeping the current viewing direction.
    pub fn reset_to_bounds(&mut self, bounds: &Bounds) {
        let radius = (bounds.diagonal() * 0.5).max(TOLERANCE);
        let direction = self.direction_of_projection();
        let distance = radius / HALF_VIEW_ANGLE.to_radians().sin();
        self.focal_point = bounds.center();
        self.position = self.focal_point - direction * distance;
        self.parallel_scale = radius;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncOptions {
    pub policy: FocalPointPolicy,
    /// Take the view-up from the image bounding box instead of carrying the
    /// previous one over.
    pub reset_view_up: bool,
}

impl SyncOptions {
    pub fn new(policy: FocalPointPolicy) -> Self {
        Self {
            policy,
            reset_view_up: false,
        }
    }

    pub fn with_reset_view_up(mut self, reset_view_up: bool) -> Self {
        self.reset_view_up = reset_view_up;
        self
    }
}

pub struct CameraSynchronizer;

impl CameraSynchronizer {
    /// Re-frames the camera of `view` on its cursor plane.
    ///
    /// The camera looks along the negated plane normal. Only `view` is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`ResliceCursorError::InvalidView`] if `view` shows no cursor
    /// plane.
    pub fn sync(
        cursor: &CursorModel,
        view: &mut ViewContext,
        options: SyncOptions,
    ) -> Result<(), ResliceCursorError> {
        let view_type = view.view_type();
        let plane = cursor.plane(view_type)?;
        let normal = plane.normal;
        let center = cursor.center();
        let bounds = cursor.bounds();
        let mut camera = view.camera;

        let view_up = if options.reset_view_up {
            Self::image_view_up(view_type, &normal)
        } else {
            let previous = camera.view_up;
            let projected = previous - normal * previous.dot(&normal);
            match projected.try_normalize(TOLERANCE) {
                Some(view_up) => view_up,
                None => {
                    warn!("View-up of {view_type} view is parallel to its plane normal, resetting it");
                    Self::image_view_up(view_type, &normal)
                }
            }
        };
        let right = (-normal).cross(&view_up);

        let focal_point = match options.policy {
            FocalPointPolicy::ResetFocalPoint => {
                view.set_focal_point_offset(Vector2::zeros());
                center
            }
            FocalPointPolicy::KeepOffset => {
                let offset = view.focal_point_offset().unwrap_or_else(Vector2::zeros);
                center + right * offset.x + view_up * offset.y
            }
            FocalPointPolicy::RecomputeOffset => {
                let previous = camera.focal_point;
                let on_plane = previous - normal * normal.dot(&(previous - center));
                let offset = on_plane - center;
                view.set_focal_point_offset(Vector2::new(offset.dot(&right), offset.dot(&view_up)));
                on_plane
            }
        };

        let distance = match options.policy {
            FocalPointPolicy::ResetFocalPoint => bounds.diagonal().max(1.0),
            _ if camera.distance() > TOLERANCE => camera.distance(),
            _ => bounds.diagonal().max(1.0),
        };

        camera.focal_point = focal_point;
        camera.position = focal_point + normal * distance;
        camera.view_up = view_up;
        if options.policy == FocalPointPolicy::ResetFocalPoint {
            camera.parallel_scale = Self::fit_scale(&bounds, &center, &right, &view_up);
        }
        view.camera = camera;

        debug!(
            "Synced {view_type} camera with {:?}, focal point {:?}",
            options.policy, camera.focal_point
        );
        Ok(())
    }

    /// View-up taken from the image bounding box axes: superior for the
    /// sagittal and coronal views, anterior-posterior for the axial view.
    fn image_view_up(view_type: ViewType, normal: &Vector3<f64>) -> Vector3<f64> {
        let preferred = match view_type {
            ViewType::Axial => Vector3::y(),
            _ => Vector3::z(),
        };
        let project = |axis: Vector3<f64>| (axis - normal * axis.dot(normal)).try_normalize(1e-3);
        project(preferred).unwrap_or_else(|| {
            // Fall back to the box axis least aligned with the normal.
            let axis = [Vector3::x(), Vector3::y(), Vector3::z()]
                .into_iter()
                .min_by(|a, b| a.dot(normal).abs().total_cmp(&b.dot(normal).abs()))
                .unwrap_or_else(Vector3::x);
            project(axis).unwrap_or(axis)
        })
    }

    /// Parallel scale showing the whole image around `center`.
    fn fit_scale(
        bounds: &Bounds,
        center: &Point3<f64>,
        right: &Vector3<f64>,
        up: &Vector3<f64>,
    ) -> f64 {
        bounds
            .corners()
            .iter()
            .map(|corner| {
                let offset = corner - center;
                offset.dot(right).abs().max(offset.dot(up).abs())
            })
            .fold(TOLERANCE, f64::max)
    }
}
