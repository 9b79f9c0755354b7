use nalgebra::Vector2;

use crate::camera::Camera;
use crate::enums::{SlabMode, ViewType};
use crate::geometry::{PlaneState, ResliceAxes};
use crate::settings::ResliceSettings;

/// Slicing stage of a 2D view: the plane it cuts and how slabs are
/// aggregated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceTransform {
    plane: Option<PlaneState>,
    axes: Option<ResliceAxes>,
    slab_mode: SlabMode,
    slab_number_of_slices: usize,
}

impl SliceTransform {
    pub fn new(slab_mode: SlabMode, slab_number_of_slices: usize) -> Self {
        Self {
            plane: None,
            axes: None,
            slab_mode,
            slab_number_of_slices,
        }
    }

    pub fn plane(&self) -> Option<&PlaneState> {
        self.plane.as_ref()
    }

    pub fn axes(&self) -> Option<&ResliceAxes> {
        self.axes.as_ref()
    }

    pub fn slab_mode(&self) -> SlabMode {
        self.slab_mode
    }

    pub fn slab_number_of_slices(&self) -> usize {
        self.slab_number_of_slices
    }

    /// Replaces the cut plane. Returns `false` if `plane` matches the current
    /// one within tolerance, in which case nothing is written.
    pub fn set_plane(&mut self, plane: &PlaneState) -> bool {
        if self.plane.is_some_and(|current| current.approx_eq(plane)) {
            return false;
        }
        self.plane = Some(*plane);
        self.axes = Some(ResliceAxes::from_plane(plane));
        true
    }

    pub fn set_slab_mode(&mut self, slab_mode: SlabMode) -> bool {
        let modified = self.slab_mode != slab_mode;
        self.slab_mode = slab_mode;
        modified
    }

    pub fn set_slab_number_of_slices(&mut self, slices: usize) -> bool {
        let modified = self.slab_number_of_slices != slices;
        self.slab_number_of_slices = slices;
        modified
    }
}

/// One rendered panel.
#[derive(Clone, Debug)]
pub struct ViewContext {
    view_type: ViewType,
    pub camera: Camera,
    slicing: Option<SliceTransform>,
    /// On-screen offset `(right, up)` from the cursor center to the focal
    /// point, in world units.
    focal_point_offset: Option<Vector2<f64>>,
    active: bool,
}

impl ViewContext {
    pub fn new(view_type: ViewType, settings: &ResliceSettings) -> Self {
        let slicing = view_type.is_orthogonal().then(|| {
            SliceTransform::new(settings.slab_mode, settings.slab_number_of_slices)
        });
        Self {
            view_type,
            camera: Camera::new(view_type != ViewType::Volume),
            slicing,
            focal_point_offset: None,
            active: false,
        }
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn slicing(&self) -> Option<&SliceTransform> {
        self.slicing.as_ref()
    }

    pub fn slicing_mut(&mut self) -> Option<&mut SliceTransform> {
        self.slicing.as_mut()
    }

    pub fn focal_point_offset(&self) -> Option<Vector2<f64>> {
        self.focal_point_offset
    }

    pub(crate) fn set_focal_point_offset(&mut self, offset: Vector2<f64>) {
        self.focal_point_offset = Some(offset);
    }

    /// Shifts the camera by `offset` along its screen right and up axes.
    /// Views showing a cursor plane remember the shift for later
    /// translations.
    pub fn pan(&mut self, offset: Vector2<f64>) {
        let shift = self.camera.right() * offset.x + self.camera.view_up * offset.y;
        self.camera.focal_point += shift;
        self.camera.position += shift;
        if self.slicing.is_some() {
            let previous = self.focal_point_offset.unwrap_or_else(Vector2::zeros);
            self.focal_point_offset = Some(previous + offset);
        }
    }

    /// Whether this view received the interaction being processed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
