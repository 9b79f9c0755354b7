use log::debug;

use crate::cursor::CursorModel;
use crate::enums::ViewType;
use crate::error::ResliceCursorError;
use crate::geometry::{PlaneState, ResliceAxes};
use crate::view::ViewContext;

/// Result of pushing the cursor plane of one view into its slicing stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneUpdate {
    pub view: ViewType,
    /// Whether the view's slicing transform changed.
    pub modified: bool,
    pub plane: PlaneState,
    pub axes: ResliceAxes,
}

pub struct ReslicePlaneUpdater;

impl ReslicePlaneUpdater {
    /// Pulls the cursor plane shown by `view` and applies it to the view's
    /// slicing transform.
    ///
    /// Calling this again without a cursor change reports
    /// `modified == false`.
    ///
    /// # Errors
    ///
    /// Returns [`ResliceCursorError::InvalidView`] if `view` is not one of the
    /// three orthogonal views.
    pub fn update(
        cursor: &CursorModel,
        view: &mut ViewContext,
    ) -> Result<PlaneUpdate, ResliceCursorError> {
        let view_type = view.view_type();
        let plane = cursor.plane(view_type)?;
        let slicing = view
            .slicing_mut()
            .ok_or(ResliceCursorError::InvalidView(view_type))?;
        let modified = slicing.set_plane(&plane);
        if modified {
            debug!("Updated {view_type} reslice plane, origin {:?}", plane.origin);
        }
        Ok(PlaneUpdate {
            view: view_type,
            modified,
            plane,
            axes: ResliceAxes::from_plane(&plane),
        })
    }
}
