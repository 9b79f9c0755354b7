//! Fans cursor interactions out to every view and coalesces redraws.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};
use nalgebra::Vector2;

use crate::camera::{CameraSynchronizer, SyncOptions};
use crate::cursor::{CursorModel, DeltaTransform, InteractionResult};
use crate::enums::{FocalPointPolicy, InteractionKind, SlabMode, ViewType};
use crate::error::ResliceCursorError;
use crate::image_data::ImageData;
use crate::plane_updater::{PlaneUpdate, ReslicePlaneUpdater};
use crate::settings::{ResliceSettings, validate_slab_slices};
use crate::view::ViewContext;

/// Redraw trigger of the rendering collaborator.
pub trait RenderTarget {
    fn render(&mut self, view: &ViewContext, image: &ImageData);
}

/// A user interaction editing one cursor plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionEvent {
    /// Plane being edited.
    pub plane: ViewType,
    pub delta: DeltaTransform,
}

impl InteractionEvent {
    pub fn new(plane: ViewType, delta: DeltaTransform) -> Self {
        Self { plane, delta }
    }

    pub fn kind(&self) -> InteractionKind {
        self.delta.kind()
    }
}

/// What one event turn did to the views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionReport {
    pub cursor: Option<InteractionResult>,
    pub plane_updates: Vec<PlaneUpdate>,
    pub camera_syncs: Vec<(ViewType, FocalPointPolicy)>,
    /// Views redrawn, each at most once.
    pub redrawn: Vec<ViewType>,
}

impl InteractionReport {
    pub fn modified(&self) -> bool {
        self.cursor.is_some_and(|result| result.modified)
            || self.plane_updates.iter().any(|update| update.modified)
    }
}

pub struct ViewCoordinator<R: RenderTarget> {
    image: Arc<ImageData>,
    cursor: CursorModel,
    views: [ViewContext; 5],
    settings: ResliceSettings,
    renderer: R,
}

impl<R: RenderTarget> ViewCoordinator<R> {
    /// Builds the session for `image` and performs the initial framing of
    /// every view.
    ///
    /// # Errors
    ///
    /// Returns [`ResliceCursorError::InvalidSlabSlices`] if `settings` asks for
    /// an empty slab.
    pub fn new(
        image: Arc<ImageData>,
        settings: ResliceSettings,
        renderer: R,
    ) -> Result<Self, ResliceCursorError> {
        let settings = settings.validated(image.max_slab_slices())?;
        let cursor = CursorModel::new(&image, &settings);
        let views = ViewType::ALL.map(|view_type| ViewContext::new(view_type, &settings));
        let mut coordinator = Self {
            image,
            cursor,
            views,
            settings,
            renderer,
        };
        coordinator.update_views()?;
        let bounds = coordinator.cursor.bounds();
        let volume = &mut coordinator.views[ViewType::Volume.index()];
        volume.camera.reset_to_bounds(&bounds);
        coordinator.redraw(ViewType::Volume);
        Ok(coordinator)
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }

    pub fn cursor(&self) -> &CursorModel {
        &self.cursor
    }

    pub fn settings(&self) -> &ResliceSettings {
        &self.settings
    }

    pub fn view(&self, view_type: ViewType) -> &ViewContext {
        &self.views[view_type.index()]
    }

    /// Looks a view up by panel index.
    pub fn view_at(&self, index: usize) -> Result<&ViewContext, ResliceCursorError> {
        ViewType::try_from(index).map(|view_type| self.view(view_type))
    }

    pub fn views(&self) -> &[ViewContext; 5] {
        &self.views
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Processes one interaction that happened in `source`.
    ///
    /// Every orthogonal view except `source` pulls its new plane and re-frames
    /// its camera. The source view only receives its new plane and, when that
    /// plane changed, turns its camera onto it while keeping the focal point
    /// under the pointer. Each dirty view is redrawn once.
    pub fn on_interaction(
        &mut self,
        source: ViewType,
        event: &InteractionEvent,
    ) -> Result<InteractionReport, ResliceCursorError> {
        for view in self.views.iter_mut() {
            view.set_active(view.view_type() == source);
        }

        let result = self.cursor.apply_interaction(event.plane, &event.delta)?;
        let policy = if result.rotated {
            FocalPointPolicy::RecomputeOffset
        } else {
            FocalPointPolicy::KeepOffset
        };

        let mut report = InteractionReport {
            cursor: Some(result),
            ..Default::default()
        };
        let mut dirty = self.propagate(Some(source), policy, &mut report)?;
        if result.modified || !dirty.is_empty() {
            dirty.insert(ViewType::Overview3D);
            dirty.insert(source);
        }
        debug!(
            "{:?} of {} plane from {source} view, redrawing {dirty:?}",
            event.kind(),
            event.plane
        );
        self.redraw_all(dirty, &mut report);
        Ok(report)
    }

    /// Restores the cursor to its startup state and re-frames every view.
    pub fn reset_all(&mut self) -> Result<InteractionReport, ResliceCursorError> {
        let modified = self.cursor.reset();
        let mut report = self.update_views()?;
        let bounds = self.cursor.bounds();
        self.views[ViewType::Volume.index()]
            .camera
            .reset_to_bounds(&bounds);
        self.redraw(ViewType::Volume);
        report.redrawn.push(ViewType::Volume);
        info!("Reset all views, cursor modified: {modified}");
        Ok(report)
    }

    /// Pans the camera of `view_type` by `offset` along its screen right and
    /// up axes. The offset is kept by later translations of the cursor.
    pub fn pan(&mut self, view_type: ViewType, offset: Vector2<f64>) {
        self.views[view_type.index()].pan(offset);
        self.redraw(view_type);
    }

    /// Switching orthogonality back on squares up the cursor and re-frames
    /// the views whose plane moved.
    pub fn set_keep_orthogonality(
        &mut self,
        keep_orthogonality: bool,
    ) -> Result<InteractionReport, ResliceCursorError> {
        self.settings.keep_orthogonality = keep_orthogonality;
        let modified = self.cursor.set_keep_orthogonality(keep_orthogonality);
        info!("Keep orthogonality: {keep_orthogonality}");

        let mut report = InteractionReport::default();
        if modified {
            let mut dirty =
                self.propagate(None, FocalPointPolicy::RecomputeOffset, &mut report)?;
            dirty.insert(ViewType::Overview3D);
            self.redraw_all(dirty, &mut report);
        }
        Ok(report)
    }

    pub fn set_enable_rotation(&mut self, enable_rotation: bool) {
        self.settings.enable_rotation = enable_rotation;
        self.cursor.set_enable_rotation(enable_rotation);
        info!("Rotation enabled: {enable_rotation}");
    }

    pub fn set_enable_translation(&mut self, enable_translation: bool) {
        self.settings.enable_translation = enable_translation;
        self.cursor.set_enable_translation(enable_translation);
        info!("Translation enabled: {enable_translation}");
    }

    /// Changes the slab aggregation of every 2D view and refreshes them.
    pub fn set_slab_mode(
        &mut self,
        slab_mode: SlabMode,
    ) -> Result<InteractionReport, ResliceCursorError> {
        self.settings.slab_mode = slab_mode;
        for slicing in self.views.iter_mut().filter_map(ViewContext::slicing_mut) {
            slicing.set_slab_mode(slab_mode);
        }
        info!("Slab mode: {slab_mode:?}");
        self.update_views()
    }

    /// Changes the slab thickness of every 2D view and refreshes them.
    /// Counts beyond the image size are clamped.
    pub fn set_slab_number_of_slices(
        &mut self,
        slices: usize,
    ) -> Result<InteractionReport, ResliceCursorError> {
        let slices = validate_slab_slices(slices, self.image.max_slab_slices())?;
        self.settings.slab_number_of_slices = slices;
        for slicing in self.views.iter_mut().filter_map(ViewContext::slicing_mut) {
            slicing.set_slab_number_of_slices(slices);
        }
        info!("Slab thickness: {slices} slices");
        self.update_views()
    }

    /// Full refresh: every 2D view is re-centered with a fresh view-up, all of
    /// them are redrawn, and the 3D overview is framed on the image again.
    fn update_views(&mut self) -> Result<InteractionReport, ResliceCursorError> {
        let options = SyncOptions::new(FocalPointPolicy::ResetFocalPoint).with_reset_view_up(true);
        let mut report = InteractionReport::default();
        for view_type in ViewType::ORTHOGONAL {
            let view = &mut self.views[view_type.index()];
            let update = ReslicePlaneUpdater::update(&self.cursor, view)?;
            CameraSynchronizer::sync(&self.cursor, view, options)?;
            report.plane_updates.push(update);
            report.camera_syncs.push((view_type, options.policy));
            self.redraw(view_type);
            report.redrawn.push(view_type);
        }
        let bounds = self.cursor.bounds();
        self.views[ViewType::Overview3D.index()]
            .camera
            .reset_to_bounds(&bounds);
        self.redraw(ViewType::Overview3D);
        report.redrawn.push(ViewType::Overview3D);
        Ok(report)
    }

    /// Pushes the cursor planes into the orthogonal views and returns the
    /// views that changed. `source` gets its plane without the updater round
    /// trip.
    fn propagate(
        &mut self,
        source: Option<ViewType>,
        policy: FocalPointPolicy,
        report: &mut InteractionReport,
    ) -> Result<BTreeSet<ViewType>, ResliceCursorError> {
        let mut dirty = BTreeSet::new();
        for view_type in ViewType::ORTHOGONAL {
            let view = &mut self.views[view_type.index()];
            if Some(view_type) == source {
                let plane = self.cursor.plane(view_type)?;
                if view.slicing_mut().is_some_and(|slicing| slicing.set_plane(&plane)) {
                    let own = FocalPointPolicy::RecomputeOffset;
                    CameraSynchronizer::sync(&self.cursor, view, SyncOptions::new(own))?;
                    report.camera_syncs.push((view_type, own));
                    dirty.insert(view_type);
                }
                continue;
            }
            let update = ReslicePlaneUpdater::update(&self.cursor, view)?;
            CameraSynchronizer::sync(&self.cursor, view, SyncOptions::new(policy))?;
            report.camera_syncs.push((view_type, policy));
            if update.modified {
                dirty.insert(view_type);
            }
            report.plane_updates.push(update);
        }
        Ok(dirty)
    }

    fn redraw_all(&mut self, dirty: BTreeSet<ViewType>, report: &mut InteractionReport) {
        for view_type in dirty {
            self.redraw(view_type);
            report.redrawn.push(view_type);
        }
    }

    fn redraw(&mut self, view_type: ViewType) {
        self.renderer
            .render(&self.views[view_type.index()], &self.image);
    }
}
