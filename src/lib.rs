//! # Reslice-cursor library
//!
//! This crate keeps the three orthogonal views of a multi-planar
//! reconstruction (MPR) viewer in sync.

//!
//! A reslice cursor is made of three cutting planes (sagittal, coronal and
//! axial) meeting in a shared center. Dragging or rotating one plane in any
//! view moves the cursor, and every other view has to pick up its new cutting
//! plane and re-frame its camera:
//!  - [`CursorModel`] owns the planes and keeps them consistent, optionally
//!    mutually perpendicular
//!  - [`ReslicePlaneUpdater`] turns a cursor plane into the slicing transform
//!    of a view and tells whether it changed
//!  - [`CameraSynchronizer`] recomputes focal point, view-up and parallel
//!    scale of a 2D view
//!  - [`ViewCoordinator`] fans an interaction out to the views and redraws
//!    each changed view once
//!
//!  Rendering is left to the caller through [`RenderTarget`]. A CPU
//!  [`Reslicer`] with MIN/MAX/MEAN/SUM slab aggregation is included for
//!  producing the 2D images.
//!
//!  Everything runs on the caller's thread: one event is processed to
//!  completion before the next one.
//!
//! # Examples
//!
//! ## Dragging the sagittal plane from the axial view
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use nalgebra::Vector3;
//! # use reslice_cursor::{
//! #     DeltaTransform, ImageData, InteractionEvent, RenderTarget, ResliceSettings, ViewContext,
//! #     ViewCoordinator, ViewType,
//! # };
//! struct Screen;
//!
//! impl RenderTarget for Screen {
//!     fn render(&mut self, view: &ViewContext, _image: &ImageData) {
//!         println!("redraw {}", view.view_type());
//!     }
//! }
//!
//! let image = ImageData::synthetic((128, 128, 128), 0.1).expect("should have built image");
//! let mut coordinator = ViewCoordinator::new(Arc::new(image), ResliceSettings::default(), Screen)
//!     .expect("should have framed all views");
//! let event = InteractionEvent::new(
//!     ViewType::Sagittal,
//!     DeltaTransform::translation(Vector3::new(0.5, 0.0, 0.0)),
//! );
//! coordinator
//!     .on_interaction(ViewType::Axial, &event)
//!     .expect("sagittal is a cursor plane");
//! ```

pub mod camera;
pub mod coordinator;
pub mod cursor;
pub mod enums;
pub mod error;
pub mod geometry;
pub mod image_data;
mod interpolator;
pub mod plane_updater;
pub mod reslicer;
pub mod settings;
pub mod view;

pub use camera::{Camera, CameraSynchronizer, SyncOptions};
pub use coordinator::{InteractionEvent, InteractionReport, RenderTarget, ViewCoordinator};
pub use cursor::{CursorModel, DeltaTransform, GeometryAnomaly, InteractionResult};
pub use enums::{FocalPointPolicy, InteractionKind, SlabMode, ViewType};
pub use error::ResliceCursorError;
pub use geometry::{Bounds, PlaneState, ResliceAxes, TOLERANCE};
pub use image_data::ImageData;
pub use plane_updater::{PlaneUpdate, ReslicePlaneUpdater};
pub use reslicer::Reslicer;
pub use settings::ResliceSettings;
pub use view::{SliceTransform, ViewContext};
