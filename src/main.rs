use std::f64::consts::PI;
use std::sync::Arc;

use log::{LevelFilter, info, warn};
use nalgebra::Vector3;
use reslice_cursor::{
    DeltaTransform, ImageData, InteractionEvent, RenderTarget, ResliceSettings, Reslicer,
    SlabMode, ViewContext, ViewCoordinator, ViewType,
};

/// Writes every redrawn 2D view as `<view>.png`.
struct PngWriter;

impl RenderTarget for PngWriter {
    fn render(&mut self, view: &ViewContext, image: &ImageData) {
        let Some(slicing) = view.slicing() else {
            return;
        };
        let range = Reslicer::output_range(image, slicing);
        let Some(picture) =
            Reslicer::reslice(image, slicing).and_then(|slice| Reslicer::to_image(&slice, range))
        else {
            warn!("Nothing to draw for {} view", view.view_type());
            return;
        };
        let path = format!("{}.png", view.view_type());
        match picture.save(&path) {
            Ok(()) => info!("Wrote {path}"),
            Err(err) => warn!("Could not write {path}: {err}"),
        }
    }
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("should have installed logger");

    let image = ImageData::synthetic((64, 64, 64), 1.0).expect("should have built image");
    let settings = ResliceSettings::new().with_slab_mode(SlabMode::Max);
    let mut coordinator = ViewCoordinator::new(Arc::new(image), settings, PngWriter)
        .expect("should have framed all views");

    let translate = InteractionEvent::new(
        ViewType::Sagittal,
        DeltaTransform::translation(Vector3::new(8.0, 0.0, 0.0)),
    );
    coordinator
        .on_interaction(ViewType::Axial, &translate)
        .expect("sagittal is a cursor plane");

    let rotate = InteractionEvent::new(
        ViewType::Coronal,
        DeltaTransform::rotation_about(&Vector3::z(), PI / 8.0),
    );
    coordinator
        .on_interaction(ViewType::Axial, &rotate)
        .expect("coronal is a cursor plane");

    coordinator
        .set_slab_number_of_slices(5)
        .expect("slab should fit the image");
}
