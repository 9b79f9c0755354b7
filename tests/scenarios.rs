use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use reslice_cursor::{
    CursorModel, DeltaTransform, FocalPointPolicy, GeometryAnomaly, ImageData, InteractionEvent,
    RenderTarget, ReslicePlaneUpdater, ResliceSettings, ViewContext, ViewCoordinator, ViewType,
};

const TOLERANCE: f64 = 1e-9;

#[derive(Default)]
struct Recorder {
    frames: Vec<ViewType>,
}

impl RenderTarget for Recorder {
    fn render(&mut self, view: &ViewContext, _image: &ImageData) {
        self.frames.push(view.view_type());
    }
}

/// 101^3 unit-spaced voxels, centered at (50, 50, 50).
fn image() -> Arc<ImageData> {
    Arc::new(ImageData::synthetic((101, 101, 101), 1.0).expect("should have built image"))
}

fn coordinator(settings: ResliceSettings) -> ViewCoordinator<Recorder> {
    ViewCoordinator::new(image(), settings, Recorder::default())
        .expect("should have framed all views")
}

fn close(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    (a - b).norm() < TOLERANCE
}

#[test]
fn translating_sagittal_shifts_other_planes() {
    let image = image();
    let settings = ResliceSettings::default();
    let mut cursor = CursorModel::new(&image, &settings);
    let mut views = ViewType::ORTHOGONAL.map(|view_type| ViewContext::new(view_type, &settings));
    for view in views.iter_mut() {
        ReslicePlaneUpdater::update(&cursor, view).unwrap();
    }
    let before = *cursor.planes();
    assert_eq!(cursor.center(), Point3::new(50.0, 50.0, 50.0));

    let result = cursor
        .apply_interaction(
            ViewType::Sagittal,
            &DeltaTransform::translation(Vector3::new(5.0, 0.0, 0.0)),
        )
        .unwrap();
    assert!(result.modified);

    for (view, old) in views.iter_mut().zip(before.iter()) {
        let update = ReslicePlaneUpdater::update(&cursor, view).unwrap();
        assert!(update.modified, "{} plane should have moved", update.view);
        assert!(close(&(update.plane.origin - old.origin), &Vector3::new(5.0, 0.0, 0.0)));
        assert_eq!(update.plane.normal, old.normal);
    }
}

#[test]
fn tilting_axial_rebuilds_orthonormal_basis() {
    let mut coordinator = coordinator(ResliceSettings::default());
    let tilted = Vector3::new(0.0, 0.1, 0.995).normalize();
    let delta = DeltaTransform::rotate_normal(&Vector3::z(), &tilted).unwrap();
    let report = coordinator
        .on_interaction(ViewType::Axial, &InteractionEvent::new(ViewType::Axial, delta))
        .unwrap();

    let [sagittal, coronal, axial] = *coordinator.cursor().normals();
    assert!(close(&axial, &tilted));
    assert!(sagittal.dot(&coronal).abs() < TOLERANCE);
    assert!(sagittal.dot(&axial).abs() < TOLERANCE);
    assert!(coronal.dot(&axial).abs() < TOLERANCE);
    assert!(close(&sagittal.cross(&coronal), &axial));
    assert!(!close(&coronal, &Vector3::y()));

    assert_eq!(
        report.camera_syncs,
        vec![
            (ViewType::Sagittal, FocalPointPolicy::RecomputeOffset),
            (ViewType::Coronal, FocalPointPolicy::RecomputeOffset),
            (ViewType::Axial, FocalPointPolicy::RecomputeOffset),
        ]
    );

    // Every view, the tilted one included, now looks straight at its plane.
    for view_type in ViewType::ORTHOGONAL {
        let normal = coordinator.cursor().plane(view_type).unwrap().normal;
        let camera = coordinator.view(view_type).camera;
        assert!(
            close(&camera.direction_of_projection(), &-normal),
            "{view_type} camera does not face its plane"
        );
    }
    let axial_camera = coordinator.view(ViewType::Axial).camera;
    assert!(close(&(axial_camera.focal_point - Point3::new(50.0, 50.0, 50.0)), &Vector3::zeros()));
}

#[test]
fn disabled_translation_changes_nothing() {
    let mut coordinator = coordinator(ResliceSettings::new().with_enable_translation(false));
    let before = *coordinator.cursor().planes();
    let event = InteractionEvent::new(
        ViewType::Coronal,
        DeltaTransform::translation(Vector3::new(0.0, 7.0, 0.0)),
    );
    let report = coordinator.on_interaction(ViewType::Axial, &event).unwrap();
    assert!(!report.modified());
    assert!(!report.cursor.unwrap().modified);
    assert_eq!(&before, coordinator.cursor().planes());
}

#[test]
fn degenerate_rotation_falls_back_with_anomaly() {
    let mut coordinator = coordinator(ResliceSettings::default());
    let before = *coordinator.cursor().normals();
    coordinator.renderer_mut().frames.clear();
    let delta = DeltaTransform::rotate_normal(&Vector3::z(), &Vector3::x()).unwrap();
    let report = coordinator
        .on_interaction(ViewType::Coronal, &InteractionEvent::new(ViewType::Axial, delta))
        .expect("degenerate rotation is not an error");

    let result = report.cursor.unwrap();
    assert!(!result.modified);
    assert_eq!(
        result.anomaly,
        Some(GeometryAnomaly::ParallelToReference {
            plane: ViewType::Axial,
            reference: ViewType::Sagittal,
        })
    );
    assert_eq!(&before, coordinator.cursor().normals());
    assert!(report.redrawn.is_empty());
    assert!(coordinator.renderer().frames.is_empty());
}

#[test]
fn plane_update_is_idempotent() {
    let mut coordinator = coordinator(ResliceSettings::default());
    let event = InteractionEvent::new(
        ViewType::Axial,
        DeltaTransform::rotation_about(&Vector3::x(), 0.25),
    );
    coordinator.on_interaction(ViewType::Sagittal, &event).unwrap();

    let cursor = coordinator.cursor().clone();
    let mut view = coordinator.view(ViewType::Coronal).clone();
    let again = ReslicePlaneUpdater::update(&cursor, &mut view).unwrap();
    assert!(!again.modified);
}

#[test]
fn source_view_is_never_updated_by_its_own_interaction() {
    let mut coordinator = coordinator(ResliceSettings::default());
    let deltas = [
        DeltaTransform::translation(Vector3::new(1.0, -2.0, 3.0)),
        DeltaTransform::rotation_about(&Vector3::new(1.0, 1.0, 0.0), 0.1),
    ];
    for source in ViewType::ALL {
        for plane in ViewType::ORTHOGONAL {
            for delta in deltas {
                let report = coordinator
                    .on_interaction(source, &InteractionEvent::new(plane, delta))
                    .unwrap();
                assert!(report.plane_updates.iter().all(|update| update.view != source));
                assert!(
                    report
                        .camera_syncs
                        .iter()
                        .filter(|(view, _)| *view == source)
                        .all(|(_, policy)| *policy == FocalPointPolicy::RecomputeOffset)
                );

                let mut redrawn = report.redrawn.clone();
                redrawn.dedup();
                assert_eq!(redrawn, report.redrawn, "a view was redrawn twice");
            }
        }
    }
}

#[test]
fn reset_restores_startup_planes() {
    let image = image();
    let defaults = CursorModel::new(&image, &ResliceSettings::default());
    let mut coordinator = coordinator(ResliceSettings::default());
    coordinator.set_keep_orthogonality(false).unwrap();
    let events = [
        InteractionEvent::new(
            ViewType::Coronal,
            DeltaTransform::rotation_about(&Vector3::new(0.0, 1.0, 1.0), 0.3),
        ),
        InteractionEvent::new(
            ViewType::Axial,
            DeltaTransform::translation(Vector3::new(-12.0, 4.0, 9.0)),
        ),
    ];
    for event in &events {
        coordinator.on_interaction(ViewType::Sagittal, event).unwrap();
    }
    coordinator.renderer_mut().frames.clear();

    let report = coordinator.reset_all().unwrap();
    let cursor = coordinator.cursor();
    assert_eq!(cursor.center(), image.center());
    for (plane, default) in cursor.planes().iter().zip(defaults.planes()) {
        assert!(plane.approx_eq(default));
    }
    assert!(!cursor.keep_orthogonality());

    for view_type in ViewType::ORTHOGONAL {
        let view = coordinator.view(view_type);
        assert_eq!(view.camera.focal_point, image.center());
        assert_eq!(view.slicing().and_then(|s| s.plane()), Some(&cursor.plane(view_type).unwrap()));
    }
    assert_eq!(
        coordinator.view(ViewType::Overview3D).camera.focal_point,
        image.center()
    );

    let mut frames = coordinator.renderer().frames.clone();
    frames.sort();
    assert_eq!(frames, ViewType::ALL.to_vec());
    assert_eq!(report.redrawn.len(), ViewType::ALL.len());
}
