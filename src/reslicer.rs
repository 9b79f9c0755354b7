use crate::enums::SlabMode;
use crate::image_data::ImageData;
use crate::interpolator::Interpolator;
use crate::view::SliceTransform;

use image::{GrayImage, ImageBuffer};
use ndarray::Array2;
use rayon::prelude::*;

/// CPU implementation of the slicing stage: samples an [`ImageData`] on the
/// rectangle of a [`SliceTransform`], aggregating slabs along the normal.
pub struct Reslicer;

impl Reslicer {
    /// Reslices `image` through `slicing`, sampling at the smallest image
    /// spacing. Rows follow the second plane axis, columns the first.
    ///
    /// Returns `None` while the transform has no plane.
    pub fn reslice(image: &ImageData, slicing: &SliceTransform) -> Option<Array2<f32>> {
        let plane = slicing.plane()?;
        let axes = slicing.axes()?;
        let spacing = image.min_spacing();
        let width = (plane.axis1().norm() / spacing).round() as usize + 1;
        let height = (plane.axis2().norm() / spacing).round() as usize + 1;
        let slices = slicing.slab_number_of_slices().max(1);
        let mode = slicing.slab_mode();
        let half_slab = (slices - 1) as f64 * 0.5;

        let pixel_data: Vec<f32> = (0..height)
            .into_par_iter()
            .flat_map(|row| {
                (0..width)
                    .map(|column| {
                        let samples = (0..slices).filter_map(|k| {
                            let world = axes.to_world(
                                column as f64 * spacing,
                                row as f64 * spacing,
                                (k as f64 - half_slab) * spacing,
                            );
                            Interpolator::trilinear_interpolate(
                                image.data(),
                                &image.world_to_index(&world),
                            )
                        });
                        Self::aggregate(mode, samples)
                    })
                    .collect::<Vec<f32>>()
            })
            .collect();

        Array2::from_shape_vec((height, width), pixel_data).ok()
    }

    /// Combines the slab samples that fell inside the image. Pixels without
    /// any sample are 0.
    fn aggregate(mode: SlabMode, samples: impl Iterator<Item = f32>) -> f32 {
        let (count, min, max, sum) = samples.fold(
            (0usize, f32::INFINITY, f32::NEG_INFINITY, 0.0f32),
            |(count, min, max, sum), v| (count + 1, min.min(v), max.max(v), sum + v),
        );
        if count == 0 {
            return 0.0;
        }
        match mode {
            SlabMode::Min => min,
            SlabMode::Max => max,
            SlabMode::Mean => sum / count as f32,
            SlabMode::Sum => sum,
        }
    }

    #[inline]
    fn normalize_to_u8(value: f32, low: f32, high: f32) -> u8 {
        if high <= low {
            return 0;
        }
        ((value - low) / (high - low) * 255.0).clamp(0.0, 255.0) as u8
    }

    /// Maps a resliced plane to 8-bit grey levels over `scalar_range`.
    pub fn to_image(slice: &Array2<f32>, scalar_range: (f32, f32)) -> Option<GrayImage> {
        let (height, width) = slice.dim();
        let (low, high) = scalar_range;
        let standard = slice.as_standard_layout();
        let pixel_data: Vec<u8> = standard
            .view()
            .into_par_iter()
            .map(|&v| Self::normalize_to_u8(v, low, high))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }

    /// Scalar range a slab produced with `slicing` can reach.
    pub fn output_range(image: &ImageData, slicing: &SliceTransform) -> (f32, f32) {
        let (low, high) = image.scalar_range();
        match slicing.slab_mode() {
            SlabMode::Sum => {
                let slices = slicing.slab_number_of_slices().max(1) as f32;
                (low.min(low * slices), high.max(high * slices))
            }
            _ => (low, high),
        }
    }
}
