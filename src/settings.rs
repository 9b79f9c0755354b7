use log::warn;

use crate::enums::SlabMode;
use crate::error::ResliceCursorError;

/// Interaction and reslice toggles exposed to the surrounding application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResliceSettings {
    /// Rotating one plane keeps the other two perpendicular to it.
    pub keep_orthogonality: bool,
    pub enable_rotation: bool,
    pub enable_translation: bool,
    pub slab_mode: SlabMode,
    /// Number of slices aggregated into one reslice, at least 1.
    pub slab_number_of_slices: usize,
}

impl Default for ResliceSettings {
    fn default() -> Self {
        Self {
            keep_orthogonality: true,
            enable_rotation: true,
            enable_translation: true,
            slab_mode: SlabMode::Mean,
            slab_number_of_slices: 1,
        }
    }
}

impl ResliceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_orthogonality(mut self, keep_orthogonality: bool) -> Self {
        self.keep_orthogonality = keep_orthogonality;
        self
    }

    pub fn with_enable_rotation(mut self, enable_rotation: bool) -> Self {
        self.enable_rotation = enable_rotation;
        self
    }

    pub fn with_enable_translation(mut self, enable_translation: bool) -> Self {
        self.enable_translation = enable_translation;
        self
    }

    pub fn with_slab_mode(mut self, slab_mode: SlabMode) -> Self {
        self.slab_mode = slab_mode;
        self
    }

    pub fn with_slab_number_of_slices(mut self, slices: usize) -> Self {
        self.slab_number_of_slices = slices;
        self
    }

    /// Checks the slab slice count and clamps it to `max_slices`.
    pub fn validated(mut self, max_slices: usize) -> Result<Self, ResliceCursorError> {
        self.slab_number_of_slices = validate_slab_slices(self.slab_number_of_slices, max_slices)?;
        Ok(self)
    }
}

pub(crate) fn validate_slab_slices(
    slices: usize,
    max_slices: usize,
) -> Result<usize, ResliceCursorError> {
    if slices == 0 {
        return Err(ResliceCursorError::InvalidSlabSlices(slices));
    }
    let max_slices = max_slices.max(1);
    if slices > max_slices {
        warn!("Slab of {slices} slices exceeds the image, clamping to {max_slices}");
        return Ok(max_slices);
    }
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_state() {
        let settings = ResliceSettings::default();
        assert!(settings.keep_orthogonality);
        assert!(settings.enable_rotation);
        assert!(settings.enable_translation);
        assert_eq!(settings.slab_mode, SlabMode::Mean);
        assert_eq!(settings.slab_number_of_slices, 1);
    }

    #[test]
    fn slab_slices_are_validated() {
        let zero = ResliceSettings::new().with_slab_number_of_slices(0).validated(10);
        assert_eq!(zero, Err(ResliceCursorError::InvalidSlabSlices(0)));

        let clamped = ResliceSettings::new()
            .with_slab_number_of_slices(50)
            .validated(10)
            .unwrap();
        assert_eq!(clamped.slab_number_of_slices, 10);

        let kept = ResliceSettings::new()
            .with_slab_mode(SlabMode::Max)
            .with_slab_number_of_slices(3)
            .validated(10)
            .unwrap();
        assert_eq!(kept.slab_number_of_slices, 3);
        assert_eq!(kept.slab_mode, SlabMode::Max);
    }
}
