use std::fmt;

use crate::error::ResliceCursorError;

/// The panels of the viewer. The first three show one plane of the reslice
/// cursor each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewType {
    Sagittal,
    Coronal,
    Axial,
    Overview3D,
    Volume,
}

impl ViewType {
    pub const ALL: [ViewType; 5] = [
        ViewType::Sagittal,
        ViewType::Coronal,
        ViewType::Axial,
        ViewType::Overview3D,
        ViewType::Volume,
    ];

    pub const ORTHOGONAL: [ViewType; 3] = [ViewType::Sagittal, ViewType::Coronal, ViewType::Axial];

    /// Position of the view in [`ViewType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Index of the cursor plane shown by this view, if it shows one.
    pub fn plane_index(self) -> Option<usize> {
        match self {
            ViewType::Sagittal => Some(0),
            ViewType::Coronal => Some(1),
            ViewType::Axial => Some(2),
            ViewType::Overview3D | ViewType::Volume => None,
        }
    }

    pub fn is_orthogonal(self) -> bool {
        self.plane_index().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewType::Sagittal => "sagittal",
            ViewType::Coronal => "coronal",
            ViewType::Axial => "axial",
            ViewType::Overview3D => "3d-overview",
            ViewType::Volume => "volume",
        }
    }
}

impl TryFrom<usize> for ViewType {
    type Error = ResliceCursorError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        ViewType::ALL
            .get(index)
            .copied()
            .ok_or(ResliceCursorError::UnknownViewIndex(index))
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregation applied across the slices of a slab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlabMode {
    Min,
    Max,
    #[default]
    Mean,
    Sum,
}

/// How a 2D view's focal point follows the cursor after its plane moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocalPointPolicy {
    /// Aim at the cursor center.
    ResetFocalPoint,
    /// Keep the cached on-screen offset between cursor center and focal point.
    KeepOffset,
    /// Measure the offset again and cache it.
    RecomputeOffset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    Translation,
    Rotation,
}
