use std::{fmt::Display, str::FromStr};

use nalgebra::{Point3, Vector3};

/// Orientation from which the volume is viewed.
///
/// `Top` and `Bottom` render the same volume rotated so that its Y and Z
/// axes swap meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Default,
    Top,
    Bottom,
}

/// Maps world axes onto sampling axes.
///
/// Sampling coordinate `i` is read from world-normalized coordinate `permutation[i]`,
/// mirrored (`1 - c`) when `flip[i]` is set.
/// The bounding box is built with [`AxisTransform::world_extent`] and sample points are mapped
/// back with [`AxisTransform::apply`], so both directions always come from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTransform {
    pub permutation: [usize; 3],
    pub flip: [bool; 3],
}

// Depth (world Z) is mirrored because the field's front face sits at sampling z = 1.
const DEFAULT_TRANSFORM: AxisTransform = AxisTransform {
    permutation: [0, 1, 2],
    flip: [false, false, true],
};

// World Z feeds sampling Y; the depth mirror and the view mirror cancel out.
const TOP_TRANSFORM: AxisTransform = AxisTransform {
    permutation: [0, 2, 1],
    flip: [false, false, false],
};

const BOTTOM_TRANSFORM: AxisTransform = AxisTransform {
    permutation: [0, 2, 1],
    flip: [false, true, true],
};

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Default, ViewMode::Top, ViewMode::Bottom];

    pub fn axis_transform(self) -> AxisTransform {
        match self {
            ViewMode::Default => DEFAULT_TRANSFORM,
            ViewMode::Top => TOP_TRANSFORM,
            ViewMode::Bottom => BOTTOM_TRANSFORM,
        }
    }
}

impl AxisTransform {
    /// World-normalized point (`[0, 1]` inside the box) to sampling space.
    pub fn apply(&self, normalized: Point3<f32>) -> Point3<f32> {
        Point3::from(Vector3::from_fn(|i, _| {
            let c = normalized[self.permutation[i]];
            if self.flip[i] {
                1.0 - c
            } else {
                c
            }
        }))
    }

    /// Sampling-space point back to world-normalized coordinates.
    pub fn invert(&self, sampling: Point3<f32>) -> Point3<f32> {
        let mut normalized = Point3::origin();
        for i in 0..3 {
            let c = sampling[i];
            normalized[self.permutation[i]] = if self.flip[i] { 1.0 - c } else { c };
        }
        normalized
    }

    /// Permutes an extent given along sampling axes into world axes.
    pub fn world_extent<T>(&self, sampling_extent: Vector3<T>) -> Vector3<T>
    where
        T: nalgebra::Scalar + Copy,
    {
        let mut world = sampling_extent;
        for i in 0..3 {
            world[self.permutation[i]] = sampling_extent[i];
        }
        world
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ViewMode::Default),
            "top" => Ok(ViewMode::Top),
            "bottom" => Ok(ViewMode::Bottom),
            _ => Err(format!("Unknown view mode '{s}'")),
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ViewMode::Default => "default",
            ViewMode::Top => "top",
            ViewMode::Bottom => "bottom",
        };
        f.write_str(name)
    }
}
