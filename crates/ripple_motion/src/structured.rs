//! Structured container adapters
//!
//! Implementing [`Structured`] registers a type as an animatable container:
//! its components become channels named by [`ContainerKind::components`].

use crate::goal::{Container, ContainerKind};
use ripple_core::values::{Color, Transform2D, UDim, UDim2, Vec2, Vec3};
use smallvec::{smallvec, SmallVec};

/// A fixed set of named `f32` components that can be taken apart and rebuilt
pub trait Structured: Copy + 'static {
    const KIND: &'static ContainerKind;

    /// Components in [`ContainerKind::components`] order
    fn extract(&self) -> SmallVec<[f32; 4]>;

    /// Rebuild from components in the same order
    ///
    /// Missing trailing components read as zero.
    fn construct(components: &[f32]) -> Self;

    fn to_container(&self) -> Container {
        Container::from_parts(Self::KIND, self.extract())
    }
}

fn component(components: &[f32], index: usize) -> f32 {
    components.get(index).copied().unwrap_or_default()
}

impl Structured for Vec2 {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "Vec2",
        components: &["x", "y"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.x, self.y]
    }

    fn construct(components: &[f32]) -> Self {
        Vec2::new(component(components, 0), component(components, 1))
    }
}

impl Structured for Vec3 {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "Vec3",
        components: &["x", "y", "z"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.x, self.y, self.z]
    }

    fn construct(components: &[f32]) -> Self {
        Vec3::new(
            component(components, 0),
            component(components, 1),
            component(components, 2),
        )
    }
}

impl Structured for Color {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "Color",
        components: &["r", "g", "b", "a"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.r, self.g, self.b, self.a]
    }

    fn construct(components: &[f32]) -> Self {
        Color::rgba(
            component(components, 0),
            component(components, 1),
            component(components, 2),
            component(components, 3),
        )
    }
}

impl Structured for UDim {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "UDim",
        components: &["scale", "offset"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.scale, self.offset]
    }

    fn construct(components: &[f32]) -> Self {
        UDim::new(component(components, 0), component(components, 1))
    }
}

impl Structured for UDim2 {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "UDim2",
        components: &["x_scale", "x_offset", "y_scale", "y_offset"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.x.scale, self.x.offset, self.y.scale, self.y.offset]
    }

    fn construct(components: &[f32]) -> Self {
        UDim2::new(
            component(components, 0),
            component(components, 1),
            component(components, 2),
            component(components, 3),
        )
    }
}

impl Structured for Transform2D {
    const KIND: &'static ContainerKind = &ContainerKind {
        name: "Transform2D",
        components: &["x", "y", "rotation", "scale"],
    };

    fn extract(&self) -> SmallVec<[f32; 4]> {
        smallvec![self.x, self.y, self.rotation, self.scale]
    }

    fn construct(components: &[f32]) -> Self {
        Transform2D::new(
            component(components, 0),
            component(components, 1),
            component(components, 2),
            component(components, 3),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip<T: Structured + PartialEq + std::fmt::Debug>(value: T) {
        let components = value.extract();
        assert_eq!(components.len(), T::KIND.components.len());
        assert_eq!(T::construct(&components), value);
    }

    #[test]
    fn test_every_container_round_trips() {
        assert_round_trip(Vec2::new(1.0, -2.0));
        assert_round_trip(Vec3::new(1.0, 2.0, 3.0));
        assert_round_trip(Color::rgba(0.1, 0.2, 0.3, 0.4));
        assert_round_trip(UDim::new(0.5, 12.0));
        assert_round_trip(UDim2::new(0.5, 10.0, 1.0, -4.0));
        assert_round_trip(Transform2D::new(3.0, 4.0, 0.5, 2.0));
    }

    #[test]
    fn test_container_carries_kind() {
        let container = Color::WHITE.to_container();
        assert_eq!(container.kind().name, "Color");
        assert_eq!(container.component("a"), Some(1.0));
        assert_eq!(container.component("z"), None);
    }

    #[test]
    fn test_short_component_slice_reads_zero() {
        assert_eq!(Vec3::construct(&[1.0]), Vec3::new(1.0, 0.0, 0.0));
    }
}
