//! Light component

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec2, Vec3};

/// Kind of light source; the discriminant is what shaders receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum LightType {
    #[default]
    Directional = 0,
    Point = 1,
    Spot = 2,
}

impl LightType {
    pub fn as_uniform(self) -> i32 {
        self as i32
    }
}

/// Light component.
///
/// Position comes from the owning entity's world transform, and
/// `direction` is expressed in the entity's local space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    pub direction: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Constant, linear and quadratic coefficients
    pub attenuation: Vec3,
    /// Inner and outer cone angles in radians (spot lights only)
    pub cone_angles: Vec2,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            direction: Vec3::NEG_Y,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            cone_angles: Vec2::new(
                std::f32::consts::FRAC_PI_8,
                std::f32::consts::FRAC_PI_4,
            ),
        }
    }
}

impl Light {
    pub fn directional(direction: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            light_type: LightType::Directional,
            direction,
            diffuse,
            specular,
            ..Default::default()
        }
    }

    pub fn point(diffuse: Vec3, specular: Vec3, attenuation: Vec3) -> Self {
        Self {
            light_type: LightType::Point,
            diffuse,
            specular,
            attenuation,
            ..Default::default()
        }
    }

    pub fn spot(
        direction: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        attenuation: Vec3,
        cone_angles: Vec2,
    ) -> Self {
        Self {
            light_type: LightType::Spot,
            direction,
            diffuse,
            specular,
            attenuation,
            cone_angles,
        }
    }

    /// Resolve this light against its owner's local-to-world matrix
    pub fn to_world(&self, local_to_world: Mat4) -> WorldLight {
        WorldLight {
            light_type: self.light_type,
            position: local_to_world.transform_point3(Vec3::ZERO),
            direction: local_to_world
                .transform_vector3(self.direction)
                .normalize_or_zero(),
            diffuse: self.diffuse,
            specular: self.specular,
            attenuation: self.attenuation,
            cone_angles: self.cone_angles,
        }
    }
}

/// A light with its position and direction in world space, ready to bind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldLight {
    pub light_type: LightType,
    pub position: Vec3,
    /// Normalized
    pub direction: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Vec3,
    pub cone_angles: Vec2,
}
