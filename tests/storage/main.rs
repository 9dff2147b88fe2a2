//! Integration tests for Layer 1: Storage
//!
//! Tests for component tables, change polling, reflection, and the registry.

mod components;
mod reflection;

use std::mem::offset_of;

use tabula_foundation::PropertyType;
use tabula_storage::{Component, PropertyDescriptor};

/// Installs a test logger once per binary.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub scale: f32,
}

impl Component for Transform {
    const TYPE_NAME: &'static str = "TransformComponent";

    fn properties() -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::new(
                "translation",
                offset_of!(Transform, translation),
                PropertyType::Vector(3),
            ),
            PropertyDescriptor::new("scale", offset_of!(Transform, scale), PropertyType::Float),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Light {
    pub color: [f32; 3],
    pub range: f32,
    pub layers: u32,
}

impl Component for Light {
    const TYPE_NAME: &'static str = "LightComponent";

    fn properties() -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::new("color", offset_of!(Light, color), PropertyType::Vector(3)),
            PropertyDescriptor::new("range", offset_of!(Light, range), PropertyType::Float),
            PropertyDescriptor::new("layers", offset_of!(Light, layers), PropertyType::Bitfield)
                .bitfield(),
        ]
    }
}

pub fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform {
        translation: [x, y, z],
        scale: 1.0,
    }
}
