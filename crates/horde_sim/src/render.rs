//! Read-only snapshot handed to whatever draws the frame.

use crate::components::{Appearance, MaterialId, MeshId, Scale, Translation};
use horde_core::ecs::{Entity, Query, World};
use horde_core::math::Vec3;

/// One drawable entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderInstance {
    pub entity: Entity,
    pub position: Vec3,
    pub scale: f32,
    pub mesh: MeshId,
    pub material: MaterialId,
}

/// Every entity with a translation, a scale and an appearance.
///
/// Parked bullets are included; they sit at the idle position off screen.
pub fn render_snapshot(world: &World) -> Vec<RenderInstance> {
    let query = Query::new()
        .with::<Translation>()
        .with::<Scale>()
        .with::<Appearance>();
    let mut instances = Vec::with_capacity(world.count(&query));

    for storage in world.storages_matching(&query) {
        let (Some(translations), Some(scales), Some(looks)) = (
            storage.column::<Translation>(),
            storage.column::<Scale>(),
            storage.column::<Appearance>(),
        ) else {
            continue;
        };
        for (row, &entity) in storage.entities().iter().enumerate() {
            instances.push(RenderInstance {
                entity,
                position: translations[row].position,
                scale: scales[row].value,
                mesh: looks[row].mesh,
                material: looks[row].material,
            });
        }
    }
    instances
}
