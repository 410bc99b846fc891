use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Only active entities with a disc are drawn. Instances are ordered by
/// layer (back-to-front); scene order is kept within a layer.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut visible: Vec<&Entity> = entities
        .filter(|e| e.active && e.disc.is_some())
        .collect();
    // Stable sort keeps scene order inside a layer.
    visible.sort_by_key(|e| e.layer);

    for entity in visible {
        let Some(disc) = entity.disc else { continue };
        let pushed = buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            radius: disc.radius,
            rotation: entity.rotation,
            r: disc.color.r,
            g: disc.color.g,
            b: disc.color.b,
            alpha: disc.alpha,
        });
        if !pushed {
            log::warn!("render buffer full, dropping entity {:?}", entity.id);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntityId, Rgb};
    use crate::components::entity::DiscComponent;
    use crate::components::layer::RenderLayer;
    use glam::Vec2;

    #[test]
    fn sorts_by_layer() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(10.0, 20.0))
                .with_disc(DiscComponent::new(5.0, Rgb::WHITE)),
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(30.0, 40.0))
                .with_layer(RenderLayer::Pocketing)
                .with_disc(DiscComponent::new(6.0, Rgb::BLACK)),
            Entity::new(EntityId(3)).with_pos(Vec2::new(50.0, 60.0)),
        ];

        let mut buffer = RenderBuffer::new(16);
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 2);
        let first = buffer.instances()[0];
        assert_eq!((first.x, first.radius), (30.0, 6.0));
        assert_eq!(buffer.instances()[1].x, 10.0);
    }

    #[test]
    fn inactive_entities_are_skipped() {
        let mut entity = Entity::new(EntityId(1)).with_disc(DiscComponent::new(5.0, Rgb::WHITE));
        entity.active = false;

        let entities = vec![entity];
        let mut buffer = RenderBuffer::new(16);
        build_render_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
