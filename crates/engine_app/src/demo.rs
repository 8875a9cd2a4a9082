//! A jointed arm built from a chain of entities.
//!
//! Each segment carries a [`RelativeTransform`] one unit above its parent
//! and is registered under the name `segment<n>`. Moving the root moves
//! every segment through relative-component propagation, and destroying the
//! root tears down the whole chain.

use anyhow::{Context, Result};
use engine_component::{Component, ComponentRegistry, Entity};
use engine_hierarchy::{World, WorldConfig};
use engine_math::{RelativeTransform, Vec3};
use tracing::{debug, info};

use crate::config::DemoConfig;

/// Distance between consecutive segments, in the parent's space.
const SEGMENT_OFFSET: Vec3 = Vec3::Y;

/// The component registry used by the demo.
pub fn registry() -> Result<ComponentRegistry> {
    ComponentRegistry::new()
        .with_relative::<RelativeTransform>()
        .context("registering RelativeTransform")
}

/// A world holding one arm.
#[derive(Debug)]
pub struct Demo {
    world: World,
    root: Entity,
    segments: Vec<Entity>,
}

impl Demo {
    /// Spawn a root at the origin and chain `config.segments` segments below it.
    pub fn build(config: &DemoConfig) -> Result<Self> {
        let world_config = WorldConfig::new().with_capacity(config.segments + 1);
        let mut world = World::with_config(registry()?, world_config);

        let root = world.spawn();
        world.insert(root, RelativeTransform::default())?;

        let mut segments = Vec::with_capacity(config.segments);
        let mut parent = root;
        for n in 0..config.segments {
            let segment = world.spawn();
            world.insert(segment, RelativeTransform::from_position(SEGMENT_OFFSET))?;
            world.add_child(parent, segment, Some(&format!("segment{n}")));
            debug!(%parent, %segment, n, "segment attached");
            segments.push(segment);
            parent = segment;
        }

        if let Some(&tip) = segments.last() {
            world.track_component(tip, RelativeTransform::INDEX, |_, entity, _, value| {
                if let Some(transform) = value.downcast_ref::<RelativeTransform>() {
                    debug!(%entity, position = %transform.world_position(), "tip moved");
                }
            });
        }

        info!(%root, segments = segments.len(), "arm built");
        Ok(Self {
            world,
            root,
            segments,
        })
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn root(&self) -> Entity {
        self.root
    }

    /// The segment ids, root side first.
    #[must_use]
    pub fn segments(&self) -> &[Entity] {
        &self.segments
    }

    /// Translate the root by `offset`.
    pub fn move_root(&mut self, offset: Vec3) -> Result<()> {
        self.world.modify::<RelativeTransform>(self.root, |transform| {
            let local = transform.local.translated(offset);
            transform.set_local(local);
        })?;
        Ok(())
    }

    /// World-space position of the last segment, or of the root if there
    /// are no segments.
    #[must_use]
    pub fn tip_position(&self) -> Option<Vec3> {
        let tip = self.segments.last().copied().unwrap_or(self.root);
        self.world
            .get::<RelativeTransform>(tip)
            .map(RelativeTransform::world_position)
    }

    /// Resolve a path of segment names from the root, case-insensitively.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<Entity> {
        path.iter().try_fold(self.root, |parent, name| {
            self.world.try_fetch_child(parent, name).map(|node| node.id())
        })
    }

    /// Destroy the root. Returns the number of entities left alive.
    pub fn teardown(&mut self) -> usize {
        self.world.destroy(self.root);
        let remaining = self.world.entity_count();
        info!(root = %self.root, remaining, "arm destroyed");
        remaining
    }
}
