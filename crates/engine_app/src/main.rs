//! # engine_app: hierarchy demo
//!
//! Builds a jointed arm out of linked entities, moves its root a few times
//! so the segments follow through relative-component propagation, then
//! destroys the root and lets the cascade take the rest.
//!
//! ## Configuration
//!
//! - `ENGINE_DEMO_SEGMENTS`: segments below the root (default 3).
//! - `ENGINE_DEMO_STEPS`: root moves before teardown (default 4).
//! - `RUST_LOG`: extra tracing directives; `engine_app=info` is always on.

mod config;
mod demo;

use anyhow::Result;
use engine_math::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::DemoConfig;
use demo::Demo;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let config = DemoConfig::from_env()?;
    info!(segments = config.segments, steps = config.steps, "hierarchy demo starting");

    let mut demo = Demo::build(&config)?;
    let elbow = demo.find(&["segment0", "segment1"]);
    info!(
        root = %demo.root(),
        segments = demo.segments().len(),
        entities = demo.world().entity_count(),
        ?elbow,
        "arm ready"
    );
    for step in 1..=config.steps {
        demo.move_root(Vec3::X)?;
        if let Some(tip) = demo.tip_position() {
            info!(step, %tip, "root moved");
        }
    }

    let remaining = demo.teardown();
    info!(remaining, "hierarchy demo finished");
    Ok(())
}
