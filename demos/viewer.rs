//! Minimal headless driver: loads a scene document, prints the tree with
//! world positions, and resolves one pick at the center of a nominal
//! viewport.
//!
//! ```sh
//! cargo run --example viewer -- path/to/scene.json
//! ```

use anyhow::{bail, Context, Result};
use trellis::gfx::{pick, NodeKind};
use trellis::load_scene;

const VIEWPORT: (f32, f32) = (800.0, 600.0);

fn main() -> Result<()> {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: viewer <scene.json>"),
    };

    let scene = load_scene(&path).with_context(|| format!("loading scene `{}`", path))?;
    println!("ambient: {:?}", scene.ambient);

    for entry in scene.walk() {
        let kind = match &entry.node.kind {
            NodeKind::Group => "group",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::PointLight(_) => "point light",
            NodeKind::DirectionalLight(_) => "directional light",
        };
        println!(
            "{}{} ({kind}) at {:?}",
            "  ".repeat(entry.path.len()),
            entry.node.name,
            [entry.world.w.x, entry.world.w.y, entry.world.w.z],
        );
    }

    let center = (VIEWPORT.0 / 2.0, VIEWPORT.1 / 2.0);
    match pick(&scene, center, VIEWPORT)? {
        Some(hit) => {
            let node = scene.node(&hit.path).context("pick path out of date")?;
            println!(
                "center pick: `{}` at distance {:.3} ({:?})",
                node.name, hit.distance, hit.point
            );
        }
        None => println!("center pick: nothing under the cursor"),
    }

    Ok(())
}
