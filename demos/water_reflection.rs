//! Demo of a water reflection driven frame by frame.
//!
//! A viewer orbits a lake while the reflection renderer places the mirror
//! camera under the water each frame. The headless host records what a real
//! pipeline would be asked to do. Run with `RUST_LOG=debug` to see resource
//! allocation.

use mirrorscope::{
    init_logging, render_water_reflection, CameraConfig, HeadlessHost, HostEvent,
    RecordingMaterials, ReflectionOutcome, ReflectionRenderer, ReflectionSettings,
    SurfaceTransform, Vec3, ViewerCamera, REFLECTION_TEXTURE_SLOT,
};
use std::f32::consts::TAU;

const SETTINGS: &str = r#"{
    "texture_resolution": 256,
    "clip_plane_offset": 0.05,
    "water_material": "Lake"
}"#;

const FRAMES: usize = 8;

fn orbit_viewer(frame: usize) -> ViewerCamera {
    #[allow(clippy::cast_precision_loss)]
    let angle = TAU * frame as f32 / FRAMES as f32;
    let position = Vec3::new(12.0 * angle.sin(), 4.0 + angle.cos(), 12.0 * angle.cos());
    ViewerCamera::looking_at(CameraConfig::default(), position, Vec3::ZERO, Vec3::Y)
}

fn main() -> mirrorscope::Result<()> {
    init_logging();

    let settings = ReflectionSettings::from_json(SETTINGS)?;
    println!("settings: {}", settings.to_json()?);

    let lake = SurfaceTransform::horizontal(0.0);
    let mut host = HeadlessHost::new();
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(settings);

    for frame in 0..FRAMES {
        let viewer = orbit_viewer(frame);
        let eye = viewer.position;
        host.set_active_camera(Some(viewer));

        match render_water_reflection(&mut renderer, &mut host, &mut materials, &lake) {
            ReflectionOutcome::Rendered { target, .. } => {
                if let Some(mirror) = renderer.mirror_camera() {
                    println!(
                        "frame {frame}: eye {eye} -> mirror {}, euler {}, into {target}",
                        mirror.position, mirror.euler_angles
                    );
                }
            }
            ReflectionOutcome::Skipped(reason) => println!("frame {frame}: skipped ({reason})"),
        }
    }

    // Higher quality reflection reallocates the target
    renderer.settings_mut().set_texture_resolution(512);
    host.set_active_camera(Some(orbit_viewer(0)));
    render_water_reflection(&mut renderer, &mut host, &mut materials, &lake);

    // No camera: the surface is skipped
    host.set_active_camera(None);
    if let ReflectionOutcome::Skipped(reason) =
        render_water_reflection(&mut renderer, &mut host, &mut materials, &lake)
    {
        println!("no viewer: skipped ({reason})");
    }

    renderer.disable(&mut host);

    let renders = host
        .events()
        .iter()
        .filter(|e| matches!(e, HostEvent::Render { .. }))
        .count();
    println!(
        "{renders} renders, {} target allocations, {} live targets, {} texture binds on {}",
        host.allocation_count(),
        host.live_target_count(),
        materials.set_count(),
        REFLECTION_TEXTURE_SLOT
    );

    Ok(())
}
