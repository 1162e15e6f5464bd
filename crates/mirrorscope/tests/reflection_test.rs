//! End-to-end reflection tests against the headless host.
//!
//! Each test owns its own `RenderContext`; the process-wide guard is covered in
//! `global_context_test.rs` so parallel tests cannot observe each other.

use mirrorscope::*;

const EPSILON: f32 = 1e-4;

fn viewer() -> ViewerCamera {
    ViewerCamera::looking_at(
        CameraConfig::default(),
        Vec3::new(0.0, 5.0, -10.0),
        Vec3::ZERO,
        Vec3::Y,
    )
}

fn lake_settings() -> ReflectionSettings {
    let mut settings = ReflectionSettings::with_material("Lake");
    settings.set_clip_plane_offset(0.1);
    settings
}

#[test]
fn water_reflection_end_to_end() {
    let ctx = RenderContext::new();
    let viewer = viewer();
    let mut host = HeadlessHost::with_camera(viewer.clone());
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(lake_settings());

    let outcome =
        renderer.render_reflection(&ctx, &mut host, &mut materials, &SurfaceTransform::default());
    assert!(outcome.is_rendered(), "unexpected outcome: {outcome:?}");

    // Mirror camera sits under the offset plane at y = 0.1
    let mirror = &host.renders()[0];
    assert!((mirror.position.y - -4.8).abs() < EPSILON, "{}", mirror.position);
    assert!(mirror.position.x.abs() < EPSILON);
    assert!((mirror.position.z - -10.0).abs() < EPSILON);

    // Pitch negated, yaw and roll kept
    assert!((mirror.euler_angles.x + viewer.euler_angles.x).abs() < EPSILON);
    assert!((mirror.euler_angles.y - viewer.euler_angles.y).abs() < EPSILON);
    assert!((mirror.euler_angles.z - viewer.euler_angles.z).abs() < EPSILON);
    assert!(viewer.euler_angles.x < 0.0, "viewer looks down");

    assert_eq!(mirror.config.render_path, RenderPath::Forward);
    assert!(!mirror.enabled);
    assert!(!mirror.culling_mask.contains(WATER_LAYER));

    // Winding is inverted exactly around the render call
    let winding: Vec<_> = host
        .events()
        .iter()
        .filter_map(|event| match event {
            HostEvent::InvertWinding(inverted) => Some(("toggle", *inverted)),
            HostEvent::Render {
                winding_inverted, ..
            } => Some(("render", *winding_inverted)),
            _ => None,
        })
        .collect();
    assert_eq!(
        winding,
        vec![("toggle", true), ("render", true), ("toggle", false)]
    );
    assert!(!host.winding_inverted());

    // Published once to the water material
    let target = renderer.resources().target().unwrap();
    assert_eq!(materials.set_count(), 1);
    assert_eq!(
        materials.history(),
        &[("Lake".to_string(), REFLECTION_TEXTURE_SLOT.to_string(), target)]
    );
    assert_eq!(mirror.target, Some(target));

    assert!(!ctx.is_rendering());
    renderer.disable(&mut host);
}

#[test]
fn oblique_near_plane_lies_on_the_water() {
    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(lake_settings());

    renderer.render_reflection(&ctx, &mut host, &mut materials, &SurfaceTransform::default());
    let mirror = renderer.mirror_camera().unwrap();
    let view_projection = mirror.view_projection();

    // A point on the offset plane lands on the near plane
    let on_plane = view_projection * Vec4::new(0.0, 0.1, 0.0, 1.0);
    assert!(on_plane.w > 0.0);
    assert!((on_plane.z / on_plane.w).abs() < 1e-3, "{on_plane}");

    // Geometry under the water is clipped, geometry above it is kept
    let below = view_projection * Vec4::new(0.0, -1.0, 0.0, 1.0);
    let above = view_projection * Vec4::new(0.0, 2.0, 0.0, 1.0);
    assert!(below.z < 0.0, "{below}");
    assert!(above.z > 0.0, "{above}");

    renderer.disable(&mut host);
}

#[test]
fn teardown_and_reenable() {
    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(lake_settings());
    let surface = SurfaceTransform::default();

    for _ in 0..3 {
        renderer.render_reflection(&ctx, &mut host, &mut materials, &surface);
    }
    assert_eq!(host.allocation_count(), 1);
    assert_eq!(host.renders().len(), 3);

    renderer.disable(&mut host);
    assert!(!renderer.resources().is_allocated());
    assert_eq!(host.live_target_count(), 0);
    assert_eq!(host.live_camera_count(), 0);

    let outcome = renderer.render_reflection(&ctx, &mut host, &mut materials, &surface);
    assert!(outcome.is_rendered());
    assert_eq!(host.allocation_count(), 2);
    assert_eq!(host.live_target_count(), 1);
    assert_eq!(host.live_camera_count(), 1);

    renderer.disable(&mut host);
}

#[test]
fn resolution_change_between_frames() {
    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(lake_settings());
    let surface = SurfaceTransform::default();

    renderer.render_reflection(&ctx, &mut host, &mut materials, &surface);
    let first = renderer.resources().target().unwrap();

    renderer.settings_mut().set_texture_resolution(256);
    renderer.render_reflection(&ctx, &mut host, &mut materials, &surface);
    let second = renderer.resources().target().unwrap();

    assert_ne!(first, second);
    assert_eq!(host.live_target_count(), 1);
    assert_eq!(host.target_descriptor(second).unwrap().width, 256);
    assert_eq!(materials.texture("Lake", REFLECTION_TEXTURE_SLOT), Some(second));

    renderer.disable(&mut host);
}

#[test]
fn allocation_failure_skips_without_winding() {
    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    host.set_fail_allocations(true);
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(lake_settings());

    let outcome =
        renderer.render_reflection(&ctx, &mut host, &mut materials, &SurfaceTransform::default());

    assert!(matches!(
        outcome,
        ReflectionOutcome::Skipped(ReflectionError::ResourceError(_))
    ));
    assert!(host.events().is_empty());
    assert_eq!(materials.set_count(), 0);
    assert!(!ctx.is_rendering());

    // Recovers once the host can allocate again
    host.set_fail_allocations(false);
    let outcome =
        renderer.render_reflection(&ctx, &mut host, &mut materials, &SurfaceTransform::default());
    assert!(outcome.is_rendered());
    renderer.disable(&mut host);
}

#[test]
fn tilted_surface_with_reflected_basis() {
    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    let mut materials = RecordingMaterials::new();
    let mut settings = lake_settings();
    settings.orientation = OrientationRule::ReflectBasis;
    let mut renderer = ReflectionRenderer::new(settings);

    let surface = SurfaceTransform::new(Vec3::ZERO, Quat::from_rotation_z(0.3));
    let outcome = renderer.render_reflection(&ctx, &mut host, &mut materials, &surface);
    assert!(outcome.is_rendered());

    // The mirror camera looks along the viewer's forward reflected across the plane
    let mirror = &host.renders()[0];
    let normal = surface.up();
    let forward = viewer().forward();
    let expected = forward - 2.0 * forward.dot(normal) * normal;
    let actual = euler_to_rotation(mirror.euler_angles) * Vec3::NEG_Z;
    assert!(actual.distance(expected) < 1e-3, "{actual} vs {expected}");

    renderer.disable(&mut host);
}

#[test]
fn settings_from_json_drive_the_renderer() {
    let json = r#"{
        "texture_resolution": 128,
        "clip_plane_offset": 0.1,
        "water_material": "Pond",
        "reflect_layers": 17
    }"#;
    let settings = ReflectionSettings::from_json(json).unwrap();

    let ctx = RenderContext::new();
    let mut host = HeadlessHost::with_camera(viewer());
    let mut materials = RecordingMaterials::new();
    let mut renderer = ReflectionRenderer::new(settings);

    renderer.render_reflection(&ctx, &mut host, &mut materials, &SurfaceTransform::default());

    let target = renderer.resources().target().unwrap();
    assert_eq!(host.target_descriptor(target).unwrap().width, 128);
    assert_eq!(materials.texture("Pond", REFLECTION_TEXTURE_SLOT), Some(target));
    // Layer 4 is the water layer and is always removed
    assert_eq!(host.renders()[0].culling_mask, LayerMask::layer(0));

    renderer.disable(&mut host);
}
