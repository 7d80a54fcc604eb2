use anyhow::Result;
use lumen_engine::coords::{Rect, Transform2D, Vec2};
use lumen_engine::device::{GlDriver, Gpu, GpuInit, TraceDriver, WgpuDriver};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::mask::{MaskGeometry, ShapeMask, SpriteMask, TargetNode};
use lumen_engine::render::{Renderer, RendererConfig, Sprite};
use lumen_engine::state::BlendMode;
use lumen_engine::texture::{LogicalTexture, PixelSource, TextureStore};

/// Renders one scripted frame: a background, a scissored panel, a rotated
/// stencil clip nested inside it, an alpha-masked badge and an offscreen
/// pass into a render texture.
fn run_frame<D: GlDriver>(renderer: &mut Renderer<D>, store: &mut TextureStore) -> Result<()> {
    let backdrop = store.insert(LogicalTexture::from_source(PixelSource::solid(
        256,
        256,
        [40, 44, 52, 255],
    )));
    let icon = store.insert(LogicalTexture::from_source(PixelSource::solid(
        48,
        48,
        [230, 120, 40, 255],
    )));
    let badge_mask = store.insert(LogicalTexture::from_source(PixelSource::solid(
        64,
        64,
        [255, 255, 255, 128],
    )));
    let offscreen = store.insert(LogicalTexture::render_target(128.0, 128.0, 1.0));

    // ── screen ────────────────────────────────────────────────────────────
    renderer.sync_textures(store);
    renderer.render(&Sprite::new(Some(backdrop), Vec2::new(800.0, 600.0)), store);

    let mut panel = TargetNode::default();
    let mut panel_clip = ShapeMask::rect(Rect::new(40.0, 40.0, 360.0, 240.0));
    renderer.push_mask(&mut panel, &mut panel_clip, store);
    {
        for i in 0..6 {
            let at = Transform2D::translation(60.0 + i as f32 * 52.0, 60.0);
            renderer.render(&Sprite::new(Some(icon), Vec2::new(48.0, 48.0)).with_transform(at), store);
        }

        let mut diamond = ShapeMask::new(
            MaskGeometry::Triangles(vec![
                Vec2::new(0.0, -60.0),
                Vec2::new(60.0, 0.0),
                Vec2::new(0.0, 60.0),
                Vec2::new(0.0, -60.0),
                Vec2::new(0.0, 60.0),
                Vec2::new(-60.0, 0.0),
            ]),
            Transform2D::translation(220.0, 180.0),
        );
        renderer.push_mask(&mut panel, &mut diamond, store);
        renderer.render(
            &Sprite::new(Some(icon), Vec2::new(120.0, 120.0))
                .with_transform(Transform2D::translation(160.0, 120.0))
                .with_blend_mode(BlendMode::Add),
            store,
        );
        renderer.pop_mask(&diamond);
    }
    renderer.pop_mask(&panel_clip);

    let mut badge = TargetNode::default();
    let mut badge_clip =
        SpriteMask::new(badge_mask, Vec2::new(64.0, 64.0), Transform2D::translation(600.0, 40.0));
    renderer.push_mask(&mut badge, &mut badge_clip, store);
    renderer.render(
        &Sprite::new(Some(icon), Vec2::new(64.0, 64.0))
            .with_transform(Transform2D::translation(600.0, 40.0)),
        store,
    );
    renderer.pop_mask(&badge_clip);

    // ── offscreen ─────────────────────────────────────────────────────────
    renderer.bind_render_texture(offscreen, store)?;
    let mut thumb = TargetNode::default();
    let mut tilted = ShapeMask::rect(Rect::new(0.0, 0.0, 96.0, 96.0))
        .with_transform(Transform2D::rotation(30f32.to_radians()));
    renderer.push_mask(&mut thumb, &mut tilted, store);
    renderer.render(&Sprite::new(Some(backdrop), Vec2::new(128.0, 128.0)), store);
    renderer.pop_mask(&tilted);
    renderer.bind_screen();

    renderer.render(
        &Sprite::new(Some(offscreen), Vec2::new(128.0, 128.0))
            .with_transform(Transform2D::translation(640.0, 440.0))
            .with_blend_mode(BlendMode::Screen),
        store,
    );
    renderer.flush();

    // Content change picked up on the next frame.
    if let Some(tex) = store.get_mut(icon) {
        tex.update();
    }
    renderer.sync_textures(store);

    Ok(())
}

fn run_trace() -> Result<()> {
    let mut store = TextureStore::new();
    let mut renderer = Renderer::new(TraceDriver::new(), RendererConfig::default());

    run_frame(&mut renderer, &mut store)?;

    let calls = renderer.driver().calls();
    let state_changes = calls.iter().filter(|c| c.is_state_change()).count();
    println!("trace driver: {} primitives, {} state changes", calls.len(), state_changes);
    println!("resident textures: {}", renderer.textures().resident_count());

    renderer.destroy(&mut store);
    Ok(())
}

fn run_gpu() -> Result<()> {
    let gpu = pollster::block_on(Gpu::new(GpuInit::default()))?;
    let driver = WgpuDriver::new(&gpu)?;

    let mut store = TextureStore::new();
    let mut renderer = Renderer::new(driver, RendererConfig::default());

    run_frame(&mut renderer, &mut store)?;

    let draws = renderer.driver_mut().take_draw_calls();
    let scissored = draws.iter().filter(|d| d.scissor.is_some()).count();
    let stenciled = draws.iter().filter(|d| d.key.stencil.is_some()).count();
    let offscreen = draws.iter().filter(|d| d.target.is_some()).count();
    println!(
        "wgpu driver: {} draw calls ({} scissored, {} stenciled, {} offscreen), {} textures",
        draws.len(),
        scissored,
        stenciled,
        offscreen,
        renderer.driver().texture_count()
    );

    renderer.destroy(&mut store);
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    if std::env::args().any(|a| a == "--gpu") {
        log::info!("rendering one frame through wgpu");
        run_gpu()
    } else {
        log::info!("rendering one frame through the trace driver");
        run_trace()
    }
}
