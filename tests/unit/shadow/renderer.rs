use super::*;
use crate::foundation::core::{Edges, Rgba8Premul};
use crate::foundation::error::ShadowError;

#[derive(Debug)]
struct Card {
    bounds: Rect,
    fill: Rgba8Premul,
    snapshots: u32,
    content_draws: u32,
}

impl Card {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            bounds: Rect::new(x, y, x + w, y + h),
            fill: Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
            snapshots: 0,
            content_draws: 0,
        }
    }
}

impl Container for Card {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn render_content_into(&mut self, buffer: &mut PixelBuffer) {
        self.snapshots += 1;
        buffer.fill(self.fill);
    }

    fn draw_content(&mut self, _surface: &mut PixelBuffer) {
        self.content_draws += 1;
    }
}

#[derive(Debug)]
struct FailingBlur;

impl PlatformBlur for FailingBlur {
    fn blur(&self, _buffer: PixelBuffer, _radius: u32) -> ShadowResult<PixelBuffer> {
        Err(ShadowError::Other(anyhow::anyhow!("service unavailable")))
    }
}

fn stack_config(radius: i64, rate: i64, offset: u32) -> ShadowConfig {
    ShadowConfig::builder()
        .blur_strategy(BlurKind::StackBlur)
        .blur_radius(radius)
        .downscale_rate(rate)
        .offsets(Edges::uniform(offset))
        .build()
        .unwrap()
}

#[test]
fn consecutive_draws_reuse_the_cache() {
    let mut r = ShadowRenderer::new(stack_config(8, 4, 4));
    let mut card = Card::new(20.0, 20.0, 40.0, 40.0);
    let mut surface = PixelBuffer::new(80, 80).unwrap();

    for _ in 0..5 {
        r.draw(&mut card, &mut surface).unwrap();
    }
    assert_eq!(r.stats().recomputes, 1);
    assert_eq!(r.stats().cache_hits, 4);
    assert_eq!(card.snapshots, 1);
    assert_eq!(card.content_draws, 5);
    assert_eq!(r.cache_state(), CacheState::Cached);
}

#[test]
fn repeated_invalidation_recomputes_once() {
    let mut r = ShadowRenderer::new(stack_config(8, 4, 0));
    let mut card = Card::new(0.0, 0.0, 32.0, 32.0);
    let mut surface = PixelBuffer::new(64, 64).unwrap();

    r.draw(&mut card, &mut surface).unwrap();
    r.invalidate_shadow();
    r.invalidate_shadow();
    r.invalidate_shadow();
    assert_eq!(r.cache_state(), CacheState::Empty);

    r.draw(&mut card, &mut surface).unwrap();
    r.draw(&mut card, &mut surface).unwrap();
    assert_eq!(r.stats().recomputes, 2);
    assert_eq!(card.snapshots, 2);
}

#[test]
fn detach_releases_and_next_draw_recomputes() {
    let mut r = ShadowRenderer::new(ShadowConfig::default());
    let mut card = Card::new(0.0, 0.0, 16.0, 16.0);
    let mut surface = PixelBuffer::new(32, 32).unwrap();

    r.on_detached();
    assert_eq!(r.cache_state(), CacheState::Empty);

    r.draw(&mut card, &mut surface).unwrap();
    assert!(r.cached_shadow().is_some());
    r.on_detached();
    assert!(r.cached_shadow().is_none());
    r.draw(&mut card, &mut surface).unwrap();
    assert_eq!(r.stats().recomputes, 2);
}

#[test]
fn zero_sized_container_draws_no_shadow() {
    let mut r = ShadowRenderer::new(stack_config(4, 2, 3));
    let mut card = Card::new(5.0, 5.0, 0.0, 0.0);
    let mut surface = PixelBuffer::new(16, 16).unwrap();

    r.draw(&mut card, &mut surface).unwrap();
    assert!(surface.samples().iter().all(|p| *p == [0, 0, 0, 0]));
    assert_eq!(r.stats().skipped_frames, 1);
    assert_eq!(r.stats().recomputes, 0);
    assert_eq!(card.snapshots, 0);
    assert_eq!(card.content_draws, 1);
    assert_eq!(r.cache_state(), CacheState::Empty);
}

#[test]
fn container_smaller_than_downscale_rate_is_skipped() {
    let mut r = ShadowRenderer::new(stack_config(4, 8, 0));
    let mut card = Card::new(0.0, 0.0, 5.0, 40.0);
    let mut surface = PixelBuffer::new(16, 64).unwrap();
    r.draw(&mut card, &mut surface).unwrap();
    assert_eq!(r.stats().skipped_frames, 1);
    assert!(r.cached_shadow().is_none());
}

#[test]
fn documented_scenario_produces_120px_shadow_in_expanded_rect() {
    let config = ShadowConfig::builder()
        .blur_radius(10)
        .downscale_rate(4)
        .offsets(Edges::uniform(5))
        .build()
        .unwrap();
    let mut r = ShadowRenderer::new(config);
    let mut card = Card::new(20.0, 20.0, 100.0, 100.0);
    let mut surface = PixelBuffer::new(140, 140).unwrap();
    r.draw(&mut card, &mut surface).unwrap();

    let shadow = r.cached_shadow().unwrap();
    assert_eq!((shadow.width(), shadow.height()), (120, 120));

    // Drawn into [15, 125) on both axes, nothing outside.
    assert_eq!(surface.pixel(14, 70).unwrap()[3], 0);
    assert_eq!(surface.pixel(125, 70).unwrap()[3], 0);
    assert!(surface.pixel(70, 70).unwrap()[3] > 0);
    assert!(surface.pixel(16, 70).unwrap()[3] > 0);
    assert!(surface.pixel(70, 124).unwrap()[3] > 0);
}

#[test]
fn shadow_opacity_is_bounded_by_paint_alpha() {
    let config = ShadowConfig::builder()
        .alpha_percent(40)
        .blur_radius(6)
        .downscale_rate(2)
        .build()
        .unwrap();
    let mut r = ShadowRenderer::new(config);
    let mut card = Card::new(10.0, 10.0, 30.0, 30.0);
    let mut surface = PixelBuffer::new(50, 50).unwrap();
    r.draw(&mut card, &mut surface).unwrap();

    let max_a = surface.samples().iter().map(|p| p[3]).max().unwrap();
    assert!(max_a > 0);
    assert!(max_a <= config.paint_alpha());
}

#[test]
fn platform_failure_propagates_after_content_draw() {
    let config = ShadowConfig::default();
    let mut r = ShadowRenderer::with_platform_blur(config, FailingBlur);
    let mut card = Card::new(0.0, 0.0, 16.0, 16.0);
    let mut surface = PixelBuffer::new(24, 24).unwrap();

    let err = r.draw(&mut card, &mut surface).unwrap_err();
    assert!(!err.is_recoverable());
    assert_eq!(card.content_draws, 1);
    assert_eq!(r.cache_state(), CacheState::Empty);
}

#[test]
fn stack_config_ignores_platform_service() {
    let mut r = ShadowRenderer::with_platform_blur(stack_config(4, 2, 0), FailingBlur);
    let mut card = Card::new(0.0, 0.0, 16.0, 16.0);
    let mut surface = PixelBuffer::new(24, 24).unwrap();
    r.draw(&mut card, &mut surface).unwrap();
    assert_eq!(r.stats().recomputes, 1);
}

#[test]
fn pipeline_output_matches_geometry_for_both_strategies() {
    for kind in [BlurKind::StackBlur, BlurKind::PlatformNative] {
        let config = ShadowConfig::builder()
            .blur_strategy(kind)
            .blur_radius(7)
            .downscale_rate(3)
            .build()
            .unwrap();
        let g = ShadowGeometry::compute(31, 17, &config).unwrap();
        let snapshot =
            PixelBuffer::filled(31, 17, Rgba8Premul::from_straight_rgba(0, 0, 0, 255)).unwrap();
        let out = build_shadow_image(snapshot, &g, &BlurStrategy::for_kind(kind)).unwrap();
        assert_eq!((out.width(), out.height()), (45, 31));
    }
}
