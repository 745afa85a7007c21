use super::*;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
struct RecordingService {
    last_radius: Rc<Cell<u32>>,
}

impl PlatformBlur for RecordingService {
    fn blur(&self, buffer: PixelBuffer, radius: u32) -> ShadowResult<PixelBuffer> {
        self.last_radius.set(radius);
        Ok(buffer)
    }
}

#[test]
fn ids_resolve_with_default_fallback() {
    assert_eq!(BlurKind::from_id(0), BlurKind::PlatformNative);
    assert_eq!(BlurKind::from_id(1), BlurKind::StackBlur);
    assert_eq!(BlurKind::from_id(42), BlurKind::PlatformNative);
    assert_eq!(BlurKind::from_id(-1), BlurKind::default());
    assert_eq!(BlurKind::from_id(BlurKind::StackBlur.id()), BlurKind::StackBlur);
}

#[test]
fn only_platform_kind_clamps() {
    assert_eq!(BlurKind::PlatformNative.clamp_radius(0), 1);
    assert_eq!(BlurKind::PlatformNative.clamp_radius(80), 25);
    assert_eq!(BlurKind::PlatformNative.clamp_radius(7), 7);
    assert_eq!(BlurKind::StackBlur.clamp_radius(80), 80);
    assert_eq!(BlurKind::StackBlur.clamp_radius(0), 0);
}

#[test]
fn kind_deserializes_from_names_and_ids() {
    let k: BlurKind = serde_json::from_str("\"stackBlur\"").unwrap();
    assert_eq!(k, BlurKind::StackBlur);
    let k: BlurKind = serde_json::from_str("0").unwrap();
    assert_eq!(k, BlurKind::PlatformNative);
    let k: BlurKind = serde_json::from_str("9").unwrap();
    assert_eq!(k, BlurKind::PlatformNative);
    assert!(serde_json::from_str::<BlurKind>("\"box\"").is_err());
}

#[test]
fn platform_strategy_clamps_radius_per_call() {
    let seen = Rc::new(Cell::new(0));
    let strategy = BlurStrategy::platform(RecordingService {
        last_radius: seen.clone(),
    });
    assert_eq!(strategy.kind(), BlurKind::PlatformNative);

    let buf = PixelBuffer::new(2, 2).unwrap();
    let buf = strategy.blur(buf, 60).unwrap();
    assert_eq!(seen.get(), MAX_BLUR_RADIUS);
    strategy.blur(buf, 0).unwrap();
    assert_eq!(seen.get(), MIN_BLUR_RADIUS);
}

#[test]
fn for_kind_selects_matching_variant() {
    assert_eq!(
        BlurStrategy::for_kind(BlurKind::StackBlur).kind(),
        BlurKind::StackBlur
    );
    assert_eq!(
        BlurStrategy::for_kind(BlurKind::PlatformNative).kind(),
        BlurKind::PlatformNative
    );
}
