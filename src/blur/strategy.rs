use crate::blur::gaussian::GaussianBlurService;
use crate::blur::stack::StackBlur;
use crate::buffer::pixel::PixelBuffer;
use crate::foundation::error::ShadowResult;

/// Smallest radius accepted by the platform blur strategy, and the floor for the post-downscale
/// radius fed to either strategy.
pub const MIN_BLUR_RADIUS: u32 = 1;
/// Largest radius accepted by the platform blur strategy.
pub const MAX_BLUR_RADIUS: u32 = 25;

/// Which blur implementation a configuration selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlurKind {
    /// Platform-supplied blur service; radius restricted to `[1, 25]`.
    #[default]
    PlatformNative,
    /// Hand-rolled [`StackBlur`]; no upper radius bound.
    StackBlur,
}

impl BlurKind {
    /// Resolve a numeric style id. Unknown ids fall back to the default kind.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => Self::StackBlur,
            _ => Self::PlatformNative,
        }
    }

    /// Numeric style id (`0` platform, `1` stack).
    pub fn id(self) -> i64 {
        match self {
            Self::PlatformNative => 0,
            Self::StackBlur => 1,
        }
    }

    /// Apply this kind's radius restriction. Only the platform kind clamps.
    pub fn clamp_radius(self, radius: i64) -> i64 {
        match self {
            Self::PlatformNative => {
                radius.clamp(i64::from(MIN_BLUR_RADIUS), i64::from(MAX_BLUR_RADIUS))
            }
            Self::StackBlur => radius,
        }
    }
}

impl<'de> serde::Deserialize<'de> for BlurKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(i64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(id) => Ok(Self::from_id(id)),
            Repr::Name(name) => match name.as_str() {
                "platformNative" | "platform" | "renderscript" => Ok(Self::PlatformNative),
                "stackBlur" | "stack" => Ok(Self::StackBlur),
                other => Err(serde::de::Error::custom(format!(
                    "unknown blur strategy '{other}', expected 'stackBlur' or 'platformNative'"
                ))),
            },
        }
    }
}

/// A blur service supplied by the host platform.
///
/// Implementations receive a radius already clamped to `[MIN_BLUR_RADIUS, MAX_BLUR_RADIUS]` and
/// must return a buffer of the same dimensions.
pub trait PlatformBlur: std::fmt::Debug {
    /// Blur `buffer` by `radius` pixels.
    fn blur(&self, buffer: PixelBuffer, radius: u32) -> ShadowResult<PixelBuffer>;
}

/// Blur implementation chosen once, at configuration time.
#[derive(Debug)]
pub enum BlurStrategy {
    /// CPU stack blur.
    Stack(StackBlur),
    /// Host-provided (or bundled) platform service.
    Platform(Box<dyn PlatformBlur>),
}

impl BlurStrategy {
    /// Default implementation for `kind`. The platform kind uses [`GaussianBlurService`].
    pub fn for_kind(kind: BlurKind) -> Self {
        match kind {
            BlurKind::StackBlur => Self::Stack(StackBlur::new()),
            BlurKind::PlatformNative => Self::platform(GaussianBlurService::new()),
        }
    }

    /// Wrap a host platform service.
    pub fn platform(service: impl PlatformBlur + 'static) -> Self {
        Self::Platform(Box::new(service))
    }

    /// Kind tag of this strategy.
    pub fn kind(&self) -> BlurKind {
        match self {
            Self::Stack(_) => BlurKind::StackBlur,
            Self::Platform(_) => BlurKind::PlatformNative,
        }
    }

    /// Blur an owned buffer. The platform variant clamps `radius` into its accepted range.
    pub fn blur(&self, buffer: PixelBuffer, radius: u32) -> ShadowResult<PixelBuffer> {
        match self {
            Self::Stack(engine) => Ok(engine.blur(buffer, radius)),
            Self::Platform(service) => {
                service.blur(buffer, radius.clamp(MIN_BLUR_RADIUS, MAX_BLUR_RADIUS))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blur/strategy.rs"]
mod tests;
