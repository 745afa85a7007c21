use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::blur::strategy::BlurKind;
use crate::foundation::core::Edges;
use crate::foundation::error::{ShadowError, ShadowResult};

/// Default requested blur radius in pixels.
pub const DEFAULT_BLUR_RADIUS: u32 = 1;
/// Default downscale factor applied to the snapshot before blurring.
pub const DEFAULT_DOWNSCALE_RATE: u32 = 4;
/// Default shadow opacity, in percent.
pub const DEFAULT_ALPHA_PERCENT: u8 = 50;
/// Default per-side shadow offset in pixels.
pub const DEFAULT_OFFSET: u32 = 0;

/// JSON-facing form of a shadow style. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub(crate) struct ShadowConfigDef {
    pub(crate) blur_radius: i64,
    pub(crate) downscale_rate: i64,
    pub(crate) alpha_percent: i64,
    pub(crate) offsets: OffsetsDef,
    pub(crate) blur_strategy: BlurKind,
}

impl Default for ShadowConfigDef {
    fn default() -> Self {
        Self {
            blur_radius: i64::from(DEFAULT_BLUR_RADIUS),
            downscale_rate: i64::from(DEFAULT_DOWNSCALE_RATE),
            alpha_percent: i64::from(DEFAULT_ALPHA_PERCENT),
            offsets: OffsetsDef::default(),
            blur_strategy: BlurKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OffsetsDef {
    pub(crate) left: i64,
    pub(crate) right: i64,
    pub(crate) top: i64,
    pub(crate) bottom: i64,
}

/// Validated, immutable shadow style.
///
/// For [`BlurKind::PlatformNative`] the blur radius has already been clamped into
/// `[MIN_BLUR_RADIUS, MAX_BLUR_RADIUS]`; the stack strategy keeps any positive radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowConfig {
    blur_radius: u32,
    downscale_rate: u32,
    alpha_percent: u8,
    offsets: Edges,
    blur_strategy: BlurKind,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            downscale_rate: DEFAULT_DOWNSCALE_RATE,
            alpha_percent: DEFAULT_ALPHA_PERCENT,
            offsets: Edges::uniform(DEFAULT_OFFSET),
            blur_strategy: BlurKind::default(),
        }
    }
}

impl ShadowConfig {
    /// Start from the defaults.
    pub fn builder() -> ShadowConfigBuilder {
        ShadowConfigBuilder::default()
    }

    /// Parse and validate a JSON style.
    pub fn from_json_str(s: &str) -> ShadowResult<Self> {
        let def: ShadowConfigDef = serde_json::from_str(s)
            .map_err(|e| ShadowError::serde(format!("parse shadow config JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse and validate a JSON style from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ShadowResult<Self> {
        let def: ShadowConfigDef = serde_json::from_reader(r)
            .map_err(|e| ShadowError::serde(format!("parse shadow config JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse and validate a JSON style file.
    pub fn from_path(path: impl AsRef<Path>) -> ShadowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShadowError::invalid_config(format!("open shadow config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub(crate) fn from_def(def: ShadowConfigDef) -> ShadowResult<Self> {
        if def.downscale_rate <= 0 {
            return Err(ShadowError::invalid_config(format!(
                "downscaleRate must be > 0, got {}",
                def.downscale_rate
            )));
        }
        let downscale_rate = u32::try_from(def.downscale_rate).map_err(|_| {
            ShadowError::invalid_config(format!("downscaleRate {} is too large", def.downscale_rate))
        })?;

        let blur_strategy = def.blur_strategy;
        let radius = blur_strategy.clamp_radius(def.blur_radius);
        if radius <= 0 {
            return Err(ShadowError::invalid_config(format!(
                "blurRadius must be > 0, got {}",
                def.blur_radius
            )));
        }
        // The final shadow is `side + 2 * radius`; keep the doubled radius inside u32.
        let blur_radius = u32::try_from(radius)
            .ok()
            .filter(|r| r.checked_mul(2).is_some())
            .ok_or_else(|| {
                ShadowError::invalid_config(format!("blurRadius {radius} is too large"))
            })?;

        if !(0..=100).contains(&def.alpha_percent) {
            return Err(ShadowError::invalid_config(format!(
                "alphaPercent must be within [0, 100], got {}",
                def.alpha_percent
            )));
        }

        let side = |name: &str, v: i64| -> ShadowResult<u32> {
            u32::try_from(v).map_err(|_| {
                ShadowError::invalid_config(format!("offsets.{name} must be >= 0, got {v}"))
            })
        };
        let offsets = Edges {
            left: side("left", def.offsets.left)?,
            right: side("right", def.offsets.right)?,
            top: side("top", def.offsets.top)?,
            bottom: side("bottom", def.offsets.bottom)?,
        };

        Ok(Self {
            blur_radius,
            downscale_rate,
            alpha_percent: def.alpha_percent as u8,
            offsets,
            blur_strategy,
        })
    }

    /// Requested blur radius in full-resolution pixels.
    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    /// Integer shrink factor applied before blurring.
    pub fn downscale_rate(&self) -> u32 {
        self.downscale_rate
    }

    /// Shadow opacity in percent.
    pub fn alpha_percent(&self) -> u8 {
        self.alpha_percent
    }

    /// Per-side growth of the compositing rectangle.
    pub fn offsets(&self) -> Edges {
        self.offsets
    }

    /// Selected blur implementation.
    pub fn blur_strategy(&self) -> BlurKind {
        self.blur_strategy
    }

    /// Paint-level alpha applied once when compositing: `floor(percent / 100 * 255)`.
    pub fn paint_alpha(&self) -> u8 {
        (f32::from(self.alpha_percent) / 100.0 * 255.0) as u8
    }

    /// Builder seeded with this style, for overriding individual fields.
    pub fn to_builder(&self) -> ShadowConfigBuilder {
        ShadowConfig::builder()
            .blur_radius(i64::from(self.blur_radius))
            .downscale_rate(i64::from(self.downscale_rate))
            .alpha_percent(i64::from(self.alpha_percent))
            .offsets(self.offsets)
            .blur_strategy(self.blur_strategy)
    }

    /// Host container padding grown by the shadow offsets, so children stay clear of the shadow.
    pub fn content_padding(&self, base: Edges) -> Edges {
        base.grow(self.offsets)
    }
}

/// Incremental construction of a [`ShadowConfig`]; validation happens in [`Self::build`].
#[derive(Debug, Clone, Default)]
pub struct ShadowConfigBuilder {
    def: ShadowConfigDef,
}

impl ShadowConfigBuilder {
    /// Requested blur radius.
    pub fn blur_radius(mut self, radius: i64) -> Self {
        self.def.blur_radius = radius;
        self
    }

    /// Downscale factor; must be positive.
    pub fn downscale_rate(mut self, rate: i64) -> Self {
        self.def.downscale_rate = rate;
        self
    }

    /// Opacity in percent, `[0, 100]`.
    pub fn alpha_percent(mut self, percent: i64) -> Self {
        self.def.alpha_percent = percent;
        self
    }

    /// All four offsets at once.
    pub fn offsets(mut self, offsets: Edges) -> Self {
        self.def.offsets = OffsetsDef {
            left: i64::from(offsets.left),
            right: i64::from(offsets.right),
            top: i64::from(offsets.top),
            bottom: i64::from(offsets.bottom),
        };
        self
    }

    /// Offsets from possibly negative host values (rejected at build time).
    pub fn raw_offsets(mut self, left: i64, right: i64, top: i64, bottom: i64) -> Self {
        self.def.offsets = OffsetsDef {
            left,
            right,
            top,
            bottom,
        };
        self
    }

    /// Blur implementation.
    pub fn blur_strategy(mut self, kind: BlurKind) -> Self {
        self.def.blur_strategy = kind;
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> ShadowResult<ShadowConfig> {
        ShadowConfig::from_def(self.def)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/config.rs"]
mod tests;
