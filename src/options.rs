use crate::{BuildError, Info, Pt};
use serde::{Deserialize, Serialize};

/// Ascent ratio used to anchor text when neither the options nor the font provide one
pub const DEFAULT_ASCENT_RATIO: f32 = 0.8;

/// Smallest font size ever emitted, in points
pub const DEFAULT_MIN_FONT_SIZE: Pt = Pt(1.0);

/// Tunables for a document build. Construct with [BuildOptions::new] (which validates
/// the combination) or use [BuildOptions::default].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBuildOptions")]
pub struct BuildOptions {
    min_font_size: Pt,
    max_font_size: Option<Pt>,
    ascent_ratio: Option<f32>,
    info: Option<Info>,
}

#[derive(Deserialize)]
struct RawBuildOptions {
    #[serde(default = "default_min_font_size")]
    min_font_size: Pt,
    #[serde(default)]
    max_font_size: Option<Pt>,
    #[serde(default)]
    ascent_ratio: Option<f32>,
    #[serde(default)]
    info: Option<Info>,
}

fn default_min_font_size() -> Pt {
    DEFAULT_MIN_FONT_SIZE
}

impl TryFrom<RawBuildOptions> for BuildOptions {
    type Error = BuildError;

    fn try_from(raw: RawBuildOptions) -> Result<Self, Self::Error> {
        Ok(BuildOptions::new(raw.min_font_size, raw.max_font_size, raw.ascent_ratio)?
            .with_info(raw.info))
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: None,
            ascent_ratio: None,
            info: None,
        }
    }
}

impl BuildOptions {
    /// * `min_font_size`: the floor for every fitted size, at least 1pt
    /// * `max_font_size`: an optional ceiling; fragment box heights always cap the size too
    /// * `ascent_ratio`: a fixed ascent-to-size ratio used to align the top of the text
    ///   with the top of its box. When [None], each font's own ascender is used.
    pub fn new(
        min_font_size: Pt,
        max_font_size: Option<Pt>,
        ascent_ratio: Option<f32>,
    ) -> Result<BuildOptions, BuildError> {
        if !min_font_size.is_finite() || *min_font_size < 1.0 {
            return Err(BuildError::InvalidOptions(format!(
                "minimum font size must be at least 1pt, got {min_font_size}"
            )));
        }
        if let Some(max) = max_font_size {
            if !max.is_finite() || max < min_font_size {
                return Err(BuildError::InvalidOptions(format!(
                    "maximum font size {max} is below the minimum {min_font_size}"
                )));
            }
        }
        if let Some(ratio) = ascent_ratio {
            if !(ratio > 0.0 && ratio <= 1.5) {
                return Err(BuildError::InvalidOptions(format!(
                    "ascent ratio must be within (0, 1.5], got {ratio}"
                )));
            }
        }

        Ok(BuildOptions {
            min_font_size,
            max_font_size,
            ascent_ratio,
            info: None,
        })
    }

    /// Attach document metadata. If not provided, no information block will be
    /// written to the PDF
    pub fn with_info(mut self, info: Option<Info>) -> BuildOptions {
        self.info = info;
        self
    }

    pub fn min_font_size(&self) -> Pt {
        self.min_font_size
    }

    pub fn max_font_size(&self) -> Option<Pt> {
        self.max_font_size
    }

    pub fn ascent_ratio(&self) -> Option<f32> {
        self.ascent_ratio
    }

    pub fn info(&self) -> Option<&Info> {
        self.info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let defaults = BuildOptions::default();
        let rebuilt = BuildOptions::new(
            defaults.min_font_size(),
            defaults.max_font_size(),
            defaults.ascent_ratio(),
        )
        .expect("defaults validate");
        assert_eq!(defaults, rebuilt);
    }

    #[test]
    fn rejects_inverted_size_range() {
        assert!(matches!(
            BuildOptions::new(Pt(12.0), Some(Pt(6.0)), None),
            Err(BuildError::InvalidOptions(_))
        ));
        assert!(matches!(
            BuildOptions::new(Pt(0.5), None, None),
            Err(BuildError::InvalidOptions(_))
        ));
    }

    #[test]
    fn rejects_nonsense_ascent_ratio() {
        assert!(BuildOptions::new(Pt(1.0), None, Some(0.0)).is_err());
        assert!(BuildOptions::new(Pt(1.0), None, Some(f32::NAN)).is_err());
        assert!(BuildOptions::new(Pt(1.0), None, Some(0.8)).is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: BuildOptions =
            serde_json::from_str(r#"{"ascent_ratio": 0.75}"#).expect("valid options");
        assert_eq!(options.min_font_size(), DEFAULT_MIN_FONT_SIZE);
        assert_eq!(options.ascent_ratio(), Some(0.75));

        assert!(serde_json::from_str::<BuildOptions>(r#"{"min_font_size": 0}"#).is_err());
    }
}
