//! Asset-name grammar shared by every producer and consumer of pose images.
//!
//! Version 1 layout:
//!
//! ```text
//! {prefix}_{index:03}_{x}_{y}_yaw{yaw}_pitch{pitch}_px{pupil_x}_py{pupil_y}.webp
//! ```
//!
//! Pose values are written in shortest decimal form (`20`, `-15.6`, never
//! `20.0` or `-0`). The prefix may itself contain underscores; the parser
//! splits from the right.

use crate::constants::ASSET_EXTENSION;
use crate::error::AssetNameError;
use crate::grid::Pose;
use std::fmt;
use std::str::FromStr;

pub const ASSET_NAME_VERSION: u32 = 1;

const FIELD_COUNT: usize = 8;

/// Decoded form of a pose asset filename.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetName {
    pub prefix: String,
    pub index: u32,
    pub x: u32,
    pub y: u32,
    pub pose: Pose,
}

impl AssetName {
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn parse(name: &str) -> Result<Self, AssetNameError> {
        let stem = name
            .strip_suffix(ASSET_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(|| AssetNameError::Extension(name.to_string()))?;

        let mut fields: Vec<&str> = stem.rsplitn(FIELD_COUNT, '_').collect();
        if fields.len() != FIELD_COUNT || fields[FIELD_COUNT - 1].is_empty() {
            return Err(AssetNameError::FieldCount(name.to_string()));
        }
        fields.reverse();

        let parsed = Self {
            prefix: fields[0].to_string(),
            index: int_field("index", fields[1])?,
            x: int_field("x", fields[2])?,
            y: int_field("y", fields[3])?,
            pose: Pose {
                yaw: tagged_field("yaw", "yaw", fields[4])?,
                pitch: tagged_field("pitch", "pitch", fields[5])?,
                pupil_x: tagged_field("pupil_x", "px", fields[6])?,
                pupil_y: tagged_field("pupil_y", "py", fields[7])?,
            },
        };

        if parsed.implied_width().is_none() {
            return Err(AssetNameError::Inconsistent {
                index: parsed.index,
                x: parsed.x,
                y: parsed.y,
            });
        }
        if parsed.encode() != name {
            return Err(AssetNameError::NonCanonical(name.to_string()));
        }
        Ok(parsed)
    }

    /// Grid width consistent with `index == y * width + x`, if any.
    ///
    /// Row 0 cannot pin the width down, so it reports the smallest width that
    /// still contains `x`.
    pub fn implied_width(&self) -> Option<u32> {
        if self.y == 0 {
            return (self.index == self.x).then_some(self.x + 1);
        }
        let rest = self.index.checked_sub(self.x)?;
        if rest % self.y != 0 {
            return None;
        }
        let width = rest / self.y;
        (width > self.x).then_some(width)
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{:03}_{}_{}_yaw{}_pitch{}_px{}_py{}.{}",
            self.prefix,
            self.index,
            self.x,
            self.y,
            PoseValue(self.pose.yaw),
            PoseValue(self.pose.pitch),
            PoseValue(self.pose.pupil_x),
            PoseValue(self.pose.pupil_y),
            ASSET_EXTENSION
        )
    }
}

impl FromStr for AssetName {
    type Err = AssetNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Shortest decimal rendering of an already-rounded pose value.
#[derive(Clone, Copy, Debug)]
pub struct PoseValue(pub f64);

impl fmt::Display for PoseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // adding +0.0 folds -0 into 0
        write!(f, "{}", self.0 + 0.0)
    }
}

fn int_field(field: &'static str, value: &str) -> Result<u32, AssetNameError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AssetNameError::Number {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| AssetNameError::Number {
        field,
        value: value.to_string(),
    })
}

fn tagged_field(field: &'static str, tag: &'static str, value: &str) -> Result<f64, AssetNameError> {
    let number = value
        .strip_prefix(tag)
        .ok_or_else(|| AssetNameError::MissingTag {
            field,
            tag,
            value: value.to_string(),
        })?;
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AssetNameError::Number {
            field,
            value: number.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(prefix: &str, index: u32, x: u32, y: u32, pose: [f64; 4]) -> AssetName {
        AssetName {
            prefix: prefix.to_string(),
            index,
            x,
            y,
            pose: Pose {
                yaw: pose[0],
                pitch: pose[1],
                pupil_x: pose[2],
                pupil_y: pose[3],
            },
        }
    }

    #[test]
    fn encodes_integral_values_without_decimal_point() {
        let n = name("wes-avatar", 9, 9, 0, [20.0, -20.0, 15.0, 15.0]);
        assert_eq!(n.encode(), "wes-avatar_009_9_0_yaw20_pitch-20_px15_py15.webp");
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        assert_eq!(PoseValue(-0.0).to_string(), "0");
        assert_eq!(PoseValue(-15.6).to_string(), "-15.6");
        assert_eq!(PoseValue(4.4).to_string(), "4.4");
    }

    #[test]
    fn prefix_with_underscores_parses_from_the_right() {
        let n = name("my_photo_v2", 12, 2, 1, [-4.4, 0.0, 1.5, -3.0]);
        let parsed = AssetName::parse(&n.encode()).unwrap();
        assert_eq!(parsed, n);
        assert_eq!(parsed.implied_width(), Some(10));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(matches!(
            AssetName::parse("p_000_0_0_yaw0_pitch0_px0_py0.png"),
            Err(AssetNameError::Extension(_))
        ));
        assert!(matches!(
            AssetName::parse("000_0_0_yaw0_pitch0_px0_py0.webp"),
            Err(AssetNameError::FieldCount(_))
        ));
        assert!(matches!(
            AssetName::parse("p_000_0_0_yw0_pitch0_px0_py0.webp"),
            Err(AssetNameError::MissingTag { field: "yaw", .. })
        ));
        assert!(matches!(
            AssetName::parse("p_0a0_0_0_yaw0_pitch0_px0_py0.webp"),
            Err(AssetNameError::Number { field: "index", .. })
        ));
    }

    #[test]
    fn rejects_non_canonical_and_inconsistent_names() {
        assert!(matches!(
            AssetName::parse("p_000_0_0_yaw20.0_pitch0_px0_py0.webp"),
            Err(AssetNameError::NonCanonical(_))
        ));
        assert!(matches!(
            AssetName::parse("p_5_0_0_yaw0_pitch0_px0_py0.webp"),
            Err(AssetNameError::Inconsistent { .. })
        ));
    }
}
