//! Button styles.

use serde::{Deserialize, Serialize};

/// Background style of a button.
///
/// Persisted as the platform's integer value. Parsing accepts the color
/// aliases `blurple`, `grey`/`gray`, `green` and `red`.
///
/// # Examples
///
/// ```
/// use roletools_core::ButtonStyle;
///
/// assert_eq!("blurple".parse::<ButtonStyle>().unwrap(), ButtonStyle::Primary);
/// assert_eq!("RED".parse::<ButtonStyle>().unwrap(), ButtonStyle::Danger);
/// assert_eq!(ButtonStyle::Success.value(), 3);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(ascii_case_insensitive)]
pub enum ButtonStyle {
    /// Blurple.
    #[default]
    #[strum(to_string = "primary", serialize = "blurple")]
    Primary,
    /// Grey.
    #[strum(to_string = "secondary", serialize = "grey", serialize = "gray")]
    Secondary,
    /// Green.
    #[strum(to_string = "success", serialize = "green")]
    Success,
    /// Red.
    #[strum(to_string = "danger", serialize = "red")]
    Danger,
}

impl ButtonStyle {
    /// Integer value used by the platform and the persisted layout.
    pub fn value(self) -> u8 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Success => 3,
            Self::Danger => 4,
        }
    }

    /// Color alias shown in listings.
    pub fn color_name(self) -> &'static str {
        match self {
            Self::Primary => "blurple",
            Self::Secondary => "grey",
            Self::Success => "green",
            Self::Danger => "red",
        }
    }
}

impl TryFrom<u8> for ButtonStyle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            3 => Ok(Self::Success),
            4 => Ok(Self::Danger),
            other => Err(format!("unknown button style {other}")),
        }
    }
}

impl From<ButtonStyle> for u8 {
    fn from(style: ButtonStyle) -> Self {
        style.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_value_round_trips_through_u8() {
        for style in ButtonStyle::iter() {
            assert_eq!(ButtonStyle::try_from(style.value()).unwrap(), style);
        }
        assert!(ButtonStyle::try_from(5).is_err());
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(ButtonStyle::Secondary.to_string(), "secondary");
        assert_eq!("gray".parse::<ButtonStyle>().unwrap(), ButtonStyle::Secondary);
    }
}
