//! Site version flags: shop mode and theme.
//!
//! A site version is a named combination of presentation flags the client
//! reads at startup. Exactly one version is active at a time.

use serde::{Deserialize, Serialize};

/// Site-wide catalog presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShopMode {
    /// Full catalog listing.
    #[default]
    General,
    /// Single highlighted product.
    Focus,
}

impl ShopMode {
    /// The stable string form used in the database and over the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Focus => "focus",
        }
    }
}

impl std::fmt::Display for ShopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "focus" => Ok(Self::Focus),
            _ => Err(format!("invalid shop mode: {s}")),
        }
    }
}

/// Site-wide color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The stable string form used in the database and over the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_mode_roundtrip() {
        assert_eq!("general".parse::<ShopMode>().unwrap(), ShopMode::General);
        assert_eq!("focus".parse::<ShopMode>().unwrap(), ShopMode::Focus);
        assert!("single".parse::<ShopMode>().is_err());
    }

    #[test]
    fn test_theme_roundtrip() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ShopMode::default(), ShopMode::General);
        assert_eq!(Theme::default(), Theme::Light);
    }
}
