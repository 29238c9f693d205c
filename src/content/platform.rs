use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MapError;

/// Social platforms a link or profile can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Twitter,
    Kick,
    YouTube,
    TikTok,
    Discord,
    Instagram,
}

/// How a platform is drawn: a bundled glyph name or a remote logo image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformIcon {
    Glyph(&'static str),
    Image(&'static str),
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::Kick,
        Platform::YouTube,
        Platform::TikTok,
        Platform::Discord,
        Platform::Instagram,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Kick => "Kick",
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Discord => "Discord",
            Platform::Instagram => "Instagram",
        }
    }

    pub fn icon(&self) -> PlatformIcon {
        match self {
            Platform::Twitter => PlatformIcon::Glyph("twitter"),
            Platform::YouTube => PlatformIcon::Glyph("youtube"),
            Platform::Instagram => PlatformIcon::Glyph("instagram"),
            Platform::Kick => PlatformIcon::Image(
                "https://i.postimg.cc/65CJczDK/1726118265kick-logo-white.png",
            ),
            Platform::TikTok => PlatformIcon::Image("https://i.postimg.cc/hhWshLr1/tiktok-512.png"),
            Platform::Discord => PlatformIcon::Image(
                "https://i.postimg.cc/FFMX0wCJ/pngkey-com-discord-png-200938.png",
            ),
        }
    }

    /// Logo image URL, for platforms drawn from a remote image
    pub fn icon_url(&self) -> Option<&'static str> {
        match self.icon() {
            PlatformIcon::Image(url) => Some(url),
            PlatformIcon::Glyph(_) => None,
        }
    }

    /// Discord profiles are shared as a username to copy rather than a link
    pub fn copies_username(&self) -> bool {
        matches!(self, Platform::Discord)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(key))
            .ok_or_else(|| MapError::UnknownPlatform(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("youtube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!(" TIKTOK ".parse::<Platform>().unwrap(), Platform::TikTok);
    }

    #[test]
    fn test_unknown_platform_is_an_error() {
        match "Myspace".parse::<Platform>() {
            Err(MapError::UnknownPlatform(name)) => assert_eq!(name, "Myspace"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_every_platform_has_an_icon() {
        for platform in Platform::ALL {
            assert_eq!(platform.label().parse::<Platform>().unwrap(), platform);
            match platform.icon() {
                PlatformIcon::Glyph(name) => assert!(!name.is_empty()),
                PlatformIcon::Image(url) => assert!(url.starts_with("https://")),
            }
        }
        assert!(Platform::Kick.icon_url().is_some());
        assert!(Platform::Twitter.icon_url().is_none());
        assert!(Platform::Discord.copies_username());
        assert!(!Platform::Kick.copies_username());
    }
}
