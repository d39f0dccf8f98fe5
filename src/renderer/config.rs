use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use super::{RendererError, RendererResult};
use crate::view::ElementId;

bitflags! {
    /// Which rectangle roles are written as a percentage of the viewport.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PercentageFlags: u8 {
        const SIZE = 1;
        const POSITION = 1 << 1;
    }
}

impl PercentageFlags {
    pub fn from_names<I, S>(names: I) -> RendererResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::empty(), |flags, name| {
            match name.as_ref().trim() {
                "size" => Ok(flags | Self::SIZE),
                "position" => Ok(flags | Self::POSITION),
                other => Err(RendererError::InvalidPercentage(other.to_string())),
            }
        })
    }
}

/// How the mount target relates to the scrolling surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerMode {
    /// The window scrolls; the target itself parents the items.
    #[default]
    None,
    /// The target becomes a scroll view holding an injected (or reused)
    /// container element.
    Scroll,
    /// The target scrolls; the given element parents the items.
    External(ElementId),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererOptions {
    pub use_offset: bool,
    pub is_equal_size: bool,
    pub is_constant_size: bool,
    pub horizontal: bool,
    #[serde(deserialize_with = "deserialize_container")]
    pub container: ContainerMode,
    #[serde(deserialize_with = "deserialize_percentage")]
    pub percentage: PercentageFlags,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererOptions {
    pub const fn new() -> Self {
        Self {
            use_offset: false,
            is_equal_size: false,
            is_constant_size: false,
            horizontal: false,
            container: ContainerMode::None,
            percentage: PercentageFlags::empty(),
        }
    }

    pub const fn use_offset(mut self, use_offset: bool) -> Self {
        self.use_offset = use_offset;
        self
    }

    pub const fn equal_size(mut self, is_equal_size: bool) -> Self {
        self.is_equal_size = is_equal_size;
        self
    }

    pub const fn constant_size(mut self, is_constant_size: bool) -> Self {
        self.is_constant_size = is_constant_size;
        self
    }

    pub const fn horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub const fn container(mut self, container: ContainerMode) -> Self {
        self.container = container;
        self
    }

    pub const fn percentage(mut self, percentage: PercentageFlags) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn from_json(json: &str) -> RendererResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentageSetting {
    Enabled(bool),
    Names(Vec<String>),
    Joined(String),
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<PercentageFlags, D::Error>
where
    D: Deserializer<'de>,
{
    let flags = match PercentageSetting::deserialize(deserializer)? {
        PercentageSetting::Enabled(true) => Ok(PercentageFlags::all()),
        PercentageSetting::Enabled(false) => Ok(PercentageFlags::empty()),
        PercentageSetting::Names(names) => PercentageFlags::from_names(&names),
        PercentageSetting::Joined(joined) => PercentageFlags::from_names(
            joined
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty()),
        ),
    };
    flags.map_err(D::Error::custom)
}

fn deserialize_container<'de, D>(deserializer: D) -> Result<ContainerMode, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(if bool::deserialize(deserializer)? {
        ContainerMode::Scroll
    } else {
        ContainerMode::None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_names_parse_once_into_flags() {
        assert_eq!(
            PercentageFlags::from_names(["position"]).unwrap(),
            PercentageFlags::POSITION
        );
        assert_eq!(
            PercentageFlags::from_names(["size", "position"]).unwrap(),
            PercentageFlags::all()
        );
        assert!(matches!(
            PercentageFlags::from_names(["offset"]),
            Err(RendererError::InvalidPercentage(name)) if name == "offset"
        ));
    }

    #[test]
    fn options_deserialize_from_original_option_names() {
        let options = RendererOptions::from_json(
            r#"{ "isEqualSize": true, "horizontal": true, "container": true, "percentage": ["size"] }"#,
        )
        .unwrap();

        assert_eq!(
            options,
            RendererOptions::new()
                .equal_size(true)
                .horizontal(true)
                .container(ContainerMode::Scroll)
                .percentage(PercentageFlags::SIZE)
        );
    }

    #[test]
    fn percentage_accepts_booleans_and_joined_names() {
        let all = RendererOptions::from_json(r#"{ "percentage": true }"#).unwrap();
        assert_eq!(all.percentage, PercentageFlags::all());

        let joined = RendererOptions::from_json(r#"{ "percentage": "position size" }"#).unwrap();
        assert_eq!(joined.percentage, PercentageFlags::all());

        assert!(RendererOptions::from_json(r#"{ "percentage": ["left"] }"#).is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let options = RendererOptions::from_json("{}").unwrap();
        assert_eq!(options, RendererOptions::default());
        assert_eq!(options.container, ContainerMode::None);
    }
}
