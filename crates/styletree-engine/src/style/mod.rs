//! Style maps and the cascade.
//!
//! A [`StyleMap`] holds the properties a node sets directly. Absence of a key
//! always means "inherit", never "reset to default". Known properties get their
//! own [`StyleProperty`] variant so matches over them stay exhaustive; anything
//! else goes through [`StyleProperty::Other`].

pub mod cascade;

pub use cascade::{
    ComputedStyle, StyleValue, combine, effective_style, equal_styles, is_subset_equal,
    merge_cascade, nested_style, own_style, prune_redundant,
};

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of a style property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StyleProperty {
    FontWeight,
    FontStyle,
    FontFamily,
    FontSize,
    TextDecoration,
    Color,
    BackgroundColor,
    Other(CustomProperty),
}

/// Lowercased name of a property without its own variant.
///
/// Only [`StyleProperty::parse`] builds one, so a known name always maps to
/// its variant and never ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomProperty(String);

impl CustomProperty {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StyleProperty {
    pub fn name(&self) -> &str {
        match self {
            Self::FontWeight => "font-weight",
            Self::FontStyle => "font-style",
            Self::FontFamily => "font-family",
            Self::FontSize => "font-size",
            Self::TextDecoration => "text-decoration",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::Other(custom) => custom.as_str(),
        }
    }

    /// Parses a property name. Case and surrounding whitespace are ignored.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "font-weight" => Self::FontWeight,
            "font-style" => Self::FontStyle,
            "font-family" => Self::FontFamily,
            "font-size" => Self::FontSize,
            "text-decoration" => Self::TextDecoration,
            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            _ => Self::Other(CustomProperty(name)),
        }
    }
}

impl FromStr for StyleProperty {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for StyleProperty {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for StyleProperty {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&StyleProperty> for StyleProperty {
    fn from(prop: &StyleProperty) -> Self {
        prop.clone()
    }
}

impl From<StyleProperty> for String {
    fn from(prop: StyleProperty) -> Self {
        prop.name().to_string()
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Properties set directly on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<StyleProperty, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, prop: &StyleProperty) -> Option<&str> {
        self.0.get(prop).map(String::as_str)
    }

    /// Sets a property, returning the previous value.
    pub fn set(&mut self, prop: impl Into<StyleProperty>, value: impl Into<String>) -> Option<String> {
        self.0.insert(prop.into(), value.into())
    }

    pub fn remove(&mut self, prop: &StyleProperty) -> Option<String> {
        self.0.remove(prop)
    }

    pub fn contains(&self, prop: &StyleProperty) -> bool {
        self.0.contains_key(prop)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StyleProperty, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &StyleProperty> {
        self.0.keys()
    }

    /// Copies every entry of `other` over this map.
    pub fn extend_from(&mut self, other: &StyleMap) {
        for (prop, value) in other.iter() {
            self.0.insert(prop.clone(), value.to_string());
        }
    }
}

impl<K: Into<StyleProperty>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<StyleProperty>, V: Into<String>, const N: usize> From<[(K, V); N]> for StyleMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Renders as `prop: value; prop: value`.
impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (prop, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{prop}: {value}")?;
        }
        Ok(())
    }
}
