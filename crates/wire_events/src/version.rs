use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StreamConfigError;

const MAX_COMPONENTS: usize = 4;

/// A frozen wire-format version: an ordered tuple of numeric components plus
/// a fixed flag for whether records of this version carry experimental
/// (underscore-prefixed) fields.
///
/// Versions compare component-wise with implicit zero padding, never
/// lexically: `1.20 > 1.2`, and `1.2 == 1.2.0`.
#[derive(Debug, Clone, Copy)]
pub struct WireVersion {
    components: [i64; MAX_COMPONENTS],
    len: u8,
    includes_experimental: bool,
}

impl WireVersion {
    const fn from_components(raw: &[i64], includes_experimental: bool) -> Self {
        assert!(!raw.is_empty() && raw.len() <= MAX_COMPONENTS);
        let mut components = [0i64; MAX_COMPONENTS];
        let mut index = 0;
        while index < raw.len() {
            components[index] = raw[index];
            index += 1;
        }
        Self {
            components,
            len: raw.len() as u8,
            includes_experimental,
        }
    }

    /// Sentinel version served to a historical pre-release consumer. Resolves
    /// forever, via the numeric string `"-1"` or the alias `"xcode16"`.
    pub const XCODE16: Self = Self::from_components(&[-1], false);

    /// The current stable version.
    pub const V0: Self = Self::from_components(&[0], false);

    /// Newest version; carries experimental fields and requires an explicit
    /// opt-in to select.
    pub const V6_3: Self = Self::from_components(&[6, 3], true);

    pub const CURRENT_STABLE: Self = Self::V0;

    /// Every version this registry knows how to emit, oldest first.
    pub const KNOWN: [Self; 3] = [Self::XCODE16, Self::V0, Self::V6_3];

    pub fn components(&self) -> &[i64] {
        &self.components[..self.len as usize]
    }

    pub fn includes_experimental_fields(&self) -> bool {
        self.includes_experimental
    }

    /// Resolves a dotted numeric version string (or a legacy alias) against
    /// the registry.
    pub fn parse(raw: &str) -> Result<Self, StreamConfigError> {
        let components = parse_components(raw)?;
        Self::KNOWN
            .iter()
            .copied()
            .find(|known| cmp_padded(known.components(), &components) == Ordering::Equal)
            .ok_or_else(|| StreamConfigError::UnsupportedVersion {
                requested: raw.to_string(),
                newest: Self::CURRENT_STABLE.to_string(),
            })
    }

    /// Picks the version for a new event stream.
    ///
    /// `None` selects the current stable version. A version newer than stable
    /// is rejected unless the caller opted in to experimental versions; a
    /// requested version is never silently downgraded.
    pub fn select(
        requested: Option<&str>,
        allow_experimental: bool,
    ) -> Result<Self, StreamConfigError> {
        let Some(raw) = requested else {
            return Ok(Self::CURRENT_STABLE);
        };
        let version = Self::parse(raw)?;
        if version > Self::CURRENT_STABLE && !allow_experimental {
            return Err(StreamConfigError::UnsupportedVersion {
                requested: raw.to_string(),
                newest: Self::CURRENT_STABLE.to_string(),
            });
        }
        Ok(version)
    }
}

fn parse_components(raw: &str) -> Result<Vec<i64>, StreamConfigError> {
    let invalid = || StreamConfigError::InvalidVersion {
        raw: raw.to_string(),
    };
    if raw.eq_ignore_ascii_case("xcode16") {
        return Ok(vec![-1]);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let components = trimmed
        .split('.')
        .map(|component| component.parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    if components.is_empty() || components.len() > MAX_COMPONENTS {
        return Err(invalid());
    }
    Ok(components)
}

fn cmp_padded(left: &[i64], right: &[i64]) -> Ordering {
    let len = left.len().max(right.len());
    for index in 0..len {
        let l = left.get(index).copied().unwrap_or(0);
        let r = right.get(index).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

impl PartialEq for WireVersion {
    fn eq(&self, other: &Self) -> bool {
        cmp_padded(self.components(), other.components()) == Ordering::Equal
    }
}

impl Eq for WireVersion {}

impl PartialOrd for WireVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WireVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_padded(self.components(), other.components())
    }
}

impl Hash for WireVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Padded form, so equal tuples of different lengths hash alike.
        self.components.hash(state);
    }
}

impl fmt::Display for WireVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components = self.components().iter();
        if let Some(first) = components.next() {
            write!(f, "{first}")?;
        }
        for component in components {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}

impl Serialize for WireVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Single-component versions keep the historical bare-integer form.
        match self.components() {
            [single] => serializer.serialize_i64(*single),
            _ => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for WireVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }
        let raw = match Raw::deserialize(deserializer)? {
            Raw::Number(number) => number.to_string(),
            Raw::Text(text) => text,
        };
        WireVersion::parse(&raw).map_err(|err| D::Error::custom(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_is_component_wise_not_lexical() {
        let v1_20 = WireVersion::from_components(&[1, 20], false);
        let v1_2 = WireVersion::from_components(&[1, 2], false);
        assert!(v1_20 > v1_2);
        assert_eq!(
            WireVersion::from_components(&[1, 2], false),
            WireVersion::from_components(&[1, 2, 0], false)
        );
        assert!(WireVersion::XCODE16 < WireVersion::V0);
        assert!(WireVersion::V0 < WireVersion::V6_3);
    }

    #[test]
    fn legacy_alias_resolves_indefinitely() {
        assert_eq!(WireVersion::parse("-1").unwrap(), WireVersion::XCODE16);
        assert_eq!(WireVersion::parse("xcode16").unwrap(), WireVersion::XCODE16);
    }

    #[test]
    fn select_defaults_to_current_stable() {
        let version = WireVersion::select(None, false).unwrap();
        assert_eq!(version, WireVersion::CURRENT_STABLE);
        assert!(!version.includes_experimental_fields());
    }

    #[test]
    fn select_gates_experimental_versions_behind_opt_in() {
        let rejected = WireVersion::select(Some("6.3"), false).unwrap_err();
        assert!(matches!(
            rejected,
            StreamConfigError::UnsupportedVersion { .. }
        ));

        let version = WireVersion::select(Some("6.3"), true).unwrap();
        assert_eq!(version, WireVersion::V6_3);
        assert!(version.includes_experimental_fields());
    }

    #[test]
    fn select_rejects_unknown_and_garbage_versions() {
        assert!(matches!(
            WireVersion::select(Some("0.5"), true),
            Err(StreamConfigError::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            WireVersion::select(Some("not-a-version"), false),
            Err(StreamConfigError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn serde_round_trips_bare_integer_and_dotted_forms() {
        assert_eq!(serde_json::to_string(&WireVersion::V0).unwrap(), "0");
        assert_eq!(serde_json::to_string(&WireVersion::V6_3).unwrap(), "\"6.3\"");
        let v0: WireVersion = serde_json::from_str("0").unwrap();
        assert_eq!(v0, WireVersion::V0);
        let v6_3: WireVersion = serde_json::from_str("\"6.3\"").unwrap();
        assert_eq!(v6_3, WireVersion::V6_3);
    }
}
