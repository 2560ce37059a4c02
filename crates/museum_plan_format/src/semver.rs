/*
 * Copyright (C) 2024 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use crate::{CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION};
use serde::{de::Visitor, Deserialize, Serialize};

/// museum_plan_format uses a kind of semantic versioning.
///
/// When a minor version is increased, some new optional data fields have been
/// added which can be safely ignored by older parsers with the same major
/// version number. When a major version is increased, some mandatory
/// expectation of the parser has changed and older parsers can no longer read
/// the new data.
#[derive(Clone, Copy, Debug)]
pub struct SemVer(pub u32, pub u32);

impl SemVer {
    pub fn major(&self) -> u32 {
        self.0
    }

    pub fn minor(&self) -> u32 {
        self.1
    }
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

impl PartialEq for SemVer {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl Default for SemVer {
    fn default() -> Self {
        SemVer(CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION)
    }
}

impl Serialize for SemVer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{}.{}", self.0, self.1))
    }
}

impl<'de> Deserialize<'de> for SemVer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(SemVerVisitor)
    }
}

struct SemVerVisitor;
impl<'de> Visitor<'de> for SemVerVisitor {
    type Value = SemVer;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(
            "a string of the form \"MAJOR.MINOR\" where MAJOR and MINOR are non-negative integers",
        )
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let components: Vec<_> = v.split('.').collect();
        if components.len() != 2 {
            return Err(E::custom(format!(
                "format version [{}] has [{}] components, but it must be exactly 2",
                v,
                components.len(),
            )));
        }

        let major: u32 = components[0].parse().map_err(E::custom)?;
        let minor: u32 = components[1].parse().map_err(E::custom)?;

        if major > CURRENT_MAJOR_VERSION {
            return Err(E::custom(format!(
                "major version of input data is [{}], but this version of museum_plan_format \
                 only supports up to [{}.{}]; try updating to read this file",
                major, CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION,
            )));
        }

        Ok(SemVer(major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_roundtrip() {
        let json = serde_json::to_string(&SemVer::default()).unwrap();
        assert_eq!(json, format!("\"{}.{}\"", CURRENT_MAJOR_VERSION, CURRENT_MINOR_VERSION));
        let parsed: SemVer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SemVer::default());
    }

    #[test]
    fn newer_major_is_refused() {
        let newer = format!("\"{}.0\"", CURRENT_MAJOR_VERSION + 1);
        assert!(serde_json::from_str::<SemVer>(&newer).is_err());
    }
}
