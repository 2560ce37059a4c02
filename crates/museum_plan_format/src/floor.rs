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

use crate::{Artwork, Door, NameInPlan, Room, Storey, VerticalLink, Wall};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FloorProperties {
    pub name: NameInPlan,
    pub storey: Storey,
}

impl Default for FloorProperties {
    fn default() -> Self {
        Self {
            name: NameInPlan("<Unnamed>".to_owned()),
            storey: Storey(0),
        }
    }
}

/// One storey of the museum. The floor exclusively owns its elements;
/// elements refer to rooms and floors by id, never by reference.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Floor {
    pub properties: FloorProperties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rooms: BTreeMap<u32, Room>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub walls: BTreeMap<u32, Wall>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub doors: BTreeMap<u32, Door>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<u32, VerticalLink>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artworks: BTreeMap<u32, Artwork>,
}

impl Floor {
    pub fn new(properties: FloorProperties) -> Floor {
        Floor {
            properties,
            rooms: Default::default(),
            walls: Default::default(),
            doors: Default::default(),
            links: Default::default(),
            artworks: Default::default(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.rooms.len()
            + self.walls.len()
            + self.doors.len()
            + self.links.len()
            + self.artworks.len()
    }
}
