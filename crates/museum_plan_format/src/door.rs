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

use crate::{Edge, NameInPlan};
use serde::{Deserialize, Serialize};

/// An opening resting on a host segment: a room outline edge or an interior
/// wall. The door width is the length of its edge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Door {
    pub edge: Edge,
    #[serde(default, skip_serializing_if = "crate::is_default")]
    pub name: NameInPlan,
    /// Ids of the rooms on either side of the opening, when known. A door on
    /// an exterior edge or an interior wall may connect fewer than two rooms.
    #[serde(default, skip_serializing_if = "no_rooms")]
    pub rooms: [Option<u32>; 2],
}

fn no_rooms(rooms: &[Option<u32>; 2]) -> bool {
    rooms.iter().all(Option::is_none)
}

impl Door {
    pub fn width(&self) -> f32 {
        self.edge.length()
    }

    pub fn connected_rooms(&self) -> impl Iterator<Item = u32> + '_ {
        self.rooms.iter().flatten().copied()
    }
}

impl From<Edge> for Door {
    fn from(edge: Edge) -> Self {
        Door {
            edge,
            name: NameInPlan::default(),
            rooms: [None, None],
        }
    }
}
