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

use crate::{is_default, Edge};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallKind {
    #[default]
    Interior,
    Exterior,
    LoadBearing,
}

impl WallKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interior => "Interior",
            Self::Exterior => "Exterior",
            Self::LoadBearing => "Load-bearing",
        }
    }
}

/// A thick straight wall segment inside a room. Walls can host doors and
/// vertical links just like room outline edges can.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Wall {
    pub edge: Edge,
    #[serde(default, skip_serializing_if = "is_default")]
    pub kind: WallKind,
    /// The room this wall belongs to, derived from the room that contains
    /// the wall midpoint at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<u32>,
}

impl Wall {
    pub fn length(&self) -> f32 {
        self.edge.length()
    }
}

impl From<Edge> for Wall {
    fn from(edge: Edge) -> Self {
        Wall {
            edge,
            kind: WallKind::default(),
            room: None,
        }
    }
}
