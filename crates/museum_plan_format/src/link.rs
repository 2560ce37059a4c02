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

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Stairs,
    Elevator,
}

impl LinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stairs => "Stairs",
            Self::Elevator => "Elevator",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Up,
    Down,
    Both,
}

impl LinkDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Both => "Both",
        }
    }

    /// The direction seen from the other end of the link.
    pub fn inverted(&self) -> LinkDirection {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Both => Self::Both,
        }
    }
}

/// Stairs or an elevator connecting two floors. Links come in reciprocal
/// pairs: the destination floor holds a twin at the same coordinates with
/// the inverted direction, and the two sides store each other's id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerticalLink {
    pub kind: LinkKind,
    pub edge: Edge,
    pub direction: LinkDirection,
    /// The floor this link leads to. Must exist in the plan and differ from
    /// the floor hosting the link.
    pub to_floor: u32,
    /// Id of the reciprocal link on the destination floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<u32>,
    #[serde(default, skip_serializing_if = "crate::is_default")]
    pub name: NameInPlan,
}

impl VerticalLink {
    pub fn width(&self) -> f32 {
        self.edge.length()
    }

    /// The reciprocal link that belongs on the destination floor.
    pub fn twin(&self, host_floor: u32, pair: Option<u32>) -> VerticalLink {
        VerticalLink {
            kind: self.kind,
            edge: self.edge,
            direction: self.direction.inverted(),
            to_floor: host_floor,
            pair,
            name: self.name.clone(),
        }
    }
}
