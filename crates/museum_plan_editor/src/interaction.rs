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

//! The per-tool interaction state. Exactly one state is active at a time;
//! every pointer transition either stays in the machine or falls back to
//! [`InteractionState::Idle`], discarding provisional edits.

use crate::{
    selection::{ElementKind, ResizeHandle},
    validation::Host,
};
use glam::Vec2;
use museum_plan_format::{LinkKind, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Room,
    Rectangle,
    Circle,
    Triangle,
    Arc,
    Artwork,
    Door,
    Stairs,
    Elevator,
    Wall,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Room => "Room",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Arc => "Arc",
            Self::Artwork => "Artwork",
            Self::Door => "Door",
            Self::Stairs => "Stairs",
            Self::Elevator => "Elevator",
            Self::Wall => "Wall",
        }
    }

    /// Shape tools commit a whole room outline from one drag.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Triangle | Self::Arc)
    }

    pub fn link_kind(&self) -> Option<LinkKind> {
        match self {
            Self::Stairs => Some(LinkKind::Stairs),
            Self::Elevator => Some(LinkKind::Elevator),
            _ => None,
        }
    }

    pub fn places_on_wall(&self) -> bool {
        matches!(self, Self::Door | Self::Stairs | Self::Elevator)
    }
}

/// Keyboard modifiers accompanying a pointer event. Shift suppresses
/// snapping so the raw pointer position is used as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    DrawingPolygon {
        points: Vec<Vec2>,
    },
    DrawingShape {
        tool: Tool,
        anchor: Vec2,
        cursor: Vec2,
    },
    PlacingOnWall {
        tool: Tool,
        host: Host,
        start: Vec2,
        cursor: Vec2,
    },
    DraggingShape {
        kind: ElementKind,
        id: u32,
        /// Pointer position of the last applied provisional update.
        grab: Vec2,
    },
    DraggingVertex {
        room: u32,
        index: usize,
    },
    DraggingEndpoint {
        kind: ElementKind,
        id: u32,
        side: Side,
    },
    ResizingArtwork {
        artwork: u32,
        handle: ResizeHandle,
    },
    Marquee {
        anchor: Vec2,
        cursor: Vec2,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
