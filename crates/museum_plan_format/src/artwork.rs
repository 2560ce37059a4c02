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

use crate::{geometry, NameInPlan};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle placed inside a room. The anchor is the
/// minimum corner; `size` extends towards +x and +y.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Artwork {
    pub anchor: Vec2,
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "crate::is_default")]
    pub name: NameInPlan,
    /// Reference to an attached document, typically a PDF notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl Artwork {
    /// The four rectangle corners in counter-clockwise order starting from
    /// the anchor.
    pub fn corners(&self) -> [Vec2; 4] {
        let a = self.anchor;
        let b = self.anchor + self.size;
        [
            a,
            Vec2::new(b.x, a.y),
            b,
            Vec2::new(a.x, b.y),
        ]
    }

    pub fn center(&self) -> Vec2 {
        self.anchor + self.size / 2.0
    }

    pub fn translated(&self, delta: Vec2) -> Artwork {
        Artwork {
            anchor: geometry::quantize(self.anchor + delta),
            ..self.clone()
        }
    }

    /// Whether the rectangles of two artworks share interior area, touching
    /// allowed.
    pub fn overlaps(&self, other: &Artwork) -> bool {
        let eps = geometry::EPSILON;
        let (a0, a1) = (self.anchor, self.anchor + self.size);
        let (b0, b1) = (other.anchor, other.anchor + other.size);
        a0.x + eps < b1.x && b0.x + eps < a1.x && a0.y + eps < b1.y && b0.y + eps < a1.y
    }
}
