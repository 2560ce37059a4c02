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

use crate::{geometry, Edge, NameInPlan};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A simple closed polygon of at least three vertices, stored in drawing
/// order. The closing edge from the last vertex back to the first is
/// implicit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Room {
    pub name: NameInPlan,
    pub vertices: Vec<Vec2>,
}

impl Room {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The edge from vertex `i` to its successor, wrapping at the end.
    pub fn edge(&self, i: usize) -> Edge {
        let n = self.vertices.len();
        Edge::new(self.vertices[i % n], self.vertices[(i + 1) % n])
    }

    /// All edges in order, each paired with the index of its start vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, Edge)> + '_ {
        (0..self.vertices.len()).map(move |i| (i, self.edge(i)))
    }

    pub fn area(&self) -> f32 {
        geometry::polygon_area(&self.vertices)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        geometry::point_in_polygon(p, &self.vertices)
    }

    pub fn contains_or_touches(&self, p: Vec2) -> bool {
        geometry::point_in_or_on_polygon(p, &self.vertices)
    }

    pub fn translated(&self, delta: Vec2) -> Room {
        Room {
            name: self.name.clone(),
            vertices: self
                .vertices
                .iter()
                .map(|v| geometry::quantize(*v + delta))
                .collect(),
        }
    }
}

impl From<Vec<Vec2>> for Room {
    fn from(vertices: Vec<Vec2>) -> Self {
        Room {
            name: NameInPlan::default(),
            vertices,
        }
    }
}
