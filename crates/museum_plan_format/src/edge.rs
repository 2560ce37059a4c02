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

use crate::{geometry, Side};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A directed segment between two points in grid space. Elements that sit on
/// a carrier (doors, vertical links, walls) store their geometry as an edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(transparent)]
pub struct Edge(pub [Vec2; 2]);

impl Edge {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self([start, end])
    }

    pub fn array(&self) -> [Vec2; 2] {
        self.0
    }

    pub fn start(&self) -> Vec2 {
        self.0[0]
    }

    pub fn end(&self) -> Vec2 {
        self.0[1]
    }

    pub fn side(&self, side: Side) -> Vec2 {
        self.0[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Vec2 {
        &mut self.0[side.index()]
    }

    pub fn in_reverse(&self) -> Self {
        Self([self.end(), self.start()])
    }

    /// Whether this edge covers the same points as `other` with the opposite
    /// direction.
    pub fn is_reverse_of(&self, other: &Self) -> bool {
        self.same_points_as(&other.in_reverse())
    }

    /// Whether this edge covers the same points as `other` in the same
    /// direction, comparing through quantized grid keys.
    pub fn same_points_as(&self, other: &Self) -> bool {
        geometry::grid_key(self.start()) == geometry::grid_key(other.start())
            && geometry::grid_key(self.end()) == geometry::grid_key(other.end())
    }

    pub fn delta(&self) -> Vec2 {
        self.end() - self.start()
    }

    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.start() + self.end()) / 2.0
    }

    /// The point at normalized parameter `t` along the edge, with t = 0 at
    /// the start and t = 1 at the end.
    pub fn at(&self, t: f32) -> Vec2 {
        self.start() + self.delta() * t
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self([self.start() + delta, self.end() + delta])
    }

    pub fn quantized(&self) -> Self {
        Self([
            geometry::quantize(self.start()),
            geometry::quantize(self.end()),
        ])
    }
}

impl From<[Vec2; 2]> for Edge {
    fn from(array: [Vec2; 2]) -> Self {
        Self(array)
    }
}

impl From<(Vec2, Vec2)> for Edge {
    fn from((start, end): (Vec2, Vec2)) -> Self {
        Self([start, end])
    }
}
