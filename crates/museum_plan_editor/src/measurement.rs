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

//! Derived measurements: metric areas and edge lengths per room, refreshed
//! after each commit, plus on-demand readouts for in-progress sketches that
//! never enter the table.

use glam::Vec2;
use museum_plan_format::Floor;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RoomMeasurements {
    /// Polygon area in square metres.
    pub area_m2: f32,
    /// Length of each outline edge in metres, in edge order.
    pub edge_lengths_m: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable(pub BTreeMap<u32, RoomMeasurements>);

/// Recompute the whole table for one floor.
pub fn measure_floor(floor: &Floor, unit_metres: f32) -> MeasurementTable {
    let mut table = BTreeMap::new();
    for (room_id, room) in &floor.rooms {
        table.insert(
            *room_id,
            RoomMeasurements {
                area_m2: room.area() * unit_metres * unit_metres,
                edge_lengths_m: room
                    .edges()
                    .map(|(_, edge)| edge.length() * unit_metres)
                    .collect(),
            },
        );
    }
    MeasurementTable(table)
}

/// A live readout for the sketch in progress. These values are shown next
/// to the cursor and never enter the measurement table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchReadout {
    /// Length in metres of the polygon edge being drawn.
    EdgeLength(f32),
    /// Width and height in metres of the rectangle being dragged.
    RectExtents(Vec2),
    /// Radius in metres of the circle being dragged.
    CircleRadius(f32),
}

/// Length in metres of the edge the polygon tool is about to draw.
pub fn pending_edge_length(points: &[Vec2], cursor: Vec2, unit_metres: f32) -> Option<f32> {
    points
        .last()
        .map(|last| (cursor - *last).length() * unit_metres)
}

/// Width and height in metres of the rectangle being dragged out.
pub fn pending_rect_extents(anchor: Vec2, cursor: Vec2, unit_metres: f32) -> Vec2 {
    (cursor - anchor).abs() * unit_metres
}

/// Radius in metres of the circle being dragged out.
pub fn pending_circle_radius(anchor: Vec2, cursor: Vec2, unit_metres: f32) -> f32 {
    (cursor - anchor).length() * unit_metres
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use museum_plan_format::{geometry::rectangle_polygon, Room};

    #[test]
    fn areas_convert_to_square_metres() {
        let mut floor = Floor::default();
        floor.rooms.insert(
            1,
            Room::from(rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0))),
        );
        // 60 square grid units at 0.5 m per unit is 15 m².
        let table = measure_floor(&floor, 0.5);
        let room = table.0.get(&1).unwrap();
        assert_float_eq!(room.area_m2, 15.0, abs <= 1e-4);
        assert_eq!(room.edge_lengths_m.len(), 4);
        assert_float_eq!(room.edge_lengths_m[0], 5.0, abs <= 1e-4);
        assert_float_eq!(room.edge_lengths_m[1], 3.0, abs <= 1e-4);
    }

    #[test]
    fn sketch_readouts() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)];
        let length = pending_edge_length(&points, Vec2::new(4.0, 3.0), 0.5).unwrap();
        assert_float_eq!(length, 1.5, abs <= 1e-6);
        let extents = pending_rect_extents(Vec2::new(0.0, 0.0), Vec2::new(-4.0, 2.0), 0.5);
        assert_eq!(extents, Vec2::new(2.0, 1.0));
        assert_float_eq!(
            pending_circle_radius(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), 0.5),
            2.5,
            abs <= 1e-6
        );
    }
}
