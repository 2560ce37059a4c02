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

//! Turns a raw pointer position into an ordered list of snap candidates.
//! The caller takes the best candidate, or keeps the raw position when
//! nothing is in range.

use crate::{config::EditorConfig, interaction::Tool, validation::Host};
use glam::Vec2;
use museum_plan_format::{geometry, Edge, Floor};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    RoomVertex,
    WallEndpoint,
    RoomEdge,
    WallSegment,
    Grid,
}

impl SnapKind {
    pub fn priority(&self) -> u8 {
        match self {
            Self::RoomVertex => 10,
            Self::WallEndpoint => 9,
            Self::RoomEdge => 5,
            Self::WallSegment => 5,
            Self::Grid => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Vec2,
    pub kind: SnapKind,
    /// The carrier the snapped point lies on, for kinds that have one.
    pub carrier: Option<Host>,
    pub distance: f32,
}

pub type SnapCandidates = SmallVec<[SnapTarget; 8]>;

/// All candidates within their pick-up radii, ordered best first: priority
/// descending, ties broken by distance. Tools that place on walls only see
/// host candidates.
pub fn snap_candidates(
    floor: &Floor,
    p: Vec2,
    tool: Tool,
    config: &EditorConfig,
) -> SnapCandidates {
    let mut candidates = SnapCandidates::new();
    let host_only = tool.places_on_wall();

    if !host_only {
        for (room_id, room) in &floor.rooms {
            for (index, v) in room.vertices.iter().enumerate() {
                let distance = (p - *v).length();
                if distance <= config.snap.vertex {
                    candidates.push(SnapTarget {
                        point: *v,
                        kind: SnapKind::RoomVertex,
                        carrier: Some(Host::RoomEdge {
                            room: *room_id,
                            edge: index,
                        }),
                        distance,
                    });
                }
            }
        }
        for (wall_id, wall) in &floor.walls {
            for endpoint in wall.edge.array() {
                let distance = (p - endpoint).length();
                if distance <= config.snap.vertex {
                    candidates.push(SnapTarget {
                        point: endpoint,
                        kind: SnapKind::WallEndpoint,
                        carrier: Some(Host::Wall { wall: *wall_id }),
                        distance,
                    });
                }
            }
        }
    }

    for (room_id, room) in &floor.rooms {
        for (index, edge) in room.edges() {
            let carrier = Some(Host::RoomEdge {
                room: *room_id,
                edge: index,
            });
            let (projected, _) = geometry::project_on_segment(p, edge.start(), edge.end());
            let distance = (p - projected).length();
            if distance <= config.snap.wall {
                candidates.push(SnapTarget {
                    point: projected,
                    kind: SnapKind::RoomEdge,
                    carrier,
                    distance,
                });
            }
            let midpoint = edge.midpoint();
            let mid_distance = (p - midpoint).length();
            if mid_distance <= config.snap.wall {
                candidates.push(SnapTarget {
                    point: midpoint,
                    kind: SnapKind::RoomEdge,
                    carrier,
                    distance: mid_distance,
                });
            }
        }
    }

    for (wall_id, wall) in &floor.walls {
        let (projected, _) =
            geometry::project_on_segment(p, wall.edge.start(), wall.edge.end());
        let distance = (p - projected).length();
        if distance <= config.snap.wall {
            candidates.push(SnapTarget {
                point: projected,
                kind: SnapKind::WallSegment,
                carrier: Some(Host::Wall { wall: *wall_id }),
                distance,
            });
        }
    }

    if !host_only {
        let grid_point = geometry::snap_to_grid(p, config.grid.step);
        let distance = (p - grid_point).length();
        if distance <= config.snap.grid {
            candidates.push(SnapTarget {
                point: grid_point,
                kind: SnapKind::Grid,
                carrier: None,
                distance,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.kind
            .priority()
            .cmp(&a.kind.priority())
            .then(a.distance.total_cmp(&b.distance))
    });
    candidates
}

pub fn best_snap(floor: &Floor, p: Vec2, tool: Tool, config: &EditorConfig) -> Option<SnapTarget> {
    snap_candidates(floor, p, tool, config).first().copied()
}

/// Centre an element of the given width on the projection of `p` onto the
/// host, keeping at least `clearance` from both host endpoints. Returns
/// `None` when the host is too short to carry the element.
pub fn project_on_host(p: Vec2, host: Edge, width: f32, clearance: f32) -> Option<Edge> {
    let length = host.length();
    if length < width + 2.0 * clearance {
        return None;
    }
    let (_, t) = geometry::project_on_segment(p, host.start(), host.end());
    let centre = (t * length).clamp(clearance + width / 2.0, length - clearance - width / 2.0);
    let direction = host.delta() / length;
    Some(Edge::new(
        host.start() + direction * (centre - width / 2.0),
        host.start() + direction * (centre + width / 2.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_plan_format::{geometry::rectangle_polygon, Room};

    fn floor_with_room() -> Floor {
        let mut floor = Floor::default();
        floor.rooms.insert(
            1,
            Room::from(rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0))),
        );
        floor
    }

    #[test]
    fn vertex_beats_edge_and_grid() {
        let floor = floor_with_room();
        let config = EditorConfig::default();
        let snap = best_snap(&floor, Vec2::new(0.4, 0.3), Tool::Room, &config).unwrap();
        assert_eq!(snap.kind, SnapKind::RoomVertex);
        assert_eq!(snap.point, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn door_tool_ignores_vertices_and_grid() {
        let floor = floor_with_room();
        let config = EditorConfig::default();
        let candidates = snap_candidates(&floor, Vec2::new(0.2, 0.2), Tool::Door, &config);
        assert!(candidates
            .iter()
            .all(|c| matches!(c.kind, SnapKind::RoomEdge | SnapKind::WallSegment)));
        assert!(!candidates.is_empty());
    }

    #[test]
    fn open_space_snaps_to_grid() {
        let floor = floor_with_room();
        let config = EditorConfig::default();
        let snap = best_snap(&floor, Vec2::new(20.3, 20.4), Tool::Room, &config).unwrap();
        assert_eq!(snap.kind, SnapKind::Grid);
        assert_eq!(snap.point, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn centred_projection_respects_clearance() {
        let host = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        // Near the host start, the element is pushed inwards.
        let edge = project_on_host(Vec2::new(0.2, 1.0), host, 2.0, 0.5).unwrap();
        assert_eq!(edge.start(), Vec2::new(0.5, 0.0));
        assert_eq!(edge.end(), Vec2::new(2.5, 0.0));
        // Centred placement in the middle.
        let edge = project_on_host(Vec2::new(5.0, -1.0), host, 2.0, 0.5).unwrap();
        assert_eq!(edge.start(), Vec2::new(4.0, 0.0));
        assert_eq!(edge.end(), Vec2::new(6.0, 0.0));
        // Host too short.
        let short = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(2.5, 0.0));
        assert!(project_on_host(Vec2::new(1.0, 0.0), short, 2.0, 0.5).is_none());
    }
}
