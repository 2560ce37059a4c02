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

use crate::config::EditorConfig;
use glam::Vec2;
use museum_plan_format::{geometry, Floor, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Room,
    Wall,
    Door,
    Link,
    Artwork,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Room => "Room",
            Self::Wall => "Wall",
            Self::Door => "Door",
            Self::Link => "Vertical link",
            Self::Artwork => "Artwork",
        }
    }
}

/// What the select tool currently holds: nothing, a whole element, or a
/// subset of one room's vertices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Element {
        kind: ElementKind,
        id: u32,
    },
    Vertices {
        room: u32,
        indices: Vec<usize>,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn element(kind: ElementKind, id: u32) -> Self {
        Selection::Element { kind, id }
    }
}

/// One of the eight resize handles around an artwork rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    SouthWest,
    South,
    SouthEast,
    East,
    NorthEast,
    North,
    NorthWest,
    West,
}

impl ResizeHandle {
    pub fn all() -> [ResizeHandle; 8] {
        [
            Self::SouthWest,
            Self::South,
            Self::SouthEast,
            Self::East,
            Self::NorthEast,
            Self::North,
            Self::NorthWest,
            Self::West,
        ]
    }

    /// Position of the handle on the rectangle spanned by `anchor` and
    /// `anchor + size`.
    pub fn position(&self, anchor: Vec2, size: Vec2) -> Vec2 {
        let max = anchor + size;
        let mid = anchor + size / 2.0;
        match self {
            Self::SouthWest => anchor,
            Self::South => Vec2::new(mid.x, anchor.y),
            Self::SouthEast => Vec2::new(max.x, anchor.y),
            Self::East => Vec2::new(max.x, mid.y),
            Self::NorthEast => max,
            Self::North => Vec2::new(mid.x, max.y),
            Self::NorthWest => Vec2::new(anchor.x, max.y),
            Self::West => Vec2::new(anchor.x, mid.y),
        }
    }

    fn moves_west(&self) -> bool {
        matches!(self, Self::SouthWest | Self::West | Self::NorthWest)
    }

    fn moves_east(&self) -> bool {
        matches!(self, Self::SouthEast | Self::East | Self::NorthEast)
    }

    fn moves_south(&self) -> bool {
        matches!(self, Self::SouthWest | Self::South | Self::SouthEast)
    }

    fn moves_north(&self) -> bool {
        matches!(self, Self::NorthWest | Self::North | Self::NorthEast)
    }

    /// The rectangle after dragging this handle to `p`. Degenerate sizes are
    /// clamped to a sliver; the artwork validator decides acceptability.
    pub fn resize(&self, anchor: Vec2, size: Vec2, p: Vec2) -> (Vec2, Vec2) {
        let mut lo = anchor;
        let mut hi = anchor + size;
        if self.moves_west() {
            lo.x = p.x.min(hi.x - geometry::EPSILON);
        }
        if self.moves_east() {
            hi.x = p.x.max(lo.x + geometry::EPSILON);
        }
        if self.moves_south() {
            lo.y = p.y.min(hi.y - geometry::EPSILON);
        }
        if self.moves_north() {
            hi.y = p.y.max(lo.y + geometry::EPSILON);
        }
        (lo, hi - lo)
    }
}

/// The topmost pickable feature under the cursor, in the hit priority
/// order: vertex/endpoint, artwork handle, artwork body, door, link, wall,
/// room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    RoomVertex { room: u32, index: usize },
    WallEndpoint { wall: u32, side: Side },
    DoorEndpoint { door: u32, side: Side },
    LinkEndpoint { link: u32, side: Side },
    ArtworkHandle { artwork: u32, handle: ResizeHandle },
    ArtworkBody { artwork: u32 },
    Door { door: u32 },
    Link { link: u32 },
    Wall { wall: u32 },
    Room { room: u32 },
}

pub fn hit_test(floor: &Floor, p: Vec2, config: &EditorConfig) -> Option<HitTarget> {
    let vertex_radius = config.snap.vertex;
    let pick_radius = config.snap.wall;

    let mut best_vertex: Option<(f32, HitTarget)> = None;
    let mut consider = |distance: f32, radius: f32, target: HitTarget| {
        if distance <= radius && best_vertex.map(|(d, _)| distance < d).unwrap_or(true) {
            best_vertex = Some((distance, target));
        }
    };

    for (room_id, room) in &floor.rooms {
        for (index, v) in room.vertices.iter().enumerate() {
            consider(
                (p - *v).length(),
                vertex_radius,
                HitTarget::RoomVertex {
                    room: *room_id,
                    index,
                },
            );
        }
    }
    for (wall_id, wall) in &floor.walls {
        for side in [Side::start(), Side::end()] {
            consider(
                (p - wall.edge.side(side)).length(),
                vertex_radius,
                HitTarget::WallEndpoint {
                    wall: *wall_id,
                    side,
                },
            );
        }
    }
    for (door_id, door) in &floor.doors {
        for side in [Side::start(), Side::end()] {
            consider(
                (p - door.edge.side(side)).length(),
                vertex_radius,
                HitTarget::DoorEndpoint {
                    door: *door_id,
                    side,
                },
            );
        }
    }
    for (link_id, link) in &floor.links {
        for side in [Side::start(), Side::end()] {
            consider(
                (p - link.edge.side(side)).length(),
                vertex_radius,
                HitTarget::LinkEndpoint {
                    link: *link_id,
                    side,
                },
            );
        }
    }
    if let Some((_, target)) = best_vertex {
        return Some(target);
    }

    // Handles are small targets, so they get half the pick radius and the
    // nearest one wins.
    let handle_radius = pick_radius / 2.0;
    let mut best_handle: Option<(f32, HitTarget)> = None;
    for (artwork_id, artwork) in &floor.artworks {
        for handle in ResizeHandle::all() {
            let position = handle.position(artwork.anchor, artwork.size);
            let distance = (p - position).length();
            if distance <= handle_radius
                && best_handle.map(|(d, _)| distance < d).unwrap_or(true)
            {
                best_handle = Some((
                    distance,
                    HitTarget::ArtworkHandle {
                        artwork: *artwork_id,
                        handle,
                    },
                ));
            }
        }
    }
    if let Some((_, target)) = best_handle {
        return Some(target);
    }
    for (artwork_id, artwork) in &floor.artworks {
        let max = artwork.anchor + artwork.size;
        if p.x >= artwork.anchor.x && p.x <= max.x && p.y >= artwork.anchor.y && p.y <= max.y {
            return Some(HitTarget::ArtworkBody {
                artwork: *artwork_id,
            });
        }
    }
    for (door_id, door) in &floor.doors {
        if geometry::point_segment_distance(p, door.edge.start(), door.edge.end()) <= pick_radius {
            return Some(HitTarget::Door { door: *door_id });
        }
    }
    for (link_id, link) in &floor.links {
        if geometry::point_segment_distance(p, link.edge.start(), link.edge.end()) <= pick_radius {
            return Some(HitTarget::Link { link: *link_id });
        }
    }
    for (wall_id, wall) in &floor.walls {
        if geometry::point_segment_distance(p, wall.edge.start(), wall.edge.end()) <= pick_radius {
            return Some(HitTarget::Wall { wall: *wall_id });
        }
    }
    for (room_id, room) in &floor.rooms {
        if room.contains(p) {
            return Some(HitTarget::Room { room: *room_id });
        }
    }
    None
}

/// Commit a marquee box into a selection. A room whose every vertex sits in
/// the box is selected as a whole element; otherwise its caught vertices
/// form a vertex selection. Other elements are caught through their
/// characteristic point (segment midpoint, artwork anchor).
pub fn marquee_select(floor: &Floor, a: Vec2, b: Vec2) -> Selection {
    let lo = a.min(b);
    let hi = a.max(b);
    let in_box = |p: Vec2| p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y;

    let mut partial: Option<(u32, Vec<usize>)> = None;
    for (room_id, room) in &floor.rooms {
        let caught: Vec<usize> = room
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| in_box(**v))
            .map(|(i, _)| i)
            .collect();
        if caught.len() == room.vertex_count() && !caught.is_empty() {
            return Selection::element(ElementKind::Room, *room_id);
        }
        if !caught.is_empty() && partial.is_none() {
            partial = Some((*room_id, caught));
        }
    }

    for (artwork_id, artwork) in &floor.artworks {
        if in_box(artwork.anchor) {
            return Selection::element(ElementKind::Artwork, *artwork_id);
        }
    }
    for (door_id, door) in &floor.doors {
        if in_box(door.edge.midpoint()) {
            return Selection::element(ElementKind::Door, *door_id);
        }
    }
    for (link_id, link) in &floor.links {
        if in_box(link.edge.midpoint()) {
            return Selection::element(ElementKind::Link, *link_id);
        }
    }
    for (wall_id, wall) in &floor.walls {
        if in_box(wall.edge.midpoint()) {
            return Selection::element(ElementKind::Wall, *wall_id);
        }
    }

    match partial {
        Some((room, indices)) => Selection::Vertices { room, indices },
        None => Selection::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_plan_format::{geometry::rectangle_polygon, Artwork, Door, Edge, Room};

    fn furnished_floor() -> Floor {
        let mut floor = Floor::default();
        floor.rooms.insert(
            1,
            Room::from(rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0))),
        );
        floor.doors.insert(
            2,
            Door::from(Edge::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0))),
        );
        floor.artworks.insert(
            3,
            Artwork {
                anchor: Vec2::new(2.0, 2.0),
                size: Vec2::new(1.0, 1.0),
                name: Default::default(),
                document: None,
            },
        );
        floor
    }

    #[test]
    fn vertices_take_priority_over_bodies() {
        let floor = furnished_floor();
        let config = EditorConfig::default();
        let hit = hit_test(&floor, Vec2::new(0.2, 0.2), &config);
        assert_eq!(hit, Some(HitTarget::RoomVertex { room: 1, index: 0 }));
        // Deep inside the room, only the body remains.
        let hit = hit_test(&floor, Vec2::new(5.0, 5.0), &config);
        assert_eq!(hit, Some(HitTarget::Room { room: 1 }));
    }

    #[test]
    fn door_beats_room_body() {
        let floor = furnished_floor();
        let config = EditorConfig::default();
        let hit = hit_test(&floor, Vec2::new(9.9, 3.0), &config);
        assert_eq!(hit, Some(HitTarget::Door { door: 2 }));
    }

    #[test]
    fn artwork_handle_then_body() {
        let floor = furnished_floor();
        let config = EditorConfig::default();
        let hit = hit_test(&floor, Vec2::new(3.0, 3.0), &config);
        assert_eq!(
            hit,
            Some(HitTarget::ArtworkHandle {
                artwork: 3,
                handle: ResizeHandle::NorthEast
            })
        );
        let hit = hit_test(&floor, Vec2::new(2.4, 2.4), &config);
        assert_eq!(hit, Some(HitTarget::ArtworkBody { artwork: 3 }));
    }

    #[test]
    fn marquee_upgrades_full_rooms() {
        let floor = furnished_floor();
        let all = marquee_select(&floor, Vec2::new(-1.0, -1.0), Vec2::new(11.0, 7.0));
        assert_eq!(
            all,
            Selection::element(ElementKind::Room, 1)
        );
        let partial = marquee_select(&floor, Vec2::new(-1.0, -1.0), Vec2::new(1.0, 7.0));
        assert_eq!(
            partial,
            Selection::Vertices {
                room: 1,
                indices: vec![0, 3]
            }
        );
    }
}
