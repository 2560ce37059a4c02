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

//! Pure validators over a floor context. Validators never mutate anything;
//! the lifecycle operations in [`crate::ops`] decide what to do with their
//! verdicts.

use crate::config::Constraints;
use glam::Vec2;
use museum_plan_format::{geometry, Edge, Floor, Plan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// How forgiving a commit gate is. Free-hand polygon commits are strict and
/// refuse warnings; shape-tool commits are tolerant and let them through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    Strict,
    Tolerant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validity {
    pub severity: Severity,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Validity {
    pub fn ok() -> Self {
        Self {
            severity: Severity::Ok,
            message: String::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    /// Whether a commit gate with the given strictness lets this verdict
    /// through.
    pub fn passes(&self, strictness: Strictness) -> bool {
        match (self.severity, strictness) {
            (Severity::Ok, _) => true,
            (Severity::Warning, Strictness::Tolerant) => true,
            (Severity::Warning, Strictness::Strict) => false,
            (Severity::Error, _) => false,
        }
    }
}

/// A refused operation. The committed state is untouched whenever one of
/// these comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }
}

impl From<Validity> for Rejection {
    fn from(validity: Validity) -> Self {
        Self {
            message: validity.message,
            suggestions: validity.suggestions,
        }
    }
}

/// The carrier a door or vertical link rests on: either one edge of a room
/// outline or an interior wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    RoomEdge { room: u32, edge: usize },
    Wall { wall: u32 },
}

/// Resolve a host to its current segment, if the carrier still exists.
pub fn host_edge(floor: &Floor, host: Host) -> Option<Edge> {
    match host {
        Host::RoomEdge { room, edge } => {
            let room = floor.rooms.get(&room)?;
            if edge < room.vertex_count() {
                Some(room.edge(edge))
            } else {
                None
            }
        }
        Host::Wall { wall } => floor.walls.get(&wall).map(|w| w.edge),
    }
}

/// Find the carrier that contains the given segment, preferring room edges
/// over interior walls.
pub fn find_host(floor: &Floor, edge: &Edge) -> Option<Host> {
    for (room_id, room) in &floor.rooms {
        for (index, room_edge) in room.edges() {
            if geometry::segment_contains_segment(
                room_edge.start(),
                room_edge.end(),
                edge.start(),
                edge.end(),
            ) {
                return Some(Host::RoomEdge {
                    room: *room_id,
                    edge: index,
                });
            }
        }
    }
    for (wall_id, wall) in &floor.walls {
        if geometry::segment_contains_segment(
            wall.edge.start(),
            wall.edge.end(),
            edge.start(),
            edge.end(),
        ) {
            return Some(Host::Wall { wall: *wall_id });
        }
    }
    None
}

/// Whether another opening on the floor shares a positive-length interval
/// with the candidate segment. Colinearity implies a shared host.
fn opening_overlaps(
    floor: &Floor,
    exclude_door: Option<u32>,
    exclude_link: Option<u32>,
    edge: &Edge,
) -> bool {
    let overlapping = |other: &Edge| {
        geometry::segments_overlap(other.start(), other.end(), edge.start(), edge.end())
    };
    floor
        .doors
        .iter()
        .any(|(id, door)| Some(*id) != exclude_door && overlapping(&door.edge))
        || floor
            .links
            .iter()
            .any(|(id, link)| Some(*id) != exclude_link && overlapping(&link.edge))
}

pub fn validate_room(
    floor: &Floor,
    exclude: Option<u32>,
    vertices: &[Vec2],
    constraints: &Constraints,
) -> Validity {
    if vertices.len() < 3 {
        return Validity::error("A room needs at least three vertices");
    }
    for (i, a) in vertices.iter().enumerate() {
        for b in vertices.iter().skip(i + 1) {
            if (*a - *b).length() < geometry::EPSILON {
                return Validity::error("Two vertices of the outline coincide")
                    .with_suggestion("Drag one of the coinciding vertices apart");
            }
        }
    }
    if !geometry::polygon_is_simple(vertices) {
        return Validity::error("The room outline crosses itself");
    }
    let area = geometry::polygon_area(vertices);
    if area < constraints.min_room_area {
        return Validity::error(format!(
            "Room area {:.2} is below the minimum of {:.2}",
            area, constraints.min_room_area
        ))
        .with_suggestion("Enlarge the outline before closing it");
    }
    for (other_id, other) in &floor.rooms {
        if Some(*other_id) == exclude {
            continue;
        }
        if geometry::polygons_overlap(vertices, &other.vertices) {
            return Validity::error(format!(
                "Room would overlap \"{}\"",
                other.name.0
            ));
        }
    }
    if area < constraints.min_room_area * 1.25 {
        return Validity::warning("Room is barely above the minimum area");
    }
    Validity::ok()
}

pub fn validate_artwork(
    floor: &Floor,
    exclude: Option<u32>,
    anchor: Vec2,
    size: Vec2,
    constraints: &Constraints,
) -> Validity {
    if size.x < constraints.min_artwork_w || size.y < constraints.min_artwork_h {
        return Validity::error(format!(
            "Artwork must be at least {:.2} x {:.2}",
            constraints.min_artwork_w, constraints.min_artwork_h
        ));
    }
    if size.x > constraints.max_artwork_w || size.y > constraints.max_artwork_h {
        return Validity::error(format!(
            "Artwork must be at most {:.2} x {:.2}",
            constraints.max_artwork_w, constraints.max_artwork_h
        ));
    }
    let corners = [
        anchor,
        anchor + Vec2::new(size.x, 0.0),
        anchor + size,
        anchor + Vec2::new(0.0, size.y),
    ];
    let containing = floor
        .rooms
        .values()
        .filter(|room| corners.iter().all(|c| room.contains_or_touches(*c)))
        .count();
    if containing == 0 {
        return Validity::error("Artwork must lie entirely inside one room")
            .with_suggestion("Move the artwork away from the room boundary");
    }
    let candidate = museum_plan_format::Artwork {
        anchor,
        size,
        name: Default::default(),
        document: None,
    };
    for (other_id, other) in &floor.artworks {
        if Some(*other_id) == exclude {
            continue;
        }
        if candidate.overlaps(other) {
            return Validity::error(format!(
                "Artwork would overlap \"{}\"",
                other.name.0
            ));
        }
    }
    Validity::ok()
}

pub fn validate_door(
    floor: &Floor,
    exclude: Option<u32>,
    edge: &Edge,
    constraints: &Constraints,
) -> Validity {
    let width = edge.length();
    if width < constraints.min_door_width || width > constraints.max_door_width {
        return Validity::error(format!(
            "Door width {:.2} is outside [{:.2}, {:.2}]",
            width, constraints.min_door_width, constraints.max_door_width
        ));
    }
    if find_host(floor, edge).is_none() {
        return Validity::error("A door must rest on a room edge or a wall")
            .with_suggestion("Drag along an existing wall segment");
    }
    if opening_overlaps(floor, exclude, None, edge) {
        return Validity::error("Door would overlap another opening on this wall");
    }
    Validity::ok()
}

pub fn validate_link(
    plan: &Plan,
    host_floor: u32,
    exclude: Option<u32>,
    edge: &Edge,
    to_floor: u32,
    constraints: &Constraints,
) -> Validity {
    let Some(floor) = plan.floor(host_floor) else {
        return Validity::error("Host floor no longer exists");
    };
    let width = edge.length();
    if width < constraints.min_link_width || width > constraints.max_link_width {
        return Validity::error(format!(
            "Link width {:.2} is outside [{:.2}, {:.2}]",
            width, constraints.min_link_width, constraints.max_link_width
        ));
    }
    if find_host(floor, edge).is_none() {
        return Validity::error("Stairs and elevators must rest on a room edge or a wall");
    }
    if opening_overlaps(floor, None, exclude, edge) {
        return Validity::error("Link would overlap another opening on this wall");
    }
    if to_floor == host_floor {
        return Validity::error("A vertical link cannot lead to its own floor");
    }
    if plan.floor(to_floor).is_none() {
        return Validity::error("Destination floor does not exist");
    }
    Validity::ok()
}

pub fn validate_wall(
    floor: &Floor,
    exclude: Option<u32>,
    edge: &Edge,
    room: Option<u32>,
    constraints: &Constraints,
) -> Validity {
    if edge.length() < constraints.min_wall_length {
        return Validity::error(format!(
            "Wall length {:.2} is below the minimum of {:.2}",
            edge.length(),
            constraints.min_wall_length
        ));
    }
    match room.and_then(|id| floor.rooms.get(&id)) {
        Some(owner) => {
            if !owner.contains_or_touches(edge.start()) || !owner.contains_or_touches(edge.end()) {
                return Validity::error("Wall endpoints must stay inside their room");
            }
        }
        None => {
            return Validity::error("An interior wall must lie inside a room");
        }
    }
    for (other_id, other) in &floor.walls {
        if Some(*other_id) == exclude {
            continue;
        }
        if geometry::segments_intersect(
            edge.start(),
            edge.end(),
            other.edge.start(),
            other.edge.end(),
        ) {
            return Validity::error("Wall would cross another wall");
        }
    }
    let crosses_opening = floor
        .doors
        .values()
        .map(|d| d.edge)
        .chain(floor.links.values().map(|l| l.edge))
        .any(|other| {
            geometry::segments_intersect(edge.start(), edge.end(), other.start(), other.end())
        });
    if crosses_opening {
        return Validity::error("Wall would cross a door or a vertical link");
    }
    Validity::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_plan_format::{geometry::rectangle_polygon, NameInPlan, Room};

    fn floor_with_room() -> (Floor, u32) {
        let mut floor = Floor::default();
        floor.rooms.insert(
            1,
            Room {
                name: NameInPlan("Gallery".to_owned()),
                vertices: rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)),
            },
        );
        (floor, 1)
    }

    #[test]
    fn overlapping_room_is_an_error() {
        let (floor, _) = floor_with_room();
        let constraints = Constraints::default();
        let verdict = validate_room(
            &floor,
            None,
            &rectangle_polygon(Vec2::new(5.0, 3.0), Vec2::new(15.0, 9.0)),
            &constraints,
        );
        assert_eq!(verdict.severity, Severity::Error);
        // A rectangle that only shares the right edge is fine.
        let verdict = validate_room(
            &floor,
            None,
            &rectangle_polygon(Vec2::new(10.0, 0.0), Vec2::new(20.0, 6.0)),
            &constraints,
        );
        assert!(verdict.is_ok());
    }

    #[test]
    fn tolerant_gate_lets_warnings_through() {
        let verdict = Validity::warning("close to the minimum");
        assert!(verdict.passes(Strictness::Tolerant));
        assert!(!verdict.passes(Strictness::Strict));
    }

    #[test]
    fn door_needs_a_host() {
        let (floor, _) = floor_with_room();
        let constraints = Constraints::default();
        let on_edge = Edge::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0));
        assert!(validate_door(&floor, None, &on_edge, &constraints).is_ok());
        let in_space = Edge::new(Vec2::new(14.0, 2.0), Vec2::new(14.0, 4.0));
        assert_eq!(
            validate_door(&floor, None, &in_space, &constraints).severity,
            Severity::Error
        );
    }

    #[test]
    fn artwork_outside_rooms_is_refused() {
        let (floor, _) = floor_with_room();
        let constraints = Constraints::default();
        let inside = validate_artwork(
            &floor,
            None,
            Vec2::new(2.0, 2.0),
            Vec2::new(1.0, 1.0),
            &constraints,
        );
        assert!(inside.is_ok());
        let straddling = validate_artwork(
            &floor,
            None,
            Vec2::new(9.5, 2.0),
            Vec2::new(1.0, 1.0),
            &constraints,
        );
        assert_eq!(straddling.severity, Severity::Error);
    }
}
