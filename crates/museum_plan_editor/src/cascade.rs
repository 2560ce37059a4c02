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

//! Cascade propagation: when a carrier moves or disappears, the elements
//! that depend on it must follow or go. Every rule lives here as a pure
//! planner that inspects the committed plan and produces a list of
//! handle-indexed patches plus human-readable warnings. Application is a
//! separate, infallible step, so callers can preview the consequences
//! before touching the plan.

use crate::{
    config::Constraints,
    validation::{self, Rejection, Strictness},
};
use glam::Vec2;
use museum_plan_format::{geometry, Edge, Plan, Side};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetRoomVertices {
        floor: u32,
        room: u32,
        vertices: Vec<Vec2>,
    },
    SetDoorEdge {
        floor: u32,
        door: u32,
        edge: Edge,
    },
    SetLinkEdge {
        floor: u32,
        link: u32,
        edge: Edge,
    },
    SetWallEdge {
        floor: u32,
        wall: u32,
        edge: Edge,
    },
    TranslateArtwork {
        floor: u32,
        artwork: u32,
        delta: Vec2,
    },
    RemoveRoom {
        floor: u32,
        room: u32,
    },
    RemoveWall {
        floor: u32,
        wall: u32,
    },
    RemoveDoor {
        floor: u32,
        door: u32,
    },
    RemoveLink {
        floor: u32,
        link: u32,
    },
    RemoveArtwork {
        floor: u32,
        artwork: u32,
    },
    RemoveFloor {
        floor: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadePlan {
    pub patches: Vec<Patch>,
    pub warnings: Vec<String>,
}

impl CascadePlan {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Openings hosted on the given segment, with the parameters of their two
/// endpoints along it.
pub(crate) fn openings_on_segment(
    floor: &museum_plan_format::Floor,
    segment: Edge,
) -> (Vec<(u32, f32, f32)>, Vec<(u32, f32, f32)>) {
    let params = |edge: &Edge| {
        let (_, t0) = geometry::project_on_segment(edge.start(), segment.start(), segment.end());
        let (_, t1) = geometry::project_on_segment(edge.end(), segment.start(), segment.end());
        (t0, t1)
    };
    let hosted = |edge: &Edge| {
        geometry::segment_contains_segment(segment.start(), segment.end(), edge.start(), edge.end())
    };
    let doors = floor
        .doors
        .iter()
        .filter(|(_, d)| hosted(&d.edge))
        .map(|(id, d)| {
            let (t0, t1) = params(&d.edge);
            (*id, t0, t1)
        })
        .collect();
    let links = floor
        .links
        .iter()
        .filter(|(_, l)| hosted(&l.edge))
        .map(|(id, l)| {
            let (t0, t1) = params(&l.edge);
            (*id, t0, t1)
        })
        .collect();
    (doors, links)
}

fn carry_openings(
    cascade: &mut CascadePlan,
    floor_id: u32,
    old_edge: Edge,
    new_edge: Edge,
    floor: &museum_plan_format::Floor,
    constraints: &Constraints,
) -> Result<(), Rejection> {
    let (doors, links) = openings_on_segment(floor, old_edge);
    for (door, t0, t1) in doors {
        let edge = Edge::new(new_edge.at(t0), new_edge.at(t1)).quantized();
        if edge.length() < constraints.min_door_width {
            return Err(Rejection::new(
                "Moving this would shrink a door below its minimum width",
            ));
        }
        cascade.push(Patch::SetDoorEdge {
            floor: floor_id,
            door,
            edge,
        });
    }
    for (link, t0, t1) in links {
        let edge = Edge::new(new_edge.at(t0), new_edge.at(t1)).quantized();
        if edge.length() < constraints.min_link_width {
            return Err(Rejection::new(
                "Moving this would shrink a vertical link below its minimum width",
            ));
        }
        cascade.push(Patch::SetLinkEdge {
            floor: floor_id,
            link,
            edge,
        });
    }
    Ok(())
}

/// A room vertex moves: openings on the two adjacent edges keep their
/// normalized position along the edge. The whole move is rejected when the
/// reshaped polygon fails room validation or an opening would shrink below
/// its minimum width.
pub fn plan_vertex_move(
    plan: &Plan,
    floor_id: u32,
    room_id: u32,
    index: usize,
    new_pos: Vec2,
    constraints: &Constraints,
) -> Result<CascadePlan, Rejection> {
    let floor = plan
        .floor(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
    let room = floor
        .rooms
        .get(&room_id)
        .ok_or_else(|| Rejection::new("Room no longer exists"))?;
    let n = room.vertex_count();
    if index >= n {
        return Err(Rejection::new("Vertex index out of range"));
    }

    let mut vertices = room.vertices.clone();
    vertices[index] = geometry::quantize(new_pos);

    let verdict = validation::validate_room(floor, Some(room_id), &vertices, constraints);
    if !verdict.passes(Strictness::Tolerant) {
        return Err(verdict.into());
    }

    let mut cascade = CascadePlan::default();
    let reshaped: museum_plan_format::Room = vertices.clone().into();
    for edge_index in [(index + n - 1) % n, index] {
        carry_openings(
            &mut cascade,
            floor_id,
            room.edge(edge_index),
            reshaped.edge(edge_index),
            floor,
            constraints,
        )?;
    }
    cascade.push(Patch::SetRoomVertices {
        floor: floor_id,
        room: room_id,
        vertices,
    });
    Ok(cascade)
}

/// A whole room translates: openings on its edges, artworks fully inside
/// it and interior walls it owns all move rigidly with it. A collision
/// with another room rejects the move.
pub fn plan_room_translation(
    plan: &Plan,
    floor_id: u32,
    room_id: u32,
    delta: Vec2,
    constraints: &Constraints,
) -> Result<CascadePlan, Rejection> {
    let floor = plan
        .floor(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
    let room = floor
        .rooms
        .get(&room_id)
        .ok_or_else(|| Rejection::new("Room no longer exists"))?;

    let moved = room.translated(delta);
    let verdict = validation::validate_room(floor, Some(room_id), &moved.vertices, constraints);
    if !verdict.passes(Strictness::Tolerant) {
        return Err(verdict.into());
    }

    let mut cascade = CascadePlan::default();
    let on_outline = |edge: &Edge| {
        room.edges().any(|(_, room_edge)| {
            geometry::segment_contains_segment(
                room_edge.start(),
                room_edge.end(),
                edge.start(),
                edge.end(),
            )
        })
    };
    for (door_id, door) in &floor.doors {
        if on_outline(&door.edge) {
            cascade.push(Patch::SetDoorEdge {
                floor: floor_id,
                door: *door_id,
                edge: door.edge.translated(delta).quantized(),
            });
        }
    }
    for (link_id, link) in &floor.links {
        if on_outline(&link.edge) {
            cascade.push(Patch::SetLinkEdge {
                floor: floor_id,
                link: *link_id,
                edge: link.edge.translated(delta).quantized(),
            });
        }
    }
    for (artwork_id, artwork) in &floor.artworks {
        if artwork
            .corners()
            .iter()
            .all(|c| room.contains_or_touches(*c))
        {
            cascade.push(Patch::TranslateArtwork {
                floor: floor_id,
                artwork: *artwork_id,
                delta,
            });
        }
    }
    for (wall_id, wall) in &floor.walls {
        if wall.room == Some(room_id) {
            cascade.push(Patch::SetWallEdge {
                floor: floor_id,
                wall: *wall_id,
                edge: wall.edge.translated(delta).quantized(),
            });
        }
    }
    cascade.push(Patch::SetRoomVertices {
        floor: floor_id,
        room: room_id,
        vertices: moved.vertices,
    });
    Ok(cascade)
}

/// A wall endpoint moves along its line: openings attached to the wall
/// keep their normalized position. The move is rejected when the shortened
/// wall can no longer carry them or the wall itself becomes invalid.
pub fn plan_wall_endpoint_move(
    plan: &Plan,
    floor_id: u32,
    wall_id: u32,
    side: Side,
    new_pos: Vec2,
    constraints: &Constraints,
) -> Result<CascadePlan, Rejection> {
    let floor = plan
        .floor(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
    let wall = floor
        .walls
        .get(&wall_id)
        .ok_or_else(|| Rejection::new("Wall no longer exists"))?;

    let mut edge = wall.edge;
    *edge.side_mut(side) = geometry::quantize(new_pos);

    let verdict = validation::validate_wall(floor, Some(wall_id), &edge, wall.room, constraints);
    if !verdict.passes(Strictness::Tolerant) {
        return Err(verdict.into());
    }

    let mut cascade = CascadePlan::default();
    carry_openings(&mut cascade, floor_id, wall.edge, edge, floor, constraints)?;
    cascade.push(Patch::SetWallEdge {
        floor: floor_id,
        wall: wall_id,
        edge,
    });
    Ok(cascade)
}

fn remove_link_and_pair(
    cascade: &mut CascadePlan,
    plan: &Plan,
    floor_id: u32,
    link_id: u32,
) {
    cascade.push(Patch::RemoveLink {
        floor: floor_id,
        link: link_id,
    });
    let Some(link) = plan.floor(floor_id).and_then(|f| f.links.get(&link_id)) else {
        return;
    };
    if let Some(pair) = link.pair {
        if let Some(dest) = plan.floor(link.to_floor) {
            if dest.links.contains_key(&pair) {
                cascade.push(Patch::RemoveLink {
                    floor: link.to_floor,
                    link: pair,
                });
                if let Some(dest_name) = plan.floor(link.to_floor).map(|f| &f.properties.name.0) {
                    cascade.warn(format!(
                        "{} on \"{}\" loses its counterpart",
                        link.kind.label(),
                        dest_name
                    ));
                }
            }
        }
    }
}

/// Deleting a room removes the openings on its outline, the artworks fully
/// inside it and the interior walls it owns, plus anything those walls
/// were hosting.
pub fn plan_delete_room(plan: &Plan, floor_id: u32, room_id: u32) -> CascadePlan {
    let mut cascade = CascadePlan::default();
    let Some(floor) = plan.floor(floor_id) else {
        return cascade;
    };
    let Some(room) = floor.rooms.get(&room_id) else {
        return cascade;
    };

    let mut host_segments: Vec<Edge> = room.edges().map(|(_, e)| e).collect();
    for (wall_id, wall) in &floor.walls {
        if wall.room == Some(room_id) {
            host_segments.push(wall.edge);
            cascade.push(Patch::RemoveWall {
                floor: floor_id,
                wall: *wall_id,
            });
        }
    }
    for segment in &host_segments {
        let (doors, links) = openings_on_segment(floor, *segment);
        for (door, ..) in doors {
            cascade.push(Patch::RemoveDoor {
                floor: floor_id,
                door,
            });
        }
        for (link, ..) in links {
            remove_link_and_pair(&mut cascade, plan, floor_id, link);
        }
    }
    for (artwork_id, artwork) in &floor.artworks {
        if artwork
            .corners()
            .iter()
            .all(|c| room.contains_or_touches(*c))
        {
            cascade.push(Patch::RemoveArtwork {
                floor: floor_id,
                artwork: *artwork_id,
            });
        }
    }
    cascade.push(Patch::RemoveRoom {
        floor: floor_id,
        room: room_id,
    });
    cascade
}

pub fn plan_delete_wall(plan: &Plan, floor_id: u32, wall_id: u32) -> CascadePlan {
    let mut cascade = CascadePlan::default();
    let Some(floor) = plan.floor(floor_id) else {
        return cascade;
    };
    let Some(wall) = floor.walls.get(&wall_id) else {
        return cascade;
    };
    let (doors, links) = openings_on_segment(floor, wall.edge);
    for (door, ..) in doors {
        cascade.push(Patch::RemoveDoor {
            floor: floor_id,
            door,
        });
    }
    for (link, ..) in links {
        remove_link_and_pair(&mut cascade, plan, floor_id, link);
    }
    cascade.push(Patch::RemoveWall {
        floor: floor_id,
        wall: wall_id,
    });
    cascade
}

pub fn plan_delete_door(floor_id: u32, door_id: u32) -> CascadePlan {
    CascadePlan {
        patches: vec![Patch::RemoveDoor {
            floor: floor_id,
            door: door_id,
        }],
        warnings: Vec::new(),
    }
}

/// Deleting a vertical link also deletes its reciprocal twin.
pub fn plan_delete_link(plan: &Plan, floor_id: u32, link_id: u32) -> CascadePlan {
    let mut cascade = CascadePlan::default();
    remove_link_and_pair(&mut cascade, plan, floor_id, link_id);
    cascade
}

pub fn plan_delete_artwork(floor_id: u32, artwork_id: u32) -> CascadePlan {
    CascadePlan {
        patches: vec![Patch::RemoveArtwork {
            floor: floor_id,
            artwork: artwork_id,
        }],
        warnings: Vec::new(),
    }
}

/// Deleting a floor removes its elements wholesale and, on every other
/// floor, the vertical links that led to it. Refuses to delete the last
/// floor of the plan.
pub fn plan_delete_floor(plan: &Plan, floor_id: u32) -> Result<CascadePlan, Rejection> {
    if plan.floor(floor_id).is_none() {
        return Err(Rejection::new("Floor no longer exists"));
    }
    if plan.floors.len() <= 1 {
        return Err(Rejection::new("A plan must keep at least one floor"));
    }
    let mut cascade = CascadePlan::default();
    for (other_id, other) in &plan.floors {
        if *other_id == floor_id {
            continue;
        }
        for (link_id, link) in &other.links {
            if link.to_floor == floor_id {
                cascade.push(Patch::RemoveLink {
                    floor: *other_id,
                    link: *link_id,
                });
                cascade.warn(format!(
                    "{} on \"{}\" loses its connection",
                    link.kind.label(),
                    other.properties.name.0
                ));
            }
        }
    }
    cascade.push(Patch::RemoveFloor { floor: floor_id });
    Ok(cascade)
}

/// Write a planned cascade into the plan. Patches aiming at elements that
/// disappeared in the meantime are skipped, which makes re-application of
/// an already applied plan a no-op.
pub fn apply(plan: &mut Plan, cascade: &CascadePlan) {
    for patch in &cascade.patches {
        match patch {
            Patch::SetRoomVertices {
                floor,
                room,
                vertices,
            } => {
                if let Some(room) = plan.floor_mut(*floor).and_then(|f| f.rooms.get_mut(room)) {
                    room.vertices = vertices.clone();
                }
            }
            Patch::SetDoorEdge { floor, door, edge } => {
                if let Some(door) = plan.floor_mut(*floor).and_then(|f| f.doors.get_mut(door)) {
                    door.edge = *edge;
                }
            }
            Patch::SetLinkEdge { floor, link, edge } => {
                if let Some(link) = plan.floor_mut(*floor).and_then(|f| f.links.get_mut(link)) {
                    link.edge = *edge;
                }
            }
            Patch::SetWallEdge { floor, wall, edge } => {
                if let Some(wall) = plan.floor_mut(*floor).and_then(|f| f.walls.get_mut(wall)) {
                    wall.edge = *edge;
                }
            }
            Patch::TranslateArtwork {
                floor,
                artwork,
                delta,
            } => {
                if let Some(artwork) = plan
                    .floor_mut(*floor)
                    .and_then(|f| f.artworks.get_mut(artwork))
                {
                    *artwork = artwork.translated(*delta);
                }
            }
            Patch::RemoveRoom { floor, room } => {
                if let Some(f) = plan.floor_mut(*floor) {
                    f.rooms.remove(room);
                }
            }
            Patch::RemoveWall { floor, wall } => {
                if let Some(f) = plan.floor_mut(*floor) {
                    f.walls.remove(wall);
                }
            }
            Patch::RemoveDoor { floor, door } => {
                if let Some(f) = plan.floor_mut(*floor) {
                    f.doors.remove(door);
                }
            }
            Patch::RemoveLink { floor, link } => {
                if let Some(f) = plan.floor_mut(*floor) {
                    f.links.remove(link);
                }
            }
            Patch::RemoveArtwork { floor, artwork } => {
                if let Some(f) = plan.floor_mut(*floor) {
                    f.artworks.remove(artwork);
                }
            }
            Patch::RemoveFloor { floor } => {
                plan.floors.remove(floor);
            }
        }
    }
    debug!(
        target: "editor.cascade",
        patches = cascade.patches.len(),
        warnings = cascade.warnings.len(),
        "cascade applied"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_plan_format::{
        geometry::rectangle_polygon, Artwork, Door, LinkDirection, LinkKind, NameInPlan, Room,
        VerticalLink,
    };

    fn plan_with_furnished_room() -> (Plan, u32, u32, u32, u32) {
        let (mut plan, ground) = Plan::blank_ground("cascade".to_owned());
        let room = plan.fresh_id();
        let door = plan.fresh_id();
        let artwork = plan.fresh_id();
        let floor = plan.floors.get_mut(&ground).unwrap();
        floor.rooms.insert(
            room,
            Room {
                name: NameInPlan("A".to_owned()),
                vertices: rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)),
            },
        );
        floor.doors.insert(
            door,
            Door::from(Edge::new(Vec2::new(10.0, 3.0), Vec2::new(10.0, 4.0))),
        );
        floor.artworks.insert(
            artwork,
            Artwork {
                anchor: Vec2::new(2.0, 2.0),
                size: Vec2::new(1.0, 1.0),
                name: Default::default(),
                document: None,
            },
        );
        (plan, ground, room, door, artwork)
    }

    #[test]
    fn translation_carries_contents() {
        let (plan, ground, room, door, artwork) = plan_with_furnished_room();
        let cascade = plan_room_translation(
            &plan,
            ground,
            room,
            Vec2::new(3.0, 0.0),
            &Constraints::default(),
        )
        .unwrap();
        let mut moved = plan.clone();
        apply(&mut moved, &cascade);
        let floor = moved.floor(ground).unwrap();
        assert_eq!(
            floor.doors.get(&door).unwrap().edge,
            Edge::new(Vec2::new(13.0, 3.0), Vec2::new(13.0, 4.0))
        );
        assert_eq!(floor.artworks.get(&artwork).unwrap().anchor, Vec2::new(5.0, 2.0));
        assert_eq!(
            floor.rooms.get(&room).unwrap().vertices[0],
            Vec2::new(3.0, 0.0)
        );
    }

    #[test]
    fn translation_into_another_room_is_rejected() {
        let (mut plan, ground, room, ..) = plan_with_furnished_room();
        let blocker = plan.fresh_id();
        plan.floors.get_mut(&ground).unwrap().rooms.insert(
            blocker,
            Room::from(rectangle_polygon(Vec2::new(12.0, 0.0), Vec2::new(22.0, 6.0))),
        );
        let result = plan_room_translation(
            &plan,
            ground,
            room,
            Vec2::new(3.0, 0.0),
            &Constraints::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn vertex_move_reparameterizes_the_door() {
        let (plan, ground, room, door, _) = plan_with_furnished_room();
        // Stretch the room to the right: vertex 1 is (10, 0), vertex 2 is
        // (10, 6); the door sits on the edge between them at t = 0.5..2/3.
        let cascade = plan_vertex_move(
            &plan,
            ground,
            room,
            1,
            Vec2::new(14.0, 0.0),
            &Constraints::default(),
        )
        .unwrap();
        let mut moved = plan.clone();
        apply(&mut moved, &cascade);
        let door_edge = moved.floor(ground).unwrap().doors.get(&door).unwrap().edge;
        // The edge now runs (14,0) -> (10,6); the door keeps t = 0.5 and
        // t = 2/3 along it.
        assert!((door_edge.start() - Vec2::new(12.0, 3.0)).length() < 1e-3);
        assert!((door_edge.end() - Vec2::new(14.0 - 8.0 / 3.0, 4.0)).length() < 1e-2);
    }

    #[test]
    fn deleting_a_floor_removes_remote_links() {
        let (mut plan, ground, ..) = plan_with_furnished_room();
        let upper = plan.fresh_id();
        let up_link = plan.fresh_id();
        let down_link = plan.fresh_id();
        plan.floors.insert(
            upper,
            museum_plan_format::Floor::new(museum_plan_format::FloorProperties {
                name: NameInPlan("F2".to_owned()),
                storey: museum_plan_format::Storey(1),
            }),
        );
        let edge = Edge::new(Vec2::new(4.0, 4.0), Vec2::new(4.0, 6.0));
        plan.floors.get_mut(&ground).unwrap().links.insert(
            up_link,
            VerticalLink {
                kind: LinkKind::Stairs,
                edge,
                direction: LinkDirection::Up,
                to_floor: upper,
                pair: Some(down_link),
                name: Default::default(),
            },
        );
        plan.floors.get_mut(&upper).unwrap().links.insert(
            down_link,
            VerticalLink {
                kind: LinkKind::Stairs,
                edge,
                direction: LinkDirection::Down,
                to_floor: ground,
                pair: Some(up_link),
                name: Default::default(),
            },
        );

        let cascade = plan_delete_floor(&plan, upper).unwrap();
        let mut after = plan.clone();
        apply(&mut after, &cascade);
        assert!(after.floor(upper).is_none());
        assert!(after.floor(ground).unwrap().links.is_empty());
        assert!(!cascade.warnings.is_empty());

        // The last remaining floor is protected.
        assert!(plan_delete_floor(&after, ground).is_err());
    }

    #[test]
    fn reapplying_a_cascade_is_a_no_op() {
        let (plan, ground, room, ..) = plan_with_furnished_room();
        let cascade = plan_delete_room(&plan, ground, room);
        let mut once = plan.clone();
        apply(&mut once, &cascade);
        let mut twice = once.clone();
        apply(&mut twice, &cascade);
        assert_eq!(once, twice);
        assert!(once.floor(ground).unwrap().rooms.is_empty());
        assert!(once.floor(ground).unwrap().doors.is_empty());
        assert!(once.floor(ground).unwrap().artworks.is_empty());
    }
}
