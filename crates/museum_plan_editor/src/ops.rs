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

//! Element lifecycle operations. Every function takes the committed plan by
//! reference and either returns a whole new plan or a [`Rejection`], so a
//! refused operation can never leave a half-applied state behind.

use crate::{
    cascade::{self, CascadePlan, Patch},
    config::Constraints,
    selection::{ElementKind, ResizeHandle, Selection},
    snap,
    validation::{self, Rejection, Strictness},
};
use glam::Vec2;
use museum_plan_format::{
    geometry, Artwork, Door, Edge, Floor, LinkDirection, LinkKind, NameInPlan, Plan, Side,
    VerticalLink, Wall, WallKind,
};
use tracing::debug;

/// Rooms whose outline carries the given segment, lowest id first. A door
/// on a shared edge connects the two rooms on either side of it.
pub fn derive_door_rooms(floor: &Floor, edge: &Edge) -> [Option<u32>; 2] {
    let mut rooms = [None, None];
    let mut found = 0;
    for (room_id, room) in &floor.rooms {
        let hosted = room.edges().any(|(_, room_edge)| {
            geometry::segment_contains_segment(
                room_edge.start(),
                room_edge.end(),
                edge.start(),
                edge.end(),
            )
        });
        if hosted {
            if found < 2 {
                rooms[found] = Some(*room_id);
            }
            found += 1;
        }
    }
    rooms
}

/// Recompute the adjacency of every door on the floor. Cheap, and run after
/// any commit that may have changed which rooms flank a door.
pub fn refresh_door_adjacency(floor: &mut Floor) {
    let derived: Vec<(u32, [Option<u32>; 2])> = floor
        .doors
        .iter()
        .map(|(id, door)| (*id, derive_door_rooms(floor, &door.edge)))
        .collect();
    for (id, rooms) in derived {
        if let Some(door) = floor.doors.get_mut(&id) {
            door.rooms = rooms;
        }
    }
}

fn floor_of(plan: &Plan, floor_id: u32) -> Result<&Floor, Rejection> {
    plan.floor(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))
}

pub fn create_room(
    plan: &Plan,
    floor_id: u32,
    vertices: Vec<Vec2>,
    strictness: Strictness,
    constraints: &Constraints,
) -> Result<(Plan, u32), Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let vertices: Vec<Vec2> = vertices.into_iter().map(geometry::quantize).collect();
    let verdict = validation::validate_room(floor, None, &vertices, constraints);
    if !verdict.passes(strictness) {
        return Err(verdict.into());
    }

    let mut next = plan.clone();
    let room_id = next.fresh_id();
    let floor = next.floor_mut(floor_id).expect("floor checked above");
    floor.rooms.insert(
        room_id,
        museum_plan_format::Room {
            name: NameInPlan(format!("Room {}", room_id)),
            vertices,
        },
    );
    refresh_door_adjacency(floor);
    debug!(target: "editor.ops", room = room_id, "room created");
    Ok((next, room_id))
}

pub fn create_artwork(
    plan: &Plan,
    floor_id: u32,
    anchor: Vec2,
    size: Vec2,
    constraints: &Constraints,
) -> Result<(Plan, u32), Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let anchor = geometry::quantize(anchor);
    let size = geometry::quantize(size);
    let verdict = validation::validate_artwork(floor, None, anchor, size, constraints);
    if !verdict.is_ok() {
        return Err(verdict.into());
    }

    let mut next = plan.clone();
    let artwork_id = next.fresh_id();
    next.floor_mut(floor_id)
        .expect("floor checked above")
        .artworks
        .insert(
            artwork_id,
            Artwork {
                anchor,
                size,
                name: NameInPlan(format!("Artwork {}", artwork_id)),
                document: None,
            },
        );
    Ok((next, artwork_id))
}

pub fn create_door(
    plan: &Plan,
    floor_id: u32,
    edge: Edge,
    constraints: &Constraints,
) -> Result<(Plan, u32), Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let edge = edge.quantized();
    let verdict = validation::validate_door(floor, None, &edge, constraints);
    if !verdict.is_ok() {
        return Err(verdict.into());
    }

    let mut next = plan.clone();
    let door_id = next.fresh_id();
    let floor = next.floor_mut(floor_id).expect("floor checked above");
    let rooms = derive_door_rooms(floor, &edge);
    floor.doors.insert(
        door_id,
        Door {
            edge,
            name: NameInPlan(format!("Door {}", door_id)),
            rooms,
        },
    );
    debug!(target: "editor.ops", door = door_id, "door created");
    Ok((next, door_id))
}

/// Create a vertical link and its reciprocal twin on the destination floor,
/// at the same coordinates with the inverted direction.
pub fn create_link_pair(
    plan: &Plan,
    floor_id: u32,
    kind: LinkKind,
    edge: Edge,
    direction: LinkDirection,
    to_floor: u32,
    constraints: &Constraints,
) -> Result<(Plan, (u32, u32)), Rejection> {
    let edge = edge.quantized();
    let verdict = validation::validate_link(plan, floor_id, None, &edge, to_floor, constraints);
    if !verdict.is_ok() {
        return Err(verdict.into());
    }

    let mut next = plan.clone();
    let link_id = next.fresh_id();
    let twin_id = next.fresh_id();
    let link = VerticalLink {
        kind,
        edge,
        direction,
        to_floor,
        pair: Some(twin_id),
        name: NameInPlan(format!("{} {}", kind.label(), link_id)),
    };
    let twin = link.twin(floor_id, Some(link_id));
    next.floor_mut(floor_id)
        .expect("floor checked above")
        .links
        .insert(link_id, link);
    next.floor_mut(to_floor)
        .ok_or_else(|| Rejection::new("Destination floor no longer exists"))?
        .links
        .insert(twin_id, twin);
    debug!(target: "editor.ops", link = link_id, twin = twin_id, "link pair created");
    Ok((next, (link_id, twin_id)))
}

pub fn create_wall(
    plan: &Plan,
    floor_id: u32,
    edge: Edge,
    constraints: &Constraints,
) -> Result<(Plan, u32), Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let edge = edge.quantized();
    // The wall belongs to whichever room contains its midpoint.
    let owner = floor
        .rooms
        .iter()
        .find(|(_, room)| room.contains_or_touches(edge.midpoint()))
        .map(|(id, _)| *id);
    let verdict = validation::validate_wall(floor, None, &edge, owner, constraints);
    if !verdict.is_ok() {
        return Err(verdict.into());
    }

    let mut next = plan.clone();
    let wall_id = next.fresh_id();
    next.floor_mut(floor_id)
        .expect("floor checked above")
        .walls
        .insert(
            wall_id,
            Wall {
                edge,
                kind: WallKind::Interior,
                room: owner,
            },
        );
    Ok((next, wall_id))
}

/// Translate a whole element. Rooms carry their contents through the
/// cascade planner; walls carry the openings they host; doors and links
/// slide along their hosts; artworks revalidate their containment.
pub fn translate_element(
    plan: &Plan,
    floor_id: u32,
    kind: ElementKind,
    id: u32,
    delta: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    match kind {
        ElementKind::Room => {
            let cascade = cascade::plan_room_translation(plan, floor_id, id, delta, constraints)?;
            Ok(apply_cascade(plan, floor_id, &cascade))
        }
        ElementKind::Wall => {
            let floor = floor_of(plan, floor_id)?;
            let wall = floor
                .walls
                .get(&id)
                .ok_or_else(|| Rejection::new("Wall no longer exists"))?;
            let edge = wall.edge.translated(delta).quantized();
            let verdict =
                validation::validate_wall(floor, Some(id), &edge, wall.room, constraints);
            if !verdict.passes(Strictness::Tolerant) {
                return Err(verdict.into());
            }
            let mut cascade = CascadePlan::default();
            let (doors, links) = cascade::openings_on_segment(floor, wall.edge);
            for (door, ..) in doors {
                let hosted = &floor.doors[&door].edge;
                cascade.patches.push(Patch::SetDoorEdge {
                    floor: floor_id,
                    door,
                    edge: hosted.translated(delta).quantized(),
                });
            }
            for (link, ..) in links {
                let hosted = &floor.links[&link].edge;
                cascade.patches.push(Patch::SetLinkEdge {
                    floor: floor_id,
                    link,
                    edge: hosted.translated(delta).quantized(),
                });
            }
            cascade.patches.push(Patch::SetWallEdge {
                floor: floor_id,
                wall: id,
                edge,
            });
            Ok(apply_cascade(plan, floor_id, &cascade))
        }
        ElementKind::Door | ElementKind::Link => {
            let floor = floor_of(plan, floor_id)?;
            let edge = match kind {
                ElementKind::Door => floor.doors.get(&id).map(|d| d.edge),
                _ => floor.links.get(&id).map(|l| l.edge),
            }
            .ok_or_else(|| Rejection::new("Opening no longer exists"))?;
            slide_opening(plan, floor_id, kind, id, edge.midpoint() + delta, constraints)
        }
        ElementKind::Artwork => {
            let floor = floor_of(plan, floor_id)?;
            let artwork = floor
                .artworks
                .get(&id)
                .ok_or_else(|| Rejection::new("Artwork no longer exists"))?;
            let moved = artwork.translated(delta);
            let verdict = validation::validate_artwork(
                floor,
                Some(id),
                moved.anchor,
                moved.size,
                constraints,
            );
            if !verdict.is_ok() {
                return Err(verdict.into());
            }
            let mut next = plan.clone();
            next.floor_mut(floor_id)
                .expect("floor checked above")
                .artworks
                .insert(id, moved);
            Ok(next)
        }
    }
}

/// Re-place a door or link so that it is centred on the projection of `p`
/// onto the nearest host, keeping its width.
pub fn slide_opening(
    plan: &Plan,
    floor_id: u32,
    kind: ElementKind,
    id: u32,
    p: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let (width, min_clearance) = (
        match kind {
            ElementKind::Door => floor
                .doors
                .get(&id)
                .map(|d| d.width())
                .ok_or_else(|| Rejection::new("Door no longer exists"))?,
            _ => floor
                .links
                .get(&id)
                .map(|l| l.width())
                .ok_or_else(|| Rejection::new("Link no longer exists"))?,
        },
        constraints.min_clearance,
    );

    // Nearest host segment to the pointer.
    let mut best: Option<(f32, Edge)> = None;
    let mut offer = |segment: Edge| {
        let distance = geometry::point_segment_distance(p, segment.start(), segment.end());
        if best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, segment));
        }
    };
    for room in floor.rooms.values() {
        for (_, edge) in room.edges() {
            offer(edge);
        }
    }
    for wall in floor.walls.values() {
        offer(wall.edge);
    }
    let (_, host) = best.ok_or_else(|| Rejection::new("No wall to slide along"))?;
    let edge = snap::project_on_host(p, host, width, min_clearance)
        .ok_or_else(|| Rejection::new("The wall is too short for this opening"))?
        .quantized();

    let mut next = plan.clone();
    match kind {
        ElementKind::Door => {
            let floor_ref = next.floor(floor_id).expect("floor checked above");
            let verdict = validation::validate_door(floor_ref, Some(id), &edge, constraints);
            if !verdict.is_ok() {
                return Err(verdict.into());
            }
            let floor = next.floor_mut(floor_id).expect("floor checked above");
            let rooms = derive_door_rooms(floor, &edge);
            let door = floor.doors.get_mut(&id).expect("existence checked above");
            door.edge = edge;
            door.rooms = rooms;
        }
        _ => {
            let link = next
                .floor(floor_id)
                .and_then(|f| f.links.get(&id))
                .expect("existence checked above");
            let to_floor = link.to_floor;
            let pair = link.pair;
            let verdict =
                validation::validate_link(&next, floor_id, Some(id), &edge, to_floor, constraints);
            if !verdict.is_ok() {
                return Err(verdict.into());
            }
            next.floor_mut(floor_id)
                .expect("floor checked above")
                .links
                .get_mut(&id)
                .expect("existence checked above")
                .edge = edge;
            // The twin mirrors the new coordinates.
            if let Some(pair) = pair {
                if let Some(twin) = next
                    .floor_mut(to_floor)
                    .and_then(|f| f.links.get_mut(&pair))
                {
                    twin.edge = edge;
                }
            }
        }
    }
    Ok(next)
}

pub fn move_room_vertex(
    plan: &Plan,
    floor_id: u32,
    room_id: u32,
    index: usize,
    p: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    let cascade = cascade::plan_vertex_move(plan, floor_id, room_id, index, p, constraints)?;
    Ok(apply_cascade(plan, floor_id, &cascade))
}

pub fn move_wall_endpoint(
    plan: &Plan,
    floor_id: u32,
    wall_id: u32,
    side: Side,
    p: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    let cascade = cascade::plan_wall_endpoint_move(plan, floor_id, wall_id, side, p, constraints)?;
    Ok(apply_cascade(plan, floor_id, &cascade))
}

/// Drag one endpoint of a door or link along its host: the dragged end
/// follows the projection of the pointer onto the host segment.
pub fn move_opening_endpoint(
    plan: &Plan,
    floor_id: u32,
    kind: ElementKind,
    id: u32,
    side: Side,
    p: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let edge = match kind {
        ElementKind::Door => floor.doors.get(&id).map(|d| d.edge),
        _ => floor.links.get(&id).map(|l| l.edge),
    }
    .ok_or_else(|| Rejection::new("Opening no longer exists"))?;

    let host = validation::find_host(floor, &edge)
        .and_then(|host| validation::host_edge(floor, host))
        .ok_or_else(|| Rejection::new("Opening lost its host segment"))?;
    let (projected, _) = geometry::project_on_segment(p, host.start(), host.end());

    let mut moved = edge;
    *moved.side_mut(side) = geometry::quantize(projected);

    let mut next = plan.clone();
    match kind {
        ElementKind::Door => {
            let verdict = validation::validate_door(
                next.floor(floor_id).expect("floor checked above"),
                Some(id),
                &moved,
                constraints,
            );
            if !verdict.is_ok() {
                return Err(verdict.into());
            }
            let floor = next.floor_mut(floor_id).expect("floor checked above");
            let rooms = derive_door_rooms(floor, &moved);
            let door = floor.doors.get_mut(&id).expect("existence checked above");
            door.edge = moved;
            door.rooms = rooms;
        }
        _ => {
            let link = floor.links.get(&id).expect("existence checked above");
            let verdict = validation::validate_link(
                plan,
                floor_id,
                Some(id),
                &moved,
                link.to_floor,
                constraints,
            );
            if !verdict.is_ok() {
                return Err(verdict.into());
            }
            let (to_floor, pair) = (link.to_floor, link.pair);
            next.floor_mut(floor_id)
                .expect("floor checked above")
                .links
                .get_mut(&id)
                .expect("existence checked above")
                .edge = moved;
            if let Some(pair) = pair {
                if let Some(twin) = next
                    .floor_mut(to_floor)
                    .and_then(|f| f.links.get_mut(&pair))
                {
                    twin.edge = moved;
                }
            }
        }
    }
    Ok(next)
}

pub fn resize_artwork(
    plan: &Plan,
    floor_id: u32,
    id: u32,
    handle: ResizeHandle,
    p: Vec2,
    constraints: &Constraints,
) -> Result<Plan, Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let artwork = floor
        .artworks
        .get(&id)
        .ok_or_else(|| Rejection::new("Artwork no longer exists"))?;
    let (anchor, size) = handle.resize(artwork.anchor, artwork.size, p);
    let (anchor, size) = (geometry::quantize(anchor), geometry::quantize(size));
    let verdict = validation::validate_artwork(floor, Some(id), anchor, size, constraints);
    if !verdict.is_ok() {
        return Err(verdict.into());
    }
    let mut next = plan.clone();
    let artwork = next
        .floor_mut(floor_id)
        .expect("floor checked above")
        .artworks
        .get_mut(&id)
        .expect("existence checked above");
    artwork.anchor = anchor;
    artwork.size = size;
    Ok(next)
}

/// Remove a subset of a room's vertices. Openings hosted on the edges that
/// disappear go with them; the shrunken polygon must still validate.
pub fn delete_room_vertices(
    plan: &Plan,
    floor_id: u32,
    room_id: u32,
    indices: &[usize],
    constraints: &Constraints,
) -> Result<(Plan, CascadePlan), Rejection> {
    let floor = floor_of(plan, floor_id)?;
    let room = floor
        .rooms
        .get(&room_id)
        .ok_or_else(|| Rejection::new("Room no longer exists"))?;
    let n = room.vertex_count();
    let remaining: Vec<Vec2> = room
        .vertices
        .iter()
        .enumerate()
        .filter(|(i, _)| !indices.contains(i))
        .map(|(_, v)| *v)
        .collect();
    if remaining.len() < 3 {
        return Err(Rejection::new("A room needs at least three vertices"));
    }
    let verdict = validation::validate_room(floor, Some(room_id), &remaining, constraints);
    if !verdict.passes(Strictness::Tolerant) {
        return Err(verdict.into());
    }

    let mut cascade = CascadePlan::default();
    for &index in indices {
        if index >= n {
            continue;
        }
        for edge_index in [(index + n - 1) % n, index] {
            let segment = room.edge(edge_index);
            let (doors, links) = cascade::openings_on_segment(floor, segment);
            for (door, ..) in doors {
                cascade.patches.push(Patch::RemoveDoor {
                    floor: floor_id,
                    door,
                });
            }
            for (link, ..) in links {
                let removal = cascade::plan_delete_link(plan, floor_id, link);
                cascade.patches.extend(removal.patches);
                cascade.warnings.extend(removal.warnings);
            }
        }
    }
    cascade.patches.push(Patch::SetRoomVertices {
        floor: floor_id,
        room: room_id,
        vertices: remaining,
    });
    Ok((apply_cascade(plan, floor_id, &cascade), cascade))
}

/// Delete whatever the selection holds, cascading to dependents. Returns
/// the new plan together with the cascade that was applied, so the caller
/// can surface its warnings.
pub fn delete_selection(
    plan: &Plan,
    floor_id: u32,
    selection: &Selection,
    constraints: &Constraints,
) -> Result<(Plan, CascadePlan), Rejection> {
    match selection {
        Selection::None => Err(Rejection::new("Nothing is selected")),
        Selection::Vertices { room, indices } => {
            delete_room_vertices(plan, floor_id, *room, indices, constraints)
        }
        Selection::Element { kind, id } => {
            let cascade = match kind {
                ElementKind::Room => cascade::plan_delete_room(plan, floor_id, *id),
                ElementKind::Wall => cascade::plan_delete_wall(plan, floor_id, *id),
                ElementKind::Door => cascade::plan_delete_door(floor_id, *id),
                ElementKind::Link => cascade::plan_delete_link(plan, floor_id, *id),
                ElementKind::Artwork => cascade::plan_delete_artwork(floor_id, *id),
            };
            if cascade.is_empty() {
                return Err(Rejection::new("Element no longer exists"));
            }
            Ok((apply_cascade(plan, floor_id, &cascade), cascade))
        }
    }
}

/// A property edit routed through the same validation pipeline as the
/// geometric operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPatch {
    Name(String),
    Document(Option<String>),
    WallKind(WallKind),
    LinkDirection(LinkDirection),
}

pub fn update_element(
    plan: &Plan,
    floor_id: u32,
    kind: ElementKind,
    id: u32,
    patch: ElementPatch,
) -> Result<Plan, Rejection> {
    let mut next = plan.clone();
    let floor = next
        .floor_mut(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
    let missing = || Rejection::new("Element no longer exists");
    match (&patch, kind) {
        (ElementPatch::Name(name), ElementKind::Room) => {
            floor.rooms.get_mut(&id).ok_or_else(missing)?.name = NameInPlan(name.clone());
        }
        (ElementPatch::Name(name), ElementKind::Door) => {
            floor.doors.get_mut(&id).ok_or_else(missing)?.name = NameInPlan(name.clone());
        }
        (ElementPatch::Name(name), ElementKind::Link) => {
            floor.links.get_mut(&id).ok_or_else(missing)?.name = NameInPlan(name.clone());
        }
        (ElementPatch::Name(name), ElementKind::Artwork) => {
            floor.artworks.get_mut(&id).ok_or_else(missing)?.name = NameInPlan(name.clone());
        }
        (ElementPatch::Document(document), ElementKind::Artwork) => {
            floor.artworks.get_mut(&id).ok_or_else(missing)?.document = document.clone();
        }
        (ElementPatch::WallKind(wall_kind), ElementKind::Wall) => {
            floor.walls.get_mut(&id).ok_or_else(missing)?.kind = *wall_kind;
        }
        (ElementPatch::LinkDirection(direction), ElementKind::Link) => {
            let link = floor.links.get_mut(&id).ok_or_else(missing)?;
            link.direction = *direction;
            let (to_floor, pair) = (link.to_floor, link.pair);
            if let Some(pair) = pair {
                if let Some(twin) = next
                    .floor_mut(to_floor)
                    .and_then(|f| f.links.get_mut(&pair))
                {
                    twin.direction = direction.inverted();
                }
            }
        }
        _ => {
            return Err(Rejection::new(format!(
                "This property does not apply to a {}",
                kind.label().to_lowercase()
            )));
        }
    }
    Ok(next)
}

fn apply_cascade(plan: &Plan, floor_id: u32, cascade: &CascadePlan) -> Plan {
    let mut next = plan.clone();
    cascade::apply(&mut next, cascade);
    if let Some(floor) = next.floor_mut(floor_id) {
        refresh_door_adjacency(floor);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_plan_format::geometry::rectangle_polygon;

    fn plan_with_room() -> (Plan, u32, u32) {
        let (plan, ground) = Plan::blank_ground("ops".to_owned());
        let (plan, room) = create_room(
            &plan,
            ground,
            rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)),
            Strictness::Tolerant,
            &Constraints::default(),
        )
        .unwrap();
        (plan, ground, room)
    }

    #[test]
    fn door_on_shared_edge_connects_both_rooms() {
        let (plan, ground, room_a) = plan_with_room();
        let (plan, room_b) = create_room(
            &plan,
            ground,
            rectangle_polygon(Vec2::new(10.0, 0.0), Vec2::new(20.0, 6.0)),
            Strictness::Tolerant,
            &Constraints::default(),
        )
        .unwrap();
        let (plan, door) = create_door(
            &plan,
            ground,
            Edge::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0)),
            &Constraints::default(),
        )
        .unwrap();
        let door = plan.floor(ground).unwrap().doors.get(&door).unwrap();
        assert_eq!(door.rooms, [Some(room_a), Some(room_b)]);
        assert!((door.width() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn wall_is_assigned_to_the_room_holding_its_midpoint() {
        let (plan, ground, room) = plan_with_room();
        let (plan, wall) = create_wall(
            &plan,
            ground,
            Edge::new(Vec2::new(4.0, 0.0), Vec2::new(4.0, 6.0)),
            &Constraints::default(),
        )
        .unwrap();
        assert_eq!(plan.floor(ground).unwrap().walls.get(&wall).unwrap().room, Some(room));
        // Out in open space there is no owning room.
        assert!(create_wall(
            &plan,
            ground,
            Edge::new(Vec2::new(30.0, 0.0), Vec2::new(30.0, 6.0)),
            &Constraints::default(),
        )
        .is_err());
    }

    #[test]
    fn link_pair_is_reciprocal() {
        let (plan, ground, _) = plan_with_room();
        let (plan, upper) = crate::floors::add_floor(&plan, crate::floors::StackDirection::Up);
        let (plan, (link, twin)) = create_link_pair(
            &plan,
            ground,
            LinkKind::Elevator,
            Edge::new(Vec2::new(0.0, 2.0), Vec2::new(0.0, 4.0)),
            LinkDirection::Up,
            upper,
            &Constraints::default(),
        )
        .unwrap();
        let a = plan.floor(ground).unwrap().links.get(&link).unwrap();
        let b = plan.floor(upper).unwrap().links.get(&twin).unwrap();
        assert_eq!(a.pair, Some(twin));
        assert_eq!(b.pair, Some(link));
        assert_eq!(b.direction, LinkDirection::Down);
        assert_eq!(b.to_floor, ground);
        assert!(a.edge.same_points_as(&b.edge));
    }

    #[test]
    fn artwork_resize_is_validated() {
        let (plan, ground, _) = plan_with_room();
        let (plan, artwork) = create_artwork(
            &plan,
            ground,
            Vec2::new(2.0, 2.0),
            Vec2::new(1.0, 1.0),
            &Constraints::default(),
        )
        .unwrap();
        let resized = resize_artwork(
            &plan,
            ground,
            artwork,
            ResizeHandle::NorthEast,
            Vec2::new(4.0, 4.0),
            &Constraints::default(),
        )
        .unwrap();
        assert_eq!(
            resized.floor(ground).unwrap().artworks.get(&artwork).unwrap().size,
            Vec2::new(2.0, 2.0)
        );
        // Dragging the handle outside the room is refused.
        assert!(resize_artwork(
            &plan,
            ground,
            artwork,
            ResizeHandle::NorthEast,
            Vec2::new(14.0, 4.0),
            &Constraints::default(),
        )
        .is_err());
    }

    #[test]
    fn update_element_rejects_mismatched_properties() {
        let (plan, ground, room) = plan_with_room();
        let renamed = update_element(
            &plan,
            ground,
            ElementKind::Room,
            room,
            ElementPatch::Name("Sculpture hall".to_owned()),
        )
        .unwrap();
        assert_eq!(
            renamed.floor(ground).unwrap().rooms.get(&room).unwrap().name.0,
            "Sculpture hall"
        );
        assert!(update_element(
            &plan,
            ground,
            ElementKind::Room,
            room,
            ElementPatch::WallKind(WallKind::Exterior),
        )
        .is_err());
    }
}
