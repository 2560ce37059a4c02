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

//! The geometric editor kernel for museum floor plans.
//!
//! The kernel is a pure state machine: callers translate pointer events into
//! the operations on [`PlanEditor`] and read the resulting plan back out.
//! Rendering, input gathering and persistence live outside. Every mutation
//! is atomic: it either produces a new committed plan (and a history
//! checkpoint) or a [`Rejection`] that leaves the committed state untouched.
//! During a drag, a provisional overlay plan shadows the committed one for
//! read-only consumers and is dropped on abort.

pub mod cascade;
pub mod coherence;
pub mod config;
pub mod floors;
pub mod history;
pub mod interaction;
pub mod measurement;
pub mod ops;
pub mod selection;
pub mod snap;
pub mod validation;

pub use config::{ConfigError, Constraints, EditorConfig};
pub use floors::StackDirection;
pub use interaction::{InteractionState, Modifiers, Tool};
pub use ops::ElementPatch;
pub use selection::{ElementKind, HitTarget, ResizeHandle, Selection};
pub use validation::{Rejection, Severity, Strictness, Validity};

use coherence::CoherenceStatus;
use glam::Vec2;
use history::History;
use measurement::{MeasurementTable, SketchReadout};
use museum_plan_format::{geometry, Edge, Floor, LinkDirection, Plan};
use std::collections::BTreeMap;
use tracing::debug;
use validation::Host;

pub struct PlanEditor {
    config: EditorConfig,
    committed: Plan,
    /// Provisional plan shown during a drag. Never enters the history.
    overlay: Option<Plan>,
    current_floor: u32,
    tool: Tool,
    state: InteractionState,
    selection: Selection,
    modifiers: Modifiers,
    history: History,
    measurements: BTreeMap<u32, MeasurementTable>,
    coherence: CoherenceStatus,
    /// Verdict on the edit in flight, for the caller's status display.
    validity: Validity,
}

impl PlanEditor {
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        let (plan, _) = Plan::blank_ground("new_plan".to_owned());
        Self::with_plan(config, plan)
    }

    /// Start from an existing plan, for example one reconstructed from an
    /// export document. A plan without floors gets a fresh ground floor.
    pub fn with_plan(config: EditorConfig, mut plan: Plan) -> Result<Self, ConfigError> {
        config.validate()?;
        if plan.floors.is_empty() {
            let floor_id = plan.fresh_id();
            plan.floors
                .insert(floor_id, Floor::new(Default::default()));
        }
        let current_floor = plan.floors_in_order()[0].0;
        let history = History::new(config.history.cap, &plan);
        let mut editor = Self {
            config,
            committed: plan,
            overlay: None,
            current_floor,
            tool: Tool::default(),
            state: InteractionState::Idle,
            selection: Selection::None,
            modifiers: Modifiers::default(),
            history,
            measurements: BTreeMap::new(),
            coherence: CoherenceStatus::default(),
            validity: Validity::ok(),
        };
        editor.refresh_derived();
        Ok(editor)
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The plan that read-only consumers should render: the provisional
    /// overlay during a drag, the committed plan otherwise.
    pub fn plan(&self) -> &Plan {
        self.overlay.as_ref().unwrap_or(&self.committed)
    }

    pub fn committed_plan(&self) -> &Plan {
        &self.committed
    }

    pub fn current_floor(&self) -> u32 {
        self.current_floor
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn measurements(&self, floor: u32) -> Option<&MeasurementTable> {
        self.measurements.get(&floor)
    }

    pub fn coherence(&self) -> &CoherenceStatus {
        &self.coherence
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Live measurement of the sketch in progress, if any.
    pub fn sketch_readout(&self, cursor: Vec2) -> Option<SketchReadout> {
        let unit = self.config.grid.unit_metres;
        match &self.state {
            InteractionState::DrawingPolygon { points } => {
                measurement::pending_edge_length(points, cursor, unit)
                    .map(SketchReadout::EdgeLength)
            }
            InteractionState::DrawingShape { tool, anchor, .. } => Some(match tool {
                Tool::Circle | Tool::Arc => SketchReadout::CircleRadius(
                    measurement::pending_circle_radius(*anchor, cursor, unit),
                ),
                _ => SketchReadout::RectExtents(measurement::pending_rect_extents(
                    *anchor, cursor, unit,
                )),
            }),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Tool and floor switching
    // ------------------------------------------------------------------

    pub fn begin_tool(&mut self, tool: Tool) {
        self.discard_provisional();
        self.tool = tool;
    }

    pub fn set_current_floor(&mut self, floor: u32) -> Result<(), Rejection> {
        if self.committed.floor(floor).is_none() {
            return Err(Rejection::new("Floor no longer exists"));
        }
        self.discard_provisional();
        self.selection = Selection::None;
        self.current_floor = floor;
        Ok(())
    }

    /// Escape aborts whatever is in progress without touching committed
    /// state. The selection survives so a follow-up delete still works.
    pub fn escape(&mut self) {
        self.discard_provisional();
    }

    fn discard_provisional(&mut self) {
        self.overlay = None;
        self.state = InteractionState::Idle;
        self.validity = Validity::ok();
    }

    fn committed_floor(&self) -> &Floor {
        self.committed
            .floor(self.current_floor)
            .expect("current floor always exists in the committed plan")
    }

    fn snapped(&self, p: Vec2) -> Vec2 {
        if self.modifiers.shift {
            return p;
        }
        snap::best_snap(self.committed_floor(), p, self.tool, &self.config)
            .map(|s| s.point)
            .unwrap_or(p)
    }

    // ------------------------------------------------------------------
    // Pointer surface
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, p: Vec2, modifiers: Modifiers) -> Result<(), Rejection> {
        self.modifiers = modifiers;
        self.validity = Validity::ok();
        match self.tool {
            Tool::Select => self.begin_select(p),
            Tool::Room => self.append_polygon_vertex(p),
            tool if tool.places_on_wall() => {
                let snap = snap::best_snap(self.committed_floor(), p, tool, &self.config)
                    .ok_or_else(|| {
                        Rejection::new("Openings must start on a room edge or a wall")
                    })?;
                let host = snap
                    .carrier
                    .ok_or_else(|| Rejection::new("Openings must start on a room edge or a wall"))?;
                self.state = InteractionState::PlacingOnWall {
                    tool,
                    host,
                    start: snap.point,
                    cursor: snap.point,
                };
                Ok(())
            }
            // The shape tools, the artwork rectangle and the wall segment
            // all grow an outline from a single drag anchor.
            tool => {
                let anchor = self.snapped(p);
                self.state = InteractionState::DrawingShape {
                    tool,
                    anchor,
                    cursor: anchor,
                };
                Ok(())
            }
        }
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        match self.state.clone() {
            InteractionState::Idle | InteractionState::DrawingPolygon { .. } => {}
            InteractionState::DrawingShape { tool, anchor, .. } => {
                let cursor = self.snapped(p);
                self.validity = self.preview_shape_validity(tool, anchor, cursor);
                self.state = InteractionState::DrawingShape {
                    tool,
                    anchor,
                    cursor,
                };
            }
            InteractionState::PlacingOnWall {
                tool, host, start, ..
            } => {
                self.validity = self.preview_opening_validity(tool, host, start, p);
                self.state = InteractionState::PlacingOnWall {
                    tool,
                    host,
                    start,
                    cursor: p,
                };
            }
            InteractionState::DraggingShape { kind, id, grab } => {
                let delta = p - grab;
                self.apply_provisional(ops::translate_element(
                    &self.committed,
                    self.current_floor,
                    kind,
                    id,
                    delta,
                    &self.config.constraints,
                ));
            }
            InteractionState::DraggingVertex { room, index } => {
                self.apply_provisional(ops::move_room_vertex(
                    &self.committed,
                    self.current_floor,
                    room,
                    index,
                    p,
                    &self.config.constraints,
                ));
            }
            InteractionState::DraggingEndpoint { kind, id, side } => {
                let result = match kind {
                    ElementKind::Wall => ops::move_wall_endpoint(
                        &self.committed,
                        self.current_floor,
                        id,
                        side,
                        self.snapped(p),
                        &self.config.constraints,
                    ),
                    _ => ops::move_opening_endpoint(
                        &self.committed,
                        self.current_floor,
                        kind,
                        id,
                        side,
                        p,
                        &self.config.constraints,
                    ),
                };
                self.apply_provisional(result);
            }
            InteractionState::ResizingArtwork { artwork, handle } => {
                self.apply_provisional(ops::resize_artwork(
                    &self.committed,
                    self.current_floor,
                    artwork,
                    handle,
                    p,
                    &self.config.constraints,
                ));
            }
            InteractionState::Marquee { anchor, .. } => {
                self.state = InteractionState::Marquee { anchor, cursor: p };
            }
        }
    }

    pub fn pointer_up(&mut self, p: Vec2) -> Result<(), Rejection> {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Ok(()),
            // The polygon tool is click-driven; release does nothing.
            state @ InteractionState::DrawingPolygon { .. } => {
                self.state = state;
                Ok(())
            }
            InteractionState::DrawingShape { tool, anchor, .. } => {
                let cursor = self.snapped(p);
                self.commit_shape(tool, anchor, cursor)
            }
            InteractionState::PlacingOnWall {
                tool, host, start, ..
            } => self.commit_opening(tool, host, start, p),
            InteractionState::DraggingShape { kind, id, grab } => {
                let result = ops::translate_element(
                    &self.committed,
                    self.current_floor,
                    kind,
                    id,
                    p - grab,
                    &self.config.constraints,
                );
                self.finish_drag(result, format!("Move {}", kind.label().to_lowercase()))
            }
            InteractionState::DraggingVertex { room, index } => {
                let result = ops::move_room_vertex(
                    &self.committed,
                    self.current_floor,
                    room,
                    index,
                    p,
                    &self.config.constraints,
                );
                self.finish_drag(result, "Reshape room".to_owned())
            }
            InteractionState::DraggingEndpoint { kind, id, side } => {
                let result = match kind {
                    ElementKind::Wall => ops::move_wall_endpoint(
                        &self.committed,
                        self.current_floor,
                        id,
                        side,
                        self.snapped(p),
                        &self.config.constraints,
                    ),
                    _ => ops::move_opening_endpoint(
                        &self.committed,
                        self.current_floor,
                        kind,
                        id,
                        side,
                        p,
                        &self.config.constraints,
                    ),
                };
                self.finish_drag(
                    result,
                    format!("Resize {}", kind.label().to_lowercase()),
                )
            }
            InteractionState::ResizingArtwork { artwork, handle } => {
                let result = ops::resize_artwork(
                    &self.committed,
                    self.current_floor,
                    artwork,
                    handle,
                    p,
                    &self.config.constraints,
                );
                self.finish_drag(result, "Resize artwork".to_owned())
            }
            InteractionState::Marquee { anchor, .. } => {
                self.selection = selection::marquee_select(self.committed_floor(), anchor, p);
                self.overlay = None;
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Delete the current selection through the cascade planner. Returns
    /// the cascade warnings so the caller can surface them.
    pub fn delete_selection(&mut self) -> Result<Vec<String>, Rejection> {
        if self.selection.is_none() {
            return Err(Rejection::new("Nothing is selected"));
        }
        let selection = std::mem::take(&mut self.selection);
        let label = match &selection {
            Selection::Element { kind, .. } => {
                format!("Delete {}", kind.label().to_lowercase())
            }
            _ => "Delete vertices".to_owned(),
        };
        let (next, cascade) = ops::delete_selection(
            &self.committed,
            self.current_floor,
            &selection,
            &self.config.constraints,
        )
        .map_err(|e| {
            self.selection = selection.clone();
            e
        })?;
        self.commit_plan(next, &label);
        Ok(cascade.warnings)
    }

    pub fn undo(&mut self) -> bool {
        self.discard_provisional();
        let Some(plan) = self.history.undo() else {
            return false;
        };
        self.committed = plan.clone();
        self.selection = Selection::None;
        self.ensure_current_floor();
        self.refresh_derived();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.discard_provisional();
        let Some(plan) = self.history.redo() else {
            return false;
        };
        self.committed = plan.clone();
        self.selection = Selection::None;
        self.ensure_current_floor();
        self.refresh_derived();
        true
    }

    /// Insert a floor above or below the stack and switch to it.
    pub fn add_floor(&mut self, direction: StackDirection) -> u32 {
        self.discard_provisional();
        let (next, floor_id) = floors::add_floor(&self.committed, direction);
        self.commit_plan(next, &format!("Add floor ({})", direction.label()));
        self.current_floor = floor_id;
        floor_id
    }

    /// Destructive removal of a floor: the caller is expected to have shown
    /// the returned warnings of a preview (`preview_delete_floor`) and
    /// obtained confirmation beforehand.
    pub fn delete_floor(&mut self, floor: u32) -> Result<Vec<String>, Rejection> {
        self.discard_provisional();
        let name = self
            .committed
            .floor(floor)
            .map(|f| f.properties.name.0.clone())
            .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
        let cascade = cascade::plan_delete_floor(&self.committed, floor)?;
        let mut next = self.committed.clone();
        cascade::apply(&mut next, &cascade);
        self.commit_plan(next, &format!("Delete floor {}", name));
        self.ensure_current_floor();
        Ok(cascade.warnings)
    }

    /// The cascade a floor deletion would apply, without applying it.
    pub fn preview_delete_floor(&self, floor: u32) -> Result<cascade::CascadePlan, Rejection> {
        cascade::plan_delete_floor(&self.committed, floor)
    }

    pub fn move_floor(&mut self, floor: u32, direction: StackDirection) -> Result<(), Rejection> {
        self.discard_provisional();
        let next = floors::move_floor(&self.committed, floor, direction)?;
        self.commit_plan(next, &format!("Move floor ({})", direction.label()));
        Ok(())
    }

    pub fn rename_floor(&mut self, floor: u32, name: String) -> Result<(), Rejection> {
        self.discard_provisional();
        let next = floors::rename_floor(&self.committed, floor, name)?;
        self.commit_plan(next, "Rename floor");
        Ok(())
    }

    /// Property edit on a selected element, through the same validation and
    /// history pipeline as every other operation.
    pub fn update_element(
        &mut self,
        kind: ElementKind,
        id: u32,
        patch: ElementPatch,
    ) -> Result<(), Rejection> {
        self.discard_provisional();
        let next = ops::update_element(&self.committed, self.current_floor, kind, id, patch)?;
        self.commit_plan(next, &format!("Edit {}", kind.label().to_lowercase()));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn begin_select(&mut self, p: Vec2) -> Result<(), Rejection> {
        match selection::hit_test(self.committed_floor(), p, &self.config) {
            Some(HitTarget::RoomVertex { room, index }) => {
                self.selection = Selection::Vertices {
                    room,
                    indices: vec![index],
                };
                self.state = InteractionState::DraggingVertex { room, index };
            }
            Some(HitTarget::WallEndpoint { wall, side }) => {
                self.selection = Selection::element(ElementKind::Wall, wall);
                self.state = InteractionState::DraggingEndpoint {
                    kind: ElementKind::Wall,
                    id: wall,
                    side,
                };
            }
            Some(HitTarget::DoorEndpoint { door, side }) => {
                self.selection = Selection::element(ElementKind::Door, door);
                self.state = InteractionState::DraggingEndpoint {
                    kind: ElementKind::Door,
                    id: door,
                    side,
                };
            }
            Some(HitTarget::LinkEndpoint { link, side }) => {
                self.selection = Selection::element(ElementKind::Link, link);
                self.state = InteractionState::DraggingEndpoint {
                    kind: ElementKind::Link,
                    id: link,
                    side,
                };
            }
            Some(HitTarget::ArtworkHandle { artwork, handle }) => {
                self.selection = Selection::element(ElementKind::Artwork, artwork);
                self.state = InteractionState::ResizingArtwork { artwork, handle };
            }
            Some(HitTarget::ArtworkBody { artwork }) => {
                self.selection = Selection::element(ElementKind::Artwork, artwork);
                self.state = InteractionState::DraggingShape {
                    kind: ElementKind::Artwork,
                    id: artwork,
                    grab: p,
                };
            }
            Some(HitTarget::Door { door }) => {
                self.selection = Selection::element(ElementKind::Door, door);
                self.state = InteractionState::DraggingShape {
                    kind: ElementKind::Door,
                    id: door,
                    grab: p,
                };
            }
            Some(HitTarget::Link { link }) => {
                self.selection = Selection::element(ElementKind::Link, link);
                self.state = InteractionState::DraggingShape {
                    kind: ElementKind::Link,
                    id: link,
                    grab: p,
                };
            }
            Some(HitTarget::Wall { wall }) => {
                self.selection = Selection::element(ElementKind::Wall, wall);
                self.state = InteractionState::DraggingShape {
                    kind: ElementKind::Wall,
                    id: wall,
                    grab: p,
                };
            }
            Some(HitTarget::Room { room }) => {
                self.selection = Selection::element(ElementKind::Room, room);
                self.state = InteractionState::DraggingShape {
                    kind: ElementKind::Room,
                    id: room,
                    grab: p,
                };
            }
            None => {
                self.selection = Selection::None;
                self.state = InteractionState::Marquee {
                    anchor: p,
                    cursor: p,
                };
            }
        }
        Ok(())
    }

    /// Append a vertex to the free polygon, or close and commit it when the
    /// click lands near the first vertex.
    fn append_polygon_vertex(&mut self, p: Vec2) -> Result<(), Rejection> {
        let candidate = self.snapped(p);
        let mut points = match std::mem::take(&mut self.state) {
            InteractionState::DrawingPolygon { points } => points,
            _ => Vec::new(),
        };

        if points.len() >= 3
            && (candidate - points[0]).length() <= self.config.constraints.close_threshold
        {
            let result = ops::create_room(
                &self.committed,
                self.current_floor,
                points,
                Strictness::Strict,
                &self.config.constraints,
            );
            return match result {
                Ok((next, _)) => {
                    self.commit_plan(next, "Create room");
                    Ok(())
                }
                Err(rejection) => {
                    self.validity = Validity::error(rejection.message.clone());
                    Err(rejection)
                }
            };
        }

        if let Some(&last) = points.last() {
            // The new edge may touch its predecessor but not cross the rest
            // of the polyline.
            let crosses = points.windows(2).rev().skip(1).any(|pair| {
                geometry::segments_intersect(last, candidate, pair[0], pair[1])
                    || geometry::segments_overlap(last, candidate, pair[0], pair[1])
            });
            if crosses {
                let rejection =
                    Rejection::new("This vertex would make the outline cross itself");
                self.validity = Validity::error(rejection.message.clone());
                self.state = InteractionState::DrawingPolygon { points };
                return Err(rejection);
            }
        }
        points.push(candidate);
        self.state = InteractionState::DrawingPolygon { points };
        Ok(())
    }

    fn shape_outline(tool: Tool, anchor: Vec2, cursor: Vec2) -> Vec<Vec2> {
        match tool {
            Tool::Rectangle => geometry::rectangle_polygon(anchor, cursor),
            Tool::Circle => geometry::circle_polygon(anchor, (cursor - anchor).length(), 32),
            Tool::Triangle => geometry::triangle_polygon(anchor, cursor),
            Tool::Arc => geometry::arc_polygon(anchor, cursor, 24),
            _ => Vec::new(),
        }
    }

    fn preview_shape_validity(&self, tool: Tool, anchor: Vec2, cursor: Vec2) -> Validity {
        if (cursor - anchor).length() < self.config.constraints.min_drag_distance {
            return Validity::warning("Keep dragging to size the shape");
        }
        match tool {
            tool if tool.is_shape() => validation::validate_room(
                self.committed_floor(),
                None,
                &Self::shape_outline(tool, anchor, cursor),
                &self.config.constraints,
            ),
            Tool::Artwork => {
                let lo = anchor.min(cursor);
                let size = (cursor - anchor).abs();
                validation::validate_artwork(
                    self.committed_floor(),
                    None,
                    lo,
                    size,
                    &self.config.constraints,
                )
            }
            // Only the wall tool remains.
            _ => {
                let edge = Edge::new(anchor, cursor);
                let owner = self
                    .committed_floor()
                    .rooms
                    .iter()
                    .find(|(_, room)| room.contains_or_touches(edge.midpoint()))
                    .map(|(id, _)| *id);
                validation::validate_wall(
                    self.committed_floor(),
                    None,
                    &edge,
                    owner,
                    &self.config.constraints,
                )
            }
        }
    }

    fn preview_opening_validity(&self, tool: Tool, host: Host, start: Vec2, cursor: Vec2) -> Validity {
        match self.opening_edge(host, start, cursor) {
            Some(edge) => match tool.link_kind() {
                None => validation::validate_door(
                    self.committed_floor(),
                    None,
                    &edge,
                    &self.config.constraints,
                ),
                Some(_) => match self.default_link_destination() {
                    Some((to_floor, _)) => validation::validate_link(
                        &self.committed,
                        self.current_floor,
                        None,
                        &edge,
                        to_floor,
                        &self.config.constraints,
                    ),
                    None => Validity::error("Add another floor before placing a vertical link"),
                },
            },
            None => Validity::error("The wall is too short for this opening"),
        }
    }

    /// The centred opening segment for a drag from `start` to `cursor`
    /// along the host.
    fn opening_edge(&self, host: Host, start: Vec2, cursor: Vec2) -> Option<Edge> {
        let host_edge = validation::host_edge(self.committed_floor(), host)?;
        let (a, _) = geometry::project_on_segment(start, host_edge.start(), host_edge.end());
        let (b, _) = geometry::project_on_segment(cursor, host_edge.start(), host_edge.end());
        let width = (b - a).length();
        if width <= geometry::EPSILON {
            return None;
        }
        snap::project_on_host(
            (a + b) / 2.0,
            host_edge,
            width,
            self.config.constraints.min_clearance,
        )
    }

    /// Pick the destination floor for a new vertical link: the nearest
    /// floor above the current one, or the nearest below when nothing is
    /// above.
    fn default_link_destination(&self) -> Option<(u32, LinkDirection)> {
        let storey = self
            .committed_floor()
            .properties
            .storey;
        let mut above: Option<(u32, i32)> = None;
        let mut below: Option<(u32, i32)> = None;
        for (id, floor) in &self.committed.floors {
            if *id == self.current_floor {
                continue;
            }
            let s = floor.properties.storey.0;
            if s > storey.0 && above.map(|(_, best)| s < best).unwrap_or(true) {
                above = Some((*id, s));
            }
            if s < storey.0 && below.map(|(_, best)| s > best).unwrap_or(true) {
                below = Some((*id, s));
            }
        }
        above
            .map(|(id, _)| (id, LinkDirection::Up))
            .or(below.map(|(id, _)| (id, LinkDirection::Down)))
    }

    fn commit_shape(&mut self, tool: Tool, anchor: Vec2, cursor: Vec2) -> Result<(), Rejection> {
        if (cursor - anchor).length() < self.config.constraints.min_drag_distance {
            self.discard_provisional();
            return Err(Rejection::new("Drag distance is too short"));
        }
        let result = match tool {
            tool if tool.is_shape() => ops::create_room(
                &self.committed,
                self.current_floor,
                Self::shape_outline(tool, anchor, cursor),
                Strictness::Tolerant,
                &self.config.constraints,
            )
            .map(|(next, id)| {
                (
                    next,
                    id,
                    format!("Create room ({})", tool.label().to_lowercase()),
                )
            }),
            Tool::Artwork => {
                let lo = anchor.min(cursor);
                let size = (cursor - anchor).abs();
                ops::create_artwork(
                    &self.committed,
                    self.current_floor,
                    lo,
                    size,
                    &self.config.constraints,
                )
                .map(|(next, id)| (next, id, "Place artwork".to_owned()))
            }
            // Only the wall tool remains.
            _ => ops::create_wall(
                &self.committed,
                self.current_floor,
                Edge::new(anchor, cursor),
                &self.config.constraints,
            )
            .map(|(next, id)| (next, id, "Draw wall".to_owned())),
        };
        match result {
            Ok((next, _, label)) => {
                self.commit_plan(next, &label);
                Ok(())
            }
            Err(rejection) => {
                self.discard_provisional();
                self.validity = Validity::error(rejection.message.clone());
                Err(rejection)
            }
        }
    }

    fn commit_opening(
        &mut self,
        tool: Tool,
        host: Host,
        start: Vec2,
        cursor: Vec2,
    ) -> Result<(), Rejection> {
        let Some(edge) = self.opening_edge(host, start, cursor) else {
            let rejection = Rejection::new("The wall is too short for this opening");
            self.overlay = None;
            self.validity = Validity::error(rejection.message.clone());
            return Err(rejection);
        };
        let result = match tool.link_kind() {
            None => ops::create_door(
                &self.committed,
                self.current_floor,
                edge,
                &self.config.constraints,
            )
            .map(|(next, _)| (next, "Place door".to_owned())),
            Some(kind) => {
                let (to_floor, direction) = self.default_link_destination().ok_or_else(|| {
                    Rejection::new("Add another floor before placing a vertical link")
                })?;
                ops::create_link_pair(
                    &self.committed,
                    self.current_floor,
                    kind,
                    edge,
                    direction,
                    to_floor,
                    &self.config.constraints,
                )
                .map(|(next, _)| (next, format!("Place {}", kind.label().to_lowercase())))
            }
        };
        match result {
            Ok((next, label)) => {
                self.commit_plan(next, &label);
                Ok(())
            }
            Err(rejection) => {
                self.discard_provisional();
                self.validity = Validity::error(rejection.message.clone());
                Err(rejection)
            }
        }
    }

    /// Refresh the overlay from a provisional operation result; a rejected
    /// update keeps the previous overlay so the drag stays responsive.
    fn apply_provisional(&mut self, result: Result<Plan, Rejection>) {
        match result {
            Ok(plan) => {
                self.overlay = Some(plan);
                self.validity = Validity::ok();
            }
            Err(rejection) => {
                self.validity = Validity::error(rejection.message);
            }
        }
    }

    fn finish_drag(&mut self, result: Result<Plan, Rejection>, label: String) -> Result<(), Rejection> {
        self.overlay = None;
        match result {
            Ok(next) => {
                self.commit_plan(next, &label);
                Ok(())
            }
            Err(rejection) => {
                // The provisional state evaporates; the committed plan was
                // never touched.
                self.validity = Validity::error(rejection.message.clone());
                Err(rejection)
            }
        }
    }

    fn commit_plan(&mut self, next: Plan, label: &str) {
        self.committed = next;
        self.overlay = None;
        self.state = InteractionState::Idle;
        self.validity = Validity::ok();
        self.history.commit(label, &self.committed);
        self.refresh_derived();
        debug!(target: "editor.commit", label, "commit");
    }

    fn ensure_current_floor(&mut self) {
        if self.committed.floor(self.current_floor).is_none() {
            self.current_floor = self.committed.floors_in_order()[0].0;
        }
    }

    fn refresh_derived(&mut self) {
        self.measurements = self
            .committed
            .floors
            .iter()
            .map(|(id, floor)| {
                (
                    *id,
                    measurement::measure_floor(floor, self.config.grid.unit_metres),
                )
            })
            .collect();
        self.coherence = coherence::scan_plan(&self.committed);
    }
}
