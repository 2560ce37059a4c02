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

//! End-to-end editing scenarios driven through the public pointer surface,
//! with the default configuration (one grid unit is half a metre).

use float_eq::assert_float_eq;
use glam::Vec2;
use museum_plan_editor::{
    EditorConfig, ElementKind, Modifiers, PlanEditor, Selection, StackDirection, Tool,
};

fn editor() -> PlanEditor {
    PlanEditor::new(EditorConfig::default()).unwrap()
}

fn drag(editor: &mut PlanEditor, tool: Tool, from: Vec2, to: Vec2) -> Result<(), String> {
    editor.begin_tool(tool);
    editor
        .pointer_down(from, Modifiers::default())
        .map_err(|e| e.message.clone())?;
    editor.pointer_move(to);
    editor.pointer_up(to).map_err(|e| e.message)
}

fn room_count(editor: &PlanEditor) -> usize {
    editor
        .committed_plan()
        .floor(editor.current_floor())
        .unwrap()
        .rooms
        .len()
}

#[test]
fn create_rectangular_room() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();

    let floor = editor.committed_plan().floor(editor.current_floor()).unwrap();
    assert_eq!(floor.rooms.len(), 1);
    let room = floor.rooms.values().next().unwrap();
    assert_eq!(
        room.vertices,
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 6.0),
            Vec2::new(0.0, 6.0),
        ]
    );
    // 60 square grid units at 0.5 m per unit.
    let measured = editor.measurements(editor.current_floor()).unwrap();
    let room_id = floor.rooms.keys().next().unwrap();
    assert_float_eq!(measured.0.get(room_id).unwrap().area_m2, 15.0, abs <= 1e-3);
    assert!(editor.validity().is_ok());
}

#[test]
fn overlapping_room_is_rejected_and_nothing_changes() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    let before = editor.committed_plan().to_string_ron().unwrap();

    let result = drag(
        &mut editor,
        Tool::Rectangle,
        Vec2::new(5.0, 3.0),
        Vec2::new(15.0, 9.0),
    );
    assert!(result.is_err());
    assert_eq!(room_count(&editor), 1);
    assert_eq!(editor.committed_plan().to_string_ron().unwrap(), before);
}

#[test]
fn door_on_a_shared_edge_connects_both_rooms() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Rectangle, Vec2::new(10.0, 0.0), Vec2::new(20.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Door, Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0)).unwrap();

    let floor = editor.committed_plan().floor(editor.current_floor()).unwrap();
    assert_eq!(floor.doors.len(), 1);
    let door = floor.doors.values().next().unwrap();
    assert_eq!(door.edge.start(), Vec2::new(10.0, 2.0));
    assert_eq!(door.edge.end(), Vec2::new(10.0, 4.0));
    assert_float_eq!(door.width(), 2.0, abs <= 1e-3);
    assert_eq!(door.connected_rooms().count(), 2);
}

#[test]
fn moving_a_room_carries_its_contents() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Artwork, Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)).unwrap();
    drag(&mut editor, Tool::Door, Vec2::new(10.0, 3.0), Vec2::new(10.0, 4.0)).unwrap();

    // Grab the room body and drag it three units to the right.
    editor.begin_tool(Tool::Select);
    editor.pointer_down(Vec2::new(5.0, 5.0), Modifiers::default()).unwrap();
    editor.pointer_move(Vec2::new(8.0, 5.0));
    editor.pointer_up(Vec2::new(8.0, 5.0)).unwrap();

    let floor = editor.committed_plan().floor(editor.current_floor()).unwrap();
    let room = floor.rooms.values().next().unwrap();
    assert_eq!(room.vertices[0], Vec2::new(3.0, 0.0));
    let artwork = floor.artworks.values().next().unwrap();
    assert_eq!(artwork.anchor, Vec2::new(5.0, 2.0));
    let door = floor.doors.values().next().unwrap();
    assert_eq!(door.edge.start(), Vec2::new(13.0, 3.0));
    assert_eq!(door.edge.end(), Vec2::new(13.0, 4.0));
}

#[test]
fn blocked_translation_leaves_everything_in_place() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Rectangle, Vec2::new(12.0, 0.0), Vec2::new(22.0, 6.0)).unwrap();
    let before = editor.committed_plan().to_string_ron().unwrap();

    editor.begin_tool(Tool::Select);
    editor.pointer_down(Vec2::new(5.0, 5.0), Modifiers::default()).unwrap();
    editor.pointer_move(Vec2::new(8.0, 5.0));
    assert!(editor.pointer_up(Vec2::new(8.0, 5.0)).is_err());
    assert_eq!(editor.committed_plan().to_string_ron().unwrap(), before);
}

#[test]
fn undo_and_redo_restore_byte_identical_plans() {
    let mut editor = editor();
    let empty = editor.committed_plan().to_string_ron().unwrap();

    drag(&mut editor, Tool::Circle, Vec2::new(5.0, 5.0), Vec2::new(8.0, 5.0)).unwrap();
    let with_circle = editor.committed_plan().to_string_ron().unwrap();
    let floor = editor.committed_plan().floor(editor.current_floor()).unwrap();
    assert_eq!(floor.rooms.values().next().unwrap().vertex_count(), 32);

    assert!(editor.undo());
    assert_eq!(editor.committed_plan().to_string_ron().unwrap(), empty);
    assert_eq!(room_count(&editor), 0);

    assert!(editor.redo());
    assert_eq!(editor.committed_plan().to_string_ron().unwrap(), with_circle);
    assert!(!editor.redo());
}

#[test]
fn deleting_a_floor_cascades_across_the_plan() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    // A wall to carry the staircase, then the staircase itself.
    drag(&mut editor, Tool::Wall, Vec2::new(4.0, 2.0), Vec2::new(4.0, 6.0)).unwrap();
    let upper = editor.add_floor(StackDirection::Up);
    editor.rename_floor(upper, "F2".to_owned()).unwrap();
    editor.set_current_floor(editor.committed_plan().floors_in_order()[0].0).unwrap();
    drag(&mut editor, Tool::Stairs, Vec2::new(4.0, 4.0), Vec2::new(4.0, 6.0)).unwrap();

    let ground = editor.current_floor();
    assert_eq!(editor.committed_plan().floor(ground).unwrap().links.len(), 1);
    assert_eq!(editor.committed_plan().floor(upper).unwrap().links.len(), 1);

    let warnings = editor.delete_floor(upper).unwrap();
    assert!(!warnings.is_empty());
    assert!(editor.committed_plan().floor(upper).is_none());
    assert!(editor.committed_plan().floor(ground).unwrap().links.is_empty());
    assert!(editor.coherence().is_clean());

    // One checkpoint for the whole cascade: a single undo restores both the
    // floor and the staircase pair.
    assert!(editor.undo());
    assert_eq!(editor.committed_plan().floor(ground).unwrap().links.len(), 1);
    assert_eq!(editor.committed_plan().floor(upper).unwrap().links.len(), 1);
}

#[test]
fn polygon_tool_closes_near_the_first_vertex() {
    let mut editor = editor();
    editor.begin_tool(Tool::Room);
    for p in [
        Vec2::new(0.0, 0.0),
        Vec2::new(6.0, 0.0),
        Vec2::new(6.0, 6.0),
        Vec2::new(0.0, 6.0),
    ] {
        editor.pointer_down(p, Modifiers::default()).unwrap();
        editor.pointer_up(p).unwrap();
    }
    // Two points are not enough to close, four are. Clicking near the
    // first vertex closes and commits.
    assert_eq!(room_count(&editor), 0);
    editor.pointer_down(Vec2::new(0.3, 0.2), Modifiers::default()).unwrap();
    assert_eq!(room_count(&editor), 1);
    let room = editor
        .committed_plan()
        .floor(editor.current_floor())
        .unwrap()
        .rooms
        .values()
        .next()
        .unwrap();
    assert_eq!(room.vertex_count(), 4);
}

#[test]
fn polygon_tool_refuses_a_crossing_vertex() {
    let mut editor = editor();
    editor.begin_tool(Tool::Room);
    for p in [
        Vec2::new(0.0, 0.0),
        Vec2::new(6.0, 0.0),
        Vec2::new(6.0, 6.0),
    ] {
        editor.pointer_down(p, Modifiers::default()).unwrap();
        editor.pointer_up(p).unwrap();
    }
    // A vertex that would cross the first edge is refused and the sketch
    // keeps its three points.
    assert!(editor
        .pointer_down(Vec2::new(3.0, -3.0), Modifiers::default())
        .is_err());
    editor.escape();
    assert_eq!(room_count(&editor), 0);
}

#[test]
fn too_short_drags_do_not_create_shapes() {
    let mut editor = editor();
    let result = drag(
        &mut editor,
        Tool::Rectangle,
        Vec2::new(0.0, 0.0),
        Vec2::new(0.3, 0.0),
    );
    assert!(result.is_err());
    assert_eq!(room_count(&editor), 0);
}

#[test]
fn opening_needs_a_long_enough_host() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Wall, Vec2::new(2.0, 2.0), Vec2::new(2.0, 3.0)).unwrap();

    // The wall is one unit long; a door of width 0.85 plus twice the
    // clearance does not fit.
    editor.begin_tool(Tool::Door);
    editor.pointer_down(Vec2::new(2.0, 2.1), Modifiers::default()).unwrap();
    editor.pointer_move(Vec2::new(2.0, 2.95));
    assert!(editor.pointer_up(Vec2::new(2.0, 2.95)).is_err());
    assert!(editor
        .committed_plan()
        .floor(editor.current_floor())
        .unwrap()
        .doors
        .is_empty());
}

#[test]
fn escape_discards_the_provisional_drag() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    let before = editor.committed_plan().to_string_ron().unwrap();

    editor.begin_tool(Tool::Select);
    editor.pointer_down(Vec2::new(5.0, 5.0), Modifiers::default()).unwrap();
    editor.pointer_move(Vec2::new(9.0, 5.0));
    // The overlay shows the provisional position...
    assert_ne!(editor.plan().to_string_ron().unwrap(), before);
    // ...until escape discards it.
    editor.escape();
    assert_eq!(editor.plan().to_string_ron().unwrap(), before);
    assert_eq!(editor.committed_plan().to_string_ron().unwrap(), before);
}

#[test]
fn marquee_selects_and_delete_cascades() {
    let mut editor = editor();
    drag(&mut editor, Tool::Rectangle, Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0)).unwrap();
    drag(&mut editor, Tool::Artwork, Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)).unwrap();
    drag(&mut editor, Tool::Door, Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0)).unwrap();

    // Marquee around everything selects the room as a whole.
    editor.begin_tool(Tool::Select);
    editor.pointer_down(Vec2::new(-1.0, -1.0), Modifiers::default()).unwrap();
    editor.pointer_move(Vec2::new(21.0, 7.0));
    editor.pointer_up(Vec2::new(21.0, 7.0)).unwrap();
    assert!(matches!(
        editor.selection(),
        Selection::Element {
            kind: ElementKind::Room,
            ..
        }
    ));

    editor.delete_selection().unwrap();
    let floor = editor.committed_plan().floor(editor.current_floor()).unwrap();
    assert!(floor.rooms.is_empty());
    assert!(floor.doors.is_empty());
    assert!(floor.artworks.is_empty());
    assert!(editor.delete_selection().is_err());
}
