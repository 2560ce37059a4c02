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

use super::*;
use crate::{Artwork, Floor, Plan};
use chrono::{DateTime, Utc};
use glam::Vec2;
use std::collections::HashMap;

/// Hands out the sequential ids of one table.
struct IdCounter(u32);

impl IdCounter {
    fn new() -> Self {
        Self(1)
    }

    fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Project a plan snapshot onto the relational export document. The mapper
/// is pure: identical inputs produce identical documents, and the caller
/// supplies the export timestamp.
pub fn export_plan(
    plan: &Plan,
    museum_id: &str,
    grid_size_m: f32,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    let mut tables = PlanEditorTables::default();
    let mut oeuvres = Vec::new();
    let mut stats = ExportStats::default();

    let mut entity_ids = IdCounter::new();
    let mut point_ids = IdCounter::new();
    let mut relation_ids = IdCounter::new();
    let mut oeuvre_ids = IdCounter::new();

    for (plan_index, (_, floor)) in plan.floors_in_order().iter().enumerate() {
        let plan_id = plan_index as u32 + 1;
        tables.plans.push(PlanRow {
            plan_id,
            nom: floor.properties.name.0.clone(),
            description: String::new(),
            date_creation: plan.properties.created,
        });
        stats.floors += 1;

        // Rooms come first so that doors can reference their entity ids.
        let mut room_entities: HashMap<u32, u32> = HashMap::new();
        for (room_id, room) in &floor.rooms {
            let entity_id = entity_ids.next();
            room_entities.insert(*room_id, entity_id);
            tables.entities.push(EntityRow {
                entity_id,
                plan_id,
                name: room.name.0.clone(),
                entity_type: EntityType::Room,
                description: String::new(),
                oeuvre_id: None,
            });
            emit_points(&mut tables, &mut point_ids, entity_id, &room.vertices);
            stats.rooms += 1;
        }

        for (_, artwork) in &floor.artworks {
            let oeuvre_id = oeuvre_ids.next();
            let entity_id = entity_ids.next();
            oeuvres.push(OeuvreRow {
                oeuvre_id,
                title: artwork.name.0.clone(),
                artist: String::new(),
                description: String::new(),
                image_link: String::new(),
                pdf_link: artwork.document.clone().unwrap_or_default(),
                room: containing_room_name(floor, artwork),
            });
            tables.entities.push(EntityRow {
                entity_id,
                plan_id,
                name: artwork.name.0.clone(),
                entity_type: EntityType::Artwork,
                description: String::new(),
                oeuvre_id: Some(oeuvre_id),
            });
            let outline: Vec<Vec2> = if artwork.size.length_squared() > 0.0 {
                artwork.corners().to_vec()
            } else {
                vec![artwork.anchor]
            };
            emit_points(&mut tables, &mut point_ids, entity_id, &outline);
            stats.artworks += 1;
        }

        for (_, door) in &floor.doors {
            let entity_id = entity_ids.next();
            tables.entities.push(EntityRow {
                entity_id,
                plan_id,
                name: door.name.0.clone(),
                entity_type: EntityType::Door,
                description: String::new(),
                oeuvre_id: None,
            });
            emit_points(&mut tables, &mut point_ids, entity_id, &door.edge.array());
            for room in door.connected_rooms() {
                if let Some(room_entity) = room_entities.get(&room) {
                    tables.relations.push(RelationRow {
                        relation_id: relation_ids.next(),
                        source_id: entity_id,
                        cible_id: *room_entity,
                        type_relation: RelationType::ConnectsTo,
                    });
                }
            }
            stats.doors += 1;
        }

        for (_, link) in &floor.links {
            let entity_id = entity_ids.next();
            tables.entities.push(EntityRow {
                entity_id,
                plan_id,
                name: link.name.0.clone(),
                entity_type: EntityType::VerticalLink,
                description: link.kind.label().to_string(),
                oeuvre_id: None,
            });
            emit_points(&mut tables, &mut point_ids, entity_id, &link.edge.array());
            stats.vertical_links += 1;
        }

        for (wall_id, wall) in &floor.walls {
            let entity_id = entity_ids.next();
            tables.entities.push(EntityRow {
                entity_id,
                plan_id,
                name: format!("Wall {}", wall_id),
                entity_type: EntityType::Wall,
                description: wall.kind.label().to_string(),
                oeuvre_id: None,
            });
            emit_points(&mut tables, &mut point_ids, entity_id, &wall.edge.array());
            stats.walls += 1;
        }
    }

    ExportDocument {
        metadata: ExportMetadata {
            export_date: exported_at,
            museum_id: museum_id.to_string(),
            grid_size_m,
            total_floors: plan.floors.len() as u32,
            format_version: plan.format_version,
        },
        plan_editor: tables,
        oeuvres_contenus: OeuvresContenus {
            oeuvres,
            chunks: Vec::new(),
            pregenerations: Vec::new(),
        },
        criterias_guides: CriteriasGuides::default(),
        divers: Divers {
            stats,
            qr_codes: Vec::new(),
        },
        legacy_format: plan.clone(),
    }
}

fn emit_points(
    tables: &mut PlanEditorTables,
    point_ids: &mut IdCounter,
    entity_id: u32,
    outline: &[Vec2],
) {
    for (index, p) in outline.iter().enumerate() {
        tables.points.push(PointRow {
            point_id: point_ids.next(),
            entity_id,
            x: p.x,
            y: p.y,
            ordre: index as u32 + 1,
        });
    }
}

fn containing_room_name(floor: &Floor, artwork: &Artwork) -> String {
    floor
        .rooms
        .values()
        .find(|room| {
            artwork
                .corners()
                .iter()
                .all(|c| room.contains_or_touches(*c))
        })
        .map(|room| room.name.0.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Door, Edge, NameInPlan, Room};

    fn two_room_plan() -> (Plan, u32) {
        let (mut plan, ground) = Plan::blank_ground("mapper test".to_owned());
        let a = plan.fresh_id();
        let b = plan.fresh_id();
        let door = plan.fresh_id();
        let floor = plan.floors.get_mut(&ground).unwrap();
        floor.rooms.insert(
            a,
            Room {
                name: NameInPlan("A".to_owned()),
                vertices: crate::geometry::rectangle_polygon(
                    Vec2::new(0.0, 0.0),
                    Vec2::new(10.0, 6.0),
                ),
            },
        );
        floor.rooms.insert(
            b,
            Room {
                name: NameInPlan("B".to_owned()),
                vertices: crate::geometry::rectangle_polygon(
                    Vec2::new(10.0, 0.0),
                    Vec2::new(20.0, 6.0),
                ),
            },
        );
        floor.doors.insert(door, {
            let mut d = Door::from(Edge::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0)));
            d.rooms = [Some(a), Some(b)];
            d
        });
        (plan, ground)
    }

    #[test]
    fn sequential_ids_and_point_order() {
        let (plan, _) = two_room_plan();
        let doc = export_plan(&plan, "musee-1", 0.5, Utc::now());

        assert_eq!(doc.plan_editor.plans.len(), 1);
        assert_eq!(doc.plan_editor.plans[0].plan_id, 1);
        assert_eq!(doc.metadata.total_floors, 1);

        let ids: Vec<u32> = doc.plan_editor.entities.iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // Room vertices keep polygon order, ordre is 1-based.
        let first_room_points: Vec<_> = doc
            .plan_editor
            .points
            .iter()
            .filter(|p| p.entity_id == 1)
            .collect();
        assert_eq!(first_room_points.len(), 4);
        assert_eq!(first_room_points[0].ordre, 1);
        assert_eq!(first_room_points[3].ordre, 4);
        assert_eq!((first_room_points[1].x, first_room_points[1].y), (10.0, 0.0));
    }

    #[test]
    fn door_emits_two_relations() {
        let (plan, _) = two_room_plan();
        let doc = export_plan(&plan, "musee-1", 0.5, Utc::now());
        assert_eq!(doc.plan_editor.relations.len(), 2);
        for relation in &doc.plan_editor.relations {
            assert_eq!(relation.type_relation, RelationType::ConnectsTo);
            assert_eq!(relation.source_id, 3);
        }
        let targets: Vec<u32> = doc.plan_editor.relations.iter().map(|r| r.cible_id).collect();
        assert_eq!(targets, vec![1, 2]);
    }

    #[test]
    fn stats_tally_elements() {
        let (plan, _) = two_room_plan();
        let doc = export_plan(&plan, "musee-1", 0.5, Utc::now());
        assert_eq!(doc.divers.stats.rooms, 2);
        assert_eq!(doc.divers.stats.doors, 1);
        assert_eq!(doc.divers.stats.artworks, 0);
    }
}
