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

use crate::{Floor, FloorProperties, NameInPlan, NameOfPlan, SemVer, Storey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io};

pub use ron::ser::PrettyConfig as Style;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanProperties {
    pub name: NameOfPlan,
    pub created: DateTime<Utc>,
}

impl Default for PlanProperties {
    fn default() -> Self {
        Self {
            name: NameOfPlan::default(),
            created: Utc::now(),
        }
    }
}

/// The whole edited document: every floor of the museum plus the id arena
/// that hands out stable element ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// The plan data format that is being used
    pub format_version: SemVer,
    pub properties: PlanProperties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub floors: BTreeMap<u32, Floor>,
    /// The next id that [`Plan::fresh_id`] will hand out. Ids are never
    /// reused, so references in the undo history stay unambiguous.
    #[serde(default)]
    pub next_id: u32,
}

fn default_style_config() -> Style {
    Style::new()
        .depth_limit(4)
        .new_line("\n".to_string())
        .indentor("  ".to_string())
        .struct_names(false)
}

impl Plan {
    /// A fresh plan with one ground floor, analogous to an architect's blank
    /// sheet. Returns the plan and the id of the ground floor.
    pub fn blank_ground(name: String) -> (Self, u32) {
        let mut plan = Plan::default();
        plan.properties.name = NameOfPlan(name);
        let floor_id = plan.fresh_id();
        plan.floors.insert(
            floor_id,
            Floor::new(FloorProperties {
                name: NameInPlan("Ground floor".to_owned()),
                storey: Storey(0),
            }),
        );
        (plan, floor_id)
    }

    pub fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn floor(&self, id: u32) -> Option<&Floor> {
        self.floors.get(&id)
    }

    pub fn floor_mut(&mut self, id: u32) -> Option<&mut Floor> {
        self.floors.get_mut(&id)
    }

    /// Floors from the lowest storey to the highest.
    pub fn floors_in_order(&self) -> Vec<(u32, &Floor)> {
        let mut floors: Vec<_> = self.floors.iter().map(|(id, f)| (*id, f)).collect();
        floors.sort_by_key(|(_, f)| f.properties.storey);
        floors
    }

    pub fn highest_storey(&self) -> Option<Storey> {
        self.floors.values().map(|f| f.properties.storey).max()
    }

    pub fn lowest_storey(&self) -> Option<Storey> {
        self.floors.values().map(|f| f.properties.storey).min()
    }

    pub fn to_writer_ron<W: io::Write>(&self, mut writer: W) -> ron::Result<()> {
        let mut contents = String::new();
        ron::ser::to_writer_pretty(&mut contents, self, default_style_config())?;
        writer
            .write_all(contents.as_bytes())
            .map_err(ron::Error::from)
    }

    pub fn to_string_ron(&self) -> ron::Result<String> {
        ron::ser::to_string_pretty(self, default_style_config())
    }

    pub fn from_reader_ron<R: io::Read>(reader: R) -> ron::error::SpannedResult<Self> {
        ron::de::from_reader(reader)
    }

    pub fn from_str_ron(s: &str) -> ron::error::SpannedResult<Self> {
        ron::de::from_str(s)
    }

    pub fn to_writer_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    pub fn to_string_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_string_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_bytes_json(s: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Artwork, Door, Edge, LinkDirection, LinkKind, Room, VerticalLink, Wall, WallKind};
    use glam::Vec2;

    fn sample_plan() -> Plan {
        let (mut plan, ground) = Plan::blank_ground("test museum".to_owned());
        let room_id = plan.fresh_id();
        let wall_id = plan.fresh_id();
        let door_id = plan.fresh_id();
        let art_id = plan.fresh_id();
        let upper_id = plan.fresh_id();
        let link_id = plan.fresh_id();
        let twin_id = plan.fresh_id();

        plan.floors.insert(
            upper_id,
            Floor::new(FloorProperties {
                name: NameInPlan("First floor".to_owned()),
                storey: Storey(1),
            }),
        );

        let floor = plan.floors.get_mut(&ground).unwrap();
        floor.rooms.insert(
            room_id,
            Room {
                name: NameInPlan("Gallery".to_owned()),
                vertices: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(10.0, 0.0),
                    Vec2::new(10.0, 6.0),
                    Vec2::new(0.0, 6.0),
                ],
            },
        );
        floor.walls.insert(
            wall_id,
            Wall {
                edge: Edge::new(Vec2::new(4.0, 0.0), Vec2::new(4.0, 6.0)),
                kind: WallKind::Interior,
                room: Some(room_id),
            },
        );
        floor.doors.insert(
            door_id,
            Door::from(Edge::new(Vec2::new(10.0, 2.0), Vec2::new(10.0, 4.0))),
        );
        floor.artworks.insert(
            art_id,
            Artwork {
                anchor: Vec2::new(1.0, 1.0),
                size: Vec2::new(1.0, 1.5),
                name: NameInPlan("Nocturne".to_owned()),
                document: Some("nocturne.pdf".to_owned()),
            },
        );
        floor.links.insert(
            link_id,
            VerticalLink {
                kind: LinkKind::Stairs,
                edge: Edge::new(Vec2::new(2.0, 6.0), Vec2::new(4.0, 6.0)),
                direction: LinkDirection::Up,
                to_floor: upper_id,
                pair: Some(twin_id),
                name: NameInPlan::default(),
            },
        );
        let twin = plan
            .floors
            .get(&ground)
            .unwrap()
            .links
            .get(&link_id)
            .unwrap()
            .twin(ground, Some(link_id));
        plan.floors
            .get_mut(&upper_id)
            .unwrap()
            .links
            .insert(twin_id, twin);
        plan
    }

    #[test]
    fn ron_roundtrip() {
        let plan = sample_plan();
        let text = plan.to_string_ron().unwrap();
        let parsed = Plan::from_str_ron(&text).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn json_roundtrip() {
        let plan = sample_plan();
        let bytes = plan.to_string_json_pretty().unwrap();
        let parsed = Plan::from_bytes_json(bytes.as_bytes()).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn floors_sort_by_storey() {
        let plan = sample_plan();
        let ordered = plan.floors_in_order();
        assert_eq!(ordered.len(), 2);
        assert!(ordered[0].1.properties.storey < ordered[1].1.properties.storey);
    }
}
