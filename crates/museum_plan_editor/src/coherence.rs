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

//! Global coherence scan: a cheap, read-only pass over the whole plan that
//! tallies residual invariant violations for the status indicator. It never
//! blocks edits by itself.

use crate::validation;
use museum_plan_format::Plan;
use std::collections::BTreeSet;
use tracing::debug;
use uuid::Uuid;

/// An artwork that no room fully contains anymore.
pub const ORPHAN_ARTWORK: Uuid = Uuid::from_u128(0x3e9df8b2_8f41_4c6e_9b0a_57f2a1c04d11);
/// A vertical link whose destination floor is gone.
pub const DANGLING_LINK: Uuid = Uuid::from_u128(0x91c55b3a_02de_47f0_8f0d_6a5f6f2e9c22);
/// A vertical link whose reciprocal twin is missing or disagrees.
pub const BROKEN_LINK_PAIR: Uuid = Uuid::from_u128(0xb7a61c90_6a4d_4de3_bb1e_0d93c2c1fa33);
/// A door or link whose host segment no longer exists.
pub const DETACHED_OPENING: Uuid = Uuid::from_u128(0xd2f0a7c4_53be_4f09_9a4e_8e2b61d7e544);

/// Identifies one detected issue: the set of affected element ids plus the
/// uuid of the issue kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IssueKey {
    pub entities: BTreeSet<u32>,
    pub kind: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: IssueKey,
    pub brief: String,
}

impl Issue {
    fn new(kind: Uuid, entities: impl IntoIterator<Item = u32>, brief: String) -> Self {
        Self {
            key: IssueKey {
                entities: entities.into_iter().collect(),
                kind,
            },
            brief,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoherenceStatus {
    pub issues: Vec<Issue>,
}

impl CoherenceStatus {
    pub fn count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn scan_plan(plan: &Plan) -> CoherenceStatus {
    let mut issues = Vec::new();

    for (floor_id, floor) in &plan.floors {
        for (artwork_id, artwork) in &floor.artworks {
            let contained = floor.rooms.values().any(|room| {
                artwork
                    .corners()
                    .iter()
                    .all(|c| room.contains_or_touches(*c))
            });
            if !contained {
                issues.push(Issue::new(
                    ORPHAN_ARTWORK,
                    [*artwork_id],
                    format!("Artwork \"{}\" is outside every room", artwork.name.0),
                ));
            }
        }

        for (door_id, door) in &floor.doors {
            if validation::find_host(floor, &door.edge).is_none() {
                issues.push(Issue::new(
                    DETACHED_OPENING,
                    [*door_id],
                    "A door lost its host segment".to_owned(),
                ));
            }
        }

        for (link_id, link) in &floor.links {
            if validation::find_host(floor, &link.edge).is_none() {
                issues.push(Issue::new(
                    DETACHED_OPENING,
                    [*link_id],
                    format!("{} lost its host segment", link.kind.label()),
                ));
            }
            let destination = plan.floor(link.to_floor);
            if destination.is_none() || link.to_floor == *floor_id {
                issues.push(Issue::new(
                    DANGLING_LINK,
                    [*link_id],
                    format!(
                        "{} on \"{}\" leads to a missing floor",
                        link.kind.label(),
                        floor.properties.name.0
                    ),
                ));
                continue;
            }
            let twin_ok = link
                .pair
                .and_then(|pair| destination.and_then(|f| f.links.get(&pair)))
                .map(|twin| {
                    twin.to_floor == *floor_id
                        && twin.direction == link.direction.inverted()
                        && (twin.edge.same_points_as(&link.edge)
                            || twin.edge.is_reverse_of(&link.edge))
                })
                .unwrap_or(false);
            if !twin_ok {
                issues.push(Issue::new(
                    BROKEN_LINK_PAIR,
                    link.pair.into_iter().chain([*link_id]),
                    format!(
                        "{} on \"{}\" has no matching counterpart",
                        link.kind.label(),
                        floor.properties.name.0
                    ),
                ));
            }
        }
    }

    debug!(target: "editor.coherence", issues = issues.len(), "plan scanned");
    CoherenceStatus { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use museum_plan_format::{
        geometry::rectangle_polygon, Artwork, Edge, LinkDirection, LinkKind, Room, VerticalLink,
    };

    #[test]
    fn clean_plan_reports_nothing() {
        let (mut plan, ground) = Plan::blank_ground("scan".to_owned());
        let room = plan.fresh_id();
        plan.floors.get_mut(&ground).unwrap().rooms.insert(
            room,
            Room::from(rectangle_polygon(Vec2::new(0.0, 0.0), Vec2::new(10.0, 6.0))),
        );
        assert!(scan_plan(&plan).is_clean());
    }

    #[test]
    fn orphan_artwork_and_dangling_link_are_counted() {
        let (mut plan, ground) = Plan::blank_ground("scan".to_owned());
        let artwork = plan.fresh_id();
        let link = plan.fresh_id();
        let floor = plan.floors.get_mut(&ground).unwrap();
        floor.artworks.insert(
            artwork,
            Artwork {
                anchor: Vec2::new(50.0, 50.0),
                size: Vec2::new(1.0, 1.0),
                name: Default::default(),
                document: None,
            },
        );
        floor.links.insert(
            link,
            VerticalLink {
                kind: LinkKind::Elevator,
                edge: Edge::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)),
                direction: LinkDirection::Up,
                to_floor: 999,
                pair: None,
                name: Default::default(),
            },
        );
        let status = scan_plan(&plan);
        let kinds: Vec<Uuid> = status.issues.iter().map(|i| i.key.kind).collect();
        assert!(kinds.contains(&ORPHAN_ARTWORK));
        assert!(kinds.contains(&DANGLING_LINK));
        assert!(kinds.contains(&DETACHED_OPENING));
    }
}
