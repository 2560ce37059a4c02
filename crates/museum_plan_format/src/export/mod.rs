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

//! The persisted export contract: a relational projection of the plan that
//! the visitor-guidance runtime consumes, plus a denormalised dump of the
//! plan itself (`legacy_format`) kept bit-stable across versions.
//!
//! The relational tables intentionally flatten geometry into point rows, so
//! they cannot represent everything the editor knows (a vertical link's
//! destination, for instance). Reconstruction therefore reads the legacy
//! dump and uses the tables as a cross-check.

pub mod mapper;
pub use mapper::*;

pub mod import;
pub use import::*;

use crate::{Plan, SemVer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub plan_editor: PlanEditorTables,
    pub oeuvres_contenus: OeuvresContenus,
    pub criterias_guides: CriteriasGuides,
    pub divers: Divers,
    pub legacy_format: Plan,
}

impl ExportDocument {
    pub fn to_writer_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    pub fn to_string_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_bytes_json(s: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub museum_id: String,
    /// Metres per grid unit; consumers multiply point coordinates by this to
    /// obtain metres.
    pub grid_size_m: f32,
    pub total_floors: u32,
    pub format_version: SemVer,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PlanEditorTables {
    pub plans: Vec<PlanRow>,
    pub entities: Vec<EntityRow>,
    pub points: Vec<PointRow>,
    pub relations: Vec<RelationRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub plan_id: u32,
    pub nom: String,
    pub description: String,
    pub date_creation: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Room,
    Artwork,
    Door,
    VerticalLink,
    Wall,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub entity_id: u32,
    pub plan_id: u32,
    pub name: String,
    pub entity_type: EntityType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oeuvre_id: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PointRow {
    pub point_id: u32,
    pub entity_id: u32,
    pub x: f32,
    pub y: f32,
    /// 1-based position of the point within its entity.
    pub ordre: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    ConnectsTo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RelationRow {
    pub relation_id: u32,
    pub source_id: u32,
    pub cible_id: u32,
    pub type_relation: RelationType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OeuvresContenus {
    pub oeuvres: Vec<OeuvreRow>,
    pub chunks: Vec<ChunkRow>,
    pub pregenerations: Vec<PregenerationRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OeuvreRow {
    pub oeuvre_id: u32,
    pub title: String,
    pub artist: String,
    pub description: String,
    pub image_link: String,
    pub pdf_link: String,
    /// Name of the room the artwork hangs in, when it can be derived.
    pub room: String,
}

/// Content chunks are produced by the guide-generation pipeline, never by
/// the editor. The table ships empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChunkRow {
    pub chunk_id: u32,
    pub oeuvre_id: u32,
    pub contenu: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PregenerationRow {
    pub pregeneration_id: u32,
    pub oeuvre_id: u32,
    pub contenu: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CriteriasGuides {
    pub criterias: Vec<CriteriaRow>,
    pub oeuvre_criterias: Vec<OeuvreCriteriaRow>,
    pub generated_guides: Vec<GeneratedGuideRow>,
    pub criterias_guide: Vec<CriteriaGuideRow>,
    pub criterias_pregeneration: Vec<CriteriaPregenerationRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CriteriaRow {
    pub criteria_id: u32,
    pub nom: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OeuvreCriteriaRow {
    pub oeuvre_id: u32,
    pub criteria_id: u32,
    pub valeur: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneratedGuideRow {
    pub guide_id: u32,
    pub nom: String,
    pub date_generation: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CriteriaGuideRow {
    pub guide_id: u32,
    pub criteria_id: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CriteriaPregenerationRow {
    pub pregeneration_id: u32,
    pub criteria_id: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Divers {
    pub stats: ExportStats,
    pub qr_codes: Vec<QrCodeRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExportStats {
    pub floors: u32,
    pub rooms: u32,
    pub walls: u32,
    pub doors: u32,
    pub vertical_links: u32,
    pub artworks: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QrCodeRow {
    pub qr_code_id: u32,
    pub entity_id: u32,
    pub payload: String,
}
