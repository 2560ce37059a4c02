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

use super::ExportDocument;
use crate::Plan;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(
        "document metadata declares {declared} floors but the legacy dump carries {actual}"
    )]
    FloorCountMismatch { declared: u32, actual: u32 },
    #[error("entity {entity_id} references plan {plan_id}, but only {plans} plans were exported")]
    UnknownPlan {
        entity_id: u32,
        plan_id: u32,
        plans: u32,
    },
    #[error("relation {relation_id} references unknown entity {entity_id}")]
    UnknownEntity { relation_id: u32, entity_id: u32 },
}

/// Reconstruct the editable plan from an export document.
///
/// The legacy dump is the authoritative source: the relational tables drop
/// information (link destinations, wall ownership) that the dump preserves.
/// The tables are still verified against it so a hand-edited or truncated
/// document is refused instead of silently importing partial data.
pub fn import_plan(document: &ExportDocument) -> Result<Plan, ImportError> {
    let plan = &document.legacy_format;

    let actual = plan.floors.len() as u32;
    if document.metadata.total_floors != actual {
        return Err(ImportError::FloorCountMismatch {
            declared: document.metadata.total_floors,
            actual,
        });
    }

    let plans = document.plan_editor.plans.len() as u32;
    for entity in &document.plan_editor.entities {
        if entity.plan_id == 0 || entity.plan_id > plans {
            return Err(ImportError::UnknownPlan {
                entity_id: entity.entity_id,
                plan_id: entity.plan_id,
                plans,
            });
        }
    }

    for relation in &document.plan_editor.relations {
        for entity_id in [relation.source_id, relation.cible_id] {
            if !document
                .plan_editor
                .entities
                .iter()
                .any(|e| e.entity_id == entity_id)
            {
                return Err(ImportError::UnknownEntity {
                    relation_id: relation.relation_id,
                    entity_id,
                });
            }
        }
    }

    debug!(
        target: "format.import",
        floors = actual,
        entities = document.plan_editor.entities.len(),
        "import verified"
    );
    Ok(plan.clone())
}
