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

//! Bounded linear history of labelled plan checkpoints. Provisional drag
//! updates never come through here; only commits do.

use museum_plan_format::Plan;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use tracing::trace;

/// A named, restorable snapshot. Checkpoints are immutable once pushed and
/// never share containers with the live plan.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub label: String,
    pub plan: Plan,
    hash: u64,
}

pub struct History {
    checkpoints: Vec<Checkpoint>,
    cursor: usize,
    cap: usize,
}

/// Content hash over the serialized plan. Serialization of the plan cannot
/// fail, but a failure would only weaken deduplication, never correctness.
fn plan_hash(plan: &Plan) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(
        ron::ser::to_string(plan)
            .unwrap_or_default()
            .as_bytes(),
    );
    hasher.finish()
}

impl History {
    pub fn new(cap: usize, initial: &Plan) -> Self {
        Self {
            checkpoints: vec![Checkpoint {
                label: "New plan".to_owned(),
                plan: initial.clone(),
                hash: plan_hash(initial),
            }],
            cursor: 0,
            cap: cap.max(1),
        }
    }

    pub fn current(&self) -> &Checkpoint {
        &self.checkpoints[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.checkpoints.len()
    }

    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Record a commit. Returns false when the plan is identical to the
    /// current checkpoint, in which case nothing is recorded. A recorded
    /// commit truncates the redo tail; overflow drops the oldest entry.
    pub fn commit(&mut self, label: impl Into<String>, plan: &Plan) -> bool {
        let hash = plan_hash(plan);
        if self.checkpoints[self.cursor].hash == hash {
            trace!(target: "editor.history", cursor = self.cursor, "redundant commit skipped");
            return false;
        }
        self.checkpoints.truncate(self.cursor + 1);
        self.checkpoints.push(Checkpoint {
            label: label.into(),
            plan: plan.clone(),
            hash,
        });
        if self.checkpoints.len() > self.cap {
            self.checkpoints.remove(0);
        }
        self.cursor = self.checkpoints.len() - 1;
        trace!(
            target: "editor.history",
            cursor = self.cursor,
            depth = self.checkpoints.len(),
            "checkpoint pushed"
        );
        true
    }

    pub fn undo(&mut self) -> Option<&Plan> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        trace!(target: "editor.history", cursor = self.cursor, "undo");
        Some(&self.checkpoints[self.cursor].plan)
    }

    pub fn redo(&mut self) -> Option<&Plan> {
        if self.cursor + 1 >= self.checkpoints.len() {
            return None;
        }
        self.cursor += 1;
        trace!(target: "editor.history", cursor = self.cursor, "redo");
        Some(&self.checkpoints[self.cursor].plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_rooms(count: usize) -> Plan {
        let (mut plan, ground) = Plan::blank_ground("history".to_owned());
        for i in 0..count {
            let id = plan.fresh_id();
            plan.floors.get_mut(&ground).unwrap().rooms.insert(
                id,
                museum_plan_format::Room::from(museum_plan_format::geometry::rectangle_polygon(
                    glam::Vec2::new(12.0 * i as f32, 0.0),
                    glam::Vec2::new(12.0 * i as f32 + 10.0, 6.0),
                )),
            );
        }
        plan
    }

    #[test]
    fn undo_then_redo_restores_exact_snapshots() {
        let zero = plan_with_rooms(0);
        let one = plan_with_rooms(1);
        let mut history = History::new(50, &zero);
        assert!(history.commit("Create room", &one));

        let restored = history.undo().unwrap().clone();
        assert_eq!(
            restored.to_string_ron().unwrap(),
            zero.to_string_ron().unwrap()
        );
        let replayed = history.redo().unwrap().clone();
        assert_eq!(
            replayed.to_string_ron().unwrap(),
            one.to_string_ron().unwrap()
        );
        assert!(history.redo().is_none());
    }

    #[test]
    fn redundant_commits_are_suppressed() {
        let plan = plan_with_rooms(1);
        let mut history = History::new(50, &plan);
        assert!(!history.commit("No change", &plan.clone()));
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn new_commit_truncates_the_redo_tail() {
        let zero = plan_with_rooms(0);
        let mut history = History::new(50, &zero);
        history.commit("one", &plan_with_rooms(1));
        history.commit("two", &plan_with_rooms(2));
        history.undo();
        history.commit("fork", &plan_with_rooms(3));
        assert!(!history.can_redo());
        assert_eq!(history.current().label, "fork");
    }

    #[test]
    fn ring_is_bounded() {
        let mut history = History::new(3, &plan_with_rooms(0));
        for i in 1..10 {
            history.commit(format!("commit {i}"), &plan_with_rooms(i));
        }
        assert_eq!(history.depth(), 3);
        // The oldest entries fell off; undo bottoms out at the oldest kept.
        assert!(history.undo().is_some());
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }
}
