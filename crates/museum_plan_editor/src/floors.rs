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

//! The floor stack: adding, removing, reordering and renaming floors, plus
//! the pairing bookkeeping for vertical links that span floors.

use crate::validation::Rejection;
use museum_plan_format::{Floor, FloorProperties, NameInPlan, Plan, Storey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Up,
    Down,
}

impl StackDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

/// Insert a new floor above or below the current stack and return its id.
pub fn add_floor(plan: &Plan, direction: StackDirection) -> (Plan, u32) {
    let storey = match direction {
        StackDirection::Up => Storey(plan.highest_storey().map(|s| s.0 + 1).unwrap_or(0)),
        StackDirection::Down => Storey(plan.lowest_storey().map(|s| s.0 - 1).unwrap_or(0)),
    };
    let mut next = plan.clone();
    let floor_id = next.fresh_id();
    next.floors.insert(
        floor_id,
        Floor::new(FloorProperties {
            name: NameInPlan(format!("Floor {}", storey.0)),
            storey,
        }),
    );
    (next, floor_id)
}

/// Swap the floor with its neighbour in the given direction.
pub fn move_floor(
    plan: &Plan,
    floor_id: u32,
    direction: StackDirection,
) -> Result<Plan, Rejection> {
    let storey = plan
        .floor(floor_id)
        .map(|f| f.properties.storey)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;

    let neighbour = plan
        .floors
        .iter()
        .filter(|(id, f)| {
            **id != floor_id
                && match direction {
                    StackDirection::Up => f.properties.storey > storey,
                    StackDirection::Down => f.properties.storey < storey,
                }
        })
        .min_by_key(|(_, f)| match direction {
            StackDirection::Up => f.properties.storey.0,
            StackDirection::Down => -f.properties.storey.0,
        })
        .map(|(id, f)| (*id, f.properties.storey));

    let Some((neighbour_id, neighbour_storey)) = neighbour else {
        return Err(Rejection::new(match direction {
            StackDirection::Up => "Floor is already at the top of the stack",
            StackDirection::Down => "Floor is already at the bottom of the stack",
        }));
    };

    let mut next = plan.clone();
    next.floor_mut(floor_id).unwrap().properties.storey = neighbour_storey;
    next.floor_mut(neighbour_id).unwrap().properties.storey = storey;
    Ok(next)
}

pub fn rename_floor(plan: &Plan, floor_id: u32, name: String) -> Result<Plan, Rejection> {
    let mut next = plan.clone();
    let floor = next
        .floor_mut(floor_id)
        .ok_or_else(|| Rejection::new("Floor no longer exists"))?;
    floor.properties.name = NameInPlan(name);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_stack_above_and_below() {
        let (plan, _) = Plan::blank_ground("stack".to_owned());
        let (plan, above) = add_floor(&plan, StackDirection::Up);
        let (plan, below) = add_floor(&plan, StackDirection::Down);
        assert_eq!(plan.floor(above).unwrap().properties.storey, Storey(1));
        assert_eq!(plan.floor(below).unwrap().properties.storey, Storey(-1));
        let order: Vec<u32> = plan.floors_in_order().iter().map(|(id, _)| *id).collect();
        assert_eq!(order.first(), Some(&below));
        assert_eq!(order.last(), Some(&above));
    }

    #[test]
    fn move_swaps_with_the_neighbour() {
        let (plan, ground) = Plan::blank_ground("swap".to_owned());
        let (plan, above) = add_floor(&plan, StackDirection::Up);
        let swapped = move_floor(&plan, ground, StackDirection::Up).unwrap();
        assert_eq!(swapped.floor(ground).unwrap().properties.storey, Storey(1));
        assert_eq!(swapped.floor(above).unwrap().properties.storey, Storey(0));
        // The top floor has nowhere to go.
        assert!(move_floor(&swapped, ground, StackDirection::Up).is_err());
    }
}
