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

use serde::{Deserialize, Serialize};

/// The unique name of a plan element within its plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct NameInPlan(pub String);

impl Default for NameInPlan {
    fn default() -> Self {
        Self("<Unnamed>".to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct NameOfPlan(pub String);

impl Default for NameOfPlan {
    fn default() -> Self {
        Self("new_plan".to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// In places where the `Side` enum is used to indicate start/end instead
    /// of left/right, we use Left to indicate the starting side. This method
    /// formally encodes that.
    pub fn start() -> Side {
        Side::Left
    }

    /// In places where the `Side` enum is used to indicate start/end instead
    /// of left/right, we use Right to indicate the ending side. This method
    /// formally encodes that.
    pub fn end() -> Side {
        Side::Right
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Position of a floor within the vertical stack of its plan. The ground
/// floor is 0, floors above it count up, floors below it count down.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Storey(pub i32);

impl Default for Storey {
    fn default() -> Self {
        Storey(0)
    }
}

pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
