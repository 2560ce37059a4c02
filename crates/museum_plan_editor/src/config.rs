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
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    OrderViolation {
        lower: &'static str,
        lower_value: f32,
        upper: &'static str,
        upper_value: f32,
    },
    #[error("history.cap must be at least 1")]
    EmptyHistory,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    /// Metres represented by one grid unit.
    pub unit_metres: f32,
    /// Step of the snapping grid, in grid units.
    pub step: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            unit_metres: 0.5,
            step: 1.0,
        }
    }
}

/// Inclusive thresholds consumed by validators and commit gates. All values
/// are in grid units (areas in square grid units).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Constraints {
    pub min_room_area: f32,
    pub min_wall_length: f32,
    pub min_door_width: f32,
    pub max_door_width: f32,
    pub min_link_width: f32,
    pub max_link_width: f32,
    pub min_artwork_w: f32,
    pub min_artwork_h: f32,
    pub max_artwork_w: f32,
    pub max_artwork_h: f32,
    /// Shortest pointer travel that a shape tool accepts on commit, so a
    /// stray click cannot create a degenerate shape.
    pub min_drag_distance: f32,
    /// Clearance kept between a placed element and the ends of its host.
    /// One knob serves doors, links and artworks alike.
    pub min_clearance: f32,
    /// Distance to the first vertex under which the polygon tool closes.
    pub close_threshold: f32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_room_area: 1.0,
            min_wall_length: 0.5,
            min_door_width: 0.5,
            max_door_width: 4.0,
            min_link_width: 0.5,
            max_link_width: 6.0,
            min_artwork_w: 0.2,
            min_artwork_h: 0.2,
            max_artwork_w: 10.0,
            max_artwork_h: 10.0,
            min_drag_distance: 0.5,
            min_clearance: 0.1,
            close_threshold: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of checkpoints retained.
    pub cap: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { cap: 50 }
    }
}

/// Pick-up radii of the snap service, in grid units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SnapRadii {
    pub vertex: f32,
    pub wall: f32,
    pub grid: f32,
}

impl Default for SnapRadii {
    fn default() -> Self {
        Self {
            vertex: 0.75,
            wall: 0.5,
            grid: 0.71,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub grid: GridSettings,
    pub constraints: Constraints,
    pub history: HistorySettings,
    pub snap: SnapRadii,
}

impl EditorConfig {
    /// Refuse inconsistent thresholds before any editing starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid.unit_metres", self.grid.unit_metres),
            ("grid.step", self.grid.step),
            ("constraints.min_room_area", self.constraints.min_room_area),
            ("constraints.min_wall_length", self.constraints.min_wall_length),
            ("constraints.min_door_width", self.constraints.min_door_width),
            ("constraints.min_link_width", self.constraints.min_link_width),
            ("constraints.min_artwork_w", self.constraints.min_artwork_w),
            ("constraints.min_artwork_h", self.constraints.min_artwork_h),
            ("constraints.min_drag_distance", self.constraints.min_drag_distance),
            ("constraints.close_threshold", self.constraints.close_threshold),
            ("snap.vertex", self.snap.vertex),
            ("snap.wall", self.snap.wall),
            ("snap.grid", self.snap.grid),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.constraints.min_clearance < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "constraints.min_clearance",
                value: self.constraints.min_clearance,
            });
        }

        let ordered = [
            (
                ("constraints.min_door_width", self.constraints.min_door_width),
                ("constraints.max_door_width", self.constraints.max_door_width),
            ),
            (
                ("constraints.min_link_width", self.constraints.min_link_width),
                ("constraints.max_link_width", self.constraints.max_link_width),
            ),
            (
                ("constraints.min_artwork_w", self.constraints.min_artwork_w),
                ("constraints.max_artwork_w", self.constraints.max_artwork_w),
            ),
            (
                ("constraints.min_artwork_h", self.constraints.min_artwork_h),
                ("constraints.max_artwork_h", self.constraints.max_artwork_h),
            ),
        ];
        for ((lower, lower_value), (upper, upper_value)) in ordered {
            if lower_value > upper_value {
                return Err(ConfigError::OrderViolation {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        if self.history.cap == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        assert_eq!(EditorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_bounds_are_refused() {
        let mut config = EditorConfig::default();
        config.constraints.min_door_width = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OrderViolation { .. })
        ));
    }

    #[test]
    fn zero_history_is_refused() {
        let mut config = EditorConfig::default();
        config.history.cap = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyHistory));
    }
}
