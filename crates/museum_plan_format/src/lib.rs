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

pub mod artwork;
pub use artwork::*;

pub mod door;
pub use door::*;

pub mod edge;
pub use edge::*;

pub mod floor;
pub use floor::*;

pub mod geometry;

pub mod link;
pub use link::*;

pub mod misc;
pub use misc::*;

pub mod plan;
pub use plan::*;

pub mod room;
pub use room::*;

pub mod semver;
pub use semver::*;

pub mod wall;
pub use wall::*;

pub mod export;

pub const CURRENT_MAJOR_VERSION: u32 = 1;
pub const CURRENT_MINOR_VERSION: u32 = 0;
