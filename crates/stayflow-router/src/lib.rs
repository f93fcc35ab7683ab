// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-to-task routing for the Stayflow platform.

pub mod mapping;
pub mod router;

pub use mapping::task_type_for_intent;
pub use router::{RoutingDecision, TaskRouter};
