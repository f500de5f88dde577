//! Plan processing logic.
//!
//! This module contains business logic on top of the address math:
//! - [`allocator`] - free-space search and gap decomposition
//! - [`overlap`] - overlap and outside-parent warnings
//! - [`planner`] - plan analysis and quick-add layouts

mod allocator;
mod overlap;
mod planner;

// Re-export public functions
pub use allocator::{find_free_blocks, find_free_blocks_default, find_gaps, FreeBlock};
pub use overlap::{find_overlapping_subnets, find_subnets_outside, log_plan_warnings, PlanWarning};
pub use planner::{
    analyze_plan, plan_free_blocks, quick_add, PlanReport, QuickAddPattern, SpaceAnalysis,
    SubnetReport,
};
