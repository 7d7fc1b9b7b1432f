pub mod types;
pub mod vocabulary;
pub mod capacity;
pub mod roster;
pub mod generic;
pub mod groups;
pub mod routing;
pub mod allocator;

pub use types::{
    AllocationState, Area, AreaAssignment, AreaSnapshot, AssignmentResult, Position, Section,
};
pub use vocabulary::Vocabulary;
pub use capacity::{AreaCapacityConfig, AreaLimits};
pub use roster::{filter_attending, StaffMember};
pub use allocator::{schedule_roster, Allocator};
