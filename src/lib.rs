pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod schedule;
pub mod web;

pub use error::{AllocError, ConfigError, InputError, PlacementFailure, Stage};
pub use schedule::{schedule_roster, Allocator, AssignmentResult, StaffMember, Vocabulary};
