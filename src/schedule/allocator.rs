use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use super::capacity::AreaCapacityConfig;
use super::generic::{place_in_area, place_in_section, snapshot};
use super::groups::resolve_groups;
use super::roster::{check_unique_names, filter_attending, StaffMember};
use super::routing::{classify, route_staff, Route};
use super::types::{AllocationState, AssignmentResult, Area};
use super::vocabulary::Vocabulary;
use crate::error::{AllocError, InputError, PlacementFailure, Stage};

/// One scheduling run over one roster.
///
/// The allocator owns its [`AllocationState`] and is consumed by [`run`],
/// so every run starts empty and nothing is shared between runs.
///
/// [`run`]: Allocator::run
pub struct Allocator<'a> {
    config: &'a AreaCapacityConfig,
    state: AllocationState,
}

impl<'a> Allocator<'a> {
    pub fn new(config: &'a AreaCapacityConfig) -> Self {
        Self {
            config,
            state: AllocationState::new(),
        }
    }

    /// Places every staff member or fails on the first one that cannot be
    /// placed. Passes run in a fixed order: fixed areas, groups, then
    /// everyone left by team.
    pub fn run(mut self, staff: &[StaffMember]) -> Result<AssignmentResult, AllocError> {
        check_unique_names(staff)?;
        let groups = resolve_groups(staff)?;

        self.fixed_area_pass(staff)?;

        for group in &groups {
            let Some(leader) = group.leader else {
                debug!(group = %group.name, "group has no leader, members placed individually");
                continue;
            };
            self.seat_group(leader, &group.members);
        }

        self.remainder_pass(staff)?;

        info!(
            inbound = self.state.area_count(Area::Inbound),
            outbound = self.state.area_count(Area::Outbound),
            mobile = self.state.mobile_team().len(),
            "allocation complete"
        );
        Ok(self.state.into_result())
    }

    fn fixed_area_pass(&mut self, staff: &[StaffMember]) -> Result<(), AllocError> {
        for member in staff {
            let Some(area) = member.fixed_area else {
                continue;
            };
            if place_in_area(&mut self.state, self.config, member, area).is_none() {
                let failure = PlacementFailure {
                    stage: Stage::FixedArea,
                    staff: member.clone(),
                    areas: vec![snapshot(&self.state, self.config, area)],
                };
                error!(
                    name = %member.name,
                    %area,
                    snapshot = %failure.areas[0],
                    "cannot place fixed-area staff member"
                );
                return Err(failure.into());
            }
        }
        Ok(())
    }

    /// Places the leader, then seats members in the leader's exact section
    /// while it has room. Anyone left over is handled by the remainder pass.
    fn seat_group(&mut self, leader: &StaffMember, members: &[&StaffMember]) {
        let anchor = match self.state.position_of(&leader.name) {
            Some(position) => position,
            None => match route_staff(&mut self.state, self.config, leader) {
                Ok(position) => position,
                Err(err) => {
                    warn!(
                        leader = %leader.name,
                        error = %err,
                        "group leader not placed, members placed individually"
                    );
                    return;
                }
            },
        };

        for member in members {
            if self.state.is_placed(&member.name) {
                continue;
            }
            if !place_in_section(&mut self.state, self.config, &member.name, anchor) {
                debug!(
                    name = %member.name,
                    leader = %leader.name,
                    %anchor,
                    "member left for the remainder pass"
                );
                continue;
            }
            if classify(self.config, &member.team_name) == Some(Route::Mobile) {
                self.state.mark_mobile(&member.name);
            }
        }
    }

    fn remainder_pass(&mut self, staff: &[StaffMember]) -> Result<(), AllocError> {
        for member in staff {
            if self.state.is_placed(&member.name) {
                continue;
            }
            if let Err(err) = route_staff(&mut self.state, self.config, member) {
                match &err {
                    AllocError::Placement(failure) => {
                        for area in &failure.areas {
                            error!(
                                name = %member.name,
                                team = %member.team_name,
                                snapshot = %area,
                                "{}",
                                failure.stage
                            );
                        }
                    }
                    other => {
                        error!(name = %member.name, error = %other, "cannot route staff member")
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Validates raw inputs and runs one allocation.
///
/// The config is checked before any staff entry is read; the attendance
/// total, when configured, before any placement.
pub fn schedule_roster(
    entries: &[Value],
    config: &Map<String, Value>,
    vocabulary: &Vocabulary,
) -> Result<AssignmentResult, AllocError> {
    let config = AreaCapacityConfig::from_map(config)?;
    let staff = filter_attending(entries, vocabulary)?;
    info!(attending = staff.len(), roster = entries.len(), "starting allocation");

    if let Some(expected) = config.total_attendance {
        if staff.len() as i64 != expected {
            return Err(InputError::AttendanceMismatch {
                expected,
                actual: staff.len(),
            }
            .into());
        }
    }

    Allocator::new(&config).run(&staff)
}
