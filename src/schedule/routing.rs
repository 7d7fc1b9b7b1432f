use tracing::debug;

use super::capacity::AreaCapacityConfig;
use super::generic::{area_vacancy, place_in_area, snapshot};
use super::roster::StaffMember;
use super::types::{AllocationState, Area, Position};
use crate::error::{AllocError, InputError, PlacementFailure, Stage};

/// Default routing of a staff member, taken from their team name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Inbound,
    Outbound,
    Mobile,
}

impl Route {
    fn stage(self) -> Stage {
        match self {
            Route::Inbound => Stage::InboundTeam,
            Route::Outbound => Stage::OutboundTeam,
            Route::Mobile => Stage::MobileTeam,
        }
    }

    fn areas(self) -> &'static [Area] {
        match self {
            Route::Inbound => &[Area::Inbound],
            Route::Outbound => &[Area::Outbound],
            Route::Mobile => &Area::ALL,
        }
    }
}

pub fn classify(config: &AreaCapacityConfig, team_name: &str) -> Option<Route> {
    let matches = |team: &Option<String>| team.as_deref() == Some(team_name);
    if matches(&config.inbound_team) {
        Some(Route::Inbound)
    } else if matches(&config.outbound_team) {
        Some(Route::Outbound)
    } else if matches(&config.mobile_team) {
        Some(Route::Mobile)
    } else {
        None
    }
}

/// Places one staff member according to their team.
///
/// `state` is only changed on success. The error carries the occupancy of
/// every area the team could have used.
pub fn route_staff(
    state: &mut AllocationState,
    config: &AreaCapacityConfig,
    staff: &StaffMember,
) -> Result<Position, AllocError> {
    let route = classify(config, &staff.team_name).ok_or_else(|| InputError::UnknownTeam {
        name: staff.name.clone(),
        team: staff.team_name.clone(),
    })?;

    let placed = match route {
        Route::Inbound => place_fixed(state, config, staff, Area::Inbound),
        Route::Outbound => place_fixed(state, config, staff, Area::Outbound),
        Route::Mobile => {
            let position = place_mobile(state, config, staff);
            if position.is_some() {
                state.mark_mobile(&staff.name);
            }
            position
        }
    };

    placed.ok_or_else(|| {
        PlacementFailure {
            stage: route.stage(),
            staff: staff.clone(),
            areas: route.areas().iter().map(|&area| snapshot(state, config, area)).collect(),
        }
        .into()
    })
}

fn place_fixed(
    state: &mut AllocationState,
    config: &AreaCapacityConfig,
    staff: &StaffMember,
    area: Area,
) -> Option<Position> {
    place_in_area(state, config, staff, area).map(|section| Position::new(area, section))
}

/// Preferred area first, then the area with more room under its total.
/// Equal room goes to outbound. An area whose sections are both full is
/// passed over for the other one, so this only fails when neither area
/// can take the member.
fn place_mobile(
    state: &mut AllocationState,
    config: &AreaCapacityConfig,
    staff: &StaffMember,
) -> Option<Position> {
    if let Some(area) = staff.preferred_area {
        if let Some(position) = place_fixed(state, config, staff, area) {
            return Some(position);
        }
        debug!(name = %staff.name, %area, "preferred area has no room");
    }

    let inbound_vacancy = area_vacancy(state, config, Area::Inbound);
    let outbound_vacancy = area_vacancy(state, config, Area::Outbound);
    let order = if inbound_vacancy > outbound_vacancy {
        [Area::Inbound, Area::Outbound]
    } else {
        [Area::Outbound, Area::Inbound]
    };

    for area in order {
        if area_vacancy(state, config, area) <= 0 {
            continue;
        }
        if let Some(position) = place_fixed(state, config, staff, area) {
            return Some(position);
        }
        debug!(name = %staff.name, %area, "both sections full, trying the other area");
    }

    debug!(name = %staff.name, "inbound and outbound are both full");
    None
}
