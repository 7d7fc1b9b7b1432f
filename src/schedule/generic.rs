use tracing::{debug, info};

use super::capacity::AreaCapacityConfig;
use super::roster::StaffMember;
use super::types::{AllocationState, Area, AreaSnapshot, Position, Section};

/// Remaining room under the area total (may be negative)
pub fn area_vacancy(state: &AllocationState, config: &AreaCapacityConfig, area: Area) -> i64 {
    config.limits(area).total - state.area_count(area) as i64
}

/// Remaining room in one section (may be negative)
pub fn section_vacancy(
    state: &AllocationState,
    config: &AreaCapacityConfig,
    position: Position,
) -> i64 {
    config.section_limit(position) - state.count(position) as i64
}

pub fn snapshot(state: &AllocationState, config: &AreaCapacityConfig, area: Area) -> AreaSnapshot {
    let limits = config.limits(area);
    AreaSnapshot {
        area,
        front: state.count(Position::new(area, Section::Front)),
        back: state.count(Position::new(area, Section::Back)),
        front_limit: limits.front,
        back_limit: limits.back,
        total_limit: limits.total,
    }
}

/// Section choice within one area, shared by every pass that places staff.
///
/// The area total is checked first. A preferred section with room always
/// wins; otherwise the section with more room is taken, and front only wins
/// on a strict majority, so equal vacancies go to back. Returns `None`
/// without touching `state` when nothing fits.
pub fn place_in_area(
    state: &mut AllocationState,
    config: &AreaCapacityConfig,
    staff: &StaffMember,
    area: Area,
) -> Option<Section> {
    if area_vacancy(state, config, area) <= 0 {
        debug!(
            name = %staff.name,
            %area,
            occupied = state.area_count(area),
            total = config.limits(area).total,
            "area is full"
        );
        return None;
    }

    let front_vacancy = section_vacancy(state, config, Position::new(area, Section::Front));
    let back_vacancy = section_vacancy(state, config, Position::new(area, Section::Back));
    let vacancy = |section: Section| match section {
        Section::Front => front_vacancy,
        Section::Back => back_vacancy,
    };

    let section = match staff.preferred_section {
        Some(preferred) if vacancy(preferred) > 0 => preferred,
        _ if front_vacancy > 0 && back_vacancy > 0 => {
            if front_vacancy > back_vacancy {
                Section::Front
            } else {
                Section::Back
            }
        }
        _ if front_vacancy > 0 => Section::Front,
        _ if back_vacancy > 0 => Section::Back,
        _ => {
            debug!(name = %staff.name, %area, "front and back are both full");
            return None;
        }
    };

    let position = Position::new(area, section);
    state.push(position, &staff.name);
    info!(name = %staff.name, %position, "assigned");
    Some(section)
}

/// Puts `name` into an exact section when it has room.
///
/// Used to seat group members next to their leader. The area total is
/// honoured as well as the section limit.
pub fn place_in_section(
    state: &mut AllocationState,
    config: &AreaCapacityConfig,
    name: &str,
    position: Position,
) -> bool {
    if section_vacancy(state, config, position) <= 0
        || area_vacancy(state, config, position.area) <= 0
    {
        debug!(name, %position, "no room beside group leader");
        return false;
    }
    state.push(position, name);
    info!(name, %position, "assigned with group");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::capacity::AreaLimits;

    fn config(front: i64, back: i64, total: i64) -> AreaCapacityConfig {
        let limits = AreaLimits { front, back, total };
        AreaCapacityConfig::new(limits, limits)
    }

    fn place(state: &mut AllocationState, config: &AreaCapacityConfig, staff: &StaffMember) -> Option<Section> {
        place_in_area(state, config, staff, Area::Inbound)
    }

    #[test]
    fn test_equal_vacancy_goes_to_back() {
        let config = config(1, 1, 2);
        let mut state = AllocationState::new();
        assert_eq!(place(&mut state, &config, &StaffMember::new("first", "A")), Some(Section::Back));
        assert_eq!(place(&mut state, &config, &StaffMember::new("second", "A")), Some(Section::Front));
    }

    #[test]
    fn test_front_wins_only_on_strict_majority() {
        let config = config(3, 2, 5);
        let mut state = AllocationState::new();
        // 3 vs 2, then 2 vs 2
        assert_eq!(place(&mut state, &config, &StaffMember::new("a", "A")), Some(Section::Front));
        assert_eq!(place(&mut state, &config, &StaffMember::new("b", "A")), Some(Section::Back));
    }

    #[test]
    fn test_preference_beats_balancing() {
        let config = config(1, 5, 6);
        let mut state = AllocationState::new();
        let staff = StaffMember::new("Alice", "A").with_preferred_section(Section::Front);
        assert_eq!(place(&mut state, &config, &staff), Some(Section::Front));
    }

    #[test]
    fn test_full_preference_falls_back_to_balancing() {
        let config = config(1, 2, 3);
        let mut state = AllocationState::new();
        state.push(Position::new(Area::Inbound, Section::Front), "x");
        let staff = StaffMember::new("Alice", "A").with_preferred_section(Section::Front);
        assert_eq!(place(&mut state, &config, &staff), Some(Section::Back));
    }

    #[test]
    fn test_area_total_checked_before_sections() {
        let config = config(5, 5, 1);
        let mut state = AllocationState::new();
        assert!(place(&mut state, &config, &StaffMember::new("a", "A")).is_some());
        assert_eq!(place(&mut state, &config, &StaffMember::new("b", "A")), None);
        assert_eq!(state.area_count(Area::Inbound), 1);
    }

    #[test]
    fn test_sections_full_under_total() {
        let config = config(1, 0, 10);
        let mut state = AllocationState::new();
        assert_eq!(place(&mut state, &config, &StaffMember::new("a", "A")), Some(Section::Front));
        assert_eq!(place(&mut state, &config, &StaffMember::new("b", "A")), None);
    }

    #[test]
    fn test_negative_limit_never_has_room() {
        let config = config(-1, 1, 3);
        let mut state = AllocationState::new();
        let staff = StaffMember::new("a", "A").with_preferred_section(Section::Front);
        assert_eq!(place(&mut state, &config, &staff), Some(Section::Back));
    }

    #[test]
    fn test_areas_are_independent() {
        let config = config(1, 1, 2);
        let mut state = AllocationState::new();
        place_in_area(&mut state, &config, &StaffMember::new("a", "B"), Area::Outbound);
        assert_eq!(state.area_count(Area::Inbound), 0);
        assert_eq!(snapshot(&state, &config, Area::Outbound).occupied(), 1);
    }

    #[test]
    fn test_place_in_section_respects_limits() {
        let config = config(1, 3, 2);
        let mut state = AllocationState::new();
        let front = Position::new(Area::Inbound, Section::Front);
        let back = Position::new(Area::Inbound, Section::Back);
        assert!(place_in_section(&mut state, &config, "a", front));
        assert!(!place_in_section(&mut state, &config, "b", front));
        assert!(place_in_section(&mut state, &config, "c", back));
        // back still has section room, but the area total is reached
        assert!(!place_in_section(&mut state, &config, "d", back));
    }
}
