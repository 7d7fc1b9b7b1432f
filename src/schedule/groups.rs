use indexmap::IndexMap;

use super::roster::{normalize_group_name, StaffMember};
use crate::error::InputError;

/// Staff sharing one normalized group name, in roster order
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub name: String,
    pub leader: Option<&'a StaffMember>,
    /// Everyone in the group except the leader
    pub members: Vec<&'a StaffMember>,
}

/// Partitions grouped staff by normalized group name.
///
/// Groups come back in order of first appearance. Staff with no group tag
/// are left out. A member tag naming a different group than the same
/// person's leader tag, or a second leader for one group, is rejected.
pub fn resolve_groups(staff: &[StaffMember]) -> Result<Vec<Group<'_>>, InputError> {
    let mut groups: IndexMap<String, Group<'_>> = IndexMap::new();

    for member in staff {
        let leader_of = member.group_leader_of.as_deref().map(normalize_group_name);
        let member_of = member.group_member_of.as_deref().map(normalize_group_name);

        let (name, is_leader) = match (leader_of, member_of) {
            (Some(led), Some(joined)) if led != joined => {
                return Err(InputError::AmbiguousGroup {
                    name: member.name.clone(),
                    reason: format!("leads {led:?} but is a member of {joined:?}"),
                });
            }
            (Some(led), _) => (led, true),
            (None, Some(joined)) => (joined, false),
            (None, None) => continue,
        };

        let group = groups.entry(name.clone()).or_insert_with(|| Group {
            name,
            leader: None,
            members: Vec::new(),
        });

        if is_leader {
            if let Some(existing) = group.leader {
                return Err(InputError::AmbiguousGroup {
                    name: member.name.clone(),
                    reason: format!("group {:?} is already led by {}", group.name, existing.name),
                });
            }
            group.leader = Some(member);
        } else {
            group.members.push(member);
        }
    }

    Ok(groups.into_values().collect())
}
