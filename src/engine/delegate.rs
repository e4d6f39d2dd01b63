//! Delegation engine: deterministic skill-matching pass over an
//! action sequence.

use std::collections::HashMap;

use crate::config::SkillTables;
use crate::entities::{HouseholdMember, Task, TaskAction};

/// Assign unassigned actions to household members by skill match.
///
/// Pre-assigned actions are never overwritten. The skill lookup is
/// case-insensitive and the first registered member wins ties for a
/// skill, so the output is deterministic in roster order.
pub fn delegate_actions(
    tables: &SkillTables,
    task: &Task,
    mut actions: Vec<TaskAction>,
    members: &[HouseholdMember],
) -> Vec<TaskAction> {
    if members.is_empty() {
        return actions;
    }

    // skill -> names of members carrying it, in registration order
    let mut members_by_skill: HashMap<String, Vec<&str>> = HashMap::new();
    for member in members {
        for skill in &member.skills {
            members_by_skill
                .entry(skill.to_lowercase())
                .or_default()
                .push(member.name.as_str());
        }
    }

    let domain_skills = tables.skills_for_domain(task.domain);

    for action in &mut actions {
        if action.assigned_to.is_some() {
            continue;
        }

        let type_skills = tables.skills_for_action(action.action_type);

        let assigned = domain_skills
            .iter()
            .chain(type_skills.iter())
            .find_map(|skill| {
                members_by_skill
                    .get(&skill.to_lowercase())
                    .and_then(|names| names.first().copied())
            });

        if let Some(name) = assigned {
            action.assigned_to = Some(name.to_string());
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ActionType, TaskDomain};

    fn member(id: &str, name: &str, skills: &[&str]) -> HouseholdMember {
        HouseholdMember::new(id, "u1", name, skills.iter().map(|s| (*s).to_string()).collect())
    }

    fn home_task() -> Task {
        Task::new("t1", "u1", "Restock pantry", TaskDomain::Home)
    }

    #[test]
    fn test_no_members_returns_actions_unchanged() {
        let actions = vec![
            TaskAction::new("t1", ActionType::Purchase, "Buy groceries", 0),
            TaskAction::new("t1", ActionType::Checklist, "Put away", 1),
        ];
        let expected = actions.clone();

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &[]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_purchase_in_home_domain_matches_errands() {
        let members = vec![member("m1", "Alex", &["errands"])];
        let actions = vec![TaskAction::new("t1", ActionType::Purchase, "Buy groceries", 0)];

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &members);
        assert_eq!(result[0].assigned_to.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_preassigned_action_is_never_overwritten() {
        let members = vec![member("m1", "Alex", &["errands"])];
        let mut action = TaskAction::new("t1", ActionType::Purchase, "Buy groceries", 0);
        action.assigned_to = Some("Sam".to_string());

        let result = delegate_actions(&SkillTables::default(), &home_task(), vec![action], &members);
        assert_eq!(result[0].assigned_to.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_first_registered_member_wins_skill_ties() {
        let members = vec![
            member("m1", "First", &["cleaning"]),
            member("m2", "Second", &["cleaning"]),
        ];
        let actions = vec![TaskAction::new("t1", ActionType::Checklist, "Deep clean", 0)];

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &members);
        assert_eq!(result[0].assigned_to.as_deref(), Some("First"));
    }

    #[test]
    fn test_skill_match_is_case_insensitive() {
        let members = vec![member("m1", "Alex", &["Errands"])];
        let actions = vec![TaskAction::new("t1", ActionType::Purchase, "Buy supplies", 0)];

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &members);
        assert_eq!(result[0].assigned_to.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_no_matching_skill_leaves_unassigned() {
        let members = vec![member("m1", "Alex", &["piloting"])];
        let actions = vec![TaskAction::new("t1", ActionType::Photo, "Take a photo", 0)];

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &members);
        assert!(result[0].assigned_to.is_none());
    }

    #[test]
    fn test_domain_skills_take_precedence_over_type_skills() {
        // Home domain implies handyman before purchase implies shopping.
        let members = vec![
            member("m1", "Shopper", &["shopping"]),
            member("m2", "Fixer", &["handyman"]),
        ];
        let actions = vec![TaskAction::new("t1", ActionType::Purchase, "Buy a hinge", 0)];

        let result = delegate_actions(&SkillTables::default(), &home_task(), actions, &members);
        assert_eq!(result[0].assigned_to.as_deref(), Some("Fixer"));
    }
}
