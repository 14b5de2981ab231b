//! Reporting hierarchy lookups over `reporting_manager_id` links.

use std::collections::HashSet;

use shared_types::UserProfile;

/// Every user reporting to `root`, directly or through intermediate
/// managers. Direct reports come first, then each report's own team.
/// A cycle in the manager links is walked once and never loops.
pub fn downstream_user_ids(root: &str, users: &[UserProfile]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(root);

    let mut result = Vec::new();
    collect(root, users, &mut seen, &mut result);
    result
}

fn collect<'a>(
    manager: &str,
    users: &'a [UserProfile],
    seen: &mut HashSet<&'a str>,
    result: &mut Vec<String>,
) {
    let direct: Vec<&'a UserProfile> = users
        .iter()
        .filter(|u| u.reporting_manager_id.as_deref() == Some(manager))
        .filter(|u| seen.insert(u.id.as_str()))
        .collect();

    result.extend(direct.iter().map(|u| u.id.clone()));
    for report in direct {
        collect(&report.id, users, seen, result);
    }
}

/// Whether `manager_id` sits anywhere above `user_id` in the reporting chain
pub fn is_upstream(manager_id: &str, user_id: &str, users: &[UserProfile]) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = user_id;

    while visited.insert(current) {
        let next = users
            .iter()
            .find(|u| u.id == current)
            .and_then(|u| u.reporting_manager_id.as_deref());

        match next {
            Some(id) if id == manager_id => return true,
            Some(id) => current = id,
            None => return false,
        }
    }
    false
}
