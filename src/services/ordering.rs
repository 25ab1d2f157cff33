//! Position bookkeeping for a user's film list.
//!
//! The planners here are pure: they take the current `(membership, order)`
//! pairs and return only the rows whose order has to change. The membership
//! repository applies the plan inside a transaction.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::MembershipId;

/// Order given to the first entry of a list; `max_order` of an empty list is
/// one less than this.
pub const FIRST_ORDER: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("Membership {0} is not part of this list")]
    UnknownMembership(MembershipId),
}

/// Order to give a membership appended after `max_order`.
#[must_use]
pub const fn next_order(max_order: i32) -> i32 {
    max_order + 1
}

/// Renumbers the list to `1..=N`, keeping the current relative order.
/// Ties are broken by membership id so the result is stable.
#[must_use]
pub fn plan_renumber(current: &[(MembershipId, i32)]) -> Vec<(MembershipId, i32)> {
    let mut sorted = current.to_vec();
    sorted.sort_by_key(|&(id, order)| (order, id));

    assign_positions(sorted.into_iter(), current)
}

/// Assigns positions from a client-submitted ordering.
///
/// Every requested id must belong to `current`. Repeated ids keep their first
/// position. Entries the client left out follow the submitted ones in their
/// previous relative order, so the result is always `1..=N`.
pub fn plan_sort(
    current: &[(MembershipId, i32)],
    requested: &[MembershipId],
) -> Result<Vec<(MembershipId, i32)>, OrderingError> {
    let known: HashSet<MembershipId> = current.iter().map(|&(id, _)| id).collect();

    let mut seen = HashSet::with_capacity(requested.len());
    let mut sequence = Vec::with_capacity(current.len());

    for &id in requested {
        if !known.contains(&id) {
            return Err(OrderingError::UnknownMembership(id));
        }
        if seen.insert(id) {
            sequence.push((id, 0));
        }
    }

    let mut omitted: Vec<(MembershipId, i32)> = current
        .iter()
        .copied()
        .filter(|(id, _)| !seen.contains(id))
        .collect();
    omitted.sort_by_key(|&(id, order)| (order, id));
    sequence.extend(omitted);

    Ok(assign_positions(sequence.into_iter(), current))
}

fn assign_positions(
    sequence: impl Iterator<Item = (MembershipId, i32)>,
    current: &[(MembershipId, i32)],
) -> Vec<(MembershipId, i32)> {
    sequence
        .zip(FIRST_ORDER..)
        .filter_map(|((id, _), position)| {
            let unchanged = current
                .iter()
                .any(|&(cur_id, cur_order)| cur_id == id && cur_order == position);
            (!unchanged).then_some((id, position))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: i32) -> MembershipId {
        MembershipId::new(id)
    }

    #[test]
    fn next_order_appends_after_max() {
        assert_eq!(next_order(0), FIRST_ORDER);
        assert_eq!(next_order(3), 4);
    }

    #[test]
    fn renumber_closes_gap_after_delete() {
        // Orders 1,2,3 with the entry at 2 removed.
        let current = [(m(10), 1), (m(12), 3)];
        let plan = plan_renumber(&current);
        assert_eq!(plan, vec![(m(12), 2)]);
    }

    #[test]
    fn renumber_breaks_ties_by_id() {
        let current = [(m(5), 2), (m(3), 2), (m(9), 7)];
        let plan = plan_renumber(&current);
        assert_eq!(plan, vec![(m(3), 1), (m(9), 3)]);
    }

    #[test]
    fn renumber_of_contiguous_list_is_empty() {
        let current = [(m(1), 1), (m(2), 2), (m(3), 3)];
        assert!(plan_renumber(&current).is_empty());
    }

    #[test]
    fn sort_assigns_submitted_positions() {
        let current = [(m(1), 1), (m(2), 2), (m(3), 3)];
        let plan = plan_sort(&current, &[m(3), m(1), m(2)]).unwrap();
        assert_eq!(plan, vec![(m(3), 1), (m(1), 2), (m(2), 3)]);
    }

    #[test]
    fn sort_ignores_prior_order_values() {
        let current = [(m(1), 40), (m(2), 7), (m(3), 19)];
        let plan = plan_sort(&current, &[m(2), m(3), m(1)]).unwrap();
        assert_eq!(plan, vec![(m(2), 1), (m(3), 2), (m(1), 3)]);
    }

    #[test]
    fn sort_rejects_foreign_membership() {
        let current = [(m(1), 1), (m(2), 2)];
        let err = plan_sort(&current, &[m(2), m(99), m(1)]).unwrap_err();
        assert_eq!(err, OrderingError::UnknownMembership(m(99)));
    }

    #[test]
    fn sort_appends_omitted_entries() {
        let current = [(m(1), 1), (m(2), 2), (m(3), 3), (m(4), 4)];
        let plan = plan_sort(&current, &[m(4), m(2)]).unwrap();
        assert_eq!(plan, vec![(m(4), 1), (m(1), 3), (m(3), 4)]);
    }

    #[test]
    fn sort_keeps_first_position_of_duplicates() {
        let current = [(m(1), 1), (m(2), 2)];
        let plan = plan_sort(&current, &[m(2), m(1), m(2)]).unwrap();
        assert_eq!(plan, vec![(m(2), 1), (m(1), 2)]);
    }
}
