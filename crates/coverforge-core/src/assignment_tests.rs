//! Tests for assignment ownership

use super::assignment::*;
use super::coverage::{CoverageIndex, ResourceId};
use super::error::AssignmentError;

fn index() -> CoverageIndex {
    CoverageIndex::from_resources(
        4,
        vec![(10, vec![0, 1]), (11, vec![2]), (12, vec![3]), (13, vec![0, 3])],
    )
}

#[test]
fn test_assign_fills_slots_in_order() {
    let mut a = Assignment::new(1, 4, 3);
    assert_eq!(a.assign(2, 0), Ok(0));
    assert_eq!(a.assign(0, 0), Ok(1));
    assert_eq!(a.slots(0), &[Some(2), Some(0), None]);
    assert_eq!(a.held_count(0), 2);
    assert!(a.has_spare_capacity(0));
}

#[test]
fn test_release_reuses_slot() {
    let mut a = Assignment::new(1, 4, 2);
    a.assign(0, 0).unwrap();
    a.assign(1, 0).unwrap();
    assert_eq!(a.release(0), Ok(0));
    assert_eq!(a.owner(0), None);
    assert_eq!(a.assign(3, 0), Ok(0));
    assert_eq!(a.held(0).collect::<Vec<_>>(), vec![3, 1]);
}

#[test]
fn test_release_unheld_is_rejected() {
    let mut a = Assignment::new(1, 4, 2);
    assert_eq!(a.release(1), Err(AssignmentError::NotHeld { resource: 1 }));
    assert_eq!(
        a.release(9),
        Err(AssignmentError::UnknownResource { resource: 9 })
    );
}

#[test]
fn test_unknown_agent_rejected() {
    let mut a = Assignment::new(1, 4, 2);
    assert_eq!(a.assign(0, 5), Err(AssignmentError::UnknownAgent { agent: 5 }));
    assert_eq!(a.assigned_count(), 0);
}

#[test]
fn test_transfer() {
    let mut a = Assignment::new(2, 4, 1);
    a.assign(0, 0).unwrap();
    assert_eq!(a.transfer(0, 1), Ok(0));
    assert_eq!(a.owner(0), Some(1));
    assert_eq!(a.held_count(0), 0);

    assert_eq!(a.transfer(0, 1), Err(AssignmentError::SameAgent { agent: 1 }));

    a.assign(1, 0).unwrap();
    assert_eq!(
        a.transfer(0, 0),
        Err(AssignmentError::CapacityExhausted {
            agent: 0,
            capacity: 1
        })
    );
    assert_eq!(a.owner(0), Some(1));
}

#[test]
fn test_swap_keeps_slot_positions() {
    let mut a = Assignment::new(2, 4, 2);
    a.assign(0, 0).unwrap();
    a.assign(1, 0).unwrap();
    a.assign(2, 1).unwrap();

    a.swap(1, 2).unwrap();
    assert_eq!(a.slots(0), &[Some(0), Some(2)]);
    assert_eq!(a.slots(1), &[Some(1), None]);
    assert_eq!(a.owner(1), Some(1));
    assert_eq!(a.owner(2), Some(0));

    assert_eq!(a.swap(0, 2), Err(AssignmentError::SameAgent { agent: 0 }));
    assert_eq!(a.swap(0, 3), Err(AssignmentError::NotHeld { resource: 3 }));
}

#[test]
fn test_active_periods_recomputed() {
    let index = index();
    let mut a = Assignment::new(1, index.resource_count(), 3);
    a.assign(0, 0).unwrap();
    a.assign(3, 0).unwrap();
    let active = a.active_periods(0, &index);
    assert_eq!(active.iter().collect::<Vec<_>>(), vec![0, 1, 3]);
}

#[test]
fn test_to_rows_uses_sentinel() {
    let index = index();
    let mut a = Assignment::new(2, index.resource_count(), 2);
    a.assign(index.index_of(ResourceId(12)).unwrap(), 1).unwrap();
    assert_eq!(a.to_rows(&index), vec![vec![-1, -1], vec![12, -1]]);
}
