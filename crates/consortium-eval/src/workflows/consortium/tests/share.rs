use super::common::*;
use crate::workflows::consortium::evaluation::check_share_limits;

#[test]
fn members_are_capped_by_capacity_over_requirement() {
    let members = two_member_consortium();
    let results = check_share_limits(&members, 4_000_000_000.0);

    assert_eq!(results.len(), 2);

    let lead = &results[0];
    assert_eq!(lead.name, "Hanbit Electric");
    assert_close(lead.max_share, 75.0);
    assert_close(lead.difference, 15.0);
    assert!(!lead.is_problem);

    let partner = &results[1];
    assert_eq!(partner.name, "Daon Telecom");
    assert_eq!(partner.input_share, 40.0);
    assert_close(partner.max_share, 25.0);
    assert_close(partner.difference, -15.0);
    assert!(partner.is_problem);
}

#[test]
fn non_positive_requirement_checks_nothing() {
    let members = two_member_consortium();
    assert!(check_share_limits(&members, 0.0).is_empty());
    assert!(check_share_limits(&members, -1.0).is_empty());
}

#[test]
fn unparsable_capacity_counts_as_zero() {
    let mut members = two_member_consortium();
    members[1].company.capacity_rating = Some("unknown".to_string());

    let results = check_share_limits(&members, 4_000_000_000.0);
    assert_eq!(results[1].max_share, 0.0);
    assert!(results[1].is_problem);
}

#[test]
fn evaluator_delegates_share_checks() {
    let evaluator = standard_evaluator();
    let members = two_member_consortium();

    let results = evaluator.check_share_limits(&members, 4_000_000_000.0);
    assert_eq!(results, check_share_limits(&members, 4_000_000_000.0));
}
