// Unit tests for action addressing validation

use super::*;

#[test]
fn test_id_addressing() {
    let target = ActionTarget::from_flags(Some(7), None).unwrap();
    assert_eq!(target, ActionTarget::Id(7));
}

#[test]
fn test_selector_addressing() {
    let target = ActionTarget::from_flags(None, Some("button.submit".to_string())).unwrap();
    assert_eq!(target, ActionTarget::Selector("button.submit".to_string()));
}

#[test]
fn test_both_schemes_rejected() {
    let err = ActionTarget::from_flags(Some(7), Some("button".to_string())).unwrap_err();
    assert!(matches!(
        err,
        PagelensError::AmbiguousAddressing { supplied: 2 }
    ));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_neither_scheme_rejected() {
    let err = ActionTarget::from_flags(None, None).unwrap_err();
    assert!(matches!(
        err,
        PagelensError::AmbiguousAddressing { supplied: 0 }
    ));
}
