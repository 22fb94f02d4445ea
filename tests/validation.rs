mod common;

use xpayment_adapter::error::ValidationError;
use xpayment_adapter::messaging::validation::{minor_units, validate_charge_request};

#[test]
fn minor_units_follow_iso_4217() {
    assert_eq!(minor_units("USD"), Some(2));
    assert_eq!(minor_units("EUR"), Some(2));
    assert_eq!(minor_units("JPY"), Some(0));
    assert_eq!(minor_units("BHD"), Some(3));
    assert_eq!(minor_units("ZZZ"), None);
}

#[test]
fn well_formed_requests_pass() {
    assert!(validate_charge_request(&common::charge_request("10.00", "USD")).is_ok());
    assert!(validate_charge_request(&common::charge_request("1000", "JPY")).is_ok());
    assert!(validate_charge_request(&common::charge_request("1.250", "BHD")).is_ok());
    assert!(validate_charge_request(&common::charge_request("0.00", "USD")).is_ok());
}

#[test]
fn scale_mismatch_is_rejected() {
    let err = validate_charge_request(&common::charge_request("10.5", "USD")).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ScaleMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = validate_charge_request(&common::charge_request("100.00", "JPY")).unwrap_err();
    assert!(matches!(err, ValidationError::ScaleMismatch { expected: 0, .. }));
}

#[test]
fn negative_amount_is_rejected() {
    let err = validate_charge_request(&common::charge_request("-1.00", "USD")).unwrap_err();
    assert!(matches!(err, ValidationError::NegativeAmount(_)));
}

#[test]
fn unknown_currency_is_rejected() {
    let err = validate_charge_request(&common::charge_request("10.00", "ZZZ")).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownCurrency(_)));
}

#[test]
fn missing_currency_is_rejected() {
    let err = validate_charge_request(&common::charge_request("10.00", "")).unwrap_err();
    assert!(matches!(err, ValidationError::CurrencyMissing));
}
