use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScaleError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ScaleError::capacity("x")
            .to_string()
            .contains("capacity error:")
    );
    assert!(
        ScaleError::contract("x")
            .to_string()
            .contains("contract violation:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScaleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn create_time_classification() {
    assert!(ScaleError::configuration("x").is_fatal_at_create());
    assert!(ScaleError::capacity("x").is_fatal_at_create());
    assert!(!ScaleError::contract("x").is_fatal_at_create());
}
