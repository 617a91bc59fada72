use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WaterdropError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WaterdropError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        WaterdropError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        WaterdropError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WaterdropError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
