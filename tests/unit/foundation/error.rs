use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LanternError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LanternError::resource("x")
            .to_string()
            .contains("resource error:")
    );
    assert!(
        LanternError::timeline("x")
            .to_string()
            .contains("timeline error:")
    );
    assert!(LanternError::render("x").to_string().contains("render error:"));
    assert!(
        LanternError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LanternError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: LanternError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, LanternError::Serde(_)));
}
