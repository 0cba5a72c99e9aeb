use super::*;

#[test]
fn kind_is_inferred_from_extension() {
    assert_eq!(ResourceKind::from_origin("img/bg.PNG"), ResourceKind::Image);
    assert_eq!(
        ResourceKind::from_origin("https://cdn/x.jpeg?v=3"),
        ResourceKind::Image
    );
    assert_eq!(ResourceKind::from_origin("copy/en.txt"), ResourceKind::Text);
    assert_eq!(ResourceKind::from_origin("blob"), ResourceKind::Binary);
    assert_eq!(ResourceKind::from_origin("a.bin"), ResourceKind::Binary);
}

#[test]
fn identity_is_case_insensitive_and_locale_aware() {
    let r = Resource::image("Hero", Some("en-US"), "hero.png");
    assert!(r.same_identity("hero", Some("EN-us")));
    assert!(!r.same_identity("hero", Some("en")));
    assert!(!r.same_identity("hero", None));

    let generic = Resource::image("hero", None, "hero.png");
    assert!(generic.same_identity("HERO", None));
    assert!(generic.same_identity("hero", Some("  ")));
}

#[test]
fn inline_text_is_available_without_origin() {
    let r = Resource::inline_text("title", Some("fr"), "Bonjour");
    assert!(r.is_inline_text());
    assert!(r.is_available());
    assert!(!r.is_registered());
    assert_eq!(r.text_data(), Some("Bonjour"));
}

#[test]
fn terminal_states_are_exclusive() {
    let mut r = Resource::image("a", None, "a.png");
    assert_eq!(r.state(), &LoadState::Idle);
    r.mark_pending();
    assert!(r.is_registered());

    r.finish(Err("404".to_string()));
    assert!(r.is_error());
    assert!(!r.is_available());
    assert!(!r.is_registered());

    r.mark_pending();
    r.finish(Ok(ResourceData::Binary(vec![1, 2, 3])));
    assert!(r.is_available());
    assert!(!r.is_error());
    assert!(r.image_data().is_none());
}

#[test]
fn keys_are_trimmed_for_storage_and_identity() {
    let r = Resource::image(" hero ", None, "hero.png");
    assert_eq!(r.key(), "hero");
    assert!(r.same_identity("hero", None));
    assert!(r.same_identity("  HERO\t", None));
}
