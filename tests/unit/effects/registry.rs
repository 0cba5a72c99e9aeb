use super::*;

fn solid(px: [u8; 4]) -> Surface {
    let mut s = Surface::new(2, 2).unwrap();
    s.clear(px);
    s
}

#[test]
fn builtins_are_registered() {
    let r = TransitionRegistry::with_builtins();
    assert_eq!(r.render_names().count(), 24);
    assert_eq!(r.easing_names().count(), 13);
    assert!(r.has_render("fade"));
    assert!(r.has_render("WipeLeft"));
    assert!(r.has_easing("easeinoutcubic"));
    assert!(!r.has_render("pagecurl"));
}

#[test]
fn unknown_render_name_passes_first_buffer_through() {
    let r = TransitionRegistry::with_builtins();
    let a = solid([255, 0, 0, 255]);
    let b = solid([0, 0, 255, 255]);
    let mut dst = Surface::new(2, 2).unwrap();
    let rect = dst.bounds();
    r.render_transition("pagecurl", &mut dst, &a, &b, 1.0, rect)
        .unwrap();
    assert_eq!(dst, a);
}

#[test]
fn unknown_easing_is_linear() {
    let r = TransitionRegistry::with_builtins();
    let f = r.easing_fn("bounce");
    for t in [0.0, 0.25, 0.5, 1.0] {
        assert_eq!(f(t), t);
    }
    assert_eq!(r.ease(Some("bounce"), 0.3), 0.3);
    assert_eq!(r.ease(None, 2.0), 1.0);
    assert_eq!(r.ease(Some("easeInQuad"), 0.5), 0.25);
}

#[test]
fn empty_registry_falls_back_everywhere() {
    let r = TransitionRegistry::empty();
    assert!(!r.has_render("fade"));
    let a = solid([0, 255, 0, 255]);
    let b = solid([0, 0, 255, 255]);
    let mut dst = Surface::new(2, 2).unwrap();
    let rect = dst.bounds();
    r.render_transition("fade", &mut dst, &a, &b, 0.5, rect)
        .unwrap();
    assert_eq!(dst, a);
}

#[test]
fn registering_replaces_case_insensitively() {
    let mut r = TransitionRegistry::with_builtins();
    r.register_render("FADE", |dst: &mut Surface, _a: &Surface, b: &Surface, _t, rect| {
        dst.draw_surface(b, rect, 1.0);
    })
    .register_easing("Snap", |t| if t < 0.5 { 0.0 } else { 1.0 });
    assert_eq!(r.render_names().count(), 24);
    assert_eq!(r.ease(Some("snap"), 0.75), 1.0);

    let a = solid([255, 0, 0, 255]);
    let b = solid([0, 0, 255, 255]);
    let mut dst = Surface::new(2, 2).unwrap();
    let rect = dst.bounds();
    r.render_transition("fade", &mut dst, &a, &b, 0.0, rect)
        .unwrap();
    assert_eq!(dst, b);
}

#[test]
fn render_transition_checks_inputs() {
    let r = TransitionRegistry::with_builtins();
    let a = solid([255, 0, 0, 255]);
    let b = Surface::new(3, 3).unwrap();
    let mut dst = Surface::new(2, 2).unwrap();
    let rect = dst.bounds();
    assert!(matches!(
        r.render_transition("fade", &mut dst, &a, &b, 0.5, rect),
        Err(LanternError::Render(_))
    ));
    assert!(matches!(
        r.render_transition("fade", &mut dst, &a, &a, f64::NAN, rect),
        Err(LanternError::Validation(_))
    ));
}
