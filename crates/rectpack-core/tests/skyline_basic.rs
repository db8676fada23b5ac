use rectpack_core::prelude::*;

fn params(rotation: bool) -> SkylineParams {
    SkylineParams {
        heuristic: SkylineHeuristic::BottomLeft,
        waste_management: false,
        allow_rotation: rotation,
    }
}

#[test]
fn new_skyline_is_one_flat_segment() {
    let sky: Skyline<String> = Skyline::new(32, 16, params(true));
    assert_eq!(sky.skyline(), &[Segment::new(0, 0, 32)]);
    assert!(sky.is_empty());
}

#[test]
fn exact_fit_goes_to_origin() {
    let mut sky: Skyline<String> = Skyline::new(100, 100, params(true));
    let r = sky.add_rect(100, 100, Some("full".into())).expect("fits");
    assert_eq!((r.x, r.y, r.width, r.height), (0, 0, 100, 100));
    assert_eq!(r.rid.as_deref(), Some("full"));
    // Nothing else fits afterwards.
    assert!(sky.add_rect(1, 1, None).is_none());
    assert_eq!(sky.fitness(1, 1), None);
}

#[test]
fn degenerate_and_oversized_are_rejected() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(true));
    assert!(sky.add_rect(0, 5, None).is_none());
    assert!(sky.add_rect(5, 0, None).is_none());
    assert!(sky.add_rect(11, 5, None).is_none());
    assert_eq!(sky.fitness(11, 1), None);
    assert!(sky.is_empty());
}

#[test]
fn rotation_is_used_when_only_the_swap_fits() {
    let mut sky: Skyline<String> = Skyline::new(10, 5, params(true));
    assert!(sky.fits_surface(5, 10));
    let r = sky.add_rect(5, 10, None).expect("rotated fit");
    assert_eq!((r.width, r.height), (10, 5));

    let mut fixed: Skyline<String> = Skyline::new(10, 5, params(false));
    assert!(!fixed.fits_surface(5, 10));
    assert!(fixed.add_rect(5, 10, None).is_none());
}

#[test]
fn skyline_rises_over_placed_rects() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(false));
    sky.add_rect(3, 2, None).expect("first");
    assert_eq!(
        sky.skyline(),
        &[Segment::new(0, 2, 3), Segment::new(3, 0, 7)]
    );
    let r = sky.add_rect(7, 3, None).expect("second");
    assert_eq!((r.x, r.y), (3, 0));
    assert_eq!(
        sky.skyline(),
        &[Segment::new(0, 2, 3), Segment::new(3, 3, 7)]
    );
    // Same height next to each other merges into one segment.
    sky.add_rect(3, 1, None).expect("third");
    assert_eq!(sky.skyline(), &[Segment::new(0, 3, 10)]);
}

#[test]
fn reset_restores_an_empty_surface() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(true));
    sky.add_rect(4, 4, None).expect("fits");
    sky.add_rect(6, 2, None).expect("fits");
    sky.reset();
    assert!(sky.is_empty());
    assert_eq!(sky.skyline(), &[Segment::new(0, 0, 10)]);
    assert_eq!(sky.used_area(), 0);
}

#[test]
fn used_area_and_validation() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(true));
    sky.add_rect(4, 4, None).expect("fits");
    sky.add_rect(6, 2, None).expect("fits");
    assert_eq!(sky.len(), 2);
    assert_eq!(sky.used_area(), 28);
    sky.validate_packing(0).expect("valid");
}

#[test]
fn very_wide_surface_does_not_overflow() {
    let mut sky: Skyline<String> = Skyline::new(u32::MAX, 10, params(false));
    sky.add_rect(10, 5, None).expect("first");
    let r = sky.add_rect(u32::MAX - 5, 5, None).expect("wide");
    assert_eq!((r.x, r.y), (0, 5));
    sky.validate_packing(0).expect("valid");

    // The rotated orientation is taller than the surface once supported.
    let mut rot: Skyline<String> = Skyline::new(u32::MAX, 10, params(true));
    rot.add_rect(10, 5, None).expect("first");
    let r = rot.add_rect(u32::MAX, 1, None).expect("full width");
    assert_eq!((r.x, r.y, r.width, r.height), (0, 5, u32::MAX, 1));
    rot.validate_packing(0).expect("valid");
}
