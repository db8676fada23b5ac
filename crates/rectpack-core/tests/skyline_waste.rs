use rectpack_core::prelude::*;

fn params(waste_management: bool) -> SkylineParams {
    SkylineParams {
        heuristic: SkylineHeuristic::BottomLeft,
        waste_management,
        allow_rotation: false,
    }
}

#[test]
fn space_below_a_bridge_is_reused() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(true));
    sky.add_rect(3, 5, None).expect("pillar");
    let bridge = sky.add_rect(10, 2, None).expect("bridge");
    assert_eq!((bridge.x, bridge.y), (0, 5));
    assert_eq!(sky.skyline(), &[Segment::new(0, 7, 10)]);
    assert_eq!(sky.waste().sections(), &[Rect::new(3, 0, 7, 5)]);

    // Anything that fits the waste is a free placement.
    assert_eq!(sky.fitness(7, 5), Some(0));
    let r = sky.add_rect(7, 5, Some("under".into())).expect("in waste");
    assert_eq!((r.x, r.y, r.width, r.height), (3, 0, 7, 5));
    assert_eq!(sky.skyline(), &[Segment::new(0, 7, 10)]);
    assert!(sky.waste().sections().is_empty());
    assert_eq!(sky.len(), 3);
    sky.validate_packing(0).expect("valid");
}

#[test]
fn without_waste_management_the_gap_is_lost() {
    let mut sky: Skyline<String> = Skyline::new(10, 10, params(false));
    sky.add_rect(3, 5, None).expect("pillar");
    sky.add_rect(10, 2, None).expect("bridge");
    assert!(sky.waste().sections().is_empty());
    assert!(sky.add_rect(7, 5, None).is_none());
}

#[test]
fn waste_sections_stay_free_and_inside() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xDEADBEEF);
    let rects: Vec<(u32, u32)> = (0..600)
        .map(|_| (rng.gen_range(4..=64), rng.gen_range(4..=64)))
        .collect();

    let mut sky: Skyline<usize> = Skyline::new(512, 512, params(true));
    let surface = Rect::new(0, 0, 512, 512);
    for (i, &(w, h)) in rects.iter().enumerate() {
        sky.add_rect(w, h, Some(i));
        for s in sky.waste().sections() {
            assert!(surface.contains(s), "section {s:?} outside the bin");
            for r in sky.rectangles() {
                assert!(
                    !s.intersects(&r.rect(), false),
                    "section {s:?} overlaps {:?}",
                    r.rect()
                );
            }
        }
    }
    sky.validate_packing(0).expect("valid");
    assert!(sky.len() > 0);
}
