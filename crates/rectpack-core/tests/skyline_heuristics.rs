use rectpack_core::prelude::*;

// Builds the skyline [0,3)@2 [3,10)@3 in a 10×10 bin.
fn stepped(heuristic: SkylineHeuristic) -> Skyline<String> {
    let mut sky = Skyline::new(
        10,
        10,
        SkylineParams {
            heuristic,
            waste_management: false,
            allow_rotation: false,
        },
    );
    sky.add_rect(3, 2, None).expect("first");
    sky.add_rect(7, 3, None).expect("second");
    assert_eq!(
        sky.skyline(),
        &[Segment::new(0, 2, 3), Segment::new(3, 3, 7)]
    );
    sky
}

#[test]
fn bottom_left_takes_leftmost_of_equal_tops() {
    let mut sky = stepped(SkylineHeuristic::BottomLeft);
    assert_eq!(sky.fitness(5, 1), Some(4));
    let r = sky.add_rect(5, 1, None).expect("fits");
    assert_eq!((r.x, r.y), (0, 3));
}

#[test]
fn min_waste_avoids_trapping_space() {
    let mut sky = stepped(SkylineHeuristic::MinWaste);
    assert_eq!(sky.fitness(5, 1), Some(0));
    let r = sky.add_rect(5, 1, None).expect("fits");
    assert_eq!((r.x, r.y), (3, 3));
}

#[test]
fn low_profile_breaks_waste_ties_by_height() {
    let mut sky = stepped(SkylineHeuristic::MinWasteLowProfile);
    // No waste at x=3, top edge at 4.
    assert_eq!(sky.fitness(5, 1), Some(4));
    let r = sky.add_rect(5, 1, None).expect("fits");
    assert_eq!((r.x, r.y), (3, 3));
}

#[test]
fn heuristics_agree_on_an_empty_bin() {
    for h in [
        SkylineHeuristic::BottomLeft,
        SkylineHeuristic::MinWaste,
        SkylineHeuristic::MinWasteLowProfile,
    ] {
        let mut sky: Skyline<String> = Skyline::new(
            20,
            20,
            SkylineParams {
                heuristic: h,
                waste_management: false,
                allow_rotation: true,
            },
        );
        let r = sky.add_rect(7, 5, None).expect("fits");
        assert_eq!((r.x, r.y), (0, 0), "{h:?}");
    }
}
