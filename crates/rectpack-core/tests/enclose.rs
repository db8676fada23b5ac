use rectpack_core::prelude::*;

fn squares(n: usize, side: u32, rotation: bool) -> Enclose {
    let mut en = Enclose::new().rotation(rotation);
    for _ in 0..n {
        en.add_rect(side, side);
    }
    en
}

fn assert_disjoint(found: &Enclosure) {
    let outer = Rect::new(0, 0, found.width, found.height);
    for (i, a) in found.placements.iter().enumerate() {
        assert!(outer.contains(&a.rect()), "{:?} outside", a.rect());
        for b in &found.placements[i + 1..] {
            assert!(!a.rect().intersects(&b.rect(), false));
        }
    }
}

#[test]
fn nothing_to_enclose() {
    let en = Enclose::new();
    assert!(en.is_empty());
    assert!(en.container_candidates().is_empty());
    assert!(en.generate().is_none());
}

#[test]
fn candidates_are_deduplicated_in_order() {
    let en = squares(4, 4, false);
    assert_eq!(
        en.container_candidates(),
        vec![(16, 16), (4, 16), (8, 16), (12, 16)]
    );
}

#[test]
fn first_minimal_candidate_wins() {
    let found = squares(4, 4, false).generate().expect("enclosure");
    assert_eq!((found.width, found.height), (16, 4));
    assert_eq!(found.area(), 64);
    assert_disjoint(&found);
    let mut rids: Vec<usize> = found.placements.iter().filter_map(|p| p.rid).collect();
    rids.sort();
    assert_eq!(rids, vec![0, 1, 2, 3]);
}

#[test]
fn width_limit_is_respected() {
    let found = squares(4, 4, false)
        .max_width(Some(8))
        .generate()
        .expect("enclosure");
    assert_eq!((found.width, found.height), (8, 8));
    assert_disjoint(&found);
}

#[test]
fn height_limit_is_respected() {
    let found = squares(4, 4, false)
        .max_height(Some(4))
        .generate()
        .expect("enclosure");
    assert_eq!((found.width, found.height), (16, 4));
}

#[test]
fn impossible_limits_give_nothing() {
    let en = squares(2, 4, false).max_width(Some(3));
    assert!(en.container_candidates().is_empty());
    assert!(en.generate().is_none());
    // Too little area under the height cap.
    let en = squares(4, 4, false).max_width(Some(8)).max_height(Some(4));
    assert!(en.generate().is_none());
}

#[test]
fn rotation_helps_mixed_shapes() {
    let mut en = Enclose::new();
    en.add_rect(2, 8);
    en.add_rect(8, 2);
    en.add_rect(6, 6);
    let found = en.generate().expect("enclosure");
    assert_disjoint(&found);
    let needed: u64 = 16 + 16 + 36;
    assert!(found.area() >= needed);
    assert_eq!(found.placements.len(), 3);
}

#[test]
fn random_sets_are_enclosed_without_overlap() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let mut en = Enclose::new();
        let n = rng.gen_range(5..=30);
        for _ in 0..n {
            en.add_rect(rng.gen_range(1..=40), rng.gen_range(1..=40));
        }
        let found = en.generate().expect("enclosure");
        assert_eq!(found.placements.len(), n);
        assert_disjoint(&found);
    }
}
