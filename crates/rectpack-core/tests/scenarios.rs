use rectpack_core::prelude::*;

#[test]
fn full_bin_rect_lands_at_origin() {
    let mut packer: Packer<String> = Packer::new(PackerConfig::default()).expect("config");
    packer.add_bin(100, 100, 1);
    packer.add_rect(100, 100, Some("r".into()));
    packer.pack();
    let placed = packer.rect_list();
    assert_eq!(placed.len(), 1);
    assert_eq!(
        (placed[0].bin, placed[0].x, placed[0].y, placed[0].width, placed[0].height),
        (0, 0, 0, 100, 100)
    );
}

#[test]
fn three_rects_share_a_small_bin() {
    let cfg = PackerConfig::builder()
        .mode(PackingMode::Offline)
        .bin_selection(BinSelection::BestFit)
        .heuristic(SkylineHeuristic::BottomLeft)
        .sort_order(SortOrder::Area)
        .allow_rotation(false)
        .build();
    let mut packer: Packer<usize> = Packer::new(cfg).expect("config");
    packer.add_bin(10, 10, 1);
    for (i, (w, h)) in [(6, 4), (4, 6), (5, 5)].into_iter().enumerate() {
        packer.add_rect(w, h, Some(i));
    }
    packer.pack();
    packer.validate_packing().expect("valid");

    let placed = packer.rect_list();
    assert_eq!(placed.len(), 3);
    let stats = packer.stats();
    assert_eq!(stats.used_area, 73);
    assert!(stats.used_area <= stats.total_bin_area);

    let find = |rid: usize| {
        placed
            .iter()
            .find(|p| p.rid == Some(rid))
            .map(|p| (p.x, p.y))
            .expect("placed")
    };
    // Largest area first: 5×5, then the two 24-area rects in input order.
    assert_eq!(find(2), (0, 0));
    assert_eq!(find(0), (0, 5));
    assert_eq!(find(1), (6, 0));
}

#[test]
fn rect_larger_than_every_bin_is_dropped() {
    let cfg = PackerConfig::builder().mode(PackingMode::Online).build();
    let mut packer: Packer<String> = Packer::new(cfg).expect("config");
    packer.add_bin(10, 10, 1);
    let admission = packer.add_rect(11, 5, None);
    assert_eq!(admission, Admission::Rejected);
    assert!(packer.is_empty());
    assert!(packer.rect_list().is_empty());
    // The bin was never opened.
    assert_eq!(packer.unopened_bins(), 1);
}

#[test]
fn next_fit_runs_out_of_bins() {
    let cfg = PackerConfig::builder()
        .mode(PackingMode::Online)
        .bin_selection(BinSelection::NextFit)
        .build();
    let mut packer: Packer<usize> = Packer::new(cfg).expect("config");
    packer.add_bin(5, 5, 2);

    let a = packer.add_rect(5, 5, Some(0));
    let b = packer.add_rect(5, 5, Some(1));
    let c = packer.add_rect(5, 5, Some(2));
    assert_eq!(a.placement().map(|p| p.bin), Some(0));
    assert_eq!(b.placement().map(|p| p.bin), Some(1));
    assert_eq!(c, Admission::Rejected);
    assert_eq!(packer.len(), 2);
    assert_eq!(packer.rect_list().len(), 2);
}

#[test]
fn four_squares_enclose_tightly() {
    let mut en = Enclose::new().rotation(false);
    for _ in 0..4 {
        en.add_rect(4, 4);
    }
    let found = en.generate().expect("enclosure");
    assert!(found.area() <= 64);
    assert_eq!(found.placements.len(), 4);
}
