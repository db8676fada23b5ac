use rand::{Rng, SeedableRng};
use rectpack_core::prelude::*;

fn check(cfg: PackerConfig, seed: u64) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let rects: Vec<(u32, u32)> = (0..400)
        .map(|_| (rng.gen_range(1..=90), rng.gen_range(1..=90)))
        .collect();

    let rotation = cfg.allow_rotation;
    let online = cfg.mode == PackingMode::Online;
    let mut packer: Packer<usize> = Packer::new(cfg.clone()).expect("config");
    packer.add_bin(200, 150, 3);
    packer.add_bin(64, 64, 10);
    for (i, &(w, h)) in rects.iter().enumerate() {
        let admission = packer.add_rect(w, h, Some(i));
        if online {
            assert_ne!(admission, Admission::Queued);
        }
    }
    packer.pack();
    packer
        .validate_packing()
        .unwrap_or_else(|e| panic!("{cfg:?}: {e}"));

    let bins = packer.bin_list();
    let mut seen = vec![false; rects.len()];
    for p in packer.rect_list() {
        let i = p.rid.expect("rid");
        assert!(!seen[i], "rect {i} placed twice");
        seen[i] = true;
        let (w, h) = rects[i];
        let same = (p.width, p.height) == (w, h);
        let swapped = (p.width, p.height) == (h, w);
        assert!(same || (rotation && swapped), "{cfg:?}: size of rect {i} changed");
        let (bw, bh) = bins[p.bin];
        assert!(p.x + p.width <= bw && p.y + p.height <= bh);
    }

    let stats = packer.stats();
    assert!(stats.used_area <= stats.total_bin_area);
    assert!(stats.num_bins <= 13);
}

#[test]
fn every_configuration_packs_without_overlap() {
    let mut seed = 1u64;
    for mode in [PackingMode::Online, PackingMode::Offline] {
        for selection in [
            BinSelection::NextFit,
            BinSelection::FirstFit,
            BinSelection::BestFit,
            BinSelection::GlobalBestFit,
        ] {
            if mode == PackingMode::Online && selection == BinSelection::GlobalBestFit {
                continue;
            }
            for heuristic in [
                SkylineHeuristic::BottomLeft,
                SkylineHeuristic::MinWaste,
                SkylineHeuristic::MinWasteLowProfile,
            ] {
                for waste in [false, true] {
                    for rotation in [false, true] {
                        let cfg = PackerConfig::builder()
                            .mode(mode)
                            .bin_selection(selection)
                            .heuristic(heuristic)
                            .waste_management(waste)
                            .allow_rotation(rotation)
                            .build();
                        check(cfg, seed);
                        seed += 1;
                    }
                }
            }
        }
    }
}

#[test]
fn skyline_segments_tile_the_bin() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0FFEE);
    for heuristic in [
        SkylineHeuristic::BottomLeft,
        SkylineHeuristic::MinWaste,
        SkylineHeuristic::MinWasteLowProfile,
    ] {
        let mut sky: Skyline<usize> = Skyline::new(
            300,
            300,
            SkylineParams {
                heuristic,
                waste_management: true,
                allow_rotation: true,
            },
        );
        for i in 0..300 {
            let (w, h) = (rng.gen_range(1..=60), rng.gen_range(1..=60));
            sky.add_rect(w, h, Some(i));

            let segs = sky.skyline();
            assert_eq!(segs[0].left(), 0);
            assert_eq!(segs[segs.len() - 1].right(), 300);
            for pair in segs.windows(2) {
                assert_eq!(pair[0].right(), pair[1].left());
                assert_ne!(pair[0].top(), pair[1].top());
            }
            assert!(segs.iter().all(|s| s.len > 0 && s.top() <= 300));
        }
        sky.validate_packing(0).expect("valid");
    }
}
