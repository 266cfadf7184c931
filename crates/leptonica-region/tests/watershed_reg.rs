//! Watershed segmentation regression test
//!
//! Port of the DoWatershed() flow: two 500x500 synthetic 8 bpp surfaces
//! built from sums of sines and cosines are run through extrema detection,
//! seed selection, flooding, basin extraction and rendering. A pair of
//! hand-built surfaces checks the exact boundary placement.
//!
//! # See also
//!
//! C Leptonica: `reference/leptonica/prog/watershed_reg.c`
//!
//! Run with:
//! ```
//! cargo test -p leptonica-region --test watershed_reg
//! ```

use leptonica_core::{InitColor, Pix, PixelDepth};
use leptonica_region::{
    ConnectivityType, ExtremaOptions, RegionError, Watershed, WatershedOptions, WatershedState,
    find_extrema, render_colors, render_fill, seeds_to_mask, select_min_in_components,
    watershed_segmentation,
};
use leptonica_test::RegParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn flag(cond: bool) -> f64 {
    if cond { 1.0 } else { 0.0 }
}

/// Create one of the two synthetic test surfaces.
fn create_synthetic_image(variant: u32) -> Pix {
    let size = 500u32;
    let pix = Pix::new(size, size, PixelDepth::Bit8).unwrap();
    let mut pix_mut = pix.try_into_mut().unwrap();

    for i in 0..size {
        for j in 0..size {
            let fi = i as f32;
            let fj = j as f32;
            let f = if variant == 0 {
                128.0
                    + 26.3 * (0.0438 * fi).sin()
                    + 33.4 * (0.0712 * fi).cos()
                    + 18.6 * (0.0561 * fj).sin()
                    + 23.6 * (0.0327 * fj).cos()
            } else {
                128.0
                    + 26.3 * (0.0238 * fi).sin()
                    + 33.4 * (0.0312 * fi).cos()
                    + 18.6 * (0.0261 * fj).sin()
                    + 23.6 * (0.0207 * fj).cos()
            };
            pix_mut.set_pixel(j, i, f as u32).unwrap();
        }
    }

    pix_mut.into()
}

/// Check the partition and monotonic-flood properties of a finished flood.
fn check_flood_invariants(rp: &mut RegParams, ws: &Watershed, connectivity: ConnectivityType) {
    let surface = ws.surface();
    let labels = ws.label_map().unwrap();
    let levels = ws.level_map().unwrap();
    let boundary = ws.boundary_mask().unwrap();
    let w = surface.width();
    let h = surface.height();

    let mut overlap = 0u32;
    let mut touching = 0u32;
    let mut non_monotonic = 0u32;
    for y in 0..h {
        for x in 0..w {
            let label = labels.get_pixel(x, y).unwrap();
            let is_boundary = boundary.get_pixel(x, y).unwrap() != 0;
            if label != 0 && is_boundary {
                overlap += 1;
            }
            if label == 0 {
                continue;
            }

            let level = levels.get_pixel(x, y).unwrap();
            if level < surface.get_pixel(x, y).unwrap() {
                non_monotonic += 1;
            }

            // Every labelled pixel other than a seed was reached from a
            // same-label neighbour at a level no higher than its own
            let is_seed = ws.seeds().iter().any(|s| s.x == x && s.y == y);
            let mut has_parent = is_seed;
            for (nx, ny) in connectivity.neighbors(x, y, w, h) {
                let other = labels.get_pixel(nx, ny).unwrap();
                if other != 0 && other != label {
                    touching += 1;
                }
                if other == label && levels.get_pixel(nx, ny).unwrap() <= level {
                    has_parent = true;
                }
            }
            if !has_parent {
                non_monotonic += 1;
            }
        }
    }

    rp.compare_values(0.0, overlap as f64, 0.0);
    rp.compare_values(0.0, touching as f64, 0.0);
    rp.compare_values(0.0, non_monotonic as f64, 0.0);
}

/// Core watershed flow on one surface.
fn do_watershed(rp: &mut RegParams, pixs: &Pix) {
    let w = pixs.width();
    let h = pixs.height();
    rp.compare_values(500.0, w as f64, 0.0);
    rp.compare_values(500.0, h as f64, 0.0);

    // Local extrema
    let (min_mask, max_mask) = find_extrema(pixs, &ExtremaOptions::default()).unwrap();
    eprintln!(
        "  Local minima pixels: {}, local maxima pixels: {}",
        min_mask.count_nonzero(),
        max_mask.count_nonzero()
    );
    rp.compare_values(1.0, flag(min_mask.count_nonzero() > 0), 0.0);
    rp.compare_values(1.0, flag(max_mask.count_nonzero() > 0), 0.0);

    // Clearing a 2 pixel frame of a mask changes nothing: border plateaus
    // are never extrema
    let mut framed = min_mask.to_mut();
    framed.set_or_clear_border(2, 2, 2, 2, InitColor::Black);
    let framed: Pix = framed.into();
    rp.compare_pix(&min_mask, &framed);

    // Seeds at the lowest pixel of each minimum component
    let seeds = select_min_in_components(pixs, &min_mask, ConnectivityType::EightWay).unwrap();
    eprintln!("  Seeds: {}", seeds.len());
    rp.compare_values(1.0, flag(seeds.len() > 1), 0.0);

    // Seeds lie inside the mask
    let seed_mask = seeds_to_mask(&seeds, w, h).unwrap();
    let inside = seeds
        .iter()
        .all(|s| min_mask.get_pixel(s.x, s.y) == Some(1));
    rp.compare_values(1.0, flag(inside), 0.0);
    rp.compare_values(seeds.len() as f64, seed_mask.count_nonzero() as f64, 0.0);

    // Flood from the seeds
    let options = WatershedOptions::new().with_connectivity(ConnectivityType::EightWay);
    let mut ws = Watershed::new(pixs, &seeds, &options).unwrap();
    ws.apply().unwrap();
    rp.compare_values(1.0, flag(ws.state() == WatershedState::Done), 0.0);

    let labels = ws.label_map().unwrap();
    rp.compare_values(w as f64, labels.width() as f64, 0.0);
    rp.compare_values(h as f64, labels.height() as f64, 0.0);
    rp.compare_values(32.0, labels.depth().bits() as f64, 0.0);

    let basin_count = ws.basin_count().unwrap();
    let boundary_count = ws.boundary_count().unwrap();
    eprintln!(
        "  Basins: {}, boundary pixels: {}",
        basin_count, boundary_count
    );
    rp.compare_values(seeds.len() as f64, basin_count as f64, 0.0);
    let total = (w as u64) * (h as u64);
    rp.compare_values(1.0, flag(boundary_count > 0 && boundary_count < total), 0.0);

    // With no level cap every pixel is either in a basin or on a boundary
    let claimed = labels.count_nonzero() + boundary_count;
    rp.compare_values(total as f64, claimed as f64, 0.0);

    check_flood_invariants(rp, &ws, ConnectivityType::EightWay);

    // Basins and levels
    let (pixa, levels) = ws.basins().unwrap();
    rp.compare_values(basin_count as f64, pixa.len() as f64, 0.0);
    rp.compare_values(basin_count as f64, levels.len() as f64, 0.0);
    let top_level = levels.max().map_or(0.0, |(v, _)| v);
    rp.compare_values(1.0, flag(top_level > 0.0 && top_level <= 255.0), 0.0);
    let basin_area: u64 = pixa.iter().map(|p| p.count_nonzero()).sum();
    rp.compare_values(labels.count_nonzero() as f64, basin_area as f64, 0.0);

    // Labels run 1..=n in seed order, so basin i contains seed i
    let seeds_boxed = seeds.iter().enumerate().all(|(i, s)| {
        pixa.get_box(i)
            .is_some_and(|b| b.contains_point(s.x as i32, s.y as i32))
    });
    rp.compare_values(1.0, flag(seeds_boxed), 0.0);

    // Renderings
    let fill = render_fill(&ws).unwrap();
    rp.compare_values(8.0, fill.depth().bits() as f64, 0.0);
    let colors = render_colors(&ws, 1).unwrap();
    rp.compare_values(1.0, flag(colors.has_colormap()), 0.0);
    let colors_again = render_colors(&ws, 1).unwrap();
    rp.compare_pix(&colors, &colors_again);
}

#[test]
fn watershed_reg_synthetic() {
    let mut rp = RegParams::new("watershed");

    eprintln!("=== Synthetic image 1 ===");
    let pix1 = create_synthetic_image(0);
    do_watershed(&mut rp, &pix1);

    eprintln!("=== Synthetic image 2 ===");
    let pix2 = create_synthetic_image(1);
    do_watershed(&mut rp, &pix2);

    assert!(rp.cleanup(), "watershed regression test failed");
}

#[test]
fn watershed_reg_depth_filter() {
    let mut rp = RegParams::new("watershed_depth");

    let pixs = create_synthetic_image(0);
    let mut previous = usize::MAX;
    for min_depth in [0, 10, 30, 60] {
        let options = WatershedOptions::new().with_min_depth(min_depth);
        let ws = watershed_segmentation(&pixs, &options).unwrap();
        let count = ws.basin_count().unwrap();
        eprintln!("  min_depth {}: {} basins", min_depth, count);
        rp.compare_values(1.0, flag(count >= 1 && count <= previous), 0.0);
        previous = count;
    }

    assert!(rp.cleanup(), "watershed depth filter test failed");
}

#[test]
fn watershed_reg_two_bowls() {
    let mut rp = RegParams::new("watershed_two_bowls");

    // Two L1 bowls centred at (10, 10) and (30, 10), ridge along x = 20
    let (w, h) = (41u32, 21u32);
    let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
    for y in 0..h {
        for x in 0..w {
            let d1 = x.abs_diff(10) + y.abs_diff(10);
            let d2 = x.abs_diff(30) + y.abs_diff(10);
            pm.set_pixel(x, y, 4 * d1.min(d2)).unwrap();
        }
    }
    let pixs: Pix = pm.into();

    let options = WatershedOptions::new().with_connectivity(ConnectivityType::FourWay);
    let ws = watershed_segmentation(&pixs, &options).unwrap();
    rp.compare_values(2.0, ws.basin_count().unwrap() as f64, 0.0);

    let labels = ws.label_map().unwrap();
    let boundary = ws.boundary_mask().unwrap();
    rp.compare_values(h as f64, ws.boundary_count().unwrap() as f64, 0.0);
    let on_crest = (0..h).all(|y| boundary.get_pixel(20, y) == Some(1));
    rp.compare_values(1.0, flag(on_crest), 0.0);

    let mut left_ok = true;
    let mut right_ok = true;
    for y in 0..h {
        for x in 0..20 {
            left_ok &= labels.get_pixel(x, y) == Some(1);
            right_ok &= labels.get_pixel(40 - x, y) == Some(2);
        }
    }
    rp.compare_values(1.0, flag(left_ok), 0.0);
    rp.compare_values(1.0, flag(right_ok), 0.0);

    check_flood_invariants(&mut rp, &ws, ConnectivityType::FourWay);

    let levels = ws.final_levels().unwrap();
    rp.compare_values(80.0, levels.get(0).unwrap() as f64, 0.0);
    rp.compare_values(80.0, levels.get(1).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "two bowl test failed");
}

#[test]
fn watershed_reg_plateau_coverage() {
    let mut rp = RegParams::new("watershed_plateau");

    // Noisy 24x24 surfaces with values 0..=8 are full of plateaus, and
    // 4-way boundaries there often wall off pockets of unclaimed pixels
    let (w, h) = (24u32, 24u32);
    let total = u64::from(w * h);
    let options = WatershedOptions::new().with_connectivity(ConnectivityType::FourWay);
    let mut rng = StdRng::seed_from_u64(24);
    let mut flooded = 0u32;
    for _ in 0..50 {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel(x, y, rng.random_range(0..=8)).unwrap();
            }
        }
        let pixs: Pix = pm.into();

        let ws = watershed_segmentation(&pixs, &options).unwrap();
        if ws.basin_count().unwrap() == 0 {
            continue;
        }
        flooded += 1;
        let claimed = ws.label_map().unwrap().count_nonzero() + ws.boundary_count().unwrap();
        rp.compare_values(total as f64, claimed as f64, 0.0);
        rp.compare_values(
            ws.boundary_count().unwrap() as f64,
            ws.boundary_mask().unwrap().count_nonzero() as f64,
            0.0,
        );
        check_flood_invariants(&mut rp, &ws, ConnectivityType::FourWay);
    }
    eprintln!("  Flooded surfaces: {}", flooded);
    rp.compare_values(1.0, flag(flooded > 0), 0.0);

    assert!(rp.cleanup(), "watershed plateau coverage test failed");
}

#[test]
fn watershed_reg_determinism() {
    let mut rp = RegParams::new("watershed_determinism");

    let pixs = create_synthetic_image(1);
    let options = WatershedOptions::new().with_min_depth(10);
    let ws1 = watershed_segmentation(&pixs, &options).unwrap();
    let ws2 = watershed_segmentation(&pixs, &options).unwrap();

    rp.compare_pix(ws1.label_map().unwrap(), ws2.label_map().unwrap());
    rp.compare_pix(ws1.boundary_mask().unwrap(), ws2.boundary_mask().unwrap());
    rp.compare_pix(ws1.level_map().unwrap(), ws2.level_map().unwrap());
    let same_levels =
        ws1.final_levels().unwrap().as_slice() == ws2.final_levels().unwrap().as_slice();
    rp.compare_values(1.0, flag(same_levels), 0.0);

    // The surface is never modified by flooding
    rp.compare_pix(&pixs, ws1.surface());

    assert!(rp.cleanup(), "watershed determinism test failed");
}

#[test]
fn watershed_reg_max_level() {
    let mut rp = RegParams::new("watershed_max_level");

    let pixs = create_synthetic_image(0);
    let cap = 120;
    let options = WatershedOptions::new().with_max_level(cap);
    let ws = watershed_segmentation(&pixs, &options).unwrap();

    let labels = ws.label_map().unwrap();
    let levels = ws.level_map().unwrap();
    let boundary = ws.boundary_mask().unwrap();
    let mut above_cap = 0u32;
    let mut unflooded = 0u32;
    for y in 0..pixs.height() {
        for x in 0..pixs.width() {
            let label = labels.get_pixel(x, y).unwrap();
            if label == 0 {
                if boundary.get_pixel(x, y) == Some(0) {
                    unflooded += 1;
                }
                continue;
            }
            let is_seed = ws.seeds().iter().any(|s| s.x == x && s.y == y);
            if !is_seed && levels.get_pixel(x, y).unwrap() > cap as u32 {
                above_cap += 1;
            }
        }
    }
    eprintln!("  Unflooded pixels with max_level {}: {}", cap, unflooded);
    rp.compare_values(0.0, above_cap as f64, 0.0);
    rp.compare_values(1.0, flag(unflooded > 0), 0.0);

    assert!(rp.cleanup(), "watershed max level test failed");
}

#[test]
fn watershed_reg_errors() {
    let mut rp = RegParams::new("watershed_errors");

    let options = WatershedOptions::default();
    for depth in [PixelDepth::Bit1, PixelDepth::Bit32] {
        let pix = Pix::new(10, 10, depth).unwrap();
        let result = watershed_segmentation(&pix, &options);
        rp.compare_values(
            1.0,
            flag(matches!(result, Err(RegionError::InvalidSurface(_)))),
            0.0,
        );
    }

    let pix8 = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
    let result = watershed_segmentation(&pix8, &WatershedOptions::new().with_max_level(-5));
    rp.compare_values(
        1.0,
        flag(matches!(result, Err(RegionError::InvalidParameters(_)))),
        0.0,
    );

    // A flat surface has no minima: no basins, nothing flooded
    let ws = watershed_segmentation(&pix8, &options).unwrap();
    rp.compare_values(0.0, ws.basin_count().unwrap() as f64, 0.0);
    rp.compare_values(0.0, ws.label_map().unwrap().count_nonzero() as f64, 0.0);

    assert!(rp.cleanup(), "watershed error handling test failed");
}
