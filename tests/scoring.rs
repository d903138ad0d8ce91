// Additional integration tests for scoring and placement invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use pin_the_dot::round::{
    Bounds, DIRECT_HIT_SCORE, MAX_NEAR_SCORE, NEAR_RADIUS_FACTOR, Point, Round, TARGET_HEIGHT,
    TARGET_WIDTH, score_click, target_center,
};

#[test]
fn placement_box_always_inside_bounds() {
    let bounds_set = [
        Bounds {
            width: 400.0,
            height: 400.0,
        },
        Bounds {
            width: 150.0,
            height: 225.0,
        },
        Bounds {
            width: 1920.0,
            height: 1080.0,
        },
    ];
    let samples = [0.0, 0.1, 0.33, 0.5, 0.77, 0.999, 1.0];
    for bounds in bounds_set {
        for &rx in &samples {
            for &ry in &samples {
                let t = Round::start(bounds, rx, ry).target();
                assert!(
                    t.x >= 0.0 && t.x + TARGET_WIDTH <= bounds.width,
                    "x placement {t:?} escapes {bounds:?} for rx={rx}"
                );
                assert!(
                    t.y >= 0.0 && t.y + TARGET_HEIGHT <= bounds.height,
                    "y placement {t:?} escapes {bounds:?} for ry={ry}"
                );
            }
        }
    }
}

// Reference scenario: 150x225 box at (100, 100), center (175, 212.5),
// near-miss radius 1.5 * 225 = 337.5.
const TARGET: Point = Point { x: 100.0, y: 100.0 };

#[test]
fn direct_hit_anywhere_inside_the_box() {
    for click in [
        Point { x: 120.0, y: 150.0 },
        Point { x: 100.0, y: 100.0 },
        Point { x: 250.0, y: 100.0 },
        Point { x: 175.0, y: 212.5 },
        Point { x: 250.0, y: 325.0 },
    ] {
        assert_eq!(score_click(TARGET, click), DIRECT_HIT_SCORE, "at {click:?}");
    }
}

#[test]
fn near_miss_matches_linear_decay_formula() {
    let center = target_center(TARGET);
    let radius = TARGET_WIDTH.max(TARGET_HEIGHT) * NEAR_RADIUS_FACTOR;
    // Probe straight up from the center at a spread of distances; every
    // probe past the top edge is outside the box.
    for d in [115.0, 150.0, 168.75, 200.0, 300.0, 337.0] {
        let click = Point {
            x: center.x,
            y: center.y - d,
        };
        let expected = (MAX_NEAR_SCORE as f64 * (1.0 - d / radius)).floor() as u32;
        assert_eq!(score_click(TARGET, click), expected, "at distance {d}");
        assert!(expected < DIRECT_HIT_SCORE);
    }
}

#[test]
fn at_or_beyond_radius_scores_zero() {
    let center = target_center(TARGET);
    let radius = TARGET_WIDTH.max(TARGET_HEIGHT) * NEAR_RADIUS_FACTOR;
    for d in [radius, radius + 1.0, radius * 3.0] {
        let click = Point {
            x: center.x,
            y: center.y - d,
        };
        assert_eq!(score_click(TARGET, click), 0, "at distance {d}");
    }
}
