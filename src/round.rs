//! Round Controller: pure logic for one "Pin the Dot" round.
//!
//! A round places a target box at a random spot on the canvas, hides it
//! behind a cover for a short delay, then reveals it and counts down. The
//! player gets exactly one scoring click; after that (or after the clock
//! runs out) the round is resolved and ignores all further input until the
//! host starts a new one.
//!
//! This module is deliberately free of wasm / browser APIs so it runs under
//! native `cargo test`. The canvas host (`game`) owns the actual timers and
//! feeds `reveal` / `on_tick` / `on_pointer_click` into the state machine.

/// Target bounding box, in canvas pixels.
pub const TARGET_WIDTH: f64 = 150.0;
pub const TARGET_HEIGHT: f64 = 225.0;

/// Countdown length once the target is revealed, in one-second ticks.
pub const ROUND_SECONDS: u32 = 5;
/// How long the cover stays up before the target is revealed.
pub const CONCEAL_MS: f64 = 1200.0;
/// Lifetime of the floating "+N" acknowledgment (presentation only).
pub const POPUP_MS: f64 = 1200.0;

/// A click inside the target box scores this much.
pub const DIRECT_HIT_SCORE: u32 = 10;
/// Best possible near-miss score, decaying linearly with distance.
pub const MAX_NEAR_SCORE: u32 = 8;
/// Near-miss radius as a multiple of the target's largest dimension.
pub const NEAR_RADIUS_FACTOR: f64 = 1.5;

/// Canvas-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Playable canvas size as supplied by the view host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Lifecycle of a round. Transitions only move forward; a new round
/// replaces the whole `Round` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Target chosen but still behind the cover; input is ignored.
    Concealed,
    /// Target revealed, countdown running, one click accepted.
    Active,
    /// Terminal: scored or timed out, awaiting a new round.
    Resolved,
}

/// The score awarded for the round's single accepted click (0..=10).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreResult {
    pub points: u32,
}

/// Outcome of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; carries the seconds left.
    Running(u32),
    /// Clock hit zero with no click: round resolved with score 0.
    Expired,
    /// Tick arrived outside the Active phase (stale timer, already resolved).
    Ignored,
}

/// One play round: target placement, countdown, and the at-most-one
/// accepted click.
#[derive(Clone, Debug)]
pub struct Round {
    target: Point,
    remaining: u32,
    phase: Phase,
    click: Option<Point>,
}

impl Round {
    /// Start a fresh round. `rx` / `ry` are unit-interval random samples
    /// supplied by the host; the target is placed so its full bounding box
    /// lies within `bounds`. Bounds too small to contain the box clamp the
    /// placement span to zero rather than overflowing.
    pub fn start(bounds: Bounds, rx: f64, ry: f64) -> Self {
        let span_x = (bounds.width - TARGET_WIDTH).max(0.0);
        let span_y = (bounds.height - TARGET_HEIGHT).max(0.0);
        Round {
            target: Point {
                x: rx.clamp(0.0, 1.0) * span_x,
                y: ry.clamp(0.0, 1.0) * span_y,
            },
            remaining: ROUND_SECONDS,
            phase: Phase::Concealed,
            click: None,
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The single click this round accepted, if any.
    pub fn accepted_click(&self) -> Option<Point> {
        self.click
    }

    /// Lift the cover: Concealed -> Active. No-op in any other phase, so a
    /// stale conceal timeout cannot revive a resolved round.
    pub fn reveal(&mut self) {
        if self.phase == Phase::Concealed {
            self.phase = Phase::Active;
        }
    }

    /// Handle a pointer click in canvas-local coordinates. Only the first
    /// click during the Active phase scores; everything else is a no-op.
    /// The phase check up front is what makes double-scoring impossible
    /// regardless of click/tick delivery order.
    pub fn on_pointer_click(&mut self, click: Point) -> Option<ScoreResult> {
        if self.phase != Phase::Active {
            return None;
        }
        self.phase = Phase::Resolved;
        self.click = Some(click);
        Some(ScoreResult {
            points: score_click(self.target, click),
        })
    }

    /// Advance the countdown by one second. Reaching zero resolves the
    /// round with no score.
    pub fn on_tick(&mut self) -> Tick {
        if self.phase != Phase::Active {
            return Tick::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = Phase::Resolved;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

/// Center of the target's bounding box: the near-miss reference point.
pub fn target_center(target: Point) -> Point {
    Point {
        x: target.x + TARGET_WIDTH / 2.0,
        y: target.y + TARGET_HEIGHT / 2.0,
    }
}

/// Score a click against a target placed at `target` (box origin).
///
/// Inside the box (edges inclusive) is a direct hit worth 10. Outside it,
/// partial credit decays linearly with Euclidean distance from the box
/// center, reaching zero at 1.5x the box's largest dimension:
/// `floor(8 * (1 - d / r))` for `d < r`, else 0.
pub fn score_click(target: Point, click: Point) -> u32 {
    let direct_hit = click.x >= target.x
        && click.x <= target.x + TARGET_WIDTH
        && click.y >= target.y
        && click.y <= target.y + TARGET_HEIGHT;
    if direct_hit {
        return DIRECT_HIT_SCORE;
    }
    let center = target_center(target);
    let distance = ((click.x - center.x).powi(2) + (click.y - center.y).powi(2)).sqrt();
    let radius = TARGET_WIDTH.max(TARGET_HEIGHT) * NEAR_RADIUS_FACTOR;
    if distance < radius {
        (MAX_NEAR_SCORE as f64 * (1.0 - distance / radius)).floor() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn active_round(rx: f64, ry: f64) -> Round {
        let mut r = Round::start(BOUNDS, rx, ry);
        r.reveal();
        r
    }

    #[test]
    fn placement_stays_within_bounds() {
        for &(rx, ry) in &[(0.0, 0.0), (0.5, 0.25), (0.999, 0.999), (1.0, 1.0)] {
            let r = Round::start(BOUNDS, rx, ry);
            let t = r.target();
            assert!(t.x >= 0.0 && t.x + TARGET_WIDTH <= BOUNDS.width, "x out of bounds for rx={rx}");
            assert!(t.y >= 0.0 && t.y + TARGET_HEIGHT <= BOUNDS.height, "y out of bounds for ry={ry}");
        }
    }

    #[test]
    fn degenerate_bounds_clamp_to_origin() {
        let tiny = Bounds {
            width: 100.0,
            height: 100.0,
        };
        let r = Round::start(tiny, 0.9, 0.9);
        assert_eq!(r.target(), Point { x: 0.0, y: 0.0 });
    }

    #[test]
    fn starts_concealed_with_full_countdown() {
        let r = Round::start(BOUNDS, 0.5, 0.5);
        assert_eq!(r.phase(), Phase::Concealed);
        assert_eq!(r.remaining(), ROUND_SECONDS);
        assert!(r.accepted_click().is_none());
    }

    #[test]
    fn click_while_concealed_is_ignored() {
        let mut r = Round::start(BOUNDS, 0.5, 0.5);
        let t = r.target();
        assert_eq!(r.on_pointer_click(Point { x: t.x + 1.0, y: t.y + 1.0 }), None);
        assert_eq!(r.phase(), Phase::Concealed);
    }

    #[test]
    fn reveal_only_transitions_from_concealed() {
        let mut r = active_round(0.5, 0.5);
        let t = r.target();
        r.on_pointer_click(Point { x: t.x, y: t.y });
        assert_eq!(r.phase(), Phase::Resolved);
        r.reveal();
        assert_eq!(r.phase(), Phase::Resolved);
    }

    #[test]
    fn direct_hit_scores_ten() {
        let mut r = active_round(0.0, 0.0);
        let t = r.target();
        let inside = Point {
            x: t.x + 20.0,
            y: t.y + 50.0,
        };
        assert_eq!(r.on_pointer_click(inside), Some(ScoreResult { points: 10 }));
        assert_eq!(r.phase(), Phase::Resolved);
        assert_eq!(r.accepted_click(), Some(inside));
    }

    #[test]
    fn second_click_is_ignored() {
        let mut r = active_round(0.0, 0.0);
        let t = r.target();
        let inside = Point {
            x: t.x + 20.0,
            y: t.y + 50.0,
        };
        assert!(r.on_pointer_click(inside).is_some());
        assert_eq!(r.on_pointer_click(inside), None);
        assert_eq!(r.on_pointer_click(Point { x: 0.0, y: 0.0 }), None);
    }

    #[test]
    fn tick_counts_down_and_expires_with_zero_score() {
        let mut r = active_round(0.5, 0.5);
        for left in (1..ROUND_SECONDS).rev() {
            assert_eq!(r.on_tick(), Tick::Running(left));
        }
        assert_eq!(r.on_tick(), Tick::Expired);
        assert_eq!(r.phase(), Phase::Resolved);
        // No click ever accepted, and late input stays ignored.
        assert!(r.accepted_click().is_none());
        assert_eq!(r.on_pointer_click(Point { x: 1.0, y: 1.0 }), None);
    }

    #[test]
    fn stale_tick_after_resolution_is_ignored() {
        let mut r = active_round(0.5, 0.5);
        let t = r.target();
        r.on_pointer_click(Point { x: t.x + 1.0, y: t.y + 1.0 });
        assert_eq!(r.on_tick(), Tick::Ignored);
        assert_eq!(r.remaining(), ROUND_SECONDS);
    }

    #[test]
    fn tick_while_concealed_is_ignored() {
        let mut r = Round::start(BOUNDS, 0.5, 0.5);
        assert_eq!(r.on_tick(), Tick::Ignored);
        assert_eq!(r.remaining(), ROUND_SECONDS);
    }

    // Scoring against the reference scenario: box 150x225 at (100, 100),
    // center (175, 212.5), near-miss radius 1.5 * 225 = 337.5.
    const TARGET: Point = Point { x: 100.0, y: 100.0 };

    #[test]
    fn scoring_inside_box_is_a_direct_hit() {
        assert_eq!(score_click(TARGET, Point { x: 120.0, y: 150.0 }), 10);
        // Edges are inclusive.
        assert_eq!(score_click(TARGET, Point { x: 100.0, y: 100.0 }), 10);
        assert_eq!(score_click(TARGET, Point { x: 250.0, y: 325.0 }), 10);
    }

    #[test]
    fn scoring_beyond_radius_is_zero() {
        // Straight up from the center, well past 337.5px.
        assert_eq!(score_click(TARGET, Point { x: 175.0, y: -200.0 }), 0);
        assert_eq!(score_click(TARGET, Point { x: 1000.0, y: 1000.0 }), 0);
    }

    #[test]
    fn scoring_at_exact_radius_is_zero() {
        // d == r must not award a point (strict inequality).
        assert_eq!(score_click(TARGET, Point { x: 175.0, y: 212.5 - 337.5 }), 0);
    }

    #[test]
    fn near_miss_decays_linearly_with_distance() {
        // Just above the top edge, aligned with the center: d = 117.5,
        // floor(8 * (1 - 117.5 / 337.5)) = 5.
        assert_eq!(score_click(TARGET, Point { x: 175.0, y: 95.0 }), 5);
        // Half the radius above the center: d = 168.75 -> floor(4.0) = 4.
        assert_eq!(score_click(TARGET, Point { x: 175.0, y: 212.5 - 168.75 }), 4);
        // A hair inside the radius rounds down to 0.
        assert_eq!(score_click(TARGET, Point { x: 175.0, y: 212.5 - 337.0 }), 0);
    }
}
