//! Canvas/view host for Pin the Dot (wasm glue).
//!
//! Owns everything browser-shaped: the canvas element and its 2d context,
//! the sidebar/score DOM overlays, pointer and resize listeners, the conceal
//! timeout and the one-second countdown interval, and the
//! `requestAnimationFrame` render loop. All game decisions are delegated to
//! the pure `round` state machine; all score bookkeeping to `session`.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window, window};

use crate::round::{
    self, Bounds, CONCEAL_MS, POPUP_MS, Phase, Point, Round, TARGET_HEIGHT, TARGET_WIDTH, Tick,
};
use crate::session::Session;

/// Width reserved for the leaderboard panel on the left.
const SIDEBAR_WIDTH: f64 = 320.0;
const CANVAS_MARGIN: f64 = 48.0;

/// Floating "+N" acknowledgment shown where a scoring click landed.
struct ScorePopup {
    points: u32,
    x: f64,
    y: f64,
    start_ms: f64,
}

/// Runtime game state for the page.
struct GameState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    round: Round,
    session: Session,
    // Transient presentation only; never part of the scored state.
    popups: Vec<ScorePopup>,
    // Scheduled-task handles for the current round. Both are cleared on
    // every exit transition (click, expiry, new round) so a stale callback
    // can never reach a later round. The closures are kept alive here and
    // dropped on the next round start, never from inside their own
    // invocation.
    conceal_handle: Option<i32>,
    #[allow(dead_code)]
    conceal_closure: Option<Closure<dyn FnMut()>>,
    tick_handle: Option<i32>,
    #[allow(dead_code)]
    tick_closure: Option<Closure<dyn FnMut()>>,
    // The round ended with the clock at zero (shows the "Time's up" banner).
    timed_out: bool,
}

// RefCell::new isn't const on this toolchain; allow Clippy lint until a const initializer is feasible.
thread_local! {
    static GAME_STATE: std::cell::RefCell<Option<GameState>> = std::cell::RefCell::new(None);
}

pub fn start_pin_the_dot() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    // Create / reuse the playfield canvas, centered in the space right of
    // the sidebar.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("ptd-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("ptd-canvas");
        c.set_attribute("style", &format!("position:fixed; left:calc(50% + {}px); top:50%; transform:translate(-50%,-50%); cursor:crosshair; box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:12px; border:2px solid #1e293b; background:#e2e8f0; z-index:20;", SIDEBAR_WIDTH / 2.0)).ok();
        body.append_child(&c)?;
        c
    };
    let (cw, ch) = canvas_size(&win);
    canvas.set_width(cw);
    canvas.set_height(ch);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_align("center");

    // Leaderboard panel (title + standings + New Game button).
    if doc.get_element_by_id("ptd-board").is_none() {
        let panel = doc.create_element("div")?;
        panel.set_id("ptd-board");
        panel.set_attribute("style", "position:fixed; left:0; top:0; bottom:0; width:280px; padding:20px; background:#1e293b; box-shadow:2px 0 18px rgba(0,0,0,0.35); font-family:'Segoe UI', sans-serif; z-index:30; overflow-y:auto;").ok();
        panel.set_inner_html(
            "<div style='font-size:26px;font-weight:800;color:#ffffff;'>Pin the Dot</div>\
             <div style='color:#818cf8;font-weight:600;margin-bottom:14px;'>Leaderboard</div>\
             <div id='ptd-standings'></div>",
        );
        body.append_child(&panel)?;

        let button = doc.create_element("button")?;
        button.set_id("ptd-new-game");
        button.set_text_content(Some("New Game"));
        button.set_attribute("style", "width:100%; margin-top:16px; padding:12px; border:none; border-radius:8px; background:#14b8a6; color:#ffffff; font-size:16px; font-weight:700; cursor:pointer;").ok();
        panel.append_child(&button)?;
    }

    // Running score overlay (top-right, above the canvas).
    if doc.get_element_by_id("ptd-score").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("ptd-score");
        div.set_text_content(Some("Score: 0"));
        div.set_attribute("style", "position:fixed; top:10px; right:12px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;").ok();
        body.append_child(&div)?;
    }

    let bounds = Bounds {
        width: canvas.width() as f64,
        height: canvas.height() as f64,
    };
    let state = GameState {
        canvas: canvas.clone(),
        ctx,
        round: Round::start(bounds, rand_unit(), rand_unit()),
        session: Session::new("You"),
        popups: Vec::new(),
        conceal_handle: None,
        conceal_closure: None,
        tick_handle: None,
        tick_closure: None,
        timed_out: false,
    };
    GAME_STATE.with(|cell| cell.replace(Some(state)));
    GAME_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            schedule_conceal(st);
        }
    });

    // Pointer clicks, in canvas-local coordinates.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let x = evt.offset_x() as f64;
            let y = evt.offset_y() as f64;
            GAME_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    handle_click(st, x, y);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // New Game button discards whatever round is in flight.
    if let Some(button) = doc.get_element_by_id("ptd-new-game") {
        let closure = Closure::wrap(Box::new(move || {
            GAME_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    begin_round(st);
                }
            });
        }) as Box<dyn FnMut()>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resizing changes the playable bounds, so the round restarts against
    // them (same behavior as the original web build).
    {
        let closure = Closure::wrap(Box::new(move || {
            GAME_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    begin_round(st);
                }
            });
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_render_loop();
    Ok(())
}

fn canvas_size(win: &Window) -> (u32, u32) {
    let inner_w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0);
    let inner_h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    // Never shrink below the target box plus some slack.
    let w = (inner_w - SIDEBAR_WIDTH - CANVAS_MARGIN).clamp(400.0, 1280.0);
    let h = (inner_h - CANVAS_MARGIN).clamp(400.0, 960.0);
    (w as u32, h as u32)
}

/// Uniform sample in [0, 1) for target placement.
fn rand_unit() -> f64 {
    let mut buf = [0u8; 4];
    if getrandom::getrandom(&mut buf).is_ok() {
        u32::from_le_bytes(buf) as f64 / (u32::MAX as f64 + 1.0)
    } else {
        // Timestamp-seeded LCG fallback (not crypto secure)
        let seed = crate::performance_now() as u64;
        (seed.wrapping_mul(1664525).wrapping_add(1013904223) % 10_000) as f64 / 10_000.0
    }
}

// --- Round lifecycle ---------------------------------------------------------

fn begin_round(st: &mut GameState) {
    cancel_round_timers(st);
    if let Some(win) = window() {
        let (w, h) = canvas_size(&win);
        st.canvas.set_width(w);
        st.canvas.set_height(h);
    }
    let bounds = Bounds {
        width: st.canvas.width() as f64,
        height: st.canvas.height() as f64,
    };
    st.round = Round::start(bounds, rand_unit(), rand_unit());
    st.popups.clear();
    st.timed_out = false;
    schedule_conceal(st);
}

fn handle_click(st: &mut GameState, x: f64, y: f64) {
    // The phase guard inside on_pointer_click makes this idempotent per
    // round; only the first Active-phase click returns a result.
    let Some(result) = st.round.on_pointer_click(Point { x, y }) else {
        return;
    };
    cancel_round_timers(st);
    if result.points > 0 {
        st.session.report_score(result.points);
        st.popups.push(ScorePopup {
            points: result.points,
            x,
            y,
            start_ms: crate::performance_now(),
        });
    }
}

fn schedule_conceal(st: &mut GameState) {
    let Some(win) = window() else { return };
    let cb = Closure::wrap(Box::new(move || {
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.conceal_handle = None;
                st.round.reveal();
                schedule_countdown(st);
            }
        });
    }) as Box<dyn FnMut()>);
    if let Ok(handle) = win
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            CONCEAL_MS as i32,
        )
    {
        st.conceal_handle = Some(handle);
        st.conceal_closure = Some(cb);
    } else {
        // Scheduling failed; play the round without the cover delay.
        st.round.reveal();
        schedule_countdown(st);
    }
}

fn schedule_countdown(st: &mut GameState) {
    let Some(win) = window() else { return };
    let cb = Closure::wrap(Box::new(move || {
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if let Tick::Expired = st.round.on_tick() {
                    // Stop the interval immediately. We are executing its
                    // callback right now, so only the handle is cleared
                    // here; the closure is dropped on the next round start.
                    if let Some(handle) = st.tick_handle.take() {
                        if let Some(win) = window() {
                            win.clear_interval_with_handle(handle);
                        }
                    }
                    st.timed_out = true;
                }
            }
        });
    }) as Box<dyn FnMut()>);
    if let Ok(handle) =
        win.set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 1000)
    {
        st.tick_handle = Some(handle);
        st.tick_closure = Some(cb);
    }
}

/// Invalidate both scheduled callbacks for the current round. Must not be
/// called from inside the tick closure itself (the expiry path clears only
/// the handle for that reason).
fn cancel_round_timers(st: &mut GameState) {
    let win = window();
    if let Some(handle) = st.conceal_handle.take() {
        if let Some(win) = &win {
            win.clear_timeout_with_handle(handle);
        }
    }
    if let Some(handle) = st.tick_handle.take() {
        if let Some(win) = &win {
            win.clear_interval_with_handle(handle);
        }
    }
    st.conceal_closure = None;
    st.tick_closure = None;
}

// --- Frame loop & rendering --------------------------------------------------

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_render_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                frame(st, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn frame(st: &mut GameState, now: f64) {
    st.popups.retain(|p| now - p.start_ms < POPUP_MS);
    render(st, now);
    // Keep DOM overlays (score + standings) in sync each frame.
    if let Some(win) = window() {
        if let Some(doc) = win.document() {
            if let Some(score_el) = doc.get_element_by_id("ptd-score") {
                score_el.set_text_content(Some(&format!("Score: {}", st.session.current_score())));
            }
            if let Some(standings_el) = doc.get_element_by_id("ptd-standings") {
                standings_el.set_inner_html(&standings_html(&st.session));
            }
        }
    }
}

fn standings_html(session: &Session) -> String {
    let mut html = String::new();
    for (rank, player) in session.standings().iter().enumerate() {
        let rank_color = match rank {
            0 => "#fbbf24",
            1 => "#94a3b8",
            2 => "#b45309",
            _ => "#64748b",
        };
        let row_bg = if session.is_current(player) {
            "#4f46e5"
        } else {
            "#334155"
        };
        html.push_str(&format!(
            "<div style='display:flex;align-items:center;padding:8px 10px;margin-bottom:6px;border-radius:8px;background:{row_bg};'>\
             <span style='width:24px;text-align:center;color:{rank_color};font-weight:700;'>{place}</span>\
             <span style='flex:1;color:#ffffff;font-weight:600;margin-left:8px;'>{name}</span>\
             <span style='color:#a5b4fc;font-weight:700;'>{score}</span></div>",
            place = rank + 1,
            name = player.name,
            score = player.score,
        ));
    }
    html
}

fn render(st: &GameState, now: f64) {
    let w = st.canvas.width() as f64;
    let h = st.canvas.height() as f64;
    st.ctx.set_fill_style_str("#e2e8f0");
    st.ctx.fill_rect(0.0, 0.0, w, h);

    match st.round.phase() {
        Phase::Concealed => draw_cover(&st.ctx, w, h),
        Phase::Active => {
            draw_target(&st.ctx, st.round.target());
            draw_countdown(&st.ctx, w, st.round.remaining());
        }
        Phase::Resolved => {
            // Leave the target visible so the player sees where it was.
            draw_target(&st.ctx, st.round.target());
            draw_banner(&st.ctx, w, h, st.timed_out);
        }
    }

    if let Some(click) = st.round.accepted_click() {
        draw_click_marker(&st.ctx, click);
    }
    for popup in &st.popups {
        draw_popup(&st.ctx, popup, now);
    }
}

fn draw_cover(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.set_fill_style_str("#0f172a");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_text_align("center");
    ctx.set_fill_style_str("#e2e8f0");
    ctx.set_font("bold 36px 'Segoe UI', sans-serif");
    ctx.fill_text("Get ready...", w / 2.0, h / 2.0).ok();
    ctx.set_fill_style_str("#94a3b8");
    ctx.set_font("18px 'Segoe UI', sans-serif");
    ctx.fill_text("The target appears in a moment", w / 2.0, h / 2.0 + 36.0)
        .ok();
}

fn draw_target(ctx: &CanvasRenderingContext2d, target: Point) {
    // Card-style box standing in for the photo the web build loads.
    let grad = ctx.create_linear_gradient(target.x, target.y, target.x, target.y + TARGET_HEIGHT);
    grad.add_color_stop(0.0, "#818cf8").ok();
    grad.add_color_stop(1.0, "#4f46e5").ok();
    ctx.set_fill_style_canvas_gradient(&grad);
    ctx.fill_rect(target.x, target.y, TARGET_WIDTH, TARGET_HEIGHT);
    ctx.set_stroke_style_str("rgba(15,23,42,0.35)");
    ctx.set_line_width(3.0);
    ctx.stroke_rect(
        target.x + 1.5,
        target.y + 1.5,
        TARGET_WIDTH - 3.0,
        TARGET_HEIGHT - 3.0,
    );

    // Bullseye rings on the near-miss reference point.
    let center = round::target_center(target);
    for (radius, color) in [(34.0, "#f8fafc"), (22.0, "#f87171"), (10.0, "#dc2626")] {
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.fill();
    }
}

fn draw_countdown(ctx: &CanvasRenderingContext2d, w: f64, remaining: u32) {
    ctx.set_text_align("right");
    ctx.set_font("bold 32px 'Fira Code', monospace");
    ctx.set_fill_style_str(if remaining <= 2 { "#dc2626" } else { "#1e293b" });
    ctx.fill_text(&format!("{remaining}s"), w - 18.0, 42.0).ok();
}

fn draw_banner(ctx: &CanvasRenderingContext2d, w: f64, h: f64, timed_out: bool) {
    ctx.set_fill_style_str("rgba(15,23,42,0.45)");
    ctx.fill_rect(0.0, 0.0, w, h);
    let cx = w / 2.0;
    let cy = h / 2.0;
    let headline = if timed_out { "Time's up!" } else { "Round over" };
    ctx.set_text_align("center");
    ctx.set_font("bold 48px 'Segoe UI', sans-serif");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.stroke_text(headline, cx, cy).ok();
    ctx.set_fill_style_str("#ffffff");
    ctx.fill_text(headline, cx, cy).ok();
    ctx.set_font("20px 'Segoe UI', sans-serif");
    ctx.fill_text("Press New Game to play again", cx, cy + 44.0)
        .ok();
}

fn draw_click_marker(ctx: &CanvasRenderingContext2d, click: Point) {
    ctx.begin_path();
    ctx.arc(click.x, click.y, 8.0, 0.0, std::f64::consts::TAU).ok();
    ctx.set_fill_style_str("#ef4444");
    ctx.fill();
    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str("#ffffff");
    ctx.stroke();
}

fn draw_popup(ctx: &CanvasRenderingContext2d, popup: &ScorePopup, now: f64) {
    let t = ((now - popup.start_ms) / POPUP_MS).clamp(0.0, 1.0);
    let alpha = 1.0 - t;
    if alpha <= 0.0 {
        return;
    }
    // Rise and fade, like the original's floating popup.
    let rise = 64.0 * t;
    ctx.set_text_align("center");
    ctx.set_font("bold 28px 'Segoe UI', sans-serif");
    ctx.set_fill_style_str(&format!("rgba(79,70,229,{alpha:.3})"));
    ctx.fill_text(&format!("+{}", popup.points), popup.x, popup.y - rise)
        .ok();
}
