//=========================================================================
// Biscuit Clicker
//=========================================================================
//
// A five-screen clicking game on top of the stage.
//
// Flow:
//   Title ──Start──> Game ──20 s──> (2 s hold) ──> Result ──> Title
//     ├──Score──> top five ──> Title
//     ├──Credit──> staff roll ──> Title
//     └──Exit──> stage exits, window closes
//
// Scenes that react to hovering raise `Biscuits::hovering`, which swaps
// the pointer for a hand ring, and lower it again in `dispose`.
//
// Run with `RUST_LOG=debug cargo run --example biscuit_clicker` to watch
// scene activation and transitions in the log.
//
//=========================================================================

use std::f32::consts::TAU;
use std::time::Duration;

use aetheric_stage::prelude::*;
use log::info;
use rand::Rng;

//=== Layout ==============================================================

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

const COUNTDOWN: Duration = Duration::from_secs(3);
const ROUND: Duration = Duration::from_secs(20);

const BACKGROUND_EFFECT_EVERY: Duration = Duration::from_millis(50);
const MENU_EFFECT_EVERY: Duration = Duration::from_millis(300);

const CREDITS: &[(&str, &[&str])] = &[
    ("Game Design", &["Aaa Aaaa"]),
    ("Programming", &["Bbb Bbbb", "Cccc Cccccc"]),
    ("Game Art", &["Ddddd Ddddd"]),
    ("Music", &["Eeeee Eeee"]),
    ("Special Thanks", &["You!"]),
];

const BISCUIT: Color = Color::rgb(0.98, 0.71, 0.39);
const BISCUIT_EDGE: Color = Color::rgb(0.94, 0.55, 0.31);
const INK: Color = Color::rgb(0.16, 0.16, 0.16);

//=== Stage Types =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Title,
    Game,
    Result,
    Score,
    Credit,
}

impl SceneKey for Screen {}

/// Shared across every scene.
#[derive(Debug)]
struct Biscuits {
    last_score: u32,
    /// Best first. Lives for the run only.
    high_scores: [u32; 5],
    hovering: bool,
}

impl Default for Biscuits {
    fn default() -> Self {
        Self {
            last_score: 0,
            high_scores: [50, 40, 30, 20, 10],
            hovering: false,
        }
    }
}

impl Biscuits {
    fn best_score(&self) -> u32 {
        self.high_scores[0]
    }

    /// Places `score` in the table if it at least ties the lowest entry.
    fn record(&mut self, score: u32) {
        let Some(lowest) = self.high_scores.last_mut() else {
            return;
        };
        if *lowest <= score {
            *lowest = score;
            self.high_scores.sort_unstable_by(|a, b| b.cmp(a));
        }
    }
}

/// Hand ring in place of the pointer while something clickable is hovered.
fn draw_cursor(ctx: &mut DrawContext<'_, Biscuits>) {
    if ctx.data.hovering {
        ctx.canvas.circle(ctx.input.mouse_position(), 12.0, Color::WHITE.with_alpha(0.6));
    }
}

fn leave_requested(input: &StateTracker) -> bool {
    input.is_clicked() || input.is_key_pressed(KeyCode::Escape)
}

//=== Effects =============================================================

/// Faint line sweeping across the title screen, brightest at 1 s.
fn background_line() -> impl Effect {
    let mut rng = rand::thread_rng();
    let center = (rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
    let angle = rng.gen_range(0.0..TAU);
    let reach = WIDTH + HEIGHT;
    let (dx, dy) = (angle.cos() * reach, angle.sin() * reach);

    move |t: f64, canvas: &mut dyn Canvas| {
        let alpha = ((1.0 - (t - 1.0).abs()) * 0.3) as f32;
        canvas.line(
            (center.0 - dx, center.1 - dy),
            (center.0 + dx, center.1 + dy),
            2.0,
            Color::WHITE.with_alpha(alpha),
        );
        t < 2.0
    }
}

/// Box growing out of a hovered menu item.
fn menu_pulse(item: Rect) -> impl Effect {
    move |t: f64, canvas: &mut dyn Canvas| {
        let e = Easing::QuadOut.apply(t);
        canvas.rect(
            item.stretched((e * 20.0) as f32),
            Color::WHITE.with_alpha(((1.0 - e) * 0.4) as f32),
        );
        t < 1.0
    }
}

//=== Title ===============================================================

struct Title {
    effects: EffectScheduler,
    background: Stopwatch,
    menu: Stopwatch,
    /// `None` exits the stage.
    items: [(Rect, &'static str, Option<Screen>); 4],
}

impl Title {
    fn new() -> Self {
        Self {
            effects: EffectScheduler::new(),
            background: Stopwatch::new(),
            menu: Stopwatch::new(),
            items: [
                (Rect::new(240.0, 260.0, 320.0, 60.0), "START", Some(Screen::Game)),
                (Rect::new(240.0, 340.0, 320.0, 60.0), "SCORE", Some(Screen::Score)),
                (Rect::new(240.0, 420.0, 320.0, 60.0), "CREDIT", Some(Screen::Credit)),
                (Rect::new(240.0, 500.0, 320.0, 60.0), "EXIT", None),
            ],
        }
    }
}

impl Scene<Screen, Biscuits> for Title {
    fn init(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        self.background.start(ctx.now());
        self.menu.start(ctx.now());
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        let now = ctx.now();

        let mut hovering = false;
        for (item, _, target) in &self.items {
            if !ctx.input.is_hovering(*item) {
                continue;
            }
            hovering = true;

            if self.menu.elapsed(now) > MENU_EFFECT_EVERY {
                self.effects.add(now, menu_pulse(*item));
                self.menu.restart(now);
            }

            if ctx.input.is_clicked() {
                match target {
                    Some(screen) => ctx.change_scene(*screen),
                    None => ctx.exit(),
                };
            }
        }
        ctx.data.hovering = hovering;

        if ctx.input.is_key_pressed(KeyCode::Enter) {
            ctx.change_scene(Screen::Game);
        } else if ctx.input.is_key_pressed(KeyCode::Escape) {
            ctx.exit();
        }

        if self.background.elapsed(now) > BACKGROUND_EFFECT_EVERY {
            self.effects.add(now, background_line());
            self.background.restart(now);
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_, Biscuits>) {
        self.effects.update(ctx.now(), ctx.canvas);

        ctx.canvas.text((WIDTH / 2.0, 120.0), 96.0, "Biscuit Clicker", Color::WHITE);

        for (item, label, _) in &self.items {
            ctx.canvas.rect(*item, Color::WHITE);
            ctx.canvas.text(item.center(), 32.0, label, INK);
        }

        let best = format!("BEST: {}", ctx.data.best_score());
        ctx.canvas.text((WIDTH - 120.0, HEIGHT - 30.0), 20.0, &best, Color::WHITE);

        draw_cursor(ctx);
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        ctx.data.hovering = false;
    }
}

//=== Game ================================================================

struct Game {
    countdown: Stopwatch,
    round: Stopwatch,
    biscuit: ((f32, f32), f32),
    score: u32,
}

impl Game {
    fn new() -> Self {
        Self {
            countdown: Stopwatch::new(),
            round: Stopwatch::new(),
            biscuit: ((WIDTH / 2.0, HEIGHT / 2.0), 50.0),
            score: 0,
        }
    }

    /// Somewhere in the central 80% of the window.
    fn place_biscuit(&mut self) {
        let mut rng = rand::thread_rng();
        let center = (
            rng.gen_range(WIDTH * 0.1..WIDTH * 0.9),
            rng.gen_range(HEIGHT * 0.1..HEIGHT * 0.9),
        );
        self.biscuit = (center, rng.gen_range(40.0..60.0));
    }

    fn over_biscuit(&self, (x, y): (f32, f32)) -> bool {
        let ((cx, cy), r) = self.biscuit;
        (x - cx).powi(2) + (y - cy).powi(2) <= r * r
    }
}

impl Scene<Screen, Biscuits> for Game {
    fn init(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        ctx.data.last_score = 0;
        self.countdown.start(ctx.now());
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        let now = ctx.now();

        if !self.round.is_running() {
            ctx.data.hovering = false;
            if self.countdown.elapsed(now) >= COUNTDOWN {
                self.round.start(now);
                self.place_biscuit();
            }
            return;
        }

        if self.round.elapsed(now) >= ROUND {
            ctx.data.last_score = self.score;
            info!("Round over, {} biscuits", self.score);

            let transition = Transition::default().with_hold(Duration::from_secs(2));
            ctx.change_scene_with(Screen::Result, transition);
            return;
        }

        let hovering = self.over_biscuit(ctx.input.mouse_position());
        ctx.data.hovering = hovering;

        if hovering && ctx.input.is_clicked() {
            self.score += 1;
            self.place_biscuit();
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_, Biscuits>) {
        let now = ctx.now();
        let center = (WIDTH / 2.0, HEIGHT / 2.0);

        // Counts 3, 2, 1, then START fades over the first second of play.
        let count_ms = self.countdown.millis(now);
        if count_ms < 4000 {
            let left = 3999 - count_ms;
            let e = Easing::ExpoIn.apply((left % 1000) as f64 / 1000.0) as f32;
            match left / 1000 {
                0 => ctx.canvas.text(center, 72.0 * (3.0 - e * 2.0), "START", Color::WHITE.with_alpha(e)),
                n => ctx.canvas.text(center, 72.0 * (1.0 + e * 2.0), &n.to_string(), Color::WHITE),
            }
        }

        if !self.round.is_running() {
            return;
        }

        let (at, radius) = self.biscuit;
        let hovered = self.over_biscuit(ctx.input.mouse_position());
        ctx.canvas.circle(at, radius + if hovered { 4.0 } else { 2.0 }, BISCUIT_EDGE);
        ctx.canvas.circle(at, radius, BISCUIT);
        for i in 0..6 {
            let angle = i as f32 * TAU / 6.0;
            let dot = (at.0 + angle.cos() * radius * 0.5, at.1 + angle.sin() * radius * 0.5);
            ctx.canvas.circle(dot, 1.5, INK.with_alpha(0.3));
        }

        let left = ROUND.saturating_sub(self.round.elapsed(now)).as_millis();
        let clock = format!("TIME: {:02}'{:02}", left / 1000, left % 1000 / 10);
        ctx.canvas.text((160.0, 60.0), 40.0, &clock, Color::WHITE);

        draw_cursor(ctx);
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        ctx.data.hovering = false;
    }
}

//=== Scoreboard ==========================================================

struct Scoreboard {
    back: Rect,
}

impl Scoreboard {
    fn new() -> Self {
        Self {
            back: Rect::new(WIDTH / 2.0 - 335.0, HEIGHT * 0.7 - 35.0, 70.0, 70.0),
        }
    }
}

impl Scene<Screen, Biscuits> for Scoreboard {
    fn init(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        let score = ctx.data.last_score;
        ctx.data.record(score);
        info!("Final score {} (best {})", score, ctx.data.best_score());
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        ctx.data.hovering = ctx.input.is_hovering(self.back);

        if ctx.input.is_clicked_in(self.back) || ctx.input.is_key_pressed(KeyCode::Escape) {
            ctx.change_scene(Screen::Title);
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_, Biscuits>) {
        let score = format!("{} biscuits", ctx.data.last_score);
        ctx.canvas.text((WIDTH / 2.0, HEIGHT * 0.4), 80.0, &score, Color::WHITE);

        let hovered = ctx.input.is_hovering(self.back);
        ctx.canvas.circle(self.back.center(), if hovered { 38.0 } else { 35.0 }, Color::WHITE);
        ctx.canvas.text(self.back.center(), 32.0, "Title", INK);

        draw_cursor(ctx);
    }

    fn dispose(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        ctx.data.hovering = false;
    }
}

//=== High Scores =========================================================

struct HighScores;

impl Scene<Screen, Biscuits> for HighScores {
    fn update(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        if leave_requested(ctx.input) {
            ctx.change_scene(Screen::Title);
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_, Biscuits>) {
        for (rank, score) in ctx.data.high_scores.iter().enumerate() {
            let row = Rect::new(WIDTH / 2.0 - 260.0, 70.0 + rank as f32 * 120.0, 520.0, 100.0);
            let (cx, cy) = row.center();
            ctx.canvas.rect(row, Color::WHITE.with_alpha(0.2));

            let text = score.to_string();
            ctx.canvas.text((cx + 2.0, cy + 2.0), 50.0, &text, Color::rgb(0.5, 0.5, 0.5));
            ctx.canvas.text((cx, cy), 50.0, &text, Color::WHITE);

            // Fewer and fainter markers further down the table.
            let alpha = 1.0 - rank as f32 * 0.1;
            for k in 0..(5 - rank) {
                let spread = 300.0 + k as f32 * 50.0;
                ctx.canvas.circle((cx - spread, cy), 20.0, Color::WHITE.with_alpha(alpha));
                ctx.canvas.circle((cx + spread, cy), 20.0, Color::WHITE.with_alpha(alpha));
            }
        }
    }
}

//=== Credits =============================================================

/// Staff roll scrolling upwards, restarting once it has left the screen.
struct Credits {
    lines: Vec<(&'static str, f32, bool)>,
    height: f32,
    roll: Stopwatch,
}

impl Credits {
    fn new() -> Self {
        let mut lines = Vec::new();
        let mut y = 0.0;
        for (role, names) in CREDITS {
            lines.push((*role, y, true));
            y += 70.0;
            for name in *names {
                lines.push((*name, y, false));
                y += 60.0;
            }
            y += 60.0;
        }

        Self {
            lines,
            height: y,
            roll: Stopwatch::new(),
        }
    }

    /// Starts just below the window and rises 50 px per second.
    fn offset(&self, now: Duration) -> f32 {
        HEIGHT + 60.0 - self.roll.millis(now) as f32 / 20.0
    }

    fn wrap(&mut self, now: Duration) {
        if self.height + self.offset(now) < 0.0 {
            self.roll.restart(now);
        }
    }
}

impl Scene<Screen, Biscuits> for Credits {
    fn init(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        self.roll.start(ctx.now());
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, Screen, Biscuits>) {
        if leave_requested(ctx.input) {
            ctx.change_scene(Screen::Title);
        }

        self.wrap(ctx.now());
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_, Biscuits>) {
        let offset = self.offset(ctx.now());
        for (text, y, heading) in &self.lines {
            let size = if *heading { 32.0 } else { 28.0 };
            ctx.canvas.text((WIDTH / 2.0, y + offset), size, text, Color::WHITE);
        }
    }
}

//=== Main ================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    EngineBuilder::<Screen, Biscuits>::new()
        .with_window_title("Biscuit Clicker")
        .with_window_size(WIDTH as u32, HEIGHT as u32)
        .with_fade_color(Color::from_rgb8(255, 255, 255))
        .build(Biscuits::default())
        .init(|stage| {
            stage.register_default(Screen::Title, Title::new)?;
            stage.register(Screen::Game, Game::new)?;
            stage.register(Screen::Result, Scoreboard::new)?;
            stage.register(Screen::Score, || HighScores)?;
            stage.register(Screen::Credit, Credits::new)
        })?
        .run()?;

    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    //--- High Scores ------------------------------------------------------

    #[test]
    fn record_inserts_in_order() {
        let mut data = Biscuits::default();

        data.record(35);
        assert_eq!(data.high_scores, [50, 40, 35, 30, 20]);

        data.record(99);
        assert_eq!(data.high_scores, [99, 50, 40, 35, 30]);
        assert_eq!(data.best_score(), 99);
    }

    #[test]
    fn record_ignores_scores_below_the_table() {
        let mut data = Biscuits::default();

        data.record(9);
        assert_eq!(data.high_scores, [50, 40, 30, 20, 10]);

        data.record(10);
        assert_eq!(data.high_scores, [50, 40, 30, 20, 10]);
    }

    #[test]
    fn result_screen_records_last_score() {
        let clock = ManualClock::new();
        let data = Biscuits {
            last_score: 45,
            ..Biscuits::default()
        };
        let mut stage = StageDirector::new(data, clock);
        stage.register_default(Screen::Result, Scoreboard::new).unwrap();

        stage.start().unwrap();

        assert_eq!(stage.data().high_scores, [50, 45, 40, 30, 20]);
    }

    //--- Credits ----------------------------------------------------------

    #[test]
    fn credits_start_below_the_window() {
        let mut credits = Credits::new();
        credits.roll.start(ms(0));

        assert_eq!(credits.offset(ms(0)), HEIGHT + 60.0);
        assert_eq!(credits.offset(ms(1000)), HEIGHT + 10.0);
        assert_eq!(credits.height, 1010.0);
    }

    #[test]
    fn credits_restart_once_scrolled_off() {
        let mut credits = Credits::new();
        credits.roll.start(ms(0));

        // Last line leaves the top edge at 35.8 s.
        credits.wrap(ms(35_800));
        assert_eq!(credits.roll.millis(ms(35_800)), 35_800);

        credits.wrap(ms(35_820));
        assert_eq!(credits.offset(ms(35_820)), HEIGHT + 60.0);
    }

    //--- Hover Cursor -----------------------------------------------------

    #[test]
    fn hover_is_released_when_title_is_disposed() {
        let clock = ManualClock::new();
        let mut stage = StageDirector::new(Biscuits::default(), clock.clone());
        stage.register_default(Screen::Title, Title::new).unwrap();
        stage.register(Screen::Score, || HighScores).unwrap();

        let mut input = StateTracker::new();
        let mut canvas = DrawList::new();

        input.advance_frame(&[vec![InputEvent::mouse_moved(400.0, 290.0)]]);
        stage.drive_frame(&input, &mut canvas).unwrap();
        assert!(stage.data().hovering);

        stage.change_scene(Screen::Score).unwrap();
        for t in [500, 1000] {
            clock.set_millis(t);
            input.advance_frame(&[]);
            stage.drive_frame(&input, &mut canvas).unwrap();
        }

        assert_eq!(stage.current(), Some(Screen::Score));
        assert!(!stage.data().hovering);
    }

    #[test]
    fn hover_is_released_when_result_is_disposed() {
        let clock = ManualClock::new();
        let mut stage = StageDirector::new(Biscuits::default(), clock);
        stage.register_default(Screen::Result, Scoreboard::new).unwrap();
        stage.register(Screen::Credit, Credits::new).unwrap();

        let mut input = StateTracker::new();
        let mut canvas = DrawList::new();

        input.advance_frame(&[vec![InputEvent::mouse_moved(WIDTH / 2.0 - 300.0, HEIGHT * 0.7)]]);
        stage.drive_frame(&input, &mut canvas).unwrap();
        assert!(stage.data().hovering);

        stage
            .change_scene_with(Screen::Credit, Transition::instant())
            .unwrap();
        stage.drive_frame(&input, &mut canvas).unwrap();

        assert_eq!(stage.current(), Some(Screen::Credit));
        assert!(!stage.data().hovering);
    }
}
