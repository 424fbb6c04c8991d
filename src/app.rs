use crate::{
    animation::{WaveAnimator, WaveSnapshot},
    config::Config,
    controls::KeyBindingsConfig,
    render::{GridRenderer, SceneLayout, TerminalError, WindowSize},
};
use crossterm::event::{self, Event};
use std::{
    io::{self, Write},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Whether a frame should be drawn now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Due,
    /// The next frame is due after this long
    Pending(Duration),
}

/// Schedules frames at a fixed rate.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32, now: Instant) -> Self {
        let interval = Duration::from_secs(1) / frame_rate.max(1);
        Self { interval, next: now }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn poll(&self, now: Instant) -> FrameState {
        match self.next.checked_duration_since(now) {
            Some(remaining) if !remaining.is_zero() => FrameState::Pending(remaining),
            _ => FrameState::Due,
        }
    }

    /// Schedule the frame after the one that was just drawn.
    ///
    /// A clock that fell behind by more than a frame skips ahead instead of scheduling a burst of
    /// frames to catch up.
    pub fn advance(&mut self, now: Instant) {
        let next = self.next + self.interval;
        self.next = if next <= now { now + self.interval } else { next };
    }
}

/// A source of terminal events.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Reads events from the terminal.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? { event::read().map(Some) } else { Ok(None) }
    }
}

/// What to do after handling an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct AppOptions {
    /// Stop after drawing this many frames
    pub max_frames: Option<u64>,
}

/// Statistics about a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub final_state: WaveSnapshot,
}

/// Drives the wave animation in the terminal.
pub struct App {
    animator: WaveAnimator,
    renderer: GridRenderer,
    bindings: KeyBindingsConfig,
    grid: (usize, usize),
    viewport_fraction: f32,
    frame_rate: u32,
    options: AppOptions,
}

impl App {
    pub fn new(config: Config, window: WindowSize, options: AppOptions) -> Self {
        let animator = WaveAnimator::new(config.wave_parameters());
        let Config { grid, animation, layout, theme, bindings } = config;
        let scene = SceneLayout::compute(window, grid.columns, grid.rows, layout.viewport_fraction);
        let renderer = GridRenderer::new(theme, &bindings, scene);
        Self {
            animator,
            renderer,
            bindings,
            grid: (grid.columns, grid.rows),
            viewport_fraction: layout.viewport_fraction,
            frame_rate: animation.frame_rate,
            options,
        }
    }

    pub fn snapshot(&self) -> WaveSnapshot {
        self.animator.snapshot()
    }

    pub fn layout(&self) -> &SceneLayout {
        self.renderer.layout()
    }

    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) => {
                let Some(command) = self.bindings.command_for(&key) else {
                    return Flow::Continue;
                };
                if !self.animator.apply(command) {
                    info!("quit requested");
                    return Flow::Quit;
                }
            }
            Event::Resize(columns, rows) => self.resize(WindowSize::new(columns, rows)),
            _ => (),
        };
        Flow::Continue
    }

    pub fn resize(&mut self, window: WindowSize) {
        let (columns, rows) = self.grid;
        let layout = SceneLayout::compute(window, columns, rows, self.viewport_fraction);
        info!(
            columns = window.columns,
            rows = window.rows,
            cell_size = layout.grid.map(|grid| grid.cell_size).unwrap_or_default(),
            "terminal resized"
        );
        self.renderer.relayout(layout);
    }

    /// Run a single frame and draw it.
    pub fn draw_frame<W: Write>(&mut self, out: &mut W) -> Result<(), TerminalError> {
        let tick = self.animator.tick();
        if tick.bounced {
            debug!(bounces = self.animator.snapshot().bounces, "bounce drawn");
        }
        self.renderer.draw(out, &tick.frame, &self.animator.snapshot())
    }

    /// Run the frame loop until the user quits or the frame limit is reached.
    pub fn run<W, E>(&mut self, out: &mut W, events: &mut E) -> Result<RunSummary, TerminalError>
    where
        W: Write,
        E: EventSource,
    {
        let mut clock = FrameClock::new(self.frame_rate, Instant::now());
        let mut frames = 0;
        info!(interval = ?clock.interval(), max_frames = ?self.options.max_frames, "animation started");
        loop {
            if self.options.max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            match clock.poll(Instant::now()) {
                FrameState::Due => {
                    self.draw_frame(out)?;
                    frames += 1;
                    clock.advance(Instant::now());
                }
                FrameState::Pending(remaining) => {
                    let Some(event) = events.next_event(remaining)? else {
                        continue;
                    };
                    if self.handle_event(event) == Flow::Quit {
                        break;
                    }
                }
            }
        }
        let summary = RunSummary { frames, final_state: self.animator.snapshot() };
        info!(frames, bounces = summary.final_state.bounces, "animation stopped");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rstest::rstest;
    use std::collections::VecDeque;

    /// Replays events, one per wait.
    #[derive(Default)]
    struct ScriptedEvents(VecDeque<Event>);

    impl EventSource for ScriptedEvents {
        fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            Ok(self.0.pop_front())
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        App::new(Config::default(), WindowSize::new(80, 24), AppOptions::default())
    }

    #[test]
    fn clock_first_frame_is_due() {
        let now = Instant::now();
        let clock = FrameClock::new(60, now);
        assert_eq!(clock.poll(now), FrameState::Due);
    }

    #[test]
    fn clock_waits_for_interval() {
        let now = Instant::now();
        let mut clock = FrameClock::new(50, now);
        clock.advance(now);
        assert_eq!(clock.poll(now), FrameState::Pending(Duration::from_millis(20)));
        assert_eq!(clock.poll(now + Duration::from_millis(5)), FrameState::Pending(Duration::from_millis(15)));
        assert_eq!(clock.poll(now + Duration::from_millis(20)), FrameState::Due);
    }

    #[test]
    fn clock_keeps_steady_rate() {
        let now = Instant::now();
        let mut clock = FrameClock::new(50, now);
        // Drawing took a bit, the next frame is still anchored to the schedule
        clock.advance(now + Duration::from_millis(3));
        assert_eq!(clock.poll(now + Duration::from_millis(3)), FrameState::Pending(Duration::from_millis(17)));
    }

    #[test]
    fn clock_skips_missed_frames() {
        let now = Instant::now();
        let mut clock = FrameClock::new(50, now);
        let late = now + Duration::from_millis(100);
        clock.advance(late);
        assert_eq!(clock.poll(late), FrameState::Pending(Duration::from_millis(20)));
    }

    #[rstest]
    #[case(KeyCode::Char('f'), 0.225)]
    #[case(KeyCode::Right, 0.225)]
    #[case(KeyCode::Char('s'), 0.1)]
    #[case(KeyCode::Left, 0.1)]
    #[case(KeyCode::Char('x'), 0.15)]
    fn speed_keys(#[case] code: KeyCode, #[case] expected: f32) {
        let mut app = app();
        assert_eq!(app.handle_event(key(code)), Flow::Continue);
        assert!((app.snapshot().speed - expected).abs() < 1e-4);
    }

    #[test]
    fn reset_key() {
        let mut app = app();
        let mut output = Vec::new();
        for _ in 0..10 {
            app.draw_frame(&mut output).expect("draw failed");
        }
        app.handle_event(key(KeyCode::Char('f')));
        assert!(app.snapshot().position > 0.0);
        assert_eq!(app.handle_event(key(KeyCode::Char('r'))), Flow::Continue);
        assert_eq!(app.snapshot().position, 0.0);
        assert_eq!(app.snapshot().speed, 0.15);
    }

    #[rstest]
    #[case(key(KeyCode::Char('q')))]
    #[case(key(KeyCode::Esc))]
    #[case(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))]
    fn quit_keys(#[case] event: Event) {
        assert_eq!(app().handle_event(event), Flow::Quit);
    }

    #[test]
    fn resize_only_changes_layout() {
        let mut app = app();
        let mut output = Vec::new();
        for _ in 0..5 {
            app.draw_frame(&mut output).expect("draw failed");
        }
        let before = app.snapshot();
        assert_eq!(app.layout().grid.map(|grid| grid.cell_size), Some(1));

        assert_eq!(app.handle_event(Event::Resize(200, 60)), Flow::Continue);
        assert_eq!(app.layout().grid.map(|grid| grid.cell_size), Some(2));
        assert_eq!(app.snapshot(), before);
    }

    #[test]
    fn frames_advance_animation() {
        let mut app = app();
        let mut output = Vec::new();
        for _ in 0..4 {
            app.draw_frame(&mut output).expect("draw failed");
        }
        assert!((app.snapshot().position - 0.6).abs() < 1e-4);
        assert!(!output.is_empty());
    }

    #[test]
    fn run_stops_at_frame_limit() {
        let mut config = Config::default();
        config.animation.frame_rate = 1000;
        let options = AppOptions { max_frames: Some(3) };
        let mut app = App::new(config, WindowSize::new(80, 24), options);
        let mut output = Vec::new();
        let summary = app.run(&mut output, &mut ScriptedEvents::default()).expect("run failed");
        assert_eq!(summary.frames, 3);
        assert!((summary.final_state.position - 0.45).abs() < 1e-4);
    }

    #[test]
    fn run_stops_on_quit() {
        let mut config = Config::default();
        config.animation.frame_rate = 1;
        let mut app = App::new(config, WindowSize::new(80, 24), AppOptions::default());
        let mut events = ScriptedEvents([key(KeyCode::Char('f')), key(KeyCode::Char('q'))].into());
        let mut output = Vec::new();
        let summary = app.run(&mut output, &mut events).expect("run failed");
        // The first frame is due immediately, the second one a second later
        assert_eq!(summary.frames, 1);
        assert!((summary.final_state.speed - 0.225).abs() < 1e-4);
    }
}
