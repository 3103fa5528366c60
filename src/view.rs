use std::{
    io::{stdin, stdout, Write},
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, Result};
use termion::{event::Key, input::TermRead, raw::IntoRawMode, screen::AlternateScreen};
use tracing::{debug, info};

use golgrid::{pos, world::MAX_DENSITY, PopulationSize, Pos, SimError, SimHandle, Snapshot};

use canvas::Canvas;
mod canvas;

/// Rows kept at the bottom of the screen for the status and help lines.
const STATUS_ROWS: usize = 2;
const DENSITY_STEP: u32 = 5;
const HELP: &str = "q quit | space run/pause | n step | r reset | g generate | s/m/l size | +/- density | f/d faster/slower | arrows move | t toggle";

pub struct View {
    thread: JoinHandle<Result<()>>,
}

impl View {
    pub fn spawn(handle: SimHandle, density: u32, size: PopulationSize) -> Self {
        let state = ViewState::new(density, size);
        let thread = thread::spawn(move || view_loop(handle, state));
        Self { thread }
    }

    pub fn join(self) -> Result<()> {
        self.thread
            .join()
            .map_err(|_| anyhow::anyhow!("view thread panicked"))?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    Accelerate,
    Decelerate,
    RunPause,
    Step,
    Reset,
    Generate,
    Size(PopulationSize),
    Density(i32),
    ToggleCell,
}

impl InputCmd {
    fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Char('q') | Key::Ctrl('c') => InputCmd::Exit,
            Key::Up => InputCmd::Move(Dir::Up),
            Key::Down => InputCmd::Move(Dir::Down),
            Key::Left => InputCmd::Move(Dir::Left),
            Key::Right => InputCmd::Move(Dir::Right),
            Key::Char('f') => InputCmd::Accelerate,
            Key::Char('d') => InputCmd::Decelerate,
            Key::Char(' ') => InputCmd::RunPause,
            Key::Char('n') => InputCmd::Step,
            Key::Char('r') => InputCmd::Reset,
            Key::Char('g') => InputCmd::Generate,
            Key::Char('s') => InputCmd::Size(PopulationSize::Small),
            Key::Char('m') => InputCmd::Size(PopulationSize::Medium),
            Key::Char('l') => InputCmd::Size(PopulationSize::Large),
            Key::Char('+') | Key::Char('=') => InputCmd::Density(DENSITY_STEP as i32),
            Key::Char('-') => InputCmd::Density(-(DENSITY_STEP as i32)),
            Key::Char('t') | Key::Char('\n') => InputCmd::ToggleCell,
            _ => return None,
        };
        Some(command)
    }
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    for key in stdin().keys() {
        let Ok(key) = key else { break };
        let Some(command) = InputCmd::from_key(key) else {
            continue;
        };
        if sender.send(command).is_err() {
            break;
        }
    }
}

/// What the view remembers between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewState {
    origin: Pos,
    cursor: Pos,
    density: u32,
    size: PopulationSize,
    message: String,
}

impl ViewState {
    fn new(density: u32, size: PopulationSize) -> Self {
        Self {
            origin: pos!(0, 0),
            cursor: pos!(0, 0),
            density: density.min(MAX_DENSITY),
            size,
            message: String::new(),
        }
    }

    /// clamps the density before it ever reaches the grid.
    fn shift_density(&mut self, delta: i32) {
        self.density = (self.density as i32 + delta).clamp(0, MAX_DENSITY as i32) as u32;
    }

    fn move_cursor(&mut self, dir: Dir, rows: usize, cols: usize) {
        let Pos { row, col } = self.cursor;
        self.cursor = match dir {
            Dir::Up => pos!(row.saturating_sub(1), col),
            Dir::Down => pos!((row + 1).min(rows - 1), col),
            Dir::Left => pos!(row, col.saturating_sub(1)),
            Dir::Right => pos!(row, (col + 1).min(cols - 1)),
        };
    }

    /// scrolls the window of `height` x `width` cells so the cursor stays visible.
    fn follow_cursor(&mut self, height: usize, width: usize) {
        self.origin.row = follow(self.origin.row, self.cursor.row, height);
        self.origin.col = follow(self.origin.col, self.cursor.col, width);
    }
}

fn follow(origin: usize, cursor: usize, span: usize) -> usize {
    if cursor < origin {
        cursor
    } else if span > 0 && cursor >= origin + span {
        cursor + 1 - span
    } else {
        origin
    }
}

const VIEW_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

fn view_loop(handle: SimHandle, mut state: ViewState) -> Result<()> {
    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(move || input_loop(sender));

    let raw = stdout()
        .into_raw_mode()
        .context("failed to switch the terminal to raw mode")?;
    let mut screen = AlternateScreen::from(raw);
    write!(screen, "{}", termion::cursor::Hide)?;

    let result = run(&handle, &receiver, &mut state, &mut screen);

    write!(screen, "{}", termion::cursor::Show)?;
    screen.flush()?;
    result
}

fn run(
    handle: &SimHandle,
    receiver: &mpsc::Receiver<InputCmd>,
    state: &mut ViewState,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        let snapshot = match handle.snapshot() {
            Ok(snapshot) => snapshot,
            Err(SimError::Disconnected) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        while let Ok(cmd) = receiver.try_recv() {
            if !handle_input(handle, cmd, state, &snapshot)? {
                info!("leaving the view");
                handle.shutdown().ok();
                return Ok(());
            }
        }

        let snapshot = handle.snapshot()?;
        let mut canvas = Canvas::from_screen()?;
        draw(&mut canvas, &snapshot, state);
        canvas.display(out)?;
        thread::sleep(VIEW_REFRESH_INTERVAL);
    }
}

/// applies one command, `false` once the view should close.
fn handle_input(
    handle: &SimHandle,
    cmd: InputCmd,
    state: &mut ViewState,
    snapshot: &Snapshot,
) -> Result<bool> {
    debug!(?cmd, "input");
    let grid = &snapshot.grid;
    let outcome = match cmd {
        InputCmd::Exit => return Ok(false),
        InputCmd::Move(dir) => {
            state.move_cursor(dir, grid.rows(), grid.cols());
            Ok(())
        }
        // the loop owns running and interval, several keys per frame stack.
        InputCmd::Accelerate => handle.faster(),
        InputCmd::Decelerate => handle.slower(),
        InputCmd::RunPause => handle.run_pause(),
        InputCmd::Step => handle.step(),
        InputCmd::Reset => handle.reset(),
        InputCmd::Generate => handle.seed(state.size, state.density).map(|_| ()),
        InputCmd::Size(size) => {
            state.size = size;
            Ok(())
        }
        InputCmd::Density(delta) => {
            state.shift_density(delta);
            Ok(())
        }
        InputCmd::ToggleCell => handle.toggle(state.cursor).map(|_| ()),
    };

    state.message = match outcome {
        Ok(()) => String::new(),
        Err(SimError::Disconnected) => return Ok(false),
        Err(err) => err.to_string(),
    };
    Ok(true)
}

fn draw(canvas: &mut Canvas, snapshot: &Snapshot, state: &mut ViewState) {
    let grid = &snapshot.grid;
    let height = canvas.height().saturating_sub(STATUS_ROWS);
    state.follow_cursor(height, canvas.width());

    let origin = state.origin;
    let cursor = state.cursor;
    canvas.layer(|Pos { row, col }| {
        if row >= height {
            return None;
        }
        let pos = pos!(origin.row + row, origin.col + col);
        let alive = grid.is_alive(pos).ok()?;
        Some(match (pos == cursor, alive) {
            (true, true) => '@',
            (true, false) => '+',
            (false, true) => '#',
            (false, false) => '.',
        })
    });
    canvas.text(pos!(height, 0), &status_line(snapshot, state));
    canvas.text(pos!(height + 1, 0), HELP);
}

fn status_line(snapshot: &Snapshot, state: &ViewState) -> String {
    let grid = &snapshot.grid;
    let mode = match (snapshot.running, snapshot.cycle_detected) {
        (true, _) => "running",
        (false, true) => "paused (cycle)",
        (false, false) => "paused",
    };
    format!(
        "generation {} | population {} | density {}% | size {} | {} | {}ms | cursor {} {}",
        grid.generation(),
        grid.population(),
        state.density,
        state.size,
        mode,
        snapshot.tick_interval.as_millis(),
        state.cursor,
        state.message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use golgrid::{Config, Grid, Sim};

    #[test]
    fn density_is_clamped() {
        let mut state = ViewState::new(95, PopulationSize::Medium);
        state.shift_density(5);
        state.shift_density(5);
        assert_eq!(state.density, 100);
        let mut state = ViewState::new(3, PopulationSize::Medium);
        state.shift_density(-5);
        assert_eq!(state.density, 0);
        assert_eq!(ViewState::new(250, PopulationSize::Small).density, 100);
    }

    #[test]
    fn cursor_stays_in_grid() {
        let mut state = ViewState::new(50, PopulationSize::Medium);
        state.move_cursor(Dir::Up, 3, 3);
        state.move_cursor(Dir::Left, 3, 3);
        assert_eq!(state.cursor, pos!(0, 0));
        for _ in 0..5 {
            state.move_cursor(Dir::Down, 3, 3);
            state.move_cursor(Dir::Right, 3, 3);
        }
        assert_eq!(state.cursor, pos!(2, 2));
    }

    #[test]
    fn window_follows_cursor() {
        assert_eq!(follow(0, 4, 10), 0);
        assert_eq!(follow(0, 12, 10), 3);
        assert_eq!(follow(5, 2, 10), 2);
        assert_eq!(follow(5, 14, 10), 5);
    }

    #[test]
    fn maps_keys() {
        assert_eq!(InputCmd::from_key(Key::Char('q')), Some(InputCmd::Exit));
        assert_eq!(
            InputCmd::from_key(Key::Char('l')),
            Some(InputCmd::Size(PopulationSize::Large))
        );
        assert_eq!(InputCmd::from_key(Key::Char('-')), Some(InputCmd::Density(-5)));
        assert_eq!(InputCmd::from_key(Key::Char('x')), None);
    }

    #[test]
    fn queued_keys_see_their_predecessors() {
        let config = Config {
            tick_interval: Duration::from_millis(200),
            ..Config::default()
        };
        let sim = Sim::spawn(Grid::new(5, 5).unwrap(), config);
        let handle = sim.handle();
        let snapshot = handle.snapshot().unwrap();
        let mut state = ViewState::new(50, PopulationSize::Medium);
        for cmd in [InputCmd::RunPause, InputCmd::RunPause] {
            assert!(handle_input(&handle, cmd, &mut state, &snapshot).unwrap());
        }
        for cmd in [InputCmd::Accelerate, InputCmd::Accelerate] {
            assert!(handle_input(&handle, cmd, &mut state, &snapshot).unwrap());
        }
        let after = handle.snapshot().unwrap();
        assert!(!after.running);
        assert_eq!(after.tick_interval, Duration::from_millis(50));
        assert!(!handle_input(&handle, InputCmd::Exit, &mut state, &snapshot).unwrap());
        sim.join().unwrap();
    }

    #[test]
    fn draws_grid_and_status() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.toggle(pos!(0, 1)).unwrap();
        grid.toggle(pos!(1, 1)).unwrap();
        let snapshot = Snapshot {
            grid,
            running: false,
            cycle_detected: false,
            tick_interval: Duration::from_millis(200),
        };
        let mut state = ViewState::new(50, PopulationSize::Medium);
        let mut canvas = Canvas::new(6, 5);
        draw(&mut canvas, &snapshot, &mut state);
        assert_eq!(canvas.line(0), "+#..  ");
        assert_eq!(canvas.line(1), ".#..  ");
        assert_eq!(canvas.line(2), "....  ");
        assert_eq!(canvas.line(3), "genera");
        assert!(status_line(&snapshot, &state).contains("population 2"));
    }
}
