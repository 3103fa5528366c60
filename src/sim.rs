use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{Config, Grid, GridError, Pattern, PopulationSize, Pos, SimError};

use history::History;
mod history;

/// What a client sees of the simulation at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub grid: Grid,
    pub running: bool,
    pub cycle_detected: bool,
    pub tick_interval: Duration,
}

pub type Reply<T> = mpsc::Sender<Result<T, SimError>>;

pub enum SimCmd {
    Snapshot(mpsc::Sender<Snapshot>),
    Step,
    Run,
    Pause,
    /// runs when paused, pauses when running.
    RunPause,
    Reset,
    SetInterval(Duration),
    /// halves the current tick interval.
    Faster,
    /// doubles the current tick interval.
    Slower,
    Toggle(Pos, Reply<bool>),
    SetAlive(Pos, bool, Reply<bool>),
    Seed {
        size: PopulationSize,
        density: u32,
        reply: Reply<u64>,
    },
    Stamp {
        pattern: Pattern,
        origin: Pos,
        reply: Reply<()>,
    },
    Shutdown,
}

/// Cloneable access to a spawned simulation.
#[derive(Debug, Clone)]
pub struct SimHandle {
    sender: mpsc::Sender<SimCmd>,
}

impl SimHandle {
    pub fn new(sender: mpsc::Sender<SimCmd>) -> Self {
        Self { sender }
    }

    fn send(&self, cmd: SimCmd) -> Result<(), SimError> {
        self.sender.send(cmd).map_err(|_| SimError::Disconnected)
    }

    fn request<T>(&self, cmd: impl FnOnce(Reply<T>) -> SimCmd) -> Result<T, SimError> {
        let (sender, receiver) = mpsc::channel();
        self.send(cmd(sender))?;
        receiver.recv().map_err(|_| SimError::Disconnected)?
    }

    pub fn snapshot(&self) -> Result<Snapshot, SimError> {
        let (sender, receiver) = mpsc::channel();
        self.send(SimCmd::Snapshot(sender))?;
        receiver.recv().map_err(|_| SimError::Disconnected)
    }

    pub fn step(&self) -> Result<(), SimError> {
        self.send(SimCmd::Step)
    }

    pub fn run(&self) -> Result<(), SimError> {
        self.send(SimCmd::Run)
    }

    pub fn pause(&self) -> Result<(), SimError> {
        self.send(SimCmd::Pause)
    }

    pub fn run_pause(&self) -> Result<(), SimError> {
        self.send(SimCmd::RunPause)
    }

    pub fn faster(&self) -> Result<(), SimError> {
        self.send(SimCmd::Faster)
    }

    pub fn slower(&self) -> Result<(), SimError> {
        self.send(SimCmd::Slower)
    }

    pub fn reset(&self) -> Result<(), SimError> {
        self.send(SimCmd::Reset)
    }

    pub fn set_interval(&self, interval: Duration) -> Result<(), SimError> {
        self.send(SimCmd::SetInterval(interval))
    }

    pub fn toggle(&self, pos: Pos) -> Result<bool, SimError> {
        self.request(|reply| SimCmd::Toggle(pos, reply))
    }

    pub fn set_alive(&self, pos: Pos, alive: bool) -> Result<bool, SimError> {
        self.request(|reply| SimCmd::SetAlive(pos, alive, reply))
    }

    /// regenerates the preset's region, returns the new population.
    pub fn seed(&self, size: PopulationSize, density: u32) -> Result<u64, SimError> {
        self.request(|reply| SimCmd::Seed {
            size,
            density,
            reply,
        })
    }

    pub fn stamp(&self, pattern: Pattern, origin: Pos) -> Result<(), SimError> {
        self.request(|reply| SimCmd::Stamp {
            pattern,
            origin,
            reply,
        })
    }

    pub fn shutdown(&self) -> Result<(), SimError> {
        self.send(SimCmd::Shutdown)
    }
}

/// A thread owning the grid, stepping it on a timer while running and
/// applying the commands of its handles in between steps.
#[derive(Debug)]
pub struct Sim {
    thread: JoinHandle<Grid>,
    sender: mpsc::Sender<SimCmd>,
}

impl Sim {
    pub fn spawn(grid: Grid, config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let driver = Driver {
            grid,
            rng,
            config,
            running: false,
            cycle_detected: false,
            last_update: Instant::now(),
            history: History::default(),
        };

        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, driver));

        Self { sender, thread }
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle::new(self.sender.clone())
    }

    /// stops the loop, even with handles still alive, and hands back the grid.
    pub fn join(self) -> thread::Result<Grid> {
        let _ = self.sender.send(SimCmd::Shutdown);
        drop(self.sender);
        self.thread.join()
    }
}

const EVT_CHECK_TIMEOUT: Duration = Duration::from_millis(10);
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(5);

struct Driver {
    grid: Grid,
    rng: StdRng,
    config: Config,
    running: bool,
    cycle_detected: bool,
    last_update: Instant,
    history: History,
}

impl Driver {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            running: self.running,
            cycle_detected: self.cycle_detected,
            tick_interval: self.config.tick_interval,
        }
    }

    fn handle(&mut self, cmd: SimCmd) {
        match cmd {
            SimCmd::Snapshot(sender) => {
                let _ = sender.send(self.snapshot());
            }
            SimCmd::Step => self.tick(),
            SimCmd::Run => self.run(),
            SimCmd::Pause => self.pause(),
            SimCmd::RunPause if self.running => self.pause(),
            SimCmd::RunPause => self.run(),
            SimCmd::Reset => {
                info!("grid reset");
                self.running = false;
                self.grid.reset();
                self.forget();
            }
            SimCmd::SetInterval(interval) => {
                debug!(?interval, "tick interval changed");
                self.config.tick_interval = interval;
            }
            SimCmd::Faster => {
                let interval = (self.config.tick_interval / 2).max(MIN_TICK_INTERVAL);
                self.handle(SimCmd::SetInterval(interval));
            }
            SimCmd::Slower => {
                let interval = (self.config.tick_interval * 2).min(MAX_TICK_INTERVAL);
                self.handle(SimCmd::SetInterval(interval));
            }
            SimCmd::Toggle(pos, reply) => {
                let _ = reply.send(self.edit(|grid| grid.toggle(pos)));
            }
            SimCmd::SetAlive(pos, alive, reply) => {
                let _ = reply.send(self.edit(|grid| grid.set_alive(pos, alive)));
            }
            SimCmd::Seed {
                size,
                density,
                reply,
            } => {
                let _ = reply.send(self.seed(size, density));
            }
            SimCmd::Stamp {
                pattern,
                origin,
                reply,
            } => {
                let _ = reply.send(self.edit(|grid| pattern.stamp(grid, origin)));
            }
            SimCmd::Shutdown => (),
        }
    }

    fn run(&mut self) {
        info!(generation = self.grid.generation(), "simulation started");
        self.running = true;
        self.cycle_detected = false;
        self.last_update = Instant::now();
    }

    fn pause(&mut self) {
        info!(generation = self.grid.generation(), "simulation paused");
        self.running = false;
    }

    fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut Grid) -> Result<T, GridError>,
    ) -> Result<T, SimError> {
        if self.running {
            return Err(SimError::Running);
        }
        let result = f(&mut self.grid)?;
        self.forget();
        Ok(result)
    }

    fn seed(&mut self, size: PopulationSize, density: u32) -> Result<u64, SimError> {
        let region = size.region(self.grid.rows(), self.grid.cols());
        let population = self
            .grid
            .seed_random(Some(region), density, &mut self.rng)?;
        info!(%size, density, population, "population generated");
        self.forget();
        Ok(population)
    }

    fn forget(&mut self) {
        self.history.clear();
        self.cycle_detected = false;
    }

    fn tick(&mut self) {
        if self.history.is_empty() {
            self.history.record(&self.grid);
        }
        self.grid.advance_generation();
        self.last_update = Instant::now();
        debug!(
            generation = self.grid.generation(),
            population = self.grid.population(),
            "generation advanced"
        );

        if self.history.record(&self.grid) && !self.cycle_detected {
            self.cycle_detected = true;
            warn!(
                generation = self.grid.generation(),
                population = self.grid.population(),
                "grid is cycling"
            );
            if self.running && self.config.stop_on_cycle {
                info!("simulation paused on cycle");
                self.running = false;
            }
        }
    }
}

fn sim_loop(receiver: mpsc::Receiver<SimCmd>, mut driver: Driver) -> Grid {
    loop {
        match receiver.recv_timeout(EVT_CHECK_TIMEOUT) {
            Ok(SimCmd::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(cmd) => driver.handle(cmd),
            Err(RecvTimeoutError::Timeout) => (),
        }

        if driver.running && driver.last_update.elapsed() >= driver.config.tick_interval {
            driver.tick();
        }
    }
    info!(generation = driver.grid.generation(), "simulation stopped");
    driver.grid
}
