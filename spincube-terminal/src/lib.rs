/// Terminal host for the spincube programs
use anyhow::{bail, Context};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use spincube_core::{DrawLoop, DrawLoopConfig, Geometry, SceneConfig, SpinningCube, Viewport};
use std::io::{self, stdout, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use logging::{init_logging, LoggingConfig};
pub use renderer::SoftwareRenderer;

/// Which of the two cube programs to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Program {
    /// Fixed buffers, one indexed draw, rotation +0.01 per frame.
    #[default]
    RawPipeline,
    /// Scene, camera and a spinning entity, rotation -0.01 per frame.
    SceneGraph,
}

impl FromStr for Program {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "raw" => Ok(Program::RawPipeline),
            "scene" => Ok(Program::SceneGraph),
            other => bail!("unknown program `{}` (expected `raw` or `scene`)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub program: Program,
    pub target_fps: u32,
    pub draw_loop: DrawLoopConfig,
    pub scene: SceneConfig,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            program: Program::default(),
            target_fps: 30,
            draw_loop: DrawLoopConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

enum Running {
    Raw(DrawLoop<SoftwareRenderer>),
    Scene(SpinningCube<SoftwareRenderer>),
}

impl Running {
    fn start(config: &TerminalConfig, viewport: &Viewport) -> anyhow::Result<Self> {
        let (width, height) = viewport.physical_size();
        let renderer = SoftwareRenderer::new(width as usize, height as usize);
        Ok(match config.program {
            Program::RawPipeline => Running::Raw(
                DrawLoop::new(renderer, &Geometry::colored_cube(), config.draw_loop)
                    .context("failed to initialize raw pipeline")?,
            ),
            Program::SceneGraph => {
                Running::Scene(SpinningCube::new(renderer, &config.scene, viewport))
            }
        })
    }

    fn frame(&mut self, viewport: &Viewport) -> anyhow::Result<()> {
        match self {
            Running::Raw(draw_loop) => draw_loop.tick(viewport),
            Running::Scene(program) => program.frame(viewport)?,
        }
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport) {
        // The raw pipeline reads the aspect ratio every frame.
        if let Running::Scene(program) = self {
            program.resize(viewport);
        }
    }

    fn renderer(&self) -> &SoftwareRenderer {
        match self {
            Running::Raw(draw_loop) => draw_loop.renderer(),
            Running::Scene(program) => program.renderer(),
        }
    }
}

/// Terminal viewport: one pixel column per cell, two pixel rows per cell.
pub fn viewport_for(columns: u16, rows: u16) -> Viewport {
    Viewport::new(f32::from(columns), f32::from(rows) * 2.0, 1.0)
}

fn terminal_viewport() -> io::Result<Viewport> {
    let (columns, rows) = terminal::size()?;
    Ok(viewport_for(columns, rows))
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    program: Program,
    running: Running,
    viewport: Viewport,
    frame_time: Duration,
    active: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: TerminalConfig) -> anyhow::Result<Self> {
        let viewport = terminal_viewport().context("failed to query terminal size")?;
        let running = Running::start(&config, &viewport)?;
        log::info!("starting {:?} at {:?}", config.program, viewport);

        Ok(Self {
            program: config.program,
            running,
            viewport,
            frame_time: Duration::from_secs(1) / config.target_fps.max(1),
            active: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Both cleanup steps run even if one of them fails.
        let raw_mode = terminal::disable_raw_mode();
        let screen = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);

        finish(result, raw_mode, screen)
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        while self.active {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.running.frame(&self.viewport)?;
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }) => {
                self.active = false;
            }
            Event::Resize(columns, rows) => {
                self.viewport = viewport_for(columns, rows);
                self.running.resize(&self.viewport);
                log::debug!("resized to {}x{} cells", columns, rows);
            }
            _ => {}
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.running.renderer().present(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "spincube {} | FPS: {:.1} | Q=Quit",
                match self.program {
                    Program::RawPipeline => "raw pipeline",
                    Program::SceneGraph => "scene graph",
                },
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}

/// Combine the loop outcome with the terminal cleanup steps.
///
/// The first failure is returned; later cleanup failures are only logged.
fn finish(result: anyhow::Result<()>, raw_mode: io::Result<()>, screen: io::Result<()>) -> anyhow::Result<()> {
    let mut failures = [
        raw_mode.context("failed to leave raw mode").err(),
        screen.context("failed to leave the alternate screen").err(),
    ]
    .into_iter()
    .flatten();

    let first = match result {
        Err(err) => Some(err),
        Ok(()) => failures.next(),
    };
    for err in failures {
        log::warn!("terminal cleanup: {:#}", err);
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_parsing() {
        assert_eq!("raw".parse::<Program>().unwrap(), Program::RawPipeline);
        assert_eq!("scene".parse::<Program>().unwrap(), Program::SceneGraph);
        assert!("three".parse::<Program>().is_err());
    }

    #[test]
    fn test_viewport_doubles_rows() {
        let viewport = viewport_for(80, 24);
        assert_eq!(viewport.physical_size(), (80, 48));
        assert!((viewport.aspect() - 80.0 / 48.0).abs() < 1e-6);
    }

    #[test]
    fn test_both_programs_draw_through_software_renderer() {
        let viewport = viewport_for(40, 20);
        for program in [Program::RawPipeline, Program::SceneGraph] {
            let config = TerminalConfig {
                program,
                ..TerminalConfig::default()
            };
            let mut running = Running::start(&config, &viewport).unwrap();
            running.frame(&viewport).unwrap();

            let renderer = running.renderer();
            assert_eq!(renderer.size(), (40, 40));
            let lit = (0..40)
                .flat_map(|y| (0..40).map(move |x| (x, y)))
                .filter(|&(x, y)| renderer.pixel(x, y) != Some(spincube_core::Color::BLACK))
                .count();
            assert!(lit > 0, "{:?} drew nothing", program);
        }
    }

    fn tty_gone() -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "tty gone"))
    }

    #[test]
    fn test_cleanup_failure_reported_after_clean_loop() {
        let err = finish(Ok(()), tty_gone(), tty_gone()).unwrap_err();
        assert_eq!(err.to_string(), "failed to leave raw mode");

        let err = finish(Ok(()), Ok(()), tty_gone()).unwrap_err();
        assert_eq!(err.to_string(), "failed to leave the alternate screen");
    }

    #[test]
    fn test_loop_error_wins_over_cleanup_failure() {
        let err = finish(Err(anyhow::anyhow!("render failed")), tty_gone(), Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "render failed");
        assert!(finish(Ok(()), Ok(()), Ok(())).is_ok());
    }
}
