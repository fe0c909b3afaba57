use std::io::Write;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::engine::{Engine, EngineConfig, Register};
use crate::error::RenderError;
use crate::memory::VIDEO_MEMORY;
use crate::metrics::{high_order_entropy, swatch_histogram};
use crate::operand::Operand;
use crate::renderer::{DEFAULT_WIDTH, Renderer, Swatch, UnmappedPolicy};

/// First byte of the video region.
pub const VIDEO_START: usize = 0x100;
/// One past the last byte of the video region.
pub const VIDEO_END: usize = 0x300;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Configuration for the noise-screen driver loop.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Frames to draw; `None` runs until the process is stopped.
    pub frames: Option<usize>,
    /// Pause after each frame.
    pub interval: Duration,
    /// Cells per rendered row.
    pub width: usize,
    pub unmapped: UnmappedPolicy,
    /// Log the video region's entropy after each frame.
    pub stats: bool,
    /// Clear the terminal before each frame.
    pub clear: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frames: None,
            interval: Duration::from_millis(200),
            width: DEFAULT_WIDTH,
            unmapped: UnmappedPolicy::Reject,
            stats: false,
            clear: true,
        }
    }
}

/// Fills the video region with random palette bytes through the engine and
/// redraws it, once per frame.
pub struct Driver {
    pub engine: Engine,
    renderer: Renderer,
    config: DriverConfig,
    rng: SmallRng,
}

impl Driver {
    pub fn new(config: DriverConfig, seed: u64) -> Result<Self, RenderError> {
        let renderer = Renderer::new(config.width, config.unmapped)?;
        let engine = Engine::new(EngineConfig {
            memory_size: VIDEO_MEMORY,
            ..Default::default()
        });
        Ok(Self {
            engine,
            renderer,
            config,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn video(&self) -> &[u8] {
        self.engine.memory().region(VIDEO_START, VIDEO_END)
    }

    /// Load a random palette byte into X and store it, for every cell of
    /// the video region.
    pub fn fill_frame(&mut self) {
        let palette = Swatch::ALL.map(Swatch::byte);
        for addr in VIDEO_START..VIDEO_END {
            let value = *palette.choose(&mut self.rng).unwrap_or(&0);
            self.engine.load(Register::X, Operand::Literal(value));
            self.engine.store(Register::X, addr as i64);
        }
    }

    /// Draw the video region to `out`.
    pub fn draw<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        if self.config.clear {
            write!(out, "{CLEAR_SCREEN}")?;
        }
        self.renderer.render(self.video(), out)
    }

    /// Draw the current video region as frame number `frame` and return
    /// whether it was drawn.
    ///
    /// A byte with no swatch is logged and the frame skipped; I/O failures
    /// are returned.
    pub fn present<W: Write>(&self, frame: usize, out: &mut W) -> Result<bool, RenderError> {
        let drawn = match self.draw(out) {
            Ok(()) => true,
            Err(RenderError::UnmappedByte { value, offset }) => {
                warn!(frame, value, offset, "skipping frame with unmapped byte");
                false
            }
            Err(e) => return Err(e),
        };

        if self.config.stats {
            let video = self.video();
            let hoe = high_order_entropy(video);
            let (swatches, unmapped) = swatch_histogram(video);
            info!(frame, hoe, ?swatches, unmapped, "frame");
        }
        Ok(drawn)
    }

    /// Run the configured number of frames and return how many were drawn.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<usize, RenderError> {
        let mut drawn = 0;
        let mut frame = 0usize;
        while self.config.frames.is_none_or(|n| frame < n) {
            frame += 1;
            self.fill_frame();
            if self.present(frame, out)? {
                drawn += 1;
            }

            if !self.config.interval.is_zero() {
                std::thread::sleep(self.config.interval);
            }
        }
        Ok(drawn)
    }
}
