//! Grain colour palettes.

use grain_core::{GrainError, GrainId};
use rand::seq::SliceRandom;
use rand::Rng;

/// An RGBA8 colour.
pub type Rgba = [u8; 4];

/// Colour of empty cells.
pub const BACKGROUND: Rgba = [255, 255, 255, 255];

/// Colour of inclusion cells.
pub const INCLUSION: Rgba = [0, 0, 0, 255];

/// Colour of recrystallized cells when highlighting is on.
pub const HIGHLIGHT: Rgba = [255, 0, 0, 255];

/// Largest palette [`Palette::new`] will build.
pub const MAX_SIZE: usize = 1 << 16;

/// Default palette size.
pub const DEFAULT_SIZE: usize = 256;

// Channel range for grain colours. Keeps every palette entry clear of the
// reserved background, inclusion and highlight colours.
const CHANNEL_MIN: u32 = 40;
const CHANNEL_MAX: u32 = 220;

/// An ordered list of distinct grain colours, indexed by id modulo its
/// length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Build `size` distinct colours and shuffle them once with `rng`, so
    /// neighbouring ids rarely get similar colours.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `size` is zero or above [`MAX_SIZE`].
    pub fn new<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Result<Self, GrainError> {
        if size == 0 || size > MAX_SIZE {
            return Err(GrainError::invalid(format!(
                "palette size must be in 1..={MAX_SIZE}, got {size}"
            )));
        }
        let mut colors = lattice(size);
        colors.shuffle(rng);
        Ok(Self { colors })
    }

    /// Number of colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes hold at least one colour.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for grain `id`.
    pub fn color(&self, id: GrainId) -> Rgba {
        self.colors[(id.get() % self.colors.len() as u64) as usize]
    }

    /// All colours in palette order.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

/// The first `size` points of the smallest RGB lattice with at least
/// `size` points, spanning `CHANNEL_MIN..=CHANNEL_MAX` on every channel.
fn lattice(size: usize) -> Vec<Rgba> {
    let mut levels = 2u32;
    while (levels as usize).pow(3) < size {
        levels += 1;
    }
    let step = (CHANNEL_MAX - CHANNEL_MIN) / (levels - 1);
    let level = |k: u32| (CHANNEL_MIN + k * step) as u8;

    let mut colors = Vec::with_capacity(size);
    'fill: for r in 0..levels {
        for g in 0..levels {
            for b in 0..levels {
                if colors.len() == size {
                    break 'fill;
                }
                colors.push([level(r), level(g), level(b), 255]);
            }
        }
    }
    colors
}
