use crate::error::{Result, TurmiteError};
use crate::rule::TurnRule;

/// Color index stored in every grid cell
pub type ColorIndex = u8;

/// Largest palette that 8-bit grayscale can encode without collisions
pub const MAX_PALETTE_SIZE: usize = 256;

/// Ordered colors and their parallel turn rules
///
/// Built once at startup and shared read-only with the simulation and renderer.
#[derive(Debug, Clone)]
pub struct Palette {
    intensities: Vec<u8>,
    rules: Vec<TurnRule>,
    /// intensity -> color index, for decoding rendered images
    reverse: [Option<ColorIndex>; 256],
}

impl Palette {
    /// Build the default palette of `size` colors.
    ///
    /// Intensity falls linearly from 255 (index 0) to 0 (index size-1);
    /// turn rules follow `TurnRule::for_index`.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_rules(size, TurnRule::for_index)
    }

    /// Build a palette with a custom rule policy, keeping the default intensities
    pub fn with_rules<F>(size: usize, rule_for: F) -> Result<Self>
    where
        F: Fn(usize) -> TurnRule,
    {
        if !(2..=MAX_PALETTE_SIZE).contains(&size) {
            return Err(TurmiteError::InvalidPaletteSize { size });
        }

        let intensities: Vec<u8> = (0..size).map(|i| intensity_for(i, size)).collect();
        let rules: Vec<TurnRule> = (0..size).map(rule_for).collect();

        let mut reverse = [None; 256];
        for (index, &value) in intensities.iter().enumerate() {
            if let Some(first) = reverse[value as usize] {
                return Err(TurmiteError::NonInjectivePalette {
                    first: first as usize,
                    second: index,
                    value,
                });
            }
            reverse[value as usize] = Some(index as ColorIndex);
        }

        Ok(Palette {
            intensities,
            rules,
            reverse,
        })
    }

    /// Number of colors (N)
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    /// Grayscale intensity for a color index
    pub fn intensity(&self, index: ColorIndex) -> u8 {
        self.intensities[index as usize]
    }

    /// Display value as RGBA: intensity replicated across channels, fully opaque
    pub fn display_value(&self, index: ColorIndex) -> [u8; 4] {
        let g = self.intensity(index);
        [g, g, g, 0xff]
    }

    pub fn rule(&self, index: ColorIndex) -> TurnRule {
        self.rules[index as usize]
    }

    pub fn rules(&self) -> &[TurnRule] {
        &self.rules
    }

    /// Index following `index`, wrapping at N
    pub fn next(&self, index: ColorIndex) -> ColorIndex {
        ((index as usize + 1) % self.len()) as ColorIndex
    }

    /// Reverse lookup of a display value.
    ///
    /// Returns None unless the pixel is an opaque gray present in the palette.
    pub fn index_of(&self, rgba: [u8; 4]) -> Option<ColorIndex> {
        let [r, g, b, a] = rgba;
        if r != g || g != b || a != 0xff {
            return None;
        }
        self.reverse[r as usize]
    }

    /// Compact rule listing, e.g. "RLLRRLLR"
    pub fn rule_string(&self) -> String {
        self.rules.iter().map(|rule| rule.symbol()).collect()
    }
}

fn intensity_for(index: usize, size: usize) -> u8 {
    (0xff - index * 0xff / (size - 1)) as u8
}
