use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use lru::LruCache;

const MEASURE_CACHE_SIZE: usize = 512;

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    weight: u16,
}

/// Width and height of a single-line label
pub trait TextMeasure {
    fn measure_label(&mut self, text: &str, font_size: f32, weight: u16) -> (f32, f32);
}

/// Shapes text with the system fonts
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    cache: LruCache<MeasureKey, (f32, f32)>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: LruCache::new(
                NonZeroUsize::new(MEASURE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_label(&mut self, text: &str, font_size: f32, weight: u16) -> (f32, f32) {
        let key = MeasureKey {
            text: text.to_string(),
            font_size_bits: font_size.to_bits(),
            weight,
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let line_height = font_size * 1.2;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(Weight(weight));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }

        let measured = (width, height.max(line_height));
        self.cache.put(key, measured);
        measured
    }
}

/// Fixed advance per character; used when no fonts are loaded
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    pub advance_ratio: f32,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure_label(&mut self, text: &str, font_size: f32, weight: u16) -> (f32, f32) {
        let bold_factor = if weight >= 600 { 1.08 } else { 1.0 };
        let width = text.chars().count() as f32 * font_size * self.advance_ratio * bold_factor;
        (width, font_size * 1.2)
    }
}
