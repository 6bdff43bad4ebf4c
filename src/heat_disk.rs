//! Soft radial "heat disk" images for the thermal zone.
//!
//! The renderer drapes a radial gradient over the thermal radius. Generating
//! the pixmap is comparatively expensive, so images are memoized by size and
//! colour in a small cache that evicts the oldest inserted entry.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bevy::log::debug;
use bevy::prelude::Resource;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, SpreadMode,
    Transform,
};

/// Largest image edge accepted (pixels).
pub const MAX_HEAT_DISK_SIZE: u32 = 4096;

/// Default number of cached images.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Default mid-gradient colour: rgba(255, 140, 0, 0.8).
pub const DEFAULT_HEAT_COLOR: [u8; 4] = [255, 140, 0, 204];

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HeatDiskError {
    #[error("invalid heat disk size {0} (must be 1..=4096)")]
    InvalidSize(u32),

    #[error("failed to build radial gradient")]
    Gradient,

    #[error("failed to build disk path")]
    Path,
}

/// Render a radial gradient disk of `size`×`size` pixels.
///
/// Stops: white at the center, `color` at 25%, faint orange at 60% and fully
/// transparent at the rim. Pixels outside the disk stay transparent.
pub fn render_heat_disk(size: u32, color: [u8; 4]) -> Result<Pixmap, HeatDiskError> {
    if size == 0 || size > MAX_HEAT_DISK_SIZE {
        return Err(HeatDiskError::InvalidSize(size));
    }
    let mut pixmap = Pixmap::new(size, size).ok_or(HeatDiskError::InvalidSize(size))?;

    let half = size as f32 / 2.0;
    let center = Point::from_xy(half, half);
    let stops = vec![
        GradientStop::new(0.0, Color::from_rgba8(255, 255, 255, 242)),
        GradientStop::new(0.25, Color::from_rgba8(color[0], color[1], color[2], color[3])),
        GradientStop::new(0.6, Color::from_rgba8(255, 120, 0, 64)),
        GradientStop::new(1.0, Color::from_rgba8(255, 120, 0, 0)),
    ];
    let shader = RadialGradient::new(
        center,
        center,
        half,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
        .ok_or(HeatDiskError::Gradient)?;

    let paint = Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    };
    let path = PathBuilder::from_circle(half, half, half).ok_or(HeatDiskError::Path)?;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    Ok(pixmap)
}

/// Cache key: image edge length and RGBA colour.
pub type HeatDiskKey = (u32, [u8; 4]);

/// Bounded memo of rendered heat disks.
///
/// Eviction follows insertion order: a cache hit does not make an entry
/// younger.
#[derive(Resource)]
pub struct HeatDiskCache {
    capacity: usize,
    images: HashMap<HeatDiskKey, Arc<Pixmap>>,
    order: VecDeque<HeatDiskKey>,
}

impl Default for HeatDiskCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl HeatDiskCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            images: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains(&self, size: u32, color: [u8; 4]) -> bool {
        self.images.contains_key(&(size, color))
    }

    /// Return the cached image for `(size, color)`, rendering it on a miss.
    pub fn get_or_render(
        &mut self,
        size: u32,
        color: [u8; 4],
    ) -> Result<Arc<Pixmap>, HeatDiskError> {
        let key = (size, color);
        if let Some(image) = self.images.get(&key) {
            return Ok(Arc::clone(image));
        }

        let image = Arc::new(render_heat_disk(size, color)?);
        while self.images.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else { break };
            self.images.remove(&oldest);
            debug!("Evicted heat disk {:?}", oldest);
        }
        self.images.insert(key, Arc::clone(&image));
        self.order.push_back(key);
        Ok(image)
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.order.clear();
    }
}
