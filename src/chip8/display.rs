pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
pub const PIXEL_OFF: u32 = 0x0000_0000;

pub const LORES_WIDTH: usize = 64;
pub const LORES_HEIGHT: usize = 32;
pub const HIRES_WIDTH: usize = 128;
pub const HIRES_HEIGHT: usize = 64;

/// Which of the two surfaces is being drawn to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Low,
    High,
}

impl Resolution {
    fn index(self) -> usize {
        match self {
            Resolution::Low => 0,
            Resolution::High => 1,
        }
    }

    /// Addressable sprite grid in this mode.
    pub fn logical_width(self) -> usize {
        match self {
            Resolution::Low => LORES_WIDTH,
            Resolution::High => HIRES_WIDTH,
        }
    }
}

/// One-bit-per-pixel surface stored as 32-bit sentinels so renderers can blit
/// it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Box<[u32]>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PIXEL_OFF; width * height].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel data, `width * height` long.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x] == PIXEL_ON
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == PIXEL_OFF)
    }

    pub fn clear(&mut self) {
        for p in self.pixels.iter_mut() {
            *p = PIXEL_OFF;
        }
    }

    // xor one pixel, true if it was on before (and is now erased)
    fn toggle(&mut self, x: usize, y: usize) -> bool {
        let p = &mut self.pixels[y * self.width + x];
        let collided = *p == PIXEL_ON;
        *p ^= PIXEL_ON;
        collided
    }

    fn clear_range(&mut self, start: usize, end: usize) {
        for p in self.pixels[start..end].iter_mut() {
            *p = PIXEL_OFF;
        }
    }

    fn scroll_down(&mut self, n: usize) {
        let n = n.min(self.height);
        let w = self.width;
        self.pixels.copy_within(0..(self.height - n) * w, n * w);
        self.clear_range(0, n * w);
    }

    fn scroll_up(&mut self, n: usize) {
        let n = n.min(self.height);
        let w = self.width;
        let len = self.pixels.len();
        self.pixels.copy_within(n * w..len, 0);
        self.clear_range(len - n * w, len);
    }

    fn scroll_right(&mut self, n: usize) {
        let w = self.width;
        let n = n.min(w);
        for row in self.pixels.chunks_mut(w) {
            row.copy_within(0..row.len() - n, n);
            for p in row[..n].iter_mut() {
                *p = PIXEL_OFF;
            }
        }
    }

    fn scroll_left(&mut self, n: usize) {
        let w = self.width;
        let n = n.min(w);
        for row in self.pixels.chunks_mut(w) {
            let len = row.len();
            row.copy_within(n..len, 0);
            for p in row[len - n..].iter_mut() {
                *p = PIXEL_OFF;
            }
        }
    }
}

/// Normal and extended surfaces; the resolution picks which one every
/// draw, scroll and clear touches. Switching never clears either buffer.
#[derive(Debug, Clone)]
pub struct Display {
    surfaces: [Framebuffer; 2],
    resolution: Resolution,
}

impl Display {
    /// With `upscale_lores` the normal surface is 128x64 and low-res sprites
    /// are scaled by two.
    pub fn new(upscale_lores: bool) -> Self {
        let lores = if upscale_lores {
            Framebuffer::new(HIRES_WIDTH, HIRES_HEIGHT)
        } else {
            Framebuffer::new(LORES_WIDTH, LORES_HEIGHT)
        };
        Self {
            surfaces: [lores, Framebuffer::new(HIRES_WIDTH, HIRES_HEIGHT)],
            resolution: Resolution::Low,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    pub fn active(&self) -> &Framebuffer {
        &self.surfaces[self.resolution.index()]
    }

    fn active_mut(&mut self) -> &mut Framebuffer {
        &mut self.surfaces[self.resolution.index()]
    }

    pub fn surface(&self, resolution: Resolution) -> &Framebuffer {
        &self.surfaces[resolution.index()]
    }

    /// Screen pixels per logical sprite pixel on the active surface.
    pub fn scale(&self) -> usize {
        (self.active().width / self.resolution.logical_width()).max(1)
    }

    pub fn clear(&mut self) {
        self.active_mut().clear();
    }

    /// XOR an 8-pixel-wide sprite at (x, y), one byte per row, wrapping on
    /// both axes. With `dots` an upscaled sprite sets a single pixel at each
    /// scaled position instead of a 2x2 block. Returns true on any collision.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8], dots: bool) -> bool {
        let scale = self.scale();
        let surface = self.active_mut();
        let (w, h) = (surface.width, surface.height);
        let ox = (usize::from(x) * scale) % w;
        let oy = (usize::from(y) * scale) % h;

        let mut collision = false;
        for (row, byte) in rows.iter().enumerate() {
            for col in 0..8 {
                if byte & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (ox + col * scale) % w;
                let py = (oy + row * scale) % h;
                if scale == 1 || dots {
                    collision |= surface.toggle(px, py);
                } else {
                    for &(dx, dy) in &[(0, 0), (1, 0), (0, 1), (1, 1)] {
                        collision |= surface.toggle((px + dx) % w, (py + dy) % h);
                    }
                }
            }
        }
        collision
    }

    /// XOR a 16x16 sprite (32 bytes, two big-endian bytes per row) at (x, y)
    /// without any scaling.
    pub fn draw_large_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let surface = self.active_mut();
        let (w, h) = (surface.width, surface.height);
        let ox = usize::from(x) % w;
        let oy = usize::from(y) % h;

        let mut collision = false;
        for (row, pair) in rows.chunks(2).enumerate() {
            let bits = match *pair {
                [hi, lo] => u16::from_be_bytes([hi, lo]),
                [hi] => u16::from(hi) << 8,
                _ => 0,
            };
            for col in 0..16 {
                if bits & (0x8000 >> col) != 0 {
                    collision |= surface.toggle((ox + col) % w, (oy + row) % h);
                }
            }
        }
        collision
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.active_mut().scroll_down(rows);
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.active_mut().scroll_up(rows);
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.active_mut().scroll_right(columns);
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.active_mut().scroll_left(columns);
    }
}
