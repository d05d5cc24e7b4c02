/// Fixed-capacity circular buffer. Pre-allocated, no heap allocs after init.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// `capacity` is raised to 1 if zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Overwrites the oldest value once full.
    pub fn push(&mut self, value: T) {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let start = if self.len < self.capacity {
            0
        } else {
            self.head
        };
        let cap = self.capacity;
        let len = self.len;
        (0..len).map(move |i| &self.buf[(start + i) % cap])
    }
}

/// Mean / min / max over a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl RingBuffer<f64> {
    /// `None` while empty.
    pub fn stats(&self) -> Option<WindowStats> {
        if self.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for &v in self.iter() {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        Some(WindowStats {
            mean: sum / self.len as f64,
            min,
            max,
        })
    }
}
