use super::SampleFilter;

pub const DEFAULT_WINDOW: usize = 20;

// Moving-average smoothing over the last `capacity` raw samples. Used for
// every configured mode when the biquad engine is not selected.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buffer: Vec<f64>,
    capacity: usize,
    next: usize,
    len: usize,
    sum: f64,
    // Low-order bits lost from `sum` (Neumaier compensation).
    compensation: f64,
}

impl MovingAverage {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity],
            capacity,
            next: 0,
            len: 0,
            sum: 0.0,
            compensation: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn accumulate(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn push(&mut self, sample: f64) {
        if self.len == self.capacity {
            // Overwrite oldest
            let evicted = self.buffer[self.next];
            self.accumulate(-evicted);
        } else {
            self.len += 1;
        }
        self.buffer[self.next] = sample;
        self.accumulate(sample);
        self.next = (self.next + 1) % self.capacity;

        // Rebuild once per lap so the compensation term cannot grow unbounded.
        if self.next == 0 {
            self.sum = 0.0;
            self.compensation = 0.0;
            for i in 0..self.len {
                self.accumulate(self.buffer[i]);
            }
        }
    }

    /// Mean of the samples currently held, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        (self.sum + self.compensation) / self.len as f64
    }
}

impl SampleFilter for MovingAverage {
    fn process_sample(&mut self, sample: f64) -> f64 {
        self.push(sample);
        self.mean()
    }

    fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|value| *value = 0.0);
        self.next = 0;
        self.len = 0;
        self.sum = 0.0;
        self.compensation = 0.0;
    }

    fn history_len(&self) -> usize {
        self.len
    }
}
