use std::collections::VecDeque;

use super::filters::low_pass::SmoothedState;

// BUFFER COMPONENT ------------------------------------------------------------

/// Fixed capacity buffer, the oldest value is evicted once full.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    buffer: VecDeque<f64>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, element: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front(); // Overwrite oldest if full
        }
        self.buffer.push_back(element);
    }

    /// Element `index` counted from the oldest.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.buffer.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.buffer.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

// HISTORY COMPONENT -----------------------------------------------------------

/// Rolling smoothed series for display.
#[derive(Debug, Clone)]
pub struct History {
    pub x: RingBuffer,
    pub y: RingBuffer,
    pub z: RingBuffer,
    pub magnitude: RingBuffer,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            x: RingBuffer::new(capacity),
            y: RingBuffer::new(capacity),
            z: RingBuffer::new(capacity),
            magnitude: RingBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, smoothed: &SmoothedState) {
        self.x.add(smoothed.vector.x);
        self.y.add(smoothed.vector.y);
        self.z.add(smoothed.vector.z);
        self.magnitude.add(smoothed.magnitude);
    }

    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.magnitude.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::Sample;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut buffer = RingBuffer::new(3);
        for value in 1..=5 {
            buffer.add(value as f64);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(buffer.get(0), Some(3.0));
        assert_eq!(buffer.get(3), None);
    }

    #[test]
    fn zero_capacity_buffer_stays_empty() {
        let mut buffer = RingBuffer::new(0);
        buffer.add(1.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn history_tracks_four_series() {
        let mut history = History::new(2);
        for i in 0..3 {
            let value = i as f64;
            history.push(&SmoothedState {
                vector: Sample::new(value, value + 10.0, value + 20.0),
                magnitude: value + 30.0,
            });
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.x.to_vec(), vec![1.0, 2.0]);
        assert_eq!(history.y.to_vec(), vec![11.0, 12.0]);
        assert_eq!(history.z.to_vec(), vec![21.0, 22.0]);
        assert_eq!(history.magnitude.to_vec(), vec![31.0, 32.0]);
    }
}
