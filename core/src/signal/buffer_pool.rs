use crate::prelude::StageError;

/// Scoped pool of f32 sample buffers shared within a trace stage.
///
/// The capacity bounds how many buffers the pool retains for reuse; buffers
/// handed out and never released are simply replaced by fresh allocations.
pub struct BufferPool {
    free: Vec<Vec<f32>>,
    max_buffers: usize,
}

impl BufferPool {
    pub fn with_capacity(max_buffers: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_buffers),
            max_buffers,
        }
    }

    /// Hands out a zeroed buffer of `length` samples.
    pub fn checkout(&mut self, length: usize) -> Result<Vec<f32>, StageError> {
        if let Some(mut buffer) = self.free.pop() {
            buffer.clear();
            buffer.resize(length, 0.0);
            return Ok(buffer);
        }
        if self.free.len() < self.max_buffers {
            return Ok(vec![0.0; length]);
        }
        Err(StageError::BufferExhaustion("pool depleted".to_string()))
    }

    /// Returns a buffer back to the pool for reuse.
    pub fn release(&mut self, mut buffer: Vec<f32>) {
        buffer.clear();
        if self.free.len() < self.max_buffers {
            self.free.push(buffer);
        }
    }

    pub fn reset(&mut self) {
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_without_release_keeps_serving() {
        let mut pool = BufferPool::with_capacity(1);
        for _ in 0..8 {
            let buffer = pool.checkout(4).unwrap();
            assert_eq!(buffer.len(), 4);
        }
    }

    #[test]
    fn zero_capacity_pool_is_exhausted() {
        let mut pool = BufferPool::with_capacity(0);
        assert!(pool.checkout(4).is_err());
    }

    #[test]
    fn released_buffers_come_back_zeroed() {
        let mut pool = BufferPool::with_capacity(1);
        let mut buffer = pool.checkout(2).unwrap();
        buffer[0] = 9.0;
        pool.release(buffer);
        let buffer = pool.checkout(2).unwrap();
        assert_eq!(buffer, vec![0.0, 0.0]);
    }
}
