use std::sync::Arc;

use fft_convolver::FFTConvolver;
use log::warn;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// Uniform partition size for the FFT convolution. Cost per rendered sample
// grows with the impulse length only logarithmically, so multi-second hall
// impulse responses stay well inside the render callback's budget.
const PARTITION_SIZE: usize = 512;

/// Streaming convolver over the wet bus, one partitioned FFT convolver per
/// channel. With no kernel installed the wet path contributes nothing, which
/// is exactly what the "No Effect" selection wants.
pub struct Convolver {
    left: FFTConvolver<f32>,
    right: FFTConvolver<f32>,
    has_kernel: bool,
    // de-interleave scratch, reused across blocks
    in_l: Vec<f32>,
    in_r: Vec<f32>,
    out_l: Vec<f32>,
    out_r: Vec<f32>,
}

impl Convolver {
    pub fn new() -> Self {
        Self {
            left: FFTConvolver::default(),
            right: FFTConvolver::default(),
            has_kernel: false,
            in_l: Vec::new(),
            in_r: Vec::new(),
            out_l: Vec::new(),
            out_r: Vec::new(),
        }
    }

    /// Swap the impulse response. `init` is the only way to set an impulse,
    /// so swapping builds fresh convolvers; that also drops the tail of the
    /// previous effect instead of bleeding it into the new one.
    pub fn set_kernel(&mut self, kernel: Option<Arc<SampleBuffer>>) {
        self.left = FFTConvolver::default();
        self.right = FFTConvolver::default();
        self.has_kernel = false;

        let Some(kernel) = kernel else {
            return;
        };
        if kernel.data.is_empty() {
            return;
        }

        let ir_l: Vec<f32> = kernel.data.iter().map(|f| f.left).collect();
        let ir_r: Vec<f32> = kernel.data.iter().map(|f| f.right).collect();

        let mut left = FFTConvolver::default();
        let mut right = FFTConvolver::default();
        if left.init(PARTITION_SIZE, &ir_l).is_err() || right.init(PARTITION_SIZE, &ir_r).is_err() {
            warn!("failed to initialize convolver, effect will be silent");
            return;
        }

        self.left = left;
        self.right = right;
        self.has_kernel = true;
    }

    pub fn has_kernel(&self) -> bool {
        self.has_kernel
    }

    /// Convolve the bus in place.
    pub fn process(&mut self, bus: &mut [StereoFrame]) {
        if !self.has_kernel {
            bus.fill(StereoFrame::zero());
            return;
        }
        let n = bus.len();
        self.in_l.clear();
        self.in_r.clear();
        for frame in bus.iter() {
            self.in_l.push(frame.left);
            self.in_r.push(frame.right);
        }
        self.out_l.clear();
        self.out_l.resize(n, 0.0);
        self.out_r.clear();
        self.out_r.resize(n, 0.0);

        if self.left.process(&self.in_l, &mut self.out_l).is_err()
            || self.right.process(&self.in_r, &mut self.out_r).is_err()
        {
            bus.fill(StereoFrame::zero());
            return;
        }

        for (i, frame) in bus.iter_mut().enumerate() {
            frame.left = self.out_l[i];
            frame.right = self.out_r[i];
        }
    }
}

impl Default for Convolver {
    fn default() -> Self {
        Self::new()
    }
}
