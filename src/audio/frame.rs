// The smallest unit of audio; one stereo frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn scaled(self, gain: f32) -> Self {
        Self { left: self.left * gain, right: self.right * gain }
    }

    #[inline]
    pub fn add(&mut self, other: StereoFrame) {
        self.left += other.left;
        self.right += other.right;
    }

    /// Peak magnitude across both channels, used by the compressor detector.
    #[inline]
    pub fn peak(self) -> f32 {
        self.left.abs().max(self.right.abs())
    }
}
