/// Device and surface preferences.
///
/// Surface choices fall back to what the surface supports; the limits are
/// required and fail device creation if the adapter lacks them.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format if there is one, so sprite sheet colours
    /// reach the screen unchanged.
    pub prefer_srgb: bool,

    /// Falls back to FIFO.
    pub present_mode: wgpu::PresentMode,

    /// `None` takes the surface's first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            // A handful of textured quads per frame.
            power_preference: wgpu::PowerPreference::LowPower,
            // 8192 texels per side for sheets and layers.
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
