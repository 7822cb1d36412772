pub struct TestContext {
    #[allow(dead_code)]
    pub instance: wgpu::Instance,
    #[allow(dead_code)]
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl TestContext {
    /// Create a GPU context, or `None` when the host has no adapter so GPU
    /// tests can skip instead of failing.
    pub fn try_new() -> Option<Self> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await?;

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("Device"),
                        required_limits: adapter.limits(),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .ok()?;

            Some(Self {
                instance,
                adapter,
                device,
                queue,
            })
        })
    }
}

/// Skip the current test with a note when no GPU adapter is available.
macro_rules! gpu_context_or_skip {
    () => {
        match crate::common::TestContext::try_new() {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping, no GPU adapter available");
                return;
            }
        }
    };
}

pub(crate) use gpu_context_or_skip;
