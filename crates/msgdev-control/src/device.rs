use std::sync::{Arc, OnceLock};

use msgdev_buffer::{ByteChannel, ChannelConfig, MessageBuffer, Session, CAPACITY};
use tracing::info;

use crate::dispatcher::ControlDispatcher;
use crate::error::Result;
use crate::ioctl::DEVICE_NAME;
use crate::request::{ControlRequest, ControlResponse, GET_MESSAGE_LIMIT};

/// Device-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Name the device reports in logs and diagnostics.
    pub name: String,
    /// Most content bytes one `GetMessage` returns.
    pub get_message_limit: usize,
    /// Plain channel settings.
    pub channel: ChannelConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEVICE_NAME.to_string(),
            get_message_limit: GET_MESSAGE_LIMIT,
            channel: ChannelConfig::default(),
        }
    }
}

/// The shared message device.
///
/// Cloning is cheap and every clone addresses the same buffer and the same
/// control gate. Plain reads and writes are not gated; only [`control`]
/// calls exclude each other.
///
/// [`control`]: MessageDevice::control
#[derive(Debug, Clone)]
pub struct MessageDevice {
    inner: Arc<DeviceInner>,
}

#[derive(Debug)]
struct DeviceInner {
    config: DeviceConfig,
    channel: ByteChannel,
    dispatcher: ControlDispatcher,
}

impl MessageDevice {
    /// Create a device with default configuration.
    pub fn new() -> Self {
        Self::with_config(DeviceConfig::default())
    }

    /// Create a device with explicit configuration.
    pub fn with_config(config: DeviceConfig) -> Self {
        let buffer = Arc::new(MessageBuffer::new());
        let channel = ByteChannel::with_config(buffer, config.channel);
        let dispatcher = ControlDispatcher::with_limit(channel.clone(), config.get_message_limit);
        info!(
            name = %config.name,
            capacity = CAPACITY,
            get_message_limit = config.get_message_limit,
            "message device created"
        );
        Self {
            inner: Arc::new(DeviceInner {
                config,
                channel,
                dispatcher,
            }),
        }
    }

    /// The process-wide device, created with defaults on first use.
    pub fn global() -> &'static MessageDevice {
        static GLOBAL: OnceLock<MessageDevice> = OnceLock::new();
        GLOBAL.get_or_init(MessageDevice::new)
    }

    /// Open a session with its own read cursor at offset 0.
    ///
    /// Opening grants no exclusivity.
    pub fn open(&self) -> Session {
        Session::new(self.inner.channel.clone())
    }

    /// Overwrite the message through the plain (ungated) path.
    pub fn write(&self, src: &[u8]) -> usize {
        self.inner.channel.write(src)
    }

    /// Run one gated control operation.
    pub fn control(&self, request: &ControlRequest) -> Result<ControlResponse> {
        self.inner.dispatcher.dispatch(request)
    }

    /// Device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    /// The dispatcher behind [`control`](MessageDevice::control).
    pub fn dispatcher(&self) -> &ControlDispatcher {
        &self.inner.dispatcher
    }
}

impl Default for MessageDevice {
    fn default() -> Self {
        Self::new()
    }
}
