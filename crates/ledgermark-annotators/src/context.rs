/// Name of the device identifier value in request contexts.
pub const DEVICE_ID_KEY: &str = "deviceId";

/// Out-of-band values scoped to one annotation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Originating device, required by the attestation annotator.
    pub device_id: Option<String>,
}

impl RequestContext {
    /// Context without any values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying a device identifier.
    pub fn with_device_id(device_id: impl Into<String>) -> Self {
        Self {
            device_id: Some(device_id.into()),
        }
    }
}
