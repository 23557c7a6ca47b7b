/// Source of the identifier recorded as an annotation's `host`.
pub trait HostIdentity: Send + Sync {
    /// Identifier of this node at evaluation time.
    fn hostname(&self) -> String;
}

/// Reads the operating system hostname on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostIdentity for SystemHost {
    fn hostname(&self) -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }
}

/// Fixed identifier, for pinned deployments and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHost(pub String);

impl StaticHost {
    /// Creates a fixed host identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl HostIdentity for StaticHost {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}
