//! Environment probe port interface

use async_trait::async_trait;

/// Port resolving capture parameters that configuration does not supply.
///
/// Both operations are best-effort and never fail: any problem degrades to
/// a fixed default.
#[async_trait]
pub trait EnvironmentProbe: Send + Sync {
    /// Configured or environment-supplied display identifier
    fn resolve_display_target(&self) -> String;

    /// Screen dimensions of `display_target` as `WIDTHxHEIGHT`
    async fn resolve_resolution(&self, display_target: &str) -> String;
}
