// ABOUTME: Connection options for the remote client.
// ABOUTME: Merges command-line defaults with per-run config before building a handle.

use super::LambdaRemote;

/// Region and credentials profile used to reach the provider.
///
/// Options are merged into a new value and a fresh client is built from the
/// result; an existing client handle is never re-pointed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl ClientOptions {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }

    /// Return these options with every field set in `overrides` replacing ours.
    #[must_use]
    pub fn merged_with(&self, overrides: &ClientOptions) -> ClientOptions {
        ClientOptions {
            region: overrides.region.clone().or_else(|| self.region.clone()),
            profile: overrides.profile.clone().or_else(|| self.profile.clone()),
        }
    }

    /// Build a new client handle from these options.
    ///
    /// Unset fields fall back to the provider's default credential and
    /// region resolution chain.
    pub async fn connect(&self) -> LambdaRemote {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        tracing::debug!(
            "Building function client (region: {:?}, profile: {:?})",
            self.region,
            self.profile
        );
        let sdk_config = loader.load().await;
        LambdaRemote::new(aws_sdk_lambda::Client::new(&sdk_config))
    }
}
