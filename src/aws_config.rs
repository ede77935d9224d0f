use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_types::region::Region;

/// Region used when neither the flag nor the environment names one. The CI
/// runners this tool cleans up have always lived here, so a bare invocation
/// keeps scanning the same fleet.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Load the shared SDK config. Credentials come from the default chain
/// (env, profile, instance role); the region from `region`, then the
/// default chain, then [`FALLBACK_REGION`].
pub async fn configure_aws(region: Option<String>) -> aws_types::SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(Region::from_static(FALLBACK_REGION));

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}
