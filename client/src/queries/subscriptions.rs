//! Subscription queries and the feature gate.

use super::{keys, mutation, query};
use crate::query_key;
use crate::services::api::{subscriptions as endpoints, ApiClient};
use crate::sync::{Invalidates, MutationDescriptor, QueryDescriptor, QueryState};
use shared::{CheckoutRequest, CheckoutSession, FeatureAccess, Subscription, SubscriptionPlan};
use std::sync::Arc;
use std::time::Duration;

const PLANS_STALE_TIME: Duration = Duration::from_secs(5 * 60);
const SUBSCRIPTION_STALE_TIME: Duration = Duration::from_secs(60);

pub fn plans(api: &Arc<ApiClient>) -> QueryDescriptor<Vec<SubscriptionPlan>> {
    query(api, query_key![keys::SUBSCRIPTION_PLANS], |api| async move {
        endpoints::plans(&api).await
    })
    .stale_time(PLANS_STALE_TIME)
}

pub fn current(api: &Arc<ApiClient>) -> QueryDescriptor<Subscription> {
    query(api, query_key![keys::CURRENT_SUBSCRIPTION], |api| async move {
        endpoints::current(&api).await
    })
    .stale_time(SUBSCRIPTION_STALE_TIME)
}

/// Server-side access check. Disabled until a feature name is given.
pub fn feature_access(api: &Arc<ApiClient>, feature: &str) -> QueryDescriptor<FeatureAccess> {
    let name = feature.to_string();
    query(api, query_key![keys::FEATURE_ACCESS, feature], move |api| {
        let name = name.clone();
        async move { endpoints::feature_access(&api, &name).await }
    })
    .stale_time(SUBSCRIPTION_STALE_TIME)
    .enabled(!feature.is_empty())
}

/// Client-side access check against the observed subscription.
///
/// `false` while the subscription is loading or unavailable.
pub fn has_feature(subscription: &QueryState<Subscription>, feature: &str) -> bool {
    if subscription.is_loading {
        return false;
    }
    subscription
        .data
        .as_deref()
        .is_some_and(|s| s.grants(feature))
}

/// Start a hosted checkout. Nothing changes until the payment completes.
pub fn checkout(api: &Arc<ApiClient>) -> MutationDescriptor<CheckoutRequest, CheckoutSession> {
    mutation(api, "create_checkout", |api, request: CheckoutRequest| async move {
        endpoints::checkout(&api, &request).await
    })
}

pub fn cancel(api: &Arc<ApiClient>) -> MutationDescriptor<(), ()> {
    mutation(api, "cancel_subscription", |api, ()| async move {
        endpoints::cancel(&api).await
    })
    .invalidates(Invalidates::prefixes([query_key![keys::CURRENT_SUBSCRIPTION]]))
}

/// What to invalidate once the user returns from a completed checkout.
pub fn checkout_completed() -> Invalidates {
    Invalidates::prefixes([
        query_key![keys::CURRENT_SUBSCRIPTION],
        query_key![keys::SUBSCRIPTION_PLANS],
    ])
}
