//! AI coach. Chat and savings advice are one-shot requests; the periodic
//! reports are cached like any other query.

use super::{keys, mutation, query};
use crate::query_key;
use crate::services::api::{coach as endpoints, ApiClient};
use crate::sync::{MutationDescriptor, QueryDescriptor};
use shared::{ChatResponse, CoachReport};
use std::sync::Arc;

pub fn weekly_summary(api: &Arc<ApiClient>) -> QueryDescriptor<CoachReport> {
    query(api, query_key![keys::WEEKLY_SUMMARY], |api| async move {
        endpoints::weekly_summary(&api).await
    })
}

pub fn monthly_report(api: &Arc<ApiClient>) -> QueryDescriptor<CoachReport> {
    query(api, query_key![keys::MONTHLY_REPORT], |api| async move {
        endpoints::monthly_report(&api).await
    })
}

pub fn category_analysis(api: &Arc<ApiClient>, category: &str) -> QueryDescriptor<CoachReport> {
    let category = category.to_string();
    query(api, query_key![keys::CATEGORY_ANALYSIS, category.clone()], move |api| {
        let category = category.clone();
        async move { endpoints::analyze_category(&api, &category).await }
    })
}

pub fn chat(api: &Arc<ApiClient>) -> MutationDescriptor<String, ChatResponse> {
    mutation(api, "coach_chat", |api, message: String| async move {
        endpoints::chat(&api, &message).await
    })
}

pub fn savings_recommendations(api: &Arc<ApiClient>) -> MutationDescriptor<f64, CoachReport> {
    mutation(api, "savings_recommendations", |api, goal: f64| async move {
        endpoints::savings_recommendations(&api, goal).await
    })
}
