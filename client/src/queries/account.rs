//! The signed-in user and linked bank accounts.

use super::{keys, mutation, query};
use crate::query_key;
use crate::services::api::{auth, plaid, ApiClient};
use crate::sync::{Invalidates, MutationDescriptor, QueryDescriptor};
use shared::{LinkTokenResponse, LinkedAccount, UserInfo};
use std::sync::Arc;
use std::time::Duration;

const USER_STALE_TIME: Duration = Duration::from_secs(5 * 60);

pub fn current_user(api: &Arc<ApiClient>) -> QueryDescriptor<UserInfo> {
    query(api, query_key![keys::CURRENT_USER], |api| async move {
        auth::current_user(&api).await
    })
    .stale_time(USER_STALE_TIME)
}

pub fn linked_accounts(api: &Arc<ApiClient>) -> QueryDescriptor<Vec<LinkedAccount>> {
    query(api, query_key![keys::LINKED_ACCOUNTS], |api| async move {
        plaid::accounts(&api).await
    })
}

pub fn create_link_token(api: &Arc<ApiClient>) -> MutationDescriptor<(), LinkTokenResponse> {
    mutation(api, "create_link_token", |api, ()| async move {
        plaid::create_link_token(&api).await
    })
}

/// Finish linking a bank with the widget's public token.
pub fn exchange_public_token(api: &Arc<ApiClient>) -> MutationDescriptor<String, ()> {
    mutation(api, "exchange_public_token", |api, public_token: String| async move {
        plaid::exchange_token(&api, &public_token).await
    })
    .invalidates(Invalidates::prefixes([
        query_key![keys::LINKED_ACCOUNTS],
        query_key![keys::TRANSACTIONS],
    ]))
}
