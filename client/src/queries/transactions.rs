//! Transaction list and bank sync.

use super::{keys, mutation, query};
use crate::query_key;
use crate::services::api::{transactions as endpoints, ApiClient};
use crate::sync::{Invalidates, MutationDescriptor, QueryDescriptor};
use shared::{SyncResponse, Transaction};
use std::sync::Arc;

pub fn list(api: &Arc<ApiClient>) -> QueryDescriptor<Vec<Transaction>> {
    query(api, query_key![keys::TRANSACTIONS], |api| async move {
        endpoints::list(&api, None).await
    })
}

/// Pull from the bank. New transactions move every aggregate, so the whole
/// cache is invalidated.
pub fn sync(api: &Arc<ApiClient>) -> MutationDescriptor<(), SyncResponse> {
    mutation(api, "sync_transactions", |api, ()| async move {
        endpoints::sync(&api).await
    })
    .invalidates(Invalidates::Everything)
}
