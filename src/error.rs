// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the store, reconciler, ledger and report layers.
/// Every failure aborts its enclosing unit of work; nothing is partially
/// committed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("{entity} with id {id} does not exist")]
    ForeignKeyMissing { entity: &'static str, id: i64 },

    #[error("invalid value: {0}")]
    InvalidDomainValue(String),

    #[error("{entity} {id} is still referenced by {dependents} transaction(s)")]
    DependencyExists {
        entity: &'static str,
        id: i64,
        dependents: i64,
    },

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error(
        "account {account_id} balance drift: stored {stored}, computed {computed}"
    )]
    InconsistentBalance {
        account_id: i64,
        stored: Decimal,
        computed: Decimal,
    },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
