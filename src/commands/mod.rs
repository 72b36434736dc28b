// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod properties;
pub mod reports;
pub mod transactions;
pub mod verify;
