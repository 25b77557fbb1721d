// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod delete_flow;
pub mod entries;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod models;
pub mod store;
pub mod utils;
