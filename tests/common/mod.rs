//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gateway_router::routing::{AccountType, Route, RouteType};

pub const ORDER_PATH: &str = "/v5/order/create";

/// A CATEGORY route on the shared order path.
pub fn category(app: &str, values: &[&str]) -> Route {
    Route::new(app, "GET", ORDER_PATH)
        .with_type(RouteType::Category)
        .with_values(values.iter().copied())
}

pub fn account_type(app: &str, account: AccountType) -> Route {
    Route::new(app, "GET", ORDER_PATH)
        .with_type(RouteType::AccountType)
        .with_account(account)
}

pub fn all_in_one(app: &str) -> Route {
    Route::new(app, "GET", ORDER_PATH).with_type(RouteType::AllInOne)
}

/// Write a tenant route file and return its path.
pub fn write_route_file(dir: &Path, name: &str, app_key: &str, routes: &[(&str, &str, &str)]) -> PathBuf {
    let mut content = format!("app_key = \"{app_key}\"\n");
    for (method, path, server) in routes {
        content.push_str(&format!(
            "\n[[routes]]\nmethod = \"{method}\"\npath = \"{path}\"\nserver_name = \"{server}\"\n"
        ));
    }
    let file = dir.join(name);
    std::fs::write(&file, content).unwrap();
    file
}
