//! Registration and lookup behavior through the public API.

use gateway_router::routing::{
    AccountType, ErrorKind, PathKind, Registry, Route, RouteType, SharedRegistry,
};

mod common;

use common::{account_type, all_in_one, category, ORDER_PATH};

#[test]
fn test_build_classifies_and_trims() {
    let cases = [
        ("/v5/order", PathKind::Static, "/v5/order"),
        ("/v5/order/", PathKind::Static, "/v5/order"),
        ("/static/*", PathKind::Prefix, "/static/*path"),
        ("/static/files/*", PathKind::Prefix, "/static/files/*path"),
    ];
    for (path, kind, match_path) in cases {
        let mut route = Route::new("a", "GET", path);
        route.build().unwrap();
        assert_eq!(route.path_kind(), Some(kind), "{path}");
        assert_eq!(route.match_path(), match_path, "{path}");
    }

    for root in ["/", ""] {
        let err = Route::new("a", "GET", root).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRootPath);
    }
}

#[test]
fn test_sentinel_kinds_carry_route() {
    let err = Route::new("a", "FETCH", "/x").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMethod);
    assert!(err.to_string().contains("/x"));

    let err = Route::new("a", "GET", "/users/:id").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParamPathUnsupported);

    let err = Route::new("a", "GET", "/a/*/b").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPrefixPath);
}

#[test]
fn test_identical_routes_conflict() {
    let mut registry = Registry::new();
    registry.insert([category("a", &["spot"])]).unwrap();
    let err = registry.insert([category("a", &["spot"])]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Conflict | ErrorKind::DuplicateRoute));

    let mut registry = Registry::new();
    registry.insert([all_in_one("a")]).unwrap();
    let err = registry.insert([all_in_one("a")]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Conflict | ErrorKind::DuplicateRoute));
}

#[test]
fn test_changing_one_field_avoids_conflict() {
    let variants = [
        category("b", &["linear"]),
        Route::new("a", "POST", ORDER_PATH)
            .with_type(RouteType::Category)
            .with_values(["spot"]),
        Route::new("a", "GET", "/v5/order/amend")
            .with_type(RouteType::Category)
            .with_values(["spot"]),
        category("a", &["option"]),
    ];
    for variant in variants {
        let mut registry = Registry::new();
        registry.insert([category("a", &["spot"])]).unwrap();
        registry.insert([variant]).unwrap();
    }

    // account types on an ACCOUNT_TYPE set
    let mut registry = Registry::new();
    registry
        .insert([
            account_type("a", AccountType::NORMAL),
            account_type("a", AccountType::UNIFIED),
        ])
        .unwrap();
}

#[test]
fn test_all_in_one_and_default_exclusivity() {
    let mut registry = Registry::new();
    registry.insert([all_in_one("a")]).unwrap();
    let err = registry.insert([all_in_one("b")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let mut registry = Registry::new();
    registry
        .insert([all_in_one("a"), Route::new("b", "GET", ORDER_PATH)])
        .unwrap();
    assert!(registry.insert([category("c", &["spot"])]).is_err());
    assert!(registry.insert([Route::new("d", "GET", ORDER_PATH)]).is_err());
}

#[test]
fn test_order_independent_of_insertion() {
    let build = || {
        vec![
            category("d", &[]),
            category("a", &["linear"]),
            all_in_one("aio"),
            category("b", &["spot"]),
            category("c", &["option"]),
        ]
    };

    for rotation in 0..5 {
        let mut routes = build();
        routes.rotate_left(rotation);

        let mut registry = Registry::new();
        registry.insert(routes).unwrap();
        let set = registry.find("GET", ORDER_PATH).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.first().unwrap().route_type, RouteType::AllInOne);
        assert!(set.last().unwrap().is_category_default());
    }
}

#[test]
fn test_category_scenario() {
    let mut registry = Registry::new();
    registry
        .insert([
            category("a", &["linear"]),
            category("a", &["spot"]),
            category("a", &[]),
        ])
        .unwrap();

    let set = registry.find("GET", ORDER_PATH).unwrap();
    assert_eq!(set.items().len(), 3);
    let last = set.last().unwrap();
    assert!(last.values.is_empty());
    assert!(last.is_category_default());
}

#[test]
fn test_failed_replace_is_invisible() {
    let shared = SharedRegistry::default();
    shared
        .replace("spot", vec![category("spot", &["spot"]), Route::new("spot", "GET", "/spot/*")])
        .unwrap();
    let before = format!("{:?}", shared.routes());

    let err = shared
        .replace(
            "linear",
            vec![category("linear", &["linear"]), category("linear", &["linear"])],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(format!("{:?}", shared.routes()), before);
    assert_eq!(shared.find("GET", ORDER_PATH).unwrap().len(), 1);
    assert!(shared.find("GET", "/spot/x").is_some());
}

#[test]
fn test_nested_prefixes() {
    let mut registry = Registry::new();
    registry
        .insert([
            Route::new("outer", "GET", "/a/*"),
            Route::new("inner", "GET", "/a/b/*"),
        ])
        .unwrap();

    let app = |path: &str| {
        registry
            .find("GET", path)
            .and_then(|set| set.first().map(|r| r.app_key.clone()))
    };
    assert_eq!(app("/a/x").as_deref(), Some("outer"));
    assert_eq!(app("/a/b/x").as_deref(), Some("inner"));
    assert_eq!(app("/a/bc").as_deref(), Some("outer"));

    let err = registry.insert([Route::new("again", "GET", "/a/*")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateRoute);
}

#[test]
fn test_unknown_method_and_path_are_none() {
    let mut registry = Registry::new();
    registry.insert([Route::new("a", "GET", "/a")]).unwrap();
    assert!(registry.find("BREW", "/a").is_none());
    assert!(registry.find("GET", "/b").is_none());
    assert!(registry.find("get", "/a").is_some());
}
