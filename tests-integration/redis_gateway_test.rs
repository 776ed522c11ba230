//! Integration tests for the Redis persistence gateway
//!
//! These tests need a Redis server. Set `PARTLIFE_TEST_REDIS_URL` to use an
//! existing one; otherwise a throwaway container is started through Docker.
//!
//! Run with: `cargo test -p partlife-integration-tests -- --ignored`

use partlife::persistence::{PersistenceGateway, RedisGateway};
use partlife::test_helpers::{draft, instant};
use partlife::{seed, FixedClock, InventoryStore, PartStatus};
use std::env;
use std::sync::Arc;
use testcontainers::clients::Cli;
use testcontainers::Container;
use testcontainers_modules::redis::Redis;

const REDIS_PORT: u16 = 6379;

/// Keeps the container alive for as long as the test holds it.
struct RedisServer<'d> {
    url: String,
    _container: Option<Container<'d, Redis>>,
}

fn redis_server(docker: &Cli) -> RedisServer<'_> {
    if let Ok(url) = env::var("PARTLIFE_TEST_REDIS_URL") {
        return RedisServer {
            url,
            _container: None,
        };
    }
    let container = docker.run(Redis::default());
    let port = container.get_host_port_ipv4(REDIS_PORT);
    RedisServer {
        url: format!("redis://127.0.0.1:{}/", port),
        _container: Some(container),
    }
}

fn unique_key(test: &str) -> String {
    format!("partlife_test_{}_{}", test, std::process::id())
}

#[test]
#[ignore = "needs Docker or PARTLIFE_TEST_REDIS_URL"]
fn test_missing_key_loads_as_none() {
    let docker = Cli::default();
    let server = redis_server(&docker);
    let gateway = RedisGateway::open(&server.url, &unique_key("missing")).unwrap();

    assert!(gateway.load().unwrap().is_none());
}

#[test]
#[ignore = "needs Docker or PARTLIFE_TEST_REDIS_URL"]
fn test_snapshot_roundtrip() {
    let docker = Cli::default();
    let server = redis_server(&docker);
    let key = unique_key("roundtrip");
    let gateway = RedisGateway::open(&server.url, &key).unwrap();

    let parts = seed::default_parts(instant(2026, 5, 1));
    gateway.save(&parts).unwrap();

    let reopened = RedisGateway::open(&server.url, &key).unwrap();
    assert_eq!(reopened.load().unwrap(), Some(parts));
}

#[test]
#[ignore = "needs Docker or PARTLIFE_TEST_REDIS_URL"]
fn test_unparseable_value_is_an_error() {
    let docker = Cli::default();
    let server = redis_server(&docker);
    let key = unique_key("corrupt");

    let client = redis::Client::open(server.url.as_str()).unwrap();
    let mut conn = client.get_connection().unwrap();
    redis::cmd("SET")
        .arg(&key)
        .arg("{not json")
        .query::<()>(&mut conn)
        .unwrap();

    let gateway = RedisGateway::open(&server.url, &key).unwrap();
    assert!(gateway.load().is_err());
}

#[test]
#[ignore = "needs Docker or PARTLIFE_TEST_REDIS_URL"]
fn test_store_survives_restart() {
    let docker = Cli::default();
    let server = redis_server(&docker);
    let key = unique_key("restart");
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));

    let hose_id = {
        let gateway = Box::new(RedisGateway::open(&server.url, &key).unwrap());
        let mut store = InventoryStore::bootstrap(gateway, clock.clone(), seed::empty);
        let hose = store
            .add(draft("M-09", "Hydraulic Hose", 180, instant(2025, 11, 1)))
            .unwrap();
        assert!(!store.is_diverged());
        hose.id
    };

    let gateway = Box::new(RedisGateway::open(&server.url, &key).unwrap());
    let store = InventoryStore::bootstrap(gateway, clock, seed::default_parts);
    assert_eq!(store.len(), 1);
    let health = store.health();
    assert_eq!(health[&hose_id].days_elapsed, 181);
    assert_eq!(health[&hose_id].status, PartStatus::Critical);
}
