//! Tests for the service bootstrap, covering readiness signalling and route
//! wiring.

use super::server::{ServerConfig, create_server};
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use rstest::{fixture, rstest};
use user_service::inbound::http::health::HealthState;
use user_service::outbound::memory::InMemoryUserRepository;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, bind_address: SocketAddr) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(bind_address, Arc::new(InMemoryUserRepository::new()))
        .with_list_limit(10);
    assert_eq!(config.bind_addr(), bind_address);

    let _server = create_server(health_state.clone(), config).expect("server should bind");

    assert!(health_state.is_ready(), "server should mark ready");
}
