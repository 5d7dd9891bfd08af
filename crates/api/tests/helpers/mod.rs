pub mod mock_store;

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use askgod_api::{create_router, AppState};
use askgod_application::{AccessResolver, SubmissionService};
use askgod_domain::Config;
use askgod_infrastructure::{ConfigManager, EventBus};
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, Response};
use tower::ServiceExt;

use mock_store::MockStore;

pub struct TestServer {
    pub state: AppState,
    pub store: Arc<MockStore>,
    // Keeps the config file alive for the lifetime of the server.
    _config_file: tempfile::NamedTempFile,
}

impl TestServer {
    /// Build a full router-backed server over in-memory repositories.
    pub async fn new(config: Config, store: MockStore) -> TestServer {
        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file
            .write_all(serde_yaml::to_string(&config).unwrap().as_bytes())
            .unwrap();
        config_file.flush().unwrap();

        let store = Arc::new(store);

        let config_manager =
            ConfigManager::load(config_file.path().to_path_buf(), store.clone())
                .await
                .unwrap();

        let handle = config_manager.handle();
        let access = Arc::new(AccessResolver::new(handle.clone()));
        let bus = Arc::new(EventBus::new(handle.clone()));
        bus.set_hidden_teams(config_manager.current().hidden_team_ids());

        let submission = Arc::new(SubmissionService::new(
            handle.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            bus.clone(),
        ));

        let state = AppState {
            config: handle,
            config_manager,
            access,
            bus,
            teams: store.clone(),
            flags: store.clone(),
            scores: store.clone(),
            submission,
        };

        TestServer {
            state,
            store,
            _config_file: config_file,
        }
    }

    /// Run one request as if it came from `client`.
    pub async fn request(&self, client: &str, request: Request<Body>) -> Response<Body> {
        let addr: SocketAddr = format!("{}:45822", client).parse().unwrap();

        let router = create_router(self.state.clone()).layer(MockConnectInfo(addr));
        router.oneshot(request).await.unwrap()
    }

    pub async fn get(&self, client: &str, uri: &str) -> Response<Body> {
        self.request(
            client,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn send_json(
        &self,
        client: &str,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.request(
            client,
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// The standard test topology: admins on 172.16.0.0/24, teams on
/// 10.0.0.0/8, guests on 192.168.0.0/16.
pub fn base_config() -> Config {
    let mut config = Config::default();
    config.editable.subnets.admins = vec!["172.16.0.0/24".to_string()];
    config.editable.subnets.teams = vec!["10.0.0.0/8".to_string()];
    config.editable.subnets.guests = vec!["192.168.0.0/16".to_string()];
    config
}

pub const ADMIN_IP: &str = "172.16.0.10";
pub const TEAM_IP: &str = "10.0.0.5";
pub const GUEST_IP: &str = "192.168.1.20";
pub const OUTSIDE_IP: &str = "203.0.113.9";
