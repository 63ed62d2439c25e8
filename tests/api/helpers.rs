use std::path::PathBuf;

use once_cell::sync::Lazy;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

use probya::configuration::{
    get_configuration, DatabaseSettings, RestStoreSettings, Settings, StoreSettings,
};
use probya::startup::Application;
use probya::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to install the test subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to install the test subscriber");
    }
});

pub struct TestApp {
    /// Server root, without the base path.
    pub root: String,
    /// Server root followed by the base path.
    pub address: String,
    pub store_server: MockServer,
    api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get_home(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_asset(&self, asset: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/{}", self.address, asset))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_waitlist(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(format!("{}/waitlist", self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_at("").await
}

pub async fn spawn_app_at(base_path: &str) -> TestApp {
    let store_server = MockServer::start().await;
    let mut configuration = test_configuration(base_path);
    configuration.store = StoreSettings::Rest(RestStoreSettings {
        base_url: store_server.uri(),
        api_key: Secret::new("test-anon-key".to_string()),
        timeout_milliseconds: Some(2_000),
    });
    launch(configuration, store_server).await
}

pub async fn spawn_app_serving(static_dir: PathBuf) -> TestApp {
    let store_server = MockServer::start().await;
    let mut configuration = test_configuration("/probya-coming-soon");
    configuration.application.static_dir = Some(static_dir);
    configuration.store = StoreSettings::Rest(RestStoreSettings {
        base_url: store_server.uri(),
        api_key: Secret::new("test-anon-key".to_string()),
        timeout_milliseconds: Some(2_000),
    });
    launch(configuration, store_server).await
}

/// An app writing straight into a freshly migrated, throwaway database.
pub async fn spawn_app_with_database() -> (TestApp, PgPool) {
    let store_server = MockServer::start().await;
    let database = test_database_settings();
    let db_pool = configure_database(&database).await;
    let mut configuration = test_configuration("");
    configuration.store = StoreSettings::Postgres(database);
    (launch(configuration, store_server).await, db_pool)
}

/// Local Postgres, one database per call.
pub fn test_database_settings() -> DatabaseSettings {
    DatabaseSettings {
        username: "postgres".to_string(),
        password: Secret::new("password".to_string()),
        port: 5432,
        host: "localhost".to_string(),
        database_name: Uuid::new_v4().to_string(),
        require_ssl: false,
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // create db
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database");

    // migrate db
    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

fn test_configuration(base_path: &str) -> Settings {
    let mut c = get_configuration().expect("Failed to read configuration.");
    c.application.port = 0;
    c.application.base_path = base_path.to_string();
    c.application.static_dir = None;
    c
}

async fn launch(configuration: Settings, store_server: MockServer) -> TestApp {
    Lazy::force(&TRACING);

    let application = Application::build(&configuration)
        .await
        .expect("Failed to build application.");
    let root = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("{}{}", root, configuration.application.normalized_base_path()),
        root,
        store_server,
        api_client: reqwest::Client::new(),
    }
}
