use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use actix_files::Files;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::configuration::{Settings, StoreSettings};
use crate::routes::{health_check, home, join_waitlist};
use crate::store::{PostgresWaitlistStore, RestWaitlistStore};
use crate::waitlist::{SharedStore, WaitlistHandler};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let store = build_store(configuration)?;
        let handler = WaitlistHandler::new(
            store,
            configuration.waitlist.unique_violation_code.clone(),
        );

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            handler,
            configuration.application.normalized_base_path(),
            configuration.application.static_dir.clone(),
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn build_store(configuration: &Settings) -> Result<SharedStore, anyhow::Error> {
    let table = &configuration.waitlist.table;
    let store: SharedStore = match &configuration.store {
        StoreSettings::Rest(rest) => Arc::new(RestWaitlistStore::new(
            &rest.base_url,
            table,
            rest.api_key.clone(),
            rest.timeout(),
        )?),
        StoreSettings::Postgres(database) => {
            let pool = PgPoolOptions::new().connect_lazy_with(database.with_db());
            Arc::new(PostgresWaitlistStore::new(pool, table)?)
        }
    };
    Ok(store)
}

/// Sub-path every page route and asset URL is prefixed with.
pub struct BasePath(pub String);

pub fn run(
    listener: TcpListener,
    handler: WaitlistHandler,
    base_path: String,
    static_dir: Option<PathBuf>,
) -> Result<Server, std::io::Error> {
    let handler = web::Data::new(handler);
    let base_path = web::Data::new(BasePath(base_path));
    let server = HttpServer::new(move || {
        let mut page = web::scope(&base_path.0)
            .route("", web::get().to(home))
            .route("/", web::get().to(home))
            .route("/waitlist", web::post().to(join_waitlist));
        if let Some(dir) = &static_dir {
            page = page.service(Files::new("/images", dir.join("images")));
        }
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(page)
            .app_data(handler.clone())
            .app_data(base_path.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
