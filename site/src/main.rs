use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::{App, HttpServer, middleware::Logger};

mod config;

use config::SiteConfig;

/// Any path the bundle doesn't have gets `index.html`; the router takes it from there.
async fn spa(index: PathBuf, req: ServiceRequest) -> actix_web::Result<ServiceResponse> {
    let (req, _) = req.into_parts();
    let file = NamedFile::open_async(index).await?;
    let res = file.into_response(&req);
    Ok(ServiceResponse::new(req, res))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cfg = SiteConfig::from_env()?;
    log::info!(
        "serving {} (assets {}) on http://{}:{}",
        cfg.dist_dir.display(),
        cfg.assets_dir.display(),
        cfg.host,
        cfg.port
    );

    let bind = (cfg.host.clone(), cfg.port);

    HttpServer::new(move || {
        let index = cfg.index_file();
        App::new()
            .wrap(Logger::default())
            // static assets and the model; mounted before "/" so they win
            .service(Files::new("/assets", &cfg.assets_dir))
            .service(Files::new("/cake", cfg.cake_dir()))
            // the SPA bundle built by Trunk, falling back to index.html
            .service(
                Files::new("/", &cfg.dist_dir)
                    .index_file("index.html")
                    .default_handler(fn_service(move |req| spa(index.clone(), req))),
            )
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
