mod api;
mod app;
mod db;
mod errors;
mod models;
mod services;
mod utils;
mod versioning;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use api::product_api::*;
use app::App as ProdsnapApp;

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let prodsnap = ProdsnapApp::new().await;
    let port = prodsnap.port();

    log::info!("prodsnap listening on http://127.0.0.1:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%a %r %s %b %{Referer}i %{User-Agent}i %T"))
            .wrap(prodsnap.cors())
            .app_data(web::Data::new(prodsnap.clone()))
            .service(
                web::scope("/products")
                    .service(create_product)
                    .service(get_products)
                    .service(get_product)
                    .service(get_product_analytics)
                    .service(edit_product)
                    .service(revert_product)
                    .service(delete_product),
            )
    })
    .bind(("127.0.0.1", port))
    .unwrap_or_else(|e| panic!("Could not bind to port {}.\n{}", port, e))
    .run()
    .await
    .unwrap_or_else(|e| panic!("Could not run server on port {}.\n{}", port, e));
}
