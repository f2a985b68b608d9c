use std::sync::Arc;
use std::{env, fs, time::Duration};

use actix_cors::Cors;
use actix_web::http;
use scylla::client::caching_session::CachingSession;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use toml::Value;

use crate::db::store::ScyllaProductStore;
use crate::services::s3::ImageStore;

#[derive(Clone)]
pub struct App {
    pub config: Value,
    pub store: ScyllaProductStore,
    pub image_store: ImageStore,
}

impl App {
    pub async fn new() -> Self {
        dotenv::dotenv().ok();

        let env = env::var("ENV").expect("ENV must be set");
        let config_file = format!("config.{}.toml", env);
        let contents = fs::read_to_string(config_file).expect("Unable to read file");
        let config = contents.parse::<Value>().expect("Unable to parse TOML");

        let db_session = get_db_session(&config).await;
        let s3_client = get_aws_s3_client().await;
        let bucket = config["aws"]["bucket"]
            .as_str()
            .expect("Missing bucket")
            .to_string();

        Self {
            config,
            store: ScyllaProductStore::new(Arc::new(db_session)),
            image_store: ImageStore::new(Arc::new(s3_client), bucket),
        }
    }

    pub fn cors(&self) -> Cors {
        let allowed_origin = self.config["allowed_origin"]
            .as_str()
            .expect("Missing allowed_origin")
            .to_string();

        Cors::default()
            .allowed_origin(allowed_origin.as_str())
            .supports_credentials()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::ORIGIN,
                http::header::USER_AGENT,
                http::header::DNT,
                http::header::CONTENT_TYPE,
                http::header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            ])
            .expose_headers(vec![
                http::header::LOCATION,
                http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            ])
            .max_age(86400)
    }

    pub fn port(&self) -> u16 {
        self.config["port"].as_integer().expect("Missing port") as u16
    }
}

async fn get_db_session(config: &Value) -> CachingSession {
    let hosts = config["scylla"]["hosts"].as_array().expect("Missing hosts");

    let keyspace = config["scylla"]["keyspace"]
        .as_str()
        .expect("Missing keyspace");

    let known_nodes: Vec<&str> = hosts.iter().map(|x| x.as_str().unwrap()).collect();

    let session: Session = SessionBuilder::new()
        .known_nodes(&known_nodes)
        .connection_timeout(Duration::from_secs(3))
        .use_keyspace(keyspace, false)
        .build()
        .await
        .unwrap_or_else(|e| {
            panic!(
                "Unable to connect to scylla hosts: {:?}. \nError: {}",
                known_nodes, e
            )
        });

    CachingSession::from(session, 1000)
}

async fn get_aws_s3_client() -> aws_sdk_s3::Client {
    let config = aws_config::from_env().load().await;

    aws_sdk_s3::Client::new(&config)
}
