use actix_web::HttpResponse;

use crate::errors::ProdsnapError;

pub type Response = Result<HttpResponse, ProdsnapError>;
