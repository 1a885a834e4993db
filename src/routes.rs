use actix_web::{HttpResponse, web};

use crate::controller::proxy::{bagtag, products, ratings};
use crate::controller::tournaments::{metrix_tournaments, official_tournaments};

/// Route table shared by the server binary and the endpoint tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(official_tournaments))
        .route("/tournaments", web::get().to(official_tournaments))
        .route("/metrix", web::get().to(metrix_tournaments))
        .route("/tournaments/metrix", web::get().to(metrix_tournaments))
        .route("/bagtag", web::get().to(bagtag))
        .route("/products/{type}/{query}", web::get().to(products))
        .route("/ratings", web::get().to(ratings))
        .route("/health", web::get().to(HttpResponse::Ok));
}
