use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use charybdis::types::Uuid;
use serde::Deserialize;
use serde_json::json;

use crate::api::request::form::ProductForm;
use crate::api::types::Response;
use crate::app::App;
use crate::db::store::ProductStore;
use crate::models::product::analytics::PriceAnalytics;
use crate::models::product::mutation::{EditProduct, SYSTEM_ACTOR};
use crate::models::product::{CreateProduct, Product};
use crate::utils::logger::log_warning;

#[post("")]
pub async fn create_product(app: web::Data<App>, payload: Multipart) -> Response {
    let form = ProductForm::read(payload).await?;
    let name = form.require("name")?.to_string();
    let description = form.require("description")?.to_string();
    let price = form.require_price()?;
    let created_by = form.optional("createdBy").unwrap_or(SYSTEM_ACTOR).to_string();

    let product_id = Uuid::new_v4();
    let image = match form.image {
        Some(image) => Some(app.image_store.upload_image(product_id, image).await?),
        None => None,
    };

    let result = Product::create(
        &app.store,
        CreateProduct {
            id: product_id,
            name,
            description,
            price,
            image: image.as_ref().map(|i| i.url.clone()),
            created_by,
        },
    )
    .await;

    if let Err(e) = result {
        // the insert never committed, so the uploaded object is an orphan
        if let Some(image) = &image {
            let _ = app.image_store.delete_image(&image.key).await.map_err(|e| {
                log_warning(format!("Failed to delete orphaned image {}: {}", image.key, e))
            });
        }

        return Err(e);
    }

    Ok(HttpResponse::Created().json(json!({
        "message": "Product created successfully!"
    })))
}

#[put("/{id}/edit")]
pub async fn edit_product(app: web::Data<App>, id: web::Path<Uuid>, payload: Multipart) -> Response {
    let form = ProductForm::read(payload).await?;
    let title = form.require("title")?.to_string();
    let description = form.require("description")?.to_string();
    let price = form.require_price()?;
    let changes = form.require("changes")?.to_string();
    let created_by = form.require("createdBy")?.to_string();

    let image = match form.image {
        Some(image) => Some(app.image_store.upload_image(*id, image).await?),
        None => None,
    };

    let result = Product::edit(
        &app.store,
        *id,
        EditProduct {
            title,
            description,
            price,
            image: image.as_ref().map(|i| i.url.clone()),
            created_by,
            changes,
        },
    )
    .await;

    let label = match result {
        Ok(label) => label,
        Err(e) => {
            // nothing references the uploaded object once the edit fails
            if let Some(image) = &image {
                let _ = app.image_store.delete_image(&image.key).await.map_err(|e| {
                    log_warning(format!("Failed to delete orphaned image {}: {}", image.key, e))
                });
            }

            return Err(e);
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": "Product updated and version created!",
        "versionNumber": label.to_string()
    })))
}

#[derive(Deserialize)]
pub struct RevertParams {
    #[serde(rename = "versionId")]
    pub version_id: Uuid,
}

#[post("/{id}/revert")]
pub async fn revert_product(
    app: web::Data<App>,
    id: web::Path<Uuid>,
    params: web::Json<RevertParams>,
) -> Response {
    let label = Product::revert(&app.store, *id, params.version_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Product reverted successfully!",
        "versionNumber": label.to_string()
    })))
}

#[get("/{id}")]
pub async fn get_product(app: web::Data<App>, id: web::Path<Uuid>) -> Response {
    let product = app.store.find_product(*id).await?;

    Ok(HttpResponse::Ok().json(product))
}

#[get("")]
pub async fn get_products(app: web::Data<App>) -> Response {
    let products = app.store.list_products().await?;

    Ok(HttpResponse::Ok().json(products))
}

#[delete("/{id}")]
pub async fn delete_product(app: web::Data<App>, id: web::Path<Uuid>) -> Response {
    app.store.delete_product(*id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Product deleted"
    })))
}

#[get("/{id}/analytics")]
pub async fn get_product_analytics(app: web::Data<App>, id: web::Path<Uuid>) -> Response {
    let product = app.store.find_product(*id).await?;

    Ok(HttpResponse::Ok().json(PriceAnalytics::report(product.price)))
}
