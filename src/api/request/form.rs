use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;

use crate::errors::ProdsnapError;
use crate::services::image::Image;

/// Multipart form body of the create and edit endpoints: text fields plus an
/// optional validated `image` file. All validation happens here, before any
/// storage call is made.
pub struct ProductForm {
    fields: HashMap<String, String>,
    pub image: Option<Image>,
}

impl ProductForm {
    pub async fn read(mut payload: Multipart) -> Result<Self, ProdsnapError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|e| {
                ProdsnapError::InternalServerError(format!("Failed to read multipart field: {:?}", e))
            })?;
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                // first image field wins; later ones are dropped unread
                if image.is_none() {
                    image = Some(Image::from_field(&mut field).await?);
                }
            } else {
                let mut buffer: Vec<u8> = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk.map_err(|e| {
                        ProdsnapError::InternalServerError(format!(
                            "Failed to read multipart field: {:?}",
                            e
                        ))
                    })?;
                    buffer.extend_from_slice(&data);
                }

                let value = String::from_utf8(buffer).map_err(|_| {
                    ProdsnapError::ValidationError((name.clone(), "must be valid UTF-8".to_string()))
                })?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, image })
    }

    pub fn require(&self, name: &str) -> Result<&str, ProdsnapError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ProdsnapError::ValidationError((name.to_string(), "is required".to_string())))
    }

    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require_price(&self) -> Result<f64, ProdsnapError> {
        parse_price(self.require("price")?)
    }
}

/// Rejects anything that is not a non-negative finite number.
pub fn parse_price(raw: &str) -> Result<f64, ProdsnapError> {
    let invalid = |message: &str| {
        ProdsnapError::ValidationError(("price".to_string(), message.to_string()))
    };

    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(&format!("'{}' is not a valid price", raw)))?;

    if !price.is_finite() || price < 0.0 {
        return Err(invalid("must be a non-negative finite number"));
    }

    Ok(price)
}
