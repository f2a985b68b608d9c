use futures::StreamExt;

use crate::errors::ProdsnapError;

/// A validated uploaded image: raw bytes plus the extension derived from the
/// sniffed format.
pub struct Image {
    pub buffer: Vec<u8>,
    pub extension: &'static str,
}

impl Image {
    async fn read_image_buffer(field: &mut actix_multipart::Field) -> Result<Vec<u8>, ProdsnapError> {
        let mut buffer: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                ProdsnapError::InternalServerError(format!("Failed to read multipart field: {:?}", e))
            })?;
            buffer.extend_from_slice(&data);
        }

        Ok(buffer)
    }

    fn read_image_format(buffer: &[u8]) -> Result<image::ImageFormat, ProdsnapError> {
        let image_format = image::guess_format(buffer)
            .map_err(|_| ProdsnapError::UnsupportedMediaType)?;

        if image_format != image::ImageFormat::Png
            && image_format != image::ImageFormat::Jpeg
            && image_format != image::ImageFormat::WebP
        {
            return Err(ProdsnapError::UnsupportedMediaType);
        }

        Ok(image_format)
    }

    pub async fn from_field(field: &mut actix_multipart::Field) -> Result<Self, ProdsnapError> {
        let buffer = Self::read_image_buffer(field).await?;
        let format = Self::read_image_format(&buffer)?;

        // decode to reject files that only carry a valid magic number
        image::load_from_memory(&buffer)
            .map_err(|e| ProdsnapError::InternalServerError(format!("Failed to decode image: {:?}", e)))?;

        let extension = match format {
            image::ImageFormat::Png => "png",
            image::ImageFormat::WebP => "webp",
            _ => "jpg",
        };

        Ok(Self { buffer, extension })
    }
}
