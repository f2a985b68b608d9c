use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use charybdis::types::Uuid;

use crate::errors::ProdsnapError;
use crate::services::image::Image;

/// An uploaded image blob. The key is kept next to the public URL so the
/// object can be deleted again if the write it was uploaded for never
/// commits.
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

/// Thin wrapper over the S3 client for product image blobs. Keys are scoped
/// to the product so its uploads stay grouped in the bucket.
#[derive(Clone)]
pub struct ImageStore {
    client: Arc<aws_sdk_s3::Client>,
    bucket: String,
}

impl ImageStore {
    pub fn new(client: Arc<aws_sdk_s3::Client>, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn build_key(product_id: Uuid, extension: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();

        format!("{}/{}-image.{}", product_id, timestamp, extension)
    }

    fn url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }

    /// Uploads the image and returns its key and public URL.
    pub async fn upload_image(
        &self,
        product_id: Uuid,
        image: Image,
    ) -> Result<StoredImage, ProdsnapError> {
        let key = Self::build_key(product_id, image.extension);
        let body = ByteStream::from(image.buffer);

        self.client
            .put_object()
            .key(&key)
            .bucket(&self.bucket)
            .body(body)
            .send()
            .await
            .map_err(|e| ProdsnapError::InternalServerError(format!("Failed to upload to S3: {:?}", e)))?;

        Ok(StoredImage {
            url: self.url(&key),
            key,
        })
    }

    pub async fn delete_image(&self, key: &str) -> Result<(), ProdsnapError> {
        self.client
            .delete_object()
            .key(key)
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                ProdsnapError::InternalServerError(format!("Failed to delete from S3: {:?}", e))
            })?;

        Ok(())
    }
}
