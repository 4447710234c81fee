//! S3 adapter for the object store boundary.
//!
//! Uses the blocking rust-s3 client; the pipeline is deliberately
//! synchronous and sequential, so no async runtime is dragged in.

use anyhow::{Context, Result};
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use ztree_core::{BucketName, ListingEntry, ObjectKey};
use ztree_sync::{ObjectStore, StoreError};

/// One bucket in one region, behind the [`ObjectStore`] trait.
pub struct S3ObjectStore {
    name: BucketName,
    bucket: Bucket,
}

impl S3ObjectStore {
    /// Open `bucket` with credentials from the default provider chain.
    pub fn connect(bucket: &str, region: &str) -> Result<Self> {
        log::info!("opening bucket {bucket} in {region}");
        let region: Region = region.parse().context("unrecognized region")?;
        let credentials = Credentials::default().context("failed to load credentials")?;
        let handle = Bucket::new(bucket, region, credentials).context("failed to open bucket")?;
        Ok(Self {
            name: BucketName::from(bucket),
            bucket: handle,
        })
    }

    fn check_bucket(&self, bucket: &BucketName) -> Result<(), StoreError> {
        if *bucket != self.name {
            return Err(StoreError::backend(std::io::Error::other(format!(
                "adapter is bound to bucket {}, not {bucket}",
                self.name
            ))));
        }
        Ok(())
    }
}

fn map_err(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StoreError::NotFound,
        other => StoreError::backend(other),
    }
}

impl ObjectStore for S3ObjectStore {
    fn list(&self, bucket: &BucketName, prefix: &str) -> Result<Vec<ListingEntry>, StoreError> {
        self.check_bucket(bucket)?;
        // rust-s3 drains ListObjectsV2 pagination into one page per request.
        let pages = self
            .bucket
            .list(prefix.to_string(), None)
            .map_err(map_err)?;
        let mut entries = Vec::new();
        for page in pages {
            for object in page.contents {
                let raw_fingerprint = object.e_tag.unwrap_or_default();
                log::debug!("listed {} ({raw_fingerprint})", object.key);
                entries.push(ListingEntry {
                    key: ObjectKey::from(object.key),
                    raw_fingerprint,
                });
            }
        }
        Ok(entries)
    }

    fn get_bytes(&self, bucket: &BucketName, key: &ObjectKey) -> Result<Vec<u8>, StoreError> {
        self.check_bucket(bucket)?;
        let response = self.bucket.get_object(key.as_str()).map_err(map_err)?;
        Ok(response.bytes().to_vec())
    }
}
