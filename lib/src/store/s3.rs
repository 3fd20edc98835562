use std::{collections::BTreeSet, future::Future, path::Path, pin::Pin};

use aws_sdk_s3::{
    primitives::ByteStream,
    types::{CreateBucketConfiguration, Delete, ObjectIdentifier},
};
use color_eyre::{
    eyre::{Context, Result},
    Section,
};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    error::DatError,
    inventory::{Inventory, RelPath},
    store::{ObjectStore, MASTER_KEY},
};

/// Bound on how many objects are transferred or deleted concurrently.
fn concurrency_cap() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// An [`ObjectStore`] backed by an AWS S3 bucket (or bucket/prefix).
///
/// This is the only module in the crate that depends on `aws-sdk-s3`; the
/// reconciliation core never sees it directly, only the trait.
#[derive(Debug)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: Option<String>,
}

#[bon::bon]
impl S3Store {
    /// Build a store for the given `bucket` or `bucket/prefix` id.
    #[builder]
    pub async fn new(
        /// The configured id: either a bare bucket name, or `bucket/prefix`.
        #[builder(into)]
        id: String,
        /// Optional named credential profile.
        #[builder(into)]
        profile: Option<String>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = &profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;
        let client = aws_sdk_s3::Client::new(&config);

        let (bucket, prefix) = match id.split_once('/') {
            Some((bucket, prefix)) => (bucket.to_string(), Some(prefix.to_string())),
            None => (id.clone(), None),
        };

        Ok(Self {
            client,
            bucket,
            prefix,
        })
    }
}

impl S3Store {
    /// Translate a path relative to the working root into a full S3 key.
    fn key(&self, rel: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{rel}"),
            None => rel.to_string(),
        }
    }

    /// List every key under the configured prefix, stripped back to
    /// paths relative to the working root.
    async fn list_remote_paths(&self) -> Result<BTreeSet<String>> {
        let mut keys = BTreeSet::new();
        let mut continuation = None;
        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_prefix(self.prefix.clone());
            if let Some(token) = continuation.take() {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(classify_sdk_error)
                .context("list remote objects")?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    let rel = match &self.prefix {
                        Some(prefix) => key.strip_prefix(prefix).map(|s| s.trim_start_matches('/')),
                        None => Some(key),
                    };
                    if let Some(rel) = rel {
                        keys.insert(rel.to_string());
                    }
                }
            }

            if response.is_truncated().unwrap_or(false) {
                continuation = response.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }
        Ok(keys)
    }
}

impl ObjectStore for S3Store {
    fn fetch_master(&self) -> Pin<Box<dyn Future<Output = Result<Option<Inventory>>> + Send + '_>> {
        Box::pin(async move {
            let key = self.key(MASTER_KEY);
            let response = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(&key)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if is_not_found(&err) {
                        debug!(%key, "no remote master object yet");
                        return Ok(None);
                    }
                    return Err(classify_sdk_error(err)).context("fetch master");
                }
            };

            let bytes = response
                .body
                .collect()
                .await
                .context("read master object body")?
                .into_bytes();
            let text = String::from_utf8(bytes.to_vec()).context("decode master object as utf-8")?;
            Inventory::parse(&text).context("parse master inventory").map(Some)
        })
    }

    fn create_prefix<'a>(&'a self, region: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.prefix.is_some() {
                debug!("id has a prefix, assuming bucket already exists");
                return Ok(());
            }

            let config = CreateBucketConfiguration::builder()
                .location_constraint(region.into())
                .build();

            let result = self
                .client
                .create_bucket()
                .bucket(&self.bucket)
                .create_bucket_configuration(config)
                .send()
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(err) if is_bucket_already_owned(&err) => {
                    debug!(bucket = %self.bucket, "bucket already exists and is owned by us");
                    Ok(())
                }
                Err(err) => Err(classify_sdk_error(err)).context("create bucket"),
            }
        })
    }

    fn sync_upload<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
        master: &'a Inventory,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut to_upload = Vec::new();
            let mut to_delete = Vec::new();
            for path in paths {
                if tokio::fs::try_exists(root.join(path.as_str())).await.unwrap_or(false) {
                    to_upload.push(path);
                } else {
                    to_delete.push(path.as_str().to_string());
                }
            }

            let cap = concurrency_cap();
            let mut tasks = JoinSet::new();
            let mut pending = to_upload.into_iter();

            for _ in 0..cap {
                let Some(path) = pending.next() else { break };
                self.spawn_upload(&mut tasks, root, path.clone());
            }
            while let Some(result) = tasks.join_next().await {
                result.context("join upload task")??;
                if let Some(path) = pending.next() {
                    self.spawn_upload(&mut tasks, root, path.clone());
                }
            }

            if !to_delete.is_empty() {
                self.delete_remote_paths(&to_delete).await.context("delete remote objects removed locally")?;
            }

            self.write_master(master).await.context("upload master inventory")
        })
    }

    fn sync_download<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let cap = concurrency_cap();
            let mut tasks = JoinSet::new();
            let mut pending = paths.iter();

            for _ in 0..cap {
                let Some(path) = pending.next() else { break };
                self.spawn_download(&mut tasks, root, path.clone());
            }
            while let Some(result) = tasks.join_next().await {
                result.context("join download task")??;
                if let Some(path) = pending.next() {
                    self.spawn_download(&mut tasks, root, path.clone());
                }
            }

            Ok(())
        })
    }

    fn remove_prefix(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let keys: Vec<_> = self
                .list_remote_paths()
                .await
                .context("list remote objects")?
                .into_iter()
                .chain(std::iter::once(MASTER_KEY.to_string()))
                .collect();
            if !keys.is_empty() {
                self.delete_remote_paths(&keys).await.context("delete remote objects")?;
            }

            if self.prefix.is_none() {
                self.client
                    .delete_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await
                    .map_err(classify_sdk_error)
                    .context("delete bucket")?;
            }

            Ok(())
        })
    }

    fn list_paths(&self) -> Pin<Box<dyn Future<Output = Result<BTreeSet<RelPath>>> + Send + '_>> {
        Box::pin(async move {
            let keys = self.list_remote_paths().await.context("list remote objects")?;
            keys.into_iter()
                .filter(|k| k != MASTER_KEY)
                .map(|k| RelPath::new(k).context("remote key is not a valid path"))
                .collect()
        })
    }

    fn write_master<'a>(&'a self, master: &'a Inventory) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(self.key(MASTER_KEY))
                .body(ByteStream::from(master.render().into_bytes()))
                .send()
                .await
                .map_err(classify_sdk_error)
                .context("upload master inventory")?;
            Ok(())
        })
    }
}

impl S3Store {
    fn spawn_upload(&self, tasks: &mut JoinSet<Result<()>>, root: &Path, path: RelPath) {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = self.key(path.as_str());
        let file_path = root.join(path.as_str());
        tasks.spawn(async move {
            let bytes = tokio::fs::read(&file_path)
                .await
                .with_context(|| format!("read {}", file_path.display()))?;
            client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(ByteStream::from(bytes))
                .send()
                .await
                .map_err(classify_sdk_error)
                .with_context(|| format!("upload {}", path))?;
            Ok(())
        });
    }

    /// Reconcile one path: download it if present remotely, or remove the
    /// local copy if the remote object has been deleted.
    fn spawn_download(&self, tasks: &mut JoinSet<Result<()>>, root: &Path, path: RelPath) {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = self.key(path.as_str());
        let file_path = root.join(path.as_str());
        tasks.spawn(async move {
            let response = client.get_object().bucket(bucket).key(key).send().await;

            let response = match response {
                Ok(response) => response,
                Err(err) if is_not_found(&err) => {
                    match tokio::fs::remove_file(&file_path).await {
                        Ok(()) => return Ok(()),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
                        Err(e) => return Err(e).with_context(|| format!("remove {}", file_path.display())),
                    }
                }
                Err(err) => return Err(classify_sdk_error(err)).with_context(|| format!("download {}", path)),
            };

            let bytes = response
                .body
                .collect()
                .await
                .with_context(|| format!("read body for {}", path))?
                .into_bytes();

            if let Some(parent) = file_path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            tokio::fs::write(&file_path, bytes)
                .await
                .with_context(|| format!("write {}", file_path.display()))?;
            Ok(())
        });
    }

    async fn delete_remote_paths(&self, keys: &[String]) -> Result<()> {
        for batch in keys.chunks(1000) {
            let objects = batch
                .iter()
                .map(|k| ObjectIdentifier::builder().key(self.key(k)).build())
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("build object identifiers")?;
            let delete = Delete::builder().set_objects(Some(objects)).build().context("build delete batch")?;
            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(classify_sdk_error)
                .context("batch delete objects")?;
        }
        Ok(())
    }
}

fn is_not_found<E, R>(err: &aws_sdk_s3::error::SdkError<E, R>) -> bool
where
    E: std::error::Error,
{
    matches!(err, aws_sdk_s3::error::SdkError::ServiceError(service_err) if {
        let message = format!("{:?}", service_err.err());
        message.contains("NoSuchKey") || message.contains("NotFound")
    })
}

fn is_bucket_already_owned<E, R>(err: &aws_sdk_s3::error::SdkError<E, R>) -> bool
where
    E: std::error::Error,
{
    matches!(err, aws_sdk_s3::error::SdkError::ServiceError(service_err) if {
        let message = format!("{:?}", service_err.err());
        message.contains("BucketAlreadyOwnedByYou") || message.contains("BucketAlreadyExists")
    })
}

/// Translate an AWS SDK error into a [`color_eyre::Report`], attaching the
/// "are you logged in?" hint for likely auth failures.
fn classify_sdk_error<E, R>(err: aws_sdk_s3::error::SdkError<E, R>) -> color_eyre::Report
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let message = err.to_string();
    let looks_like_auth = message.contains("credential")
        || message.contains("Unauthorized")
        || message.contains("InvalidAccessKeyId")
        || message.contains("SignatureDoesNotMatch");

    if looks_like_auth {
        warn!(%message, "treating S3 error as an authentication failure");
        color_eyre::Report::new(DatError::TransportAuth)
            .with_section(|| message.header("Underlying error:"))
            .with_warning(|| "are you logged in? check your AWS credentials/profile")
    } else {
        info!(%message, "S3 request failed");
        color_eyre::Report::new(DatError::TransportOther { message })
    }
}
