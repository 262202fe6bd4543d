use async_trait::async_trait;
use birthcare_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// Blob storage behind the application review workflow. The review service
/// only speaks this trait; swapping the backend never touches workflow code.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, key: &str) -> bool;
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    /// Caller-facing location of a stored blob.
    fn url(&self, key: &str) -> String;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, key: &str) -> bool {
        self.base_path.join(key).exists()
    }

    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(key);
        let data = fs::read(path).await?;
        Ok(data)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        self.base_path.join(key).to_string_lossy().into_owned()
    }
}
