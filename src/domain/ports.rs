use crate::domain::model::RenderOptions;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where boundary documents come from. The HTTP implementation lives in
/// `core::boundary_store`; tests swap in canned bodies.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn boundary_url(&self) -> &str;
    fn name_property(&self) -> &str;
    fn upload_file(&self) -> Option<&str>;
    fn selected_districts(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn render_options(&self) -> RenderOptions;
}
