use std::sync::Arc;

use async_trait::async_trait;

use crate::ScholarError;

#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, ScholarError>;
}

#[async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Arc<R>
where
    Input: Send + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync + ?Sized,
{
    async fn invoke(&self, input: Input) -> Result<Output, ScholarError> {
        self.as_ref().invoke(input).await
    }
}
