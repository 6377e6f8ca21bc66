use crate::core::execution::StepExecution;
use crate::domain::ports::{ItemProcessor, ItemReader, ItemWriter};
use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;

#[async_trait]
pub trait Step: Send {
    fn name(&self) -> &str;

    /// 執行 step 並更新計數，錯誤會讓整個 job 失敗
    async fn execute(&mut self, execution: &mut StepExecution) -> Result<()>;
}

/// 讀取 → 處理 → 寫入，每 `chunk_size` 筆提交一次
pub struct ChunkOrientedStep<R, P, W> {
    name: String,
    chunk_size: usize,
    reader: R,
    processor: P,
    writer: W,
}

impl<R, P, W> ChunkOrientedStep<R, P, W>
where
    R: ItemReader,
    P: ItemProcessor<Input = R::Item>,
    W: ItemWriter<Item = P::Output>,
{
    pub fn new(
        name: impl Into<String>,
        chunk_size: usize,
        reader: R,
        processor: P,
        writer: W,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BatchError::InvalidConfigValueError {
                field: "step.chunk_size".to_string(),
                value: chunk_size.to_string(),
                reason: "Chunk size must be at least 1".to_string(),
            });
        }

        Ok(Self {
            name: name.into(),
            chunk_size,
            reader,
            processor,
            writer,
        })
    }

    fn read_chunk(&mut self, execution: &mut StepExecution) -> Result<Vec<R::Item>> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        while chunk.len() < self.chunk_size {
            match self.reader.read()? {
                Some(item) => {
                    execution.read_count += 1;
                    chunk.push(item);
                }
                None => break,
            }
        }
        Ok(chunk)
    }

    fn process_chunk(
        &self,
        chunk: Vec<R::Item>,
        execution: &mut StepExecution,
    ) -> Result<Vec<P::Output>> {
        let mut outputs = Vec::with_capacity(chunk.len());
        for item in chunk {
            match self.processor.process(item)? {
                Some(output) => outputs.push(output),
                None => execution.filter_count += 1,
            }
        }
        Ok(outputs)
    }

    async fn run_chunk(&mut self, execution: &mut StepExecution) -> Result<bool> {
        let chunk = self.read_chunk(execution)?;
        if chunk.is_empty() {
            return Ok(false);
        }
        let exhausted = chunk.len() < self.chunk_size;

        let outputs = self.process_chunk(chunk, execution)?;
        self.writer.write(&outputs).await?;

        execution.write_count += outputs.len();
        execution.commit_count += 1;
        tracing::debug!(
            "Step {} committed chunk {} ({} items, {} read so far)",
            self.name,
            execution.commit_count,
            outputs.len(),
            execution.read_count
        );

        Ok(!exhausted)
    }
}

#[async_trait]
impl<R, P, W> Step for ChunkOrientedStep<R, P, W>
where
    R: ItemReader,
    P: ItemProcessor<Input = R::Item>,
    W: ItemWriter<Item = P::Output>,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&mut self, execution: &mut StepExecution) -> Result<()> {
        self.reader.open()?;

        loop {
            match self.run_chunk(execution).await {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) => {
                    execution.rollback_count += 1;
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Step {} finished: read={}, written={}, filtered={}, commits={}",
            self.name,
            execution.read_count,
            execution.write_count,
            execution.filter_count,
            execution.commit_count
        );
        Ok(())
    }
}
