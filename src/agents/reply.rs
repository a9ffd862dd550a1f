//! Reply Agent
//!
//! Answers a user question, optionally grounded in the text of the current
//! document. Long documents are chunked and each chunk is sent to the model
//! in its own request; the per-chunk replies are joined in chunk order.

use crate::chunker::Chunker;
use crate::llm::LLMAdapter;
use crate::types::AppResult;
use tracing::{debug, info, warn};

/// How a reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReplyMode {
    /// No document context: the bare question went to the model
    Direct,
    /// One model call per document chunk
    Chunked { chunks: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mode: ReplyMode,
}

pub struct ReplyAgent;

impl ReplyAgent {
    /// Answer `question`, using `context` as the document text when non-empty.
    ///
    /// Calls are made one after another in chunk order. The first failing
    /// call aborts the whole reply and its error is returned unchanged.
    pub async fn answer(
        llm: &dyn LLMAdapter,
        chunker: &Chunker,
        question: &str,
        context: &str,
    ) -> AppResult<Reply> {
        if context.trim().is_empty() {
            info!(question_len = question.len(), "Answering without document context");
            let text = llm.generate(question).await?;
            return Ok(Reply {
                text,
                mode: ReplyMode::Direct,
            });
        }

        let chunks = chunker.split(context);
        let total = chunks.len();
        info!(
            question_len = question.len(),
            context_len = context.len(),
            chunks = total,
            max_chunk_chars = chunker.max_chars(),
            "Answering over document chunks"
        );

        let mut replies = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let prompt = Self::create_chunk_prompt(question, chunk, index + 1, total);
            debug!(chunk = index + 1, of = total, prompt_len = prompt.len(), "Querying chunk");

            match llm.generate(&prompt).await {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    warn!(chunk = index + 1, of = total, error = %e, "Chunk query failed, aborting reply");
                    return Err(e);
                }
            }
        }

        Ok(Reply {
            text: replies.join(" "),
            mode: ReplyMode::Chunked { chunks: total },
        })
    }

    /// Prompt for one chunk: position label, chunk text, then the question
    fn create_chunk_prompt(question: &str, chunk: &str, position: usize, total: usize) -> String {
        format!(
            "Context (chunk {position}/{total}):\n{chunk}\n\nQuestion:\n{question}",
            position = position,
            total = total,
            chunk = chunk,
            question = question,
        )
    }
}
