//! Prompt augmentation.
//!
//! [`augment`] is a pure function of its inputs: same chunks in, same prompt
//! and citations out. The citation list is positionally aligned with the
//! numbered context lines, so `[2]` in the prompt always corresponds to
//! `citations[1]`.


use serde::{Deserialize, Serialize};

use crate::retrieval::RetrievedChunk;

/// A grounding source reference, positionally aligned with a context line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: String,
    pub chunk_id: String,
    pub similarity: f32,
}

/// A composed prompt pair plus its citations.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedPrompt {
    /// The system prompt, passed through unchanged.
    pub system_prompt: String,
    /// The user prompt with numbered context prepended.
    pub user_prompt: String,
    /// One citation per numbered context line, in order.
    pub citations: Vec<Citation>,
}

/// Composes the retrieval-augmented prompt.
pub fn augment(system_prompt: &str, user_text: &str, chunks: &[RetrievedChunk]) -> AugmentedPrompt {
    let mut context_lines = Vec::with_capacity(chunks.len());
    let mut citations = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        context_lines.push(format!("[{}] {}", i + 1, chunk.text));
        citations.push(Citation {
            doc_id: chunk.doc_id.clone(),
            chunk_id: chunk.chunk_id.clone(),
            similarity: chunk.similarity,
        });
    }

    let user_prompt = format!(
        "Use the following context to answer. If the context is insufficient, say so.\n\n\
         Context:\n{}\n\n\
         User question: {}",
        context_lines.join("\n"),
        user_text
    );

    AugmentedPrompt {
        system_prompt: system_prompt.to_string(),
        user_prompt,
        citations,
    }
}
