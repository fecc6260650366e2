//! Prompt wrapping for a composed context.

/// Wrap `context` and `query` in the answer-from-context instruction.
pub fn render_prompt(context: &str, query: &str) -> String {
    format!(
        "Answer the following question based only on the context below.\n\n\
         If the context presents different types of information or perspectives, \
         make them explicit in your answer and avoid introducing unstated assumptions.\n\n\
         Context:\n{context}\n\n\
         Question: {query}"
    )
}
