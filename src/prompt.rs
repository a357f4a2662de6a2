//! Prompt construction for the two summary modes.

pub fn page_summary_prompt(content: &str, word_limit: u32, source_url: Option<&str>) -> String {
    let mut result = String::with_capacity(content.len() + 1200);
    result.push_str(
        "You are a summarization engine. Summarize the cleaned text extracted from a webpage below.\n\n\
         Rules:\n\
         1. Keep only the essential information; remove filler and redundant sentences.\n\
         2. Preserve important facts, numbers, names and key points.\n\
         3. Do NOT add information that is not present in the text.\n\
         4. If the text is long, organize the summary into short sections with bullet points.\n\
         5. If the content has a clear topic (product, news, article, event), lead with its main message.\n\
         6. Do not include HTML, code or commentary about your process.\n",
    );
    result.push_str(&format!(
        "7. Keep the summary under {} words.\n",
        word_limit
    ));
    if let Some(url) = source_url {
        result.push_str(&format!(
            "8. End with a single line telling the reader they can visit {} for more details.\n",
            url
        ));
    }
    result.push_str("\nText:\n");
    result.push_str(content);
    result
}

pub fn conversation_summary_prompt(transcript: &str, word_limit: u32) -> String {
    let mut result = String::with_capacity(transcript.len() + 1600);
    result.push_str(
        "You are an assistant that condenses a conversation history between a user and an AI.\n\n\
         Goals:\n\
         1. Produce a concise, clear and structured summary of the conversation.\n\
         2. Only include factual content from the conversation. Do not invent or assume anything.\n\
         3. Ignore everything that is not part of the meaningful exchange:\n\
         \x20  - system messages, UI elements and labels\n\
         \x20  - email addresses, usernames or account identifiers\n\
         \x20  - keyboard shortcuts or hotkeys\n\
         \x20  - promotional banners, subscription notices or upgrade prompts\n\
         \x20  - footer messages, timestamps or metadata\n\
         \x20  - suggested follow-up questions\n\
         4. Highlight user intentions, key questions and the relevant facts that were established.\n\
         5. Write it so another AI can pick up the conversation from this summary alone.\n\
         6. Avoid repetition and filler.\n",
    );
    result.push_str(&format!(
        "7. Aim for no more than {} words while keeping all important context.\n",
        word_limit
    ));
    result.push_str(
        "\nOutput format:\n\
         - Use bullet points or numbered lists where they help.\n\
         - Clearly separate user intentions, topics discussed and AI responses.\n\
         - Do NOT quote the raw conversation; give only the distilled context.\n\
         - Output the summary only, with no commentary about how it was produced.\n\
         \nConversation:\n",
    );
    result.push_str(transcript);
    result
}
