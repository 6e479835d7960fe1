//! Prompt for synthesising a batch of article abstracts.

use crate::article::Article;

/// Maximum number of articles included in one summary prompt
pub const MAX_SUMMARY_ARTICLES: usize = 50;

/// Instructions placed before the article list
pub const SUMMARY_INSTRUCTIONS: &str = r#"You are an expert Industrial/Organizational Psychologist.
You are tasked with summarizing the following journal article abstracts.

CRITICAL INSTRUCTIONS:
1. STRICT ADHERENCE TO SOURCE: Base your primary synthesis ONLY on the substantive text provided in the abstracts below. Do not invent or infer findings that are not explicitly stated in the provided text.
2. IGNORE STUBS: Some abstracts may only contain citation data (e.g., "Volume 79, Issue 1", "EarlyView") or a note that the abstract could not be scraped. Ignore these completely when synthesizing the main findings.
3. INSUFFICIENT DATA: If all provided abstracts are stubs or lack substantive findings, explicitly state: "Insufficient information is available in the provided abstracts to generate a summary."
4. EXTERNAL KNOWLEDGE: Any outside theories or context must go in a separate section at the very end titled "Broader Context (Outside Sources)", introduced with: 'Beyond the included sources, broader knowledge on this topic highlights the following:'
5. CITATIONS & LINKS REQUIRED: Cite your sources for every theme or finding.
   - Cite the provided articles inline using Markdown links formatted like this: [[Title]](Link).
   - In the 'Broader Context' section, list the external authors, core theories, or standard academic references you draw from.

Format your response with clear headings and bullet points for readability.

Here are the articles:

"#;

/// Build the summary prompt for the first [`MAX_SUMMARY_ARTICLES`] articles.
pub fn build_summary_prompt(articles: &[&Article]) -> String {
    let mut prompt = String::from(SUMMARY_INSTRUCTIONS);
    for article in articles.iter().take(MAX_SUMMARY_ARTICLES) {
        prompt.push_str(&format!(
            "Title: {}\nLink: {}\nAbstract: {}\n\n",
            article.title, article.link, article.abstract_text
        ));
    }
    prompt
}
