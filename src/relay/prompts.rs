//! Prompt templates for the three relay routes.
//!
//! Each route has a fixed template parametrized by the request fields;
//! unknown analysis/edit types fall back to the default instruction.

/// Prompt for reading/analyzing content
pub fn build_read_prompt(content: &str, analysis_type: &str) -> String {
    let instructions = match analysis_type {
        "general" => "Provide a general overview and key points.",
        "detailed" => "Provide a detailed analysis with insights and observations.",
        "summary" => "Create a concise summary of the main points.",
        _ => "Provide a general overview and key points.",
    };

    format!(
        "\nPlease analyze the following content and provide a {analysis_type} analysis:\n\n\
        Content: \"{content}\"\n\n\
        Instructions: {instructions}\n\n\
        Please provide:\n\
        1. Key insights\n\
        2. Main themes or topics\n\
        3. Important details\n\
        4. Any recommendations or observations\n\n\
        Format your response in a clear, structured way.\n"
    )
}

/// Prompt for editing content
pub fn build_edit_prompt(content: &str, edit_instructions: &str, edit_type: &str) -> String {
    let guidelines = match edit_type {
        "improve" => "Improve the content while maintaining the original meaning and style.",
        "rewrite" => "Rewrite the content with better clarity and flow.",
        "summarize" => "Create a concise summary of the content.",
        _ => "Improve the content while maintaining the original meaning and style.",
    };

    format!(
        "\nPlease {edit_type} the following content:\n\n\
        Original Content: \"{content}\"\n\n\
        Edit Instructions: \"{edit_instructions}\"\n\n\
        Additional Guidelines: {guidelines}\n\n\
        Please provide the edited version that:\n\
        1. Maintains the core message\n\
        2. Improves clarity and readability\n\
        3. Follows the specific edit instructions\n\
        4. Is well-structured and professional\n\n\
        Return only the edited content without additional commentary.\n"
    )
}

/// Prompt for analyzing content tagged with an ID
pub fn build_analysis_prompt(content_id: &str, content: &str, analysis_type: &str) -> String {
    format!(
        "\nAnalyze the following content (ID: {content_id}) with a {analysis_type} approach:\n\n\
        Content: \"{content}\"\n\n\
        Please provide:\n\
        1. Content identification and classification\n\
        2. Key themes and topics\n\
        3. Quality assessment\n\
        4. Potential improvements\n\
        5. Related insights or connections\n\
        6. Actionable recommendations\n\n\
        Format as a structured analysis report.\n"
    )
}
