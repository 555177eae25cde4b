use crate::{
    constants::quiz_prompt::{
        CORRECT_ANSWER_MARKER, EXPLANATION_MARKER, QUESTION_MARKER, QUESTION_SEPARATOR,
        QUIZ_GENERATION_PREAMBLE, QUIZ_GENERATION_RULES,
    },
    models::domain::OptionLabel,
};

/// Builds the instruction sent to the completion model.
///
/// Content length and the count range are the caller's responsibility; this
/// only assembles the string.
pub fn build_prompt(content: &str, topic_focus: Option<&str>, count: u8) -> String {
    let topic_line = match topic_focus.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!("\nTopic Focus: {}", topic),
        None => String::new(),
    };

    format!(
        "{preamble}\n\nGiven this study content:\n{content}\n{topic_line}\n\nGenerate exactly {count} multiple-choice questions.\n\n{rules}\n\nFORMAT EACH QUESTION EXACTLY LIKE THIS:\n\n{template}\nGenerate {count} questions now:",
        preamble = QUIZ_GENERATION_PREAMBLE,
        content = content.trim(),
        topic_line = topic_line,
        count = count,
        rules = QUIZ_GENERATION_RULES,
        template = output_template(),
    )
}

fn output_template() -> String {
    let mut template = format!("📌 {} 1: [Your question here]\n", QUESTION_MARKER);
    for label in OptionLabel::ALL {
        template.push_str(&format!("{}) [Option {}]\n", label, label));
    }
    template.push_str(&format!("\n✅ {} [Letter]\n", CORRECT_ANSWER_MARKER));
    template.push_str(&format!(
        "💡 {} [2-3 sentence explanation of why this answer is correct and why others are incorrect]\n",
        EXPLANATION_MARKER
    ));
    template.push_str(QUESTION_SEPARATOR);
    template.push('\n');
    template
}
