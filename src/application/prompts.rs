//! Prompt construction as pure functions, unit-testable without any network
//! call and decoupled from model invocation.

use crate::domain::entities::{ConversationTurn, PageRecord};

/// Separator between rendered conversation turns.
const TURN_SEPARATOR: &str = "\n---\n";

/// Fixed instruction template for vision extraction: a single structured
/// transcript with page markers and explicit section tags.
pub const VISION_EXTRACTION_PROMPT: &str = "\
Extract the complete content of this PDF.

What to extract:
1. All text content
2. Detailed descriptions of images (figures, graphs, illustrations)
3. Table contents, including every cell
4. Explanations of formulas
5. Page numbers and section structure

Output format, one block per page:

\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}
Page [number]
\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}

[TEXT]
All text content verbatim

[IMAGE]
Detailed description of each image: what is shown, colors, layout,
key points

[TABLE]
| col1 | col2 | col3 |
|------|------|------|
| data | data | data |

[FORMULA]
Formula: 2x + 3 = 7
Explanation: an equation solved for x

\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}

Process every page of the PDF in this format.";

/// Renders stored turns as alternating User/Assistant lines. Empty history
/// yields the empty string, which is then omitted from the prompt.
pub fn format_conversation(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("User: {}\nAssistant: {}", turn.question, turn.answer))
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

pub fn page_marker(page_number: u32) -> String {
    format!("==================== page_number:{page_number} ====================")
}

/// Local page context: the current page's text and, when it exists, the
/// following page's, each under an explicit page marker. Returns the empty
/// string when `current_page` is not a valid 1-based index.
pub fn build_page_context(pages: &[PageRecord], current_page: u32) -> String {
    let page_count = pages.len() as u32;
    if current_page == 0 || current_page > page_count {
        return String::new();
    }

    let mut text = String::new();
    let page = &pages[(current_page - 1) as usize];
    text.push_str(&page_marker(current_page));
    text.push('\n');
    text.push_str(&page.text);

    let next = current_page + 1;
    if next <= page_count {
        let next_page = &pages[(next - 1) as usize];
        text.push('\n');
        text.push_str(&page_marker(next));
        text.push('\n');
        text.push_str(&next_page.text);
    }
    text
}

/// The tutor system prompt: role description, the literal query, the page
/// context when available, the formatted history when non-empty, and the
/// current page when known.
pub fn tutor_prompt(
    query: &str,
    page_context: &str,
    formatted_context: &str,
    current_page: Option<u32>,
) -> String {
    let mut prompt = String::from(
        "\
You are a kind, patient, dialogic tutor working through a PDF textbook with
a student. Your role is not to summarize information but to guide learning
one step at a time, as a conversation partner.

Goal: help the student think and learn for themselves by asking questions.

Student question: ",
    );
    prompt.push_str(query);
    prompt.push_str("\nTextbook content: ");
    prompt.push_str(page_context);
    prompt.push('\n');

    if !formatted_context.is_empty() {
        prompt.push_str("**chat_history**:");
        prompt.push_str(formatted_context);
        prompt.push('\n');
    }

    if let Some(page) = current_page {
        prompt.push_str(&format!("**current page:** {page}\n"));
    }

    prompt.push_str(
        "\
Start the dialogue from this information.

Rules you must follow:
- Always open with a question and close with a question.
- Teach exactly one topic, term, or formula per reply.
- Wait for the student's answer before moving on, and build the next turn
  on what they said.
- Keep a warm, encouraging tone.

Never do any of the following:
- Never summarize or list the material (no \"this page has five points\").
- Never pack many facts into one reply.
- Never push ahead without the student's response.
- Never use a technical term without explaining it.",
    );
    prompt
}

/// User-turn text accompanying the system content.
pub fn tutor_question(query: &str) -> String {
    format!("Based on the PDF textbook content above, answer this question: {query}")
}
