//! Plain-text rendering of transcript messages

use taxmate_core::{Message, Role};

pub const BANNER: &str = "Tax Mate\nYour Smart Tax Filing Assistant";

/// Render one message with its 1-based transcript index
pub fn message(index: usize, message: &Message) -> String {
    let speaker = match message.role() {
        Role::Assistant => "Tax Mate",
        Role::User => "You",
    };

    let mut out = format!("[{}] {}:\n", index, speaker);
    for line in message.content().lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }

    if let Some(options) = message.options() {
        for (i, option) in options.iter().enumerate() {
            out.push_str(&format!("      {}) {}\n", i + 1, option));
        }
    }

    if message.likes() > 0 || message.dislikes() > 0 {
        out.push_str(&format!(
            "    (+{} / -{})\n",
            message.likes(),
            message.dislikes()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_assistant_with_options() {
        let msg = Message::assistant("Ready?\nLet's go", ["Yes", "No"]);
        assert_eq!(
            message(1, &msg),
            "[1] Tax Mate:\n    Ready?\n    Let's go\n      1) Yes\n      2) No\n"
        );
    }

    #[test]
    fn test_render_user() {
        let msg = Message::user("Salary");
        assert_eq!(message(2, &msg), "[2] You:\n    Salary\n");
    }
}
