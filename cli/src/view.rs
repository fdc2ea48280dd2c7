//! Command parsing and rendering for the login and list views.
//!
//! Everything here is pure so the views stay a thin layer over
//! `TodoSyncController` and `AuthFlow`.

use todo_core::{TodoId, TodoItem};

pub const LOGIN_HELP: &str = "commands: login, quit";
pub const LIST_HELP: &str = "commands: list | add <title> | edit <n> | title <text> | save | cancel | \
toggle <n> | rm <n> | logout | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    Login,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl LoginCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => LoginCommand::Empty,
            "login" => LoginCommand::Login,
            "help" | "?" => LoginCommand::Help,
            "quit" | "exit" | "q" => LoginCommand::Quit,
            other => LoginCommand::Invalid(other.to_string()),
        }
    }
}

/// `<n>` arguments are 1-based positions in the displayed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    List,
    Add(String),
    Edit(usize),
    Title(String),
    Save,
    Cancel,
    Toggle(usize),
    Remove(usize),
    Logout,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ListCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "" => ListCommand::Empty,
            "list" | "ls" => ListCommand::List,
            "add" => ListCommand::Add(rest.to_string()),
            "title" => ListCommand::Title(rest.to_string()),
            "save" => ListCommand::Save,
            "cancel" => ListCommand::Cancel,
            "logout" => ListCommand::Logout,
            "help" | "?" => ListCommand::Help,
            "quit" | "exit" | "q" => ListCommand::Quit,
            "edit" | "toggle" | "rm" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => match verb {
                    "edit" => ListCommand::Edit(n),
                    "toggle" => ListCommand::Toggle(n),
                    _ => ListCommand::Remove(n),
                },
                _ => ListCommand::Invalid(line.to_string()),
            },
            _ => ListCommand::Invalid(line.to_string()),
        }
    }
}

/// The item shown at 1-based `position`.
pub fn pick<'a>(displayed: &[&'a TodoItem], position: usize) -> Option<&'a TodoItem> {
    displayed.get(position.checked_sub(1)?).copied()
}

pub fn render_list(displayed: &[&TodoItem], editing: Option<TodoId>, is_loading: bool) -> String {
    if is_loading {
        return "Loading todos...".to_string();
    }
    if displayed.is_empty() {
        return "No todos yet".to_string();
    }

    displayed
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mark = if item.completed { 'x' } else { ' ' };
            let mut line = format!("{:>3}. [{mark}] {}", i + 1, item.title);
            if let Some(category) = &item.category {
                line.push_str(&format!(" ({category})"));
            }
            if editing == Some(item.id) {
                line.push_str("  <- editing");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: TodoId, title: &str, completed: bool) -> TodoItem {
        TodoItem {
            id,
            title: title.to_string(),
            completed,
            category: None,
        }
    }

    #[test]
    fn parses_list_commands() {
        assert_eq!(ListCommand::parse("  add Buy  milk "), ListCommand::Add("Buy  milk".to_string()));
        assert_eq!(ListCommand::parse("add"), ListCommand::Add(String::new()));
        assert_eq!(ListCommand::parse("edit 2"), ListCommand::Edit(2));
        assert_eq!(ListCommand::parse("toggle 1"), ListCommand::Toggle(1));
        assert_eq!(ListCommand::parse("rm 3"), ListCommand::Remove(3));
        assert_eq!(ListCommand::parse("ls"), ListCommand::List);
        assert_eq!(ListCommand::parse(""), ListCommand::Empty);
        assert_eq!(ListCommand::parse("title"), ListCommand::Title(String::new()));
    }

    #[test]
    fn rejects_bad_positions() {
        assert!(matches!(ListCommand::parse("rm 0"), ListCommand::Invalid(_)));
        assert!(matches!(ListCommand::parse("edit two"), ListCommand::Invalid(_)));
        assert!(matches!(ListCommand::parse("toggle"), ListCommand::Invalid(_)));
        assert!(matches!(ListCommand::parse("frobnicate"), ListCommand::Invalid(_)));
    }

    #[test]
    fn parses_login_commands() {
        assert_eq!(LoginCommand::parse(" login "), LoginCommand::Login);
        assert_eq!(LoginCommand::parse("q"), LoginCommand::Quit);
        assert!(matches!(LoginCommand::parse("add x"), LoginCommand::Invalid(_)));
    }

    #[test]
    fn pick_is_one_based() {
        let a = item(10, "a", false);
        let b = item(20, "b", true);
        let shown = vec![&a, &b];
        assert_eq!(pick(&shown, 1).map(|t| t.id), Some(10));
        assert_eq!(pick(&shown, 2).map(|t| t.id), Some(20));
        assert!(pick(&shown, 0).is_none());
        assert!(pick(&shown, 3).is_none());
    }

    #[test]
    fn renders_states() {
        assert_eq!(render_list(&[], None, true), "Loading todos...");
        assert_eq!(render_list(&[], None, false), "No todos yet");

        let a = item(1, "Walk dog", false);
        let mut b = item(2, "Buy milk", true);
        b.category = Some("home".to_string());
        let text = render_list(&[&a, &b], Some(1), false);
        assert_eq!(
            text,
            "  1. [ ] Walk dog  <- editing\n  2. [x] Buy milk (home)"
        );
    }
}
