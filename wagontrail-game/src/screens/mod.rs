//! Windows and forms shipped with the core.
mod game_over;
mod main_menu;
mod random_event;
mod store;
mod travel;

pub use game_over::GameOver;
pub use main_menu::MainMenu;
pub use random_event::RandomEventInfo;
pub use store::{Cart, CartLine, Store, store_price};
pub use travel::{Travel, status_block};

/// Parse a 1-based menu choice in `1..=max`, returning the 0-based index.
pub(crate) fn parse_choice(input: &str, max: usize) -> Option<usize> {
    let choice = input.trim().parse::<usize>().ok()?;
    (1..=max).contains(&choice).then(|| choice - 1)
}

/// Accept Y/N answers in any case; anything else is not an answer.
pub(crate) fn yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
