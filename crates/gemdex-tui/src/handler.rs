use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gemdex_core::TextInput;

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        result => app.apply_result(result),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Screen switching
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('1') => {
            app.switch_screen(Screen::Chat);
            return;
        }
        KeyCode::Char('2') => {
            app.switch_screen(Screen::Detail);
            return;
        }
        KeyCode::Char('3') => {
            app.switch_screen(Screen::Batch);
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Chat => handle_chat_normal(app, key),
        Screen::Detail => handle_detail_normal(app, key),
        Screen::Batch => handle_batch_normal(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(),
        KeyCode::Char('G') | KeyCode::End => app.chat_follow = true,
        _ => {}
    }
}

fn handle_detail_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('r') => {
            app.detail.toggle_raw();
            app.detail_scroll = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(),
        // Explore by generation
        KeyCode::Char('g') | KeyCode::Tab => app.switch_screen(Screen::Batch),
        _ => {}
    }
}

fn handle_batch_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.generation_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.generation_nav_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_generation(),
        KeyCode::Char('J') | KeyCode::PageDown => app.table_nav_down(),
        KeyCode::Char('K') | KeyCode::PageUp => app.table_nav_up(),
        // Back to search
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Tab => app.switch_screen(Screen::Detail),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Chat => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Enter => app.send_chat(),
            _ => edit_text(app.chat.input_mut(), key),
        },
        Screen::Detail => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                app.search_species();
                app.input_mode = InputMode::Normal;
            }
            _ => edit_text(app.detail.search_mut(), key),
        },
        Screen::Batch => app.input_mode = InputMode::Normal,
    }
}

fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_typing_in_chat_fills_input() {
        let (mut app, _rx) = test_app(Screen::Chat);
        app.start();
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "hi q1");
        assert_eq!(app.chat.input().as_str(), "hi q1");
        assert_eq!(app.screen, Screen::Chat);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_enter_with_blank_chat_input_sends_nothing() {
        let (mut app, _rx) = test_app(Screen::Chat);
        app.start();
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.chat.log().is_empty());
        assert!(!app.chat.is_loading());
    }

    #[tokio::test]
    async fn test_detail_search_submits_and_leaves_editing() {
        let (mut app, mut rx) = test_app(Screen::Detail);
        app.start();
        let _ = rx.recv().await;

        press(&mut app, KeyCode::Char('/'));
        for _ in 0..app.detail.search().as_str().chars().count() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "MewTwo");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.detail.is_loading());

        let event = rx.recv().await.unwrap();
        handle_event(&mut app, event).unwrap();
        assert_eq!(app.detail.error(), Some("Pokémon not found"));
        assert!(app.detail.record().is_none());
    }

    #[tokio::test]
    async fn test_navigation_between_dex_screens() {
        let (mut app, _rx) = test_app(Screen::Detail);
        app.start();
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.screen, Screen::Batch);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(app.detail.search().as_str(), "pikachu");
    }

    #[test]
    fn test_ctrl_c_quits_from_editing() {
        let (mut app, _rx) = test_app(Screen::Chat);
        app.start();
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert!(app.should_quit);
    }
}
