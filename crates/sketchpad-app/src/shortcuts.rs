//! Keyboard shortcut registry and documentation.

use egui::{Key, KeyboardShortcut, Modifiers};

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub action: UiAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        ctrl: bool,
        shift: bool,
        action: UiAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    /// The egui shortcut to consume. `Ctrl` maps to Cmd on macOS.
    pub fn keyboard_shortcut(&self) -> KeyboardShortcut {
        let mut modifiers = Modifiers::NONE;
        if self.ctrl {
            modifiers = modifiers | Modifiers::COMMAND;
        }
        if self.shift {
            modifiers = modifiers | Modifiers::SHIFT;
        }
        KeyboardShortcut::new(modifiers, self.key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts, most specific modifiers first.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::S, true, true, UiAction::Save, "Save"),
            Shortcut::new(Key::S, true, false, UiAction::Save, "Save"),
            Shortcut::new(Key::Z, true, false, UiAction::Undo, "Undo last stroke"),
        ]
    }

    /// Consume the first shortcut pressed this frame and return its action.
    pub fn consume(ctx: &egui::Context) -> Option<UiAction> {
        ctx.input_mut(|input| {
            Self::all()
                .into_iter()
                .find(|shortcut| input.consume_shortcut(&shortcut.keyboard_shortcut()))
                .map(|shortcut| shortcut.action)
        })
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
