//! Theme configuration for the console
//!
//! Three layers, as in the other terminal tools of this crate family:
//!
//! **Presentation layer:** concrete [Style] values grouped by role (`accent`,
//! `muted`, `error`, ...) plus one style per highlight scope. Colors for the
//! scopes come from the editor theme of the web console.
//!
//! **Semantic layer:** implicit. UI elements that should look alike read the
//! same presentation style.
//!
//! **Application layer:** methods named after where a style is used
//! (`editor_token`, `panel_title`, `status_error`). Rendering code only calls
//! these.

use lql::lql::grammar::TokenCategory;
use ratatui::style::{Color, Modifier, Style};

/// Concrete styles
#[derive(Debug, Clone)]
pub struct PresentationStyles {
    pub normal: Style,
    pub muted: Style,
    pub accent: Style,
    pub focused_border: Style,
    pub error: Style,
    pub loading: Style,
    pub header: Style,

    pub comment: Style,
    pub keyword: Style,
    pub operator: Style,
    pub number: Style,
    pub identifier: Style,
    pub delimiter_square: Style,
    pub delimiter: Style,
    pub invalid: Style,
}

#[derive(Debug, Clone)]
pub struct Theme {
    presentation: PresentationStyles,
}

impl Theme {
    /// Style for a classified span in the editor, looked up by highlight scope
    pub fn editor_token(&self, category: TokenCategory) -> Style {
        let p = &self.presentation;
        match category.scope() {
            "comment" => p.comment,
            "keyword" => p.keyword,
            "operator" => p.operator,
            "number" => p.number,
            "identifier" => p.identifier,
            "delimiter.square" => p.delimiter_square,
            "delimiter.parenthesis" | "delimiter.brace" => p.delimiter,
            "invalid" => p.invalid,
            _ => p.normal,
        }
    }

    pub fn editor_line_number(&self) -> Style {
        self.presentation.muted
    }

    pub fn header_title(&self) -> Style {
        self.presentation.header
    }

    pub fn header_tagline(&self) -> Style {
        self.presentation.muted
    }

    /// Border of the pane or card holding keyboard focus
    pub fn focused_border(&self) -> Style {
        self.presentation.focused_border
    }

    pub fn border(&self) -> Style {
        self.presentation.muted
    }

    /// Border of the card showing the pipeline error
    pub fn failed_border(&self) -> Style {
        self.presentation.error
    }

    pub fn panel_title(&self) -> Style {
        self.presentation.accent
    }

    pub fn panel_description(&self) -> Style {
        self.presentation.muted
    }

    pub fn panel_content(&self) -> Style {
        self.presentation.normal
    }

    pub fn panel_placeholder(&self) -> Style {
        self.presentation.muted.add_modifier(Modifier::ITALIC)
    }

    pub fn status_label(&self) -> Style {
        self.presentation.accent
    }

    pub fn status_error(&self) -> Style {
        self.presentation.error
    }

    pub fn status_loading(&self) -> Style {
        self.presentation.loading
    }

    pub fn status_hint(&self) -> Style {
        self.presentation.muted
    }

    pub fn error_message(&self) -> Style {
        self.presentation.error
    }
}

impl Default for Theme {
    fn default() -> Self {
        let amber = Color::Rgb(0xFF, 0xB0, 0x00);
        Theme {
            presentation: PresentationStyles {
                normal: Style::default(),
                muted: Style::default().fg(Color::Rgb(0x7F, 0x84, 0x8E)),
                accent: Style::default().fg(amber).add_modifier(Modifier::BOLD),
                focused_border: Style::default().fg(amber),
                error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                loading: Style::default().fg(Color::Green),
                header: Style::default()
                    .fg(Color::Black)
                    .bg(amber)
                    .add_modifier(Modifier::BOLD),

                comment: Style::default()
                    .fg(Color::Rgb(0x7F, 0x84, 0x8E))
                    .add_modifier(Modifier::ITALIC),
                keyword: Style::default().fg(amber).add_modifier(Modifier::BOLD),
                operator: Style::default().fg(Color::Rgb(0x56, 0xB6, 0xC2)),
                number: Style::default().fg(Color::Rgb(0x61, 0xAF, 0xEF)),
                identifier: Style::default().fg(Color::Rgb(0xE5, 0xC0, 0x7B)),
                delimiter_square: Style::default().fg(Color::Rgb(0xC6, 0x78, 0xDD)),
                delimiter: Style::default(),
                invalid: Style::default().fg(Color::Red),
            },
        }
    }
}
