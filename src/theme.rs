use iced::Theme;

use crate::app::AppTheme;

/// `None` defers to the system theme detected by the runtime.
pub fn resolve_theme(theme: AppTheme) -> Option<Theme> {
    match theme {
        AppTheme::System => None,
        AppTheme::Light => Some(Theme::Light),
        AppTheme::Dark => Some(Theme::Dark),
    }
}
