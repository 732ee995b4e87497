//! Side effects the alert pipeline asks the presentation layer to perform.
//!
//! Every effect is best-effort. Callers log failures and carry on.

use strum_macros::{AsRefStr, Display};

/// Visual style of a transient toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Neutral information.
    Info,
    /// Something failed or was rejected.
    Error,
}

/// Failure to perform a presentation effect.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The alert sound could not be played.
    #[error("Alert sound playback failed: {message}")]
    Sound {
        /// Description of what went wrong.
        message: String,
    },
}

/// Presentation side effects.
pub trait Effects: Send + Sync {
    /// Plays the new-alert sound.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError`] if playback fails. Callers must swallow it.
    fn play_alert_sound(&self) -> Result<(), EffectError>;

    /// Shows a transient toast message.
    fn show_toast(&self, kind: ToastKind, message: &str);
}

/// [`Effects`] that writes everything to the log instead of a screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffects;

impl Effects for LogEffects {
    fn play_alert_sound(&self) -> Result<(), EffectError> {
        log::debug!("alert sound");
        Ok(())
    }

    fn show_toast(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Error => log::error!("{message}"),
            ToastKind::Success | ToastKind::Info => log::info!("[{kind}] {message}"),
        }
    }
}
